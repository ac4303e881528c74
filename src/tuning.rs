//! Game balance and physics constants
//!
//! Every field has a default, so a partial JSON file only overrides the
//! values it names.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Recipe puzzle balance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecipeTuning {
    /// Flat bonus for brewing the current goal
    pub goal_bonus: u32,
    /// How long an animation banner stays up (seconds)
    pub notice_secs: f32,
}

impl Default for RecipeTuning {
    fn default() -> Self {
        Self {
            goal_bonus: 100,
            notice_secs: 1.5,
        }
    }
}

/// Arcade physics, in play-area units per step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArcadeTuning {
    pub ball_size: f32,
    pub paddle_width: f32,
    pub paddle_height: f32,
    /// Distance from the bottom edge to the paddle's top edge
    pub paddle_offset: f32,
    /// Distance from the bottom edge to a resting ball's center
    pub ball_rest_offset: f32,
    pub target_size: f32,

    /// Added to vertical velocity every step
    pub gravity: f32,
    /// Restitution against walls and ceiling (< 1 loses energy)
    pub wall_damping: f32,
    /// Vertical amplification off the paddle (> 1 gains energy)
    pub paddle_rebound: f32,
    /// Horizontal speed when the ball hits the paddle's edge
    pub paddle_max_deflect: f32,
    /// Restitution when the ball destroys a target
    pub target_rebound: f32,
    /// Horizontal speed multiplier when the ball destroys a target
    pub target_speedup: f32,
    /// How far below the bottom edge counts as a miss
    pub fall_margin: f32,

    /// Upward launch speed
    pub throw_speed: f32,
    /// Launch angle is drawn from [-spread, spread]
    pub throw_spread: f32,
    /// Horizontal speed per unit of launch angle
    pub throw_spread_scale: f32,

    /// Horizontal margin kept clear of targets on both sides
    pub safe_margin: f32,
    pub target_min_y: f32,
    pub target_max_y: f32,
    /// Gap between targets in the fallback grid
    pub grid_spacing: f32,
    pub grid_columns: usize,
    /// Random draws per target before giving up on random placement
    pub placement_attempts: u32,

    /// How long a toast stays up (seconds)
    pub toast_secs: f32,
}

impl Default for ArcadeTuning {
    fn default() -> Self {
        Self {
            ball_size: 20.0,
            paddle_width: 100.0,
            paddle_height: 20.0,
            paddle_offset: 40.0,
            ball_rest_offset: 30.0,
            target_size: 50.0,

            gravity: 0.15,
            wall_damping: 0.9,
            paddle_rebound: 1.1,
            paddle_max_deflect: 15.0,
            target_rebound: 0.8,
            target_speedup: 1.1,
            fall_margin: 50.0,

            throw_speed: 15.0,
            throw_spread: 0.3,
            throw_spread_scale: 12.0,

            safe_margin: 60.0,
            target_min_y: 80.0,
            target_max_y: 250.0,
            grid_spacing: 15.0,
            grid_columns: 3,
            placement_attempts: 32,

            toast_secs: 2.0,
        }
    }
}

/// Complete tuning set for both engines
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub recipe: RecipeTuning,
    pub arcade: ArcadeTuning,
}

impl Tuning {
    /// Parse tuning from JSON
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load tuning from a JSON file, falling back to defaults on any error
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(err) => {
                log::warn!("Could not read tuning {}: {err}; using defaults", path.display());
                return Self::default();
            }
        };

        match Self::from_json(&json) {
            Ok(tuning) => {
                log::info!("Loaded tuning from {}", path.display());
                tuning
            }
            Err(err) => {
                log::warn!("Invalid tuning {}: {err}; using defaults", path.display());
                Self::default()
            }
        }
    }

    /// Human-readable problems with the current values.
    /// Call at startup and log each warning.
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        let a = &self.arcade;

        for (label, value) in [
            ("recipe.notice_secs", self.recipe.notice_secs),
            ("arcade.ball_size", a.ball_size),
            ("arcade.paddle_width", a.paddle_width),
            ("arcade.paddle_height", a.paddle_height),
            ("arcade.paddle_offset", a.paddle_offset),
            ("arcade.ball_rest_offset", a.ball_rest_offset),
            ("arcade.target_size", a.target_size),
            ("arcade.gravity", a.gravity),
            ("arcade.wall_damping", a.wall_damping),
            ("arcade.paddle_rebound", a.paddle_rebound),
            ("arcade.paddle_max_deflect", a.paddle_max_deflect),
            ("arcade.target_rebound", a.target_rebound),
            ("arcade.target_speedup", a.target_speedup),
            ("arcade.fall_margin", a.fall_margin),
            ("arcade.throw_speed", a.throw_speed),
            ("arcade.throw_spread", a.throw_spread),
            ("arcade.throw_spread_scale", a.throw_spread_scale),
            ("arcade.safe_margin", a.safe_margin),
            ("arcade.target_min_y", a.target_min_y),
            ("arcade.target_max_y", a.target_max_y),
            ("arcade.grid_spacing", a.grid_spacing),
            ("arcade.toast_secs", a.toast_secs),
        ] {
            if !value.is_finite() {
                warnings.push(format!("{label} must be finite (got {value})"));
            }
        }

        if self.recipe.notice_secs < 0.0 {
            warnings.push(format!("recipe.notice_secs {} is negative", self.recipe.notice_secs));
        }
        if a.toast_secs < 0.0 {
            warnings.push(format!("arcade.toast_secs {} is negative", a.toast_secs));
        }

        for (label, value) in [
            ("ball_size", a.ball_size),
            ("paddle_width", a.paddle_width),
            ("paddle_height", a.paddle_height),
            ("target_size", a.target_size),
            ("throw_speed", a.throw_speed),
        ] {
            if value <= 0.0 {
                warnings.push(format!("arcade.{label} must be positive (got {value})"));
            }
        }

        if a.gravity < 0.0 {
            warnings.push(format!("arcade.gravity {} points upward", a.gravity));
        }
        for (label, value) in [
            ("wall_damping", a.wall_damping),
            ("target_rebound", a.target_rebound),
        ] {
            if !(value > 0.0 && value <= 1.0) {
                warnings.push(format!("arcade.{label} {value} outside (0, 1]"));
            }
        }
        if a.paddle_rebound < 1.0 {
            warnings.push(format!(
                "arcade.paddle_rebound {} below 1.0; rallies will die out",
                a.paddle_rebound
            ));
        }
        if a.throw_spread < 0.0 {
            warnings.push(format!("arcade.throw_spread {} is negative", a.throw_spread));
        }
        if a.target_min_y >= a.target_max_y {
            warnings.push(format!(
                "arcade.target_min_y {} >= target_max_y {}; targets will use the grid layout",
                a.target_min_y, a.target_max_y
            ));
        }
        if a.grid_columns == 0 {
            warnings.push("arcade.grid_columns must be at least 1".to_string());
        }

        warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(Tuning::default().validate().is_empty());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "arcade": { "gravity": 0.3 } }"#).unwrap();
        assert_eq!(tuning.arcade.gravity, 0.3);
        assert_eq!(tuning.arcade.paddle_width, 100.0);
        assert_eq!(tuning.recipe, RecipeTuning::default());
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(Tuning::from_json("{ arcade: ").is_err());
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let tuning = Tuning::load_or_default("/nonexistent/potion-arcade/tuning.json");
        assert_eq!(tuning, Tuning::default());
    }

    #[test]
    fn validate_flags_bad_values() {
        let mut tuning = Tuning::default();
        tuning.arcade.wall_damping = 1.5;
        tuning.arcade.target_min_y = 300.0;
        tuning.arcade.grid_columns = 0;

        let warnings = tuning.validate();
        assert_eq!(warnings.len(), 3);
        assert!(warnings.iter().any(|w| w.contains("wall_damping")));
        assert!(warnings.iter().any(|w| w.contains("target_min_y")));
        assert!(warnings.iter().any(|w| w.contains("grid_columns")));
    }

    #[test]
    fn validate_flags_non_finite_values() {
        let mut tuning = Tuning::default();
        tuning.arcade.throw_spread = f32::NAN;
        tuning.arcade.grid_spacing = f32::INFINITY;

        let warnings = tuning.validate();
        assert_eq!(warnings.len(), 2, "{warnings:?}");
        assert!(warnings.iter().any(|w| w.contains("throw_spread must be finite")));
        assert!(warnings.iter().any(|w| w.contains("grid_spacing must be finite")));
    }
}
