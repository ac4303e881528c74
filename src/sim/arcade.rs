//! Ball-throw arcade engine
//!
//! A ball rests on the paddle until thrown. In flight it falls under gravity,
//! bounces off walls, ceiling and paddle, and destroys element targets.
//! Destroying every target wins. A ball that drops past the paddle simply
//! returns to it; there are no lives.

use glam::Vec2;
use rand::Rng;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use super::element::Element;
use super::tick::{resting_ball_pos, step};
use crate::notice::{Notice, NoticeSlot};
use crate::tuning::ArcadeTuning;

/// A destructible element marker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Target {
    pub element: Element,
    /// Center, in play-area coordinates
    pub pos: Vec2,
    pub destroyed: bool,
}

impl Target {
    pub fn points(&self) -> u32 {
        self.element.points()
    }
}

/// Observable arcade state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArcadeState {
    pub score: u32,
    pub items_destroyed: u32,
    pub total_items: u32,
    /// False once every target is destroyed
    pub is_active: bool,
    pub ball_pos: Vec2,
    /// Zero while the ball rests on the paddle
    pub ball_vel: Vec2,
    /// Paddle center
    pub paddle_x: f32,
    /// Play-area size; unset until the first layout
    pub area: Option<Vec2>,
    /// In creation order (one per element)
    pub targets: Vec<Target>,
    /// Steps simulated with the ball in flight
    pub time_ticks: u64,
}

impl Default for ArcadeState {
    fn default() -> Self {
        Self {
            score: 0,
            items_destroyed: 0,
            total_items: 0,
            is_active: true,
            ball_pos: Vec2::ZERO,
            ball_vel: Vec2::ZERO,
            paddle_x: 0.0,
            area: None,
            targets: Vec::new(),
            time_ticks: 0,
        }
    }
}

impl ArcadeState {
    pub fn is_resting(&self) -> bool {
        self.ball_vel == Vec2::ZERO
    }

    pub fn remaining_targets(&self) -> impl Iterator<Item = &Target> {
        self.targets.iter().filter(|t| !t.destroyed)
    }
}

/// Things that happened during an intent or a tick
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind")]
pub enum ArcadeEvent {
    BallThrown { vel: Vec2 },
    /// `offset` is -1 at the paddle's left edge and +1 at its right edge
    PaddleHit { offset: f32 },
    TargetDestroyed { element: Element, points: u32, score: u32 },
    Won { score: u32 },
    BallMissed,
}

impl ArcadeEvent {
    /// Toast text for events the player should see
    fn toast(&self) -> Option<String> {
        match self {
            ArcadeEvent::TargetDestroyed { element, points, .. } => {
                Some(format!("{} +{points}!", element.name()))
            }
            ArcadeEvent::Won { score } => Some(format!("You Win! Final Score: {score}")),
            _ => None,
        }
    }
}

/// Arcade engine for one playthrough
#[derive(Debug, Clone)]
pub struct ArcadeEngine<R = Pcg32> {
    tuning: ArcadeTuning,
    rng: R,
    state: ArcadeState,
    events: Vec<ArcadeEvent>,
    toast: NoticeSlot<ArcadeEvent>,
    /// Bumped on reset so clocks bound to the old game stop ticking
    clock_epoch: u64,
}

impl ArcadeEngine<Pcg32> {
    /// Engine with a seeded generator for reproducible layouts and throws
    pub fn seeded(seed: u64) -> Self {
        Self::new(Pcg32::seed_from_u64(seed))
    }
}

impl<R: Rng> ArcadeEngine<R> {
    pub fn new(rng: R) -> Self {
        Self::with_tuning(ArcadeTuning::default(), rng)
    }

    pub fn with_tuning(tuning: ArcadeTuning, rng: R) -> Self {
        Self {
            toast: NoticeSlot::new(tuning.toast_secs),
            tuning,
            rng,
            state: ArcadeState::default(),
            events: Vec::new(),
            clock_epoch: 0,
        }
    }

    /// Lay out paddle, ball and targets for a play area.
    ///
    /// Safe to call again when the area changes: targets keep their
    /// destroyed flags and only move. Returns false for an empty area.
    pub fn setup_initial_positions(&mut self, area: Vec2) -> bool {
        if !(area.is_finite() && area.x > 0.0 && area.y > 0.0) {
            log::warn!("Ignoring layout for unusable area {area}");
            return false;
        }

        self.state.area = Some(area);
        self.state.paddle_x = area.x / 2.0;
        self.rest_ball(area);

        let destroyed: Vec<bool> = if self.state.targets.len() == Element::COUNT {
            self.state.targets.iter().map(|t| t.destroyed).collect()
        } else {
            vec![false; Element::COUNT]
        };
        let positions = random_layout(&self.tuning, &mut self.rng, area)
            .unwrap_or_else(|| grid_layout(&self.tuning, area));

        self.state.targets = Element::ALL
            .into_iter()
            .zip(positions)
            .zip(destroyed)
            .map(|((element, pos), destroyed)| Target {
                element,
                pos,
                destroyed,
            })
            .collect();
        self.state.total_items = self.state.targets.len() as u32;
        self.state.items_destroyed = self.state.targets.iter().filter(|t| t.destroyed).count() as u32;

        log::info!(
            "Arcade layout {}x{}: {} targets, {} remaining",
            area.x,
            area.y,
            self.state.total_items,
            self.state.total_items - self.state.items_destroyed
        );
        true
    }

    /// Drag the paddle toward `x`, clamped to the play area.
    /// A resting ball rides along.
    pub fn move_paddle(&mut self, x: f32) -> bool {
        if !self.state.is_active {
            return false;
        }
        let Some(area) = self.state.area else {
            return false;
        };

        let half = self.tuning.paddle_width / 2.0;
        // max/min rather than clamp: a narrow area must not panic
        let x = x.max(half).min(area.x - half);
        self.state.paddle_x = x;
        if self.state.is_resting() {
            self.state.ball_pos.x = x;
        }
        true
    }

    /// Launch a resting ball upward at a slightly random angle
    pub fn throw_ball(&mut self) -> bool {
        if !self.state.is_active || !self.state.is_resting() {
            return false;
        }

        let spread = self.tuning.throw_spread.abs();
        let angle = if spread.is_finite() {
            self.rng.random_range(-spread..=spread)
        } else {
            0.0
        };
        let vel = Vec2::new(angle * self.tuning.throw_spread_scale, -self.tuning.throw_speed);
        self.state.ball_vel = vel;
        log::debug!("Ball thrown with velocity {vel}");
        self.emit(ArcadeEvent::BallThrown { vel });
        true
    }

    /// Advance one unit step. Does nothing while the ball rests, the game
    /// is over, or no layout has happened.
    pub fn tick(&mut self) -> bool {
        if !self.state.is_active || self.state.is_resting() {
            return false;
        }
        let Some(area) = self.state.area else {
            return false;
        };

        let first_new = self.events.len();
        step(&mut self.state, area, &self.tuning, &mut self.events);

        for event in &self.events[first_new..] {
            log::debug!("{event:?}");
            match event {
                ArcadeEvent::TargetDestroyed { element, score, .. } => {
                    log::info!("Destroyed {element} target, score {score}");
                }
                ArcadeEvent::Won { score } => log::info!("All targets destroyed, final score {score}"),
                _ => {}
            }
            if let Some(text) = event.toast() {
                self.toast.show(event.clone(), text);
            }
        }
        true
    }

    /// Start over: cancel bound clocks and rebuild the layout
    pub fn reset_game(&mut self) {
        self.clock_epoch += 1;
        let area = self.state.area;
        self.state = ArcadeState::default();
        self.events.clear();
        self.toast.cancel();
        log::info!("Arcade reset (clock epoch {})", self.clock_epoch);

        if let Some(area) = area {
            self.setup_initial_positions(area);
        }
    }

    /// Let wall-clock time pass for the toast
    pub fn advance_time(&mut self, dt: f32) {
        self.toast.advance(dt);
    }

    pub fn state(&self) -> &ArcadeState {
        &self.state
    }

    pub fn snapshot(&self) -> ArcadeState {
        self.state.clone()
    }

    pub fn tuning(&self) -> &ArcadeTuning {
        &self.tuning
    }

    pub fn is_resting(&self) -> bool {
        self.state.is_resting()
    }

    pub fn toast(&self) -> Option<&Notice<ArcadeEvent>> {
        self.toast.current()
    }

    pub fn clock_epoch(&self) -> u64 {
        self.clock_epoch
    }

    /// Take all events emitted since the last call, oldest first
    pub fn drain_events(&mut self) -> Vec<ArcadeEvent> {
        std::mem::take(&mut self.events)
    }

    fn rest_ball(&mut self, area: Vec2) {
        self.state.ball_pos = resting_ball_pos(self.state.paddle_x, area, &self.tuning);
        self.state.ball_vel = Vec2::ZERO;
    }

    fn emit(&mut self, event: ArcadeEvent) {
        if let Some(text) = event.toast() {
            self.toast.show(event.clone(), text);
        }
        self.events.push(event);
    }
}

/// Random non-overlapping target centers inside the safe band, or None if
/// the band is degenerate or the targets don't fit
fn random_layout<R: Rng>(tuning: &ArcadeTuning, rng: &mut R, area: Vec2) -> Option<Vec<Vec2>> {
    let half = tuning.target_size / 2.0;
    let (min_x, max_x) = (tuning.safe_margin + half, area.x - tuning.safe_margin - half);
    let (min_y, max_y) = (tuning.target_min_y, tuning.target_max_y);
    let finite = min_x.is_finite() && max_x.is_finite() && min_y.is_finite() && max_y.is_finite();
    if !(finite && max_x > min_x && max_y > min_y) {
        log::debug!("Target band degenerate for area {area}; using grid");
        return None;
    }

    let size = Vec2::splat(tuning.target_size);
    let mut placed: Vec<Vec2> = Vec::with_capacity(Element::COUNT);
    for _ in 0..Element::COUNT {
        let spot = (0..tuning.placement_attempts)
            .map(|_| Vec2::new(rng.random_range(min_x..=max_x), rng.random_range(min_y..=max_y)))
            .find(|&candidate| {
                let bounds = Aabb::from_center(candidate, size);
                placed
                    .iter()
                    .all(|&p| !Aabb::from_center(p, size).intersects(&bounds))
            });
        match spot {
            Some(pos) => placed.push(pos),
            None => {
                log::debug!("Could not place {} targets randomly; using grid", Element::COUNT);
                return None;
            }
        }
    }
    Some(placed)
}

/// Deterministic centered grid, `grid_columns` wide
fn grid_layout(tuning: &ArcadeTuning, area: Vec2) -> Vec<Vec2> {
    let columns = tuning.grid_columns.max(1);
    let pitch = tuning.target_size + tuning.grid_spacing;
    let total_width = tuning.target_size * columns as f32 + tuning.grid_spacing * (columns - 1) as f32;
    let start_x = (area.x - total_width) / 2.0 + tuning.target_size / 2.0;

    (0..Element::COUNT)
        .map(|i| {
            let (row, col) = (i / columns, i % columns);
            Vec2::new(
                start_x + col as f32 * pitch,
                tuning.target_min_y + row as f32 * pitch,
            )
        })
        .collect()
}
