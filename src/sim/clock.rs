//! Fixed-rate driver for the arcade engine
//!
//! The engine advances one unit step per `tick`, whatever the frame rate.
//! The clock turns wall-clock frame deltas into ticks at `SIM_HZ`, so the
//! game plays at the same speed on fast and slow displays.

use rand::Rng;

use super::arcade::ArcadeEngine;
use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};

/// Tick schedule bound to one arcade game.
///
/// Resetting the engine cancels every clock started before the reset.
#[derive(Debug, Clone)]
pub struct FixedStepClock {
    epoch: u64,
    accumulator: f32,
    steps: u64,
}

impl FixedStepClock {
    pub fn start<R: Rng>(engine: &ArcadeEngine<R>) -> Self {
        Self {
            epoch: engine.clock_epoch(),
            accumulator: 0.0,
            steps: 0,
        }
    }

    pub fn is_cancelled<R: Rng>(&self, engine: &ArcadeEngine<R>) -> bool {
        self.epoch != engine.clock_epoch()
    }

    /// Total engine steps that moved the ball; idle ticks while it rests
    /// are not counted
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Feed one frame's elapsed time; returns how many steps moved the ball
    pub fn advance<R: Rng>(&mut self, engine: &mut ArcadeEngine<R>, dt: f32) -> u32 {
        if self.is_cancelled(engine) {
            return 0;
        }

        let dt = dt.max(0.0).min(MAX_FRAME_DT);
        engine.advance_time(dt);
        self.accumulator += dt;

        let mut substeps = 0;
        let mut moved = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            if engine.tick() {
                moved += 1;
            }
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        self.steps += u64::from(moved);
        moved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn thrown() -> ArcadeEngine {
        let mut engine = ArcadeEngine::seeded(7);
        engine.setup_initial_positions(Vec2::new(300.0, 500.0));
        engine.throw_ball();
        engine
    }

    #[test]
    fn converts_time_to_steps() {
        let mut engine = thrown();
        let mut clock = FixedStepClock::start(&engine);

        assert_eq!(clock.advance(&mut engine, 0.09), 5);
        assert_eq!(engine.state().time_ticks, 5);
        // Leftover time carries into the next frame
        assert_eq!(clock.advance(&mut engine, 0.012), 1);
        assert_eq!(clock.steps(), 6);
    }

    #[test]
    fn long_frames_are_capped() {
        let mut engine = thrown();
        let mut clock = FixedStepClock::start(&engine);
        let steps = clock.advance(&mut engine, 5.0);
        assert!(steps <= MAX_SUBSTEPS);

        let mut capped = thrown();
        let mut capped_clock = FixedStepClock::start(&capped);
        assert_eq!(steps, capped_clock.advance(&mut capped, MAX_FRAME_DT));
        assert_eq!(engine.state().ball_pos, capped.state().ball_pos);
    }

    #[test]
    fn resting_ball_is_not_counted() {
        let mut engine = ArcadeEngine::seeded(7);
        engine.setup_initial_positions(Vec2::new(300.0, 500.0));
        let mut clock = FixedStepClock::start(&engine);

        assert_eq!(clock.advance(&mut engine, 0.09), 0);
        assert_eq!(clock.steps(), 0);

        engine.throw_ball();
        assert_eq!(clock.advance(&mut engine, 0.05), 3);
        assert_eq!(clock.steps(), 3);
    }

    #[test]
    fn negative_dt_is_ignored() {
        let mut engine = thrown();
        let mut clock = FixedStepClock::start(&engine);
        assert_eq!(clock.advance(&mut engine, -1.0), 0);
        assert_eq!(engine.state().time_ticks, 0);
    }

    #[test]
    fn reset_cancels_clock() {
        let mut engine = thrown();
        let mut clock = FixedStepClock::start(&engine);
        clock.advance(&mut engine, 0.05);

        engine.reset_game();
        engine.throw_ball();
        assert!(clock.is_cancelled(&engine));
        assert_eq!(clock.advance(&mut engine, 0.09), 0);
        assert_eq!(engine.state().time_ticks, 0);

        let mut fresh = FixedStepClock::start(&engine);
        assert!(!fresh.is_cancelled(&engine));
        assert_eq!(fresh.advance(&mut engine, 0.09), 5);
    }
}
