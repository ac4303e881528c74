//! Arcade simulation step
//!
//! Advances the ball by one unit step. Velocities are in play-area units
//! per step, so simulation speed follows the caller's tick rate.

use glam::Vec2;

use super::arcade::{ArcadeEvent, ArcadeState};
use super::collision::Aabb;
use crate::tuning::ArcadeTuning;

/// Paddle hitbox for a paddle centered at `paddle_x`
pub fn paddle_bounds(paddle_x: f32, area: Vec2, tuning: &ArcadeTuning) -> Aabb {
    let top_left = Vec2::new(paddle_x - tuning.paddle_width / 2.0, area.y - tuning.paddle_offset);
    Aabb::new(
        top_left,
        top_left + Vec2::new(tuning.paddle_width, tuning.paddle_height),
    )
}

/// Where a ball resting on the paddle sits
pub fn resting_ball_pos(paddle_x: f32, area: Vec2, tuning: &ArcadeTuning) -> Vec2 {
    Vec2::new(paddle_x, area.y - tuning.ball_rest_offset)
}

/// Advance a ball in flight by one step, appending what happened to `events`
pub fn step(state: &mut ArcadeState, area: Vec2, tuning: &ArcadeTuning, events: &mut Vec<ArcadeEvent>) {
    let radius = tuning.ball_size / 2.0;
    state.time_ticks += 1;

    // Explicit Euler, then gravity
    state.ball_pos += state.ball_vel;
    state.ball_vel.y += tuning.gravity;

    // Side walls
    if state.ball_pos.x <= radius {
        state.ball_pos.x = radius;
        state.ball_vel.x *= -tuning.wall_damping;
    } else if state.ball_pos.x >= area.x - radius {
        state.ball_pos.x = area.x - radius;
        state.ball_vel.x *= -tuning.wall_damping;
    }

    // Ceiling
    if state.ball_pos.y <= radius {
        state.ball_pos.y = radius;
        state.ball_vel.y *= -tuning.wall_damping;
    }

    let ball = Aabb::from_center(state.ball_pos, Vec2::splat(tuning.ball_size));

    // Paddle: only while falling, so a rising ball can't be caught twice
    let paddle = paddle_bounds(state.paddle_x, area, tuning);
    if ball.intersects(&paddle) && state.ball_vel.y > 0.0 {
        // -1 at the left edge, +1 at the right edge
        let offset = (state.ball_pos.x - state.paddle_x) / (tuning.paddle_width / 2.0);
        state.ball_vel.x = offset * tuning.paddle_max_deflect;
        state.ball_vel.y = -state.ball_vel.y.abs() * tuning.paddle_rebound;
        state.ball_pos.y = paddle.min.y - radius;
        events.push(ArcadeEvent::PaddleHit { offset });
    }

    // Targets: creation order, at most one per step
    let target_size = Vec2::splat(tuning.target_size);
    if let Some(target) = state
        .targets
        .iter_mut()
        .find(|t| !t.destroyed && Aabb::from_center(t.pos, target_size).intersects(&ball))
    {
        target.destroyed = true;
        let element = target.element;
        let points = element.points();
        state.score += points;
        state.items_destroyed += 1;
        events.push(ArcadeEvent::TargetDestroyed {
            element,
            points,
            score: state.score,
        });

        state.ball_vel.y *= -tuning.target_rebound;
        state.ball_vel.x *= tuning.target_speedup;

        if state.items_destroyed >= state.total_items {
            state.is_active = false;
            events.push(ArcadeEvent::Won { score: state.score });
        }
    }

    // Missed: back onto the paddle, no penalty
    if state.ball_pos.y > area.y + tuning.fall_margin {
        state.ball_pos = resting_ball_pos(state.paddle_x, area, tuning);
        state.ball_vel = Vec2::ZERO;
        events.push(ArcadeEvent::BallMissed);
    }
}
