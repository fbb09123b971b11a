//! Spring-damper integrator for horizontal movement along the strip.
//!
//! Everything here is a pure function of its inputs and the tuning in
//! [`WanderConfig`]; one call is one 1/60 s tick.

use crate::config::{WanderConfig, ARRIVAL_DISTANCE, ARRIVAL_SPEED};

/// Outcome of a single integrator tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Step {
    pub position: f64,
    pub velocity: f64,
    /// Pet is on its target and nearly still. Position and velocity are
    /// returned unchanged; the caller must pick a new target.
    pub arrived: bool,
}

/// True when the pet sits within arrival distance of `target` and has
/// nearly stopped.
pub fn has_arrived(position: f64, target: f64, velocity: f64) -> bool {
    (target - position).abs() < ARRIVAL_DISTANCE && velocity.abs() < ARRIVAL_SPEED
}

/// Velocity after spring pull and damping, before the speed limit.
pub fn spring_velocity(velocity: f64, distance: f64, cfg: &WanderConfig) -> f64 {
    (velocity + distance * cfg.spring_strength) * cfg.damping
}

/// Advance one tick toward `target`.
pub fn step(position: f64, target: f64, velocity: f64, cfg: &WanderConfig) -> Step {
    if has_arrived(position, target, velocity) {
        return Step {
            position,
            velocity,
            arrived: true,
        };
    }

    let distance = target - position;
    let velocity = spring_velocity(velocity, distance, cfg).clamp(-cfg.max_velocity, cfg.max_velocity);
    let position = (position + velocity).clamp(cfg.min_position(), cfg.max_position());

    Step {
        position,
        velocity,
        arrived: false,
    }
}

/// Target to head for after arriving: the far edge of the opposite half.
///
/// Uses the position margin, not the target margin, so the pet walks right
/// up to the clamp band.
pub fn arrival_target(position: f64, cfg: &WanderConfig) -> f64 {
    if position < cfg.midpoint() {
        cfg.max_position()
    } else {
        cfg.min_position()
    }
}
