//! External force contributions
//!
//! Stateless per-body velocity updates applied before position integration.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::Body;
use super::params::SimParams;
use crate::consts::*;

/// Which external force acts on bodies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ForceModel {
    /// Bodies drift untouched
    None,
    /// Pushed away from the pointer, then speed-governed
    Repulsion,
    /// Constant downward pull
    Gravity,
}

impl ForceModel {
    /// Apply this force to one body for one tick
    pub fn apply(&self, body: &mut Body, params: &SimParams) {
        match self {
            ForceModel::None => {}
            ForceModel::Repulsion => {
                if let Some(pointer) = params.pointer {
                    body.vel += repulsion_impulse(body.pos, pointer, REPULSION_THRESHOLD_SQ);
                }
                body.vel = govern_speed(body.vel, params.speed);
            }
            ForceModel::Gravity => {
                body.vel.y += params.gravity;
            }
        }
    }
}

/// Velocity impulse pushing a body at `pos` away from `pointer`.
///
/// Strength falls off linearly in squared distance and vanishes at `threshold_sq`.
/// A body sitting exactly on the pointer gets no push (direction is undefined).
pub fn repulsion_impulse(pos: Vec2, pointer: Vec2, threshold_sq: f32) -> Vec2 {
    let offset = pos - pointer;
    let d2 = offset.length_squared();
    if d2.is_nan() || d2 >= threshold_sq || threshold_sq <= 0.0 {
        return Vec2::ZERO;
    }
    let strength = (threshold_sq - d2) / threshold_sq * REPULSION_INTENSITY;
    offset.normalize_or_zero() * strength * REPULSION_FORCE
}

/// Keep speed within `[SPEED_FLOOR, SPEED_CEILING] × base`.
///
/// Too fast is scaled down to the ceiling, too slow is scaled back up to the
/// base speed. A zero velocity has no direction to scale and is left alone.
pub fn govern_speed(vel: Vec2, base: f32) -> Vec2 {
    let speed = vel.length();
    if !speed.is_finite() || speed <= 0.0 {
        return if speed.is_finite() { vel } else { Vec2::ZERO };
    }

    let ceiling = base * SPEED_CEILING;
    if speed > ceiling {
        return vel * (ceiling / speed);
    }
    if speed < base * SPEED_FLOOR {
        return vel * (base / speed);
    }
    vel
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body_at(pos: Vec2, vel: Vec2) -> Body {
        Body::new(pos, vel, 3.0)
    }

    #[test]
    fn test_repulsion_clamp_to_ceiling() {
        // Speed 10 with base 2 has a ceiling of 4
        let mut body = body_at(Vec2::new(100.0, 100.0), Vec2::new(6.0, 8.0));
        let params = SimParams {
            speed: 2.0,
            ..Default::default()
        };
        ForceModel::Repulsion.apply(&mut body, &params);

        assert!((body.speed() - 4.0).abs() < 1e-5);
        let dir = body.vel.normalize();
        assert!((dir - Vec2::new(0.6, 0.8)).length() < 1e-5);
    }

    #[test]
    fn test_slow_body_rescaled_to_base() {
        let vel = govern_speed(Vec2::new(0.1, 0.0), 2.0);
        assert!((vel.length() - 2.0).abs() < 1e-5);
        assert!(vel.x > 0.0);
    }

    #[test]
    fn test_zero_velocity_skipped() {
        assert_eq!(govern_speed(Vec2::ZERO, 2.0), Vec2::ZERO);
    }

    #[test]
    fn test_in_band_untouched() {
        let vel = Vec2::new(1.5, 0.0);
        assert_eq!(govern_speed(vel, 2.0), vel);
    }

    #[test]
    fn test_repulsion_direction_and_falloff() {
        let pointer = Vec2::new(50.0, 50.0);
        let near = repulsion_impulse(Vec2::new(60.0, 50.0), pointer, REPULSION_THRESHOLD_SQ);
        let far = repulsion_impulse(Vec2::new(80.0, 50.0), pointer, REPULSION_THRESHOLD_SQ);

        assert!(near.x > 0.0 && near.y.abs() < 1e-6);
        assert!(near.length() > far.length());
        // (8000 - 100) / 8000 * 1.5 * 0.2
        assert!((near.x - 0.29625).abs() < 1e-5);
    }

    #[test]
    fn test_repulsion_out_of_range() {
        let impulse = repulsion_impulse(Vec2::new(200.0, 0.0), Vec2::ZERO, REPULSION_THRESHOLD_SQ);
        assert_eq!(impulse, Vec2::ZERO);
    }

    #[test]
    fn test_repulsion_on_pointer_is_finite() {
        let impulse = repulsion_impulse(Vec2::new(5.0, 5.0), Vec2::new(5.0, 5.0), REPULSION_THRESHOLD_SQ);
        assert_eq!(impulse, Vec2::ZERO);
    }

    #[test]
    fn test_no_pointer_no_push() {
        let mut body = body_at(Vec2::new(10.0, 10.0), Vec2::new(1.0, 0.0));
        let params = SimParams {
            speed: 1.0,
            pointer: None,
            ..Default::default()
        };
        ForceModel::Repulsion.apply(&mut body, &params);
        assert_eq!(body.vel, Vec2::new(1.0, 0.0));
    }

    #[test]
    fn test_gravity_adds_downward() {
        let mut body = body_at(Vec2::ZERO, Vec2::new(1.0, -2.0));
        let params = SimParams {
            gravity: 0.5,
            ..Default::default()
        };
        ForceModel::Gravity.apply(&mut body, &params);
        assert_eq!(body.vel, Vec2::new(1.0, -1.5));
    }
}
