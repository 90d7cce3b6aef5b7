//! Tunable simulation parameters
//!
//! Supplied by the host every frame and never mutated by the core. Values are
//! sanitised on the way in so the step functions can trust them.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::MAX_TARGET_COUNT;
use crate::finite_or;

/// Snapshot of the host-controlled knobs
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimParams {
    /// Desired population size (network engine)
    pub target_count: usize,
    /// Base speed in pixels per tick
    pub speed: f32,
    /// Pair distance under which bodies are linked (network engine)
    pub link_distance: f32,
    /// Downward acceleration in pixels per tick² (sandbox engine)
    pub gravity: f32,
    /// Rebound coefficient in [0, 1]
    pub restitution: f32,
    /// Point of interest, `None` when no pointer is active
    #[serde(skip)]
    pub pointer: Option<Vec2>,
}

impl Default for SimParams {
    fn default() -> Self {
        Self {
            target_count: 80,
            speed: 1.2,
            link_distance: 120.0,
            gravity: 0.5,
            restitution: 0.7,
            pointer: None,
        }
    }
}

impl SimParams {
    /// Clamp every field into its valid range.
    ///
    /// Non-finite values fall back to the defaults, negative magnitudes to zero,
    /// restitution into [0, 1], the target count to `MAX_TARGET_COUNT` and a
    /// non-finite pointer to "no pointer".
    pub fn sanitized(self) -> Self {
        let defaults = Self::default();
        let clean = Self {
            target_count: self.target_count.min(MAX_TARGET_COUNT),
            speed: finite_or(self.speed, defaults.speed).max(0.0),
            link_distance: finite_or(self.link_distance, defaults.link_distance).max(0.0),
            gravity: finite_or(self.gravity, defaults.gravity).max(0.0),
            restitution: finite_or(self.restitution, defaults.restitution).clamp(0.0, 1.0),
            pointer: self.pointer.filter(|p| p.is_finite()),
        };
        if clean != self {
            log::debug!("Sanitized simulation parameters: {:?} -> {:?}", self, clean);
        }
        clean
    }

    /// Convert a raw (possibly negative or fractional) count into a target
    pub fn count_from_raw(raw: f64) -> usize {
        if !raw.is_finite() || raw <= 0.0 {
            if raw < 0.0 || raw.is_nan() {
                log::debug!("Clamping target count {raw} to 0");
            }
            return 0;
        }
        let count = raw.round();
        if count > MAX_TARGET_COUNT as f64 {
            log::debug!("Clamping target count {raw} to {MAX_TARGET_COUNT}");
            return MAX_TARGET_COUNT;
        }
        count as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitized_clamps() {
        let params = SimParams {
            target_count: 3,
            speed: -2.0,
            link_distance: f32::NAN,
            gravity: f32::INFINITY,
            restitution: 1.5,
            pointer: Some(Vec2::new(f32::NAN, 1.0)),
        }
        .sanitized();

        assert_eq!(params.target_count, 3);
        assert_eq!(params.speed, 0.0);
        assert_eq!(params.link_distance, SimParams::default().link_distance);
        assert_eq!(params.gravity, SimParams::default().gravity);
        assert_eq!(params.restitution, 1.0);
        assert_eq!(params.pointer, None);
    }

    #[test]
    fn test_sanitized_keeps_valid() {
        let params = SimParams {
            pointer: Some(Vec2::new(4.0, 5.0)),
            ..Default::default()
        };
        assert_eq!(params.sanitized(), params);
    }

    #[test]
    fn test_count_from_raw() {
        assert_eq!(SimParams::count_from_raw(-5.0), 0);
        assert_eq!(SimParams::count_from_raw(f64::NAN), 0);
        assert_eq!(SimParams::count_from_raw(f64::INFINITY), 0);
        assert_eq!(SimParams::count_from_raw(0.0), 0);
        assert_eq!(SimParams::count_from_raw(42.4), 42);
        assert_eq!(SimParams::count_from_raw(1e12), MAX_TARGET_COUNT);
    }

    #[test]
    fn test_sanitized_caps_target_count() {
        let params = SimParams {
            target_count: usize::MAX,
            ..Default::default()
        }
        .sanitized();
        assert_eq!(params.target_count, MAX_TARGET_COUNT);
    }
}
