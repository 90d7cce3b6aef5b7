//! The stepper: advances every body by one fixed tick
//!
//! Per body, in order: force, position, rotation, boundary. Collisions run
//! once afterwards over all pairs so wall clamps never fight half-resolved
//! contacts.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

use super::body::{Body, Viewport};
use super::boundary::{BoundaryMode, WallContacts};
use super::collision::{BroadPhase, CollisionStats, resolve_collisions};
use super::force::ForceModel;
use super::params::SimParams;

/// Which pieces of the pipeline an engine runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepRules {
    pub force: ForceModel,
    pub boundary: BoundaryMode,
    pub collisions: bool,
}

/// Inputs recomputed for every tick
#[derive(Debug, Clone, Copy)]
pub struct FrameContext {
    pub viewport: Viewport,
    pub params: SimParams,
}

/// Per-tick counters, for logging and tests
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepStats {
    pub bodies: usize,
    pub wall_hits: u32,
    pub collisions: CollisionStats,
}

/// Advance one body: force, integrate, rotate, boundary
pub fn step_body(body: &mut Body, rules: &StepRules, ctx: &FrameContext) -> WallContacts {
    rules.force.apply(body, &ctx.params);

    if !body.vel.is_finite() {
        log::debug!("Dropping non-finite velocity {:?}", body.vel);
        body.vel = Vec2::ZERO;
    }

    body.pos += body.vel;
    body.angle = (body.angle + body.angular_vel).rem_euclid(TAU);

    rules
        .boundary
        .apply(body, &ctx.viewport, ctx.params.restitution)
}

/// Advance every body by one tick
pub fn tick(
    bodies: &mut [Body],
    rules: &StepRules,
    ctx: &FrameContext,
    broad_phase: &mut dyn BroadPhase,
) -> StepStats {
    let mut stats = StepStats {
        bodies: bodies.len(),
        ..Default::default()
    };

    for body in bodies.iter_mut() {
        if step_body(body, rules, ctx).any() {
            stats.wall_hits += 1;
        }
    }

    if rules.collisions {
        stats.collisions = resolve_collisions(bodies, ctx.params.restitution, broad_phase);
    }

    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::collision::AllPairs;
    use proptest::prelude::*;

    const SANDBOX: StepRules = StepRules {
        force: ForceModel::Gravity,
        boundary: BoundaryMode::Reflect,
        collisions: true,
    };

    const NETWORK: StepRules = StepRules {
        force: ForceModel::Repulsion,
        boundary: BoundaryMode::Wrap,
        collisions: false,
    };

    fn ctx(width: f32, height: f32, params: SimParams) -> FrameContext {
        FrameContext {
            viewport: Viewport::new(width, height),
            params,
        }
    }

    #[test]
    fn test_step_order() {
        // Gravity applies before integration
        let mut body = Body::new(Vec2::new(100.0, 100.0), Vec2::new(1.0, 0.0), 5.0).with_spin(0.0, 0.25);
        let ctx = ctx(
            400.0,
            400.0,
            SimParams {
                gravity: 0.5,
                ..Default::default()
            },
        );
        step_body(&mut body, &SANDBOX, &ctx);

        assert_eq!(body.vel, Vec2::new(1.0, 0.5));
        assert_eq!(body.pos, Vec2::new(101.0, 100.5));
        assert_eq!(body.angle, 0.25);
    }

    #[test]
    fn test_wrap_after_integration() {
        let mut body = Body::new(Vec2::new(399.5, 10.0), Vec2::new(1.0, 0.0), 2.0);
        let ctx = ctx(
            400.0,
            300.0,
            SimParams {
                speed: 1.0,
                ..Default::default()
            },
        );
        step_body(&mut body, &NETWORK, &ctx);
        assert!((body.pos.x - 0.5).abs() < 1e-4);
    }

    #[test]
    fn test_collisions_after_boundaries() {
        // Two overlapping bodies resting on the floor
        let params = SimParams {
            gravity: 0.0,
            restitution: 0.5,
            ..Default::default()
        };
        let ctx = ctx(400.0, 300.0, params);
        let mut bodies = vec![
            Body::new(Vec2::new(100.0, 290.0), Vec2::ZERO, 10.0),
            Body::new(Vec2::new(110.0, 290.0), Vec2::ZERO, 10.0),
        ];
        let stats = tick(&mut bodies, &SANDBOX, &ctx, &mut AllPairs);

        assert_eq!(stats.collisions.contacts, 1);
        assert!((bodies[1].pos.x - bodies[0].pos.x - 20.0).abs() < 1e-4);
    }

    #[test]
    fn test_network_skips_collisions() {
        let ctx = ctx(400.0, 300.0, SimParams::default());
        let mut bodies = vec![
            Body::new(Vec2::new(100.0, 100.0), Vec2::new(1.0, 0.0), 3.0),
            Body::new(Vec2::new(101.0, 100.0), Vec2::new(1.0, 0.0), 3.0),
        ];
        let stats = tick(&mut bodies, &NETWORK, &ctx, &mut AllPairs);
        assert_eq!(stats.collisions, CollisionStats::default());
    }

    proptest! {
        #[test]
        fn prop_reflect_bounds_hold(
            seeds in proptest::collection::vec(
                (30.0f32..370.0, 30.0f32..270.0, -8.0f32..8.0, -8.0f32..8.0, 5.0f32..25.0),
                1..20,
            ),
            gravity in 0.0f32..2.0,
            restitution in 0.0f32..1.0,
        ) {
            let ctx = ctx(400.0, 300.0, SimParams { gravity, restitution, ..Default::default() });
            let mut bodies: Vec<Body> = seeds
                .iter()
                .map(|&(x, y, vx, vy, r)| Body::new(Vec2::new(x, y), Vec2::new(vx, vy), r))
                .collect();
            let max_radius = bodies.iter().map(|b| b.radius).fold(0.0f32, f32::max);

            for _ in 0..120 {
                let stats = tick(&mut bodies, &SANDBOX, &ctx, &mut AllPairs);
                prop_assert!(bodies.iter().all(Body::is_finite));

                // Each contact moves a body by half the overlap, under `max_radius`
                let correction = stats.collisions.contacts.min(bodies.len() as u32) as f32 * max_radius;
                for body in &bodies {
                    let slack = body.speed() + correction + 1e-3;
                    let r = body.radius;
                    prop_assert!(body.pos.x >= r - slack && body.pos.x <= 400.0 - r + slack);
                    prop_assert!(body.pos.y >= r - slack && body.pos.y <= 300.0 - r + slack);
                }
            }
        }

        #[test]
        fn prop_lone_body_stays_inside_walls(
            start in (30.0f32..370.0, 30.0f32..270.0),
            vel in (-40.0f32..40.0, -40.0f32..40.0),
            radius in 1.0f32..25.0,
            gravity in 0.0f32..2.0,
            restitution in 0.0f32..1.0,
        ) {
            let ctx = ctx(400.0, 300.0, SimParams { gravity, restitution, ..Default::default() });
            let mut bodies = vec![Body::new(Vec2::new(start.0, start.1), Vec2::new(vel.0, vel.1), radius)];

            for _ in 0..120 {
                tick(&mut bodies, &SANDBOX, &ctx, &mut AllPairs);
                let body = &bodies[0];
                prop_assert!(body.pos.x >= radius && body.pos.x <= 400.0 - radius);
                prop_assert!(body.pos.y >= radius && body.pos.y <= 300.0 - radius);
            }
        }

        #[test]
        fn prop_wrap_bounds_hold(
            seeds in proptest::collection::vec(
                (0.0f32..400.0, 0.0f32..300.0, -20.0f32..20.0, -20.0f32..20.0),
                1..30,
            ),
            pointer in (0.0f32..400.0, 0.0f32..300.0),
            speed in 0.0f32..6.0,
        ) {
            let params = SimParams {
                speed,
                pointer: Some(Vec2::new(pointer.0, pointer.1)),
                ..Default::default()
            };
            let ctx = ctx(400.0, 300.0, params);
            let mut bodies: Vec<Body> = seeds
                .iter()
                .map(|&(x, y, vx, vy)| Body::new(Vec2::new(x, y), Vec2::new(vx, vy), 3.0))
                .collect();

            for _ in 0..60 {
                tick(&mut bodies, &NETWORK, &ctx, &mut AllPairs);
                for body in &bodies {
                    prop_assert!(body.pos.x >= 0.0 && body.pos.x < 400.0);
                    prop_assert!(body.pos.y >= 0.0 && body.pos.y < 300.0);
                    prop_assert!(body.speed() <= speed * 2.0 + 1e-3);
                }
            }
        }
    }
}
