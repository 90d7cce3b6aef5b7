//! Population manager
//!
//! Owns the ordered sequence of live bodies and every way bodies are created
//! or destroyed. Order is insertion order; growing pushes to the back and
//! shrinking pops from the back.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

use super::body::{Body, Shape, Tint, Viewport};
use super::params::SimParams;
use crate::consts::*;

/// Sandbox colour palette (0xRRGGBB)
pub const SANDBOX_PALETTE: [u32; 6] = [0x7c3aed, 0x06b6d4, 0xf59e0b, 0x10b981, 0xef4444, 0x8b5cf6];

/// How new bodies are drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpawnProfile {
    /// Uniform heading at base speed, small radius, cool hue
    Network,
    /// Tossed upward from the spawn point, large radius, palette colour
    Sandbox,
    /// Slow per-axis drift, tiny radius
    Star,
}

/// Outcome of a reconciliation pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Reconcile {
    pub spawned: usize,
    pub removed: usize,
}

impl Reconcile {
    pub fn changed(&self) -> bool {
        self.spawned > 0 || self.removed > 0
    }
}

/// Uniform sample in `[lo, hi)` that tolerates an empty range
fn sample(rng: &mut Pcg32, lo: f32, hi: f32) -> f32 {
    if hi > lo { rng.random_range(lo..hi) } else { lo }
}

/// The live bodies of one engine
#[derive(Debug, Clone)]
pub struct Population {
    bodies: Vec<Body>,
    target: usize,
    profile: SpawnProfile,
    rng: Pcg32,
}

impl Population {
    pub fn new(profile: SpawnProfile, seed: u64) -> Self {
        Self {
            bodies: Vec::new(),
            target: 0,
            profile,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn profile(&self) -> SpawnProfile {
        self.profile
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn bodies_mut(&mut self) -> &mut [Body] {
        &mut self.bodies
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn target_count(&self) -> usize {
        self.target
    }

    /// Record the desired size. Nothing is spawned until [`Population::reconcile`].
    pub fn set_target_count(&mut self, n: usize) {
        if n != self.target {
            log::debug!("Target population {} -> {}", self.target, n);
        }
        self.target = n;
    }

    /// Spawn or pop until the live count equals the target
    pub fn reconcile(&mut self, viewport: &Viewport, params: &SimParams) -> Reconcile {
        let mut result = Reconcile::default();

        while self.bodies.len() < self.target {
            let pos = self.random_position(viewport);
            let body = self.make_body(pos, Shape::Circle, params);
            self.bodies.push(body);
            result.spawned += 1;
        }
        if self.bodies.len() > self.target {
            result.removed = self.bodies.len() - self.target;
            self.bodies.truncate(self.target);
        }

        if result.changed() {
            log::trace!(
                "Reconciled population: +{} -{} (now {})",
                result.spawned,
                result.removed,
                self.bodies.len()
            );
        }
        result
    }

    /// Create one body at `pos` and append it
    pub fn spawn(&mut self, pos: Vec2, shape: Shape, params: &SimParams) -> &Body {
        let body = self.make_body(pos, shape, params);
        self.bodies.push(body);
        let index = self.bodies.len() - 1;
        &self.bodies[index]
    }

    /// Remove the body at `index`, keeping the order of the rest
    pub fn remove(&mut self, index: usize) -> Option<Body> {
        (index < self.bodies.len()).then(|| self.bodies.remove(index))
    }

    /// Drop every body
    pub fn clear(&mut self) {
        if !self.bodies.is_empty() {
            log::info!("Cleared {} bodies", self.bodies.len());
        }
        self.bodies.clear();
    }

    /// Clear then refill to the target count
    pub fn reset(&mut self, viewport: &Viewport, params: &SimParams) -> Reconcile {
        let removed = self.bodies.len();
        self.bodies.clear();
        let refill = self.reconcile(viewport, params);
        log::info!("Population reset: {} bodies", self.bodies.len());
        Reconcile {
            spawned: refill.spawned,
            removed,
        }
    }

    /// Viewport changed. Positions are kept; boundaries bring bodies back next tick.
    pub fn resize(&mut self, viewport: &Viewport) {
        log::info!(
            "Viewport resized to {}x{} ({} bodies kept in place)",
            viewport.width,
            viewport.height,
            self.bodies.len()
        );
    }

    /// Seed `count` bodies in the upper half of the viewport, inset from the walls
    pub fn seed_upper_half(&mut self, viewport: &Viewport, count: usize, shape: Shape, params: &SimParams) {
        for _ in 0..count {
            let x = sample(
                &mut self.rng,
                SANDBOX_SEED_MARGIN,
                viewport.width - SANDBOX_SEED_MARGIN,
            );
            let y = sample(&mut self.rng, SANDBOX_SEED_MARGIN, viewport.height / 2.0);
            self.spawn(Vec2::new(x, y), shape, params);
        }
    }

    fn random_position(&mut self, viewport: &Viewport) -> Vec2 {
        Vec2::new(
            sample(&mut self.rng, 0.0, viewport.width),
            sample(&mut self.rng, 0.0, viewport.height),
        )
    }

    /// Draw a new body according to the spawn profile
    pub fn make_body(&mut self, pos: Vec2, shape: Shape, params: &SimParams) -> Body {
        let rng = &mut self.rng;
        match self.profile {
            SpawnProfile::Network => {
                let heading = sample(rng, 0.0, TAU);
                let vel = Vec2::from_angle(heading) * params.speed;
                let radius = sample(rng, 2.0, 4.0);
                let hue = rng.random_range(180..=320u16);
                Body::new(pos, vel, radius).with_tint(Tint::Hue(hue))
            }
            SpawnProfile::Sandbox => {
                let vel = Vec2::new(sample(rng, -3.0, 3.0), sample(rng, -5.0, 0.0));
                let radius = sample(rng, 18.0, 40.0);
                let color = SANDBOX_PALETTE[rng.random_range(0..SANDBOX_PALETTE.len())];
                let angle = sample(rng, 0.0, TAU);
                let spin = sample(rng, -0.1, 0.1);
                Body::new(pos, vel, radius)
                    .with_shape(shape)
                    .with_tint(Tint::Rgb(color))
                    .with_spin(angle, spin)
            }
            SpawnProfile::Star => {
                let vel = Vec2::new(sample(rng, -0.15, 0.15), sample(rng, -0.15, 0.15));
                let radius = sample(rng, 0.5, 2.5);
                let alpha = sample(rng, 0.3, 1.0);
                Body::new(pos, vel, radius).with_tint(Tint::Alpha(alpha))
            }
        }
    }
}
