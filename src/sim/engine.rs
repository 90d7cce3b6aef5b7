//! Engine context
//!
//! One `Engine` per panel: the population, the current parameter snapshot,
//! the viewport and a queue of host commands. Commands arriving between
//! frames are buffered and applied together at the start of the next tick,
//! so a step never sees a half-applied change.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::{Body, Shape, Viewport};
use super::boundary::BoundaryMode;
use super::collision::{AllPairs, BroadPhase, Link, proximity_links};
use super::force::ForceModel;
use super::params::SimParams;
use super::population::{Population, SpawnProfile};
use super::tick::{FrameContext, StepRules, StepStats, tick};
use crate::consts::*;

/// Which panel an engine drives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineKind {
    /// Pointer-repelled particles joined by proximity lines
    Network,
    /// Falling, colliding shapes spawned by clicks
    Sandbox,
    /// Slowly drifting background stars
    Starfield,
}

impl EngineKind {
    pub fn rules(&self) -> StepRules {
        match self {
            EngineKind::Network => StepRules {
                force: ForceModel::Repulsion,
                boundary: BoundaryMode::Wrap,
                collisions: false,
            },
            EngineKind::Sandbox => StepRules {
                force: ForceModel::Gravity,
                boundary: BoundaryMode::Reflect,
                collisions: true,
            },
            EngineKind::Starfield => StepRules {
                force: ForceModel::None,
                boundary: BoundaryMode::Wrap,
                collisions: false,
            },
        }
    }

    pub fn spawn_profile(&self) -> SpawnProfile {
        match self {
            EngineKind::Network => SpawnProfile::Network,
            EngineKind::Sandbox => SpawnProfile::Sandbox,
            EngineKind::Starfield => SpawnProfile::Star,
        }
    }

    /// Whether the population is topped up to the target every tick
    pub fn reconciles(&self) -> bool {
        matches!(self, EngineKind::Network)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EngineKind::Network => "network",
            EngineKind::Sandbox => "sandbox",
            EngineKind::Starfield => "starfield",
        }
    }
}

/// Host input, applied between ticks
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Replace the parameter snapshot (target count included)
    SetParams(SimParams),
    /// Desired population size, clamped at zero
    SetTargetCount(i64),
    /// Pointer moved (`None` when it left the panel)
    SetPointer(Option<Vec2>),
    /// Add one body at a viewport point
    Spawn { pos: Vec2, shape: Shape },
    /// Remove every body
    Clear,
    /// Clear and refill to the target count
    Reset,
    /// Host viewport changed
    Resize(Viewport),
}

/// Simulation state for one panel
pub struct Engine {
    kind: EngineKind,
    rules: StepRules,
    population: Population,
    params: SimParams,
    viewport: Viewport,
    pending: Vec<Command>,
    broad_phase: Box<dyn BroadPhase>,
    links: Vec<Link>,
    ticks: u64,
    last_stats: StepStats,
}

impl Engine {
    /// Build an engine and its initial population
    pub fn new(kind: EngineKind, viewport: Viewport, params: SimParams, seed: u64) -> Self {
        let params = params.sanitized();
        let mut engine = Self {
            kind,
            rules: kind.rules(),
            population: Population::new(kind.spawn_profile(), seed),
            params,
            viewport,
            pending: Vec::new(),
            broad_phase: Box::new(AllPairs),
            links: Vec::new(),
            ticks: 0,
            last_stats: StepStats::default(),
        };

        match kind {
            EngineKind::Network => {
                engine.population.set_target_count(params.target_count);
                engine.population.reconcile(&viewport, &params);
            }
            EngineKind::Starfield => {
                engine.population.set_target_count(STAR_COUNT);
                engine.population.reconcile(&viewport, &params);
            }
            EngineKind::Sandbox => {
                engine
                    .population
                    .seed_upper_half(&viewport, SANDBOX_SEED_BODIES, Shape::Circle, &params);
            }
        }
        engine.refresh_links();

        log::info!(
            "Created {} engine: {} bodies in {}x{}",
            kind.as_str(),
            engine.population.len(),
            viewport.width,
            viewport.height
        );
        engine
    }

    /// Swap the candidate-pair strategy used by the collision resolver
    pub fn with_broad_phase(mut self, broad_phase: Box<dyn BroadPhase>) -> Self {
        self.broad_phase = broad_phase;
        self
    }

    pub fn kind(&self) -> EngineKind {
        self.kind
    }

    pub fn bodies(&self) -> &[Body] {
        self.population.bodies()
    }

    pub fn population(&self) -> &Population {
        &self.population
    }

    pub fn params(&self) -> &SimParams {
        &self.params
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Pairs under the link distance as of the last tick (network only)
    pub fn links(&self) -> &[Link] {
        &self.links
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn last_stats(&self) -> StepStats {
        self.last_stats
    }

    /// Commands waiting for the next tick
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Queue a command for the start of the next tick
    pub fn push(&mut self, command: Command) {
        self.pending.push(command);
    }

    pub fn set_params(&mut self, params: SimParams) {
        self.push(Command::SetParams(params));
    }

    pub fn set_target_count(&mut self, n: i64) {
        self.push(Command::SetTargetCount(n));
    }

    pub fn set_pointer(&mut self, pointer: Option<Vec2>) {
        self.push(Command::SetPointer(pointer));
    }

    pub fn spawn(&mut self, pos: Vec2, shape: Shape) {
        self.push(Command::Spawn { pos, shape });
    }

    pub fn clear(&mut self) {
        self.push(Command::Clear);
    }

    pub fn reset(&mut self) {
        self.push(Command::Reset);
    }

    pub fn resize(&mut self, viewport: Viewport) {
        self.push(Command::Resize(viewport));
    }

    /// Apply every buffered command in arrival order
    fn apply_pending(&mut self) {
        for command in std::mem::take(&mut self.pending) {
            self.apply(command);
        }
    }

    fn apply(&mut self, command: Command) {
        match command {
            Command::SetParams(params) => {
                // The pointer is owned by SetPointer; keep it across parameter polls
                let pointer = self.params.pointer;
                self.params = SimParams { pointer, ..params }.sanitized();
                if self.kind.reconciles() {
                    self.population.set_target_count(self.params.target_count);
                }
            }
            Command::SetTargetCount(n) => {
                let n = SimParams::count_from_raw(n as f64);
                self.params.target_count = n;
                if self.kind.reconciles() {
                    self.population.set_target_count(n);
                }
            }
            Command::SetPointer(pointer) => {
                self.params.pointer = pointer.filter(|p| p.is_finite());
            }
            Command::Spawn { pos, shape } => {
                if !pos.is_finite() {
                    log::debug!("Ignoring spawn at non-finite point {:?}", pos);
                    return;
                }
                self.population.spawn(pos, shape, &self.params);
            }
            Command::Clear => self.population.clear(),
            Command::Reset => {
                self.population.reset(&self.viewport, &self.params);
            }
            Command::Resize(viewport) => {
                self.viewport = viewport;
                self.population.resize(&viewport);
            }
        }
    }

    /// Advance one tick: apply input, reconcile, step, refresh links
    pub fn tick(&mut self) -> StepStats {
        self.apply_pending();

        if self.kind.reconciles() {
            self.population.reconcile(&self.viewport, &self.params);
        }

        let ctx = FrameContext {
            viewport: self.viewport,
            params: self.params,
        };
        let stats = tick(
            self.population.bodies_mut(),
            &self.rules,
            &ctx,
            self.broad_phase.as_mut(),
        );

        self.refresh_links();
        self.ticks += 1;
        self.last_stats = stats;
        log::trace!("{} tick {}: {:?}", self.kind.as_str(), self.ticks, stats);
        stats
    }

    fn refresh_links(&mut self) {
        if self.kind == EngineKind::Network {
            self.links = proximity_links(self.population.bodies(), self.params.link_distance);
        } else {
            self.links.clear();
        }
    }
}
