//! Simulation core
//!
//! Everything that moves bodies lives here. This module must stay pure:
//! - One tick at a time, driven from outside
//! - Seeded RNG only
//! - Stable body order (insertion order)
//! - No rendering or platform dependencies

pub mod body;
pub mod boundary;
pub mod collision;
pub mod engine;
pub mod force;
pub mod params;
pub mod population;
pub mod tick;

pub use body::{Body, Shape, Tint, Viewport};
pub use boundary::{BoundaryMode, WallContacts};
pub use collision::{AllPairs, BroadPhase, CollisionStats, Link, proximity_links, resolve_collisions};
pub use engine::{Command, Engine, EngineKind};
pub use force::{ForceModel, govern_speed, repulsion_impulse};
pub use params::SimParams;
pub use population::{Population, Reconcile, SpawnProfile};
pub use tick::{FrameContext, StepRules, StepStats, step_body, tick};
