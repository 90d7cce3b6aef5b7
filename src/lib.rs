//! Beyond Sim - real-time 2D simulation core for the showcase panels
//!
//! Core modules:
//! - `sim`: Simulation core (bodies, forces, boundaries, collisions, population)
//! - `driver`: Fixed timestep frame driver
//! - `renderer`: Renderer seam (and the browser Canvas 2D renderer)
//! - `settings`: Panel sliders and their conversion to simulation parameters

pub mod driver;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use driver::FrameDriver;
pub use renderer::{FrameView, Renderer};
pub use settings::{Settings, ShapeChoice};
pub use sim::{Body, Engine, EngineKind, SimParams, Viewport};

use glam::Vec2;

/// Simulation configuration constants
pub mod consts {
    /// Fixed simulation timestep. Body velocities are in pixels per tick.
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;
    /// Longest wall-clock gap a single display frame may account for (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Pointer position meaning "no active pointer"
    pub const POINTER_SENTINEL: f32 = -9999.0;

    /// Squared distance under which the pointer repels network bodies (px²)
    pub const REPULSION_THRESHOLD_SQ: f32 = 8000.0;
    /// Base repulsion force constant
    pub const REPULSION_FORCE: f32 = 0.2;
    /// Tunable repulsion intensity
    pub const REPULSION_INTENSITY: f32 = 1.5;
    /// Speed governance floor, as a multiple of base speed
    pub const SPEED_FLOOR: f32 = 0.5;
    /// Speed governance ceiling, as a multiple of base speed
    pub const SPEED_CEILING: f32 = 2.0;

    /// Horizontal velocity damping on floor contact
    pub const FLOOR_FRICTION: f32 = 0.98;
    /// Angular velocity damping on floor contact
    pub const FLOOR_SPIN_DAMPING: f32 = 0.97;

    /// Pairs closer than this are treated as coincident and skipped
    pub const MIN_CONTACT_DIST: f32 = 0.1;

    /// Link opacity at zero distance
    pub const LINK_MAX_ALPHA: f32 = 0.6;

    /// Upper bound on the network population, whatever the host asks for
    pub const MAX_TARGET_COUNT: usize = 1000;

    /// Fixed starfield population
    pub const STAR_COUNT: usize = 160;
    /// Bodies seeded into the sandbox on construction
    pub const SANDBOX_SEED_BODIES: usize = 6;
    /// Inset from the sandbox walls for seeded bodies
    pub const SANDBOX_SEED_MARGIN: f32 = 60.0;
}

/// Build a pointer position from raw host coordinates.
///
/// Non-finite coordinates and the off-screen sentinel both mean "no pointer".
pub fn pointer_from_coords(x: f32, y: f32) -> Option<Vec2> {
    if !x.is_finite() || !y.is_finite() {
        log::debug!("Ignoring non-finite pointer ({x}, {y})");
        return None;
    }
    if x <= consts::POINTER_SENTINEL || y <= consts::POINTER_SENTINEL {
        return None;
    }
    Some(Vec2::new(x, y))
}

/// Wrap a coordinate into `[0, extent)`
#[inline]
pub fn wrap_coord(v: f32, extent: f32) -> f32 {
    if extent <= 0.0 {
        return 0.0;
    }
    let wrapped = v.rem_euclid(extent);
    // rem_euclid can round up to `extent` for tiny negative inputs
    if wrapped >= extent { 0.0 } else { wrapped }
}

/// Replace a non-finite value with a fallback
#[inline]
pub fn finite_or(v: f32, fallback: f32) -> f32 {
    if v.is_finite() { v } else { fallback }
}
