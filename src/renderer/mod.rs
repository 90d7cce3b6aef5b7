//! Renderer seam
//!
//! The simulation hands each finished frame to a [`Renderer`]. The browser
//! build draws through Canvas 2D; the native build only logs.

#[cfg(target_arch = "wasm32")]
pub mod canvas;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasRenderer;

use crate::sim::{Body, EngineKind, Link, Viewport};

/// Everything a renderer may read for one frame
#[derive(Debug, Clone, Copy)]
pub struct FrameView<'a> {
    pub kind: EngineKind,
    pub viewport: Viewport,
    pub bodies: &'a [Body],
    /// Proximity pairs (network engine only)
    pub links: &'a [Link],
    /// Link distance the links were computed with
    pub link_distance: f32,
    /// Seconds since the driver started, for cosmetic animation
    pub time: f64,
}

impl FrameView<'_> {
    /// Twinkle brightness for a star, `0.3 + 0.7 * (0.5 + 0.5 * sin(t + x))`
    pub fn star_alpha(&self, body: &Body) -> f32 {
        let phase = self.time as f32 + body.pos.x;
        0.3 + 0.7 * (0.5 + 0.5 * phase.sin())
    }
}

/// Draws a frame. Implementations must not mutate simulation state.
pub trait Renderer {
    fn draw(&mut self, frame: &FrameView<'_>);

    /// Release any held resources; called once when the driver stops
    fn release(&mut self) {}
}

/// Renderer that draws nothing (headless runs and tests)
#[derive(Debug, Default)]
pub struct NullRenderer {
    pub frames: u64,
    pub last_body_count: usize,
    pub released: bool,
}

impl Renderer for NullRenderer {
    fn draw(&mut self, frame: &FrameView<'_>) {
        self.frames += 1;
        self.last_body_count = frame.bodies.len();
    }

    fn release(&mut self) {
        self.released = true;
    }
}
