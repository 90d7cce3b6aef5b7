//! Frame driver
//!
//! Called once per display refresh by the host. Runs as many fixed ticks as
//! the elapsed wall-clock time covers, then hands the result to the renderer.
//! Scheduling itself belongs to the host (requestAnimationFrame, a timer, a
//! test loop); the driver only decides what one invocation does.

use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};
use crate::renderer::{FrameView, Renderer};
use crate::sim::Engine;

/// Driver lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    Running,
    /// Host hid the panel; ticks are skipped until resumed
    Paused,
    /// Torn down; no further frames
    Stopped,
}

/// Owns an engine and the renderer it feeds
pub struct FrameDriver<R: Renderer> {
    engine: Engine,
    renderer: R,
    accumulator: f32,
    time: f64,
    state: DriverState,
    frames: u64,
}

impl<R: Renderer> FrameDriver<R> {
    pub fn new(engine: Engine, renderer: R) -> Self {
        Self {
            engine,
            renderer,
            accumulator: 0.0,
            time: 0.0,
            state: DriverState::Running,
            frames: 0,
        }
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Host input goes through here; commands are buffered until the next tick
    pub fn engine_mut(&mut self) -> &mut Engine {
        &mut self.engine
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == DriverState::Running
    }

    /// Display frames drawn so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Run fixed ticks for `elapsed` seconds of wall-clock time and draw.
    ///
    /// Returns the number of ticks run. Long gaps are capped so a stalled tab
    /// does not fast-forward the simulation.
    pub fn advance(&mut self, elapsed: f32) -> u32 {
        if self.state != DriverState::Running {
            return 0;
        }

        let dt = if elapsed.is_finite() {
            elapsed.clamp(0.0, MAX_FRAME_DT)
        } else {
            0.0
        };
        self.accumulator += dt;
        self.time += dt as f64;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.engine.tick();
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        if substeps == MAX_SUBSTEPS && self.accumulator >= SIM_DT {
            log::trace!("Dropping {:.3}s of simulation backlog", self.accumulator);
            self.accumulator = 0.0;
        }

        self.draw();
        substeps
    }

    /// Run exactly one tick and draw, ignoring wall-clock time
    pub fn step(&mut self) {
        if self.state != DriverState::Running {
            return;
        }
        self.engine.tick();
        self.time += SIM_DT as f64;
        self.draw();
    }

    fn draw(&mut self) {
        let view = FrameView {
            kind: self.engine.kind(),
            viewport: self.engine.viewport(),
            bodies: self.engine.bodies(),
            links: self.engine.links(),
            link_distance: self.engine.params().link_distance,
            time: self.time,
        };
        self.renderer.draw(&view);
        self.frames += 1;
    }

    /// Stop ticking until resumed (e.g. tab hidden)
    pub fn pause(&mut self) {
        if self.state == DriverState::Running {
            self.state = DriverState::Paused;
            log::info!("{} driver paused", self.engine.kind().as_str());
        }
    }

    /// Continue after a pause; time spent paused is not simulated
    pub fn resume(&mut self) {
        if self.state == DriverState::Paused {
            self.state = DriverState::Running;
            self.accumulator = 0.0;
            log::info!("{} driver resumed", self.engine.kind().as_str());
        }
    }

    /// Tear down: no further frames, renderer resources released
    pub fn stop(&mut self) {
        if self.state != DriverState::Stopped {
            self.state = DriverState::Stopped;
            self.renderer.release();
            log::info!(
                "{} driver stopped after {} frames",
                self.engine.kind().as_str(),
                self.frames
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::NullRenderer;
    use crate::sim::{EngineKind, SimParams, Viewport};

    fn driver(kind: EngineKind) -> FrameDriver<NullRenderer> {
        let engine = Engine::new(kind, Viewport::new(640.0, 480.0), SimParams::default(), 42);
        FrameDriver::new(engine, NullRenderer::default())
    }

    #[test]
    fn test_fixed_ticks_per_frame() {
        let mut driver = driver(EngineKind::Network);
        assert_eq!(driver.advance(SIM_DT * 0.5), 0);
        assert_eq!(driver.advance(SIM_DT * 0.75), 1);
        assert_eq!(driver.advance(SIM_DT * 2.5), 2);
        assert_eq!(driver.engine().ticks(), 3);
        assert_eq!(driver.renderer().frames, 3);
        assert_eq!(driver.renderer().last_body_count, 80);
    }

    #[test]
    fn test_substeps_capped() {
        let mut driver = driver(EngineKind::Sandbox);
        assert_eq!(driver.advance(10.0), MAX_SUBSTEPS);
        // Backlog dropped: a tiny frame runs nothing
        assert_eq!(driver.advance(SIM_DT * 0.1), 0);
    }

    #[test]
    fn test_non_finite_elapsed() {
        let mut driver = driver(EngineKind::Starfield);
        assert_eq!(driver.advance(f32::NAN), 0);
        assert_eq!(driver.advance(-1.0), 0);
        assert_eq!(driver.engine().ticks(), 0);
    }

    #[test]
    fn test_pause_resume() {
        let mut driver = driver(EngineKind::Network);
        driver.pause();
        assert_eq!(driver.advance(SIM_DT * 3.5), 0);
        assert_eq!(driver.renderer().frames, 0);
        driver.resume();
        assert!(driver.is_running());
        assert_eq!(driver.advance(SIM_DT * 1.5), 1);
    }

    #[test]
    fn test_stop_releases_and_halts() {
        let mut driver = driver(EngineKind::Sandbox);
        driver.step();
        driver.stop();
        assert!(driver.renderer().released);
        assert_eq!(driver.state(), DriverState::Stopped);

        driver.step();
        driver.resume();
        assert_eq!(driver.advance(1.0), 0);
        assert_eq!(driver.engine().ticks(), 1);
    }

    #[test]
    fn test_input_buffered_between_frames() {
        let mut driver = driver(EngineKind::Network);
        driver.engine_mut().set_target_count(10);
        assert_eq!(driver.engine().bodies().len(), 80);
        driver.step();
        assert_eq!(driver.engine().bodies().len(), 10);
        assert_eq!(driver.renderer().last_body_count, 10);
    }
}
