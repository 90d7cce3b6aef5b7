//! Beyond Sim entry point
//!
//! In the browser this wires the starfield, particle network and physics
//! sandbox canvases to their engines and runs the frame loop. Natively it runs
//! a short headless session and prints a summary.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, HtmlInputElement, HtmlSelectElement, MouseEvent, TouchEvent};

    use beyond_sim::renderer::CanvasRenderer;
    use beyond_sim::sim::{Engine, EngineKind, Viewport};
    use beyond_sim::{FrameDriver, Settings, ShapeChoice, pointer_from_coords};

    /// One canvas and the engine behind it
    struct Panel {
        driver: FrameDriver<CanvasRenderer>,
        last_time: f64,
    }

    impl Panel {
        fn canvas(&self) -> &HtmlCanvasElement {
            self.driver.renderer().canvas()
        }

        /// Run the ticks this display frame covers
        fn frame(&mut self, time: f64) {
            let dt = if self.last_time > 0.0 {
                ((time - self.last_time) / 1000.0) as f32
            } else {
                beyond_sim::consts::SIM_DT
            };
            self.last_time = time;
            self.driver.advance(dt);
        }
    }

    type Shared = Rc<RefCell<Panel>>;

    /// Match the canvas backing store to its layout size
    fn fit_canvas(canvas: &HtmlCanvasElement) -> Viewport {
        let w = canvas.offset_width().max(0) as u32;
        let h = match canvas.offset_height() {
            0 => 500,
            h => h.max(0) as u32,
        };
        canvas.set_width(w);
        canvas.set_height(h);
        Viewport::new(w as f32, h as f32)
    }

    /// Client coordinates to canvas pixels
    fn canvas_point(canvas: &HtmlCanvasElement, client_x: f64, client_y: f64) -> Option<glam::Vec2> {
        let rect = canvas.get_bounding_client_rect();
        if rect.width() <= 0.0 || rect.height() <= 0.0 {
            return None;
        }
        let x = (client_x - rect.left()) * (canvas.width() as f64 / rect.width());
        let y = (client_y - rect.top()) * (canvas.height() as f64 / rect.height());
        pointer_from_coords(x as f32, y as f32)
    }

    fn input_number(document: &Document, id: &str) -> Option<f64> {
        let input: HtmlInputElement = document.get_element_by_id(id)?.dyn_into().ok()?;
        Some(input.value_as_number()).filter(|v| v.is_finite())
    }

    /// Read the current slider values over the stored defaults
    fn read_settings(document: &Document, base: &Settings) -> Settings {
        let mut settings = base.clone();
        if let Some(v) = input_number(document, "particle-count") {
            settings.particle_count = v;
        }
        if let Some(v) = input_number(document, "particle-speed") {
            settings.particle_speed = v as f32;
        }
        if let Some(v) = input_number(document, "particle-dist") {
            settings.link_distance = v as f32;
        }
        if let Some(v) = input_number(document, "gravity-ctrl") {
            settings.gravity = v as f32;
        }
        if let Some(v) = input_number(document, "bounce-ctrl") {
            settings.bounce = v as f32;
        }
        if let Some(choice) = document
            .get_element_by_id("shape-select")
            .and_then(|el| el.dyn_into::<HtmlSelectElement>().ok())
            .and_then(|select| select.value().parse::<ShapeChoice>().ok())
        {
            settings.shape = choice;
        }
        settings
    }

    fn make_panel(
        document: &Document,
        canvas_id: &str,
        kind: EngineKind,
        settings: &Settings,
        seed: u64,
    ) -> Option<Shared> {
        let canvas: HtmlCanvasElement = match document
            .get_element_by_id(canvas_id)
            .and_then(|el| el.dyn_into().ok())
        {
            Some(canvas) => canvas,
            None => {
                log::error!("No #{canvas_id} canvas, {} panel disabled", kind.as_str());
                return None;
            }
        };
        let viewport = fit_canvas(&canvas);
        let Some(renderer) = CanvasRenderer::new(canvas) else {
            log::error!("#{canvas_id} has no 2D context, {} panel disabled", kind.as_str());
            return None;
        };

        let params = match kind {
            EngineKind::Network => settings.network_params(),
            EngineKind::Sandbox => settings.sandbox_params(),
            EngineKind::Starfield => settings.starfield_params(),
        };
        let engine = Engine::new(kind, viewport, params, seed);
        Some(Rc::new(RefCell::new(Panel {
            driver: FrameDriver::new(engine, renderer),
            last_time: 0.0,
        })))
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            return;
        }

        log::info!("Beyond Sim starting...");

        let Some(window) = web_sys::window() else {
            log::error!("No window");
            return;
        };
        let Some(document) = window.document() else {
            log::error!("No document");
            return;
        };

        let settings = read_settings(&document, &Settings::load());
        let seed = settings.seed.unwrap_or(js_sys::Date::now() as u64);
        log::info!("Spawn seed: {}", seed);

        let panels: Vec<Shared> = [
            ("hero-canvas", EngineKind::Starfield),
            ("particle-canvas", EngineKind::Network),
            ("physics-canvas", EngineKind::Sandbox),
        ]
        .iter()
        .enumerate()
        .filter_map(|(i, &(id, kind))| make_panel(&document, id, kind, &settings, seed.wrapping_add(i as u64)))
        .collect();

        let settings = Rc::new(RefCell::new(settings));
        for panel in &panels {
            let kind = panel.borrow().driver.engine().kind();
            match kind {
                EngineKind::Network => setup_network_input(&document, panel.clone()),
                EngineKind::Sandbox => setup_sandbox_input(&document, panel.clone(), settings.clone()),
                EngineKind::Starfield => {}
            }
        }

        setup_resize(panels.clone());
        setup_visibility(&document, panels.clone());

        request_animation_frame(Rc::new(panels), settings);
        log::info!("Beyond Sim running!");
    }

    fn setup_network_input(document: &Document, panel: Shared) {
        let canvas = panel.borrow().canvas().clone();

        // Mouse move
        {
            let panel = panel.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let pointer = canvas_point(&canvas_clone, event.client_x() as f64, event.client_y() as f64);
                panel.borrow_mut().driver.engine_mut().set_pointer(pointer);
            });
            let _ = canvas.add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse leave
        {
            let panel = panel.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                panel.borrow_mut().driver.engine_mut().set_pointer(None);
            });
            let _ = canvas.add_event_listener_with_callback("mouseleave", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch move
        {
            let panel = panel.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let pointer = canvas_point(&canvas_clone, touch.client_x() as f64, touch.client_y() as f64);
                    panel.borrow_mut().driver.engine_mut().set_pointer(pointer);
                }
            });
            let _ = canvas.add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Reset button
        if let Some(btn) = document.get_element_by_id("particle-reset") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                panel.borrow_mut().driver.engine_mut().reset();
                log::info!("Particle network reset");
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_sandbox_input(document: &Document, panel: Shared, settings: Rc<RefCell<Settings>>) {
        let canvas = panel.borrow().canvas().clone();

        // Click spawns a body
        {
            let panel = panel.clone();
            let canvas_clone = canvas.clone();
            let settings = settings.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                if let Some(pos) = canvas_point(&canvas_clone, event.client_x() as f64, event.client_y() as f64) {
                    let shape = settings.borrow().shape.shape();
                    panel.borrow_mut().driver.engine_mut().spawn(pos, shape);
                }
            });
            let _ = canvas.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Tap spawns a body
        {
            let panel = panel.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    if let Some(pos) = canvas_point(&canvas_clone, touch.client_x() as f64, touch.client_y() as f64) {
                        let shape = settings.borrow().shape.shape();
                        panel.borrow_mut().driver.engine_mut().spawn(pos, shape);
                    }
                }
            });
            let _ = canvas.add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Clear button
        if let Some(btn) = document.get_element_by_id("phys-clear") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                panel.borrow_mut().driver.engine_mut().clear();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize(panels: Vec<Shared>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            for panel in &panels {
                let mut p = panel.borrow_mut();
                let viewport = fit_canvas(p.canvas());
                p.driver.engine_mut().resize(viewport);
            }
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_visibility(document: &Document, panels: Vec<Shared>) {
        let document_clone = document.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let hidden = document_clone.visibility_state() == web_sys::VisibilityState::Hidden;
            for panel in &panels {
                let mut p = panel.borrow_mut();
                if hidden {
                    p.driver.pause();
                } else {
                    p.driver.resume();
                    p.last_time = 0.0;
                }
            }
        });
        let _ = document.add_event_listener_with_callback("visibilitychange", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(panels: Rc<Vec<Shared>>, settings: Rc<RefCell<Settings>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            frame_loop(panels, settings, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn frame_loop(panels: Rc<Vec<Shared>>, settings: Rc<RefCell<Settings>>, time: f64) {
        if let Some(document) = web_sys::window().and_then(|w| w.document()) {
            // Sliders are polled every frame; the engine applies them before its next tick
            let current = read_settings(&document, &settings.borrow());
            if current != *settings.borrow() {
                current.save();
                *settings.borrow_mut() = current.clone();
            }
            for panel in panels.iter() {
                let mut p = panel.borrow_mut();
                let kind = p.driver.engine().kind();
                match kind {
                    EngineKind::Network => p.driver.engine_mut().set_params(current.network_params()),
                    EngineKind::Sandbox => p.driver.engine_mut().set_params(current.sandbox_params()),
                    EngineKind::Starfield => {}
                }
                p.frame(time);
            }
        }

        if panels.iter().any(|p| p.borrow().driver.state() != beyond_sim::driver::DriverState::Stopped) {
            request_animation_frame(panels, settings);
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_app::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Entry point is wasm_main
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use beyond_sim::renderer::NullRenderer;
    use beyond_sim::sim::{Engine, EngineKind, Shape, Viewport};
    use beyond_sim::{FrameDriver, Settings, consts::SIM_DT};
    use glam::Vec2;

    env_logger::init();
    log::info!("Beyond Sim (native) starting...");
    log::info!("Native mode runs headless - serve the wasm build for the panels");

    let settings = Settings::load();
    let seed = settings.seed.unwrap_or(0x5eed);
    let viewport = Viewport::new(960.0, 500.0);

    let mut drivers = vec![
        FrameDriver::new(
            Engine::new(EngineKind::Starfield, viewport, settings.starfield_params(), seed),
            NullRenderer::default(),
        ),
        FrameDriver::new(
            Engine::new(EngineKind::Network, viewport, settings.network_params(), seed.wrapping_add(1)),
            NullRenderer::default(),
        ),
        FrameDriver::new(
            Engine::new(EngineKind::Sandbox, viewport, settings.sandbox_params(), seed.wrapping_add(2)),
            NullRenderer::default(),
        ),
    ];

    // Ten seconds of display frames, with a pointer sweep and a few clicks
    for frame in 0..600u32 {
        let t = frame as f32 / 600.0;
        for driver in drivers.iter_mut() {
            let engine = driver.engine_mut();
            match engine.kind() {
                EngineKind::Network => engine.set_pointer(Some(Vec2::new(t * viewport.width, viewport.height * 0.5))),
                EngineKind::Sandbox if frame % 60 == 0 => {
                    engine.spawn(Vec2::new(viewport.width * t, 80.0), Shape::Triangle);
                }
                _ => {}
            }
            driver.advance(SIM_DT);
        }
    }

    for driver in drivers.iter_mut() {
        let engine = driver.engine();
        let summary = serde_json::json!({
            "engine": engine.kind().as_str(),
            "ticks": engine.ticks(),
            "bodies": engine.bodies().len(),
            "links": engine.links().len(),
            "wall_hits": engine.last_stats().wall_hits,
            "contacts": engine.last_stats().collisions.contacts,
        });
        println!("{summary}");
        driver.stop();
    }
}
