//! Canvas 2D renderer for the browser panels

use std::f64::consts::TAU;

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::{FrameView, Renderer};
use crate::sim::{Body, EngineKind, Shape, Tint};

/// Draws one panel onto its own canvas
pub struct CanvasRenderer {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasRenderer {
    /// Returns `None` when the canvas has no 2D context
    pub fn new(canvas: HtmlCanvasElement) -> Option<Self> {
        let ctx = canvas
            .get_context("2d")
            .ok()
            .flatten()?
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()?;
        Some(Self { canvas, ctx })
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    fn draw_stars(&self, frame: &FrameView<'_>) {
        let (w, h) = (frame.viewport.width as f64, frame.viewport.height as f64);
        self.ctx.clear_rect(0.0, 0.0, w, h);
        for body in frame.bodies {
            let alpha = frame.star_alpha(body);
            self.ctx.begin_path();
            let _ = self.ctx.arc(body.pos.x as f64, body.pos.y as f64, body.radius as f64, 0.0, TAU);
            self.ctx.set_fill_style_str(&format!("rgba(200,180,255,{alpha})"));
            self.ctx.fill();
        }
    }

    fn draw_network(&self, frame: &FrameView<'_>) {
        let (w, h) = (frame.viewport.width as f64, frame.viewport.height as f64);
        self.ctx.clear_rect(0.0, 0.0, w, h);

        for body in frame.bodies {
            let hue = match body.tint {
                Tint::Hue(h) => h,
                _ => 220,
            };
            self.ctx.begin_path();
            let _ = self.ctx.arc(body.pos.x as f64, body.pos.y as f64, body.radius as f64, 0.0, TAU);
            self.ctx.set_fill_style_str(&format!("hsl({hue},80%,65%)"));
            self.ctx.fill();
        }

        self.ctx.set_line_width(1.0);
        for link in frame.links {
            let (Some(a), Some(b)) = (frame.bodies.get(link.a), frame.bodies.get(link.b)) else {
                continue;
            };
            let alpha = link.alpha(frame.link_distance);
            self.ctx.begin_path();
            self.ctx.move_to(a.pos.x as f64, a.pos.y as f64);
            self.ctx.line_to(b.pos.x as f64, b.pos.y as f64);
            self.ctx.set_stroke_style_str(&format!("rgba(120,160,255,{alpha})"));
            self.ctx.stroke();
        }
    }

    fn draw_sandbox(&self, frame: &FrameView<'_>) {
        let (w, h) = (frame.viewport.width as f64, frame.viewport.height as f64);

        // Translucent fill leaves short motion trails
        self.ctx.set_fill_style_str("rgba(10,10,24,0.25)");
        self.ctx.fill_rect(0.0, 0.0, w, h);

        self.ctx.set_stroke_style_str("rgba(50,50,100,0.3)");
        self.ctx.set_line_width(1.0);
        let mut gx = 0.0;
        while gx < w {
            self.ctx.begin_path();
            self.ctx.move_to(gx, 0.0);
            self.ctx.line_to(gx, h);
            self.ctx.stroke();
            gx += 60.0;
        }
        let mut gy = 0.0;
        while gy < h {
            self.ctx.begin_path();
            self.ctx.move_to(0.0, gy);
            self.ctx.line_to(w, gy);
            self.ctx.stroke();
            gy += 60.0;
        }

        for body in frame.bodies {
            self.draw_shape(body);
        }
    }

    fn draw_shape(&self, body: &Body) {
        let color = match body.tint {
            Tint::Rgb(rgb) => format!("#{rgb:06x}"),
            _ => "#7c3aed".to_string(),
        };
        let (x, y, s) = (body.pos.x as f64, body.pos.y as f64, body.radius as f64);

        self.ctx.save();
        let _ = self.ctx.translate(x, y);
        let _ = self.ctx.rotate(body.angle as f64);
        self.ctx.begin_path();
        match body.shape {
            Shape::Circle => {
                let _ = self.ctx.arc(0.0, 0.0, s, 0.0, TAU);
            }
            Shape::Rect => {
                self.ctx.rect(-s, -s * 0.7, s * 2.0, s * 1.4);
            }
            Shape::Triangle => {
                self.ctx.move_to(0.0, -s);
                self.ctx.line_to(s, s);
                self.ctx.line_to(-s, s);
                self.ctx.close_path();
            }
        }
        self.ctx.set_fill_style_str(&color);
        self.ctx.fill();
        self.ctx.set_stroke_style_str("rgba(255,255,255,0.2)");
        self.ctx.set_line_width(1.5);
        self.ctx.stroke();
        self.ctx.restore();
    }
}

impl Renderer for CanvasRenderer {
    fn draw(&mut self, frame: &FrameView<'_>) {
        match frame.kind {
            EngineKind::Starfield => self.draw_stars(frame),
            EngineKind::Network => self.draw_network(frame),
            EngineKind::Sandbox => self.draw_sandbox(frame),
        }
    }

    fn release(&mut self) {
        let (w, h) = (self.canvas.width() as f64, self.canvas.height() as f64);
        self.ctx.clear_rect(0.0, 0.0, w, h);
    }
}
