//! `CanvasRenderingContext2d` as a drawing [`Surface`].

use std::f64::consts::TAU;

use particle_field_core::{DVec2, Rgba, Surface};
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    /// `None` when the canvas has no 2D context (already claimed by WebGL,
    /// or unsupported).
    pub fn from_canvas(canvas: HtmlCanvasElement) -> Option<Self> {
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
}

impl Surface for CanvasSurface {
    fn resize(&mut self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
    }

    fn clear(&mut self) {
        let (w, h) = (self.canvas.width() as f64, self.canvas.height() as f64);
        self.ctx.clear_rect(0.0, 0.0, w, h);
    }

    fn fill_circle(&mut self, center: DVec2, radius: f64, color: Rgba) {
        self.ctx.begin_path();
        // arc throws on a negative radius
        if self.ctx.arc(center.x, center.y, radius, 0.0, TAU).is_err() {
            return;
        }
        self.ctx.set_fill_style_str(&color.to_css());
        self.ctx.fill();
    }

    fn stroke_line(&mut self, from: DVec2, to: DVec2, width: f64, color: Rgba) {
        self.ctx.set_stroke_style_str(&color.to_css());
        self.ctx.set_line_width(width);
        self.ctx.begin_path();
        self.ctx.move_to(from.x, from.y);
        self.ctx.line_to(to.x, to.y);
        self.ctx.stroke();
    }
}
