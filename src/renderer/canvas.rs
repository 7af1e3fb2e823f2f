//! Browser canvas surface
//!
//! Thin mapping of [`Surface`] onto a `CanvasRenderingContext2d`. Glyphs are
//! emoji text, so the look depends on the platform emoji font.

use std::f64::consts::TAU;

use glam::Vec2;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::{Color, Glow, Glyph, Surface};
use crate::error::EngineError;

/// `Surface` over a 2D canvas context
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn from_canvas(canvas: HtmlCanvasElement) -> Result<Self, EngineError> {
        let ctx = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .and_then(|obj| obj.dyn_into::<CanvasRenderingContext2d>().ok())
            .ok_or(EngineError::NoRenderingContext)?;
        if canvas.width() == 0 || canvas.height() == 0 {
            return Err(EngineError::InvalidSurface {
                width: canvas.width(),
                height: canvas.height(),
            });
        }
        Ok(Self { canvas, ctx })
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    fn set_glow(&self, glow: Option<Glow>) {
        match glow {
            Some(glow) => {
                self.ctx.set_shadow_color(&glow.color.to_css());
                self.ctx.set_shadow_blur(f64::from(glow.blur));
            }
            None => self.ctx.set_shadow_blur(0.0),
        }
    }
}

impl Surface for CanvasSurface {
    fn size(&self) -> Vec2 {
        Vec2::new(self.canvas.width() as f32, self.canvas.height() as f32)
    }

    fn clear(&mut self, color: Color) {
        let size = self.size();
        let (w, h) = (f64::from(size.x), f64::from(size.y));
        self.ctx.clear_rect(0.0, 0.0, w, h);
        self.ctx.set_fill_style_str(&color.to_css());
        self.ctx.fill_rect(0.0, 0.0, w, h);
    }

    fn fill_rect(&mut self, origin: Vec2, size: Vec2, color: Color) {
        self.ctx.set_fill_style_str(&color.to_css());
        self.ctx.fill_rect(
            f64::from(origin.x),
            f64::from(origin.y),
            f64::from(size.x),
            f64::from(size.y),
        );
    }

    fn dashed_line(
        &mut self,
        from: Vec2,
        to: Vec2,
        width: f32,
        dash: [f32; 2],
        dash_offset: f32,
        color: Color,
    ) {
        let pattern = js_sys::Array::of2(
            &JsValue::from_f64(f64::from(dash[0])),
            &JsValue::from_f64(f64::from(dash[1])),
        );
        self.ctx.save();
        self.ctx.set_stroke_style_str(&color.to_css());
        self.ctx.set_line_width(f64::from(width));
        self.ctx.set_line_dash(&pattern).ok();
        self.ctx.set_line_dash_offset(f64::from(dash_offset));
        self.ctx.begin_path();
        self.ctx.move_to(f64::from(from.x), f64::from(from.y));
        self.ctx.line_to(f64::from(to.x), f64::from(to.y));
        self.ctx.stroke();
        self.ctx.restore();
    }

    fn fill_circle(&mut self, centre: Vec2, radius: f32, color: Color) {
        self.ctx.set_fill_style_str(&color.to_css());
        self.ctx.begin_path();
        if self
            .ctx
            .arc(f64::from(centre.x), f64::from(centre.y), f64::from(radius.max(0.0)), 0.0, TAU)
            .is_ok()
        {
            self.ctx.fill();
        }
    }

    fn stroke_circle(
        &mut self,
        centre: Vec2,
        radius: f32,
        width: f32,
        color: Color,
        glow: Option<Glow>,
    ) {
        self.ctx.save();
        self.set_glow(glow);
        self.ctx.set_stroke_style_str(&color.to_css());
        self.ctx.set_line_width(f64::from(width));
        self.ctx.begin_path();
        if self
            .ctx
            .arc(f64::from(centre.x), f64::from(centre.y), f64::from(radius.max(0.0)), 0.0, TAU)
            .is_ok()
        {
            self.ctx.stroke();
        }
        self.ctx.restore();
    }

    fn draw_glyph(&mut self, glyph: Glyph, centre: Vec2, glow: Option<Glow>) {
        self.ctx.save();
        self.set_glow(glow);
        // Emoji keep their own colours but inherit the fill alpha
        self.ctx.set_fill_style_str("#ffffff");
        self.ctx.set_font(&format!("{}px serif", glyph.size()));
        self.ctx.set_text_align("center");
        self.ctx.set_text_baseline("middle");
        self.ctx
            .fill_text(glyph.emoji(), f64::from(centre.x), f64::from(centre.y))
            .ok();
        self.ctx.restore();
    }
}
