//! Canvas 2D backend

use std::f64::consts::TAU;

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::scene::{Color, Shape};
use crate::error::GameError;

fn css(color: &Color) -> String {
    format!(
        "rgba({}, {}, {}, {:.3})",
        (color[0] * 255.0) as u8,
        (color[1] * 255.0) as u8,
        (color[2] * 255.0) as u8,
        color[3].clamp(0.0, 1.0)
    )
}

pub struct CanvasRenderer {
    ctx: CanvasRenderingContext2d,
    pub size: (u32, u32),
    /// Device pixels per simulation unit
    scale: f64,
}

impl CanvasRenderer {
    pub fn new(canvas: &HtmlCanvasElement, scale: f64) -> Result<Self, GameError> {
        let ctx = canvas
            .get_context("2d")
            .map_err(|_| GameError::Browser("getContext('2d') threw".into()))?
            .ok_or_else(|| GameError::Browser("2D context unavailable".into()))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| GameError::Browser("not a 2D context".into()))?;
        Ok(Self {
            ctx,
            size: (canvas.width(), canvas.height()),
            scale,
        })
    }

    pub fn resize(&mut self, width: u32, height: u32, scale: f64) {
        if width > 0 && height > 0 {
            self.size = (width, height);
            self.scale = scale;
        }
    }

    /// Clear and paint one frame
    pub fn render(&self, shapes: &[Shape], shake: f32, time_ms: f64) {
        let ctx = &self.ctx;
        let (w, h) = (self.size.0 as f64, self.size.1 as f64);

        ctx.set_global_alpha(1.0);
        ctx.set_fill_style_str("#05010f");
        ctx.fill_rect(0.0, 0.0, w, h);

        ctx.save();
        if shake > 0.0 {
            let s = shake as f64;
            let _ = ctx.translate((time_ms * 0.07).sin() * s, (time_ms * 0.09).cos() * s);
        }
        let _ = ctx.scale(self.scale, self.scale);

        for shape in shapes {
            self.draw(shape);
        }

        ctx.restore();
    }

    fn draw(&self, shape: &Shape) {
        let ctx = &self.ctx;
        match shape {
            Shape::Rect {
                center,
                size,
                rotation,
                color,
            } => {
                ctx.save();
                let _ = ctx.translate(center.x as f64, center.y as f64);
                if *rotation != 0.0 {
                    let _ = ctx.rotate(*rotation as f64);
                }
                ctx.set_fill_style_str(&css(color));
                ctx.fill_rect(
                    -size.x as f64 / 2.0,
                    -size.y as f64 / 2.0,
                    size.x as f64,
                    size.y as f64,
                );
                ctx.restore();
            }
            Shape::Circle {
                center,
                radius,
                color,
            } => {
                ctx.begin_path();
                let _ = ctx.arc(center.x as f64, center.y as f64, *radius as f64, 0.0, TAU);
                ctx.set_fill_style_str(&css(color));
                ctx.fill();
            }
            Shape::Ring {
                center,
                radius,
                width,
                color,
            } => {
                ctx.begin_path();
                let _ = ctx.arc(center.x as f64, center.y as f64, *radius as f64, 0.0, TAU);
                ctx.set_line_width(*width as f64);
                ctx.set_stroke_style_str(&css(color));
                ctx.stroke();
            }
        }
    }
}
