// `Canvas` over a 2D rendering context.

use std::rc::Rc;

use log::trace;
use web_sys::CanvasRenderingContext2d;

use super::graphics::TextureStore;
use crate::render::{Canvas, Rect};

pub(crate) struct WebCanvas {
    ctx: CanvasRenderingContext2d,
    textures: Rc<TextureStore>,
    width: f64,
    height: f64,
}

impl WebCanvas {
    pub fn new(ctx: CanvasRenderingContext2d, textures: Rc<TextureStore>, width: f64, height: f64) -> Self {
        ctx.set_text_baseline("top");
        ctx.set_text_align("left");
        Self { ctx, textures, width, height }
    }

    fn measure(&self, text: &str) -> f64 {
        self.ctx.measure_text(text).map(|m| m.width()).unwrap_or(0.0)
    }
}

impl Canvas for WebCanvas {
    fn clear(&mut self, color: &str) {
        self.ctx.set_fill_style_str(color);
        self.ctx.fill_rect(0.0, 0.0, self.width, self.height);
    }

    fn fill_rect(&mut self, rect: Rect, color: &str) {
        self.ctx.set_fill_style_str(color);
        self.ctx.fill_rect(rect.x, rect.y, rect.w, rect.h);
    }

    fn draw_sprite(&mut self, texture: &str, rect: Rect, angle: f64, alpha: f64) {
        let Some(tex) = self.textures.get(texture) else {
            trace!("draw of unknown texture '{texture}'");
            return;
        };
        let ctx = &self.ctx;
        ctx.save();
        ctx.set_global_alpha(alpha.clamp(0.0, 1.0));
        ctx.set_image_smoothing_enabled(!tex.pixel_art);
        if angle == 0.0 {
            let _ = ctx.draw_image_with_html_image_element_and_dw_and_dh(&tex.image, rect.x, rect.y, rect.w, rect.h);
        } else {
            let (cx, cy) = rect.center();
            let _ = ctx.translate(cx, cy);
            let _ = ctx.rotate(angle);
            let _ = ctx.draw_image_with_html_image_element_and_dw_and_dh(
                &tex.image,
                -rect.w / 2.0,
                -rect.h / 2.0,
                rect.w,
                rect.h,
            );
        }
        ctx.restore();
    }

    fn draw_text(&mut self, text: &str, x: f64, y: f64, max_width: f64, font: &str, color: &str) {
        self.ctx.set_font(font);
        self.ctx.set_fill_style_str(color);
        let line_height = font_px(font) * 1.3;
        let lines = wrap_lines(text, max_width, |s| self.measure(s));
        for (i, line) in lines.iter().enumerate() {
            let _ = self.ctx.fill_text(line, x, y + i as f64 * line_height);
        }
    }
}

/// Pixel size from a CSS font shorthand such as `"bold 18px serif"`.
pub(crate) fn font_px(font: &str) -> f64 {
    font.split_whitespace()
        .find_map(|part| part.strip_suffix("px").and_then(|n| n.parse::<f64>().ok()))
        .unwrap_or(16.0)
}

/// Greedy word wrap; explicit newlines always break. A single word wider than
/// `max_width` gets its own line rather than being split.
pub(crate) fn wrap_lines(text: &str, max_width: f64, measure: impl Fn(&str) -> f64) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let mut line = String::new();
        for word in paragraph.split(' ').filter(|w| !w.is_empty()) {
            let candidate = if line.is_empty() { word.to_string() } else { format!("{line} {word}") };
            if !line.is_empty() && measure(&candidate) > max_width {
                lines.push(std::mem::replace(&mut line, word.to_string()));
            } else {
                line = candidate;
            }
        }
        lines.push(line);
    }
    lines
}
