//! Drawing surface used by the game objects.
//!
//! Game code only ever talks to `Canvas`; the browser implementation lives in
//! `web::canvas`, and tests record the calls instead.

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    /// Rect of size `w`×`h` centred on `(cx, cy)`.
    pub fn centered(cx: f64, cy: f64, w: f64, h: f64) -> Self {
        Self { x: cx - w / 2.0, y: cy - h / 2.0, w, h }
    }

    pub fn contains(&self, px: f64, py: f64) -> bool {
        px >= self.x && py >= self.y && px < self.x + self.w && py < self.y + self.h
    }

    pub fn center(&self) -> (f64, f64) {
        (self.x + self.w / 2.0, self.y + self.h / 2.0)
    }
}

pub trait Canvas {
    fn clear(&mut self, color: &str);
    fn fill_rect(&mut self, rect: Rect, color: &str);
    /// Draws a named texture stretched to `rect`, rotated `angle` radians about its centre.
    fn draw_sprite(&mut self, texture: &str, rect: Rect, angle: f64, alpha: f64);
    /// Left-aligned text, wrapped to `max_width`.
    fn draw_text(&mut self, text: &str, x: f64, y: f64, max_width: f64, font: &str, color: &str);
}
