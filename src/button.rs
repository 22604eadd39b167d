//! Clickable screen button with an optional hover crossfade.
//!
//! The hover texture is drawn underneath the base texture; hovering fades the
//! base out linearly over `transition_ms`, leaving the hover art visible.

use crate::render::{Canvas, Rect};

#[derive(Clone, Debug)]
pub struct HoverStyle<A> {
    pub texture: &'static str,
    pub action: A,
    pub transition_ms: f64,
}

#[derive(Clone, Debug)]
pub struct Button<A> {
    rect: Rect,
    texture: &'static str,
    action: A,
    hover: Option<HoverStyle<A>>,
    visible: bool,
    hovering: bool,
    /// Time spent fading toward the hover art, in `[0, transition_ms]`.
    hover_ms: f64,
    alpha: f64,
}

impl<A: Clone> Button<A> {
    pub fn new(rect: Rect, texture: &'static str, action: A) -> Self {
        Self {
            rect,
            texture,
            action,
            hover: None,
            visible: true,
            hovering: false,
            hover_ms: 0.0,
            alpha: 1.0,
        }
    }

    pub fn with_hover(mut self, texture: &'static str, action: A, transition_ms: f64) -> Self {
        self.hover = Some(HoverStyle { texture, action, transition_ms: transition_ms.max(0.0) });
        self
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
        if !visible {
            self.hovering = false;
        }
    }

    pub fn is_hovering(&self) -> bool {
        self.hovering
    }

    pub fn hover_progress(&self) -> f64 {
        self.hover_ms
    }

    /// Opacity of the base texture.
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        self.visible && self.rect.contains(x, y)
    }

    /// Pointer entered: starts the crossfade and returns the hover action.
    /// Without a hover style nothing happens.
    pub fn pointer_enter(&mut self) -> Option<A> {
        if !self.visible || self.hovering {
            return None;
        }
        let hover = self.hover.as_ref()?;
        self.hovering = true;
        Some(hover.action.clone())
    }

    pub fn pointer_leave(&mut self) {
        self.hovering = false;
    }

    /// Routes a pointer position to enter/leave transitions.
    pub fn pointer_move(&mut self, x: f64, y: f64) -> Option<A> {
        let inside = self.contains(x, y);
        if inside && !self.hovering {
            self.pointer_enter()
        } else {
            if !inside && self.hovering {
                self.pointer_leave();
            }
            None
        }
    }

    /// The click action. No debouncing: every call yields the action.
    pub fn click(&self) -> A {
        self.action.clone()
    }

    /// Pointer press at `(x, y)`; clicks only when the visible button is hit.
    pub fn pointer_down(&self, x: f64, y: f64) -> Option<A> {
        self.contains(x, y).then(|| self.click())
    }

    pub fn update(&mut self, delta_ms: f64) {
        match &self.hover {
            Some(hover) if self.visible => {
                let t = hover.transition_ms;
                let step = if self.hovering { delta_ms } else { -delta_ms };
                self.hover_ms = (self.hover_ms + step).clamp(0.0, t);
                self.alpha = if t > 0.0 {
                    1.0 - self.hover_ms / t
                } else if self.hovering {
                    0.0
                } else {
                    1.0
                };
            }
            _ => self.alpha = 1.0,
        }
    }

    pub fn draw(&self, canvas: &mut dyn Canvas) {
        if !self.visible {
            return;
        }
        if let Some(hover) = &self.hover {
            canvas.draw_sprite(hover.texture, self.rect, 0.0, 1.0);
        }
        canvas.draw_sprite(self.texture, self.rect, 0.0, self.alpha);
    }
}
