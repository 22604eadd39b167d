// The heart, its shield, and the arrows of the attack currently in play.

use crate::assets::manifest::{TEX_ARROW, TEX_HEART, TEX_SHIELD};
use crate::attack::{ArrowSpec, Attack, Direction};
use crate::config::{ARROW_SIZE, ARROW_SPAWN_DISTANCE, HEART_RADIUS, HEART_SIZE, SHIELD_RADIUS, SHIELD_SIZE};
use crate::render::{Canvas, Rect};

#[derive(Clone, Debug, PartialEq)]
struct Arrow {
    from: Direction,
    /// Distance left to the heart centre.
    distance: f64,
    speed: f64,
    damage: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArrowOutcome {
    Blocked,
    Hit { damage: u32 },
}

#[derive(Debug)]
pub struct Arena {
    center: (f64, f64),
    speed_factor: f64,
    shield: Direction,
    /// Arrows of the running attack not yet spawned, soonest last.
    pending: Vec<ArrowSpec>,
    arrows: Vec<Arrow>,
    attack_elapsed_ms: f64,
    cooldown_left_ms: f64,
    in_attack: bool,
}

impl Arena {
    pub fn new(center: (f64, f64), speed_factor: f64) -> Self {
        Self {
            center,
            speed_factor,
            shield: Direction::Up,
            pending: Vec::new(),
            arrows: Vec::new(),
            attack_elapsed_ms: 0.0,
            cooldown_left_ms: 0.0,
            in_attack: false,
        }
    }

    pub fn shield(&self) -> Direction {
        self.shield
    }

    pub fn set_shield(&mut self, dir: Direction) {
        self.shield = dir;
    }

    pub fn arrows_in_flight(&self) -> usize {
        self.arrows.len()
    }

    pub fn start_attack(&mut self, attack: &Attack) {
        let mut pending = attack.arrows.clone();
        pending.sort_by(|a, b| b.delay_ms.total_cmp(&a.delay_ms));
        self.pending = pending;
        self.attack_elapsed_ms = 0.0;
        self.cooldown_left_ms = attack.cooldown_ms.max(0.0);
        self.in_attack = true;
    }

    /// True when no attack is running, or the running one has fully resolved
    /// and its cooldown has passed.
    pub fn is_idle(&self) -> bool {
        !self.in_attack
    }

    pub fn clear(&mut self) {
        self.pending.clear();
        self.arrows.clear();
        self.attack_elapsed_ms = 0.0;
        self.cooldown_left_ms = 0.0;
        self.in_attack = false;
        self.shield = Direction::Up;
    }

    pub fn update(&mut self, delta_ms: f64) -> Vec<ArrowOutcome> {
        if !self.in_attack {
            return Vec::new();
        }
        self.attack_elapsed_ms += delta_ms;
        for arrow in &mut self.arrows {
            arrow.distance -= arrow.speed * delta_ms / 1_000.0;
        }
        while self.pending.last().is_some_and(|a| a.delay_ms <= self.attack_elapsed_ms) {
            if let Some(spec) = self.pending.pop() {
                // only the part of this frame after its delay counts
                let speed = spec.speed * self.speed_factor;
                let travelled = speed * (self.attack_elapsed_ms - spec.delay_ms) / 1_000.0;
                self.arrows.push(Arrow {
                    from: spec.from,
                    distance: ARROW_SPAWN_DISTANCE - travelled,
                    speed,
                    damage: spec.damage,
                });
            }
        }

        let mut outcomes = Vec::new();
        let shield = self.shield;
        self.arrows.retain(|arrow| {
            if arrow.distance <= SHIELD_RADIUS && arrow.from == shield {
                outcomes.push(ArrowOutcome::Blocked);
                false
            } else if arrow.distance <= HEART_RADIUS {
                outcomes.push(ArrowOutcome::Hit { damage: arrow.damage });
                false
            } else {
                true
            }
        });

        if self.pending.is_empty() && self.arrows.is_empty() {
            self.cooldown_left_ms -= delta_ms;
            if self.cooldown_left_ms <= 0.0 {
                self.in_attack = false;
            }
        }
        outcomes
    }

    pub fn draw(&self, canvas: &mut dyn Canvas) {
        let (cx, cy) = self.center;
        canvas.draw_sprite(TEX_HEART, Rect::centered(cx, cy, HEART_SIZE, HEART_SIZE), 0.0, 1.0);

        let (ux, uy) = self.shield.unit();
        let (sw, sh) = SHIELD_SIZE;
        let (sx, sy) = (cx + ux * SHIELD_RADIUS, cy + uy * SHIELD_RADIUS);
        canvas.draw_sprite(TEX_SHIELD, Rect::centered(sx, sy, sw, sh), self.shield.angle(), 1.0);

        let (aw, ah) = ARROW_SIZE;
        for arrow in &self.arrows {
            let (ux, uy) = arrow.from.unit();
            let (ax, ay) = (cx + ux * arrow.distance, cy + uy * arrow.distance);
            // arrow art points up; it should point back toward the heart
            let angle = arrow.from.angle() + std::f64::consts::PI;
            canvas.draw_sprite(TEX_ARROW, Rect::centered(ax, ay, aw, ah), angle, 1.0);
        }
    }
}
