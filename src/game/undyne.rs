// Undyne: idle bob, arm swing at each attack start, and the face shown while she talks.

use crate::assets::manifest::{TEX_UNDYNE_ARM, TEX_UNDYNE_BODY};
use crate::config::ARM_SWING_MS;
use crate::render::{Canvas, Rect};
use crate::speech::Face;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Pose {
    Idle,
    /// Blocking animation; dialogue waits for it to finish.
    SwingingArm { remaining_ms: f64 },
}

#[derive(Debug)]
pub struct Undyne {
    rect: Rect,
    pose: Pose,
    /// Phase of the idle bob, wraps every second.
    bob_ms: f64,
}

impl Undyne {
    pub fn new(rect: Rect) -> Self {
        Self { rect, pose: Pose::Idle, bob_ms: 0.0 }
    }

    pub fn pose(&self) -> Pose {
        self.pose
    }

    pub fn is_swinging(&self) -> bool {
        matches!(self.pose, Pose::SwingingArm { .. })
    }

    pub fn swing_arm(&mut self) {
        self.pose = Pose::SwingingArm { remaining_ms: ARM_SWING_MS };
    }

    pub fn reset(&mut self) {
        self.pose = Pose::Idle;
        self.bob_ms = 0.0;
    }

    pub fn update(&mut self, delta_ms: f64) {
        self.bob_ms = (self.bob_ms + delta_ms) % 1_000.0;
        if let Pose::SwingingArm { remaining_ms } = &mut self.pose {
            *remaining_ms -= delta_ms;
            if *remaining_ms <= 0.0 {
                self.pose = Pose::Idle;
            }
        }
    }

    pub fn draw(&self, canvas: &mut dyn Canvas, face: Option<Face>) {
        let bob = (self.bob_ms / 1_000.0 * std::f64::consts::TAU).sin() * 2.0;
        let body = Rect { y: self.rect.y + bob, ..self.rect };
        canvas.draw_sprite(TEX_UNDYNE_BODY, body, 0.0, 1.0);

        let head = Rect::new(body.x + body.w * 0.3, body.y, body.w * 0.4, body.h * 0.25);
        canvas.draw_sprite(face.unwrap_or(Face::Normal).texture(), head, 0.0, 1.0);

        // arm sweeps from raised to lowered across the swing
        let arm_angle = match self.pose {
            Pose::Idle => 0.0,
            Pose::SwingingArm { remaining_ms } => -1.2 * (remaining_ms / ARM_SWING_MS),
        };
        let arm = Rect::new(body.x + body.w * 0.75, body.y + body.h * 0.3, body.w * 0.3, body.h * 0.4);
        canvas.draw_sprite(TEX_UNDYNE_ARM, arm, arm_angle, 1.0);
    }
}
