//! Attack descriptors and the level's attack sequencer.
//!
//! Attacks are built once from level data and then pulled one at a time by the
//! arena as the fight progresses. The sequence is never edited; restarting the
//! level only rewinds the cursor.

use serde::Deserialize;

mod level;

pub use level::{Difficulty, LevelData};

/// Side of the arena an arrow flies in from. The shield uses the same values
/// for the side it is facing.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Direction::Up, Direction::Right, Direction::Down, Direction::Left];

    /// Unit vector pointing from the heart toward this side (canvas y grows down).
    pub fn unit(self) -> (f64, f64) {
        match self {
            Direction::Up => (0.0, -1.0),
            Direction::Down => (0.0, 1.0),
            Direction::Left => (-1.0, 0.0),
            Direction::Right => (1.0, 0.0),
        }
    }

    /// Rotation in radians for sprites drawn pointing up by default.
    pub fn angle(self) -> f64 {
        use std::f64::consts::{FRAC_PI_2, PI};
        match self {
            Direction::Up => 0.0,
            Direction::Right => FRAC_PI_2,
            Direction::Down => PI,
            Direction::Left => -FRAC_PI_2,
        }
    }
}

fn default_damage() -> u32 {
    1
}

/// A single arrow in an attack pattern.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct ArrowSpec {
    pub from: Direction,
    /// Delay after the attack starts before the arrow appears.
    #[serde(default)]
    pub delay_ms: f64,
    /// Travel speed toward the heart in px/s.
    pub speed: f64,
    #[serde(default = "default_damage")]
    pub damage: u32,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct Attack {
    #[serde(default)]
    pub name: String,
    pub arrows: Vec<ArrowSpec>,
    /// Quiet time after the last arrow resolves before the next attack is pulled.
    #[serde(default)]
    pub cooldown_ms: f64,
}

/// Ordered attack sequence with a pull cursor.
#[derive(Clone, Debug, Default)]
pub struct AttackManager {
    attacks: Vec<Attack>,
    cursor: usize,
}

impl AttackManager {
    pub fn new(attacks: Vec<Attack>) -> Self {
        Self { attacks, cursor: 0 }
    }

    /// Returns the attack under the cursor and advances past it, or `None` once
    /// the sequence is exhausted (every later call keeps returning `None`).
    pub fn next_attack(&mut self) -> Option<&Attack> {
        let attack = self.attacks.get(self.cursor)?;
        self.cursor += 1;
        Some(attack)
    }

    pub fn num_attacks(&self) -> usize {
        self.attacks.len()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn remaining(&self) -> usize {
        self.attacks.len() - self.cursor
    }

    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.attacks.len()
    }

    /// Rewinds to the first attack without rebuilding the sequence.
    pub fn reset(&mut self) {
        self.cursor = 0;
    }
}
