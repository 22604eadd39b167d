// Level data handed over by the hosting page, plus the difficulty knobs applied to it.

use std::str::FromStr;

use serde::Deserialize;

use super::Attack;
use crate::assets::Sound;
use crate::error::{GameError, GameResult};
use crate::speech::SpeechItem;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn bgm(self) -> Sound {
        match self {
            Difficulty::Easy => Sound::UndyneEasyBgm,
            Difficulty::Medium => Sound::UndyneMediumBgm,
            Difficulty::Hard => Sound::UndyneHardBgm,
        }
    }

    pub fn max_health(self) -> u32 {
        match self {
            Difficulty::Easy => 8,
            Difficulty::Medium => 5,
            Difficulty::Hard => 3,
        }
    }

    /// Multiplier on every arrow's speed.
    pub fn speed_factor(self) -> f64 {
        match self {
            Difficulty::Easy => 1.0,
            Difficulty::Medium => 1.25,
            Difficulty::Hard => 1.5,
        }
    }
}

impl FromStr for Difficulty {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(GameError::InvalidDifficulty(s.to_string())),
        }
    }
}

/// Pre-parsed level: the attack order and the dialogue around it.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct LevelData {
    pub attacks: Vec<Attack>,
    #[serde(default)]
    pub intro: Vec<SpeechItem>,
    #[serde(default)]
    pub outro: Vec<SpeechItem>,
    #[serde(default)]
    pub defeat: Vec<SpeechItem>,
}

impl LevelData {
    pub fn from_json(json: &str) -> GameResult<Self> {
        let level: Self = serde_json::from_str(json)?;
        level.validate()?;
        Ok(level)
    }

    /// Rejects timings that would leave an attack unresolved forever: an arrow
    /// that never moves inward, or a delay/cooldown that never elapses.
    pub fn validate(&self) -> GameResult<()> {
        for (i, attack) in self.attacks.iter().enumerate() {
            if !attack.cooldown_ms.is_finite() {
                return Err(GameError::InvalidLevel(format!("attack {i}: cooldown_ms must be finite")));
            }
            for (j, arrow) in attack.arrows.iter().enumerate() {
                if !(arrow.speed.is_finite() && arrow.speed > 0.0) {
                    return Err(GameError::InvalidLevel(format!(
                        "attack {i} arrow {j}: speed must be positive, got {}",
                        arrow.speed
                    )));
                }
                if !arrow.delay_ms.is_finite() {
                    return Err(GameError::InvalidLevel(format!("attack {i} arrow {j}: delay_ms must be finite")));
                }
            }
        }
        Ok(())
    }
}
