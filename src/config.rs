//! Runtime configuration and gameplay tuning constants.
//!
//! `GameConfig` holds the values the hosting page may override (as JSON handed
//! to `start_game_with_config`); everything else is a plain constant.

use serde::Deserialize;

use crate::error::GameResult;

// --- Arena geometry ------------------------------------------------------------

/// Distance from the heart centre at which a correctly-facing shield stops an arrow.
pub const SHIELD_RADIUS: f64 = 38.0;
/// Distance from the heart centre at which an arrow lands a hit.
pub const HEART_RADIUS: f64 = 10.0;
/// How far outside the shield ring arrows are spawned.
pub const ARROW_SPAWN_DISTANCE: f64 = 260.0;
pub const HEART_SIZE: f64 = 16.0;
pub const SHIELD_SIZE: (f64, f64) = (56.0, 12.0);
pub const ARROW_SIZE: (f64, f64) = (12.0, 28.0);

// --- Scoring -------------------------------------------------------------------

pub const SCORE_PER_BLOCK: u32 = 100;
/// Bonus awarded for each health point left when the last attack resolves.
pub const SCORE_PER_HEALTH_LEFT: u32 = 50;

// --- Actor ---------------------------------------------------------------------

/// Length of Undyne's arm swing, during which dialogue is held back.
pub const ARM_SWING_MS: f64 = 400.0;

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, rename_all = "snake_case")]
pub struct GameConfig {
    pub game_width: u32,
    pub game_height: u32,
    /// Upper clamp for a single frame's delta (covers tab backgrounding).
    pub max_frame_delta_ms: f64,
    pub asset_poll_interval_ms: u32,
    /// `None` keeps polling until everything loads.
    pub asset_poll_max_attempts: Option<u32>,
    pub speech_defer_ms: f64,
    pub chars_per_sec: f64,
    pub button_transition_ms: f64,
    pub log_level: log::LevelFilter,
    pub audio_dir: String,
    pub image_dir: String,
    pub canvas_id: String,
    pub loading_element_id: String,
    pub back_home_element_id: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            game_width: 640,
            game_height: 480,
            max_frame_delta_ms: 100.0,
            asset_poll_interval_ms: 100,
            asset_poll_max_attempts: None,
            speech_defer_ms: 250.0,
            chars_per_sec: 25.0,
            button_transition_ms: 150.0,
            log_level: log::LevelFilter::Info,
            audio_dir: "static/game/audio/".to_string(),
            image_dir: "static/game/img/".to_string(),
            canvas_id: "game-canvas".to_string(),
            loading_element_id: "loading-container".to_string(),
            back_home_element_id: "back-home-feed".to_string(),
        }
    }
}

impl GameConfig {
    /// Parses a (possibly partial) JSON override; missing keys keep their defaults.
    pub fn from_json(json: &str) -> GameResult<Self> {
        if json.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg = GameConfig::from_json(r#"{ "chars_per_sec": 40.0, "log_level": "debug" }"#).unwrap();
        assert_eq!(cfg.chars_per_sec, 40.0);
        assert_eq!(cfg.log_level, log::LevelFilter::Debug);
        assert_eq!(cfg.max_frame_delta_ms, 100.0);
        assert_eq!(cfg.game_width, 640);
    }

    #[test]
    fn empty_json_is_default() {
        assert_eq!(GameConfig::from_json("  ").unwrap(), GameConfig::default());
    }
}
