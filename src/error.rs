//! Crate-wide error type.

use thiserror::Error;
use wasm_bindgen::JsValue;

#[derive(Debug, Error)]
pub enum GameError {
    #[error("failed to parse level data: {0}")]
    LevelParse(#[from] serde_json::Error),
    #[error("invalid level: {0}")]
    InvalidLevel(String),
    #[error("unknown difficulty '{0}' (expected easy, medium or hard)")]
    InvalidDifficulty(String),
    #[error("asset '{0}' was never registered")]
    UnknownAsset(String),
    #[error("assets still loading after {attempts} polls: {missing:?}")]
    GateNeverReady { attempts: u32, missing: Vec<String> },
    #[error("browser call failed: {0}")]
    Dom(String),
}

pub type GameResult<T> = Result<T, GameError>;

impl GameError {
    /// Wraps a rejected browser call. `JsValue` is not `Send`/`Error`, so only
    /// its debug rendering is kept.
    pub fn dom(value: JsValue) -> Self {
        GameError::Dom(value.as_string().unwrap_or_else(|| format!("{value:?}")))
    }
}

impl From<GameError> for JsValue {
    fn from(err: GameError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}
