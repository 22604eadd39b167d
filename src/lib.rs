//! Undyne Duel core crate.
//!
//! A canvas boss fight: Undyne talks, throws arrows at the player's heart, and
//! the player turns a shield to block them. Game rules live in plain Rust
//! (`game`, `speech`, `attack`, `assets`, `button`) behind the `Canvas` and
//! `SoundBoard` traits so they run natively under `cargo test`; `web` adapts
//! them to the DOM and is the only module that touches the browser.

use wasm_bindgen::prelude::*;

pub mod assets;
pub mod attack;
pub mod button;
pub mod clock;
pub mod config;
pub mod error;
pub mod game;
pub mod render;
pub mod scheduler;
pub mod speech;
mod web;

pub use config::GameConfig;
pub use error::{GameError, GameResult};
pub use game::GameHandler;
pub use web::GameSession;

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    init_logging(GameConfig::default().log_level);
}

/// Routes `log` records to the browser console. Only the first call installs
/// the logger; later calls just move the level.
fn init_logging(filter: log::LevelFilter) {
    if let Some(level) = filter.to_level() {
        let _ = console_log::init_with_level(level);
    }
    log::set_max_level(filter);
}

// -----------------------------------------------------------------------------
// Unified entrypoints
// -----------------------------------------------------------------------------

/// Starts the fight described by `level_json` at `difficulty`
/// (`"easy"`, `"medium"` or `"hard"`) with default settings.
#[wasm_bindgen]
pub fn start_game(level_json: &str, difficulty: &str) -> Result<GameSession, JsValue> {
    Ok(web::start(GameConfig::default(), level_json, difficulty)?)
}

/// Like `start_game`, with a JSON object overriding any `GameConfig` field.
#[wasm_bindgen]
pub fn start_game_with_config(level_json: &str, difficulty: &str, config_json: &str) -> Result<GameSession, JsValue> {
    let config = GameConfig::from_json(config_json)?;
    init_logging(config.log_level);
    Ok(web::start(config, level_json, difficulty)?)
}
