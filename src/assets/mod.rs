//! Asset readiness tracking.
//!
//! Loaders register every asset with the `AssetGate` before kicking off the
//! browser load; completion handlers flip the asset's flag. Startup polls the
//! gate through a `ReadinessPoll` until everything reports loaded.

use std::collections::BTreeMap;

use log::{debug, warn};

use crate::error::{GameError, GameResult};

pub mod manifest;

pub use manifest::Sound;

/// How an asset becomes ready.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadKind {
    /// Ready once the browser signals the load finished.
    Preload,
    /// Streams on demand; counts as ready as soon as it is registered.
    Streamed,
}

/// Audio output used by the game logic.
pub trait SoundBoard {
    fn play(&mut self, sound: Sound);
    fn stop(&mut self, sound: Sound);
}

/// Name → loaded flag for everything the game needs before play starts.
#[derive(Debug, Default)]
pub struct AssetGate {
    loaded: BTreeMap<String, bool>,
}

impl AssetGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an asset. Registering an existing name keeps its current flag
    /// unless the new registration is streamed.
    pub fn register(&mut self, name: &str, kind: LoadKind) {
        let flag = self.loaded.entry(name.to_string()).or_insert(false);
        if kind == LoadKind::Streamed {
            *flag = true;
        }
    }

    pub fn mark_loaded(&mut self, name: &str) -> GameResult<()> {
        match self.loaded.get_mut(name) {
            Some(flag) => {
                if !*flag {
                    debug!("asset '{name}' loaded");
                }
                *flag = true;
                Ok(())
            }
            None => {
                warn!("load signal for unregistered asset '{name}'");
                Err(GameError::UnknownAsset(name.to_string()))
            }
        }
    }

    pub fn is_asset_loaded(&self, name: &str) -> bool {
        self.loaded.get(name).copied().unwrap_or(false)
    }

    /// True iff every registered asset is loaded (vacuously true when empty).
    pub fn is_loaded(&self) -> bool {
        self.loaded.values().all(|&l| l)
    }

    pub fn missing(&self) -> Vec<String> {
        self.loaded.iter().filter(|(_, l)| !**l).map(|(n, _)| n.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.loaded.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loaded.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GateStatus {
    Ready { attempts: u32 },
    Pending { attempt: u32, missing: Vec<String> },
}

/// Counts polls of the gate and gives up after `max_attempts` if configured.
#[derive(Clone, Debug)]
pub struct ReadinessPoll {
    attempts: u32,
    max_attempts: Option<u32>,
}

impl ReadinessPoll {
    pub fn new(max_attempts: Option<u32>) -> Self {
        Self { attempts: 0, max_attempts }
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn poll(&mut self, gate: &AssetGate) -> GameResult<GateStatus> {
        self.attempts += 1;
        if gate.is_loaded() {
            return Ok(GateStatus::Ready { attempts: self.attempts });
        }
        let missing = gate.missing();
        if let Some(max) = self.max_attempts {
            if self.attempts >= max {
                return Err(GameError::GateNeverReady { attempts: self.attempts, missing });
            }
        }
        Ok(GateStatus::Pending { attempt: self.attempts, missing })
    }
}
