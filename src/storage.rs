//! Key-value persistence for the high score and the sound preference.
//!
//! All access is best effort: a failed read falls back to the default and a
//! failed write is logged and dropped.

use std::collections::HashMap;

use log::warn;
use thiserror::Error;

pub const HIGH_SCORE_KEY: &str = "zombieCoderHighScore";
pub const SOUND_KEY: &str = "zombieCoderSound";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("storage is not available")]
    Unavailable,
    #[error("failed to read `{key}`: {reason}")]
    Read { key: String, reason: String },
    #[error("failed to write `{key}`: {reason}")]
    Write { key: String, reason: String },
}

/// String key-value store (browser localStorage or an in-memory map).
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(mut self, key: &str, value: &str) -> Self {
        self.entries.insert(key.to_string(), value.to_string());
        self
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Missing, unreadable or non-numeric values read as 0.
pub fn load_high_score(store: &dyn KeyValueStore) -> u32 {
    match store.get(HIGH_SCORE_KEY) {
        Ok(Some(raw)) => parse_leading_int(&raw),
        Ok(None) => 0,
        Err(err) => {
            warn!("high score unavailable, starting from 0: {err}");
            0
        }
    }
}

pub fn save_high_score(store: &mut dyn KeyValueStore, score: u32) {
    if let Err(err) = store.set(HIGH_SCORE_KEY, &score.to_string()) {
        warn!("could not persist high score {score}: {err}");
    }
}

/// Sound stays on unless "off" was stored.
pub fn load_sound_enabled(store: &dyn KeyValueStore) -> bool {
    match store.get(SOUND_KEY) {
        Ok(Some(raw)) => raw != "off",
        Ok(None) => true,
        Err(err) => {
            warn!("sound preference unavailable, defaulting to on: {err}");
            true
        }
    }
}

pub fn save_sound_enabled(store: &mut dyn KeyValueStore, enabled: bool) {
    if let Err(err) = store.set(SOUND_KEY, if enabled { "on" } else { "off" }) {
        warn!("could not persist sound preference: {err}");
    }
}

// Leading decimal digits only, so "120pts" reads as 120 and "abc" as 0.
// Values past `u32::MAX` saturate.
fn parse_leading_int(raw: &str) -> u32 {
    raw.trim_start()
        .bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0u32, |acc, b| {
            acc.saturating_mul(10).saturating_add(u32::from(b - b'0'))
        })
}
