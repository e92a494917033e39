use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::history::{DEFAULT_CAPACITY, STORAGE_KEY};
use crate::locale::{self, UiLanguage, DEFAULT_SPEECH_LANGUAGE};

/// Engine settings, usually read from a JSON file. Missing fields take their
/// defaults.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct EngineConfig {
    /// Length of the rolling animation before the die lands.
    pub roll_animation_ms: u64,
    /// Pause between the die landing and the number being spoken.
    pub announce_delay_ms: u64,
    /// Extra pause before the winner line, after the number.
    pub winner_announce_delay_ms: u64,
    pub speech_language: String,
    pub ui_language: UiLanguage,
    pub history_key: String,
    pub history_capacity: usize,
    /// Directory for a file-backed history; `None` keeps it in memory.
    pub history_dir: Option<PathBuf>,
    /// Fixed die seed for replayable sessions.
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            roll_animation_ms: 1000,
            announce_delay_ms: 300,
            winner_announce_delay_ms: 1500,
            speech_language: DEFAULT_SPEECH_LANGUAGE.to_string(),
            ui_language: UiLanguage::Es,
            history_key: STORAGE_KEY.to_string(),
            history_capacity: DEFAULT_CAPACITY,
            history_dir: None,
            seed: None,
        }
    }
}

impl EngineConfig {
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.history_capacity == 0 {
            return Err(ConfigError::Invalid("history_capacity must be at least 1".into()));
        }
        if self.history_key.is_empty() {
            return Err(ConfigError::Invalid("history_key must not be empty".into()));
        }
        if locale::language(&self.speech_language).is_none() {
            return Err(ConfigError::Invalid(format!("unknown speech language {}", self.speech_language)));
        }
        Ok(())
    }
}
