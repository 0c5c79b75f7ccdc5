//! Persistent configuration for zest.
//!
//! Stores user settings in `~/.zest/config.json`. The runner reads the
//! variable delimiters and the sleep policy from here.
//!
//! # Example
//!
//! ```no_run
//! use zest_core::config::ZestConfig;
//!
//! // Load (returns defaults if file doesn't exist)
//! let config = ZestConfig::load();
//! println!("tokens: {}name{}", config.token_start, config.token_end);
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ZestError;
use crate::variables::{DEFAULT_TOKEN_END, DEFAULT_TOKEN_START};

const CONFIG_FILENAME: &str = "config.json";

/// Returns the zest settings directory, `~/.zest`.
///
/// Falls back to the current directory when no home directory is known.
pub fn zest_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".zest")
}

fn default_token_start() -> String {
    DEFAULT_TOKEN_START.to_string()
}

fn default_token_end() -> String {
    DEFAULT_TOKEN_END.to_string()
}

/// Persistent zest configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZestConfig {
    /// Opening delimiter of a variable reference.
    #[serde(default = "default_token_start")]
    pub token_start: String,
    /// Closing delimiter of a variable reference.
    #[serde(default = "default_token_end")]
    pub token_end: String,
    /// Log sleep actions instead of sleeping.
    #[serde(default)]
    pub skip_sleeps: bool,
    /// Upper bound applied to every sleep action.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_sleep_ms: Option<u64>,
}

impl Default for ZestConfig {
    fn default() -> Self {
        Self {
            token_start: default_token_start(),
            token_end: default_token_end(),
            skip_sleeps: false,
            max_sleep_ms: None,
        }
    }
}

impl ZestConfig {
    /// Load config from `~/.zest/config.json`.
    ///
    /// Returns [`Default`] if the file does not exist or cannot be parsed.
    pub fn load() -> Self {
        Self::load_from(&zest_dir().join(CONFIG_FILENAME))
    }

    pub fn load_from(path: &Path) -> Self {
        std::fs::read_to_string(path)
            .ok()
            .and_then(|s| serde_json::from_str(&s).ok())
            .unwrap_or_default()
    }

    /// Save config to `~/.zest/config.json`.
    pub fn save(&self) -> Result<(), ZestError> {
        let dir = zest_dir();
        std::fs::create_dir_all(&dir)?;
        self.save_to(&dir.join(CONFIG_FILENAME))
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ZestError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// How long a sleep action of `requested_ms` should actually last.
    pub fn effective_sleep_ms(&self, requested_ms: u64) -> u64 {
        if self.skip_sleeps {
            return 0;
        }
        match self.max_sleep_ms {
            Some(cap) => requested_ms.min(cap),
            None => requested_ms,
        }
    }
}
