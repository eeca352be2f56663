//! Session configuration.
//!
//! [`SessionConfig`] is plain data loaded from JSON. Every field has a default, so an empty object
//! (`{}`) is a valid configuration.
//!
//! ```json
//! {
//!   "defaults": { "content": "", "fontSize": 16, "fontWeight": "normal", "textColor": "#000000" },
//!   "maxHistory": 1000,
//!   "replayStepDelayMs": 500
//! }
//! ```

use crate::document::DocumentSnapshot;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Default maximum number of history entries.
pub const DEFAULT_MAX_HISTORY: usize = 1000;

/// Default pause between replay steps, in milliseconds.
pub const DEFAULT_REPLAY_STEP_DELAY_MS: u64 = 500;

/// Errors produced while loading a [`SessionConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    /// Reading the configuration file failed.
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    /// The configuration is not valid JSON for [`SessionConfig`].
    Json(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    /// The configuration parsed but holds unusable values.
    Invalid(String),
}

/// Settings for an [`EditorSession`](crate::EditorSession).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionConfig {
    /// Document state used by new sessions and restored by reset.
    pub defaults: DocumentSnapshot,
    /// Maximum number of history entries (`None` for unbounded).
    pub max_history: Option<usize>,
    /// Suggested pause between replay steps, for callers that animate replay.
    pub replay_step_delay_ms: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            defaults: DocumentSnapshot::default(),
            max_history: Some(DEFAULT_MAX_HISTORY),
            replay_step_delay_ms: DEFAULT_REPLAY_STEP_DELAY_MS,
        }
    }
}

impl SessionConfig {
    /// Parse and validate a configuration from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: SessionConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&json)?;
        debug!(path = %path.display(), "loaded session config");
        Ok(config)
    }

    /// Check that the values are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.defaults.font_size == 0 {
            return Err(ConfigError::Invalid(
                "defaults.fontSize must be positive".to_string(),
            ));
        }
        if self.max_history == Some(0) {
            return Err(ConfigError::Invalid(
                "maxHistory must be positive or null".to_string(),
            ));
        }
        Ok(())
    }

    /// Suggested pause between replay steps.
    pub fn replay_step_delay(&self) -> Duration {
        Duration::from_millis(self.replay_step_delay_ms)
    }
}
