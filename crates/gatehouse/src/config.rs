//! Client configuration.
//!
//! Every field has a default, so a config file only needs the values it
//! changes, and an empty object (`{}`) is a valid config.
//!
//! ```json
//! {
//!     "transition_delay_ms": 500,
//!     "prefs_path": "saves/prefs.json",
//!     "log_filter": "gatehouse=debug,info"
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use gatehouse_auth::AuthConfig;
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Runtime settings for a [`GameClient`](crate::GameClient).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Pause between a successful login and the scene change, so the
    /// success message stays readable.
    pub transition_delay_ms: u64,

    /// Where remembered credentials are stored.
    pub prefs_path: PathBuf,

    /// Default tracing filter. `RUST_LOG` wins when set.
    pub log_filter: String,

    /// Buffer size of the UI command and network event channels.
    pub event_channel_capacity: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            transition_delay_ms: 2_000,
            prefs_path: PathBuf::from("gatehouse-prefs.json"),
            log_filter: "info".to_string(),
            event_channel_capacity: 64,
        }
    }
}

impl ClientConfig {
    /// Reads and validates a JSON config file.
    ///
    /// # Errors
    /// [`ConfigError::Io`] if the file can't be read, [`ConfigError::Parse`]
    /// if it isn't a config object, [`ConfigError::Invalid`] if a value is
    /// out of range.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&text)?;
        tracing::debug!(path = %path.display(), "config loaded");
        Ok(config)
    }

    /// Parses and validates a JSON config string.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks values serde can't: a zero-capacity channel can't be built.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.event_channel_capacity == 0 {
            return Err(ConfigError::Invalid(
                "event_channel_capacity must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Sets the post-login pause.
    pub fn with_transition_delay(mut self, delay: Duration) -> Self {
        self.transition_delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Sets the preference file location.
    pub fn with_prefs_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.prefs_path = path.into();
        self
    }

    /// Sets the default tracing filter.
    pub fn with_log_filter(mut self, filter: impl Into<String>) -> Self {
        self.log_filter = filter.into();
        self
    }

    /// The post-login pause as a [`Duration`].
    pub fn transition_delay(&self) -> Duration {
        Duration::from_millis(self.transition_delay_ms)
    }

    /// The slice of this config the auth controller needs.
    pub fn auth_config(&self) -> AuthConfig {
        AuthConfig {
            transition_delay: self.transition_delay(),
        }
    }
}
