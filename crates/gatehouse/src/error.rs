//! Unified error type for the Gatehouse client.

use std::path::PathBuf;

use gatehouse_auth::{AuthError, PrefsError};
use gatehouse_lobby::LobbyError;

/// Failure to load or validate a [`ClientConfig`](crate::ClientConfig).
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file couldn't be read.
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file isn't valid JSON for a config.
    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),

    /// A field has a value the client can't run with.
    #[error("invalid config value: {0}")]
    Invalid(String),
}

/// Top-level error that wraps all crate-specific errors.
///
/// When using the `gatehouse` meta-crate, you deal with this single
/// error type instead of importing errors from each sub-crate.
/// The `#[from]` attribute on each variant generates the `From` impls,
/// so `?` converts sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Login, signup, or service initialization failed.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// A region or room operation failed.
    #[error(transparent)]
    Lobby(#[from] LobbyError),

    /// The local preference file couldn't be opened or written.
    #[error(transparent)]
    Prefs(#[from] PrefsError),

    /// The client configuration is unusable.
    #[error(transparent)]
    Config(#[from] ConfigError),
}
