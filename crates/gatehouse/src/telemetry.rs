//! Tracing setup.

use tracing_subscriber::{EnvFilter, fmt};

/// Installs a `fmt` subscriber as the global default.
///
/// `RUST_LOG` takes precedence over `default_filter`. An invalid filter
/// string falls back to `info`. Calling this more than once is harmless:
/// later calls leave the first subscriber in place.
pub fn init(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .ok();
}
