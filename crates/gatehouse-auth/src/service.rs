//! Hooks for the hosted auth and cloud-save services.
//!
//! Gatehouse doesn't implement accounts or cloud storage itself. It talks
//! to whatever provider the game ships with through two traits:
//!
//! - [`AuthService`]: initialize, sign in, sign up, sign out
//! - [`CloudStore`]: force-save a handful of key/value pairs
//!
//! The controller only ever holds these traits, so tests swap in fakes
//! and the demo swaps in an in-process simulation without touching any
//! controller code.

use std::future::Future;
use std::sync::Arc;

use crate::{AuthServiceError, CloudSaveError};

/// Key/value payload accepted by [`CloudStore::force_save`].
pub type CloudData = serde_json::Map<String, serde_json::Value>;

/// Lifecycle of the backing services, as reported by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServicesState {
    Uninitialized,
    Initializing,
    Initialized,
}

/// Account operations against the hosted auth provider.
///
/// # Trait bounds
///
/// - `Send + Sync` → the service handle may be shared with the dispatch
///   loop and with tests that inspect it afterwards.
/// - `'static` → it lives as long as the client.
///
/// The async methods return `impl Future + Send` rather than using
/// `async fn` so the futures can cross an `.await` inside a spawned task.
///
/// # Example
///
/// ```rust
/// use gatehouse_auth::{AuthService, AuthServiceError, ServicesState};
///
/// /// Accepts every account. Local development only.
/// struct OpenDoor;
///
/// impl AuthService for OpenDoor {
///     fn state(&self) -> ServicesState {
///         ServicesState::Initialized
///     }
///
///     async fn initialize(&self) -> Result<(), AuthServiceError> {
///         Ok(())
///     }
///
///     async fn sign_in(&self, _: &str, _: &str) -> Result<(), AuthServiceError> {
///         Ok(())
///     }
///
///     async fn sign_up(&self, _: &str, _: &str) -> Result<(), AuthServiceError> {
///         Ok(())
///     }
///
///     fn sign_out(&self) {}
/// }
/// ```
pub trait AuthService: Send + Sync + 'static {
    /// Current initialization state of the provider.
    fn state(&self) -> ServicesState;

    /// Brings the provider up. Only called when [`state`](Self::state) is
    /// not already [`ServicesState::Initialized`].
    fn initialize(
        &self,
    ) -> impl Future<Output = Result<(), AuthServiceError>> + Send;

    /// Signs in with a username/password pair.
    fn sign_in(
        &self,
        username: &str,
        password: &str,
    ) -> impl Future<Output = Result<(), AuthServiceError>> + Send;

    /// Registers a new username/password account. Does not sign in.
    fn sign_up(
        &self,
        username: &str,
        password: &str,
    ) -> impl Future<Output = Result<(), AuthServiceError>> + Send;

    /// Drops the current remote session. Local, never fails.
    fn sign_out(&self);
}

impl<T: AuthService> AuthService for Arc<T> {
    fn state(&self) -> ServicesState {
        (**self).state()
    }

    fn initialize(
        &self,
    ) -> impl Future<Output = Result<(), AuthServiceError>> + Send {
        (**self).initialize()
    }

    fn sign_in(
        &self,
        username: &str,
        password: &str,
    ) -> impl Future<Output = Result<(), AuthServiceError>> + Send {
        (**self).sign_in(username, password)
    }

    fn sign_up(
        &self,
        username: &str,
        password: &str,
    ) -> impl Future<Output = Result<(), AuthServiceError>> + Send {
        (**self).sign_up(username, password)
    }

    fn sign_out(&self) {
        (**self).sign_out();
    }
}

/// Per-player key/value storage in the cloud.
pub trait CloudStore: Send + Sync + 'static {
    /// Writes every entry in `data`, overwriting existing values without
    /// any conflict check.
    fn force_save(
        &self,
        data: CloudData,
    ) -> impl Future<Output = Result<(), CloudSaveError>> + Send;
}

impl<T: CloudStore> CloudStore for Arc<T> {
    fn force_save(
        &self,
        data: CloudData,
    ) -> impl Future<Output = Result<(), CloudSaveError>> + Send {
        (**self).force_save(data)
    }
}
