//! Login and account orchestration for Gatehouse.
//!
//! This crate handles everything that happens on the login scene:
//!
//! 1. **Validation** ([`Credentials`]): length rules checked locally
//!    before any request leaves the client
//! 2. **Remote calls** ([`AuthService`], [`CloudStore`]): sign-in, sign-up,
//!    sign-out, and the profile save that follows a login
//! 3. **Remember me** ([`RememberedSession`], [`PreferenceStore`]): local
//!    key/value persistence used to pre-fill the form next time
//! 4. **Sequencing** ([`SessionAuthController`]): ties the above together
//!    and guards against double submission
//!
//! # How it fits in the stack
//!
//! ```text
//! Dispatch loop (gatehouse)  ← routes UI commands on the login scene here
//!     ↕
//! Auth layer (this crate)  ← validates, calls the auth service, persists
//!     ↕
//! Types (gatehouse-types)  ← Scene, SceneNavigator
//! ```

mod controller;
mod credentials;
mod error;
mod prefs;
mod service;

pub use controller::{AuthConfig, LoginForm, SessionAuthController};
pub use credentials::{
    Credentials, PlayerProfile, RememberedSession, MIN_PASSWORD_LEN,
    MIN_USERNAME_LEN,
};
pub use error::{
    AuthError, AuthServiceError, CloudSaveError, PrefsError, ValidationError,
};
pub use prefs::{JsonFilePreferences, MemoryPreferences, PreferenceStore};
pub use service::{AuthService, CloudData, CloudStore, ServicesState};
