//! Account data: what the player types, what we remember, what we upload.
//!
//! - [`Credentials`]: a username/password pair that has passed the local
//!   length rules. The only way to get one is [`Credentials::parse`].
//! - [`RememberedSession`]: the "remember me" copy kept in local
//!   preferences. Plaintext, for auto-fill only.
//! - [`PlayerProfile`]: the attribute pushed to the cloud after login.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{CloudData, PreferenceStore, ValidationError};

/// Minimum username length, counted in characters after trimming.
pub const MIN_USERNAME_LEN: usize = 3;

/// Minimum password length, counted in characters after trimming.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Preference keys. Shared with earlier client builds, so existing
/// installs keep their remembered login.
const SAVED_USERNAME_KEY: &str = "SavedUsername";
const SAVED_PASSWORD_KEY: &str = "SavedPassword";
const REMEMBER_ME_KEY: &str = "RememberMe";

// ---------------------------------------------------------------------------
// Credentials
// ---------------------------------------------------------------------------

/// A validated, trimmed username/password pair.
///
/// `Debug` redacts the password so credentials can appear in tracing
/// fields without leaking it.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    /// Trims both fields and checks the length rules.
    ///
    /// The username is checked first, so a form with both fields too short
    /// reports the username.
    pub fn parse(username: &str, password: &str) -> Result<Self, ValidationError> {
        let username = username.trim();
        let password = password.trim();

        let username_len = username.chars().count();
        if username_len < MIN_USERNAME_LEN {
            return Err(ValidationError::UsernameTooShort {
                min: MIN_USERNAME_LEN,
                actual: username_len,
            });
        }

        let password_len = password.chars().count();
        if password_len < MIN_PASSWORD_LEN {
            return Err(ValidationError::PasswordTooShort {
                min: MIN_PASSWORD_LEN,
                actual: password_len,
            });
        }

        Ok(Self {
            username: username.to_string(),
            password: password.to_string(),
        })
    }

    /// The trimmed username.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// The trimmed password.
    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

// ---------------------------------------------------------------------------
// RememberedSession
// ---------------------------------------------------------------------------

/// The "remember me" record in local preferences.
///
/// Three keys make up one logical unit: the flag and both fields are
/// always written together or cleared together, never one without the
/// other. The store flushes are the caller's job.
///
/// The password is stored in plaintext. This is an auto-fill convenience,
/// not secure storage.
#[derive(Clone, PartialEq, Eq)]
pub struct RememberedSession {
    pub username: String,
    pub password: String,
}

impl RememberedSession {
    /// Reads the remembered pair, if the flag is set.
    ///
    /// A set flag with a missing field yields an empty string for that
    /// field, matching what the form would show.
    pub fn load(prefs: &impl PreferenceStore) -> Option<Self> {
        if prefs.get_int(REMEMBER_ME_KEY) != Some(1) {
            return None;
        }
        Some(Self {
            username: prefs.get_string(SAVED_USERNAME_KEY).unwrap_or_default(),
            password: prefs.get_string(SAVED_PASSWORD_KEY).unwrap_or_default(),
        })
    }

    /// Writes both fields and sets the flag.
    pub fn store(prefs: &mut impl PreferenceStore, credentials: &Credentials) {
        prefs.set_string(SAVED_USERNAME_KEY, credentials.username());
        prefs.set_string(SAVED_PASSWORD_KEY, credentials.password());
        prefs.set_int(REMEMBER_ME_KEY, 1);
    }

    /// Deletes both fields and clears the flag.
    pub fn clear(prefs: &mut impl PreferenceStore) {
        prefs.delete_key(SAVED_USERNAME_KEY);
        prefs.delete_key(SAVED_PASSWORD_KEY);
        prefs.set_int(REMEMBER_ME_KEY, 0);
    }
}

impl fmt::Debug for RememberedSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RememberedSession")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

// ---------------------------------------------------------------------------
// PlayerProfile
// ---------------------------------------------------------------------------

/// The profile attributes pushed to the cloud store after each login.
///
/// Overwritten on every successful login. Nothing is cached locally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerProfile {
    #[serde(rename = "PlayerName")]
    pub player_name: String,
}

impl PlayerProfile {
    /// A profile carrying just the player name.
    pub fn new(player_name: impl Into<String>) -> Self {
        Self {
            player_name: player_name.into(),
        }
    }

    /// Converts the profile into the cloud store's key/value shape.
    pub fn to_cloud_data(&self) -> CloudData {
        let mut data = CloudData::new();
        data.insert(
            "PlayerName".to_string(),
            serde_json::Value::String(self.player_name.clone()),
        );
        data
    }

    /// Reads a profile back out of cloud data. `None` if the name is
    /// missing or not a string.
    pub fn from_cloud_data(data: &CloudData) -> Option<Self> {
        serde_json::from_value(serde_json::Value::Object(data.clone())).ok()
    }
}
