//! Error types for the auth layer.

/// A credential rule was violated. Raised before any network call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// The trimmed username is shorter than the minimum.
    #[error("username must be at least {min} characters (got {actual})")]
    UsernameTooShort { min: usize, actual: usize },

    /// The trimmed password is shorter than the minimum.
    #[error("password must be at least {min} characters (got {actual})")]
    PasswordTooShort { min: usize, actual: usize },
}

/// The auth service rejected a request.
///
/// `message` is the service's own wording. It is shown to the user as-is.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct AuthServiceError {
    pub message: String,
}

impl AuthServiceError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Writing the player profile to the cloud store failed.
///
/// Never fatal: the login it follows has already succeeded.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("cloud save failed: {0}")]
pub struct CloudSaveError(pub String);

/// The local preference store could not be read or flushed.
#[derive(Debug, thiserror::Error)]
pub enum PrefsError {
    #[error("preference file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("preference file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors returned by [`SessionAuthController`](crate::SessionAuthController).
///
/// Every variant also leaves the controller's form in a consistent state:
/// the status line says what happened and submission is re-armed unless
/// the variant says otherwise.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Credentials failed local validation. Nothing was sent.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// [`start`](crate::SessionAuthController::start) has not finished, so
    /// the backend may not be ready.
    #[error("auth services are not ready")]
    NotReady,

    /// Another request from this controller is still in flight.
    #[error("a request is already in flight")]
    Busy,

    /// The auth service rejected the request.
    #[error("auth service error: {0}")]
    Service(#[from] AuthServiceError),

    /// The auth services could not be initialized. Submission stays off.
    #[error("auth service initialization failed: {0}")]
    Initialization(AuthServiceError),
}
