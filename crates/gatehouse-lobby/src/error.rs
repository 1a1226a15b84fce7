//! Error types for the lobby layer.

/// The backend refused to send a request.
///
/// This is the synchronous "could not even queue it" failure. Failures
/// that happen after the request is sent arrive later as events.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NetworkError {
    /// The client is in a state where the operation can't be sent (for
    /// example, connecting while already connected).
    #[error("backend refused {0} request")]
    Refused(&'static str),

    /// Any other backend failure, with its description.
    #[error("backend error: {0}")]
    Backend(String),
}

/// Errors that can occur during region or room operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LobbyError {
    /// The nickname is empty or whitespace. Nothing was sent.
    #[error("player name is empty")]
    BlankName,

    /// The backend is not connected and ready. Nothing was sent.
    #[error("not connected to server")]
    NotConnected,

    /// A connection attempt is already in flight.
    #[error("a connection attempt is already in progress")]
    ConnectInFlight,

    /// A join or create request is already in flight.
    #[error("a room request is already in progress")]
    RequestPending,

    /// The client is already inside a room.
    #[error("already in a room")]
    AlreadyInRoom,

    /// The backend refused the request.
    #[error(transparent)]
    Network(#[from] NetworkError),
}
