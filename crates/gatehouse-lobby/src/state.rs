//! The room joiner's state machine.

use std::fmt;

/// Where the room joiner is in its join sequence.
///
/// ```text
/// Idle ──enter_room()──→ PendingJoin ──JoinedRoom──→ Joined
///                            │                          ↑
///                     JoinRandomFailed                  │
///                            ▼                          │
///                      PendingCreate ────JoinedRoom─────┘
/// ```
///
/// There is no failure state. If the backend refuses to send a request
/// the joiner drops back to `Idle` and the user retries by hand.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RoomSessionState {
    /// Nothing requested yet.
    #[default]
    Idle,
    /// Waiting for the answer to "join any open room".
    PendingJoin,
    /// No open room was found; waiting for our own room to be created.
    PendingCreate { room_name: String },
    /// Inside a room.
    Joined,
}

impl RoomSessionState {
    /// Returns `true` while a join or create request is outstanding.
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::PendingJoin | Self::PendingCreate { .. })
    }

    /// Returns `true` if moving to `target` follows the diagram above.
    ///
    /// Pending states may also fall back to `Idle` when the backend
    /// refuses to send the request.
    pub fn can_transition_to(&self, target: &Self) -> bool {
        matches!(
            (self, target),
            (Self::Idle, Self::PendingJoin)
                | (Self::PendingJoin, Self::PendingCreate { .. })
                | (Self::PendingJoin, Self::Joined)
                | (Self::PendingCreate { .. }, Self::Joined)
                | (Self::PendingJoin, Self::Idle)
                | (Self::PendingCreate { .. }, Self::Idle)
        )
    }
}

impl fmt::Display for RoomSessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::PendingJoin => write!(f, "PendingJoin"),
            Self::PendingCreate { room_name } => write!(f, "PendingCreate({room_name})"),
            Self::Joined => write!(f, "Joined"),
        }
    }
}
