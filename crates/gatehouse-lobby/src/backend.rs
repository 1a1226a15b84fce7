//! The multiplayer backend seen from the lobby controllers.

use std::sync::Arc;

use crate::NetworkError;

/// Requests the lobby controllers send to the multiplayer backend.
///
/// Every request is fire-and-forget: `Ok(())` means the request went out,
/// not that it succeeded. Outcomes arrive later as
/// [`NetworkEvent`](gatehouse_types::NetworkEvent)s.
///
/// Methods take `&self` because the backend is one shared client: the
/// region selector and the room joiner hold handles to the same
/// connection. Implementations use interior mutability where needed.
pub trait MultiplayerBackend: Send + Sync + 'static {
    /// Connects using the app's default settings, letting the backend
    /// pick the best region by ping.
    fn connect_using_settings(&self) -> Result<(), NetworkError>;

    /// Connects to the region with the given backend code.
    fn connect_to_region(&self, region_code: &str) -> Result<(), NetworkError>;

    /// Returns `true` once connected to the master server and able to
    /// send room operations.
    fn is_connected_and_ready(&self) -> bool;

    /// The region the client is connected to, if any.
    fn cloud_region(&self) -> Option<String>;

    /// Sets the local player's nickname, visible to other players.
    fn set_nickname(&self, nickname: &str);

    /// When on, scene loads by the room's master client are mirrored on
    /// every client in the room.
    fn set_automatically_sync_scene(&self, enabled: bool);

    /// Asks to join any open room.
    fn join_random_room(&self) -> Result<(), NetworkError>;

    /// Asks to create (and join) a room with the given name.
    fn create_room(&self, room_name: &str) -> Result<(), NetworkError>;
}

impl<T: MultiplayerBackend> MultiplayerBackend for Arc<T> {
    fn connect_using_settings(&self) -> Result<(), NetworkError> {
        (**self).connect_using_settings()
    }

    fn connect_to_region(&self, region_code: &str) -> Result<(), NetworkError> {
        (**self).connect_to_region(region_code)
    }

    fn is_connected_and_ready(&self) -> bool {
        (**self).is_connected_and_ready()
    }

    fn cloud_region(&self) -> Option<String> {
        (**self).cloud_region()
    }

    fn set_nickname(&self, nickname: &str) {
        (**self).set_nickname(nickname);
    }

    fn set_automatically_sync_scene(&self, enabled: bool) {
        (**self).set_automatically_sync_scene(enabled);
    }

    fn join_random_room(&self) -> Result<(), NetworkError> {
        (**self).join_random_room()
    }

    fn create_room(&self, room_name: &str) -> Result<(), NetworkError> {
        (**self).create_room(room_name)
    }
}
