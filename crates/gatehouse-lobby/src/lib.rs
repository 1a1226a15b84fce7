//! Region selection and room joining for Gatehouse.
//!
//! Both controllers sit on top of the multiplayer backend and are driven
//! the same way: the UI calls a method, the controller fires a request at
//! the backend, and the outcome comes back later as a
//! [`NetworkEvent`](gatehouse_types::NetworkEvent) passed to
//! `handle_event`.
//!
//! # Key types
//!
//! - [`MultiplayerBackend`]: the backend operations the controllers use
//! - [`RegionSelector`]: picks a region and connects
//! - [`RoomJoiner`]: sets the nickname, joins any open room, and falls
//!   back to creating one
//! - [`RoomSessionState`]: the joiner's state machine

mod backend;
mod error;
mod joiner;
mod region;
mod state;

pub use backend::MultiplayerBackend;
pub use error::{LobbyError, NetworkError};
pub use joiner::{random_room_name, RoomJoiner, ROOM_NAME_PREFIX};
pub use region::RegionSelector;
pub use state::RoomSessionState;
