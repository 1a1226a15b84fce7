//! Shared vocabulary for Gatehouse.
//!
//! Every other crate in the workspace speaks in terms of these types:
//!
//! - **Regions** ([`Region`]): the fixed, ordered table of server region
//!   codes the multiplayer backend understands.
//! - **Scenes** ([`Scene`]): the screens the client moves between
//!   (login, region select, lobby, gameplay).
//! - **Backend events** ([`NetworkEvent`], [`DisconnectCause`]): the
//!   callbacks the multiplayer backend delivers out-of-band.
//! - **Navigation** ([`SceneNavigator`]): the one hook every controller
//!   uses to leave its scene.
//!
//! # Architecture
//!
//! This crate sits at the bottom of the stack. It owns no behavior beyond
//! lookups and formatting. The controllers that act on these values live
//! in `gatehouse-auth` and `gatehouse-lobby`.
//!
//! ```text
//! gatehouse (dispatch loop)
//!     ↕
//! gatehouse-auth / gatehouse-lobby (controllers)
//!     ↕
//! gatehouse-types (this crate)
//! ```

mod error;
mod navigator;
mod types;

pub use error::TypesError;
pub use navigator::SceneNavigator;
pub use types::{DisconnectCause, NetworkEvent, Region, Scene};
