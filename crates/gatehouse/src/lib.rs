//! # Gatehouse
//!
//! The front door of a multiplayer game client: log in, pick a region,
//! get into a room, hand off to gameplay.
//!
//! Gatehouse doesn't implement auth, networking, or rendering. It
//! sequences calls to services that do, through small traits you
//! implement (or adapt from your SDK):
//!
//! - [`AuthService`] and [`CloudStore`] for accounts and the player profile
//! - [`PreferenceStore`] for remembered credentials
//! - [`MultiplayerBackend`] for region connection and rooms
//!
//! [`GameClient`] ties them together with a [`SceneRouter`] and runs a
//! single-task loop over UI commands and backend events.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use gatehouse::prelude::*;
//!
//! // Implement the service traits, then:
//! // let client = GameClientBuilder::new()
//! //     .config(ClientConfig::load("client.json")?)
//! //     .build(auth, cloud, prefs, backend);
//! // client.run(ui_rx, net_rx).await;
//! ```

mod client;
mod config;
mod error;
mod router;
pub mod telemetry;

pub use client::{GameClient, GameClientBuilder, UiCommand};
pub use config::ClientConfig;
pub use error::{ClientError, ConfigError};
pub use router::SceneRouter;

pub use gatehouse_auth::{AuthService, CloudStore, PreferenceStore};
pub use gatehouse_lobby::MultiplayerBackend;

/// Everything a client binary usually needs.
pub mod prelude {
    pub use crate::{
        ClientConfig, ClientError, GameClient, GameClientBuilder, SceneRouter, UiCommand,
    };

    pub use gatehouse_auth::{
        AuthConfig, AuthError, AuthService, AuthServiceError, CloudData, CloudSaveError,
        CloudStore, JsonFilePreferences, LoginForm, MemoryPreferences, PreferenceStore,
        ServicesState, SessionAuthController,
    };
    pub use gatehouse_lobby::{
        LobbyError, MultiplayerBackend, NetworkError, RegionSelector, RoomJoiner,
        RoomSessionState,
    };
    pub use gatehouse_types::{
        DisconnectCause, NetworkEvent, Region, Scene, SceneNavigator, TypesError,
    };
}
