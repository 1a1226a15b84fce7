//! Core types shared by every Gatehouse crate.
//!
//! Nothing here talks to a network or a disk. These are the values that
//! flow between the UI, the controllers, and the service adapters.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::TypesError;

// ---------------------------------------------------------------------------
// Region
// ---------------------------------------------------------------------------

/// Region codes, in dropdown order.
///
/// Slot 0 is the empty sentinel: "let the backend pick the best region".
/// The other strings are the backend's own identifiers. They are matched
/// verbatim on the server side, so they must never be renamed or
/// reordered. The UI dropdown indexes straight into this table.
const REGION_CODES: [&str; 8] = ["", "asia", "au", "eu", "hk", "in", "jp", "us"];

/// A server region the client can connect to.
///
/// The discriminants are the dropdown indices, so `region as usize` is
/// the slot in the code table. [`Region::Best`] is the default: no
/// explicit choice, the backend auto-selects by ping.
///
/// Serialized as the backend code (`"eu"`, `"jp"`, ...), with `""` for
/// [`Region::Best`], so config files use the same strings the backend does.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,
)]
pub enum Region {
    /// No explicit region: the backend picks the best one.
    #[default]
    #[serde(rename = "")]
    Best = 0,
    #[serde(rename = "asia")]
    Asia = 1,
    #[serde(rename = "au")]
    Australia = 2,
    #[serde(rename = "eu")]
    Europe = 3,
    #[serde(rename = "hk")]
    HongKong = 4,
    #[serde(rename = "in")]
    India = 5,
    #[serde(rename = "jp")]
    Japan = 6,
    #[serde(rename = "us")]
    UnitedStates = 7,
}

impl Region {
    /// Every region, in dropdown order.
    pub const ALL: [Region; 8] = [
        Self::Best,
        Self::Asia,
        Self::Australia,
        Self::Europe,
        Self::HongKong,
        Self::India,
        Self::Japan,
        Self::UnitedStates,
    ];

    /// Maps a dropdown index to a region.
    ///
    /// Index 0 and anything past the end of the table yield
    /// [`Region::Best`]. This never fails: an unexpected index just means
    /// "let the backend decide".
    pub fn from_index(index: usize) -> Self {
        Self::ALL.get(index).copied().unwrap_or(Self::Best)
    }

    /// The dropdown index of this region.
    pub fn index(self) -> usize {
        self as usize
    }

    /// The backend's region code. Empty for [`Region::Best`].
    pub fn code(self) -> &'static str {
        REGION_CODES[self.index()]
    }

    /// Returns `true` if this is the "let the backend choose" sentinel.
    pub fn is_best(self) -> bool {
        matches!(self, Self::Best)
    }

    /// Human-readable label for menus.
    pub fn label(self) -> &'static str {
        match self {
            Self::Best => "Best Server",
            Self::Asia => "Asia",
            Self::Australia => "Australia",
            Self::Europe => "Europe",
            Self::HongKong => "Hong Kong",
            Self::India => "India",
            Self::Japan => "Japan",
            Self::UnitedStates => "USA",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_best() {
            write!(f, "best")
        } else {
            f.write_str(self.code())
        }
    }
}

/// Parses a backend region code. The empty string parses as
/// [`Region::Best`].
impl FromStr for Region {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|region| region.code() == trimmed)
            .ok_or_else(|| TypesError::UnknownRegion(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Scene
// ---------------------------------------------------------------------------

/// The screens the client moves between.
///
/// ```text
/// Login ──(signed in)──→ RegionSelect ──(connected)──→ Lobby ──(joined)──→ Gameplay
///   ↑
///   └──────────────────────────(sign out)─────────────────────────────────
/// ```
///
/// Most scenes are addressed by their build index, the way the scene
/// loader expects. The login scene is only ever loaded by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Scene {
    /// Credentials entry. Loaded by name on sign-out.
    Login,
    /// Region picker, reached after a successful login.
    RegionSelect,
    /// Nickname entry and room join, reached after connecting to a region.
    Lobby,
    /// The game itself, reached after joining a room.
    Gameplay,
}

impl Scene {
    /// The scene's build index, if it is loaded by index.
    pub fn build_index(self) -> Option<u32> {
        match self {
            Self::Login => None,
            Self::Lobby => Some(1),
            Self::RegionSelect => Some(2),
            Self::Gameplay => Some(3),
        }
    }

    /// The scene's name in the build.
    pub fn name(self) -> &'static str {
        match self {
            Self::Login => "LoginScene",
            Self::RegionSelect => "RegionSelect",
            Self::Lobby => "Lobby",
            Self::Gameplay => "Gameplay",
        }
    }
}

impl fmt::Display for Scene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.build_index() {
            Some(index) => write!(f, "{}#{index}", self.name()),
            None => f.write_str(self.name()),
        }
    }
}

// ---------------------------------------------------------------------------
// DisconnectCause
// ---------------------------------------------------------------------------

/// Why the multiplayer backend dropped (or refused) the connection.
///
/// Reported through [`NetworkEvent::Disconnected`]. The client only logs
/// it; retrying is left to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DisconnectCause {
    /// The client asked to disconnect.
    DisconnectByClientLogic,
    /// The server closed the connection on purpose.
    DisconnectByServerLogic,
    /// The connection could not be established.
    ExceptionOnConnect,
    /// The server stopped answering.
    ServerTimeout,
    /// The client stopped answering (e.g. the app was suspended).
    ClientTimeout,
    /// The region code was not accepted by the name server.
    InvalidRegion,
    /// The app credentials were rejected.
    InvalidAuthentication,
    /// The concurrent-user limit of the subscription was reached.
    MaxCcuReached,
    /// Any other transport failure, with the backend's description.
    Exception(String),
}

impl fmt::Display for DisconnectCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DisconnectByClientLogic => write!(f, "DisconnectByClientLogic"),
            Self::DisconnectByServerLogic => write!(f, "DisconnectByServerLogic"),
            Self::ExceptionOnConnect => write!(f, "ExceptionOnConnect"),
            Self::ServerTimeout => write!(f, "ServerTimeout"),
            Self::ClientTimeout => write!(f, "ClientTimeout"),
            Self::InvalidRegion => write!(f, "InvalidRegion"),
            Self::InvalidAuthentication => write!(f, "InvalidAuthentication"),
            Self::MaxCcuReached => write!(f, "MaxCcuReached"),
            Self::Exception(detail) => write!(f, "Exception: {detail}"),
        }
    }
}

// ---------------------------------------------------------------------------
// NetworkEvent
// ---------------------------------------------------------------------------

/// A callback from the multiplayer backend.
///
/// Backend requests are fire-and-forget; their outcomes arrive later as
/// one of these events. The dispatch loop routes each event to the
/// controller that owns the current scene.
///
/// `#[serde(tag = "type")]` gives the flat `{ "type": "JoinedRoom" }`
/// shape, which keeps recorded event scripts readable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum NetworkEvent {
    /// The connection to the region's master server is up.
    ConnectedToMaster,

    /// The connection failed or dropped.
    Disconnected { cause: DisconnectCause },

    /// The client is now inside a room (joined or freshly created).
    JoinedRoom,

    /// No open room was available to join.
    JoinRandomFailed { code: i16, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_index_in_table_returns_fixed_code() {
        let expected = ["", "asia", "au", "eu", "hk", "in", "jp", "us"];
        for (index, code) in expected.iter().enumerate() {
            assert_eq!(Region::from_index(index).code(), *code, "index {index}");
        }
    }

    #[test]
    fn test_from_index_three_is_europe() {
        assert_eq!(Region::from_index(3), Region::Europe);
        assert_eq!(Region::from_index(3).code(), "eu");
    }

    #[test]
    fn test_from_index_zero_and_out_of_range_is_best() {
        assert_eq!(Region::from_index(0), Region::Best);
        for index in [8, 9, 42, 1_000, usize::MAX] {
            let region = Region::from_index(index);
            assert!(region.is_best(), "index {index} gave {region:?}");
            assert_eq!(region.code(), "");
        }
    }

    #[test]
    fn test_index_round_trips_through_table() {
        for region in Region::ALL {
            assert_eq!(Region::from_index(region.index()), region);
        }
    }

    #[test]
    fn test_from_str_accepts_codes_and_empty() {
        assert_eq!("jp".parse::<Region>(), Ok(Region::Japan));
        assert_eq!("".parse::<Region>(), Ok(Region::Best));
        assert_eq!(" us ".parse::<Region>(), Ok(Region::UnitedStates));
    }

    #[test]
    fn test_from_str_unknown_code_returns_error() {
        assert_eq!(
            "EU".parse::<Region>(),
            Err(TypesError::UnknownRegion("EU".into()))
        );
        assert!("mars".parse::<Region>().is_err());
    }

    #[test]
    fn test_region_display() {
        assert_eq!(Region::Best.to_string(), "best");
        assert_eq!(Region::HongKong.to_string(), "hk");
    }

    #[test]
    fn test_region_serializes_as_backend_code() {
        let json = serde_json::to_string(&Region::India).unwrap();
        assert_eq!(json, "\"in\"");
        let best: Region = serde_json::from_str("\"\"").unwrap();
        assert_eq!(best, Region::Best);
    }

    #[test]
    fn test_scene_build_indices() {
        assert_eq!(Scene::Lobby.build_index(), Some(1));
        assert_eq!(Scene::RegionSelect.build_index(), Some(2));
        assert_eq!(Scene::Gameplay.build_index(), Some(3));
        assert_eq!(Scene::Login.build_index(), None);
        assert_eq!(Scene::Login.name(), "LoginScene");
    }

    #[test]
    fn test_scene_display() {
        assert_eq!(Scene::Gameplay.to_string(), "Gameplay#3");
        assert_eq!(Scene::Login.to_string(), "LoginScene");
    }

    #[test]
    fn test_network_event_json_is_internally_tagged() {
        let event = NetworkEvent::JoinRandomFailed {
            code: 32760,
            message: "No match found".into(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "JoinRandomFailed");
        assert_eq!(json["code"], 32760);

        let parsed: NetworkEvent =
            serde_json::from_str(r#"{"type":"Disconnected","cause":"ServerTimeout"}"#)
                .unwrap();
        assert_eq!(
            parsed,
            NetworkEvent::Disconnected {
                cause: DisconnectCause::ServerTimeout
            }
        );
    }

    #[test]
    fn test_disconnect_cause_display() {
        assert_eq!(DisconnectCause::MaxCcuReached.to_string(), "MaxCcuReached");
        assert_eq!(
            DisconnectCause::Exception("socket reset".into()).to_string(),
            "Exception: socket reset"
        );
    }
}
