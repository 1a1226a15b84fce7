//! Room joining: nickname, join any open room, create one if none exist.

use gatehouse_types::{NetworkEvent, Scene, SceneNavigator};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::{LobbyError, MultiplayerBackend, RoomSessionState};

/// Prefix of generated room names.
pub const ROOM_NAME_PREFIX: &str = "Room_";

/// Builds a fallback room name: `Room_` plus a number in `[1000, 9999)`.
///
/// Nothing checks the name against existing rooms. Two clients can draw
/// the same suffix; the backend then rejects the second create.
pub fn random_room_name<R: Rng + ?Sized>(rng: &mut R) -> String {
    let suffix: u16 = rng.random_range(1000..9999);
    format!("{ROOM_NAME_PREFIX}{suffix}")
}

/// Sets the player's nickname and gets them into a room.
///
/// Matchmaking is the simplest possible: ask the backend for any open
/// room, and if there is none, create one with a random name. Only one
/// join or create request is outstanding at a time.
pub struct RoomJoiner<B, N> {
    backend: B,
    scenes: N,
    nickname: String,
    state: RoomSessionState,
    loading: bool,
    rng: StdRng,
}

impl<B: MultiplayerBackend, N: SceneNavigator> RoomJoiner<B, N> {
    /// Creates a joiner seeded from the OS.
    pub fn new(backend: B, scenes: N) -> Self {
        Self::with_rng(backend, scenes, StdRng::from_os_rng())
    }

    /// Creates a joiner with a caller-supplied RNG for room names.
    pub fn with_rng(backend: B, scenes: N, rng: StdRng) -> Self {
        Self {
            backend,
            scenes,
            nickname: String::new(),
            state: RoomSessionState::Idle,
            loading: false,
            rng,
        }
    }

    /// Trims `text` and makes it the player's nickname on the backend.
    pub fn set_display_name(&mut self, text: &str) {
        self.nickname = text.trim().to_string();
        self.backend.set_nickname(&self.nickname);
        tracing::debug!(nickname = %self.nickname, "nickname set");
    }

    /// The current (trimmed) nickname.
    pub fn nickname(&self) -> &str {
        &self.nickname
    }

    /// Asks the backend to join any open room.
    ///
    /// # Errors
    /// Nothing is sent in any error case.
    /// - [`LobbyError::BlankName`] if no nickname is set
    /// - [`LobbyError::RequestPending`] if a join or create is outstanding
    /// - [`LobbyError::AlreadyInRoom`] after a successful join
    /// - [`LobbyError::NotConnected`] if the backend isn't connected and ready
    /// - [`LobbyError::Network`] if the backend refused the request
    pub fn enter_room(&mut self) -> Result<(), LobbyError> {
        tracing::debug!(state = %self.state, "enter room pressed");

        if self.nickname.is_empty() {
            tracing::warn!("player name is empty");
            return Err(LobbyError::BlankName);
        }
        if self.state.is_pending() {
            return Err(LobbyError::RequestPending);
        }
        if self.state == RoomSessionState::Joined {
            return Err(LobbyError::AlreadyInRoom);
        }
        if !self.backend.is_connected_and_ready() {
            tracing::error!("not connected to server");
            return Err(LobbyError::NotConnected);
        }

        self.backend.set_automatically_sync_scene(true);
        if let Err(e) = self.backend.join_random_room() {
            tracing::error!(error = %e, "join request refused");
            return Err(e.into());
        }

        self.transition(RoomSessionState::PendingJoin);
        self.loading = true;
        tracing::info!(nickname = %self.nickname, "joining a random room");
        Ok(())
    }

    /// Joined a room (found or created). Loads the gameplay scene.
    pub fn on_joined_room(&mut self) {
        self.transition(RoomSessionState::Joined);
        self.loading = false;
        tracing::info!(nickname = %self.nickname, "joined room");
        self.scenes.load(Scene::Gameplay);
    }

    /// No open room to join. Falls back to creating one under a random
    /// name.
    ///
    /// Exactly one create request is sent per call.
    ///
    /// # Errors
    /// [`LobbyError::Network`] if the backend refused the create. The
    /// joiner goes back to `Idle` so the user can try again.
    pub fn on_join_random_failed(&mut self, code: i16, message: &str) -> Result<(), LobbyError> {
        let room_name = random_room_name(&mut self.rng);
        tracing::info!(code, reason = message, %room_name, "no open room, creating one");

        if let Err(e) = self.backend.create_room(&room_name) {
            tracing::error!(%room_name, error = %e, "create request refused");
            self.transition(RoomSessionState::Idle);
            self.loading = false;
            return Err(e.into());
        }

        self.transition(RoomSessionState::PendingCreate { room_name });
        Ok(())
    }

    /// Shuts the client down. Unconditional.
    pub fn exit(&self) {
        tracing::info!("exit requested");
        self.scenes.quit();
    }

    /// Routes a backend event to the matching callback.
    ///
    /// Returns `Ok(false)` for events this controller doesn't handle.
    pub fn handle_event(&mut self, event: &NetworkEvent) -> Result<bool, LobbyError> {
        match event {
            NetworkEvent::JoinedRoom => self.on_joined_room(),
            NetworkEvent::JoinRandomFailed { code, message } => {
                self.on_join_random_failed(*code, message)?;
            }
            _ => return Ok(false),
        }
        Ok(true)
    }

    /// The current join state.
    pub fn state(&self) -> &RoomSessionState {
        &self.state
    }

    /// Loading indicator visibility.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Moves to `next`, logging transitions the diagram doesn't expect.
    ///
    /// Unexpected transitions still happen: backend callbacks are facts,
    /// not requests.
    fn transition(&mut self, next: RoomSessionState) {
        if !self.state.can_transition_to(&next) {
            tracing::debug!(from = %self.state, to = %next, "unexpected room state transition");
        }
        self.state = next;
    }
}
