//! Region selection: pick a server cluster, then connect to it.

use gatehouse_types::{DisconnectCause, NetworkEvent, Region, Scene, SceneNavigator};

use crate::{LobbyError, MultiplayerBackend};

/// Maps the region dropdown to a backend region and starts the connection.
///
/// One connection attempt per button press, at most one in flight. The
/// result arrives as [`NetworkEvent::ConnectedToMaster`] or
/// [`NetworkEvent::Disconnected`]; there is no automatic retry.
pub struct RegionSelector<B, N> {
    backend: B,
    scenes: N,
    selected: Region,
    connecting: bool,
}

impl<B: MultiplayerBackend, N: SceneNavigator> RegionSelector<B, N> {
    /// Creates a selector with [`Region::Best`] preselected.
    pub fn new(backend: B, scenes: N) -> Self {
        Self {
            backend,
            scenes,
            selected: Region::Best,
            connecting: false,
        }
    }

    /// Stores the region at dropdown `index`. Out-of-range indices select
    /// [`Region::Best`].
    pub fn select_region(&mut self, index: usize) -> Region {
        self.selected = Region::from_index(index);
        tracing::debug!(index, region = %self.selected, "region selected");
        self.selected
    }

    /// The currently selected region.
    pub fn selected(&self) -> Region {
        self.selected
    }

    /// Returns `true` while a connection attempt is in flight.
    pub fn is_connecting(&self) -> bool {
        self.connecting
    }

    /// Starts connecting to the selected region.
    ///
    /// [`Region::Best`] lets the backend choose; anything else connects to
    /// that region's code.
    ///
    /// # Errors
    /// - [`LobbyError::ConnectInFlight`] if an attempt is already running
    /// - [`LobbyError::Network`] if the backend refused to start connecting
    pub fn join_selected_region(&mut self) -> Result<(), LobbyError> {
        if self.connecting {
            return Err(LobbyError::ConnectInFlight);
        }

        let request = if self.selected.is_best() {
            tracing::info!("connecting to best region");
            self.backend.connect_using_settings()
        } else {
            tracing::info!(region = %self.selected, "connecting to region");
            self.backend.connect_to_region(self.selected.code())
        };

        if let Err(e) = request {
            tracing::error!(region = %self.selected, error = %e, "connect request refused");
            return Err(e.into());
        }

        self.connecting = true;
        Ok(())
    }

    /// The backend connected. Moves on to the lobby scene.
    pub fn on_connected_to_master(&mut self) {
        self.connecting = false;
        let region = self.backend.cloud_region().unwrap_or_default();
        tracing::info!(%region, "connected to master server");
        self.scenes.load(Scene::Lobby);
    }

    /// The connection failed or dropped. Logged only; the user can press
    /// join again.
    pub fn on_disconnected(&mut self, cause: &DisconnectCause) {
        self.connecting = false;
        tracing::error!(%cause, "failed connection");
    }

    /// Routes a backend event to the matching callback.
    ///
    /// Returns `false` for events this controller doesn't handle.
    pub fn handle_event(&mut self, event: &NetworkEvent) -> bool {
        match event {
            NetworkEvent::ConnectedToMaster => self.on_connected_to_master(),
            NetworkEvent::Disconnected { cause } => self.on_disconnected(cause),
            _ => return false,
        }
        true
    }
}
