//! `GameClient` builder and dispatch loop.
//!
//! This is the entry point for running the client flow. It owns the
//! three controllers and routes input to whichever one owns the current
//! scene:
//!
//! ```text
//! UI commands ──┐
//!               ├─→ GameClient::run ─→ SessionAuthController (Login)
//! net events ───┘        │           ─→ RegionSelector        (RegionSelect)
//!                        │           ─→ RoomJoiner            (Lobby)
//!                        ▼
//!                   SceneRouter (watch)
//! ```
//!
//! Controller state lives on one task. Remote auth calls and the
//! post-login delay run in a [`JoinSet`] the loop polls next to both
//! channels, so input keeps flowing while they are outstanding: a second
//! login click gets [`AuthError::Busy`](gatehouse_auth::AuthError::Busy)
//! and `Exit` still quits. Backend events only reach the controller of
//! the scene that is loaded.

use std::fmt;

use gatehouse_auth::{
    AuthService, AuthServiceError, CloudStore, Credentials, PreferenceStore,
    SessionAuthController,
};
use gatehouse_lobby::{MultiplayerBackend, RegionSelector, RoomJoiner};
use gatehouse_types::{NetworkEvent, Scene};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinSet};

use crate::{ClientConfig, ClientError, SceneRouter};

// ---------------------------------------------------------------------------
// UI commands
// ---------------------------------------------------------------------------

/// One user action from the UI.
#[derive(Clone, PartialEq, Eq)]
pub enum UiCommand {
    /// Login button, with the field contents.
    Login { username: String, password: String },
    /// Signup button, with the field contents.
    Signup { username: String, password: String },
    /// Remember-me checkbox changed.
    ToggleRememberMe(bool),
    /// Sign-out button.
    SignOut,
    /// Region dropdown changed to this index.
    SelectRegion(usize),
    /// Join button on the region scene.
    JoinRegion,
    /// Nickname field changed.
    SetDisplayName(String),
    /// Enter-room button.
    EnterRoom,
    /// Exit button. Accepted on every scene.
    Exit,
}

impl UiCommand {
    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Login { .. } => "login",
            Self::Signup { .. } => "signup",
            Self::ToggleRememberMe(_) => "toggle_remember_me",
            Self::SignOut => "sign_out",
            Self::SelectRegion(_) => "select_region",
            Self::JoinRegion => "join_region",
            Self::SetDisplayName(_) => "set_display_name",
            Self::EnterRoom => "enter_room",
            Self::Exit => "exit",
        }
    }

    /// The scene whose controls issue this command. `None` means any.
    pub fn scene(&self) -> Option<Scene> {
        match self {
            Self::Login { .. } | Self::Signup { .. } | Self::ToggleRememberMe(_) | Self::SignOut => {
                Some(Scene::Login)
            }
            Self::SelectRegion(_) | Self::JoinRegion => Some(Scene::RegionSelect),
            Self::SetDisplayName(_) | Self::EnterRoom => Some(Scene::Lobby),
            Self::Exit => None,
        }
    }
}

impl fmt::Debug for UiCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Login { username, .. } => f
                .debug_struct("Login")
                .field("username", username)
                .field("password", &"<redacted>")
                .finish(),
            Self::Signup { username, .. } => f
                .debug_struct("Signup")
                .field("username", username)
                .field("password", &"<redacted>")
                .finish(),
            Self::ToggleRememberMe(on) => f.debug_tuple("ToggleRememberMe").field(on).finish(),
            Self::SignOut => f.write_str("SignOut"),
            Self::SelectRegion(index) => f.debug_tuple("SelectRegion").field(index).finish(),
            Self::JoinRegion => f.write_str("JoinRegion"),
            Self::SetDisplayName(name) => f.debug_tuple("SetDisplayName").field(name).finish(),
            Self::EnterRoom => f.write_str("EnterRoom"),
            Self::Exit => f.write_str("Exit"),
        }
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Builder for configuring a [`GameClient`].
///
/// # Example
///
/// ```rust,ignore
/// use gatehouse::prelude::*;
///
/// let client = GameClientBuilder::new()
///     .config(ClientConfig::load("client.json")?)
///     .build(auth, cloud, prefs, backend);
/// client.run(ui_rx, net_rx).await;
/// ```
pub struct GameClientBuilder {
    config: ClientConfig,
    router: SceneRouter,
    rng: Option<StdRng>,
}

impl GameClientBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            config: ClientConfig::default(),
            router: SceneRouter::new(),
            rng: None,
        }
    }

    /// Sets the client configuration.
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Uses an existing router, e.g. one a UI already subscribed to.
    pub fn router(mut self, router: SceneRouter) -> Self {
        self.router = router;
        self
    }

    /// Seeds the room-name RNG. Without this it is seeded from the OS.
    pub fn rng(mut self, rng: StdRng) -> Self {
        self.rng = Some(rng);
        self
    }

    /// Wires the controllers to the given services.
    ///
    /// `backend` is cloned into the region selector and the room joiner;
    /// both must talk to the same connection. `auth` and `cloud` are
    /// cloned into background calls. Pass shared handles such as an `Arc`.
    pub fn build<A, C, P, B>(self, auth: A, cloud: C, prefs: P, backend: B) -> GameClient<A, C, P, B>
    where
        A: AuthService + Clone,
        C: CloudStore + Clone,
        P: PreferenceStore,
        B: MultiplayerBackend + Clone,
    {
        let router = self.router;
        let rng = self.rng.unwrap_or_else(StdRng::from_os_rng);

        GameClient {
            auth: SessionAuthController::new(
                auth,
                cloud,
                prefs,
                router.clone(),
                self.config.auth_config(),
            ),
            regions: RegionSelector::new(backend.clone(), router.clone()),
            rooms: RoomJoiner::with_rng(backend, router.clone(), rng),
            router,
            pending: JoinSet::new(),
        }
    }
}

impl Default for GameClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Auth work finished in the background, waiting to be applied.
enum AuthReply {
    SignIn(Credentials, Result<(), AuthServiceError>),
    SignUp(Credentials, Result<(), AuthServiceError>),
    Handoff,
}

/// The whole client flow: login, region, room.
pub struct GameClient<A, C, P, B> {
    auth: SessionAuthController<A, C, P, SceneRouter>,
    regions: RegionSelector<B, SceneRouter>,
    rooms: RoomJoiner<B, SceneRouter>,
    router: SceneRouter,

    /// Outstanding auth calls. Dropping the client aborts them.
    pending: JoinSet<AuthReply>,
}

impl<A, C, P, B> GameClient<A, C, P, B>
where
    A: AuthService + Clone,
    C: CloudStore + Clone,
    P: PreferenceStore,
    B: MultiplayerBackend + Clone,
{
    /// The router every controller navigates through.
    pub fn router(&self) -> &SceneRouter {
        &self.router
    }

    /// The login controller.
    pub fn auth(&self) -> &SessionAuthController<A, C, P, SceneRouter> {
        &self.auth
    }

    /// The region controller.
    pub fn regions(&self) -> &RegionSelector<B, SceneRouter> {
        &self.regions
    }

    /// The room controller.
    pub fn rooms(&self) -> &RoomJoiner<B, SceneRouter> {
        &self.rooms
    }

    /// Initializes auth services and enables the login form.
    pub async fn start(&mut self) -> Result<(), ClientError> {
        self.auth.start().await?;
        Ok(())
    }

    /// Returns `true` while an auth call or the post-login delay is
    /// outstanding.
    pub fn has_pending_auth(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Applies one UI command.
    ///
    /// Login and signup only send the request: the answer is applied by
    /// [`run`](Self::run), [`complete_next`](Self::complete_next), or
    /// [`settle`](Self::settle).
    ///
    /// Returns `Ok(false)` if the command belongs to a scene that isn't
    /// loaded. Such commands are stale clicks and are dropped.
    pub async fn handle_command(&mut self, command: UiCommand) -> Result<bool, ClientError> {
        let current = self.router.current();
        if command.scene().is_some_and(|owner| owner != current) {
            tracing::debug!(command = command.name(), scene = %current, "command ignored outside its scene");
            return Ok(false);
        }

        match command {
            UiCommand::Login { username, password } => {
                let credentials = self.auth.begin_login(&username, &password)?;
                let request = self.auth.sign_in_request(&credentials);
                self.pending
                    .spawn(async move { AuthReply::SignIn(credentials, request.await) });
            }
            UiCommand::Signup { username, password } => {
                let credentials = self.auth.begin_signup(&username, &password)?;
                let request = self.auth.sign_up_request(&credentials);
                self.pending
                    .spawn(async move { AuthReply::SignUp(credentials, request.await) });
            }
            UiCommand::ToggleRememberMe(on) => self.auth.toggle_remember_me(on),
            UiCommand::SignOut => self.auth.sign_out(),
            UiCommand::SelectRegion(index) => {
                self.regions.select_region(index);
            }
            UiCommand::JoinRegion => self.regions.join_selected_region()?,
            UiCommand::SetDisplayName(name) => self.rooms.set_display_name(&name),
            UiCommand::EnterRoom => self.rooms.enter_room()?,
            UiCommand::Exit => self.rooms.exit(),
        }
        Ok(true)
    }

    /// Applies one backend event.
    ///
    /// Connection events go to the region selector while the region
    /// scene is loaded, and room events to the room joiner while the
    /// lobby is. Returns `Ok(false)` for anything else.
    pub fn handle_event(&mut self, event: &NetworkEvent) -> Result<bool, ClientError> {
        let scene = self.router.current();
        let handled = match scene {
            Scene::RegionSelect => self.regions.handle_event(event),
            Scene::Lobby => self.rooms.handle_event(event)?,
            Scene::Login | Scene::Gameplay => false,
        };
        if !handled {
            tracing::debug!(?event, %scene, "network event ignored");
        }
        Ok(handled)
    }

    /// Waits for the next outstanding auth call to finish and applies it.
    ///
    /// Returns `None` when nothing is outstanding.
    pub async fn complete_next(&mut self) -> Option<Result<(), ClientError>> {
        let joined = self.pending.join_next().await?;
        Some(self.apply_auth_reply(joined))
    }

    /// Applies every outstanding auth call, including the post-login
    /// handoff it starts. Returns the first error.
    pub async fn settle(&mut self) -> Result<(), ClientError> {
        let mut first = Ok(());
        while let Some(result) = self.complete_next().await {
            first = first.and(result);
        }
        first
    }

    fn apply_auth_reply(&mut self, joined: Result<AuthReply, JoinError>) -> Result<(), ClientError> {
        let reply = match joined {
            Ok(reply) => reply,
            Err(e) => {
                tracing::error!(error = %e, "auth task did not finish");
                return Ok(());
            }
        };

        match reply {
            AuthReply::SignIn(credentials, outcome) => {
                if let Some(profile) = self.auth.accept_login(credentials, outcome)? {
                    let handoff = self.auth.handoff(profile);
                    self.pending.spawn(async move {
                        handoff.await;
                        AuthReply::Handoff
                    });
                }
            }
            AuthReply::SignUp(credentials, outcome) => {
                self.auth.complete_signup(credentials, outcome)?;
            }
            AuthReply::Handoff => {
                self.auth.finish_login();
            }
        }
        Ok(())
    }

    /// Runs the dispatch loop.
    ///
    /// Starts the auth services, then handles UI commands, backend events,
    /// and finished auth calls as they arrive. Errors from individual
    /// items are logged and the loop carries on; the controllers have
    /// already put their forms back in a usable state.
    ///
    /// Returns once [`quit`](gatehouse_types::SceneNavigator::quit) is
    /// called or either channel closes.
    pub async fn run(
        mut self,
        mut commands: mpsc::Receiver<UiCommand>,
        mut events: mpsc::Receiver<NetworkEvent>,
    ) {
        if let Err(e) = self.start().await {
            tracing::error!(error = %e, "login unavailable");
        }
        tracing::info!(scene = %self.router.current(), "client running");

        loop {
            tokio::select! {
                command = commands.recv() => {
                    let Some(command) = command else {
                        tracing::debug!("command channel closed");
                        break;
                    };
                    let name = command.name();
                    if let Err(e) = self.handle_command(command).await {
                        tracing::warn!(command = name, error = %e, "command failed");
                    }
                }
                event = events.recv() => {
                    let Some(event) = event else {
                        tracing::debug!("event channel closed");
                        break;
                    };
                    if let Err(e) = self.handle_event(&event) {
                        tracing::warn!(?event, error = %e, "event handling failed");
                    }
                }
                Some(joined) = self.pending.join_next(), if !self.pending.is_empty() => {
                    if let Err(e) = self.apply_auth_reply(joined) {
                        tracing::warn!(error = %e, "auth request failed");
                    }
                }
            }

            if self.router.quit_requested() {
                break;
            }
        }

        if !self.pending.is_empty() {
            tracing::debug!(outstanding = self.pending.len(), "abandoning auth calls");
        }
        tracing::info!("client stopped");
    }
}
