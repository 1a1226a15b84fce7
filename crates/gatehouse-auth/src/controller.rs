//! The login scene's controller.
//!
//! [`SessionAuthController`] owns the login form model and sequences every
//! account operation:
//!
//! ```text
//! start() ──→ [ready] ──begin_login()──→ [busy] ──accept_login(Ok)──→ handoff() ──finish_login()──→ RegionSelect
//!                 ↑                         │
//!                 └────accept_login(Err)────┘
//!
//! sign_out() ──→ [ready] + Login scene   (from any state)
//! ```
//!
//! # Concurrency note
//!
//! The controller is driven from a single task. The `busy` flag replaces
//! a disabled login button: it is set when a request goes out and cleared
//! on every path that should re-arm the form. Login and signup are split
//! into `begin_*` / `accept_*` / `complete_*` steps so a dispatcher can
//! hold a request in flight and still observe (and reject) a second click.
//! [`sign_in_request`](SessionAuthController::sign_in_request) and
//! [`handoff`](SessionAuthController::handoff) return owned futures for
//! that purpose. The one-shot `submit_*` methods run every step inline.
//!
//! There is no timeout. A remote call that never resolves leaves the form
//! disabled until the user signs out or restarts.

use std::future::Future;
use std::time::Duration;

use gatehouse_types::{Scene, SceneNavigator};

use crate::{
    AuthError, AuthService, AuthServiceError, CloudStore, Credentials,
    PlayerProfile, PreferenceStore, RememberedSession, ServicesState,
};

/// Status line shown when the form fails local validation.
const VALIDATION_STATUS: &str = "Username must be 3+ chars & Password 6+ chars!";

// ---------------------------------------------------------------------------
// AuthConfig
// ---------------------------------------------------------------------------

/// Timing knobs for the login scene.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// How long the "Login successful" status stays up before the region
    /// select scene loads. Purely visual.
    ///
    /// Default: 2 seconds.
    pub transition_delay: Duration,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            transition_delay: Duration::from_secs(2),
        }
    }
}

// ---------------------------------------------------------------------------
// LoginForm
// ---------------------------------------------------------------------------

/// What the login scene shows.
///
/// The UI reads this after each command; it never writes to it directly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    /// Username field text (pre-filled from the remembered session).
    pub username: String,
    /// Password field text (pre-filled from the remembered session).
    pub password: String,
    /// The remember-me toggle.
    pub remember_me: bool,
    /// Status line under the form.
    pub status: String,
    /// Loading spinner visibility.
    pub loading: bool,
    /// Login button visibility.
    pub login_visible: bool,
    /// Sign-out button visibility.
    pub sign_out_visible: bool,
}

// ---------------------------------------------------------------------------
// SessionAuthController
// ---------------------------------------------------------------------------

/// Validates and submits credentials, manages remember-me, and hands off
/// to the region select scene after login.
///
/// Every collaborator is injected: `A` is the auth provider, `C` the cloud
/// key/value store, `P` local preferences, `N` scene navigation.
pub struct SessionAuthController<A, C, P, N> {
    auth: A,
    cloud: C,
    prefs: P,
    scenes: N,
    config: AuthConfig,
    form: LoginForm,

    /// Set once `start()` has initialized the services.
    ready: bool,

    /// A request is in flight (or a login succeeded and the scene is
    /// about to change). Submission is rejected while set.
    busy: bool,

    /// A login was accepted and the region select scene is still to load.
    handoff_pending: bool,
}

impl<A, C, P, N> SessionAuthController<A, C, P, N>
where
    A: AuthService,
    C: CloudStore,
    P: PreferenceStore,
    N: SceneNavigator,
{
    /// Creates a controller. Submission stays disabled until
    /// [`start`](Self::start) completes.
    pub fn new(auth: A, cloud: C, prefs: P, scenes: N, config: AuthConfig) -> Self {
        Self {
            auth,
            cloud,
            prefs,
            scenes,
            config,
            form: LoginForm::default(),
            ready: false,
            busy: false,
            handoff_pending: false,
        }
    }

    /// Initializes the auth services (once per process) and restores the
    /// remembered login into the form.
    ///
    /// If the provider already reports [`Initialized`], no initialization
    /// request is made, so re-entering the login scene is cheap. Restoring
    /// only pre-fills the form. It never signs in.
    ///
    /// [`Initialized`]: ServicesState::Initialized
    ///
    /// # Errors
    /// [`AuthError::Initialization`] if the provider fails to come up.
    /// Submission stays disabled in that case.
    pub async fn start(&mut self) -> Result<(), AuthError> {
        self.ready = false;

        if self.auth.state() != ServicesState::Initialized {
            tracing::info!("initializing auth services");
            if let Err(e) = self.auth.initialize().await {
                tracing::error!(error = %e, "auth service initialization failed");
                self.form.status = format!("Service unavailable: {}", e.message);
                return Err(AuthError::Initialization(e));
            }
        }

        self.restore_remembered();
        self.form.login_visible = true;
        self.form.sign_out_visible = false;
        self.ready = true;
        tracing::debug!("login form enabled");
        Ok(())
    }

    /// Sets the remember-me toggle. Read when a login succeeds.
    pub fn toggle_remember_me(&mut self, on: bool) {
        self.form.remember_me = on;
    }

    // -- Login ------------------------------------------------------------

    /// First half of a login: checks readiness and the length rules, then
    /// marks the controller busy.
    ///
    /// On `Ok`, the caller must send the returned credentials to the auth
    /// service and pass the outcome to [`complete_login`](Self::complete_login).
    ///
    /// # Errors
    /// - [`AuthError::NotReady`] before `start()` has finished
    /// - [`AuthError::Busy`] while another request is in flight
    /// - [`AuthError::Validation`] if a field is too short; the status line
    ///   explains the rule and nothing is sent
    pub fn begin_login(
        &mut self,
        username: &str,
        password: &str,
    ) -> Result<Credentials, AuthError> {
        let credentials = self.begin(username, password)?;
        tracing::info!(username = credentials.username(), "signing in");
        Ok(credentials)
    }

    /// The remote sign-in for credentials from [`begin_login`](Self::begin_login).
    ///
    /// The future owns a clone of the auth handle, so a dispatcher can
    /// poll it while it keeps handling input.
    pub fn sign_in_request(
        &self,
        credentials: &Credentials,
    ) -> impl Future<Output = Result<(), AuthServiceError>> + Send + 'static + use<A, C, P, N>
    where
        A: Clone,
    {
        let auth = self.auth.clone();
        let username = credentials.username().to_string();
        let password = credentials.password().to_string();
        async move { auth.sign_in(&username, &password).await }
    }

    /// Applies the service's answer to a login, without any waiting.
    ///
    /// On success: persists or clears the remembered login and returns
    /// the profile to push to the cloud. The form stays disabled; run
    /// [`handoff`](Self::handoff) and then [`finish_login`](Self::finish_login).
    ///
    /// On failure: shows the service's message and re-arms the form.
    ///
    /// Returns `Ok(None)` if the user signed out while the request was in
    /// flight. The late answer is dropped.
    pub fn accept_login(
        &mut self,
        credentials: Credentials,
        outcome: Result<(), AuthServiceError>,
    ) -> Result<Option<PlayerProfile>, AuthError> {
        if !self.busy {
            tracing::debug!(username = credentials.username(), "login answer after sign-out dropped");
            return Ok(None);
        }

        if let Err(e) = outcome {
            tracing::warn!(
                username = credentials.username(),
                error = %e,
                "login rejected"
            );
            self.form.status = format!("Login failed: {}", e.message);
            self.form.loading = false;
            self.busy = false;
            return Err(AuthError::Service(e));
        }

        tracing::info!(username = credentials.username(), "login succeeded");
        self.form.status = "Login successful! Loading Main Menu...".to_string();

        self.persist_remembered(&credentials);
        self.form.loading = false;
        self.handoff_pending = true;
        Ok(Some(PlayerProfile::new(credentials.username())))
    }

    /// The slow tail of a successful login: saves the player name to the
    /// cloud (a failure there is only logged), then waits out the visual
    /// delay.
    pub fn handoff(
        &self,
        profile: PlayerProfile,
    ) -> impl Future<Output = ()> + Send + 'static + use<A, C, P, N>
    where
        C: Clone,
    {
        let cloud = self.cloud.clone();
        let delay = self.config.transition_delay;
        async move {
            save_profile(&cloud, &profile).await;
            tokio::time::sleep(delay).await;
        }
    }

    /// Loads the region select scene after the handoff.
    ///
    /// Returns `false`, and stays put, if the user signed out meanwhile.
    pub fn finish_login(&mut self) -> bool {
        if !std::mem::take(&mut self.handoff_pending) {
            tracing::debug!("no login to finish");
            return false;
        }
        self.scenes.load(Scene::RegionSelect);
        true
    }

    /// Second half of a login, run inline: [`accept_login`](Self::accept_login),
    /// the cloud save, the visual delay, then the scene change.
    pub async fn complete_login(
        &mut self,
        credentials: Credentials,
        outcome: Result<(), AuthServiceError>,
    ) -> Result<(), AuthError> {
        let Some(profile) = self.accept_login(credentials, outcome)? else {
            return Ok(());
        };
        save_profile(&self.cloud, &profile).await;
        tokio::time::sleep(self.config.transition_delay).await;
        self.finish_login();
        Ok(())
    }

    /// Validates, signs in, and applies the result in one call.
    pub async fn submit_login(
        &mut self,
        username: &str,
        password: &str,
    ) -> Result<(), AuthError> {
        let credentials = self.begin_login(username, password)?;
        let outcome = self
            .auth
            .sign_in(credentials.username(), credentials.password())
            .await;
        self.complete_login(credentials, outcome).await
    }

    // -- Signup -----------------------------------------------------------

    /// First half of a signup. Same checks as [`begin_login`](Self::begin_login).
    pub fn begin_signup(
        &mut self,
        username: &str,
        password: &str,
    ) -> Result<Credentials, AuthError> {
        let credentials = self.begin(username, password)?;
        tracing::info!(username = credentials.username(), "signing up");
        Ok(credentials)
    }

    /// The remote sign-up, as an owned future. See
    /// [`sign_in_request`](Self::sign_in_request).
    pub fn sign_up_request(
        &self,
        credentials: &Credentials,
    ) -> impl Future<Output = Result<(), AuthServiceError>> + Send + 'static + use<A, C, P, N>
    where
        A: Clone,
    {
        let auth = self.auth.clone();
        let username = credentials.username().to_string();
        let password = credentials.password().to_string();
        async move { auth.sign_up(&username, &password).await }
    }

    /// Second half of a signup. The form is re-armed either way; a new
    /// account still has to log in.
    ///
    /// An answer arriving after sign-out is dropped.
    pub fn complete_signup(
        &mut self,
        credentials: Credentials,
        outcome: Result<(), AuthServiceError>,
    ) -> Result<(), AuthError> {
        if !self.busy {
            tracing::debug!(username = credentials.username(), "signup answer after sign-out dropped");
            return Ok(());
        }
        self.form.loading = false;
        self.busy = false;

        match outcome {
            Ok(()) => {
                tracing::info!(username = credentials.username(), "account created");
                self.form.status = "Signup successful! Now login.".to_string();
                Ok(())
            }
            Err(e) => {
                tracing::warn!(
                    username = credentials.username(),
                    error = %e,
                    "signup rejected"
                );
                self.form.status = format!("Signup failed: {}", e.message);
                Err(AuthError::Service(e))
            }
        }
    }

    /// Validates, signs up, and applies the result in one call.
    pub async fn submit_signup(
        &mut self,
        username: &str,
        password: &str,
    ) -> Result<(), AuthError> {
        let credentials = self.begin_signup(username, password)?;
        let outcome = self
            .auth
            .sign_up(credentials.username(), credentials.password())
            .await;
        self.complete_signup(credentials, outcome)
    }

    // -- Sign out ---------------------------------------------------------

    /// Ends the remote session, forgets the remembered login, resets the
    /// form, and loads the login scene.
    ///
    /// Runs unconditionally: signing out when nobody is signed in still
    /// clears local state.
    pub fn sign_out(&mut self) {
        self.auth.sign_out();

        RememberedSession::clear(&mut self.prefs);
        if let Err(e) = self.prefs.save() {
            tracing::error!(error = %e, "failed to flush preferences on sign-out");
        }

        self.form.status = "You have been signed out.".to_string();
        self.form.sign_out_visible = false;
        self.form.login_visible = true;
        self.form.loading = false;
        self.busy = false;
        self.handoff_pending = false;

        tracing::info!("signed out");
        self.scenes.load(Scene::Login);
    }

    // -- Accessors --------------------------------------------------------

    /// The current form model.
    pub fn form(&self) -> &LoginForm {
        &self.form
    }

    /// Returns `true` if a login or signup would be accepted right now.
    pub fn can_submit(&self) -> bool {
        self.ready && !self.busy
    }

    /// Returns `true` once `start()` has completed.
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// The local preference store.
    pub fn preferences(&self) -> &P {
        &self.prefs
    }

    // -- Internals --------------------------------------------------------

    /// Shared front half of login and signup.
    fn begin(&mut self, username: &str, password: &str) -> Result<Credentials, AuthError> {
        if !self.ready {
            return Err(AuthError::NotReady);
        }
        if self.busy {
            return Err(AuthError::Busy);
        }

        self.form.username = username.to_string();
        self.form.password = password.to_string();

        let credentials = match Credentials::parse(username, password) {
            Ok(credentials) => credentials,
            Err(e) => {
                tracing::debug!(error = %e, "credentials rejected locally");
                self.form.status = VALIDATION_STATUS.to_string();
                return Err(e.into());
            }
        };

        self.busy = true;
        self.form.loading = true;
        Ok(credentials)
    }

    fn restore_remembered(&mut self) {
        if let Some(saved) = RememberedSession::load(&self.prefs) {
            tracing::debug!(username = %saved.username, "restoring remembered login");
            self.form.username = saved.username;
            self.form.password = saved.password;
            self.form.remember_me = true;
        }
    }

    /// Writes or clears all remember-me keys as one unit, then flushes.
    fn persist_remembered(&mut self, credentials: &Credentials) {
        if self.form.remember_me {
            RememberedSession::store(&mut self.prefs, credentials);
        } else {
            RememberedSession::clear(&mut self.prefs);
        }
        if let Err(e) = self.prefs.save() {
            tracing::error!(error = %e, "failed to flush preferences after login");
        }
    }
}

async fn save_profile<C: CloudStore>(cloud: &C, profile: &PlayerProfile) {
    match cloud.force_save(profile.to_cloud_data()).await {
        Ok(()) => tracing::info!("player name saved to cloud"),
        Err(e) => tracing::error!(error = %e, "failed to save player name"),
    }
}
