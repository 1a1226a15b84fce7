//! Integration tests for `GameClient`: the whole login → region → room
//! flow against fake services.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use gatehouse::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::sync::{mpsc, watch};

// =========================================================================
// Fakes
// =========================================================================

#[derive(Default)]
struct FakeAuth {
    init_fails: AtomicBool,
    reject_sign_in: AtomicBool,
    hang_sign_in: AtomicBool,
    sign_ins: AtomicUsize,
}

impl AuthService for FakeAuth {
    fn state(&self) -> ServicesState {
        ServicesState::Uninitialized
    }

    async fn initialize(&self) -> Result<(), AuthServiceError> {
        if self.init_fails.load(Ordering::SeqCst) {
            return Err(AuthServiceError::new("no network"));
        }
        Ok(())
    }

    async fn sign_in(&self, _: &str, _: &str) -> Result<(), AuthServiceError> {
        self.sign_ins.fetch_add(1, Ordering::SeqCst);
        if self.hang_sign_in.load(Ordering::SeqCst) {
            std::future::pending::<()>().await;
        }
        if self.reject_sign_in.load(Ordering::SeqCst) {
            return Err(AuthServiceError::new("Invalid username or password"));
        }
        Ok(())
    }

    async fn sign_up(&self, _: &str, _: &str) -> Result<(), AuthServiceError> {
        Ok(())
    }

    fn sign_out(&self) {}
}

#[derive(Default)]
struct FakeCloud {
    saves: Mutex<Vec<CloudData>>,
}

impl CloudStore for FakeCloud {
    async fn force_save(&self, data: CloudData) -> Result<(), CloudSaveError> {
        self.saves.lock().unwrap().push(data);
        Ok(())
    }
}

/// Records requests. Connects instantly once any connect call is made.
#[derive(Default)]
struct FakeBackend {
    calls: Mutex<Vec<String>>,
    connected: AtomicBool,
}

impl FakeBackend {
    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }
}

impl MultiplayerBackend for FakeBackend {
    fn connect_using_settings(&self) -> Result<(), NetworkError> {
        self.record("connect:best");
        self.connected.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn connect_to_region(&self, region_code: &str) -> Result<(), NetworkError> {
        self.record(format!("connect:{region_code}"));
        self.connected.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn is_connected_and_ready(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    fn cloud_region(&self) -> Option<String> {
        Some("eu".into())
    }

    fn set_nickname(&self, nickname: &str) {
        self.record(format!("nickname:{nickname}"));
    }

    fn set_automatically_sync_scene(&self, _: bool) {}

    fn join_random_room(&self) -> Result<(), NetworkError> {
        self.record("join_random");
        Ok(())
    }

    fn create_room(&self, room_name: &str) -> Result<(), NetworkError> {
        self.record(format!("create:{room_name}"));
        Ok(())
    }
}

type Client = GameClient<Arc<FakeAuth>, Arc<FakeCloud>, MemoryPreferences, Arc<FakeBackend>>;

struct Harness {
    auth: Arc<FakeAuth>,
    cloud: Arc<FakeCloud>,
    backend: Arc<FakeBackend>,
}

impl Harness {
    fn new() -> Self {
        Self {
            auth: Arc::new(FakeAuth::default()),
            cloud: Arc::new(FakeCloud::default()),
            backend: Arc::new(FakeBackend::default()),
        }
    }

    fn client(&self) -> Client {
        GameClientBuilder::new()
            .config(ClientConfig::default().with_transition_delay(Duration::from_millis(500)))
            .rng(StdRng::seed_from_u64(1))
            .build(
                Arc::clone(&self.auth),
                Arc::clone(&self.cloud),
                MemoryPreferences::new(),
                Arc::clone(&self.backend),
            )
    }
}

fn login(username: &str, password: &str) -> UiCommand {
    UiCommand::Login {
        username: username.into(),
        password: password.into(),
    }
}

async fn wait_for_scene(rx: &mut watch::Receiver<Scene>, scene: Scene) {
    tokio::time::timeout(Duration::from_secs(30), rx.wait_for(|s| *s == scene))
        .await
        .expect("scene change timed out")
        .expect("router dropped");
}

// =========================================================================
// Step-by-step dispatch
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_full_flow_reaches_gameplay() {
    let h = Harness::new();
    let mut client = h.client();
    client.start().await.unwrap();

    assert!(client.handle_command(login("alice", "secret1")).await.unwrap());
    assert_eq!(client.router().current(), Scene::Login, "answer not applied yet");
    client.settle().await.unwrap();
    assert_eq!(client.router().current(), Scene::RegionSelect);
    assert_eq!(h.cloud.saves.lock().unwrap().len(), 1);

    client.handle_command(UiCommand::SelectRegion(3)).await.unwrap();
    client.handle_command(UiCommand::JoinRegion).await.unwrap();
    assert_eq!(h.backend.calls(), vec!["connect:eu"]);

    client.handle_event(&NetworkEvent::ConnectedToMaster).unwrap();
    assert_eq!(client.router().current(), Scene::Lobby);

    client
        .handle_command(UiCommand::SetDisplayName(" Alice ".into()))
        .await
        .unwrap();
    client.handle_command(UiCommand::EnterRoom).await.unwrap();
    assert_eq!(client.rooms().state(), &RoomSessionState::PendingJoin);

    client
        .handle_event(&NetworkEvent::JoinRandomFailed {
            code: 32760,
            message: "No match found".into(),
        })
        .unwrap();
    let creates: Vec<String> = h
        .backend
        .calls()
        .into_iter()
        .filter(|c| c.starts_with("create:Room_"))
        .collect();
    assert_eq!(creates.len(), 1);

    client.handle_event(&NetworkEvent::JoinedRoom).unwrap();
    assert_eq!(client.router().current(), Scene::Gameplay);
    assert_eq!(client.rooms().state(), &RoomSessionState::Joined);
}

#[tokio::test(start_paused = true)]
async fn test_login_waits_transition_delay_before_scene_change() {
    let h = Harness::new();
    let mut client = h.client();
    client.start().await.unwrap();

    let before = tokio::time::Instant::now();
    client.handle_command(login("alice", "secret1")).await.unwrap();
    client.settle().await.unwrap();

    assert!(before.elapsed() >= Duration::from_millis(500));
    assert_eq!(client.router().current(), Scene::RegionSelect);
}

#[tokio::test(start_paused = true)]
async fn test_command_outside_its_scene_is_ignored() {
    let h = Harness::new();
    let mut client = h.client();
    client.start().await.unwrap();

    assert!(!client.handle_command(UiCommand::EnterRoom).await.unwrap());
    assert!(!client.handle_command(UiCommand::JoinRegion).await.unwrap());

    assert!(h.backend.calls().is_empty());
    assert_eq!(client.router().current(), Scene::Login);
}

#[tokio::test(start_paused = true)]
async fn test_short_credentials_surface_as_auth_error() {
    let h = Harness::new();
    let mut client = h.client();
    client.start().await.unwrap();

    let err = client.handle_command(login("al", "secret1")).await.unwrap_err();

    assert!(matches!(err, ClientError::Auth(AuthError::Validation(_))));
    assert_eq!(h.auth.sign_ins.load(Ordering::SeqCst), 0);
    assert_eq!(
        client.auth().form().status,
        "Username must be 3+ chars & Password 6+ chars!"
    );
}

#[tokio::test(start_paused = true)]
async fn test_rejected_login_stays_on_login_scene() {
    let h = Harness::new();
    h.auth.reject_sign_in.store(true, Ordering::SeqCst);
    let mut client = h.client();
    client.start().await.unwrap();

    client.handle_command(login("alice", "secret1")).await.unwrap();
    let err = client.settle().await.unwrap_err();

    assert!(matches!(err, ClientError::Auth(AuthError::Service(_))));
    assert_eq!(client.router().current(), Scene::Login);
    assert!(client.auth().can_submit());
}

#[tokio::test(start_paused = true)]
async fn test_enter_room_without_name_is_lobby_error() {
    let h = Harness::new();
    let mut client = h.client();
    client.start().await.unwrap();
    client.handle_command(login("alice", "secret1")).await.unwrap();
    client.settle().await.unwrap();
    client.handle_command(UiCommand::JoinRegion).await.unwrap();
    client.handle_event(&NetworkEvent::ConnectedToMaster).unwrap();

    let err = client.handle_command(UiCommand::EnterRoom).await.unwrap_err();

    assert!(matches!(err, ClientError::Lobby(LobbyError::BlankName)));
    assert!(!h.backend.calls().iter().any(|c| c == "join_random"));
}

#[tokio::test(start_paused = true)]
async fn test_disconnect_keeps_region_scene() {
    let h = Harness::new();
    let mut client = h.client();
    client.start().await.unwrap();
    client.handle_command(login("alice", "secret1")).await.unwrap();
    client.settle().await.unwrap();
    client.handle_command(UiCommand::JoinRegion).await.unwrap();

    let handled = client
        .handle_event(&NetworkEvent::Disconnected {
            cause: DisconnectCause::ServerTimeout,
        })
        .unwrap();

    assert!(handled);
    assert_eq!(client.router().current(), Scene::RegionSelect);
    assert!(!client.regions().is_connecting());
}

#[tokio::test(start_paused = true)]
async fn test_second_login_while_pending_is_busy() {
    let h = Harness::new();
    let mut client = h.client();
    client.start().await.unwrap();

    client.handle_command(login("alice", "secret1")).await.unwrap();
    let err = client.handle_command(login("alice", "secret1")).await.unwrap_err();

    assert!(matches!(err, ClientError::Auth(AuthError::Busy)));
    assert!(client.has_pending_auth());
    client.settle().await.unwrap();
    assert_eq!(h.auth.sign_ins.load(Ordering::SeqCst), 1);
    assert_eq!(client.router().current(), Scene::RegionSelect);
}

#[tokio::test(start_paused = true)]
async fn test_room_event_outside_lobby_is_ignored() {
    let h = Harness::new();
    let mut client = h.client();
    client.start().await.unwrap();

    let handled = client
        .handle_event(&NetworkEvent::JoinRandomFailed {
            code: 32760,
            message: "No match found".into(),
        })
        .unwrap();

    assert!(!handled);
    assert!(h.backend.calls().is_empty());
    assert_eq!(client.rooms().state(), &RoomSessionState::Idle);

    // The joiner is still usable once the lobby loads.
    client.handle_command(login("alice", "secret1")).await.unwrap();
    client.settle().await.unwrap();
    client.handle_command(UiCommand::JoinRegion).await.unwrap();
    client.handle_event(&NetworkEvent::ConnectedToMaster).unwrap();
    client
        .handle_command(UiCommand::SetDisplayName("alice".into()))
        .await
        .unwrap();
    client.handle_command(UiCommand::EnterRoom).await.unwrap();
    assert_eq!(client.rooms().state(), &RoomSessionState::PendingJoin);
}

#[tokio::test(start_paused = true)]
async fn test_connected_to_master_in_gameplay_keeps_scene() {
    let h = Harness::new();
    let mut client = h.client();
    client.start().await.unwrap();
    client.handle_command(login("alice", "secret1")).await.unwrap();
    client.settle().await.unwrap();
    client.handle_command(UiCommand::JoinRegion).await.unwrap();
    client.handle_event(&NetworkEvent::ConnectedToMaster).unwrap();
    client
        .handle_command(UiCommand::SetDisplayName("alice".into()))
        .await
        .unwrap();
    client.handle_command(UiCommand::EnterRoom).await.unwrap();
    client.handle_event(&NetworkEvent::JoinedRoom).unwrap();
    assert_eq!(client.router().current(), Scene::Gameplay);

    let handled = client.handle_event(&NetworkEvent::ConnectedToMaster).unwrap();

    assert!(!handled);
    assert_eq!(client.router().current(), Scene::Gameplay);
}

// =========================================================================
// Dispatch loop
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_run_drives_flow_until_exit() {
    let h = Harness::new();
    let client = h.client();
    let router = client.router().clone();
    let mut scenes = router.subscribe();

    let (ui_tx, ui_rx) = mpsc::channel(8);
    let (net_tx, net_rx) = mpsc::channel(8);
    let task = tokio::spawn(client.run(ui_rx, net_rx));

    ui_tx.send(login("alice", "secret1")).await.unwrap();
    wait_for_scene(&mut scenes, Scene::RegionSelect).await;

    ui_tx.send(UiCommand::JoinRegion).await.unwrap();
    while !h.backend.is_connected_and_ready() {
        tokio::task::yield_now().await;
    }
    net_tx.send(NetworkEvent::ConnectedToMaster).await.unwrap();
    wait_for_scene(&mut scenes, Scene::Lobby).await;

    ui_tx.send(UiCommand::SetDisplayName("alice".into())).await.unwrap();
    ui_tx.send(UiCommand::EnterRoom).await.unwrap();
    ui_tx.send(UiCommand::Exit).await.unwrap();

    tokio::time::timeout(Duration::from_secs(30), task)
        .await
        .expect("client did not stop")
        .unwrap();

    assert!(router.quit_requested());
    assert!(h.backend.calls().contains(&"join_random".to_string()));
}

#[tokio::test(start_paused = true)]
async fn test_run_survives_failed_commands() {
    let h = Harness::new();
    let client = h.client();
    let router = client.router().clone();

    let (ui_tx, ui_rx) = mpsc::channel(8);
    let (_net_tx, net_rx) = mpsc::channel(8);
    let task = tokio::spawn(client.run(ui_rx, net_rx));

    ui_tx.send(login("a", "b")).await.unwrap();
    ui_tx.send(UiCommand::EnterRoom).await.unwrap();
    ui_tx.send(UiCommand::Exit).await.unwrap();

    tokio::time::timeout(Duration::from_secs(30), task)
        .await
        .expect("client did not stop")
        .unwrap();

    assert!(router.quit_requested());
    assert_eq!(router.current(), Scene::Login);
}

#[tokio::test(start_paused = true)]
async fn test_run_with_failed_init_rejects_login() {
    let h = Harness::new();
    h.auth.init_fails.store(true, Ordering::SeqCst);
    let client = h.client();
    let router = client.router().clone();

    let (ui_tx, ui_rx) = mpsc::channel(8);
    let (_net_tx, net_rx) = mpsc::channel(8);
    let task = tokio::spawn(client.run(ui_rx, net_rx));

    ui_tx.send(login("alice", "secret1")).await.unwrap();
    ui_tx.send(UiCommand::Exit).await.unwrap();

    tokio::time::timeout(Duration::from_secs(30), task)
        .await
        .expect("client did not stop")
        .unwrap();

    assert_eq!(h.auth.sign_ins.load(Ordering::SeqCst), 0);
    assert_eq!(router.current(), Scene::Login);
}

#[tokio::test(start_paused = true)]
async fn test_run_exits_while_sign_in_hangs() {
    let h = Harness::new();
    h.auth.hang_sign_in.store(true, Ordering::SeqCst);
    let client = h.client();
    let router = client.router().clone();

    let (ui_tx, ui_rx) = mpsc::channel(8);
    let (_net_tx, net_rx) = mpsc::channel(8);
    let task = tokio::spawn(client.run(ui_rx, net_rx));

    ui_tx.send(login("alice", "secret1")).await.unwrap();
    while h.auth.sign_ins.load(Ordering::SeqCst) == 0 {
        tokio::task::yield_now().await;
    }
    ui_tx.send(login("alice", "secret1")).await.unwrap();
    ui_tx.send(UiCommand::Exit).await.unwrap();

    tokio::time::timeout(Duration::from_secs(30), task)
        .await
        .expect("client did not stop")
        .unwrap();

    assert!(router.quit_requested());
    assert_eq!(router.current(), Scene::Login);
    assert_eq!(h.auth.sign_ins.load(Ordering::SeqCst), 1, "second login was busy");
}

#[tokio::test(start_paused = true)]
async fn test_run_stops_when_command_channel_closes() {
    let h = Harness::new();
    let client = h.client();

    let (ui_tx, ui_rx) = mpsc::channel::<UiCommand>(8);
    let (_net_tx, net_rx) = mpsc::channel(8);
    let task = tokio::spawn(client.run(ui_rx, net_rx));

    drop(ui_tx);

    tokio::time::timeout(Duration::from_secs(30), task)
        .await
        .expect("client did not stop")
        .unwrap();
}

// =========================================================================
// File-backed preferences
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_remember_me_persists_to_prefs_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("prefs.json");
    let h = Harness::new();

    let mut client = GameClientBuilder::new()
        .config(ClientConfig::default().with_transition_delay(Duration::ZERO))
        .build(
            Arc::clone(&h.auth),
            Arc::clone(&h.cloud),
            JsonFilePreferences::open(&path).unwrap(),
            Arc::clone(&h.backend),
        );
    client.start().await.unwrap();
    client.handle_command(UiCommand::ToggleRememberMe(true)).await.unwrap();
    client.handle_command(login("alice", "secret1")).await.unwrap();
    client.settle().await.unwrap();

    let reopened = JsonFilePreferences::open(&path).unwrap();
    assert_eq!(reopened.get_string("SavedUsername").as_deref(), Some("alice"));
    assert_eq!(reopened.get_int("RememberMe"), Some(1));

    // A fresh client on the same file pre-fills the form.
    let mut next = GameClientBuilder::new().build(
        Arc::clone(&h.auth),
        Arc::clone(&h.cloud),
        reopened,
        Arc::clone(&h.backend),
    );
    next.start().await.unwrap();
    assert_eq!(next.auth().form().username, "alice");
    assert!(next.auth().form().remember_me);
}
