use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use gatehouse::prelude::*;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

// ---------------------------------------------------------------------------
// Simulated auth + cloud
// ---------------------------------------------------------------------------

/// Username/password accounts kept in memory.
struct SimAuth {
    state: Mutex<ServicesState>,
    accounts: Mutex<HashMap<String, String>>,
}

impl SimAuth {
    fn new() -> Self {
        Self {
            state: Mutex::new(ServicesState::Uninitialized),
            accounts: Mutex::new(HashMap::new()),
        }
    }
}

impl AuthService for SimAuth {
    fn state(&self) -> ServicesState {
        *self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    async fn initialize(&self) -> Result<(), AuthServiceError> {
        *self.state.lock().unwrap_or_else(|e| e.into_inner()) = ServicesState::Initialized;
        Ok(())
    }

    async fn sign_in(&self, username: &str, password: &str) -> Result<(), AuthServiceError> {
        let accounts = self.accounts.lock().unwrap_or_else(|e| e.into_inner());
        match accounts.get(username) {
            Some(stored) if stored == password => Ok(()),
            _ => Err(AuthServiceError::new("Invalid username or password")),
        }
    }

    async fn sign_up(&self, username: &str, password: &str) -> Result<(), AuthServiceError> {
        let mut accounts = self.accounts.lock().unwrap_or_else(|e| e.into_inner());
        if accounts.contains_key(username) {
            return Err(AuthServiceError::new("Username already exists"));
        }
        accounts.insert(username.to_string(), password.to_string());
        Ok(())
    }

    fn sign_out(&self) {}
}

#[derive(Clone)]
struct SimCloud;

impl CloudStore for SimCloud {
    async fn force_save(&self, data: CloudData) -> Result<(), CloudSaveError> {
        let json = serde_json::to_string(&data).map_err(|e| CloudSaveError(e.to_string()))?;
        tracing::info!(%json, "cloud save");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Simulated multiplayer backend
// ---------------------------------------------------------------------------

/// Answers every request immediately by queueing the matching event.
struct SimBackend {
    events: mpsc::Sender<NetworkEvent>,
    region: Mutex<Option<String>>,
    open_rooms: Mutex<HashSet<String>>,
}

impl SimBackend {
    fn new(events: mpsc::Sender<NetworkEvent>) -> Self {
        Self {
            events,
            region: Mutex::new(None),
            open_rooms: Mutex::new(HashSet::new()),
        }
    }

    fn emit(&self, event: NetworkEvent) -> Result<(), NetworkError> {
        self.events
            .try_send(event)
            .map_err(|e| NetworkError::Backend(e.to_string()))
    }

    fn connect(&self, region: &str) -> Result<(), NetworkError> {
        let mut current = self.region.lock().unwrap_or_else(|e| e.into_inner());
        if current.is_some() {
            return Err(NetworkError::Refused("connect"));
        }
        *current = Some(region.to_string());
        drop(current);
        self.emit(NetworkEvent::ConnectedToMaster)
    }
}

impl MultiplayerBackend for SimBackend {
    fn connect_using_settings(&self) -> Result<(), NetworkError> {
        self.connect("eu")
    }

    fn connect_to_region(&self, region_code: &str) -> Result<(), NetworkError> {
        self.connect(region_code)
    }

    fn is_connected_and_ready(&self) -> bool {
        self.region.lock().unwrap_or_else(|e| e.into_inner()).is_some()
    }

    fn cloud_region(&self) -> Option<String> {
        self.region.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn set_nickname(&self, nickname: &str) {
        tracing::debug!(nickname, "backend nickname set");
    }

    fn set_automatically_sync_scene(&self, _: bool) {}

    fn join_random_room(&self) -> Result<(), NetworkError> {
        let found = self
            .open_rooms
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .next()
            .cloned();
        match found {
            Some(room) => {
                tracing::debug!(%room, "matched open room");
                self.emit(NetworkEvent::JoinedRoom)
            }
            None => self.emit(NetworkEvent::JoinRandomFailed {
                code: 32760,
                message: "No match found".into(),
            }),
        }
    }

    fn create_room(&self, room_name: &str) -> Result<(), NetworkError> {
        let mut rooms = self.open_rooms.lock().unwrap_or_else(|e| e.into_inner());
        if !rooms.insert(room_name.to_string()) {
            return Err(NetworkError::Backend(format!("room {room_name} exists")));
        }
        drop(rooms);
        self.emit(NetworkEvent::JoinedRoom)
    }
}

// ---------------------------------------------------------------------------
// Console input
// ---------------------------------------------------------------------------

fn help() -> String {
    let regions: Vec<String> = Region::ALL
        .iter()
        .map(|r| format!("{} {}", r.index(), r.label()))
        .collect();
    format!(
        "commands:
  login <user> <pass>    sign in
  signup <user> <pass>   create an account
  remember on|off        remember me
  signout                sign out
  region <0-7|code>      {}
  join                   connect to the selected region
  name <nickname>        set your nickname
  enter                  join or create a room
  exit                   quit",
        regions.join(", ")
    )
}

/// Parses one console line. `Ok(None)` for blank lines.
fn parse_command(line: &str) -> Result<Option<UiCommand>, String> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Ok(None);
    };
    let rest: Vec<&str> = words.collect();

    let command = match (verb, rest.as_slice()) {
        ("login", [user, pass]) => UiCommand::Login {
            username: (*user).to_string(),
            password: (*pass).to_string(),
        },
        ("signup", [user, pass]) => UiCommand::Signup {
            username: (*user).to_string(),
            password: (*pass).to_string(),
        },
        ("remember", ["on"]) => UiCommand::ToggleRememberMe(true),
        ("remember", ["off"]) => UiCommand::ToggleRememberMe(false),
        ("signout", []) => UiCommand::SignOut,
        ("region", [choice]) => match choice.parse::<usize>() {
            Ok(index) => UiCommand::SelectRegion(index),
            Err(_) => {
                let region: Region = choice.parse().map_err(|e: TypesError| e.to_string())?;
                UiCommand::SelectRegion(region.index())
            }
        },
        ("join", []) => UiCommand::JoinRegion,
        ("name", parts) => UiCommand::SetDisplayName(parts.join(" ")),
        ("enter", []) => UiCommand::EnterRoom,
        ("exit" | "quit", []) => UiCommand::Exit,
        _ => return Err(format!("unrecognized: {line}")),
    };
    Ok(Some(command))
}

async fn read_commands(commands: mpsc::Sender<UiCommand>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        match parse_command(&line) {
            Ok(Some(command)) => {
                if commands.send(command).await.is_err() {
                    break;
                }
            }
            Ok(None) => {}
            Err(e) => eprintln!("{e}\n{}", help()),
        }
    }
}

fn scene_hint(scene: Scene) -> &'static str {
    match scene {
        Scene::Login => "login / signup / remember / signout",
        Scene::RegionSelect => "region <n>, then join",
        Scene::Lobby => "name <nickname>, then enter",
        Scene::Gameplay => "in a room. exit to quit",
    }
}

// ---------------------------------------------------------------------------
// Bootstrap
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<(), ClientError> {
    let config = match std::env::args().nth(1) {
        Some(path) => ClientConfig::load(path)?,
        None => ClientConfig::default(),
    };
    gatehouse::telemetry::init(&config.log_filter);

    let (ui_tx, ui_rx) = mpsc::channel(config.event_channel_capacity);
    let (net_tx, net_rx) = mpsc::channel(config.event_channel_capacity);

    let prefs = JsonFilePreferences::open(&config.prefs_path)?;
    let client = GameClientBuilder::new().config(config).build(
        Arc::new(SimAuth::new()),
        SimCloud,
        prefs,
        Arc::new(SimBackend::new(net_tx)),
    );

    let mut scenes = client.router().subscribe();
    tokio::spawn(async move {
        while scenes.changed().await.is_ok() {
            let scene = *scenes.borrow_and_update();
            println!("== {} == ({})", scene.name(), scene_hint(scene));
        }
    });

    println!("{}\n== {} == ({})", help(), Scene::Login.name(), scene_hint(Scene::Login));
    tokio::spawn(read_commands(ui_tx));

    client.run(ui_rx, net_rx).await;
    Ok(())
}
