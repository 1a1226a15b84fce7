//! Local key/value preferences.
//!
//! A small string/int store with an explicit flush, shaped like the
//! preference APIs game engines ship. Writes are buffered in memory
//! until [`PreferenceStore::save`] is called.
//!
//! Two implementations:
//! - [`MemoryPreferences`]: nothing touches disk. Tests and demos.
//! - [`JsonFilePreferences`]: one JSON object per file, rewritten on save.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::PrefsError;

/// A local preference store.
///
/// Reads of a key with the wrong type return `None`, the same as a
/// missing key.
pub trait PreferenceStore: Send + 'static {
    fn get_string(&self, key: &str) -> Option<String>;

    fn set_string(&mut self, key: &str, value: &str);

    fn get_int(&self, key: &str) -> Option<i64>;

    fn set_int(&mut self, key: &str, value: i64);

    /// Removes `key`. Missing keys are ignored.
    fn delete_key(&mut self, key: &str);

    /// Flushes pending writes to durable storage.
    fn save(&mut self) -> Result<(), PrefsError>;
}

/// A stored preference value.
///
/// `untagged` keeps the file readable: strings are JSON strings and
/// ints are JSON numbers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
enum PrefValue {
    Int(i64),
    Str(String),
}

/// The shared map logic behind both stores.
#[derive(Debug, Default, Clone)]
struct PrefMap(BTreeMap<String, PrefValue>);

impl PrefMap {
    fn get_string(&self, key: &str) -> Option<String> {
        match self.0.get(key) {
            Some(PrefValue::Str(s)) => Some(s.clone()),
            _ => None,
        }
    }

    fn get_int(&self, key: &str) -> Option<i64> {
        match self.0.get(key) {
            Some(PrefValue::Int(i)) => Some(*i),
            _ => None,
        }
    }

    fn set(&mut self, key: &str, value: PrefValue) {
        self.0.insert(key.to_string(), value);
    }

    fn delete(&mut self, key: &str) {
        self.0.remove(key);
    }
}

// ---------------------------------------------------------------------------
// MemoryPreferences
// ---------------------------------------------------------------------------

/// An in-memory preference store.
///
/// `save` always succeeds and only counts flushes, so tests can assert
/// that a controller flushed after writing.
#[derive(Debug, Default, Clone)]
pub struct MemoryPreferences {
    values: PrefMap,
    saves: usize,
}

impl MemoryPreferences {
    pub fn new() -> Self {
        Self::default()
    }

    /// How many times [`save`](PreferenceStore::save) has been called.
    pub fn save_count(&self) -> usize {
        self.saves
    }

    /// Returns `true` if `key` holds any value.
    pub fn contains_key(&self, key: &str) -> bool {
        self.values.0.contains_key(key)
    }
}

impl PreferenceStore for MemoryPreferences {
    fn get_string(&self, key: &str) -> Option<String> {
        self.values.get_string(key)
    }

    fn set_string(&mut self, key: &str, value: &str) {
        self.values.set(key, PrefValue::Str(value.to_string()));
    }

    fn get_int(&self, key: &str) -> Option<i64> {
        self.values.get_int(key)
    }

    fn set_int(&mut self, key: &str, value: i64) {
        self.values.set(key, PrefValue::Int(value));
    }

    fn delete_key(&mut self, key: &str) {
        self.values.delete(key);
    }

    fn save(&mut self) -> Result<(), PrefsError> {
        self.saves += 1;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// JsonFilePreferences
// ---------------------------------------------------------------------------

/// A preference store backed by a JSON file.
///
/// The whole file is loaded on [`open`](Self::open) and rewritten on every
/// [`save`](PreferenceStore::save). The rewrite goes to a sibling temp file
/// first and is renamed over the original, so a crash mid-save leaves the
/// previous contents intact.
#[derive(Debug)]
pub struct JsonFilePreferences {
    path: PathBuf,
    values: PrefMap,
}

impl JsonFilePreferences {
    /// Loads preferences from `path`. A missing file is an empty store;
    /// the file (and its parent directory) is created on first save.
    ///
    /// # Errors
    /// [`PrefsError::Io`] if the file exists but can't be read,
    /// [`PrefsError::Json`] if it isn't a JSON object of strings and ints.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, PrefsError> {
        let path = path.as_ref().to_path_buf();
        let values = match fs::read(&path) {
            Ok(bytes) => PrefMap(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no preference file yet");
                PrefMap::default()
            }
            Err(e) => return Err(e.into()),
        };
        Ok(Self { path, values })
    }

    /// Where this store writes on save.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PreferenceStore for JsonFilePreferences {
    fn get_string(&self, key: &str) -> Option<String> {
        self.values.get_string(key)
    }

    fn set_string(&mut self, key: &str, value: &str) {
        self.values.set(key, PrefValue::Str(value.to_string()));
    }

    fn get_int(&self, key: &str) -> Option<i64> {
        self.values.get_int(key)
    }

    fn set_int(&mut self, key: &str, value: i64) {
        self.values.set(key, PrefValue::Int(value));
    }

    fn delete_key(&mut self, key: &str) {
        self.values.delete(key);
    }

    fn save(&mut self) -> Result<(), PrefsError> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir)?;
            }
        }
        let bytes = serde_json::to_vec_pretty(&self.values.0)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, bytes)?;
        fs::rename(&tmp, &self.path)?;
        tracing::debug!(path = %self.path.display(), "preferences saved");
        Ok(())
    }
}
