//! Settings store - persists generation settings and the hidden flag.
//!
//! Values are stored as JSON. Reads never fail from the caller's point of
//! view: [`SettingsStore::get`] falls back to the given default.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use thiserror::Error;

/// Key holding the serialized `PasswordSettings`.
pub const SETTINGS_KEY: &str = "passwordSettings";

/// Key holding the "password hidden" flag.
pub const HIDDEN_KEY: &str = "passwordHidden";

/// Environment variable naming the JSON settings file.
pub const SETTINGS_PATH_ENV: &str = "PWD_SETTINGS_PATH";

const DEFAULT_SETTINGS_PATH: &str = "./pwd-settings.json";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Settings file I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("Settings serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Settings file is not a JSON object: {0}")]
    Corrupt(PathBuf),
}

/// Key/value persistence for settings.
pub trait SettingsStore: Send + Sync {
    /// Raw value under `key`, `None` if never written.
    fn load(&self, key: &str) -> Result<Option<Value>, StoreError>;

    fn save(&self, key: &str, value: Value) -> Result<(), StoreError>;

    /// Typed value under `key`, or `default` if it is missing or unreadable.
    fn get<T: DeserializeOwned>(&self, key: &str, default: T) -> T
    where
        Self: Sized,
    {
        match self.load(key) {
            Ok(Some(value)) => match serde_json::from_value(value) {
                Ok(restored) => restored,
                Err(_e) => {
                    #[cfg(feature = "tracing")]
                    tracing::warn!("stored value for {:?} is malformed, using default: {}", key, _e);
                    default
                }
            },
            Ok(None) => default,
            Err(_e) => {
                #[cfg(feature = "tracing")]
                tracing::warn!("failed to restore {:?}, using default: {}", key, _e);
                default
            }
        }
    }

    fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError>
    where
        Self: Sized,
    {
        self.save(key, serde_json::to_value(value)?)
    }
}

/// In-process store, lost on exit.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SettingsStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(values.get(key).cloned())
    }

    fn save(&self, key: &str, value: Value) -> Result<(), StoreError> {
        let mut values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        values.insert(key.to_string(), value);
        Ok(())
    }
}

/// Store keeping every key in a single JSON object file.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

/// Returns the settings file path.
///
/// Priority:
/// 1. Environment variable `PWD_SETTINGS_PATH`
/// 2. Default path `./pwd-settings.json`
pub fn get_settings_path() -> PathBuf {
    std::env::var(SETTINGS_PATH_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_SETTINGS_PATH))
}

impl JsonFileStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Store at [`get_settings_path`].
    pub fn from_env() -> Self {
        Self::new(get_settings_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<Map<String, Value>, StoreError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(e.into()),
        };
        if content.trim().is_empty() {
            return Ok(Map::new());
        }
        match serde_json::from_str(&content)? {
            Value::Object(map) => Ok(map),
            _ => Err(StoreError::Corrupt(self.path.clone())),
        }
    }
}

impl SettingsStore for JsonFileStore {
    fn load(&self, key: &str) -> Result<Option<Value>, StoreError> {
        Ok(self.read_all()?.remove(key))
    }

    fn save(&self, key: &str, value: Value) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut map = self.read_all()?;
        map.insert(key.to_string(), value);

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(&Value::Object(map))?)?;

        #[cfg(feature = "tracing")]
        tracing::trace!("persisted {:?} to {:?}", key, self.path);
        Ok(())
    }
}
