//! Persisted wallpaper settings.
//!
//! A small named key/value store backed by a JSON file. Other components
//! observe changes through a [`Subscription`]; dropping the subscription
//! unsubscribes.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};

use anyhow::{Context, Result};
use log::{debug, warn};

/// Name of the store holding the wallpaper settings.
pub const STORE_NAME: &str = "logo1_settings";
/// Key of the logo location setting.
pub const KEY_LOCATION: &str = "location";
/// Location used when nothing has been stored yet.
pub const DEFAULT_LOCATION: &str = "Center";

pub struct SettingsStore {
    path: Option<PathBuf>,
    values: BTreeMap<String, String>,
    listeners: Vec<Sender<String>>,
}

/// Keys changed since the last drain, for as long as this value lives.
pub struct Subscription {
    changes: Receiver<String>,
}

impl Subscription {
    /// Changed keys, oldest first, without blocking.
    pub fn drain(&self) -> Vec<String> {
        self.changes.try_iter().collect()
    }
}

impl SettingsStore {
    /// A store that lives only in memory.
    pub fn in_memory() -> Self {
        SettingsStore {
            path: None,
            values: BTreeMap::new(),
            listeners: Vec::new(),
        }
    }

    /// Open the named store from the user's config directory. A missing
    /// file is an empty store; a malformed one is reported and ignored.
    pub fn open(name: &str) -> Self {
        Self::open_at(Self::store_path(name))
    }

    pub fn open_at(path: PathBuf) -> Self {
        let values = match std::fs::read_to_string(&path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(values) => values,
                Err(e) => {
                    warn!("invalid settings file {} ({e}), using defaults", path.display());
                    BTreeMap::new()
                }
            },
            Err(_) => BTreeMap::new(),
        };
        SettingsStore {
            path: Some(path),
            values,
            listeners: Vec::new(),
        }
    }

    pub fn get_string(&self, key: &str, default: &str) -> String {
        self.values
            .get(key)
            .cloned()
            .unwrap_or_else(|| default.to_string())
    }

    /// Set `key` and notify subscribers if the value changed.
    pub fn set_string(&mut self, key: &str, value: &str) {
        if self.values.get(key).map(String::as_str) == Some(value) {
            return;
        }
        debug!("setting {key} = {value}");
        self.values.insert(key.to_string(), value.to_string());
        // Subscribers that went away are dropped here.
        self.listeners.retain(|tx| tx.send(key.to_string()).is_ok());
    }

    pub fn subscribe(&mut self) -> Subscription {
        let (tx, rx) = mpsc::channel();
        self.listeners.push(tx);
        Subscription { changes: rx }
    }

    /// Write the store back to disk. In-memory stores have nothing to do.
    pub fn commit(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create {}", dir.display()))?;
        }
        let json = serde_json::to_string_pretty(&self.values)?;
        std::fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))
    }

    pub fn path(&self) -> Option<&PathBuf> {
        self.path.as_ref()
    }

    fn store_path(name: &str) -> PathBuf {
        let mut path = config_dir();
        path.push(format!("{name}.json"));
        path
    }
}

/// `$HOME/.config/logo-wallpaper`, falling back to the working directory.
pub fn config_dir() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
    let mut path = PathBuf::from(home);
    path.push(".config");
    path.push("logo-wallpaper");
    path
}
