//! Key/value user preferences
//!
//! Small string preferences such as the selected theme live in a
//! [`PreferenceStore`]. The file-backed store keeps them in
//! `preferences.json` next to the main configuration file and writes through
//! on every change.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use super::persistence::get_config_dir;
use crate::error::{Error, Result};

/// Preferences file name
const PREFERENCES_FILE_NAME: &str = "preferences.json";

/// Preference key for the color theme.
pub const THEME_KEY: &str = "theme";

/// A string key/value store that survives restarts.
pub trait PreferenceStore {
    /// Read a preference.
    fn get(&self, key: &str) -> Option<String>;
    /// Write a preference.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Encode a serde value as a preference string.
///
/// Unit enum variants become their bare serialized name, e.g. `dark`.
pub fn encode_preference<T: Serialize>(value: &T) -> Result<String> {
    Ok(match serde_json::to_value(value)? {
        Value::String(s) => s,
        other => other.to_string(),
    })
}

/// Decode a preference string written by [`encode_preference`].
pub fn decode_preference<T: DeserializeOwned>(value: &str) -> Result<T> {
    let value = value.trim();
    match serde_json::from_value(Value::String(value.to_string())) {
        Ok(decoded) => Ok(decoded),
        Err(_) => Ok(serde_json::from_str(value)?),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// File Store
// ─────────────────────────────────────────────────────────────────────────────

/// Preferences persisted as a JSON object.
#[derive(Debug, Clone)]
pub struct FilePreferenceStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl FilePreferenceStore {
    /// Open the store in the platform config directory.
    pub fn open_default() -> Result<Self> {
        Ok(Self::open(get_config_dir()?.join(PREFERENCES_FILE_NAME)))
    }

    /// Open the store at `path`.
    ///
    /// A missing or unreadable file starts an empty store; it is replaced on
    /// the first write.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = match Self::read(&path) {
            Ok(values) => values,
            Err(e) => {
                warn!("Ignoring preferences at {}: {}", path.display(), e);
                BTreeMap::new()
            }
        };
        Self { path, values }
    }

    fn read(path: &Path) -> Result<BTreeMap<String, String>> {
        if !path.exists() {
            debug!("No preferences at {}", path.display());
            return Ok(BTreeMap::new());
        }

        let contents = fs::read_to_string(path).map_err(|e| Error::ConfigLoad {
            path: path.to_path_buf(),
            source: Box::new(e),
        })?;
        if contents.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        Ok(serde_json::from_str(&contents)?)
    }

    fn write(&self) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir).map_err(|e| Error::ConfigSave {
                path: dir.to_path_buf(),
                source: Box::new(e),
            })?;
        }

        let json = serde_json::to_string_pretty(&self.values)?;
        fs::write(&self.path, json).map_err(|e| Error::ConfigSave {
            path: self.path.clone(),
            source: Box::new(e),
        })
    }
}

impl PreferenceStore for FilePreferenceStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        if self.values.get(key).map(String::as_str) == Some(value) {
            return Ok(());
        }
        self.values.insert(key.to_string(), value.to_string());
        self.write()?;
        debug!("Preference '{}' set to '{}'", key, value);
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Memory Store
// ─────────────────────────────────────────────────────────────────────────────

/// Preferences that only last for the process lifetime.
#[derive(Debug, Clone, Default)]
pub struct MemoryPreferenceStore {
    values: BTreeMap<String, String>,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
