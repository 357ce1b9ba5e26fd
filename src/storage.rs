//! Local persistence for user preferences.
//!
//! A single key-value file under the storage root:
//!
//! ```text
//! <root>/
//!   preferences.json   # { "theme": "dark", ... }
//! ```
//!
//! Simulation state is never persisted.

use std::collections::BTreeMap;
use std::{fs, io, path::PathBuf};

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = core::result::Result<T, StorageError>;

/// Local file-based preference storage.
pub struct Storage {
    root: PathBuf,
}

impl Storage {
    /// Creates a new storage instance rooted at the given directory.
    ///
    /// The directory is created if it doesn't exist.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// Returns the default storage root: `~/.flowtutor/`.
    pub fn default_root() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".flowtutor"))
    }

    /// Reads a stored preference.
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.load()?.remove(key))
    }

    /// Stores a preference, replacing any previous value.
    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut preferences = self.load()?;
        preferences.insert(key.to_string(), value.to_string());
        let json = serde_json::to_string_pretty(&preferences)?;
        fs::write(self.preferences_path(), json)?;
        Ok(())
    }

    fn load(&self) -> Result<BTreeMap<String, String>> {
        match fs::read_to_string(self.preferences_path()) {
            Ok(json) => Ok(serde_json::from_str(&json)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn preferences_path(&self) -> PathBuf {
        self.root.join("preferences.json")
    }
}
