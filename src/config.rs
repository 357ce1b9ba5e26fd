//! flowtutor configuration.
//!
//! Loaded from `~/.flowtutor/config.toml`. Every key is optional; a missing
//! file means all defaults.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::simulation::DEFAULT_MUTATE_EVERY;
use crate::simulation::scheduler::Speed;

/// flowtutor configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct Config {
    /// Tick period at normal speed, in milliseconds.
    pub tick_millis: u64,

    /// Speed the simulation starts at when `--speed` is not given.
    pub speed: Speed,

    /// Ticks between actor mutations.
    pub mutate_every: u64,

    /// Fixed seed for reproducible simulations. Unseeded when absent.
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tick_millis: 1000,
            speed: Speed::Normal,
            mutate_every: DEFAULT_MUTATE_EVERY,
            seed: None,
        }
    }
}

impl Config {
    /// Load config from `~/.flowtutor/config.toml`.
    /// Falls back to defaults when the home directory or the file is missing.
    pub fn load() -> Result<Self, String> {
        match Self::path() {
            Some(path) => Self::load_from(&path),
            None => {
                tracing::warn!("could not determine home directory, using default config");
                Ok(Self::default())
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, String> {
        let contents = match fs::read_to_string(path) {
            Ok(s) => s,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(format!("failed to read {}: {e}", path.display())),
        };

        let config: Self = toml::from_str(&contents)
            .map_err(|e| format!("invalid config at {}: {e}", path.display()))?;

        if config.tick_millis == 0 {
            return Err(format!("tick-millis must be positive in {}", path.display()));
        }
        if config.mutate_every == 0 {
            return Err(format!("mutate-every must be positive in {}", path.display()));
        }

        Ok(config)
    }

    /// Tick period at normal speed.
    pub fn base_period(&self) -> Duration {
        Duration::from_millis(self.tick_millis)
    }

    /// The config file path: `~/.flowtutor/config.toml`.
    pub fn path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".flowtutor").join("config.toml"))
    }
}
