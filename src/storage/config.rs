//! Configuration handling for unitodo
//!
//! Configuration is stored in `~/.config/unitodo/config.toml` (or the
//! platform equivalent), or at an explicit path given with `--config` /
//! `UNITODO_CONFIG`.
//!
//! ```toml
//! active_profile = "default"
//!
//! [profiles.default]
//! todo_states = [["TODO", "DOING", "DONE", "CANCELLED"]]
//! default_filter = "active"
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{FilterMode, StatusConfig, StatusStateSet};

pub const DEFAULT_PROFILE: &str = "default";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Profile '{0}' does not exist")]
    UnknownProfile(String),

    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

fn markers(raw: &[&str]) -> StatusStateSet {
    StatusStateSet::new(raw.iter().copied())
        .unwrap_or_else(|_| unreachable!("static sets hold 1-4 markers"))
}

/// State sets used when a profile does not list its own
pub fn default_todo_states() -> StatusConfig {
    StatusConfig::new(vec![
        markers(&["TODO", "DOING", "DONE", "CANCELLED"]),
        markers(&["- [ ]", "- [/]", "- [x]", "- [-]"]),
    ])
}

/// Settings for one profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    /// Marker vocabularies, first match wins; empty means unconfigured
    pub todo_states: StatusConfig,

    /// Filter used by `sort` when none is given
    pub default_filter: FilterMode,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            todo_states: default_todo_states(),
            default_filter: FilterMode::All,
        }
    }
}

/// File-level configuration: a set of named profiles and the active one
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub active_profile: String,
    pub profiles: BTreeMap<String, Profile>,
}

impl Default for AppConfig {
    fn default() -> Self {
        let mut profiles = BTreeMap::new();
        profiles.insert(DEFAULT_PROFILE.to_string(), Profile::default());
        Self {
            active_profile: DEFAULT_PROFILE.to_string(),
            profiles,
        }
    }
}

impl AppConfig {
    pub fn active(&self) -> Option<&Profile> {
        self.profiles.get(&self.active_profile)
    }

    /// Switches the active profile, failing if it does not exist
    pub fn set_active(&mut self, name: &str) -> Result<(), ConfigError> {
        if !self.profiles.contains_key(name) {
            return Err(ConfigError::UnknownProfile(name.to_string()));
        }
        self.active_profile = name.to_string();
        Ok(())
    }
}

/// Loaded configuration plus where it came from
#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub path: Option<PathBuf>,
}

impl Config {
    /// Loads from an explicit path, or from the global location.
    /// A missing file yields the defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => Self::global_config_path(),
        };

        let app = match &path {
            Some(path) if path.exists() => Self::load_file(path)?,
            _ => AppConfig::default(),
        };

        Ok(Self { app, path })
    }

    /// Returns the global config directory
    pub fn global_config_dir() -> Option<PathBuf> {
        ProjectDirs::from("dev", "unitodo", "unitodo").map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Returns the global config file path
    pub fn global_config_path() -> Option<PathBuf> {
        Self::global_config_dir().map(|dir| dir.join("config.toml"))
    }

    fn load_file(path: &Path) -> Result<AppConfig> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;

        Self::parse(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))
    }

    /// Parses TOML configuration text
    pub fn parse(content: &str) -> Result<AppConfig, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// State sets of the active profile. A missing profile degrades to an
    /// empty configuration rather than failing.
    pub fn status_config(&self) -> StatusConfig {
        self.app
            .active()
            .map(|profile| profile.todo_states.clone())
            .unwrap_or_default()
    }

    /// Default filter of the active profile
    pub fn default_filter(&self) -> FilterMode {
        self.app
            .active()
            .map(|profile| profile.default_filter)
            .unwrap_or_default()
    }

    /// Writes the configuration back to its path
    pub fn save(&self) -> Result<PathBuf> {
        let path = self
            .path
            .clone()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create config directory: {}", dir.display()))?;
        }

        let content = toml::to_string_pretty(&self.app).context("Failed to serialize config")?;

        fs::write(&path, content)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;
        Ok(path)
    }
}
