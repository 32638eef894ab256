//! # Storage Layer
//!
//! The only persisted state is the TOML configuration: named profiles,
//! each with its status state sets. Todo records themselves come from the
//! scanner and are never written back here.
//!
//! | Data | Format | Location |
//! |------|--------|----------|
//! | Config | TOML | `<config dir>/unitodo/config.toml`, `--config` or `UNITODO_CONFIG` |

mod config;

pub use config::{default_todo_states, AppConfig, Config, ConfigError, Profile, DEFAULT_PROFILE};
