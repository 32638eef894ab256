//! Config CLI commands

use std::path::Path;

use anyhow::{bail, Result};
use clap::Subcommand;

use super::output::Output;
use crate::storage::{AppConfig, Config};

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the effective configuration
    Show,

    /// Write the default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// List profiles
    Profiles,

    /// Switch the active profile
    Use {
        /// Profile name
        profile: String,
    },
}

pub fn run(cmd: ConfigCommands, output: &Output, config_path: Option<&Path>) -> Result<()> {
    match cmd {
        ConfigCommands::Show => show(output, config_path),
        ConfigCommands::Init { force } => init(output, config_path, force),
        ConfigCommands::Profiles => profiles(output, config_path),
        ConfigCommands::Use { profile } => use_profile(output, config_path, &profile),
    }
}

fn show(output: &Output, config_path: Option<&Path>) -> Result<()> {
    let config = Config::load(config_path)?;

    if output.is_json() {
        output.data(&config.app);
        return Ok(());
    }

    let location = config
        .path
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "(none)".to_string());
    output.field("path", location);
    output.field("profile", &config.app.active_profile);
    output.field("filter", config.default_filter());

    let status = config.status_config();
    if status.is_unconfigured() {
        output.field("states", "(none)");
    }
    for set in status.sets() {
        output.field("states", set.markers().join(" | "));
    }
    Ok(())
}

fn init(output: &Output, config_path: Option<&Path>, force: bool) -> Result<()> {
    let mut config = Config::load(config_path)?;
    if let Some(path) = &config.path {
        if path.exists() && !force {
            bail!("Config already exists at {} (use --force to overwrite)", path.display());
        }
    }

    config.app = AppConfig::default();
    let path = config.save()?;
    output.success(&format!("Wrote config to {}", path.display()));
    Ok(())
}

fn profiles(output: &Output, config_path: Option<&Path>) -> Result<()> {
    let config = Config::load(config_path)?;

    if output.is_json() {
        let names: Vec<&String> = config.app.profiles.keys().collect();
        output.data(&serde_json::json!({
            "active": config.app.active_profile,
            "profiles": names,
        }));
        return Ok(());
    }

    for name in config.app.profiles.keys() {
        let marker = if *name == config.app.active_profile { "*" } else { " " };
        output.row(&[marker, name]);
    }
    Ok(())
}

fn use_profile(output: &Output, config_path: Option<&Path>, profile: &str) -> Result<()> {
    let mut config = Config::load(config_path)?;
    config.app.set_active(profile)?;
    let path = config.save()?;

    output.verbose_ctx("config", &format!("saved {}", path.display()));
    output.success(&format!("Active profile: {}", profile));
    Ok(())
}
