//! XDG-style path utilities for configuration and local state.
//!
//! Paths follow the XDG Base Directory conventions on every platform
//! rather than OS-specific locations.

use anyhow::{Context, Result};
use std::path::PathBuf;

const APP_DIR: &str = "parley";

/// Returns the configuration directory for parley.
///
/// Resolution order:
/// 1. `$XDG_CONFIG_HOME/parley` if `XDG_CONFIG_HOME` is set
/// 2. `~/.config/parley` otherwise
pub fn config_dir() -> Result<PathBuf> {
    match std::env::var("XDG_CONFIG_HOME") {
        Ok(xdg) if !xdg.is_empty() => Ok(PathBuf::from(xdg).join(APP_DIR)),
        _ => Ok(home_dir()?.join(".config").join(APP_DIR)),
    }
}

/// Returns the local data directory for parley (persisted user id).
///
/// Resolution order:
/// 1. `$XDG_DATA_HOME/parley` if `XDG_DATA_HOME` is set
/// 2. `~/.local/share/parley` otherwise
pub fn data_dir() -> Result<PathBuf> {
    match std::env::var("XDG_DATA_HOME") {
        Ok(xdg) if !xdg.is_empty() => Ok(PathBuf::from(xdg).join(APP_DIR)),
        _ => Ok(home_dir()?.join(".local").join("share").join(APP_DIR)),
    }
}

fn home_dir() -> Result<PathBuf> {
    dirs::home_dir().context("Failed to determine home directory")
}
