//! Path helpers for storage and settings file locations.
//!
//! Responsibilities:
//! - Determine the platform config directory via the `directories` crate.
//! - Name the binding store and settings files inside it.
//!
//! Does NOT handle:
//! - File I/O operations.

use std::path::PathBuf;

use anyhow::Context;

use crate::constants::{SETTINGS_FILE_NAME, STORAGE_FILE_NAME};

fn config_dir() -> Result<PathBuf, anyhow::Error> {
    let proj_dirs = directories::ProjectDirs::from("", "", "macro-keybinds")
        .context("Failed to determine project directories")?;

    Ok(proj_dirs.config_dir().to_path_buf())
}

/// Returns the default path of the JSON key-value store holding binding sets.
///
/// - Linux: `~/.config/macro-keybinds/keybinds.json`
/// - macOS: `~/Library/Application Support/macro-keybinds/keybinds.json`
/// - Windows: `%AppData%\macro-keybinds\config\keybinds.json`
pub fn default_storage_path() -> Result<PathBuf, anyhow::Error> {
    Ok(config_dir()?.join(STORAGE_FILE_NAME))
}

/// Returns the default path of the optional JSON settings file.
pub fn default_settings_path() -> Result<PathBuf, anyhow::Error> {
    Ok(config_dir()?.join(SETTINGS_FILE_NAME))
}
