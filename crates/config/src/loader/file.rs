//! Settings file loading for configuration.
//!
//! Responsibilities:
//! - Locate the JSON settings file (explicit path, env var, or platform default).
//! - Apply the file's values to a ConfigLoader instance.
//!
//! Invariants:
//! - A missing settings file is not an error; an unreadable or malformed one is.
//! - Only fields present in the file are applied.

use std::path::Path;

use super::builder::ConfigLoader;
use super::env::{ENV_CONFIG_PATH, env_var_or_none};
use super::error::ConfigError;
use crate::paths::default_settings_path;
use crate::types::SettingsFile;

/// Read and parse a settings file.
pub(crate) fn read_settings_file(path: &Path) -> Result<SettingsFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::SettingsFileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    serde_json::from_str(&content).map_err(|e| ConfigError::SettingsFileParse {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Apply settings file values to the loader.
pub fn apply_settings_file(loader: &mut ConfigLoader) -> Result<(), ConfigError> {
    let path = match loader.config_path() {
        Some(path) => path.clone(),
        None => match env_var_or_none(ENV_CONFIG_PATH) {
            Some(path) => path.into(),
            None => default_settings_path()
                .map_err(|e| ConfigError::ConfigDirUnavailable(e.to_string()))?,
        },
    };

    if !path.exists() {
        tracing::debug!(path = %path.display(), "No settings file, using defaults");
        return Ok(());
    }

    let file = read_settings_file(&path)?;
    tracing::debug!(path = %path.display(), "Loaded settings file");

    if let Some(storage_path) = file.storage_path {
        loader.set_storage_path(Some(storage_path));
    }
    if let Some(owner) = file.owner {
        loader.set_owner(Some(owner));
    }
    if let Some(expiry) = file.pending_expiry_secs {
        loader.set_pending_expiry_secs(Some(expiry));
    }
    if let Some(capacity) = file.pending_capacity {
        loader.set_pending_capacity(Some(capacity));
    }
    if let Some(disable) = file.disable_default_hotbar {
        loader.set_disable_default_hotbar(Some(disable));
    }
    Ok(())
}
