//! Environment variable parsing for configuration.
//!
//! Responsibilities:
//! - Read and parse `MACRO_KEYBINDS_*` environment variables.
//! - Apply environment variable values to a ConfigLoader instance.
//! - Resolve the OS user name as the fallback owner identity.
//!
//! Invariants:
//! - Empty or whitespace-only environment variables are treated as unset.
//! - Returned values are trimmed (leading/trailing whitespace removed).
//! - Invalid numeric or boolean values return ConfigError::InvalidValue.

use std::path::PathBuf;
use std::str::FromStr;

use super::builder::ConfigLoader;
use super::error::ConfigError;

pub(crate) const ENV_STORAGE_PATH: &str = "MACRO_KEYBINDS_STORAGE_PATH";
pub(crate) const ENV_CONFIG_PATH: &str = "MACRO_KEYBINDS_CONFIG_PATH";
pub(crate) const ENV_PENDING_EXPIRY: &str = "MACRO_KEYBINDS_PENDING_EXPIRY_SECS";
pub(crate) const ENV_PENDING_CAPACITY: &str = "MACRO_KEYBINDS_PENDING_CAPACITY";
pub(crate) const ENV_DISABLE_HOTBAR: &str = "MACRO_KEYBINDS_DISABLE_DEFAULT_HOTBAR";
pub(crate) const ENV_OWNER: &str = "MACRO_KEYBINDS_OWNER";

/// Read an environment variable, returning None if unset, empty, or whitespace-only.
/// Returns the trimmed value (leading/trailing whitespace removed) if present.
pub fn env_var_or_none(key: &str) -> Option<String> {
    std::env::var(key).ok().and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else if trimmed.len() == s.len() {
            Some(s)
        } else {
            Some(trimmed.to_string())
        }
    })
}

fn parse_var<T: FromStr>(var: &str, value: &str, message: &str) -> Result<T, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidValue {
        var: var.to_string(),
        message: message.to_string(),
    })
}

/// Apply environment variable configuration to the loader.
pub fn apply_env(loader: &mut ConfigLoader) -> Result<(), ConfigError> {
    if let Some(path) = env_var_or_none(ENV_STORAGE_PATH) {
        loader.set_storage_path(Some(PathBuf::from(path)));
    }
    if let Some(owner) = env_var_or_none(ENV_OWNER) {
        loader.set_owner(Some(owner));
    }
    if let Some(expiry) = env_var_or_none(ENV_PENDING_EXPIRY) {
        loader.set_pending_expiry_secs(Some(parse_var(
            ENV_PENDING_EXPIRY,
            &expiry,
            "must be a number of seconds",
        )?));
    }
    if let Some(capacity) = env_var_or_none(ENV_PENDING_CAPACITY) {
        loader.set_pending_capacity(Some(parse_var(
            ENV_PENDING_CAPACITY,
            &capacity,
            "must be a non-negative integer",
        )?));
    }
    if let Some(disable) = env_var_or_none(ENV_DISABLE_HOTBAR) {
        loader.set_disable_default_hotbar(Some(parse_var(
            ENV_DISABLE_HOTBAR,
            &disable,
            "must be true or false",
        )?));
    }
    Ok(())
}

/// The logged-in OS user, used when no owner is configured.
pub fn system_user_name() -> Option<String> {
    env_var_or_none("USER").or_else(|| env_var_or_none("USERNAME"))
}
