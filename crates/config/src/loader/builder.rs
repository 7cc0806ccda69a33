//! Configuration loader builder implementation.
//!
//! Responsibilities:
//! - Provide a builder-pattern `ConfigLoader` for hierarchical configuration merging.
//! - Support loading from the settings file, environment variables, and direct builder methods.
//! - Validate and build the final `KeybindConfig`.
//!
//! Invariants / Assumptions:
//! - Each source only overrides the values it actually provides.
//! - `load_dotenv()` must be called explicitly to enable `.env` file loading.
//! - Validation happens once, in `build()`.

use std::path::PathBuf;
use std::time::Duration;

use super::env::{apply_env, system_user_name};
use super::error::ConfigError;
use super::file::apply_settings_file;
use crate::constants::{
    DEFAULT_OWNER, DEFAULT_PENDING_CAPACITY, DEFAULT_PENDING_EXPIRY_SECS, MAX_PENDING_CAPACITY,
    MAX_PENDING_EXPIRY_SECS,
};
use crate::paths::default_storage_path;
use crate::types::{KeybindConfig, PendingConfig};

/// Configuration loader that builds config from files, environment variables and overrides.
#[derive(Debug, Default)]
pub struct ConfigLoader {
    config_path: Option<PathBuf>,
    storage_path: Option<PathBuf>,
    owner: Option<String>,
    pending_expiry_secs: Option<u64>,
    pending_capacity: Option<usize>,
    disable_default_hotbar: Option<bool>,
}

impl ConfigLoader {
    /// Create a new configuration loader.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if dotenv loading is disabled via environment variable.
    fn dotenv_disabled() -> bool {
        std::env::var("DOTENV_DISABLED")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    }

    /// Load environment variables from a `.env` file if present.
    ///
    /// A missing `.env` file is not an error. Set `DOTENV_DISABLED=1` to skip.
    pub fn load_dotenv(self) -> Result<Self, ConfigError> {
        if Self::dotenv_disabled() {
            return Ok(self);
        }

        match dotenvy::dotenv() {
            Ok(_) => Ok(self),
            Err(e) if Self::is_not_found(&e) => Ok(self),
            Err(dotenvy::Error::LineParse(_, idx)) => {
                Err(ConfigError::DotenvParse { error_index: idx })
            }
            Err(dotenvy::Error::Io(io_err)) => Err(ConfigError::DotenvIo {
                kind: io_err.kind(),
            }),
            Err(_) => Err(ConfigError::DotenvUnknown),
        }
    }

    fn is_not_found(err: &dotenvy::Error) -> bool {
        matches!(
            err,
            dotenvy::Error::Io(io_err) if io_err.kind() == std::io::ErrorKind::NotFound
        )
    }

    /// Override the settings file path.
    pub fn with_config_path(mut self, path: PathBuf) -> Self {
        self.config_path = Some(path);
        self
    }

    /// Read configuration from the settings file.
    pub fn from_file(mut self) -> Result<Self, ConfigError> {
        apply_settings_file(&mut self)?;
        Ok(self)
    }

    /// Read configuration from environment variables.
    pub fn from_env(mut self) -> Result<Self, ConfigError> {
        apply_env(&mut self)?;
        Ok(self)
    }

    /// Set the binding store path.
    pub fn with_storage_path(mut self, path: PathBuf) -> Self {
        self.storage_path = Some(path);
        self
    }

    /// Set the owner identity.
    pub fn with_owner(mut self, owner: String) -> Self {
        self.owner = Some(owner);
        self
    }

    /// Set the pending expiry window.
    pub fn with_pending_expiry(mut self, expiry: Duration) -> Self {
        self.pending_expiry_secs = Some(expiry.as_secs());
        self
    }

    /// Set the pending buffer capacity.
    pub fn with_pending_capacity(mut self, capacity: usize) -> Self {
        self.pending_capacity = Some(capacity);
        self
    }

    /// Set whether default hotbar chords are suppressed.
    pub fn with_disable_default_hotbar(mut self, disable: bool) -> Self {
        self.disable_default_hotbar = Some(disable);
        self
    }

    pub(crate) fn config_path(&self) -> Option<&PathBuf> {
        self.config_path.as_ref()
    }

    pub(crate) fn set_storage_path(&mut self, path: Option<PathBuf>) {
        self.storage_path = path;
    }

    pub(crate) fn set_owner(&mut self, owner: Option<String>) {
        self.owner = owner;
    }

    pub(crate) fn set_pending_expiry_secs(&mut self, secs: Option<u64>) {
        self.pending_expiry_secs = secs;
    }

    pub(crate) fn set_pending_capacity(&mut self, capacity: Option<usize>) {
        self.pending_capacity = capacity;
    }

    pub(crate) fn set_disable_default_hotbar(&mut self, disable: Option<bool>) {
        self.disable_default_hotbar = disable;
    }

    /// Build the final configuration.
    pub fn build(self) -> Result<KeybindConfig, ConfigError> {
        let expiry_secs = self
            .pending_expiry_secs
            .unwrap_or(DEFAULT_PENDING_EXPIRY_SECS);
        if expiry_secs == 0 || expiry_secs > MAX_PENDING_EXPIRY_SECS {
            return Err(ConfigError::InvalidPendingExpiry {
                message: format!(
                    "must be between 1 and {} seconds (got {})",
                    MAX_PENDING_EXPIRY_SECS, expiry_secs
                ),
            });
        }

        let capacity = self.pending_capacity.unwrap_or(DEFAULT_PENDING_CAPACITY);
        if capacity == 0 || capacity > MAX_PENDING_CAPACITY {
            return Err(ConfigError::InvalidPendingCapacity {
                message: format!(
                    "must be between 1 and {} (got {})",
                    MAX_PENDING_CAPACITY, capacity
                ),
            });
        }

        let owner = match self.owner {
            Some(owner) if owner.trim().is_empty() => return Err(ConfigError::EmptyOwner),
            Some(owner) => owner.trim().to_string(),
            None => system_user_name().unwrap_or_else(|| DEFAULT_OWNER.to_string()),
        };

        let storage_path = match self.storage_path {
            Some(path) => path,
            None => default_storage_path()
                .map_err(|e| ConfigError::ConfigDirUnavailable(e.to_string()))?,
        };

        Ok(KeybindConfig {
            storage_path,
            owner,
            pending: PendingConfig {
                expiry: Duration::from_secs(expiry_secs),
                capacity,
            },
            disable_default_hotbar: self.disable_default_hotbar.unwrap_or(false),
        })
    }
}
