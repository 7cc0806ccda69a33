//! Configuration types for macro keybinds.
//!
//! Responsibilities:
//! - Define the resolved runtime configuration (`KeybindConfig`).
//! - Define the on-disk settings file shape (`SettingsFile`).
//!
//! Does NOT handle:
//! - Loading values from the environment or disk (see `loader`).
//!
//! Invariants:
//! - `PendingConfig::expiry` is non-zero and `capacity` is at least 1 once built
//!   through `ConfigLoader::build`.
//! - `SettingsFile` fields are all optional; absent fields fall through to
//!   defaults.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_PENDING_CAPACITY, DEFAULT_PENDING_EXPIRY_SECS};

/// Settings for the in-memory pending binding buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingConfig {
    /// How long a captured chord waits for its macro to be created.
    pub expiry: Duration,
    /// Maximum number of pending chords held at once.
    pub capacity: usize,
}

impl Default for PendingConfig {
    fn default() -> Self {
        Self {
            expiry: Duration::from_secs(DEFAULT_PENDING_EXPIRY_SECS),
            capacity: DEFAULT_PENDING_CAPACITY,
        }
    }
}

/// Fully resolved configuration for the keybind engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeybindConfig {
    /// Path of the JSON key-value store holding every owner's binding set.
    pub storage_path: PathBuf,
    /// Identity of the user whose bindings are read and written.
    pub owner: String,
    /// Pending binding buffer settings.
    pub pending: PendingConfig,
    /// Whether the host's default numeric hotbar chords should be suppressed.
    pub disable_default_hotbar: bool,
}

/// Optional JSON settings file.
///
/// Unknown fields are ignored so newer settings files stay readable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SettingsFile {
    pub storage_path: Option<PathBuf>,
    pub owner: Option<String>,
    pub pending_expiry_secs: Option<u64>,
    pub pending_capacity: Option<usize>,
    pub disable_default_hotbar: Option<bool>,
}
