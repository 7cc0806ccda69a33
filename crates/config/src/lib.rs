//! Configuration management for macro keybinds.
//!
//! This crate provides the settings consumed by the keybind engine (where the
//! binding store lives, how long pending chords survive, whether the host's
//! default hotbar keys are suppressed) and the loader that assembles them from
//! `.env`, environment variables and an optional JSON settings file.

pub mod constants;
mod loader;
pub mod paths;
pub mod types;

pub use loader::{ConfigError, ConfigLoader, env_var_or_none};
pub use types::{KeybindConfig, PendingConfig, SettingsFile};
