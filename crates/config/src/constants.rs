//! Centralized constants for the macro keybinds workspace.
//!
//! This module contains default values used across crates to avoid
//! magic number duplication and improve maintainability.

// =============================================================================
// Storage Layout
// =============================================================================

/// Namespace prefix for every key written to the settings store.
pub const SETTINGS_NAMESPACE: &str = "macro-keybinds";

/// Settings key holding a user's binding set (suffixed with the owner id).
pub const USER_KEYBINDS_KEY: &str = "userKeybinds";

/// File name of the JSON key-value store inside the config directory.
pub const STORAGE_FILE_NAME: &str = "keybinds.json";

/// File name of the JSON settings file inside the config directory.
pub const SETTINGS_FILE_NAME: &str = "settings.json";

// =============================================================================
// Pending Binding Defaults
// =============================================================================

/// Default lifetime of a chord captured for a macro that does not exist yet.
pub const DEFAULT_PENDING_EXPIRY_SECS: u64 = 30;

/// Maximum allowed pending expiry window in seconds (1 hour).
pub const MAX_PENDING_EXPIRY_SECS: u64 = 3600;

/// Default number of pending chords held at once.
pub const DEFAULT_PENDING_CAPACITY: usize = 16;

/// Maximum allowed pending buffer capacity.
pub const MAX_PENDING_CAPACITY: usize = 1024;

// =============================================================================
// Identity & Host Defaults
// =============================================================================

/// Owner identity used when neither configuration nor the OS supplies one.
pub const DEFAULT_OWNER: &str = "default";

/// Number of numeric hotbar slots the host binds by default (Digit1..Digit9, Digit0).
pub const HOTBAR_SLOT_COUNT: u8 = 10;
