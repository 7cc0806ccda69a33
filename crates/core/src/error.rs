//! Error types for the keybind engine.
//!
//! Normalization and conflict resolution are total functions and never fail;
//! every variant here originates at a persistence, registry or host boundary,
//! or at input validation before any mutation.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for keybind operations.
pub type Result<T> = std::result::Result<T, KeybindError>;

/// Errors that can occur while capturing, storing or dispatching bindings.
#[derive(Error, Debug)]
pub enum KeybindError {
    /// The persisted binding set is not a mapping.
    ///
    /// Recovered inside the store by resetting to an empty set; callers only
    /// see it from `BindingSet::from_value`.
    #[error("stored binding set is not a mapping")]
    MalformedStorage,

    /// The underlying settings store failed; the binding is not guaranteed to survive a restart.
    #[error("binding not saved: {0}")]
    Storage(#[from] StorageError),

    /// The action registry or macro repository no longer knows this action.
    #[error("action not found: {action_id}")]
    ActionNotFound { action_id: String },

    /// Empty or sentinel action identifier.
    #[error("invalid action id: '{action_id}'")]
    InvalidActionId { action_id: String },

    /// A capture was presented with neither an existing action nor a capture token.
    #[error("capture needs a target action or a capture token")]
    MissingCaptureTarget,
}

/// Errors raised by a settings storage backend.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("storage I/O failed at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Errors raised by a host adapter when changing its default bindings.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HostError {
    #[error("host rejected change for {chord}: {message}")]
    Rejected { chord: String, message: String },

    #[error("host does not support default binding changes")]
    Unsupported,
}
