//! CLI exit codes for scripting and automation.
//!
//! Responsibilities:
//! - Define structured exit codes that scripts can use to distinguish error types.
//! - Map keybind, chord and configuration errors to those codes.
//!
//! Does NOT handle:
//! - Error message formatting (handled by anyhow Display).
//!
//! Invariants:
//! - Exit codes 1-9 are reserved for specific error categories.

use macro_keybinds_config::ConfigError;
use macro_keybinds_core::{ChordParseError, KeybindError};
use thiserror::Error;

/// Structured exit codes for macro-keybinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    /// Success - command completed successfully.
    Success = 0,

    /// General error - unhandled or generic failure.
    GeneralError = 1,

    /// Macro not found.
    ///
    /// Scripts should check the macro identifier or create the macro first.
    NotFound = 4,

    /// Validation error - bad chord text, invalid identifier, bad settings.
    ///
    /// Scripts should fix the input and not retry the same request.
    ValidationError = 5,

    /// The binding store could not be read or written.
    ///
    /// The binding is not guaranteed to survive a restart.
    StorageError = 6,
}

impl ExitCode {
    /// Convert the exit code to an i32 for use with std::process::exit().
    pub const fn as_i32(self) -> i32 {
        self as u8 as i32
    }
}

impl From<&KeybindError> for ExitCode {
    fn from(err: &KeybindError) -> Self {
        match err {
            KeybindError::ActionNotFound { .. } => ExitCode::NotFound,
            KeybindError::InvalidActionId { .. } | KeybindError::MissingCaptureTarget => {
                ExitCode::ValidationError
            }
            KeybindError::Storage(_) | KeybindError::MalformedStorage => ExitCode::StorageError,
        }
    }
}

/// Errors raised by the CLI's own catalog handling.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("macro '{action_id}' already exists")]
    MacroExists { action_id: String },

    #[error("macro '{action_id}' not found")]
    MacroNotFound { action_id: String },

    #[error("invalid output format: {0}. Valid options: table, json")]
    InvalidOutputFormat(String),
}

impl From<&CliError> for ExitCode {
    fn from(err: &CliError) -> Self {
        match err {
            CliError::MacroNotFound { .. } => ExitCode::NotFound,
            CliError::MacroExists { .. } | CliError::InvalidOutputFormat(_) => {
                ExitCode::ValidationError
            }
        }
    }
}

/// Extension trait for anyhow::Error to extract exit codes.
pub trait ExitCodeExt {
    /// Extract the appropriate exit code from this error.
    ///
    /// Returns ExitCode::GeneralError if no known error is in the chain.
    fn exit_code(&self) -> ExitCode;
}

impl ExitCodeExt for anyhow::Error {
    fn exit_code(&self) -> ExitCode {
        for cause in self.chain() {
            if let Some(err) = cause.downcast_ref::<KeybindError>() {
                return ExitCode::from(err);
            }
            if let Some(err) = cause.downcast_ref::<CliError>() {
                return ExitCode::from(err);
            }
            if cause.downcast_ref::<ChordParseError>().is_some()
                || cause.downcast_ref::<ConfigError>().is_some()
            {
                return ExitCode::ValidationError;
            }
        }

        ExitCode::GeneralError
    }
}
