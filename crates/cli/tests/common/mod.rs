//! Shared test utilities for macro-keybinds integration tests.
//!
//! Responsibilities:
//! - Provide a hermetic CLI command factory that prevents dotenv loading.
//! - Point every command at a throwaway storage file.
//!
//! Invariants / Assumptions:
//! - All integration tests using this helper are hermetic by default.
//! - `MACRO_KEYBINDS_OWNER` is "alice" unless overridden.

use std::path::PathBuf;

use assert_cmd::Command;
use tempfile::TempDir;

/// A temporary workspace holding the storage and settings files.
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("create temp dir"),
        }
    }

    pub fn storage_path(&self) -> PathBuf {
        self.dir.path().join("keybinds.json")
    }

    pub fn settings_path(&self) -> PathBuf {
        self.dir.path().join("settings.json")
    }

    /// Parsed contents of the storage file.
    #[allow(dead_code)]
    pub fn stored(&self) -> serde_json::Value {
        let content = std::fs::read_to_string(self.storage_path()).expect("read storage file");
        serde_json::from_str(&content).expect("storage file is JSON")
    }

    /// Returns a hermetic `macro-keybinds` command bound to this workspace.
    ///
    /// It ensures:
    /// - `DOTENV_DISABLED=1` is set to prevent local `.env` contamination.
    /// - Storage and settings paths point into the temp dir.
    /// - Other loader env vars are cleared to ensure no leakage from the host.
    pub fn cmd(&self) -> Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("macro-keybinds");

        cmd.env("DOTENV_DISABLED", "1");
        cmd.env("MACRO_KEYBINDS_STORAGE_PATH", self.storage_path());
        cmd.env("MACRO_KEYBINDS_CONFIG_PATH", self.settings_path());
        cmd.env("MACRO_KEYBINDS_OWNER", "alice");

        cmd.env_remove("MACRO_KEYBINDS_PENDING_EXPIRY_SECS")
            .env_remove("MACRO_KEYBINDS_PENDING_CAPACITY")
            .env_remove("MACRO_KEYBINDS_DISABLE_DEFAULT_HOTBAR")
            .env_remove("RUST_LOG");

        cmd
    }
}
