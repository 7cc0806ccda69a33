//! CLI argument definitions and parsing.
//!
//! Responsibilities:
//! - Define the CLI structure using clap derive macros.
//! - Bind global options to their `MACRO_KEYBINDS_*` environment variables.
//!
//! Non-responsibilities:
//! - Does not execute commands (see `dispatch` module).
//! - Does not resolve configuration layers (see `context` module).

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands;

#[derive(Parser)]
#[command(name = "macro-keybinds")]
#[command(about = "Bind keyboard chords to macros and resolve them at dispatch time", long_about = None)]
#[command(version)]
#[command(
    after_help = "Examples:\n  macro-keybinds macros add m1 Fireball\n  macro-keybinds bind m1 Shift+C\n  macro-keybinds dispatch shift+c\n  macro-keybinds macros add m2 Heal --chord Ctrl+7\n  macro-keybinds --owner gm list --output json\n  macro-keybinds hotbar --disable\n"
)]
pub struct Cli {
    /// Identity whose bindings are read and written (defaults to the OS user)
    #[arg(long, global = true, env = "MACRO_KEYBINDS_OWNER")]
    pub owner: Option<String>,

    /// Path of the JSON file holding macros and bindings
    #[arg(long, global = true, env = "MACRO_KEYBINDS_STORAGE_PATH", value_name = "FILE")]
    pub storage_path: Option<PathBuf>,

    /// Path to a settings file (overrides the default location)
    #[arg(long, global = true, env = "MACRO_KEYBINDS_CONFIG_PATH", value_name = "FILE")]
    pub config_path: Option<PathBuf>,

    /// Output format (table, json)
    #[arg(short, long, global = true, default_value = "table")]
    pub output: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage the macro catalog
    Macros {
        #[command(subcommand)]
        command: commands::macros::MacrosCommand,
    },

    /// Bind a chord to an existing macro, evicting any macro that held it
    Bind {
        /// Macro identifier
        #[arg(value_name = "ACTION_ID")]
        action_id: String,

        /// Chord such as 'Shift+C', 'ctrl+alt+k' or 'F5'
        #[arg(value_name = "CHORD")]
        chord: String,
    },

    /// Remove the chord bound to a macro
    Unbind {
        /// Macro identifier
        #[arg(value_name = "ACTION_ID")]
        action_id: String,
    },

    /// List stored bindings
    List,

    /// Resolve a chord and run the macro bound to it
    Dispatch {
        /// Chord as pressed, e.g. 'shift+c'
        #[arg(value_name = "CHORD")]
        chord: String,
    },

    /// Drop bindings of deleted macros and refresh labels
    Sync,

    /// Show how a chord is normalized without storing it
    Normalize {
        /// Chord text
        #[arg(value_name = "CHORD")]
        chord: String,
    },

    /// Suppress or restore the default number-row hotbar keys
    Hotbar {
        /// Suppress the default hotbar keys
        #[arg(long, conflicts_with = "enable")]
        disable: bool,

        /// Restore the default hotbar keys
        #[arg(long)]
        enable: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_hotbar_flags_conflict() {
        let result = Cli::try_parse_from(["macro-keybinds", "hotbar", "--disable", "--enable"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_global_owner_after_subcommand() {
        let cli = Cli::try_parse_from(["macro-keybinds", "list", "--owner", "gm"]).unwrap();
        assert_eq!(cli.owner.as_deref(), Some("gm"));
    }
}
