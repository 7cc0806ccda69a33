//! macro-keybinds - command-line front end for the macro keybind registry.
//!
//! Responsibilities:
//! - Parse command-line arguments and environment variables.
//! - Manage a macro catalog and its chord bindings in a JSON settings file.
//! - Dispatch chords to macros and report the outcome.
//!
//! Does NOT handle:
//! - Chord normalization or conflict resolution (see `crates/core`).
//!
//! Invariants:
//! - `load_dotenv()` is called BEFORE CLI parsing to allow `.env` to provide clap defaults.
//! - Logs go to stderr so stdout stays parseable for `--output json`.

mod args;
mod catalog;
mod commands;
mod context;
mod dispatch;
mod error;
mod output;

use args::Cli;
use clap::Parser;
use dispatch::run_command;
use error::{ExitCode, ExitCodeExt};
use macro_keybinds_config::ConfigLoader;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[tokio::main]
async fn main() {
    // Load .env file BEFORE CLI parsing so clap env defaults can read .env values
    if let Err(e) = ConfigLoader::new().load_dotenv() {
        eprintln!("Failed to load environment: {}", e);
        std::process::exit(ExitCode::GeneralError.as_i32());
    }

    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let exit_code = match run_command(cli).await {
        Ok(()) => ExitCode::Success,
        Err(e) => {
            eprintln!("{:#}", e);
            e.exit_code()
        }
    };

    std::process::exit(exit_code.as_i32());
}
