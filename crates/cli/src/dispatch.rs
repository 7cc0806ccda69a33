//! Command dispatch logic.
//!
//! Responsibilities:
//! - Route parsed CLI arguments to the matching command handler.
//! - Resolve the output format and command context once per run.
//!
//! Does NOT handle:
//! - CLI structure definitions (see `args` module).
//! - Configuration layering (see `context` module).

use anyhow::Result;

use crate::args::{Cli, Commands};
use crate::commands;
use crate::context::CommandContext;
use crate::output::OutputFormat;

pub(crate) async fn run_command(cli: Cli) -> Result<()> {
    let format = OutputFormat::from_str(&cli.output)?;

    // Normalizing a chord touches no configuration or storage.
    if let Commands::Normalize { chord } = &cli.command {
        return commands::normalize::run(chord, format);
    }

    let ctx = CommandContext::from_cli(&cli)?;

    match cli.command {
        Commands::Macros { command } => commands::macros::run(&ctx, command, format).await?,
        Commands::Bind { action_id, chord } => {
            commands::bind::run_bind(&ctx, &action_id, &chord, format).await?
        }
        Commands::Unbind { action_id } => commands::bind::run_unbind(&ctx, &action_id).await?,
        Commands::List => commands::list::run(&ctx, format).await?,
        Commands::Dispatch { chord } => commands::dispatch::run(&ctx, &chord, format).await?,
        Commands::Sync => commands::sync::run(&ctx, format).await?,
        Commands::Hotbar { disable, enable } => {
            commands::hotbar::run(&ctx, disable, enable, format).await?
        }
        Commands::Normalize { .. } => {}
    }

    Ok(())
}
