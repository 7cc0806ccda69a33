//! Macro catalog commands.
//!
//! Responsibilities:
//! - Define macro subcommands (list, add, rename, remove).
//! - Keep bindings in step with catalog changes (pending chords on add,
//!   label refresh on rename, binding removal on remove).

use anyhow::{Context, Result};
use clap::Subcommand;
use macro_keybinds_core::{CaptureToken, KeybindError, MacroRepository};
use serde::Serialize;
use tracing::info;

use super::parse_chord;
use crate::context::CommandContext;
use crate::output::{OutputFormat, format_macros, format_message};

#[derive(Subcommand)]
pub enum MacrosCommand {
    /// List all macros
    List,
    /// Create a macro, optionally binding a chord to it
    Add {
        /// Identifier of the new macro
        #[arg(value_name = "ACTION_ID")]
        action_id: String,
        /// Display name
        #[arg(value_name = "NAME")]
        name: String,
        /// Chord captured while the macro is being created
        #[arg(short, long)]
        chord: Option<String>,
    },
    /// Rename a macro
    Rename {
        #[arg(value_name = "ACTION_ID")]
        action_id: String,
        #[arg(value_name = "NAME")]
        name: String,
    },
    /// Delete a macro and its binding
    Remove {
        #[arg(value_name = "ACTION_ID")]
        action_id: String,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AddedMacro {
    action_id: String,
    name: String,
    chord: Option<String>,
    evicted: Vec<String>,
}

pub async fn run(ctx: &CommandContext, command: MacrosCommand, format: OutputFormat) -> Result<()> {
    match command {
        MacrosCommand::List => run_list(ctx, format).await,
        MacrosCommand::Add {
            action_id,
            name,
            chord,
        } => run_add(ctx, &action_id, &name, chord.as_deref(), format).await,
        MacrosCommand::Rename { action_id, name } => run_rename(ctx, &action_id, &name).await,
        MacrosCommand::Remove { action_id } => run_remove(ctx, &action_id).await,
    }
}

async fn run_list(ctx: &CommandContext, format: OutputFormat) -> Result<()> {
    let macros = ctx
        .catalog()
        .list()
        .await
        .context("Failed to read macro catalog")?;
    print!("{}", format_macros(&macros, format)?);
    Ok(())
}

async fn run_add(
    ctx: &CommandContext,
    action_id: &str,
    name: &str,
    chord: Option<&str>,
    format: OutputFormat,
) -> Result<()> {
    if action_id.trim().is_empty() {
        return Err(KeybindError::InvalidActionId {
            action_id: action_id.to_string(),
        }
        .into());
    }

    let raw = chord.map(parse_chord).transpose()?;
    let service = ctx.service().await?;
    let owner = ctx.owner();

    // The chord is captured before the macro exists, exactly as a creation
    // form would, and attached once the macro is created.
    let token = CaptureToken::new();
    if let Some(raw) = &raw {
        service
            .capture_chord(owner, None, Some(&token), raw)
            .await
            .context("Failed to capture chord")?;
    }

    let entity = ctx.catalog().add(action_id, name).await?;
    info!(action_id = %entity.id, "Macro created");

    let mut added = AddedMacro {
        action_id: entity.id.clone(),
        name: entity.name.clone(),
        chord: None,
        evicted: Vec::new(),
    };

    if raw.is_some()
        && let Some(outcome) = service
            .reconcile_on_create(Some(&token), &entity.id, &entity.name, owner)
            .await
            .context("Failed to bind chord to new macro")?
    {
        added.chord = outcome
            .set
            .get(&entity.id)
            .map(|binding| binding.chord.display_string());
        added.evicted = outcome.evicted;
    }

    let mut message = format!("Created macro {} ({})", added.action_id, added.name);
    if let Some(chord) = &added.chord {
        message.push_str(&format!(" bound to {chord}"));
    }
    for evicted in &added.evicted {
        message.push_str(&format!("\nRemoved chord from {evicted}"));
    }

    print!("{}", format_message(&added, &message, format)?);
    Ok(())
}

async fn run_rename(ctx: &CommandContext, action_id: &str, name: &str) -> Result<()> {
    ctx.catalog().rename(action_id, name).await?;
    let service = ctx.service().await?;
    let relabelled = service
        .on_rename(ctx.owner(), action_id, name)
        .await
        .context("Failed to update binding label")?;

    info!(action_id = %action_id, relabelled, "Macro renamed");
    println!("Renamed macro {action_id} to {name}");
    Ok(())
}

async fn run_remove(ctx: &CommandContext, action_id: &str) -> Result<()> {
    ctx.catalog().remove(action_id).await?;
    let service = ctx.service().await?;
    let unbound = service
        .on_delete(ctx.owner(), action_id)
        .await
        .context("Failed to remove binding")?;

    if unbound {
        println!("Removed macro {action_id} and its binding");
    } else {
        println!("Removed macro {action_id}");
    }
    Ok(())
}
