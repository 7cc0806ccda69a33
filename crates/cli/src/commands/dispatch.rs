//! Dispatch a chord to its macro.

use anyhow::{Context, Result};
use macro_keybinds_core::{Chord, DispatchOutcome};
use serde::Serialize;

use crate::context::CommandContext;
use crate::output::{OutputFormat, format_message};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DispatchResult {
    chord: String,
    outcome: &'static str,
    action_id: Option<String>,
    name: Option<String>,
}

pub async fn run(ctx: &CommandContext, chord: &str, format: OutputFormat) -> Result<()> {
    let chord = Chord::parse(chord).with_context(|| format!("Invalid chord '{chord}'"))?;
    let service = ctx.service().await?;

    let outcome = service
        .dispatch_chord(&chord, ctx.owner())
        .await
        .context("Failed to dispatch chord")?;

    let display = chord.display_string();
    let (result, message) = match outcome {
        DispatchOutcome::Invoked { action_id } => {
            let name = service.actions().name_of(&action_id).map(str::to_string);
            let message = format!(
                "Ran {} ({})",
                action_id,
                name.as_deref().unwrap_or_default()
            );
            (
                DispatchResult {
                    chord: display,
                    outcome: "invoked",
                    action_id: Some(action_id),
                    name,
                },
                message,
            )
        }
        DispatchOutcome::Unmatched => {
            let message = format!("No macro bound to {display}");
            (
                DispatchResult {
                    chord: display,
                    outcome: "unmatched",
                    action_id: None,
                    name: None,
                },
                message,
            )
        }
        DispatchOutcome::StaleEvicted { action_id } => {
            let message = format!("Macro {action_id} no longer exists; removed its binding");
            (
                DispatchResult {
                    chord: display,
                    outcome: "staleEvicted",
                    action_id: Some(action_id),
                    name: None,
                },
                message,
            )
        }
    };

    print!("{}", format_message(&result, &message, format)?);
    Ok(())
}
