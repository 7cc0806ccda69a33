//! Bind and unbind commands.

use anyhow::{Context, Result};
use serde::Serialize;

use super::parse_chord;
use crate::context::CommandContext;
use crate::output::{OutputFormat, format_message};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BindResult<'a> {
    action_id: &'a str,
    chord: String,
    evicted: Vec<String>,
}

pub async fn run_bind(
    ctx: &CommandContext,
    action_id: &str,
    chord: &str,
    format: OutputFormat,
) -> Result<()> {
    let raw = parse_chord(chord)?;
    let service = ctx.service().await?;

    let outcome = service
        .capture_chord(ctx.owner(), Some(action_id), None, &raw)
        .await
        .with_context(|| format!("Failed to bind {chord} to {action_id}"))?;

    let result = BindResult {
        action_id,
        chord: outcome.chord.display_string(),
        evicted: outcome.evicted,
    };

    let mut message = format!("Bound {} to {}", result.chord, action_id);
    for evicted in &result.evicted {
        message.push_str(&format!("\nRemoved chord from {evicted}"));
    }
    print!("{}", format_message(&result, &message, format)?);
    Ok(())
}

pub async fn run_unbind(ctx: &CommandContext, action_id: &str) -> Result<()> {
    let service = ctx.service().await?;
    let removed = service
        .clear_chord(ctx.owner(), Some(action_id), None)
        .await
        .with_context(|| format!("Failed to unbind {action_id}"))?;

    if removed {
        println!("Removed chord from {action_id}");
    } else {
        println!("{action_id} has no chord");
    }
    Ok(())
}
