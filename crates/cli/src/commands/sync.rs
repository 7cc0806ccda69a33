//! Sync bindings with the macro catalog.

use anyhow::{Context, Result};
use serde::Serialize;

use crate::context::CommandContext;
use crate::output::{OutputFormat, format_message};

#[derive(Serialize)]
struct SyncResult {
    removed: Vec<String>,
    relabelled: Vec<String>,
}

pub async fn run(ctx: &CommandContext, format: OutputFormat) -> Result<()> {
    let service = ctx.service().await?;
    let report = service
        .sync_with_repository(ctx.owner())
        .await
        .context("Failed to sync bindings")?;

    let message = if report.is_empty() {
        "Bindings already in sync".to_string()
    } else {
        format!(
            "Removed {} stale binding(s), refreshed {} label(s)",
            report.removed.len(),
            report.relabelled.len()
        )
    };

    let result = SyncResult {
        removed: report.removed,
        relabelled: report.relabelled,
    };
    print!("{}", format_message(&result, &message, format)?);
    Ok(())
}
