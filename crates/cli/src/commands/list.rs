//! List stored bindings.

use anyhow::{Context, Result};

use crate::context::CommandContext;
use crate::output::{OutputFormat, format_bindings};

pub async fn run(ctx: &CommandContext, format: OutputFormat) -> Result<()> {
    let service = ctx.service().await?;
    let bindings = service
        .bindings(ctx.owner())
        .await
        .context("Failed to load bindings")?;

    print!("{}", format_bindings(&bindings, format)?);
    Ok(())
}
