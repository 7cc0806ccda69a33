//! Default hotbar suppression.
//!
//! The CLI has no live host, so its host adapter records which default
//! hotbar chords are suppressed under a settings key that a host reads on
//! startup.

use std::cell::RefCell;
use std::collections::BTreeSet;

use anyhow::{Context, Result};
use macro_keybinds_config::constants::SETTINGS_NAMESPACE;
use macro_keybinds_core::{Chord, HostAdapter, HostError, SettingsStorage, apply_hotbar_policy};
use serde::Serialize;
use serde_json::Value;

use crate::context::CommandContext;
use crate::output::{OutputFormat, format_message};

pub fn suppressed_key() -> String {
    format!("{SETTINGS_NAMESPACE}.suppressedHotbar")
}

/// Host adapter that tracks suppressed chords by display string.
#[derive(Debug, Default)]
struct RecordedHost {
    suppressed: RefCell<BTreeSet<String>>,
}

impl HostAdapter for RecordedHost {
    fn suppress_default(&self, chord: &Chord) -> Result<(), HostError> {
        self.suppressed.borrow_mut().insert(chord.display_string());
        Ok(())
    }

    fn restore_default(&self, chord: &Chord) -> Result<(), HostError> {
        self.suppressed.borrow_mut().remove(&chord.display_string());
        Ok(())
    }
}

#[derive(Serialize)]
struct HotbarResult {
    disabled: bool,
    suppressed: Vec<String>,
    failed: Vec<String>,
}

pub async fn run(
    ctx: &CommandContext,
    disable: bool,
    enable: bool,
    format: OutputFormat,
) -> Result<()> {
    let disable = match (disable, enable) {
        (true, _) => true,
        (_, true) => false,
        _ => ctx.config.disable_default_hotbar,
    };

    let current: BTreeSet<String> = ctx
        .storage
        .get(&suppressed_key())
        .await
        .context("Failed to read hotbar settings")?
        .and_then(|value| serde_json::from_value(value).ok())
        .unwrap_or_default();

    let host = RecordedHost {
        suppressed: RefCell::new(current),
    };
    let report = apply_hotbar_policy(&host, disable);
    let suppressed: Vec<String> = host.suppressed.into_inner().into_iter().collect();

    let value = Value::from(suppressed.clone());
    ctx.storage
        .set(&suppressed_key(), value)
        .await
        .context("Failed to save hotbar settings")?;

    let message = if disable {
        format!(
            "Suppressed {} default hotbar key(s): {}",
            report.applied.len(),
            suppressed.join(" ")
        )
    } else {
        format!("Restored {} default hotbar key(s)", report.applied.len())
    };

    let result = HotbarResult {
        disabled: disable,
        suppressed,
        failed: report
            .failed
            .iter()
            .map(|(chord, _)| chord.display_string())
            .collect(),
    };
    print!("{}", format_message(&result, &message, format)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recorded_host_round_trip() {
        let host = RecordedHost::default();
        apply_hotbar_policy(&host, true);
        assert_eq!(host.suppressed.borrow().len(), 10);

        apply_hotbar_policy(&host, false);
        assert!(host.suppressed.borrow().is_empty());
    }
}
