//! Show the canonical form of a chord.

use anyhow::{Context, Result};
use macro_keybinds_core::Chord;
use serde::Serialize;

use crate::output::{OutputFormat, format_message};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct NormalizedChord {
    key: String,
    modifiers: Vec<String>,
    display_string: String,
}

pub fn run(chord: &str, format: OutputFormat) -> Result<()> {
    let chord = Chord::parse(chord).with_context(|| format!("Invalid chord '{chord}'"))?;

    let normalized = NormalizedChord {
        key: chord.key().to_string(),
        modifiers: chord
            .modifiers()
            .iter()
            .map(|m| m.as_str().to_string())
            .collect(),
        display_string: chord.display_string(),
    };

    let message = format!("{} (key {})", normalized.display_string, normalized.key);
    print!("{}", format_message(&normalized, &message, format)?);
    Ok(())
}
