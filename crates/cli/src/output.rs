//! Output formatting for CLI commands.
//!
//! Responsibilities:
//! - Render bindings, macros and command results as tab-separated tables or JSON.
//!
//! Does NOT handle:
//! - Printing (callers print the returned string).
//!
//! Invariants:
//! - JSON output is always valid JSON, `[]` for empty lists.
//! - Table output for an empty list is a human message.

use anyhow::Result;
use macro_keybinds_core::{Binding, MacroEntity};
use serde::Serialize;

use crate::error::CliError;

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Table,
}

impl OutputFormat {
    /// Parse from string.
    pub fn from_str(s: &str) -> Result<Self, CliError> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "table" => Ok(OutputFormat::Table),
            _ => Err(CliError::InvalidOutputFormat(s.to_string())),
        }
    }
}

/// Serializable view of a stored binding.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BindingRow {
    pub action_id: String,
    pub label: String,
    pub display_string: String,
    pub key: String,
    pub modifiers: Vec<String>,
    pub owner_id: String,
}

impl From<&Binding> for BindingRow {
    fn from(binding: &Binding) -> Self {
        Self {
            action_id: binding.action_id.clone(),
            label: binding.label.clone(),
            display_string: binding.chord.display_string(),
            key: binding.chord.key().to_string(),
            modifiers: binding
                .chord
                .modifiers()
                .iter()
                .map(|m| m.as_str().to_string())
                .collect(),
            owner_id: binding.owner_id.clone(),
        }
    }
}

pub fn format_bindings(bindings: &[Binding], format: OutputFormat) -> Result<String> {
    let rows: Vec<BindingRow> = bindings.iter().map(BindingRow::from).collect();
    match format {
        OutputFormat::Json => json(&rows),
        OutputFormat::Table => {
            if rows.is_empty() {
                return Ok("No bindings found.\n".to_string());
            }
            let mut out = String::from("Action\tLabel\tChord\n");
            for row in &rows {
                out.push_str(&format!(
                    "{}\t{}\t{}\n",
                    row.action_id, row.label, row.display_string
                ));
            }
            Ok(out)
        }
    }
}

pub fn format_macros(macros: &[MacroEntity], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => json(macros),
        OutputFormat::Table => {
            if macros.is_empty() {
                return Ok("No macros found.\n".to_string());
            }
            let mut out = String::from("Id\tName\n");
            for entity in macros {
                out.push_str(&format!("{}\t{}\n", entity.id, entity.name));
            }
            Ok(out)
        }
    }
}

/// Render a command result: JSON as-is, or the table message.
pub fn format_message<T: Serialize>(value: &T, message: &str, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => json(value),
        OutputFormat::Table => Ok(format!("{message}\n")),
    }
}

fn json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(format!("{}\n", serde_json::to_string_pretty(value)?))
}
