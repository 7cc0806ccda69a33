//! Chord capture from raw key events.
//!
//! Responsibilities:
//! - Track which modifier keys are held between key-down and key-up events.
//! - Turn a key-down of a non-modifier key into a `RawChord`.
//! - Recognise the deletion keystroke (`Delete` / `Backspace`).
//!
//! Does NOT handle:
//! - Listener attachment or focus policy. Hosts call `reset` on focus loss.
//! - Normalization (the recorder hands out raw chords).

use std::collections::BTreeSet;

use crate::chord::RawChord;

/// Physical codes of modifier keys.
pub const MODIFIER_CODES: [&str; 10] = [
    "AltLeft",
    "AltRight",
    "ControlLeft",
    "ControlRight",
    "MetaLeft",
    "MetaRight",
    "ShiftLeft",
    "ShiftRight",
    "OSLeft",
    "OSRight",
];

/// Codes that clear the chord instead of capturing it.
pub const CLEAR_CODES: [&str; 2] = ["Delete", "Backspace"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEventKind {
    Down,
    Up,
}

/// One raw keyboard event from the input surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    /// Physical key code (`KeyC`, `ShiftLeft`).
    pub code: String,
    /// Logical key produced (`c`, `!`), when known.
    pub key: Option<String>,
    pub kind: KeyEventKind,
}

impl KeyEvent {
    pub fn down(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            key: None,
            kind: KeyEventKind::Down,
        }
    }

    pub fn up(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            key: None,
            kind: KeyEventKind::Up,
        }
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecorderOutcome {
    /// A complete chord was pressed.
    Captured(RawChord),
    /// The deletion keystroke was pressed.
    Cleared,
    /// Nothing to report.
    Idle,
}

/// Stateful recorder fed by key events.
#[derive(Debug, Default)]
pub struct ChordRecorder {
    held: BTreeSet<String>,
}

impl ChordRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_modifier(code: &str) -> bool {
        MODIFIER_CODES.contains(&code)
    }

    /// Modifier codes currently held.
    pub fn held(&self) -> impl Iterator<Item = &str> {
        self.held.iter().map(String::as_str)
    }

    pub fn on_event(&mut self, event: KeyEvent) -> RecorderOutcome {
        let is_modifier = Self::is_modifier(&event.code);

        match event.kind {
            KeyEventKind::Up => {
                if is_modifier {
                    self.held.remove(&event.code);
                }
                RecorderOutcome::Idle
            }
            KeyEventKind::Down if is_modifier => {
                self.held.insert(event.code);
                RecorderOutcome::Idle
            }
            KeyEventKind::Down if CLEAR_CODES.contains(&event.code.as_str()) => {
                RecorderOutcome::Cleared
            }
            KeyEventKind::Down => {
                // Only printable single characters are worth keeping as a
                // display label; named keys and the `+` separator display
                // from their code.
                let key = event.key.filter(|k| {
                    k.chars().count() == 1 && !k.trim().is_empty() && k.as_str() != "+"
                });
                RecorderOutcome::Captured(RawChord {
                    code: event.code,
                    key,
                    modifiers: self.held.iter().cloned().collect(),
                })
            }
        }
    }

    /// Forget every held modifier.
    pub fn reset(&mut self) {
        self.held.clear();
    }
}
