//! Chord normalization.
//!
//! Responsibilities:
//! - Map device-specific modifier names onto the canonical `ModifierTag` set.
//! - Build canonical `Chord` values from raw key events or loosely typed stored data.
//! - Derive the display string (`SHIFT+C`) and parse it back.
//!
//! Does NOT handle:
//! - Tracking which modifiers are held (see `recorder`).
//! - Conflict detection (see `resolver`).
//!
//! Invariants:
//! - Normalization is a pure function of its inputs.
//! - The primary key is stored as a physical key code (`KeyC`, `Digit7`, `F5`);
//!   logical keys are converted only at the text boundary (`Chord::parse`).
//! - Two chords are equal iff their primary keys and modifier sets are equal.
//!   The logical key label only affects display.

use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Canonical modifier tag.
///
/// The derived ordering (ALT, CONTROL, SHIFT, META, then unrecognized tags
/// alphabetically) is the display order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ModifierTag {
    Alt,
    Control,
    Shift,
    Meta,
    /// An unrecognized modifier, kept uppercased rather than dropped.
    Other(String),
}

impl ModifierTag {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Alt => "ALT",
            Self::Control => "CONTROL",
            Self::Shift => "SHIFT",
            Self::Meta => "META",
            Self::Other(tag) => tag,
        }
    }

    /// Whether this is one of the four canonical tags.
    pub fn is_canonical(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl fmt::Display for ModifierTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ModifierTag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ModifierTag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(normalize_modifier(&raw))
    }
}

/// Map a raw modifier name onto its canonical tag.
///
/// Accepts key codes (`AltLeft`, `ControlRight`, `OSLeft`), side-qualified
/// names (`left-alt`, `control_right`) and common aliases (`ctrl`, `option`,
/// `command`, `os`). Anything else is passed through uppercased.
///
/// ```
/// use macro_keybinds_core::{ModifierTag, normalize_modifier};
///
/// assert_eq!(normalize_modifier("ctrl"), ModifierTag::Control);
/// assert_eq!(normalize_modifier("AltRight"), ModifierTag::Alt);
/// assert_eq!(normalize_modifier("hyper"), ModifierTag::Other("HYPER".to_string()));
/// ```
pub fn normalize_modifier(raw: &str) -> ModifierTag {
    let upper = raw.trim().to_uppercase();
    let compact: String = upper
        .chars()
        .filter(|c| !matches!(c, '-' | '_' | ' '))
        .collect();

    let base = compact
        .strip_suffix("LEFT")
        .or_else(|| compact.strip_suffix("RIGHT"))
        .or_else(|| compact.strip_prefix("LEFT"))
        .or_else(|| compact.strip_prefix("RIGHT"))
        .unwrap_or(&compact);

    match base {
        "ALT" | "OPTION" | "OPT" => ModifierTag::Alt,
        "CONTROL" | "CTRL" | "CTL" => ModifierTag::Control,
        "SHIFT" => ModifierTag::Shift,
        "META" | "COMMAND" | "CMD" | "OS" | "SUPER" | "WIN" => ModifierTag::Meta,
        _ => ModifierTag::Other(upper),
    }
}

/// Display form of a physical key code: `KeyC` -> `C`, `Digit7` -> `7`.
///
/// Codes without a known prefix display verbatim.
pub fn display_key(code: &str) -> &str {
    for prefix in ["Key", "Digit"] {
        if let Some(rest) = code.strip_prefix(prefix)
            && !rest.is_empty()
        {
            return rest;
        }
    }
    code
}

/// Convert a logical or loosely written key name into a physical key code.
///
/// Single letters and digits map to `KeyX` / `DigitN`. Prefixed codes and
/// named keys are matched without regard to case and rebuilt in canonical
/// casing (`keyc` -> `KeyC`, `numpad7` -> `Numpad7`, `pgup` -> `PageUp`).
/// Anything unrecognized passes through trimmed.
pub fn physical_code_for(key: &str) -> String {
    let key = key.trim();
    let mut chars = key.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        if c.is_ascii_alphabetic() {
            return format!("Key{}", c.to_ascii_uppercase());
        }
        if c.is_ascii_digit() {
            return format!("Digit{c}");
        }
    }

    let lower = key.to_ascii_lowercase();

    if let Some(rest) = lower.strip_prefix("key")
        && let [c] = rest.as_bytes()
        && c.is_ascii_alphabetic()
    {
        return format!("Key{}", c.to_ascii_uppercase() as char);
    }
    if let Some(rest) = lower.strip_prefix("digit")
        && let [c] = rest.as_bytes()
        && c.is_ascii_digit()
    {
        return format!("Digit{}", *c as char);
    }
    if let Some(rest) = lower.strip_prefix("numpad")
        && let Some(code) = numpad_code(rest)
    {
        return code;
    }
    if let Some(num) = lower.strip_prefix('f')
        && let Ok(n) = num.parse::<u8>()
        && (1..=24).contains(&n)
    {
        return format!("F{n}");
    }

    match lower.as_str() {
        "esc" | "escape" => "Escape",
        "enter" | "return" => "Enter",
        "space" | "spacebar" => "Space",
        "tab" => "Tab",
        "backspace" => "Backspace",
        "del" | "delete" => "Delete",
        "ins" | "insert" => "Insert",
        "home" => "Home",
        "end" => "End",
        "pageup" | "pgup" => "PageUp",
        "pagedown" | "pgdn" => "PageDown",
        "up" | "arrowup" => "ArrowUp",
        "down" | "arrowdown" => "ArrowDown",
        "left" | "arrowleft" => "ArrowLeft",
        "right" | "arrowright" => "ArrowRight",
        "equal" => "Equal",
        "minus" => "Minus",
        "comma" => "Comma",
        "period" => "Period",
        "slash" => "Slash",
        "backslash" => "Backslash",
        "semicolon" => "Semicolon",
        "quote" => "Quote",
        "backquote" => "Backquote",
        "bracketleft" => "BracketLeft",
        "bracketright" => "BracketRight",
        "capslock" => "CapsLock",
        _ => return key.to_string(),
    }
    .to_string()
}

fn numpad_code(rest: &str) -> Option<String> {
    if let [c] = rest.as_bytes()
        && c.is_ascii_digit()
    {
        return Some(format!("Numpad{}", *c as char));
    }

    let name = match rest {
        "add" => "Add",
        "subtract" => "Subtract",
        "multiply" => "Multiply",
        "divide" => "Divide",
        "decimal" => "Decimal",
        "enter" => "Enter",
        "equal" => "Equal",
        _ => return None,
    };
    Some(format!("Numpad{name}"))
}

/// Errors that can occur when parsing a chord from its text form.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ChordParseError {
    #[error("chord string is empty")]
    Empty,

    #[error("chord '{text}' has no primary key, only modifiers")]
    MissingKey { text: String },

    #[error("invalid chord syntax: '{text}'. Expected format like 'C', 'SHIFT+C', 'Ctrl+Alt+F5'")]
    InvalidSyntax { text: String },
}

/// Canonical key combination: one primary key plus a set of modifiers.
#[derive(Debug, Clone)]
pub struct Chord {
    key: String,
    modifiers: BTreeSet<ModifierTag>,
    key_label: Option<String>,
}

impl PartialEq for Chord {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key && self.modifiers == other.modifiers
    }
}

impl Eq for Chord {}

impl Hash for Chord {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
        self.modifiers.hash(state);
    }
}

impl Chord {
    /// Physical key code of the primary key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Canonical modifier set.
    pub fn modifiers(&self) -> &BTreeSet<ModifierTag> {
        &self.modifiers
    }

    /// Logical key label captured alongside the physical code, if any.
    pub fn key_label(&self) -> Option<&str> {
        self.key_label.as_deref()
    }

    /// Whether no modifier is part of the chord.
    pub fn is_bare(&self) -> bool {
        self.modifiers.is_empty()
    }

    /// Human-readable form, e.g. `SHIFT+C`.
    pub fn display_string(&self) -> String {
        let primary = self
            .key_label
            .as_deref()
            .unwrap_or_else(|| display_key(&self.key));

        self.modifiers
            .iter()
            .map(ModifierTag::as_str)
            .chain(std::iter::once(primary))
            .collect::<Vec<_>>()
            .join("+")
    }

    /// Parse a chord from text such as `SHIFT+C`, `ctrl+alt+KeyK` or `F5`.
    ///
    /// The last `+`-separated token is the primary key; every token before
    /// it is a modifier.
    ///
    /// ```
    /// use macro_keybinds_core::Chord;
    ///
    /// let chord = Chord::parse("shift+c").unwrap();
    /// assert_eq!(chord.key(), "KeyC");
    /// assert_eq!(chord.display_string(), "SHIFT+C");
    /// ```
    pub fn parse(text: &str) -> Result<Self, ChordParseError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ChordParseError::Empty);
        }

        let parts: Vec<&str> = text.split('+').map(str::trim).collect();
        if parts.iter().any(|p| p.is_empty()) {
            return Err(ChordParseError::InvalidSyntax {
                text: text.to_string(),
            });
        }

        let Some((key, modifiers)) = parts.split_last() else {
            return Err(ChordParseError::Empty);
        };

        if normalize_modifier(key).is_canonical() {
            return Err(ChordParseError::MissingKey {
                text: text.to_string(),
            });
        }

        // A second non-modifier token means two primary keys.
        if modifiers.iter().any(|m| !normalize_modifier(m).is_canonical()) {
            return Err(ChordParseError::InvalidSyntax {
                text: text.to_string(),
            });
        }

        Ok(normalize_chord(&physical_code_for(key), modifiers, None))
    }
}

impl fmt::Display for Chord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_string())
    }
}

/// Build a canonical chord from a raw key code, raw modifier names and an
/// optional logical key label.
///
/// Blank modifier entries are skipped; a non-blank label is uppercased and
/// takes display precedence over the physical code. A label containing the
/// `+` separator is dropped so the display string stays parseable.
pub fn normalize_chord<I, M>(raw_key: &str, raw_modifiers: I, key_label: Option<&str>) -> Chord
where
    I: IntoIterator<Item = M>,
    M: AsRef<str>,
{
    let modifiers = raw_modifiers
        .into_iter()
        .filter(|m| !m.as_ref().trim().is_empty())
        .map(|m| normalize_modifier(m.as_ref()))
        .collect();

    let key_label = key_label
        .map(str::trim)
        .filter(|label| !label.is_empty() && !label.contains('+'))
        .map(str::to_uppercase);

    Chord {
        key: raw_key.trim().to_string(),
        modifiers,
        key_label,
    }
}

/// A chord exactly as delivered by the input surface.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawChord {
    /// Physical key code (`KeyC`).
    pub code: String,
    /// Logical key label (`c`, `!`), if the surface supplied one.
    #[serde(default)]
    pub key: Option<String>,
    /// Raw modifier names or codes held when the key went down.
    #[serde(default)]
    pub modifiers: Vec<String>,
}

impl RawChord {
    pub fn new(code: impl Into<String>, modifiers: Vec<String>) -> Self {
        Self {
            code: code.into(),
            key: None,
            modifiers,
        }
    }

    /// Attach the logical key label.
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn normalize(&self) -> Chord {
        normalize_chord(&self.code, &self.modifiers, self.key.as_deref())
    }
}

impl From<&Chord> for RawChord {
    fn from(chord: &Chord) -> Self {
        Self {
            code: chord.key.clone(),
            key: chord.key_label.clone(),
            modifiers: chord
                .modifiers
                .iter()
                .map(|m| m.as_str().to_string())
                .collect(),
        }
    }
}
