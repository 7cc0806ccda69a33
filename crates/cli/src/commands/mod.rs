//! CLI command implementations.

pub mod bind;
pub mod dispatch;
pub mod hotbar;
pub mod list;
pub mod macros;
pub mod normalize;
pub mod sync;

use anyhow::{Context, Result};
use macro_keybinds_core::{Chord, RawChord};

/// Parse chord text into the raw form the capture path expects.
pub(crate) fn parse_chord(text: &str) -> Result<RawChord> {
    let chord = Chord::parse(text).with_context(|| format!("Invalid chord '{text}'"))?;
    Ok(RawChord::from(&chord))
}
