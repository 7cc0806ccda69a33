//! Dispatch resolution: observed chord to action id.

use crate::chord::Chord;
use crate::error::Result;
use crate::model::BindingSet;

/// Executes actions by id.
pub trait ActionRegistry: Send + Sync {
    /// Run the action. Fails with `KeybindError::ActionNotFound` when the
    /// registry no longer knows `action_id`.
    fn invoke(&self, action_id: &str) -> Result<()>;
}

/// Find the action `owner_id` bound to `observed`.
///
/// Entries of other owners never match. An empty set simply has no match.
pub fn resolve<'a>(observed: &Chord, set: &'a BindingSet, owner_id: &str) -> Option<&'a str> {
    set.iter()
        .find(|binding| binding.owner_id == owner_id && binding.chord == *observed)
        .map(|binding| binding.action_id.as_str())
}
