//! Conflict resolution: at most one binding per chord per owner.

use crate::model::{Binding, BindingSet};

/// Result of applying a binding to a set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyOutcome {
    pub set: BindingSet,
    /// Action ids whose bindings were evicted, in action id order.
    pub evicted: Vec<String>,
}

/// Evict every binding of the same owner that holds an equal chord under a
/// different action id, then upsert `binding`.
///
/// Eviction is unconditional. Re-applying a binding an action already holds
/// evicts nothing and leaves the set unchanged.
pub fn apply_binding(mut set: BindingSet, binding: Binding) -> ApplyOutcome {
    let evicted: Vec<String> = set
        .iter()
        .filter(|existing| {
            existing.action_id != binding.action_id
                && existing.owner_id == binding.owner_id
                && existing.chord == binding.chord
        })
        .map(|existing| existing.action_id.clone())
        .collect();

    for action_id in &evicted {
        set.remove(action_id);
    }

    if !evicted.is_empty() {
        tracing::info!(
            action_id = %binding.action_id,
            chord = %binding.chord,
            evicted = ?evicted,
            "Evicted conflicting bindings"
        );
    }

    set.upsert(binding);
    ApplyOutcome { set, evicted }
}
