//! Bindings and the per-owner binding set.
//!
//! Responsibilities:
//! - Define `Binding` and `BindingSet` (the unit of persistence).
//! - Validate loosely typed stored JSON into a typed `BindingSet` at the
//!   storage boundary, so nothing downstream re-checks shape.
//!
//! Does NOT handle:
//! - Chord uniqueness (see `resolver`).
//! - Reading or writing the backing store (see `store`).
//!
//! Invariants:
//! - Only a top-level non-object value is `MalformedStorage`; individual
//!   entries that fail validation are skipped with a warning.
//! - Unknown extra fields on stored entries are ignored.
//! - Iteration order is deterministic (by action id).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::chord::{Chord, ModifierTag, normalize_chord};
use crate::error::KeybindError;

/// Association of one chord with one action for one owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub action_id: String,
    pub chord: Chord,
    pub owner_id: String,
    pub label: String,
}

impl Binding {
    pub fn new(
        action_id: impl Into<String>,
        chord: Chord,
        owner_id: impl Into<String>,
        label: impl Into<String>,
    ) -> Self {
        Self {
            action_id: action_id.into(),
            chord,
            owner_id: owner_id.into(),
            label: label.into(),
        }
    }
}

/// Persisted shape of a single binding.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredBinding {
    key: String,
    #[serde(default)]
    modifiers: Vec<String>,
    #[serde(default, alias = "keybind", skip_serializing_if = "Option::is_none")]
    display_string: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    key_label: Option<String>,
    #[serde(default, alias = "userId")]
    owner_id: Option<String>,
    #[serde(default, alias = "name")]
    label: String,
}

impl From<&Binding> for StoredBinding {
    fn from(binding: &Binding) -> Self {
        Self {
            key: binding.chord.key().to_string(),
            modifiers: binding
                .chord
                .modifiers()
                .iter()
                .map(ModifierTag::as_str)
                .map(str::to_string)
                .collect(),
            display_string: Some(binding.chord.display_string()),
            key_label: binding.chord.key_label().map(str::to_string),
            owner_id: Some(binding.owner_id.clone()),
            label: binding.label.clone(),
        }
    }
}

/// Full `action id -> Binding` mapping for one owner.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BindingSet {
    entries: BTreeMap<String, Binding>,
}

impl BindingSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, action_id: &str) -> Option<&Binding> {
        self.entries.get(action_id)
    }

    pub fn contains(&self, action_id: &str) -> bool {
        self.entries.contains_key(action_id)
    }

    /// Bindings in action id order.
    pub fn iter(&self) -> impl Iterator<Item = &Binding> {
        self.entries.values()
    }

    /// Insert or replace the binding for `binding.action_id`.
    ///
    /// Does not enforce chord uniqueness; route through `apply_binding` first.
    pub fn upsert(&mut self, binding: Binding) -> Option<Binding> {
        self.entries.insert(binding.action_id.clone(), binding)
    }

    /// Remove the binding for `action_id`; absent ids are a no-op.
    pub fn remove(&mut self, action_id: &str) -> Option<Binding> {
        self.entries.remove(action_id)
    }

    /// Update the label of an existing binding. Returns whether anything changed.
    pub fn rename(&mut self, action_id: &str, new_label: &str) -> bool {
        match self.entries.get_mut(action_id) {
            Some(binding) if binding.label != new_label => {
                binding.label = new_label.to_string();
                true
            }
            _ => false,
        }
    }

    /// Keep only bindings for which `keep` returns true.
    pub fn retain(&mut self, mut keep: impl FnMut(&Binding) -> bool) {
        self.entries.retain(|_, binding| keep(binding));
    }

    /// Serialize to the persisted JSON object form.
    pub fn to_value(&self) -> Value {
        let map: Map<String, Value> = self
            .entries
            .iter()
            .filter_map(|(id, binding)| {
                serde_json::to_value(StoredBinding::from(binding))
                    .ok()
                    .map(|value| (id.clone(), value))
            })
            .collect();
        Value::Object(map)
    }

    /// Validate persisted JSON into a typed set.
    ///
    /// Every entry belongs to `owner`, the owner the set is stored under; an
    /// entry naming a different owner is re-attributed with a warning.
    /// Entries that cannot be read as a binding are skipped.
    pub fn from_value(value: Value, owner: &str) -> Result<Self, KeybindError> {
        let Value::Object(map) = value else {
            return Err(KeybindError::MalformedStorage);
        };

        let mut set = Self::new();
        for (action_id, raw) in map {
            if action_id.trim().is_empty() {
                tracing::warn!("Skipping stored binding with blank action id");
                continue;
            }

            let stored: StoredBinding = match serde_json::from_value(raw) {
                Ok(stored) => stored,
                Err(e) => {
                    tracing::warn!(action_id = %action_id, error = %e, "Skipping unreadable stored binding");
                    continue;
                }
            };

            if stored.key.trim().is_empty() {
                tracing::warn!(action_id = %action_id, "Skipping stored binding without a key");
                continue;
            }

            let chord = normalize_chord(&stored.key, &stored.modifiers, stored.key_label.as_deref());
            if let Some(stored_owner) = stored.owner_id.as_deref()
                && !stored_owner.trim().is_empty()
                && stored_owner != owner
            {
                tracing::warn!(
                    action_id = %action_id,
                    stored_owner = %stored_owner,
                    owner = %owner,
                    "Re-attributing stored binding to the owner of its set"
                );
            }

            set.upsert(Binding {
                action_id,
                chord,
                owner_id: owner.to_string(),
                label: stored.label,
            });
        }

        Ok(set)
    }
}

impl FromIterator<Binding> for BindingSet {
    fn from_iter<T: IntoIterator<Item = Binding>>(iter: T) -> Self {
        let mut set = Self::new();
        for binding in iter {
            set.upsert(binding);
        }
        set
    }
}
