//! Binding store: the persisted copy of one owner's binding set.
//!
//! Responsibilities:
//! - Load the binding set, self-healing absent or malformed data.
//! - Persist the full set after every mutation.
//! - Provide the single mutation path (`set_binding`, `remove_binding`,
//!   `rename_action`, `apply`).
//!
//! Does NOT handle:
//! - Pending chords (see `pending`).
//! - Retrying failed saves. A failed save is reported once to the caller.
//!
//! Invariants:
//! - Action ids are validated before any load or save.
//! - Each mutation is load, modify, save. Concurrent mutations for the same
//!   owner are last-writer-wins; the storage backend decides write ordering.

use std::sync::Arc;

use macro_keybinds_config::constants::{SETTINGS_NAMESPACE, USER_KEYBINDS_KEY};

use crate::chord::Chord;
use crate::error::{KeybindError, Result};
use crate::model::{Binding, BindingSet};
use crate::resolver::{ApplyOutcome, apply_binding};
use crate::storage::SettingsStorage;

/// Identifiers that hosts use as "no action" placeholders.
const SENTINEL_ACTION_IDS: [&str; 2] = ["null", "undefined"];

/// Reject empty or sentinel action identifiers.
pub(crate) fn validate_action_id(action_id: &str) -> Result<()> {
    let trimmed = action_id.trim();
    if trimmed.is_empty() || SENTINEL_ACTION_IDS.contains(&trimmed) {
        tracing::warn!(action_id = %action_id, "Rejected invalid action id");
        return Err(KeybindError::InvalidActionId {
            action_id: action_id.to_string(),
        });
    }
    Ok(())
}

/// Settings key holding `owner`'s binding set.
pub fn storage_key(owner: &str) -> String {
    format!("{SETTINGS_NAMESPACE}.{USER_KEYBINDS_KEY}.{owner}")
}

/// Persisted binding set of one owner.
#[derive(Debug)]
pub struct BindingStore<S> {
    storage: Arc<S>,
    owner: String,
    key: String,
}

impl<S: SettingsStorage> BindingStore<S> {
    pub fn new(storage: Arc<S>, owner: impl Into<String>) -> Self {
        let owner = owner.into();
        let key = storage_key(&owner);
        Self {
            storage,
            owner,
            key,
        }
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Read the persisted set.
    ///
    /// Absent or malformed data yields an empty set, which is written back
    /// immediately. A failed write-back is logged and the empty set is still
    /// returned.
    pub async fn load(&self) -> Result<BindingSet> {
        let stored = self.storage.get(&self.key).await?;

        let reason = match stored {
            Some(value) => match BindingSet::from_value(value, &self.owner) {
                Ok(set) => return Ok(set),
                Err(e) => e.to_string(),
            },
            None => "no stored binding set".to_string(),
        };

        tracing::warn!(owner = %self.owner, reason = %reason, "Resetting binding set to empty");
        let empty = BindingSet::new();
        if let Err(e) = self.save(&empty).await {
            tracing::error!(owner = %self.owner, error = %e, "Failed to persist reset binding set");
        }
        Ok(empty)
    }

    /// Persist the full set, replacing what was stored.
    pub async fn save(&self, set: &BindingSet) -> Result<()> {
        self.storage.set(&self.key, set.to_value()).await?;
        tracing::debug!(owner = %self.owner, bindings = set.len(), "Binding set saved");
        Ok(())
    }

    /// Upsert one binding owned by this store's owner. Does not evict conflicts.
    pub async fn set_binding(&self, action_id: &str, chord: Chord, label: &str) -> Result<()> {
        validate_action_id(action_id)?;
        let mut set = self.load().await?;
        set.upsert(Binding::new(action_id, chord, self.owner.clone(), label));
        self.save(&set).await
    }

    /// Delete the binding for `action_id`. Returns whether one existed.
    pub async fn remove_binding(&self, action_id: &str) -> Result<bool> {
        validate_action_id(action_id)?;
        let mut set = self.load().await?;
        if set.remove(action_id).is_none() {
            return Ok(false);
        }
        self.save(&set).await?;
        Ok(true)
    }

    /// Update the label of an existing binding. Returns whether anything changed.
    pub async fn rename_action(&self, action_id: &str, new_label: &str) -> Result<bool> {
        validate_action_id(action_id)?;
        let mut set = self.load().await?;
        if !set.rename(action_id, new_label) {
            return Ok(false);
        }
        self.save(&set).await?;
        Ok(true)
    }

    /// Run the conflict resolver for `binding` and persist the result.
    pub async fn apply(&self, binding: Binding) -> Result<ApplyOutcome> {
        validate_action_id(&binding.action_id)?;
        let set = self.load().await?;
        let outcome = apply_binding(set, binding);
        self.save(&outcome.set).await?;
        Ok(outcome)
    }
}
