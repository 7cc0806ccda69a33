//! Keybind service: the operations hosts call.
//!
//! Responsibilities:
//! - Capture a chord for an existing action (resolve conflicts, persist) or
//!   hold it as pending for an action still being created.
//! - Reconcile pending chords when an action is created.
//! - Follow action renames and deletions.
//! - Dispatch an observed chord to its action, lazily evicting stale bindings.
//!
//! Does NOT handle:
//! - Input event tracking (see `recorder`).
//! - Host default hotbar suppression (see `hotbar`).
//!
//! Invariants:
//! - Reconciliation removes its pending chord from the buffer before the
//!   first await, so a chord is promoted at most once.
//! - Persistence is last-writer-wins per owner: each mutation loads, modifies
//!   and saves, and two interleaved captures for one owner may overwrite each
//!   other. The last write for an action id always wins.
//! - A failed save is returned once as `KeybindError::Storage` and never
//!   retried here.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use macro_keybinds_config::PendingConfig;

use crate::chord::{Chord, RawChord};
use crate::dispatch::{ActionRegistry, resolve};
use crate::error::{KeybindError, Result};
use crate::model::Binding;
use crate::pending::{CaptureToken, PendingBuffer};
use crate::repository::MacroRepository;
use crate::resolver::ApplyOutcome;
use crate::storage::SettingsStorage;
use crate::store::{BindingStore, validate_action_id};

/// Where a captured chord ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureStatus {
    /// Bound to an existing action and persisted.
    Bound { action_id: String },
    /// Held until the action for this token is created.
    Pending { token: CaptureToken },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureOutcome {
    pub chord: Chord,
    pub status: CaptureStatus,
    /// Actions that lost this chord, for user notification.
    pub evicted: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    Invoked { action_id: String },
    /// No binding for this chord; nothing happened.
    Unmatched,
    /// The bound action no longer exists; its binding was removed.
    StaleEvicted { action_id: String },
}

/// Changes made by `sync_with_repository`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub removed: Vec<String>,
    pub relabelled: Vec<String>,
}

impl SyncReport {
    pub fn is_empty(&self) -> bool {
        self.removed.is_empty() && self.relabelled.is_empty()
    }
}

/// Keybind registry over a settings store, a macro repository and an
/// action registry.
pub struct KeybindService<S, R, A> {
    storage: Arc<S>,
    repository: R,
    actions: A,
    pending: PendingBuffer,
}

impl<S, R, A> KeybindService<S, R, A>
where
    S: SettingsStorage,
    R: MacroRepository,
    A: ActionRegistry,
{
    pub fn new(storage: Arc<S>, repository: R, actions: A, pending: PendingConfig) -> Self {
        Self {
            storage,
            repository,
            actions,
            pending: PendingBuffer::new(pending),
        }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    pub fn actions(&self) -> &A {
        &self.actions
    }

    fn store(&self, owner: &str) -> BindingStore<S> {
        BindingStore::new(Arc::clone(&self.storage), owner)
    }

    /// Capture `raw` for `target`, or for the creation form `token`.
    ///
    /// - Existing target: conflicting bindings are evicted and the set saved.
    /// - Unknown or absent target with a token: the chord is held pending.
    /// - Unknown target without a token: `ActionNotFound`.
    /// - Neither target nor token: `MissingCaptureTarget`.
    pub async fn capture_chord(
        &self,
        owner: &str,
        target: Option<&str>,
        token: Option<&CaptureToken>,
        raw: &RawChord,
    ) -> Result<CaptureOutcome> {
        let chord = raw.normalize();

        if let Some(action_id) = target {
            validate_action_id(action_id)?;

            if let Some(entity) = self.repository.get(action_id).await? {
                let binding = Binding::new(action_id, chord.clone(), owner, entity.name);
                let outcome = self.store(owner).apply(binding).await?;
                if let Some(token) = token {
                    self.pending.clear(token);
                }

                tracing::info!(
                    owner = %owner,
                    action_id = %action_id,
                    chord = %chord,
                    evicted = outcome.evicted.len(),
                    "Chord bound"
                );
                return Ok(CaptureOutcome {
                    chord,
                    status: CaptureStatus::Bound {
                        action_id: action_id.to_string(),
                    },
                    evicted: outcome.evicted,
                });
            }

            if token.is_none() {
                return Err(KeybindError::ActionNotFound {
                    action_id: action_id.to_string(),
                });
            }
        }

        let Some(token) = token else {
            return Err(KeybindError::MissingCaptureTarget);
        };

        self.pending.capture(token.clone(), chord.clone(), owner);
        Ok(CaptureOutcome {
            chord,
            status: CaptureStatus::Pending {
                token: token.clone(),
            },
            evicted: Vec::new(),
        })
    }

    /// Handle the deletion keystroke. Returns whether anything was removed.
    pub async fn clear_chord(
        &self,
        owner: &str,
        target: Option<&str>,
        token: Option<&CaptureToken>,
    ) -> Result<bool> {
        let cleared_pending = token.is_some_and(|token| self.pending.clear(token));

        match target {
            Some(action_id) => {
                let removed = self.store(owner).remove_binding(action_id).await?;
                Ok(removed || cleared_pending)
            }
            None if token.is_some() => Ok(cleared_pending),
            None => Err(KeybindError::MissingCaptureTarget),
        }
    }

    /// Attach a pending chord to the action that was just created.
    ///
    /// Prefers the chord captured under `token`; otherwise takes the most
    /// recent live chord of `owner`. Returns `None` when nothing was pending.
    pub async fn reconcile_on_create(
        &self,
        token: Option<&CaptureToken>,
        action_id: &str,
        label: &str,
        owner: &str,
    ) -> Result<Option<ApplyOutcome>> {
        validate_action_id(action_id)?;

        let taken = self
            .pending
            .reconcile_token_at(token, action_id, label, owner, Instant::now());

        let Some(binding) = taken else {
            tracing::debug!(action_id = %action_id, "No pending chord to reconcile");
            return Ok(None);
        };

        let outcome = self.store(owner).apply(binding).await?;
        tracing::info!(owner = %owner, action_id = %action_id, "Pending chord bound to new action");
        Ok(Some(outcome))
    }

    /// Keep the stored label in step with the action's new name.
    pub async fn on_rename(&self, owner: &str, action_id: &str, new_label: &str) -> Result<bool> {
        self.store(owner).rename_action(action_id, new_label).await
    }

    /// Drop the binding of a deleted action.
    pub async fn on_delete(&self, owner: &str, action_id: &str) -> Result<bool> {
        self.store(owner).remove_binding(action_id).await
    }

    pub async fn dispatch(&self, raw: &RawChord, owner: &str) -> Result<DispatchOutcome> {
        self.dispatch_chord(&raw.normalize(), owner).await
    }

    /// Invoke the action bound to `chord`, if any.
    ///
    /// A binding whose action is gone is evicted and reported as
    /// `StaleEvicted` rather than as an error.
    pub async fn dispatch_chord(&self, chord: &Chord, owner: &str) -> Result<DispatchOutcome> {
        let store = self.store(owner);
        let set = store.load().await?;

        let Some(action_id) = resolve(chord, &set, owner).map(str::to_string) else {
            return Ok(DispatchOutcome::Unmatched);
        };

        match self.actions.invoke(&action_id) {
            Ok(()) => {
                tracing::debug!(action_id = %action_id, chord = %chord, "Dispatched chord");
                Ok(DispatchOutcome::Invoked { action_id })
            }
            Err(KeybindError::ActionNotFound { .. }) => {
                tracing::info!(action_id = %action_id, "Evicting binding of missing action");
                if let Err(e) = store.remove_binding(&action_id).await {
                    tracing::warn!(action_id = %action_id, error = %e, "Failed to evict stale binding");
                }
                Ok(DispatchOutcome::StaleEvicted { action_id })
            }
            Err(e) => Err(e),
        }
    }

    /// Drop bindings of vanished actions and refresh labels from the
    /// repository. Saves only when something changed.
    pub async fn sync_with_repository(&self, owner: &str) -> Result<SyncReport> {
        let names: BTreeMap<String, String> = self
            .repository
            .list()
            .await?
            .into_iter()
            .map(|entity| (entity.id, entity.name))
            .collect();

        let store = self.store(owner);
        let mut set = store.load().await?;
        let mut report = SyncReport::default();

        let stale: Vec<String> = set
            .iter()
            .filter(|binding| !names.contains_key(&binding.action_id))
            .map(|binding| binding.action_id.clone())
            .collect();
        for action_id in stale {
            set.remove(&action_id);
            report.removed.push(action_id);
        }

        for (action_id, name) in &names {
            if set.rename(action_id, name) {
                report.relabelled.push(action_id.clone());
            }
        }

        if !report.is_empty() {
            store.save(&set).await?;
            tracing::info!(
                owner = %owner,
                removed = report.removed.len(),
                relabelled = report.relabelled.len(),
                "Bindings synced with repository"
            );
        }
        Ok(report)
    }

    /// The owner's bindings in action id order.
    pub async fn bindings(&self, owner: &str) -> Result<Vec<Binding>> {
        let set = self.store(owner).load().await?;
        Ok(set.iter().cloned().collect())
    }

    /// The live pending chord for `token`, if any.
    pub fn pending_chord(&self, token: &CaptureToken) -> Option<Chord> {
        self.pending
            .get_at(token, Instant::now())
            .map(|pending| pending.chord)
    }
}
