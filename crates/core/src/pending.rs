//! Pending-binding buffer.
//!
//! Responsibilities:
//! - Hold chords captured for actions that do not exist yet, keyed by the
//!   capture token of the creation form.
//! - Promote the right pending chord to a `Binding` when an action is created.
//!
//! Does NOT handle:
//! - Persistence. Pending chords live in memory only and a restart drops them.
//! - Conflict resolution of the promoted binding (see `resolver`).
//!
//! Invariants:
//! - An entry is expired once `now - created_at > expiry`; expired entries
//!   are treated as absent on every read and purged lazily.
//! - The buffer never holds more than `capacity` entries; when full, expired
//!   entries go first, then the least recently used live entry.
//! - Every `*_at` method takes the clock as an argument so tests stay
//!   deterministic.

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use macro_keybinds_config::PendingConfig;
use moka::notification::RemovalCause;
use moka::policy::EvictionPolicy;
use moka::sync::Cache;
use serde::{Deserialize, Serialize};

use crate::chord::Chord;
use crate::model::Binding;

/// Identifies one in-progress creation form or session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CaptureToken(String);

impl CaptureToken {
    /// Fresh random token.
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for CaptureToken {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CaptureToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for CaptureToken {
    fn from(token: String) -> Self {
        Self(token)
    }
}

impl From<&str> for CaptureToken {
    fn from(token: &str) -> Self {
        Self(token.to_string())
    }
}

/// A chord waiting for its action to be created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingBinding {
    pub token: CaptureToken,
    pub chord: Chord,
    pub owner_id: String,
    pub created_at: Instant,
}

impl PendingBinding {
    pub fn is_expired_at(&self, now: Instant, expiry: Duration) -> bool {
        now.saturating_duration_since(self.created_at) > expiry
    }

    /// Attach this chord to a newly created action.
    pub fn into_binding(self, action_id: impl Into<String>, label: impl Into<String>) -> Binding {
        Binding::new(action_id, self.chord, self.owner_id, label)
    }
}

/// Bounded, time-evicted buffer of pending chords.
///
/// Backed by a `moka` cache with LRU eviction and a time-to-live of the
/// expiry window. `created_at` stays on each entry so reads can apply the
/// exact expiry boundary against a caller-supplied clock.
pub struct PendingBuffer {
    entries: Cache<CaptureToken, PendingBinding>,
    config: PendingConfig,
}

impl fmt::Debug for PendingBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingBuffer")
            .field("entries", &self.entries.entry_count())
            .field("config", &self.config)
            .finish()
    }
}

impl Default for PendingBuffer {
    fn default() -> Self {
        Self::new(PendingConfig::default())
    }
}

impl PendingBuffer {
    pub fn new(config: PendingConfig) -> Self {
        let entries = Cache::builder()
            .max_capacity(config.capacity as u64)
            .time_to_live(config.expiry)
            .eviction_policy(EvictionPolicy::lru())
            .eviction_listener(|token: Arc<CaptureToken>, _, cause| {
                if cause == RemovalCause::Size {
                    tracing::warn!(token = %token, "Pending buffer full; dropped oldest chord");
                }
            })
            .build();

        Self { entries, config }
    }

    pub fn expiry(&self) -> Duration {
        self.config.expiry
    }

    /// Number of entries held, expired ones included until purged.
    pub fn len(&self) -> usize {
        self.entries.run_pending_tasks();
        self.entries.entry_count() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capture(&self, token: CaptureToken, chord: Chord, owner_id: &str) {
        self.capture_at(token, chord, owner_id, Instant::now());
    }

    /// Store or overwrite the pending chord for `token`.
    ///
    /// When the buffer is full, expired entries are dropped first; the cache
    /// then evicts the least recently used live entry if still over capacity.
    pub fn capture_at(&self, token: CaptureToken, chord: Chord, owner_id: &str, now: Instant) {
        if !self.entries.contains_key(&token) && self.len() >= self.config.capacity {
            self.purge_expired_at(now);
        }

        tracing::debug!(token = %token, chord = %chord, owner = %owner_id, "Captured pending chord");
        self.entries.insert(
            token.clone(),
            PendingBinding {
                token,
                chord,
                owner_id: owner_id.to_string(),
                created_at: now,
            },
        );
        self.entries.run_pending_tasks();
    }

    /// Remove the pending chord for `token`. Returns whether one was held.
    pub fn clear(&self, token: &CaptureToken) -> bool {
        self.entries.remove(token).is_some()
    }

    /// The live pending chord for `token`, if any.
    pub fn get_at(&self, token: &CaptureToken, now: Instant) -> Option<PendingBinding> {
        self.entries
            .get(token)
            .filter(|pending| !pending.is_expired_at(now, self.config.expiry))
    }

    pub fn reconcile(&self, action_id: &str, label: &str, owner_id: &str) -> Option<Binding> {
        self.reconcile_at(action_id, label, owner_id, Instant::now())
    }

    /// Promote the most recent live pending chord of `owner_id` to a binding
    /// for the newly created action. Other entries stay pending.
    pub fn reconcile_at(
        &self,
        action_id: &str,
        label: &str,
        owner_id: &str,
        now: Instant,
    ) -> Option<Binding> {
        self.reconcile_token_at(None, action_id, label, owner_id, now)
    }

    /// Like `reconcile_at`, but prefer the entry captured under `token` when
    /// it is live and belongs to `owner_id`.
    ///
    /// The chosen entry is removed atomically, so a chord is promoted at most
    /// once even when two creations race for it.
    pub fn reconcile_token_at(
        &self,
        token: Option<&CaptureToken>,
        action_id: &str,
        label: &str,
        owner_id: &str,
        now: Instant,
    ) -> Option<Binding> {
        self.purge_expired_at(now);

        let preferred = token.filter(|t| {
            self.get_at(t, now)
                .is_some_and(|pending| pending.owner_id == owner_id)
        });

        let pending = match preferred.and_then(|t| self.entries.remove(t)) {
            Some(pending) => pending,
            None => self.take_most_recent(owner_id, now)?,
        };

        tracing::debug!(
            token = %pending.token,
            action_id = %action_id,
            chord = %pending.chord,
            "Reconciled pending chord"
        );
        Some(pending.into_binding(action_id, label))
    }

    fn take_most_recent(&self, owner_id: &str, now: Instant) -> Option<PendingBinding> {
        loop {
            let newest = self
                .entries
                .iter()
                .map(|(_, pending)| pending)
                .filter(|pending| {
                    pending.owner_id == owner_id && !pending.is_expired_at(now, self.config.expiry)
                })
                .max_by(|a, b| {
                    a.created_at
                        .cmp(&b.created_at)
                        .then_with(|| a.token.cmp(&b.token))
                })?;

            // Lost a race for this entry; pick again.
            if let Some(pending) = self.entries.remove(&newest.token) {
                return Some(pending);
            }
        }
    }

    /// Drop every expired entry. Returns how many were dropped.
    pub fn purge_expired_at(&self, now: Instant) -> usize {
        let expiry = self.config.expiry;
        let expired: Vec<Arc<CaptureToken>> = self
            .entries
            .iter()
            .filter(|(_, pending)| pending.is_expired_at(now, expiry))
            .map(|(token, _)| token)
            .collect();

        for token in &expired {
            self.entries.invalidate(token.as_ref());
        }
        if !expired.is_empty() {
            self.entries.run_pending_tasks();
            tracing::debug!(purged = expired.len(), "Purged expired pending chords");
        }
        expired.len()
    }
}
