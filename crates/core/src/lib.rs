//! Keybind registry and conflict-resolution engine for macros.
//!
//! This crate binds a keyboard chord (modifiers plus one primary key) to a
//! macro, keeps at most one macro per chord for each user, persists the
//! bindings through a pluggable key-value store, and resolves an observed
//! chord back to the macro it triggers. Chords captured for a macro that is
//! still being created are held in a time-limited pending buffer until the
//! macro exists.

pub mod chord;
pub mod dispatch;
pub mod error;
pub mod hotbar;
pub mod model;
pub mod pending;
pub mod recorder;
pub mod repository;
pub mod resolver;
pub mod service;
pub mod storage;
pub mod store;

pub use chord::{Chord, ChordParseError, ModifierTag, RawChord, normalize_chord, normalize_modifier};
pub use dispatch::{ActionRegistry, resolve};
pub use error::{HostError, KeybindError, Result, StorageError};
pub use hotbar::{HostAdapter, HotbarReport, apply_hotbar_policy, reserved_hotbar_chords};
pub use model::{Binding, BindingSet};
pub use pending::{CaptureToken, PendingBinding, PendingBuffer};
pub use recorder::{ChordRecorder, KeyEvent, KeyEventKind, RecorderOutcome};
pub use repository::{MacroEntity, MacroRepository};
pub use resolver::{ApplyOutcome, apply_binding};
pub use service::{CaptureOutcome, CaptureStatus, DispatchOutcome, KeybindService, SyncReport};
pub use storage::{JsonFileStorage, MemoryStorage, SettingsStorage};
pub use store::BindingStore;
