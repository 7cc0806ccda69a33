//! Settings storage backends.
//!
//! Responsibilities:
//! - Define the `SettingsStorage` key-value seam the binding store is layered on.
//! - Provide an in-process backend (`MemoryStorage`) and a JSON file backend
//!   (`JsonFileStorage`).
//!
//! Does NOT handle:
//! - Binding set validation (see `model::BindingSet::from_value`).
//!
//! Invariants:
//! - `set` either persists the whole value or fails with `StorageError`.
//! - Backends never interpret the values they hold.

mod file;
mod memory;

use std::future::Future;

use serde_json::Value;

use crate::error::StorageError;

pub use file::JsonFileStorage;
pub use memory::MemoryStorage;

/// Durable key-value settings storage.
pub trait SettingsStorage: Send + Sync {
    /// Read the value stored under `key`, or `None` when nothing is stored.
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<Value>, StorageError>> + Send;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: Value) -> impl Future<Output = Result<(), StorageError>> + Send;
}
