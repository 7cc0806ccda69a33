//! In-process settings storage.

use std::collections::BTreeMap;

use serde_json::Value;
use tokio::sync::Mutex;

use super::SettingsStorage;
use crate::error::StorageError;

#[derive(Debug, Default)]
struct Inner {
    values: BTreeMap<String, Value>,
    writes: usize,
}

/// Settings storage held in memory for the lifetime of the process.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    inner: Mutex<Inner>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage pre-populated with `key -> value`.
    pub fn with_value(key: impl Into<String>, value: Value) -> Self {
        let mut values = BTreeMap::new();
        values.insert(key.into(), value);
        Self {
            inner: Mutex::new(Inner { values, writes: 0 }),
        }
    }

    /// Number of successful `set` calls so far.
    pub async fn write_count(&self) -> usize {
        self.inner.lock().await.writes
    }
}

impl SettingsStorage for MemoryStorage {
    async fn get(&self, key: &str) -> Result<Option<Value>, StorageError> {
        Ok(self.inner.lock().await.values.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), StorageError> {
        let mut inner = self.inner.lock().await;
        inner.values.insert(key.to_string(), value);
        inner.writes += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_get_missing_key() {
        let storage = MemoryStorage::new();
        assert!(storage.get("absent").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_set_then_get() {
        let storage = MemoryStorage::new();
        storage.set("k", json!({"a": 1})).await.unwrap();
        storage.set("k", json!({"a": 2})).await.unwrap();

        assert_eq!(storage.get("k").await.unwrap(), Some(json!({"a": 2})));
        assert_eq!(storage.write_count().await, 2);
    }
}
