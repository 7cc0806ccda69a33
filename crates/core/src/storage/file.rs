//! JSON file settings storage.
//!
//! The whole store is a single JSON object on disk. Writes replace the file
//! atomically (temp file + rename). A file that does not hold a JSON object is
//! moved aside to `<name>.corrupt.<unix-seconds>` and treated as empty.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tokio::sync::Mutex;

use super::SettingsStorage;
use crate::error::StorageError;

/// Settings storage backed by one JSON file.
#[derive(Debug)]
pub struct JsonFileStorage {
    path: PathBuf,
    // Serialises read-modify-write cycles; the last writer wins.
    lock: Mutex<()>,
}

impl JsonFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StorageError {
        StorageError::Io {
            path: self.path.clone(),
            source,
        }
    }

    /// Read the top-level object, recovering from a corrupt file.
    async fn read_all(&self) -> Result<Map<String, Value>, StorageError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(self.io_error(e)),
        };

        if content.trim().is_empty() {
            return Ok(Map::new());
        }

        match serde_json::from_str::<Value>(&content) {
            Ok(Value::Object(map)) => Ok(map),
            _ => {
                match create_corrupt_backup(&self.path).await {
                    Ok(backup) => tracing::warn!(
                        path = %self.path.display(),
                        backup = %backup.display(),
                        "Settings file is not a JSON object; moved aside"
                    ),
                    Err(e) => tracing::warn!(
                        path = %self.path.display(),
                        error = %e,
                        "Settings file is not a JSON object and could not be moved aside"
                    ),
                }
                Ok(Map::new())
            }
        }
    }

    async fn atomic_save(&self, map: &Map<String, Value>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| self.io_error(e))?;
        }

        let content = serde_json::to_string_pretty(map)?;
        let temp_path = self.path.with_extension("tmp");
        tokio::fs::write(&temp_path, content)
            .await
            .map_err(|e| self.io_error(e))?;
        tokio::fs::rename(&temp_path, &self.path)
            .await
            .map_err(|e| self.io_error(e))?;

        tracing::debug!(path = %self.path.display(), "Settings saved atomically");
        Ok(())
    }
}

impl SettingsStorage for JsonFileStorage {
    async fn get(&self, key: &str) -> Result<Option<Value>, StorageError> {
        let _guard = self.lock.lock().await;
        Ok(self.read_all().await?.remove(key))
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), StorageError> {
        let _guard = self.lock.lock().await;
        let mut map = self.read_all().await?;
        map.insert(key.to_string(), value);
        self.atomic_save(&map).await
    }
}

/// Rename a corrupt file to `<stem>.corrupt.<unix-seconds>`.
async fn create_corrupt_backup(path: &Path) -> Result<PathBuf, std::io::Error> {
    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();

    let backup_path = path.with_extension(format!("corrupt.{timestamp}"));
    tokio::fs::rename(path, &backup_path).await?;
    Ok(backup_path)
}
