//! Macro catalog kept next to the bindings in the settings store.
//!
//! Responsibilities:
//! - Persist the `id -> name` macro catalog under its own settings key.
//! - Serve as the entity repository and action registry for the keybind service.
//!
//! Does NOT handle:
//! - Bindings (see `macro_keybinds_core::BindingStore`).
//!
//! Invariants:
//! - A stored catalog that is not a JSON object is read as empty.

use std::collections::BTreeMap;
use std::sync::Arc;

use macro_keybinds_config::constants::SETTINGS_NAMESPACE;
use macro_keybinds_core::{
    ActionRegistry, KeybindError, MacroEntity, MacroRepository, Result, SettingsStorage,
};

use crate::error::CliError;

/// Settings key of the macro catalog.
pub fn catalog_key() -> String {
    format!("{SETTINGS_NAMESPACE}.macros")
}

/// Macro catalog backed by a settings store.
pub struct MacroCatalog<S> {
    storage: Arc<S>,
}

impl<S: SettingsStorage> MacroCatalog<S> {
    pub fn new(storage: Arc<S>) -> Self {
        Self { storage }
    }

    async fn read(&self) -> Result<BTreeMap<String, String>> {
        let Some(value) = self.storage.get(&catalog_key()).await? else {
            return Ok(BTreeMap::new());
        };

        match serde_json::from_value::<BTreeMap<String, String>>(value) {
            Ok(map) => Ok(map),
            Err(e) => {
                tracing::warn!(error = %e, "Macro catalog is unreadable; treating as empty");
                Ok(BTreeMap::new())
            }
        }
    }

    async fn write(&self, map: &BTreeMap<String, String>) -> Result<()> {
        let value = serde_json::to_value(map).map_err(|e| KeybindError::Storage(e.into()))?;
        self.storage.set(&catalog_key(), value).await?;
        Ok(())
    }

    /// Every macro as `id -> name`.
    pub async fn names(&self) -> Result<BTreeMap<String, String>> {
        self.read().await
    }

    pub async fn add(&self, action_id: &str, name: &str) -> anyhow::Result<MacroEntity> {
        let mut map = self.read().await?;
        if map.contains_key(action_id) {
            return Err(CliError::MacroExists {
                action_id: action_id.to_string(),
            }
            .into());
        }
        map.insert(action_id.to_string(), name.to_string());
        self.write(&map).await?;
        Ok(MacroEntity::new(action_id, name))
    }

    pub async fn rename(&self, action_id: &str, name: &str) -> anyhow::Result<()> {
        let mut map = self.read().await?;
        let Some(current) = map.get_mut(action_id) else {
            return Err(CliError::MacroNotFound {
                action_id: action_id.to_string(),
            }
            .into());
        };
        *current = name.to_string();
        self.write(&map).await?;
        Ok(())
    }

    pub async fn remove(&self, action_id: &str) -> anyhow::Result<()> {
        let mut map = self.read().await?;
        if map.remove(action_id).is_none() {
            return Err(CliError::MacroNotFound {
                action_id: action_id.to_string(),
            }
            .into());
        }
        self.write(&map).await?;
        Ok(())
    }
}

impl<S: SettingsStorage> MacroRepository for MacroCatalog<S> {
    async fn get(&self, action_id: &str) -> Result<Option<MacroEntity>> {
        Ok(self
            .read()
            .await?
            .get(action_id)
            .map(|name| MacroEntity::new(action_id, name.clone())))
    }

    async fn list(&self) -> Result<Vec<MacroEntity>> {
        Ok(self
            .read()
            .await?
            .into_iter()
            .map(|(id, name)| MacroEntity::new(id, name))
            .collect())
    }
}

/// Action registry over a catalog snapshot.
///
/// "Running" a macro logs it; the dispatch command reports the result.
pub struct CatalogRegistry {
    names: BTreeMap<String, String>,
}

impl CatalogRegistry {
    pub fn new(names: BTreeMap<String, String>) -> Self {
        Self { names }
    }

    pub fn name_of(&self, action_id: &str) -> Option<&str> {
        self.names.get(action_id).map(String::as_str)
    }
}

impl ActionRegistry for CatalogRegistry {
    fn invoke(&self, action_id: &str) -> Result<()> {
        let Some(name) = self.names.get(action_id) else {
            return Err(KeybindError::ActionNotFound {
                action_id: action_id.to_string(),
            });
        };
        tracing::info!(action_id = %action_id, name = %name, "Running macro");
        Ok(())
    }
}
