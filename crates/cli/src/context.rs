//! Command context: resolved configuration plus the opened stores.
//!
//! Responsibilities:
//! - Layer settings file, environment and CLI flags into a `KeybindConfig`.
//! - Open the JSON settings store and build the keybind service over it.
//!
//! Invariants:
//! - CLI flags take precedence over environment variables, which take
//!   precedence over the settings file. Blank flag values are ignored.

use std::sync::Arc;

use anyhow::{Context, Result};
use macro_keybinds_config::{ConfigLoader, KeybindConfig};
use macro_keybinds_core::{JsonFileStorage, KeybindService};

use crate::args::Cli;
use crate::catalog::{CatalogRegistry, MacroCatalog};

pub type CliService = KeybindService<JsonFileStorage, MacroCatalog<JsonFileStorage>, CatalogRegistry>;

pub struct CommandContext {
    pub config: KeybindConfig,
    pub storage: Arc<JsonFileStorage>,
}

impl CommandContext {
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let mut loader = ConfigLoader::new();

        if let Some(path) = cli
            .config_path
            .as_ref()
            .filter(|p| !p.to_string_lossy().trim().is_empty())
        {
            loader = loader.with_config_path(path.clone());
        }

        loader = loader
            .from_file()
            .context("Failed to load settings file")?
            .from_env()
            .context("Failed to load configuration from environment")?;

        if let Some(path) = cli
            .storage_path
            .as_ref()
            .filter(|p| !p.to_string_lossy().trim().is_empty())
        {
            loader = loader.with_storage_path(path.clone());
        }
        if let Some(owner) = cli.owner.as_ref().filter(|o| !o.trim().is_empty()) {
            loader = loader.with_owner(owner.clone());
        }

        let config = loader.build().context("Failed to build configuration")?;
        tracing::debug!(
            storage = %config.storage_path.display(),
            owner = %config.owner,
            "Configuration resolved"
        );

        let storage = Arc::new(JsonFileStorage::new(config.storage_path.clone()));
        Ok(Self { config, storage })
    }

    pub fn owner(&self) -> &str {
        &self.config.owner
    }

    pub fn catalog(&self) -> MacroCatalog<JsonFileStorage> {
        MacroCatalog::new(Arc::clone(&self.storage))
    }

    /// Keybind service whose registry runs the macros currently in the catalog.
    pub async fn service(&self) -> Result<CliService> {
        let names = self
            .catalog()
            .names()
            .await
            .context("Failed to read macro catalog")?;

        Ok(KeybindService::new(
            Arc::clone(&self.storage),
            self.catalog(),
            CatalogRegistry::new(names),
            self.config.pending,
        ))
    }
}
