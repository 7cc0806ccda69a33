//! Entity repository seam.

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// A macro as known to the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacroEntity {
    pub id: String,
    pub name: String,
}

impl MacroEntity {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Read access to the host's macros.
pub trait MacroRepository: Send + Sync {
    fn get(&self, action_id: &str) -> impl Future<Output = Result<Option<MacroEntity>>> + Send;

    fn list(&self) -> impl Future<Output = Result<Vec<MacroEntity>>> + Send;
}
