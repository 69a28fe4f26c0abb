//! Domain repository traits - Abstractions for the interpreter's collaborators
//!
//! None of these are called by the interpreter directly; the engine in
//! [`crate::application`] wires them around the pure transition function.

use crate::domain::errors::{LoadError, StoreError};
use crate::domain::value_objects::{ScenarioId, UserId};
use crate::types::{DialogueState, ScenarioDocument};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Menu entry for an available scenario
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioSummary {
    pub id: ScenarioId,
    pub display_name: String,
}

impl ScenarioSummary {
    pub fn new(id: impl Into<ScenarioId>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
        }
    }

    /// Display name cut down to at most `max_chars` characters
    pub fn label(&self, max_chars: usize) -> String {
        if self.display_name.chars().count() <= max_chars {
            return self.display_name.clone();
        }
        let kept: String = self
            .display_name
            .chars()
            .take(max_chars.saturating_sub(3))
            .collect();
        format!("{kept}...")
    }
}

/// Repository resolving scenario ids to validated documents
#[async_trait]
pub trait ScenarioRepository: Send + Sync {
    /// Load and validate a scenario
    ///
    /// Distinguishes a missing scenario ([`LoadError::NotFound`]) from one that
    /// exists but fails validation ([`LoadError::Malformed`]).
    async fn load_scenario(&self, id: &ScenarioId) -> Result<ScenarioDocument, LoadError>;

    /// List every scenario in natural order of its id
    async fn list_available(&self) -> Result<Vec<ScenarioSummary>, LoadError>;
}

/// Per-user persistence of the dialogue cursor
#[async_trait]
pub trait DialogueStore: Send + Sync {
    async fn get(&self, user: UserId) -> Result<Option<DialogueState>, StoreError>;

    async fn set(&self, user: UserId, state: DialogueState) -> Result<(), StoreError>;

    async fn clear(&self, user: UserId) -> Result<(), StoreError>;
}

/// Decides who may talk to the engine at all
#[async_trait]
pub trait AccessPolicy: Send + Sync {
    async fn is_allowed(&self, user: UserId) -> bool;
}
