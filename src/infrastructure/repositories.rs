//! Infrastructure implementations of repository traits

use crate::domain::errors::{LoadError, StoreError};
use crate::domain::repositories::{DialogueStore, ScenarioRepository, ScenarioSummary};
use crate::domain::value_objects::{ScenarioId, UserId};
use crate::infrastructure::sorting::natural_cmp;
use crate::parser;
use crate::storage;
use crate::types::{DialogueState, ScenarioDocument};
use async_trait::async_trait;
use log::{debug, warn};
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

const SCENARIO_EXTENSION: &str = "json";

fn sort_summaries(summaries: &mut [ScenarioSummary]) {
    summaries.sort_by(|a, b| {
        natural_cmp(a.id.as_str(), b.id.as_str())
            .then_with(|| natural_cmp(&a.display_name, &b.display_name))
    });
}

/// Scenario documents stored as `<id>.json` files in one directory
pub struct FileSystemScenarioRepository {
    base_path: PathBuf,
}

impl FileSystemScenarioRepository {
    pub fn new<P: Into<PathBuf>>(base_path: P) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    fn get_scenario_path(&self, id: &ScenarioId) -> PathBuf {
        self.base_path
            .join(format!("{}.{}", id.as_str(), SCENARIO_EXTENSION))
    }

    async fn summarize(&self, path: &Path, id: ScenarioId) -> ScenarioSummary {
        let display_name = match tokio::fs::read_to_string(path).await {
            Ok(content) => match serde_json::from_str::<serde_json::Value>(&content) {
                Ok(raw) => parser::display_name(&raw),
                Err(e) => {
                    warn!("Failed to parse scenario {}: {}", path.display(), e);
                    None
                }
            },
            Err(e) => {
                warn!("Failed to read scenario {}: {}", path.display(), e);
                None
            }
        };
        let display_name = display_name.unwrap_or_else(|| id.to_string());
        ScenarioSummary { id, display_name }
    }
}

#[async_trait]
impl ScenarioRepository for FileSystemScenarioRepository {
    async fn load_scenario(&self, id: &ScenarioId) -> Result<ScenarioDocument, LoadError> {
        if !id.is_safe() {
            return Err(LoadError::not_found(id.clone()));
        }

        let path = self.get_scenario_path(id);
        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(LoadError::not_found(id.clone()));
            }
            Err(e) => {
                return Err(LoadError::io(
                    format!("Failed to read scenario file {}", path.display()),
                    e,
                ));
            }
        };

        parser::parse(id.as_str(), &content).map_err(|source| {
            warn!("Scenario {} rejected: {}", path.display(), source);
            LoadError::Malformed {
                id: id.clone(),
                source,
            }
        })
    }

    async fn list_available(&self) -> Result<Vec<ScenarioSummary>, LoadError> {
        let mut entries = match tokio::fs::read_dir(&self.base_path).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("Scenario directory {} does not exist", self.base_path.display());
                return Ok(Vec::new());
            }
            Err(e) => {
                return Err(LoadError::io(
                    format!("Failed to read directory {}", self.base_path.display()),
                    e,
                ));
            }
        };

        let mut summaries = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| LoadError::io("Failed to read directory entry", e))?
        {
            let path = entry.path();
            let is_scenario = path.extension().and_then(|ext| ext.to_str()) == Some(SCENARIO_EXTENSION);
            if !is_scenario {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                let id = ScenarioId::from(stem);
                summaries.push(self.summarize(&path, id).await);
            }
        }

        sort_summaries(&mut summaries);
        Ok(summaries)
    }
}

/// In-memory scenario sources, validated on every load
pub struct InMemoryScenarioRepository {
    sources: HashMap<ScenarioId, String>,
}

impl InMemoryScenarioRepository {
    pub fn new() -> Self {
        Self {
            sources: HashMap::new(),
        }
    }

    /// Register raw JSON text under `id`
    pub fn add_source(&mut self, id: impl Into<ScenarioId>, json: impl Into<String>) {
        self.sources.insert(id.into(), json.into());
    }

    pub fn with_source(mut self, id: impl Into<ScenarioId>, json: impl Into<String>) -> Self {
        self.add_source(id, json);
        self
    }
}

impl Default for InMemoryScenarioRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ScenarioRepository for InMemoryScenarioRepository {
    async fn load_scenario(&self, id: &ScenarioId) -> Result<ScenarioDocument, LoadError> {
        let source = self
            .sources
            .get(id)
            .ok_or_else(|| LoadError::not_found(id.clone()))?;
        parser::parse(id.as_str(), source).map_err(|source| LoadError::Malformed {
            id: id.clone(),
            source,
        })
    }

    async fn list_available(&self) -> Result<Vec<ScenarioSummary>, LoadError> {
        let mut summaries: Vec<_> = self
            .sources
            .iter()
            .map(|(id, source)| {
                let display_name = serde_json::from_str::<serde_json::Value>(source)
                    .ok()
                    .and_then(|raw| parser::display_name(&raw))
                    .unwrap_or_else(|| id.to_string());
                ScenarioSummary::new(id.clone(), display_name)
            })
            .collect();
        sort_summaries(&mut summaries);
        Ok(summaries)
    }
}

/// Volatile dialogue state, lost on restart
#[derive(Default)]
pub struct InMemoryDialogueStore {
    states: RwLock<HashMap<UserId, DialogueState>>,
}

impl InMemoryDialogueStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DialogueStore for InMemoryDialogueStore {
    async fn get(&self, user: UserId) -> Result<Option<DialogueState>, StoreError> {
        Ok(self.states.read().await.get(&user).cloned())
    }

    async fn set(&self, user: UserId, state: DialogueState) -> Result<(), StoreError> {
        self.states.write().await.insert(user, state);
        Ok(())
    }

    async fn clear(&self, user: UserId) -> Result<(), StoreError> {
        self.states.write().await.remove(&user);
        Ok(())
    }
}

/// Dialogue state kept as one `<user>.state.json` file per user
pub struct JsonFileDialogueStore {
    base_path: PathBuf,
}

impl JsonFileDialogueStore {
    pub fn new<P: Into<PathBuf>>(base_path: P) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    fn get_state_path(&self, user: UserId) -> PathBuf {
        self.base_path.join(format!("{user}.state.json"))
    }
}

#[async_trait]
impl DialogueStore for JsonFileDialogueStore {
    async fn get(&self, user: UserId) -> Result<Option<DialogueState>, StoreError> {
        let path = self.get_state_path(user);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(StoreError::Io {
                    message: format!("Failed to read state file {}: {}", path.display(), e),
                });
            }
        };

        storage::load(&bytes)
            .map(Some)
            .map_err(|e| StoreError::Serialization {
                message: format!("Failed to deserialize state {}: {}", path.display(), e),
            })
    }

    async fn set(&self, user: UserId, state: DialogueState) -> Result<(), StoreError> {
        tokio::fs::create_dir_all(&self.base_path)
            .await
            .map_err(|e| StoreError::Io {
                message: format!("Failed to create state directory: {e}"),
            })?;

        let bytes = storage::save(&state).map_err(|e| StoreError::Serialization {
            message: format!("Failed to serialize state: {e}"),
        })?;

        let path = self.get_state_path(user);
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| StoreError::Io {
                message: format!("Failed to write state file {}: {}", path.display(), e),
            })
    }

    async fn clear(&self, user: UserId) -> Result<(), StoreError> {
        let path = self.get_state_path(user);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::Io {
                message: format!("Failed to delete state file {}: {}", path.display(), e),
            }),
        }
    }
}
