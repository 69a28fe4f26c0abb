//! Engine configuration
//!
//! Defaults, optionally overridden by a JSON file and then by `STEPWISE_*`
//! environment variables.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Runtime configuration for the binary and for transports
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Directory holding `<id>.json` scenario documents
    pub scenarios_dir: PathBuf,
    /// Directory photo references are resolved against
    pub image_dir: PathBuf,
    /// Directory for persisted dialogue state; `None` keeps state in memory
    pub state_dir: Option<PathBuf>,
    /// Allow-list file; `None` admits everyone
    pub allow_list: Option<PathBuf>,
    /// Scenario started when no id is given
    pub default_scenario: String,
    /// Log filter used when `RUST_LOG` is not set
    pub log_level: String,
    /// Maximum characters of a display name in menus
    pub menu_label_width: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            scenarios_dir: PathBuf::from("scenarios"),
            image_dir: PathBuf::from("images"),
            state_dir: None,
            allow_list: None,
            default_scenario: "test".to_string(),
            log_level: "info".to_string(),
            menu_label_width: 30,
        }
    }
}

impl EngineConfig {
    /// The file named by `STEPWISE_CONFIG` (if any), then environment variables
    pub fn load() -> anyhow::Result<Self> {
        Self::load_with(|key| std::env::var(key).ok())
    }

    fn load_with(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let base = match lookup("STEPWISE_CONFIG") {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        Ok(base.with_overrides(lookup))
    }

    /// Read a JSON file; missing keys keep their defaults
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(dir) = lookup("STEPWISE_SCENARIOS_DIR") {
            self.scenarios_dir = PathBuf::from(dir);
        }
        if let Some(dir) = lookup("STEPWISE_IMAGE_DIR") {
            self.image_dir = PathBuf::from(dir);
        }
        if let Some(dir) = lookup("STEPWISE_STATE_DIR") {
            self.state_dir = Some(PathBuf::from(dir));
        }
        if let Some(path) = lookup("STEPWISE_ALLOW_LIST") {
            self.allow_list = Some(PathBuf::from(path));
        }
        if let Some(id) = lookup("STEPWISE_DEFAULT_SCENARIO") {
            self.default_scenario = id;
        }
        if let Some(level) = lookup("STEPWISE_LOG") {
            self.log_level = level;
        }
        self
    }

    /// Path of a photo reference inside the image directory
    pub fn resolve_photo(&self, photo: &str) -> PathBuf {
        self.image_dir.join(photo)
    }
}
