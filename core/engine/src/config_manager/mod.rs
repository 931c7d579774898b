use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::error::NmtResult;

fn default_max_steps() -> usize {
    50
}

fn default_max_eos_count() -> usize {
    8
}

/// Engine settings that must stay out of the decode code itself: where the
/// exported model lives, and the two decode-loop bounds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Directory holding encoder_model.onnx, decoder_model.onnx and
    /// tokenizer.json.
    pub model_dir: PathBuf,
    /// Safety bound on decode steps per request.
    #[serde(default = "default_max_steps")]
    pub max_steps: usize,
    /// Cumulative EOS predictions tolerated before stopping.
    #[serde(default = "default_max_eos_count")]
    pub max_eos_count: usize,
}

impl EngineConfig {
    pub fn new(model_dir: impl Into<PathBuf>) -> Self {
        Self {
            model_dir: model_dir.into(),
            max_steps: default_max_steps(),
            max_eos_count: default_max_eos_count(),
        }
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)
            .map_err(|e| anyhow!("failed to read engine config {}: {e}", path.display()))?;
        serde_json::from_str(&data)
            .map_err(|e| anyhow!("failed to parse engine config {}: {e}", path.display()))
    }
}

#[async_trait]
pub trait ConfigManager: Send + Sync {
    async fn load(&self) -> NmtResult<EngineConfig>;
    async fn current(&self) -> NmtResult<EngineConfig>;
}

/// File-backed config manager: `load` re-reads the JSON file, `current`
/// serves the last loaded snapshot (loading on first use).
pub struct JsonConfigManager {
    path: PathBuf,
    cached: RwLock<Option<EngineConfig>>,
}

impl JsonConfigManager {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cached: RwLock::new(None),
        }
    }
}

#[async_trait]
impl ConfigManager for JsonConfigManager {
    async fn load(&self) -> NmtResult<EngineConfig> {
        let config = EngineConfig::from_json_file(&self.path)?;
        *self.cached.write().await = Some(config.clone());
        Ok(config)
    }

    async fn current(&self) -> NmtResult<EngineConfig> {
        let cached = self.cached.read().await.clone();
        match cached {
            Some(config) => Ok(config),
            None => self.load().await,
        }
    }
}
