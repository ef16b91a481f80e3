//! Runner configuration, loaded from `.drive/config.yaml`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use drive_score::{ReducerKind, ScoringConfig};
use serde::{Deserialize, Serialize};

pub const CONFIG_PATH: &str = ".drive/config.yaml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Seconds of simulated time per tick
    #[serde(default = "default_dt_seconds")]
    pub dt_seconds: f64,

    /// Score store (relative to project root)
    #[serde(default = "default_store_path")]
    pub store_path: PathBuf,

    /// Directory searched for `<scenario>.yaml` descriptors and routes
    #[serde(default = "default_scenarios_dir")]
    pub scenarios_dir: PathBuf,

    #[serde(default)]
    pub reducer: ReducerKind,

    #[serde(default)]
    pub scoring: ScoringConfig,

    /// Record a trace of node transitions and log it at debug level
    #[serde(default)]
    pub trace: bool,
}

fn default_dt_seconds() -> f64 {
    0.05
}
fn default_store_path() -> PathBuf {
    PathBuf::from(".drive/scores.jsonl")
}
fn default_scenarios_dir() -> PathBuf {
    PathBuf::from(".drive/scenarios")
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            dt_seconds: default_dt_seconds(),
            store_path: default_store_path(),
            scenarios_dir: default_scenarios_dir(),
            reducer: ReducerKind::default(),
            scoring: ScoringConfig::default(),
            trace: false,
        }
    }
}

impl RunnerConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;
        let config: Self = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;
        Ok(config)
    }

    /// Load from project root (looks for .drive/config.yaml)
    pub fn load_from_project(project_root: &Path) -> Result<Self> {
        let config_path = project_root.join(CONFIG_PATH);
        let mut config = if config_path.exists() {
            Self::load(&config_path)?
        } else {
            Self::default()
        };
        config.resolve_paths(project_root);
        Ok(config)
    }

    /// Write this config to `.drive/config.yaml`, creating the directory.
    pub fn save_to_project(&self, project_root: &Path) -> Result<PathBuf> {
        let config_path = project_root.join(CONFIG_PATH);
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let yaml = serde_yaml::to_string(self).context("Failed to serialize config")?;
        std::fs::write(&config_path, yaml)
            .with_context(|| format!("Failed to write config to {}", config_path.display()))?;
        Ok(config_path)
    }

    /// Resolve paths relative to project root
    pub fn resolve_paths(&mut self, project_root: &Path) {
        self.store_path = project_root.join(&self.store_path);
        self.scenarios_dir = project_root.join(&self.scenarios_dir);
    }
}
