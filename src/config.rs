//! Session configuration: loads optional ~/.robobrain/config.yaml.

use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::brain::{DEFAULT_MAX_EVAL_DEPTH, DEFAULT_MAX_STEPS, MAX_EVAL_DEPTH_LIMIT};

/// Session configuration loaded from YAML. Missing fields take defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrainConfig {
    /// How deep variable references may nest before evaluation gives up.
    pub max_eval_depth: usize,
    /// Dispatches one input statement may perform, nested ones included.
    pub max_steps: usize,
    /// Prompt written before each line is read.
    pub prompt: String,
    pub show_prompt: bool,
    /// Prefix for error lines on the console.
    pub error_prefix: String,
}

impl Default for BrainConfig {
    fn default() -> Self {
        Self {
            max_eval_depth: DEFAULT_MAX_EVAL_DEPTH,
            max_steps: DEFAULT_MAX_STEPS,
            prompt: "> ".to_string(),
            show_prompt: true,
            error_prefix: "error: ".to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("invalid config {path}: {reason}")]
    Invalid { path: PathBuf, reason: String },
}

/// Default config path: ~/.robobrain/config.yaml.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".robobrain").join("config.yaml"))
}

impl BrainConfig {
    /// Load from the default path. Falls back to defaults when there is no
    /// home directory or no file.
    pub fn load() -> Result<Self, ConfigError> {
        match default_config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load from an explicit path. The file must exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_yaml(&content).map_err(|source| ConfigError::Yaml {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate().map_err(|reason| ConfigError::Invalid {
            path: path.to_path_buf(),
            reason,
        })?;
        Ok(config)
    }

    /// Check value ranges that YAML typing alone does not enforce.
    pub fn validate(&self) -> Result<(), String> {
        if !(1..=MAX_EVAL_DEPTH_LIMIT).contains(&self.max_eval_depth) {
            return Err(format!(
                "max_eval_depth must be between 1 and {MAX_EVAL_DEPTH_LIMIT}, got {}",
                self.max_eval_depth
            ));
        }
        if self.max_steps == 0 {
            return Err("max_steps must be at least 1".to_string());
        }
        Ok(())
    }

    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        // An empty document deserializes to unit, not a map.
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yaml)
    }
}
