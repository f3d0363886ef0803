//! Configuration management for hilo

mod judge;
mod referee;
pub mod serde_utils;
mod solver;

pub use judge::JudgeConfig;
pub use referee::RefereeConfig;
pub use solver::SolverConfig;

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Complete configuration file, one section per role
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HiloConfig {
    pub judge: JudgeConfig,
    pub solver: SolverConfig,
    pub referee: RefereeConfig,
}

impl HiloConfig {
    /// Reject settings no session can run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.judge.max_queries == 0 {
            return Err(ConfigError::Invalid(
                "judge.max_queries must be at least 1".to_string(),
            ));
        }
        if self.solver.max_queries == 0 {
            return Err(ConfigError::Invalid(
                "solver.max_queries must be at least 1".to_string(),
            ));
        }
        if self.referee.time_limit.is_zero() {
            return Err(ConfigError::Invalid(
                "referee.time_limit must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Get the default configuration directory
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("hilo")
}

/// Get the default configuration file path
pub fn default_config_path() -> PathBuf {
    default_config_dir().join("config.toml")
}

/// Load configuration from a file
pub fn load_config<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::Invalid(format!("Failed to read config: {}", e)))?;

    let config: T = toml::from_str(&content)?;
    Ok(config)
}

/// Save configuration to a file
pub fn save_config<T: serde::Serialize>(path: &Path, config: &T) -> Result<(), ConfigError> {
    let content = toml::to_string_pretty(config)?;

    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| ConfigError::Invalid(format!("Failed to create config dir: {}", e)))?;
    }

    std::fs::write(path, content)
        .map_err(|e| ConfigError::Invalid(format!("Failed to write config: {}", e)))?;

    Ok(())
}
