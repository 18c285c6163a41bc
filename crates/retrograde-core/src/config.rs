//! Tool configuration
//!
//! Optional `retrograde.toml` carrying input-file locations and
//! orchestrator overrides. Everything has a default, so the file is only
//! needed to deviate from stock behavior.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{ConfigError, Result};
use crate::types::ExecutionStrategy;

/// Configuration file name searched for in the working directory and its parents
pub const CONFIG_FILE_NAME: &str = "retrograde.toml";

/// Main configuration for Retrograde
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Path to the project opt-in registry (JSON)
    pub registry_path: PathBuf,

    /// Path to the released-version catalog (JSON)
    pub catalog_path: PathBuf,

    /// Orchestrator overrides
    pub orchestrator: OrchestratorConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            registry_path: PathBuf::from("subprojects.json"),
            catalog_path: PathBuf::from("released-versions.json"),
            orchestrator: OrchestratorConfig::default(),
        }
    }
}

/// Orchestrator configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrchestratorConfig {
    /// Projects that never get a cross-version task graph, regardless of
    /// their registry flag (infrastructure projects hosting the plugin
    /// mechanism itself)
    pub excluded_projects: Vec<String>,

    /// Strategies to generate quick-feedback tasks for
    pub quick_feedback_strategies: Vec<String>,

    /// Project supplying the shared test-fixture artifact
    pub fixture_companion: String,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            excluded_projects: vec!["gradle-kotlin-dsl-accessors".to_string(), "test".to_string()],
            quick_feedback_strategies: ExecutionStrategy::all()
                .iter()
                .map(|s| s.as_str().to_string())
                .collect(),
            fixture_companion: "tooling-api".to_string(),
        }
    }
}

/// Load configuration from a file
pub fn load_config(path: &Path) -> Result<Config> {
    info!(path = %path.display(), "loading config");

    let content = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: Config = toml::from_str(&content).map_err(ConfigError::TomlError)?;

    validate_config(&config)?;
    debug!(path = %path.display(), "config loaded and validated");
    Ok(config)
}

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    for name in &config.orchestrator.quick_feedback_strategies {
        if name.parse::<ExecutionStrategy>().is_err() {
            return Err(ConfigError::InvalidValue {
                field: "orchestrator.quick_feedback_strategies".to_string(),
                message: format!(
                    "unknown strategy '{}', expected one of: {}",
                    name,
                    ExecutionStrategy::all()
                        .iter()
                        .map(|s| s.as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                ),
            }
            .into());
        }
    }

    if config.orchestrator.fixture_companion.is_empty() {
        return Err(ConfigError::InvalidValue {
            field: "orchestrator.fixture_companion".to_string(),
            message: "companion project name cannot be empty".to_string(),
        }
        .into());
    }

    Ok(())
}

/// Find the configuration file in a directory or its parents.
///
/// Parents are walked until the filesystem root; the first match wins.
pub fn find_config(start_dir: &Path) -> Option<PathBuf> {
    debug!(start_dir = %start_dir.display(), "searching for config file");
    let mut current = start_dir.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            info!(path = %config_path.display(), "found config file");
            return Some(config_path);
        }

        if !current.pop() {
            break;
        }
    }

    debug!("no config file found");
    None
}

/// Load configuration from a directory, or fall back to defaults
pub fn load_config_or_default(dir: &Path) -> Result<(Config, Option<PathBuf>)> {
    match find_config(dir) {
        Some(path) => {
            let config = load_config(&path)?;
            Ok((config, Some(path)))
        }
        None => {
            warn!(dir = %dir.display(), "no config found, using defaults");
            Ok((Config::default(), None))
        }
    }
}
