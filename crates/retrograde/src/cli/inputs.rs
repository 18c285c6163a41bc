//! Shared input loading for CLI commands

use anyhow::Context;
use tracing::debug;

use retrograde_core::{
    load_catalog_optional, load_config_or_default, Config, OptInRegistry, VersionCatalog,
};
use retrograde_tasks::OrchestratorOptions;

use crate::cli::Cli;

/// Everything a command needs: tool config plus the two input files,
/// with CLI path overrides applied
#[derive(Debug)]
pub struct Inputs {
    /// Tool configuration (defaults if no file was found)
    pub config: Config,
    /// Project opt-in registry (empty if the file is absent)
    pub registry: OptInRegistry,
    /// Released-version catalog, `None` when no data is available
    pub catalog: Option<VersionCatalog>,
}

impl Inputs {
    /// Load configuration, registry, and catalog from the working directory
    pub fn load(cli: &Cli) -> anyhow::Result<Self> {
        let cwd = std::env::current_dir()?;
        let (config, config_path) = load_config_or_default(&cwd)?;
        if let Some(path) = &config_path {
            debug!(path = %path.display(), "using config file");
        }

        let registry_path = cli
            .registry
            .clone()
            .unwrap_or_else(|| config.registry_path.clone());
        let catalog_path = cli
            .catalog
            .clone()
            .unwrap_or_else(|| config.catalog_path.clone());

        let registry = OptInRegistry::load_optional(&registry_path)
            .with_context(|| format!("loading opt-in registry from {}", registry_path.display()))?;
        let catalog = load_catalog_optional(&catalog_path).with_context(|| {
            format!(
                "loading released-version catalog from {}",
                catalog_path.display()
            )
        })?;

        Ok(Self {
            config,
            registry,
            catalog,
        })
    }

    /// Orchestrator options derived from the tool configuration
    pub fn orchestrator_options(&self) -> anyhow::Result<OrchestratorOptions> {
        OrchestratorOptions::from_config(&self.config.orchestrator)
            .context("invalid orchestrator configuration")
    }
}
