//! Validate command

use clap::Args;
use console::style;
use tracing::info;

use retrograde_core::{load_catalog_optional, load_config_or_default, OptInRegistry};

use crate::cli::{Cli, OutputFormat};

/// Validate configuration and input files
#[derive(Debug, Args)]
pub struct ValidateCommand {
    /// Strict mode - treat warnings as errors
    #[arg(long)]
    pub strict: bool,
}

impl ValidateCommand {
    /// Execute the validate command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(strict = self.strict, "executing validate command");
        let cwd = std::env::current_dir()?;

        let mut errors: Vec<String> = Vec::new();
        let mut warnings: Vec<String> = Vec::new();

        // Validate configuration
        let (config, config_path) = match load_config_or_default(&cwd) {
            Ok((config, path)) => (Some(config), path),
            Err(e) => {
                errors.push(format!("Configuration: {}", e));
                (None, None)
            }
        };

        if let Some(config) = &config {
            let registry_path = cli.registry.as_ref().unwrap_or(&config.registry_path);
            let catalog_path = cli.catalog.as_ref().unwrap_or(&config.catalog_path);

            // Validate the opt-in registry
            match OptInRegistry::load_optional(registry_path) {
                Ok(registry) if registry.is_empty() => {
                    warnings.push(format!(
                        "No opt-in registry at {}, cross-version testing is disabled",
                        registry_path.display()
                    ));
                }
                Ok(registry) => {
                    let companion = &config.orchestrator.fixture_companion;
                    let opted_in = registry.projects().any(|p| p.cross_version_tests);
                    if opted_in && !registry.contains(companion) {
                        errors.push(format!(
                            "Fixture companion project '{}' is not in the registry",
                            companion
                        ));
                    }
                    if !opted_in {
                        warnings.push("No project has cross-version tests enabled".to_string());
                    }
                }
                Err(e) => {
                    errors.push(format!("Opt-in registry: {}", e));
                }
            }

            // Validate the released-version catalog
            match load_catalog_optional(catalog_path) {
                Ok(None) => {
                    warnings.push(format!(
                        "No released-version catalog at {}, only latest-version tasks will exist",
                        catalog_path.display()
                    ));
                }
                Ok(Some(catalog)) if catalog.is_empty() => {
                    warnings.push("Released-version catalog is empty".to_string());
                }
                Ok(Some(_)) => {}
                Err(e) => {
                    errors.push(format!("Released-version catalog: {}", e));
                }
            }
        }

        // If strict, promote warnings to errors
        if self.strict {
            errors.append(&mut warnings);
        }

        // Output
        let passed = errors.is_empty();

        match cli.format {
            OutputFormat::Json => {
                let output = serde_json::json!({
                    "valid": passed,
                    "config_path": config_path.map(|p| p.to_string_lossy().to_string()),
                    "errors": errors,
                    "warnings": warnings
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            }
            OutputFormat::Text => {
                if !cli.quiet {
                    if let Some(path) = config_path {
                        println!("Config: {}", style(path.display()).cyan());
                    }

                    if !errors.is_empty() {
                        println!("{}", style("Errors:").red().bold());
                        for error in &errors {
                            println!("  {} {}", style("✗").red(), error);
                        }
                    }

                    if !warnings.is_empty() {
                        println!("{}", style("Warnings:").yellow().bold());
                        for warning in &warnings {
                            println!("  {} {}", style("!").yellow(), warning);
                        }
                    }

                    if passed {
                        println!("{}", style("✓ All checks passed").green().bold());
                    } else {
                        println!(
                            "{} with {} error(s)",
                            style("✗ Validation failed").red().bold(),
                            errors.len()
                        );
                    }
                }
            }
        }

        if !passed {
            std::process::exit(1);
        }

        Ok(())
    }
}
