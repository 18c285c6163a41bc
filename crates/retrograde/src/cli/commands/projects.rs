//! Projects command

use clap::Args;
use console::style;

use crate::cli::{Cli, Inputs, OutputFormat};

/// List registry projects and their opt-in state
#[derive(Debug, Args)]
pub struct ProjectsCommand {
    /// Only show projects with cross-version tests enabled
    #[arg(long)]
    pub enabled_only: bool,
}

impl ProjectsCommand {
    /// Execute the projects command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        let inputs = Inputs::load(cli)?;

        let projects: Vec<_> = inputs
            .registry
            .projects()
            .filter(|p| !self.enabled_only || p.cross_version_tests)
            .collect();

        match cli.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&projects)?);
            }
            OutputFormat::Text => {
                if !cli.quiet {
                    if projects.is_empty() {
                        println!("No projects in the opt-in registry");
                        return Ok(());
                    }
                    for project in projects {
                        if project.cross_version_tests {
                            println!("{} {}", style("✓").green(), project.name);
                        } else {
                            println!("{} {}", style("-").dim(), style(&project.name).dim());
                        }
                    }
                }
            }
        }

        Ok(())
    }
}
