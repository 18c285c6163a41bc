//! Plan command

use anyhow::bail;
use clap::Args;
use console::style;
use tracing::info;

use retrograde_tasks::{ConfigureOutcome, Orchestrator, ProjectTaskGraph};

use crate::cli::{Cli, Inputs, OutputFormat};

/// Generate and print the cross-version task graph
#[derive(Debug, Args)]
pub struct PlanCommand {
    /// Project to configure
    #[arg(short, long, conflicts_with = "all")]
    pub project: Option<String>,

    /// Configure every opted-in project
    #[arg(long)]
    pub all: bool,
}

impl PlanCommand {
    /// Execute the plan command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        let inputs = Inputs::load(cli)?;
        let options = inputs.orchestrator_options()?;
        let orchestrator =
            Orchestrator::new(&inputs.registry, inputs.catalog.as_ref()).with_options(options);

        let projects: Vec<String> = if self.all {
            inputs
                .registry
                .projects()
                .filter(|p| p.cross_version_tests)
                .map(|p| p.name.clone())
                .collect()
        } else {
            let Some(project) = &self.project else {
                bail!("either --project <name> or --all is required");
            };
            if !inputs.registry.contains(project) {
                bail!("project '{}' is not in the opt-in registry", project);
            }
            vec![project.clone()]
        };

        let mut reports = Vec::with_capacity(projects.len());
        for project in &projects {
            let mut graph = ProjectTaskGraph::new(project.clone());
            let outcome = orchestrator.configure(&mut graph)?;
            info!(project = %project, tasks = graph.len(), "project configured");
            reports.push((project.clone(), outcome, graph));
        }

        match cli.format {
            OutputFormat::Json => {
                let output: Vec<_> = reports
                    .iter()
                    .map(|(project, outcome, graph)| {
                        serde_json::json!({
                            "project": project,
                            "outcome": outcome_label(outcome),
                            "sourcePartitions": graph.source_partitions(),
                            "fixtureDependencies": graph.fixture_dependencies(),
                            "tasks": graph.nodes(),
                        })
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&output)?);
            }
            OutputFormat::Text => {
                if !cli.quiet {
                    for (project, outcome, graph) in &reports {
                        match outcome {
                            ConfigureOutcome::Excluded => {
                                println!(
                                    "{} {} (excluded)",
                                    style("-").dim(),
                                    style(project).bold()
                                );
                            }
                            ConfigureOutcome::Disabled => {
                                println!(
                                    "{} {} (cross-version tests disabled)",
                                    style("-").dim(),
                                    style(project).bold()
                                );
                            }
                            ConfigureOutcome::Configured { .. } => {
                                print!("{}", graph.execution_plan());
                            }
                        }
                    }
                }
            }
        }

        Ok(())
    }
}

fn outcome_label(outcome: &ConfigureOutcome) -> &'static str {
    match outcome {
        ConfigureOutcome::Excluded => "excluded",
        ConfigureOutcome::Disabled => "disabled",
        ConfigureOutcome::Configured { .. } => "configured",
    }
}
