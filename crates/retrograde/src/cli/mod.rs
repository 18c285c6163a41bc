//! CLI definition and command handling

pub mod commands;
mod inputs;

use clap::{Parser, Subcommand};

use commands::{PlanCommand, ProjectsCommand, ValidateCommand};

pub use inputs::Inputs;

/// Retrograde - Cross-version test orchestration CLI
#[derive(Debug, Parser)]
#[command(name = "retrograde")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Suppress output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Working directory
    #[arg(short = 'C', long, global = true)]
    pub directory: Option<std::path::PathBuf>,

    /// Override the opt-in registry file location
    #[arg(long, global = true)]
    pub registry: Option<std::path::PathBuf>,

    /// Override the released-version catalog file location
    #[arg(long, global = true)]
    pub catalog: Option<std::path::PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for CLI
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output
    #[default]
    Text,
    /// JSON output
    Json,
}

/// Available commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Generate and print the cross-version task graph
    Plan(PlanCommand),

    /// List registry projects and their opt-in state
    Projects(ProjectsCommand),

    /// Validate configuration and input files
    Validate(ValidateCommand),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> anyhow::Result<()> {
        // Change to specified directory if provided
        if let Some(dir) = &self.directory {
            std::env::set_current_dir(dir)?;
        }

        match self.command {
            Commands::Plan(ref cmd) => cmd.execute(&self),
            Commands::Projects(ref cmd) => cmd.execute(&self),
            Commands::Validate(ref cmd) => cmd.execute(&self),
        }
    }
}
