//! CLI commands

mod plan;
mod projects;
mod validate;

pub use plan::PlanCommand;
pub use projects::ProjectsCommand;
pub use validate::ValidateCommand;
