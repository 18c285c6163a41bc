//! Retrograde Core - Core library for cross-version test orchestration
//!
//! This crate provides the foundational types, error handling, the
//! released-version catalog, the project opt-in registry, and tool
//! configuration for Retrograde.

pub mod catalog;
pub mod config;
pub mod error;
pub mod registry;
pub mod types;

pub use catalog::{load_catalog, load_catalog_optional, ReleasedVersion, VersionCatalog};
pub use config::{find_config, load_config, load_config_or_default, Config, OrchestratorConfig};
pub use error::{CatalogError, ConfigError, RegistryError, Result, RetrogradeError};
pub use registry::{OptInRegistry, ProjectDescriptor};
pub use types::ExecutionStrategy;
