//! Error types for Retrograde

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using RetrogradeError
pub type Result<T> = std::result::Result<T, RetrogradeError>;

/// Main error type for Retrograde operations
#[derive(Debug, Error)]
pub enum RetrogradeError {
    /// Released-version catalog errors
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Opt-in registry errors
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// Configuration-related errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

/// Errors loading or validating the released-version catalog.
///
/// Any of these indicates a broken build definition and must abort the
/// configuration pass; an *absent* catalog is not an error (see
/// `load_catalog_optional`).
#[derive(Debug, Error)]
pub enum CatalogError {
    /// A version label appears more than once
    #[error("Duplicate version '{0}' in released-version catalog")]
    DuplicateVersion(String),

    /// More than one version is flagged as the lowest tested one
    #[error("Versions '{0}' and '{1}' are both flagged as lowest-tested")]
    ConflictingLowestTested(String, String),

    /// A version descriptor carries an empty label
    #[error("Released-version catalog contains an entry with an empty version label")]
    EmptyVersionLabel,

    /// Failed to parse the catalog file
    #[error("Failed to parse released-version catalog: {0}")]
    Parse(#[from] serde_json::Error),

    /// IO error
    #[error("IO error reading released-version catalog: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors loading the project opt-in registry
#[derive(Debug, Error)]
pub enum RegistryError {
    /// A project name appears more than once
    #[error("Duplicate project '{0}' in opt-in registry")]
    DuplicateProject(String),

    /// A project descriptor carries an empty name
    #[error("Opt-in registry contains a project descriptor with an empty name")]
    EmptyProjectName,

    /// Failed to parse the registry file
    #[error("Failed to parse opt-in registry: {0}")]
    Parse(#[from] serde_json::Error),

    /// IO error
    #[error("IO error reading opt-in registry: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("Configuration file not found at {0}")]
    NotFound(PathBuf),

    /// Invalid configuration value
    #[error("Invalid configuration: {field} - {message}")]
    InvalidValue { field: String, message: String },

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// IO error
    #[error("IO error reading config: {0}")]
    Io(#[from] std::io::Error),
}

impl RetrogradeError {
    /// Create a new "other" error with a message
    pub fn other<S: Into<String>>(msg: S) -> Self {
        Self::Other(msg.into())
    }
}
