//! Project opt-in registry
//!
//! A JSON file lists every project in the build together with a flag
//! saying whether cross-version testing is enabled for it. Absence of
//! the file disables the feature for all projects; a malformed file is
//! a broken build definition and fails the configuration pass.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{RegistryError, Result};

/// One entry in the opt-in registry.
///
/// Unknown fields in the registry file are ignored, so the same file can
/// carry unrelated per-project settings for other tooling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDescriptor {
    /// Project name, unique within the build
    pub name: String,

    /// Whether cross-version testing is enabled for this project
    #[serde(default)]
    pub cross_version_tests: bool,
}

impl ProjectDescriptor {
    /// Create a descriptor with the opt-in flag cleared
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cross_version_tests: false,
        }
    }

    /// Set the opt-in flag
    pub fn with_cross_version_tests(mut self, enabled: bool) -> Self {
        self.cross_version_tests = enabled;
        self
    }
}

/// Lookup table from project name to its descriptor
#[derive(Debug, Clone, Default)]
pub struct OptInRegistry {
    projects: BTreeMap<String, ProjectDescriptor>,
}

impl OptInRegistry {
    /// Build a registry from a list of descriptors
    pub fn new(descriptors: Vec<ProjectDescriptor>) -> Result<Self> {
        let mut projects = BTreeMap::new();
        for descriptor in descriptors {
            if descriptor.name.is_empty() {
                return Err(RegistryError::EmptyProjectName.into());
            }
            if projects
                .insert(descriptor.name.clone(), descriptor.clone())
                .is_some()
            {
                return Err(RegistryError::DuplicateProject(descriptor.name).into());
            }
        }
        Ok(Self { projects })
    }

    /// An empty registry: the feature is disabled for every project
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load the registry from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        info!(path = %path.display(), "loading project opt-in registry");

        let content = std::fs::read_to_string(path).map_err(RegistryError::Io)?;
        let descriptors: Vec<ProjectDescriptor> =
            serde_json::from_str(&content).map_err(RegistryError::Parse)?;

        Self::new(descriptors)
    }

    /// Load the registry, treating a missing file as "feature disabled"
    pub fn load_optional(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "no opt-in registry, cross-version testing disabled");
            return Ok(Self::empty());
        }
        Self::load(path)
    }

    /// Whether cross-version testing is enabled for the named project.
    ///
    /// Exact name match; unknown projects are disabled.
    pub fn is_enabled(&self, project: &str) -> bool {
        self.projects
            .get(project)
            .is_some_and(|p| p.cross_version_tests)
    }

    /// Whether the registry knows the named project at all
    pub fn contains(&self, project: &str) -> bool {
        self.projects.contains_key(project)
    }

    /// Look up a project descriptor by name
    pub fn get(&self, project: &str) -> Option<&ProjectDescriptor> {
        self.projects.get(project)
    }

    /// All registered projects, in name order
    pub fn projects(&self) -> impl Iterator<Item = &ProjectDescriptor> {
        self.projects.values()
    }

    /// Number of registered projects
    pub fn len(&self) -> usize {
        self.projects.len()
    }

    /// Whether the registry has no projects
    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }
}
