//! Released-version catalog
//!
//! The catalog enumerates the historical releases that current code must
//! be tested against. It is supplied pre-computed; this module only loads
//! it, derives the lowest-tested/main-tested views, and enforces its
//! structural invariants. The catalog as a whole may be absent, which is
//! a valid "no data" state rather than an error.

use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{CatalogError, Result};

/// A single historical release of the platform under test
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleasedVersion {
    /// Version label (opaque identifier, e.g. "6.4" or "8.0.2")
    pub version: String,

    /// Whether this version belongs to the representative "main" subset
    #[serde(default)]
    pub is_main_tested: bool,

    /// Whether this is the lowest version still tested against
    #[serde(default)]
    pub is_lowest_tested: bool,
}

impl ReleasedVersion {
    /// Create a new released version with neither flag set
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            is_main_tested: false,
            is_lowest_tested: false,
        }
    }

    /// Mark this version as part of the main tested subset
    pub fn with_main_tested(mut self, main: bool) -> Self {
        self.is_main_tested = main;
        self
    }

    /// Mark this version as the lowest tested one
    pub fn with_lowest_tested(mut self, lowest: bool) -> Self {
        self.is_lowest_tested = lowest;
        self
    }
}

/// Ordered collection of released versions with derived views.
///
/// Invariants, checked at construction:
/// - version labels are unique and non-empty
/// - at most one version is flagged lowest-tested
///
/// The main-tested subset and the lowest-tested version are derived from
/// the per-version flags, so `main ⊆ all` and `lowest ∈ all` hold by
/// construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionCatalog {
    lowest_tested_version: Option<ReleasedVersion>,
    main_tested_versions: BTreeSet<String>,
    all_tested_versions: Vec<ReleasedVersion>,
}

impl VersionCatalog {
    /// Build a catalog from an ordered list of released versions
    pub fn from_versions(versions: Vec<ReleasedVersion>) -> Result<Self> {
        let mut seen: BTreeSet<String> = BTreeSet::new();
        let mut main_tested_versions: BTreeSet<String> = BTreeSet::new();
        let mut lowest_tested_version: Option<ReleasedVersion> = None;

        for released in &versions {
            if released.version.is_empty() {
                return Err(CatalogError::EmptyVersionLabel.into());
            }
            if !seen.insert(released.version.clone()) {
                return Err(CatalogError::DuplicateVersion(released.version.clone()).into());
            }
            if released.is_main_tested {
                main_tested_versions.insert(released.version.clone());
            }
            if released.is_lowest_tested {
                if let Some(existing) = &lowest_tested_version {
                    return Err(CatalogError::ConflictingLowestTested(
                        existing.version.clone(),
                        released.version.clone(),
                    )
                    .into());
                }
                lowest_tested_version = Some(released.clone());
            }
        }

        debug!(
            versions = versions.len(),
            main_tested = main_tested_versions.len(),
            "released-version catalog assembled"
        );

        Ok(Self {
            lowest_tested_version,
            main_tested_versions,
            all_tested_versions: versions,
        })
    }

    /// The lowest version still tested against, if the catalog names one
    pub fn lowest_tested_version(&self) -> Option<&ReleasedVersion> {
        self.lowest_tested_version.as_ref()
    }

    /// Labels of the representative "main" subset
    pub fn main_tested_versions(&self) -> &BTreeSet<String> {
        &self.main_tested_versions
    }

    /// All tested versions, in catalog order
    pub fn all_tested_versions(&self) -> &[ReleasedVersion] {
        &self.all_tested_versions
    }

    /// Whether the given label belongs to the main tested subset
    pub fn is_main_tested(&self, version: &str) -> bool {
        self.main_tested_versions.contains(version)
    }

    /// Number of tested versions
    pub fn len(&self) -> usize {
        self.all_tested_versions.len()
    }

    /// Whether the catalog contains no versions
    pub fn is_empty(&self) -> bool {
        self.all_tested_versions.is_empty()
    }
}

/// Load a released-version catalog from a JSON file.
///
/// The file is a JSON array of version descriptors; see `ReleasedVersion`.
pub fn load_catalog(path: &Path) -> Result<VersionCatalog> {
    info!(path = %path.display(), "loading released-version catalog");

    let content = std::fs::read_to_string(path).map_err(CatalogError::Io)?;
    let versions: Vec<ReleasedVersion> =
        serde_json::from_str(&content).map_err(CatalogError::Parse)?;

    VersionCatalog::from_versions(versions)
}

/// Load a catalog, treating a missing file as the valid "no data" state
pub fn load_catalog_optional(path: &Path) -> Result<Option<VersionCatalog>> {
    if !path.exists() {
        debug!(path = %path.display(), "no released-version data available");
        return Ok(None);
    }
    load_catalog(path).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RetrogradeError;
    use tempfile::TempDir;

    fn sample_versions() -> Vec<ReleasedVersion> {
        vec![
            ReleasedVersion::new("6.4").with_lowest_tested(true),
            ReleasedVersion::new("7.2"),
            ReleasedVersion::new("8.0").with_main_tested(true),
        ]
    }

    #[test]
    fn test_from_versions_derives_views() {
        let catalog = VersionCatalog::from_versions(sample_versions()).unwrap();

        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.lowest_tested_version().unwrap().version, "6.4");
        assert!(catalog.is_main_tested("8.0"));
        assert!(!catalog.is_main_tested("7.2"));
    }

    #[test]
    fn test_main_subset_of_all() {
        let catalog = VersionCatalog::from_versions(sample_versions()).unwrap();
        let all: BTreeSet<_> = catalog
            .all_tested_versions()
            .iter()
            .map(|v| v.version.clone())
            .collect();

        assert!(catalog.main_tested_versions().is_subset(&all));
    }

    #[test]
    fn test_preserves_catalog_order() {
        let catalog = VersionCatalog::from_versions(sample_versions()).unwrap();
        let labels: Vec<_> = catalog
            .all_tested_versions()
            .iter()
            .map(|v| v.version.as_str())
            .collect();

        assert_eq!(labels, vec!["6.4", "7.2", "8.0"]);
    }

    #[test]
    fn test_duplicate_version_rejected() {
        let versions = vec![ReleasedVersion::new("7.2"), ReleasedVersion::new("7.2")];

        let err = VersionCatalog::from_versions(versions).unwrap_err();
        assert!(matches!(
            err,
            RetrogradeError::Catalog(CatalogError::DuplicateVersion(v)) if v == "7.2"
        ));
    }

    #[test]
    fn test_conflicting_lowest_rejected() {
        let versions = vec![
            ReleasedVersion::new("6.4").with_lowest_tested(true),
            ReleasedVersion::new("6.5").with_lowest_tested(true),
        ];

        assert!(matches!(
            VersionCatalog::from_versions(versions).unwrap_err(),
            RetrogradeError::Catalog(CatalogError::ConflictingLowestTested(_, _))
        ));
    }

    #[test]
    fn test_empty_label_rejected() {
        let versions = vec![ReleasedVersion::new("")];

        assert!(matches!(
            VersionCatalog::from_versions(versions).unwrap_err(),
            RetrogradeError::Catalog(CatalogError::EmptyVersionLabel)
        ));
    }

    #[test]
    fn test_empty_catalog_is_valid() {
        let catalog = VersionCatalog::from_versions(Vec::new()).unwrap();

        assert!(catalog.is_empty());
        assert!(catalog.lowest_tested_version().is_none());
        assert!(catalog.main_tested_versions().is_empty());
    }

    #[test]
    fn test_load_catalog_json() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("released-versions.json");
        std::fs::write(
            &path,
            r#"[
                {"version": "6.4", "isLowestTested": true},
                {"version": "8.0", "isMainTested": true}
            ]"#,
        )
        .unwrap();

        let catalog = load_catalog(&path).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.lowest_tested_version().unwrap().version, "6.4");
        assert!(catalog.is_main_tested("8.0"));
    }

    #[test]
    fn test_load_catalog_malformed_is_fatal() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("released-versions.json");
        std::fs::write(&path, "{not json").unwrap();

        assert!(load_catalog(&path).is_err());
    }

    #[test]
    fn test_load_catalog_optional_missing_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("released-versions.json");

        assert!(load_catalog_optional(&path).unwrap().is_none());
    }
}
