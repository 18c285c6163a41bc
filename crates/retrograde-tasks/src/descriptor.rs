//! Test task descriptors and their builder

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use retrograde_core::ExecutionStrategy;

/// Compilation target level for generated cross-version test code.
///
/// Test code must stay loadable by the oldest client runtime still tested
/// against, which predates the level used for production code.
pub const CLIENT_COMPAT_TARGET_LEVEL: u32 = 8;

/// The only test engine allowed to run inside cross-version test tasks.
/// Restricting the engine keeps unrelated test code out of
/// version-restricted runs.
pub const CROSS_VERSION_ENGINE: &str = "cross-version-test-engine";

/// System property marking a run as a cross-version run
pub const PROP_CROSS_VERSION_ACTIVE: &str = "crossVersion.active";

/// System property carrying the lowest-tested version label
pub const PROP_LOWEST_TESTED_VERSION: &str = "crossVersion.lowestTestedVersion";

/// System property restricting a run to specific released versions
pub const PROP_TARGET_VERSIONS: &str = "crossVersion.targetVersions";

const TASK_NAME_SUFFIX: &str = "CrossVersionTest";
const RELEASED_TASK_PREFIX: &str = "gradle";

/// What a generated test task runs against
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetVersion {
    /// The in-development code, exercised against itself via the client path
    Latest,
    /// A specific released version from the catalog
    Released(String),
}

impl TargetVersion {
    /// The version label used in system properties and descriptions
    pub fn label(&self) -> &str {
        match self {
            Self::Latest => "latest",
            Self::Released(version) => version,
        }
    }
}

impl fmt::Display for TargetVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Derive the task name for a strategy/target combination.
///
/// Quick-feedback tasks are named after the strategy
/// (`embeddedCrossVersionTest`); version-specific tasks after the version
/// label (`gradle6.4CrossVersionTest`). Names are stable across repeated
/// generation.
pub fn task_name(strategy: ExecutionStrategy, target: &TargetVersion) -> String {
    match target {
        TargetVersion::Latest => format!("{}{}", strategy.as_str(), TASK_NAME_SUFFIX),
        TargetVersion::Released(version) => {
            format!("{}{}{}", RELEASED_TASK_PREFIX, version, TASK_NAME_SUFFIX)
        }
    }
}

/// Fully configured specification of one cross-version test task.
///
/// Built once by `TestTaskSpec`, then handed read-only to the
/// task-execution substrate; never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestTaskDescriptor {
    /// Stable task name
    pub name: String,

    /// Process model for the run
    pub strategy: ExecutionStrategy,

    /// Version the run is exercised against
    pub target: TargetVersion,

    /// Human-readable description
    pub description: String,

    /// System properties set on the test process
    pub system_properties: BTreeMap<String, String>,

    /// Target level for compiling the shared test code
    pub compilation_target_level: u32,

    /// Test engines allowed to run inside this task
    pub engine_filter: BTreeSet<String>,
}

/// Builder for `TestTaskDescriptor`.
///
/// Pure and idempotent: building the same spec twice yields identical
/// descriptors.
#[derive(Debug, Clone)]
pub struct TestTaskSpec {
    strategy: ExecutionStrategy,
    target: TargetVersion,
    lowest_tested: Option<String>,
    extra_properties: BTreeMap<String, String>,
    description: Option<String>,
}

impl TestTaskSpec {
    /// Create a spec for the given strategy and target
    pub fn new(strategy: ExecutionStrategy, target: TargetVersion) -> Self {
        Self {
            strategy,
            target,
            lowest_tested: None,
            extra_properties: BTreeMap::new(),
            description: None,
        }
    }

    /// Propagate the lowest-tested version label from the catalog
    pub fn with_lowest_tested(mut self, version: impl Into<String>) -> Self {
        self.lowest_tested = Some(version.into());
        self
    }

    /// Add an extra system property
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_properties.insert(key.into(), value.into());
        self
    }

    /// Set the task description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Build the descriptor
    pub fn build(self) -> TestTaskDescriptor {
        let name = task_name(self.strategy, &self.target);

        let mut system_properties = self.extra_properties;
        system_properties.insert(PROP_CROSS_VERSION_ACTIVE.to_string(), "true".to_string());
        if let Some(lowest) = self.lowest_tested {
            system_properties.insert(PROP_LOWEST_TESTED_VERSION.to_string(), lowest);
        }
        if let TargetVersion::Released(version) = &self.target {
            system_properties.insert(PROP_TARGET_VERSIONS.to_string(), version.clone());
        }

        let description = self.description.unwrap_or_else(|| match &self.target {
            TargetVersion::Latest => format!(
                "Runs the cross-version tests against the in-development version with the '{}' strategy",
                self.strategy
            ),
            TargetVersion::Released(version) => {
                format!("Runs the cross-version tests against version {}", version)
            }
        });

        TestTaskDescriptor {
            name,
            strategy: self.strategy,
            target: self.target,
            description,
            system_properties,
            compilation_target_level: CLIENT_COMPAT_TARGET_LEVEL,
            engine_filter: BTreeSet::from([CROSS_VERSION_ENGINE.to_string()]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latest_task_name_from_strategy() {
        assert_eq!(
            task_name(ExecutionStrategy::Embedded, &TargetVersion::Latest),
            "embeddedCrossVersionTest"
        );
        assert_eq!(
            task_name(ExecutionStrategy::Forking, &TargetVersion::Latest),
            "forkingCrossVersionTest"
        );
    }

    #[test]
    fn test_released_task_name_from_version_label() {
        let target = TargetVersion::Released("6.4".to_string());
        assert_eq!(
            task_name(ExecutionStrategy::Forking, &target),
            "gradle6.4CrossVersionTest"
        );
    }

    #[test]
    fn test_latest_sets_no_version_restriction() {
        let descriptor =
            TestTaskSpec::new(ExecutionStrategy::Embedded, TargetVersion::Latest).build();

        assert_eq!(
            descriptor.system_properties.get(PROP_CROSS_VERSION_ACTIVE),
            Some(&"true".to_string())
        );
        assert!(!descriptor
            .system_properties
            .contains_key(PROP_TARGET_VERSIONS));
        assert!(!descriptor
            .system_properties
            .contains_key(PROP_LOWEST_TESTED_VERSION));
    }

    #[test]
    fn test_released_sets_version_restriction() {
        let descriptor = TestTaskSpec::new(
            ExecutionStrategy::Forking,
            TargetVersion::Released("7.2".to_string()),
        )
        .with_lowest_tested("6.4")
        .build();

        assert_eq!(
            descriptor.system_properties.get(PROP_TARGET_VERSIONS),
            Some(&"7.2".to_string())
        );
        assert_eq!(
            descriptor.system_properties.get(PROP_LOWEST_TESTED_VERSION),
            Some(&"6.4".to_string())
        );
    }

    #[test]
    fn test_compat_level_and_engine_filter_are_fixed() {
        let descriptor = TestTaskSpec::new(
            ExecutionStrategy::Forking,
            TargetVersion::Released("8.0".to_string()),
        )
        .build();

        assert_eq!(
            descriptor.compilation_target_level,
            CLIENT_COMPAT_TARGET_LEVEL
        );
        assert_eq!(descriptor.engine_filter.len(), 1);
        assert!(descriptor.engine_filter.contains(CROSS_VERSION_ENGINE));
    }

    #[test]
    fn test_extra_properties_do_not_override_baseline() {
        let descriptor = TestTaskSpec::new(ExecutionStrategy::Embedded, TargetVersion::Latest)
            .with_property(PROP_CROSS_VERSION_ACTIVE, "false")
            .with_property("custom.flag", "on")
            .build();

        assert_eq!(
            descriptor.system_properties.get(PROP_CROSS_VERSION_ACTIVE),
            Some(&"true".to_string())
        );
        assert_eq!(
            descriptor.system_properties.get("custom.flag"),
            Some(&"on".to_string())
        );
    }

    #[test]
    fn test_build_is_deterministic() {
        let spec = TestTaskSpec::new(
            ExecutionStrategy::Forking,
            TargetVersion::Released("6.4".to_string()),
        )
        .with_lowest_tested("6.4");

        assert_eq!(spec.clone().build(), spec.build());
    }
}
