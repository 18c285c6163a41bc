//! Cross-version test orchestration
//!
//! The orchestrator gates generation on the opt-in registry and an
//! exclusion list, wires the source partition and fixture dependency for
//! opted-in projects, then runs the quick-feedback and aggregate
//! generators against an explicit task-graph handle. One `configure`
//! call per project configuration pass.

use std::collections::BTreeSet;

use thiserror::Error;
use tracing::{debug, info, instrument};

use retrograde_core::{
    ConfigError, ExecutionStrategy, OptInRegistry, OrchestratorConfig, VersionCatalog,
};

use crate::aggregates::{self, AggregateTasks};
use crate::graph::{GraphError, ProjectTaskGraph};
use crate::quick_feedback;

/// Source partition holding cross-version test code
pub const CROSS_VERSION_SOURCE_PARTITION: &str = "crossVersionTest";

/// Errors during orchestration
#[derive(Debug, Error)]
pub enum OrchestrationError {
    /// The shared-fixture companion project is not part of the build
    #[error(
        "Project '{project}' requires test fixtures from companion project \
         '{companion}', which is not in the project registry"
    )]
    MissingCompanion { project: String, companion: String },

    /// Task graph assembly failed
    #[error("Failed to assemble the task graph for project '{project}': {source}")]
    Graph {
        project: String,
        #[source]
        source: GraphError,
    },
}

/// Tunable orchestrator behavior.
///
/// The defaults reproduce stock behavior: the two infrastructure
/// projects that merely host the plugin mechanism are excluded,
/// quick-feedback tasks cover every strategy, and shared fixtures come
/// from the tooling API project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrchestratorOptions {
    /// Projects that never get a cross-version task graph, regardless of
    /// their registry flag
    pub excluded_projects: BTreeSet<String>,

    /// Strategies to generate quick-feedback tasks for
    pub quick_feedback_strategies: Vec<ExecutionStrategy>,

    /// Project supplying the shared test-fixture artifact
    pub fixture_companion: String,
}

impl Default for OrchestratorOptions {
    fn default() -> Self {
        Self {
            excluded_projects: BTreeSet::from([
                "gradle-kotlin-dsl-accessors".to_string(),
                "test".to_string(),
            ]),
            quick_feedback_strategies: ExecutionStrategy::all().to_vec(),
            fixture_companion: "tooling-api".to_string(),
        }
    }
}

impl OrchestratorOptions {
    /// Build options from the string-level tool configuration
    pub fn from_config(config: &OrchestratorConfig) -> Result<Self, ConfigError> {
        let mut strategies = Vec::with_capacity(config.quick_feedback_strategies.len());
        for name in &config.quick_feedback_strategies {
            let strategy = name
                .parse::<ExecutionStrategy>()
                .map_err(|message| ConfigError::InvalidValue {
                    field: "orchestrator.quick_feedback_strategies".to_string(),
                    message,
                })?;
            strategies.push(strategy);
        }

        Ok(Self {
            excluded_projects: config.excluded_projects.iter().cloned().collect(),
            quick_feedback_strategies: strategies,
            fixture_companion: config.fixture_companion.clone(),
        })
    }
}

/// What `configure` did for a project
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigureOutcome {
    /// Project is on the exclusion list; nothing was generated
    Excluded,
    /// Registry does not enable cross-version tests for this project
    Disabled,
    /// The task graph was generated
    Configured {
        /// Quick-feedback task names, in strategy order
        quick_feedback: Vec<String>,
        /// Aggregate entry-point names
        aggregates: AggregateTasks,
    },
}

/// Orchestrates cross-version test generation for one build.
///
/// Holds an immutable snapshot of the registry and catalog; every
/// `configure` call reads the same data, so repeated configuration of
/// the same project produces a structurally identical graph.
#[derive(Debug)]
pub struct Orchestrator<'a> {
    registry: &'a OptInRegistry,
    catalog: Option<&'a VersionCatalog>,
    options: OrchestratorOptions,
}

impl<'a> Orchestrator<'a> {
    /// Create an orchestrator with default options
    pub fn new(registry: &'a OptInRegistry, catalog: Option<&'a VersionCatalog>) -> Self {
        Self {
            registry,
            catalog,
            options: OrchestratorOptions::default(),
        }
    }

    /// Override the orchestrator options
    pub fn with_options(mut self, options: OrchestratorOptions) -> Self {
        self.options = options;
        self
    }

    /// Configure cross-version testing for the project the graph belongs to.
    ///
    /// Exclusion and registry checks gate all generation. For opted-in
    /// projects this registers the cross-version source partition,
    /// declares the fixture dependency on the companion project, then
    /// runs the quick-feedback and aggregate generators.
    #[instrument(skip_all, fields(project = %graph.project()))]
    pub fn configure(
        &self,
        graph: &mut ProjectTaskGraph,
    ) -> Result<ConfigureOutcome, OrchestrationError> {
        let project = graph.project().to_string();

        if self.options.excluded_projects.contains(&project) {
            debug!("project is excluded from cross-version testing");
            return Ok(ConfigureOutcome::Excluded);
        }
        if !self.registry.is_enabled(&project) {
            debug!("cross-version tests not enabled in registry");
            return Ok(ConfigureOutcome::Disabled);
        }

        graph.register_source_partition(CROSS_VERSION_SOURCE_PARTITION);

        if !self.registry.contains(&self.options.fixture_companion) {
            return Err(OrchestrationError::MissingCompanion {
                project,
                companion: self.options.fixture_companion.clone(),
            });
        }
        graph.declare_fixture_dependency(
            CROSS_VERSION_SOURCE_PARTITION,
            &self.options.fixture_companion,
        );

        let wrap = |source| OrchestrationError::Graph {
            project: project.clone(),
            source,
        };
        let quick_feedback =
            quick_feedback::generate(&self.options.quick_feedback_strategies, self.catalog, graph)
                .map_err(wrap)?;
        let aggregates = aggregates::generate(self.catalog, graph).map_err(wrap)?;

        info!(
            tasks = graph.len(),
            versions = self.catalog.map_or(0, VersionCatalog::len),
            "cross-version test tasks configured"
        );

        Ok(ConfigureOutcome::Configured {
            quick_feedback,
            aggregates,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregates::{ALL_VERSIONS_ALIAS, ALL_VERSIONS_TASKS, QUICK_FEEDBACK_TASKS};
    use crate::graph::VERIFICATION_TASK;
    use retrograde_core::{ProjectDescriptor, ReleasedVersion};

    fn sample_registry() -> OptInRegistry {
        OptInRegistry::new(vec![
            ProjectDescriptor::new("core-api").with_cross_version_tests(true),
            ProjectDescriptor::new("docs"),
            ProjectDescriptor::new("tooling-api"),
            ProjectDescriptor::new("test").with_cross_version_tests(true),
        ])
        .unwrap()
    }

    fn sample_catalog() -> VersionCatalog {
        VersionCatalog::from_versions(vec![
            ReleasedVersion::new("6.4")
                .with_main_tested(true)
                .with_lowest_tested(true),
            ReleasedVersion::new("7.2"),
            ReleasedVersion::new("8.0").with_main_tested(true),
        ])
        .unwrap()
    }

    #[test]
    fn test_configures_opted_in_project() {
        let registry = sample_registry();
        let catalog = sample_catalog();
        let orchestrator = Orchestrator::new(&registry, Some(&catalog));
        let mut graph = ProjectTaskGraph::new("core-api");

        let outcome = orchestrator.configure(&mut graph).unwrap();
        let ConfigureOutcome::Configured {
            quick_feedback,
            aggregates,
        } = outcome
        else {
            panic!("expected configured outcome");
        };

        assert_eq!(
            quick_feedback,
            vec!["embeddedCrossVersionTest", "forkingCrossVersionTest"]
        );
        assert_eq!(aggregates.all_versions, ALL_VERSIONS_TASKS);

        // check + 2 quick feedback + 3 aggregates + 3 version tasks
        assert_eq!(graph.len(), 9);
        assert!(graph
            .source_partitions()
            .contains(CROSS_VERSION_SOURCE_PARTITION));
        assert_eq!(graph.fixture_dependencies().len(), 1);
        assert!(graph
            .dependencies_of(VERIFICATION_TASK)
            .contains("embeddedCrossVersionTest"));
    }

    #[test]
    fn test_disabled_project_generates_nothing() {
        let registry = sample_registry();
        let catalog = sample_catalog();
        let orchestrator = Orchestrator::new(&registry, Some(&catalog));
        let mut graph = ProjectTaskGraph::new("docs");

        let outcome = orchestrator.configure(&mut graph).unwrap();

        assert_eq!(outcome, ConfigureOutcome::Disabled);
        assert!(graph.is_empty());
        assert!(graph.source_partitions().is_empty());
    }

    #[test]
    fn test_unknown_project_is_disabled() {
        let registry = sample_registry();
        let orchestrator = Orchestrator::new(&registry, None);
        let mut graph = ProjectTaskGraph::new("unknown");

        assert_eq!(
            orchestrator.configure(&mut graph).unwrap(),
            ConfigureOutcome::Disabled
        );
    }

    #[test]
    fn test_excluded_project_skipped_despite_registry_flag() {
        // "test" has the registry flag set but is on the default exclusion list
        let registry = sample_registry();
        let catalog = sample_catalog();
        let orchestrator = Orchestrator::new(&registry, Some(&catalog));
        let mut graph = ProjectTaskGraph::new("test");

        let outcome = orchestrator.configure(&mut graph).unwrap();

        assert_eq!(outcome, ConfigureOutcome::Excluded);
        assert!(graph.is_empty());
    }

    #[test]
    fn test_default_exclusions_cover_both_infrastructure_projects() {
        let registry = OptInRegistry::new(vec![
            ProjectDescriptor::new("gradle-kotlin-dsl-accessors").with_cross_version_tests(true),
            ProjectDescriptor::new("tooling-api"),
        ])
        .unwrap();
        let orchestrator = Orchestrator::new(&registry, None);
        let mut graph = ProjectTaskGraph::new("gradle-kotlin-dsl-accessors");

        assert_eq!(
            orchestrator.configure(&mut graph).unwrap(),
            ConfigureOutcome::Excluded
        );
    }

    #[test]
    fn test_missing_companion_is_fatal() {
        let registry = OptInRegistry::new(vec![
            ProjectDescriptor::new("core-api").with_cross_version_tests(true)
        ])
        .unwrap();
        let orchestrator = Orchestrator::new(&registry, None);
        let mut graph = ProjectTaskGraph::new("core-api");

        let err = orchestrator.configure(&mut graph).unwrap_err();
        assert!(matches!(
            err,
            OrchestrationError::MissingCompanion { project, companion }
                if project == "core-api" && companion == "tooling-api"
        ));
    }

    #[test]
    fn test_absent_catalog_still_generates_quick_feedback() {
        let registry = sample_registry();
        let orchestrator = Orchestrator::new(&registry, None);
        let mut graph = ProjectTaskGraph::new("core-api");

        let outcome = orchestrator.configure(&mut graph).unwrap();
        let ConfigureOutcome::Configured { quick_feedback, .. } = outcome else {
            panic!("expected configured outcome");
        };

        assert_eq!(quick_feedback.len(), 2);
        assert!(graph.dependencies_of(ALL_VERSIONS_TASKS).is_empty());
        assert!(graph.dependencies_of(QUICK_FEEDBACK_TASKS).is_empty());
        assert!(graph
            .dependencies_of(ALL_VERSIONS_ALIAS)
            .contains(ALL_VERSIONS_TASKS));
    }

    #[test]
    fn test_configure_is_idempotent() {
        let registry = sample_registry();
        let catalog = sample_catalog();
        let orchestrator = Orchestrator::new(&registry, Some(&catalog));

        let mut once = ProjectTaskGraph::new("core-api");
        orchestrator.configure(&mut once).unwrap();

        let mut twice = ProjectTaskGraph::new("core-api");
        orchestrator.configure(&mut twice).unwrap();
        orchestrator.configure(&mut twice).unwrap();

        assert_eq!(once.len(), twice.len());
        for (name, node) in once.nodes() {
            let other = twice.get(name).expect("task missing after reconfiguration");
            assert_eq!(node, other);
        }
        assert_eq!(once.fixture_dependencies(), twice.fixture_dependencies());
        assert_eq!(once.source_partitions(), twice.source_partitions());
    }

    #[test]
    fn test_options_from_config() {
        let mut config = OrchestratorConfig::default();
        config.quick_feedback_strategies = vec!["forking".to_string()];
        config.excluded_projects = vec!["sandbox".to_string()];

        let options = OrchestratorOptions::from_config(&config).unwrap();
        assert_eq!(
            options.quick_feedback_strategies,
            vec![ExecutionStrategy::Forking]
        );
        assert!(options.excluded_projects.contains("sandbox"));
        assert!(!options.excluded_projects.contains("test"));
    }

    #[test]
    fn test_options_from_config_rejects_unknown_strategy() {
        let mut config = OrchestratorConfig::default();
        config.quick_feedback_strategies = vec!["inline".to_string()];

        assert!(OrchestratorOptions::from_config(&config).is_err());
    }

    #[test]
    fn test_custom_exclusions_replace_defaults() {
        let registry = sample_registry();
        let options = OrchestratorOptions {
            excluded_projects: BTreeSet::from(["core-api".to_string()]),
            ..OrchestratorOptions::default()
        };
        let orchestrator = Orchestrator::new(&registry, None).with_options(options);

        let mut graph = ProjectTaskGraph::new("core-api");
        assert_eq!(
            orchestrator.configure(&mut graph).unwrap(),
            ConfigureOutcome::Excluded
        );

        // "test" is no longer excluded, but it is enabled in the registry,
        // so it now gets a graph
        let mut test_graph = ProjectTaskGraph::new("test");
        let options = OrchestratorOptions {
            excluded_projects: BTreeSet::from(["core-api".to_string()]),
            ..OrchestratorOptions::default()
        };
        let orchestrator = Orchestrator::new(&registry, None).with_options(options);
        assert!(matches!(
            orchestrator.configure(&mut test_graph).unwrap(),
            ConfigureOutcome::Configured { .. }
        ));
    }
}
