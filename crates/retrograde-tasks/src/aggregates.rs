//! Aggregate task generation
//!
//! One forking test task per catalog version, grouped by two named
//! aggregate tasks: one covering every tested version and one covering
//! only the representative "main" subset. Both aggregates exist even
//! when there is no catalog data, so downstream automation can reference
//! them unconditionally.

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use retrograde_core::{ExecutionStrategy, VersionCatalog};

use crate::descriptor::{TargetVersion, TestTaskSpec};
use crate::graph::{GraphError, ProjectTaskGraph, TaskGroup};

/// Aggregate over every tested version
pub const ALL_VERSIONS_TASKS: &str = "allVersionsCrossVersionTests";

/// Singular alias of `ALL_VERSIONS_TASKS`, kept for naming-scheme
/// compatibility with other generated aggregate families
pub const ALL_VERSIONS_ALIAS: &str = "allVersionsCrossVersionTest";

/// Aggregate over the main-tested subset
pub const QUICK_FEEDBACK_TASKS: &str = "quickFeedbackCrossVersionTests";

/// Names of the generated aggregate entry points
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateTasks {
    /// Aggregate depending on every version-specific task
    pub all_versions: String,
    /// Alias task depending only on `all_versions`
    pub all_versions_alias: String,
    /// Aggregate depending on the main-subset tasks
    pub quick_feedback: String,
}

/// Generate per-version tasks and the aggregate tasks grouping them.
///
/// With no catalog the aggregates are registered empty. Membership in the
/// quick-feedback aggregate is additive: a version's task is always added
/// to the all-versions aggregate first.
#[instrument(skip_all, fields(project = %graph.project(), versions = catalog.map_or(0, VersionCatalog::len)))]
pub fn generate(
    catalog: Option<&VersionCatalog>,
    graph: &mut ProjectTaskGraph,
) -> Result<AggregateTasks, GraphError> {
    graph.register_aggregate(
        ALL_VERSIONS_TASKS,
        "Runs the cross-version tests against all released versions with the 'forking' strategy",
        TaskGroup::Verification,
    )?;
    graph.register_aggregate(
        QUICK_FEEDBACK_TASKS,
        "Runs the cross-version tests against a subset of selected released versions for quick feedback",
        TaskGroup::Verification,
    )?;
    graph.register_aggregate(
        ALL_VERSIONS_ALIAS,
        "Runs the cross-version tests against all released versions (latest patch release of each)",
        TaskGroup::CiLifecycle,
    )?;
    graph.add_dependency(ALL_VERSIONS_ALIAS, ALL_VERSIONS_TASKS)?;

    let aggregates = AggregateTasks {
        all_versions: ALL_VERSIONS_TASKS.to_string(),
        all_versions_alias: ALL_VERSIONS_ALIAS.to_string(),
        quick_feedback: QUICK_FEEDBACK_TASKS.to_string(),
    };

    let Some(catalog) = catalog else {
        debug!("no released-version data, aggregates left empty");
        return Ok(aggregates);
    };

    let lowest_tested = catalog.lowest_tested_version().map(|v| v.version.clone());

    for released in catalog.all_tested_versions() {
        let mut spec = TestTaskSpec::new(
            ExecutionStrategy::Forking,
            TargetVersion::Released(released.version.clone()),
        );
        if let Some(lowest) = &lowest_tested {
            spec = spec.with_lowest_tested(lowest);
        }

        let descriptor = spec.build();
        let name = descriptor.name.clone();
        graph.register_test_task(descriptor)?;

        graph.add_dependency(ALL_VERSIONS_TASKS, &name)?;
        if catalog.is_main_tested(&released.version) {
            graph.add_dependency(QUICK_FEEDBACK_TASKS, &name)?;
        }
    }

    debug!(
        all = graph.dependencies_of(ALL_VERSIONS_TASKS).len(),
        main = graph.dependencies_of(QUICK_FEEDBACK_TASKS).len(),
        "aggregate tasks generated"
    );
    Ok(aggregates)
}
