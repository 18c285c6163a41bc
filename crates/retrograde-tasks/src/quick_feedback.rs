//! Quick-feedback task generation
//!
//! One task per configured execution strategy, always targeting the
//! in-development code. The task for the default strategy is wired into
//! the umbrella verification task so every standard verification pass
//! exercises at least one cross-version configuration.
//!
//! Generation does not require the released-version catalog; when it is
//! absent the lowest-tested property is simply omitted.

use tracing::{debug, instrument};

use retrograde_core::{ExecutionStrategy, VersionCatalog};

use crate::descriptor::{TargetVersion, TestTaskSpec};
use crate::graph::{GraphError, ProjectTaskGraph, VERIFICATION_TASK};

/// Generate quick-feedback tasks for the given strategies.
///
/// Returns the generated task names in strategy order. An empty strategy
/// set generates nothing and wires nothing.
#[instrument(skip_all, fields(project = %graph.project(), strategies = strategies.len()))]
pub fn generate(
    strategies: &[ExecutionStrategy],
    catalog: Option<&VersionCatalog>,
    graph: &mut ProjectTaskGraph,
) -> Result<Vec<String>, GraphError> {
    let lowest_tested = catalog
        .and_then(VersionCatalog::lowest_tested_version)
        .map(|v| v.version.clone());

    let mut names = Vec::with_capacity(strategies.len());
    for strategy in strategies {
        let mut spec = TestTaskSpec::new(*strategy, TargetVersion::Latest);
        if let Some(lowest) = &lowest_tested {
            spec = spec.with_lowest_tested(lowest);
        }

        let descriptor = spec.build();
        let name = descriptor.name.clone();
        graph.register_test_task(descriptor)?;

        // Only the default strategy runs with the standard verification
        // pipeline; the others stay discoverable by name.
        if strategy.is_default() {
            graph.add_dependency(VERIFICATION_TASK, &name)?;
        }

        names.push(name);
    }

    debug!(tasks = names.len(), "quick-feedback tasks generated");
    Ok(names)
}
