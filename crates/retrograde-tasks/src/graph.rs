//! Declarative per-project task graph
//!
//! The graph is the write-capable registration interface handed to the
//! generators: named task nodes (test tasks carrying a descriptor, or
//! aggregate tasks with no work of their own), dependency edges, source
//! partitions, and fixture-dependency declarations. It only *declares*
//! structure; scheduling and execution belong to the task-execution
//! substrate.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::descriptor::TestTaskDescriptor;

/// Name of the umbrella verification task every project graph starts with
pub const VERIFICATION_TASK: &str = "check";

/// Task grouping shown by task-listing tooling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskGroup {
    /// Verification tasks run as part of standard checks
    Verification,
    /// Entry points driven by CI pipelines
    CiLifecycle,
}

impl TaskGroup {
    /// Returns the string representation of the group
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Verification => "verification",
            Self::CiLifecycle => "ci lifecycle",
        }
    }
}

/// What a task node carries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TaskPayload {
    /// Executable test task
    Test(TestTaskDescriptor),
    /// No executable work, only dependency edges
    Aggregate,
}

/// A node in the task graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskNode {
    /// Task name, unique within the project
    pub name: String,
    /// Human-readable description
    pub description: String,
    /// Task group, when advertised by listing tooling
    pub group: Option<TaskGroup>,
    /// Test descriptor or aggregate marker
    pub payload: TaskPayload,
    /// Names of tasks that must run before this one
    pub dependencies: BTreeSet<String>,
}

/// A declared dependency on another project's shared test fixtures
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FixtureDependency {
    /// Source partition consuming the fixtures
    pub partition: String,
    /// Project supplying the fixture artifact
    pub companion: String,
}

/// Errors during graph assembly
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    /// A task name was reused with a different configuration
    #[error("Task '{0}' is already registered with a different configuration")]
    TaskRedefinition(String),

    /// A dependency edge references an unregistered task
    #[error("Unknown task '{0}' referenced in dependency edge")]
    UnknownTask(String),
}

/// Declarative task graph for a single project configuration pass.
///
/// All collections are ordered, so two passes over the same inputs
/// produce structurally identical graphs. Registration is idempotent:
/// re-registering a task with an identical configuration is a no-op,
/// while reusing a name for something different is an error.
#[derive(Debug, Clone)]
pub struct ProjectTaskGraph {
    project: String,
    nodes: BTreeMap<String, TaskNode>,
    source_partitions: BTreeSet<String>,
    fixture_dependencies: BTreeSet<FixtureDependency>,
}

impl ProjectTaskGraph {
    /// Create a graph for the named project, seeded with the umbrella
    /// verification task
    pub fn new(project: impl Into<String>) -> Self {
        let mut nodes = BTreeMap::new();
        nodes.insert(
            VERIFICATION_TASK.to_string(),
            TaskNode {
                name: VERIFICATION_TASK.to_string(),
                description: "Runs all checks".to_string(),
                group: Some(TaskGroup::Verification),
                payload: TaskPayload::Aggregate,
                dependencies: BTreeSet::new(),
            },
        );

        Self {
            project: project.into(),
            nodes,
            source_partitions: BTreeSet::new(),
            fixture_dependencies: BTreeSet::new(),
        }
    }

    /// Name of the project this graph belongs to
    pub fn project(&self) -> &str {
        &self.project
    }

    /// Register an executable test task from its descriptor
    pub fn register_test_task(&mut self, descriptor: TestTaskDescriptor) -> Result<(), GraphError> {
        let node = TaskNode {
            name: descriptor.name.clone(),
            description: descriptor.description.clone(),
            group: Some(TaskGroup::Verification),
            payload: TaskPayload::Test(descriptor),
            dependencies: BTreeSet::new(),
        };
        self.insert_node(node)
    }

    /// Register an aggregate task: no work, only dependency edges
    pub fn register_aggregate(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        group: TaskGroup,
    ) -> Result<(), GraphError> {
        let name = name.into();
        let node = TaskNode {
            name: name.clone(),
            description: description.into(),
            group: Some(group),
            payload: TaskPayload::Aggregate,
            dependencies: BTreeSet::new(),
        };
        self.insert_node(node)
    }

    fn insert_node(&mut self, node: TaskNode) -> Result<(), GraphError> {
        if let Some(existing) = self.nodes.get(&node.name) {
            // Re-registration is only valid when nothing but the (mutable)
            // dependency set differs.
            let same = existing.payload == node.payload
                && existing.description == node.description
                && existing.group == node.group;
            if !same {
                return Err(GraphError::TaskRedefinition(node.name));
            }
            return Ok(());
        }

        debug!(project = %self.project, task = %node.name, "task registered");
        self.nodes.insert(node.name.clone(), node);
        Ok(())
    }

    /// Add a dependency edge: `task` will not run before `depends_on`.
    ///
    /// Both endpoints must already be registered; adding the same edge
    /// twice is a no-op.
    pub fn add_dependency(&mut self, task: &str, depends_on: &str) -> Result<(), GraphError> {
        if !self.nodes.contains_key(depends_on) {
            return Err(GraphError::UnknownTask(depends_on.to_string()));
        }
        let node = self
            .nodes
            .get_mut(task)
            .ok_or_else(|| GraphError::UnknownTask(task.to_string()))?;
        node.dependencies.insert(depends_on.to_string());
        Ok(())
    }

    /// Register a dedicated source partition (e.g. for cross-version test code)
    pub fn register_source_partition(&mut self, name: impl Into<String>) {
        self.source_partitions.insert(name.into());
    }

    /// Declare that a source partition consumes another project's test fixtures
    pub fn declare_fixture_dependency(
        &mut self,
        partition: impl Into<String>,
        companion: impl Into<String>,
    ) {
        self.fixture_dependencies.insert(FixtureDependency {
            partition: partition.into(),
            companion: companion.into(),
        });
    }

    /// Get a task node by name
    pub fn get(&self, name: &str) -> Option<&TaskNode> {
        self.nodes.get(name)
    }

    /// All task nodes, keyed by name
    pub fn nodes(&self) -> &BTreeMap<String, TaskNode> {
        &self.nodes
    }

    /// Dependency names of a task, empty if the task is unknown
    pub fn dependencies_of(&self, name: &str) -> BTreeSet<String> {
        self.nodes
            .get(name)
            .map(|n| n.dependencies.clone())
            .unwrap_or_default()
    }

    /// Registered source partitions
    pub fn source_partitions(&self) -> &BTreeSet<String> {
        &self.source_partitions
    }

    /// Declared fixture dependencies
    pub fn fixture_dependencies(&self) -> &BTreeSet<FixtureDependency> {
        &self.fixture_dependencies
    }

    /// Total number of tasks, including the seeded umbrella task
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the graph holds only the seeded umbrella task
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    /// Get a human-readable summary of the generated graph
    pub fn execution_plan(&self) -> String {
        let mut plan = String::new();
        plan.push_str(&format!("Project {} ({} tasks):\n", self.project, self.len()));
        for node in self.nodes.values() {
            let kind = match &node.payload {
                TaskPayload::Test(d) => format!("test against {}", d.target),
                TaskPayload::Aggregate => "aggregate".to_string(),
            };
            if node.dependencies.is_empty() {
                plan.push_str(&format!("  {} [{}]\n", node.name, kind));
            } else {
                let deps: Vec<&str> = node.dependencies.iter().map(String::as_str).collect();
                plan.push_str(&format!(
                    "  {} [{}] (after: {})\n",
                    node.name,
                    kind,
                    deps.join(", ")
                ));
            }
        }
        plan
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{TargetVersion, TestTaskSpec};
    use retrograde_core::ExecutionStrategy;

    fn sample_descriptor() -> TestTaskDescriptor {
        TestTaskSpec::new(ExecutionStrategy::Embedded, TargetVersion::Latest).build()
    }

    #[test]
    fn test_new_graph_seeds_verification_task() {
        let graph = ProjectTaskGraph::new("core-api");

        assert!(graph.is_empty());
        assert_eq!(graph.len(), 1);
        let check = graph.get(VERIFICATION_TASK).unwrap();
        assert_eq!(check.payload, TaskPayload::Aggregate);
    }

    #[test]
    fn test_register_and_wire() {
        let mut graph = ProjectTaskGraph::new("core-api");
        let descriptor = sample_descriptor();
        let name = descriptor.name.clone();

        graph.register_test_task(descriptor).unwrap();
        graph.add_dependency(VERIFICATION_TASK, &name).unwrap();

        assert!(graph.dependencies_of(VERIFICATION_TASK).contains(&name));
    }

    #[test]
    fn test_identical_reregistration_is_noop() {
        let mut graph = ProjectTaskGraph::new("core-api");

        graph.register_test_task(sample_descriptor()).unwrap();
        graph.register_test_task(sample_descriptor()).unwrap();

        assert_eq!(graph.len(), 2);
    }

    #[test]
    fn test_conflicting_reregistration_is_error() {
        let mut graph = ProjectTaskGraph::new("core-api");
        graph.register_test_task(sample_descriptor()).unwrap();

        let conflicting = TestTaskSpec::new(ExecutionStrategy::Embedded, TargetVersion::Latest)
            .with_property("custom.flag", "on")
            .build();

        assert!(matches!(
            graph.register_test_task(conflicting),
            Err(GraphError::TaskRedefinition(_))
        ));
    }

    #[test]
    fn test_dependency_on_unknown_task_is_error() {
        let mut graph = ProjectTaskGraph::new("core-api");

        assert!(matches!(
            graph.add_dependency(VERIFICATION_TASK, "missing"),
            Err(GraphError::UnknownTask(_))
        ));
        assert!(matches!(
            graph.add_dependency("missing", VERIFICATION_TASK),
            Err(GraphError::UnknownTask(_))
        ));
    }

    #[test]
    fn test_duplicate_edge_is_noop() {
        let mut graph = ProjectTaskGraph::new("core-api");
        let descriptor = sample_descriptor();
        let name = descriptor.name.clone();
        graph.register_test_task(descriptor).unwrap();

        graph.add_dependency(VERIFICATION_TASK, &name).unwrap();
        graph.add_dependency(VERIFICATION_TASK, &name).unwrap();

        assert_eq!(graph.dependencies_of(VERIFICATION_TASK).len(), 1);
    }

    #[test]
    fn test_execution_plan_output() {
        let mut graph = ProjectTaskGraph::new("core-api");
        let descriptor = sample_descriptor();
        let name = descriptor.name.clone();
        graph.register_test_task(descriptor).unwrap();
        graph.add_dependency(VERIFICATION_TASK, &name).unwrap();

        let plan = graph.execution_plan();
        assert!(plan.contains("core-api"));
        assert!(plan.contains("embeddedCrossVersionTest"));
        assert!(plan.contains("after: embeddedCrossVersionTest"));
    }
}
