//! Retrograde Tasks - Cross-version test task generation
//!
//! This crate turns a released-version catalog and a project opt-in
//! registry into a declarative graph of cross-version test tasks:
//! quick-feedback tasks against the in-development code, one task per
//! released version, and named aggregate tasks grouping them.

pub mod aggregates;
pub mod descriptor;
pub mod graph;
pub mod orchestrator;
pub mod quick_feedback;

pub use aggregates::{AggregateTasks, ALL_VERSIONS_ALIAS, ALL_VERSIONS_TASKS, QUICK_FEEDBACK_TASKS};
pub use descriptor::{TargetVersion, TestTaskDescriptor, TestTaskSpec};
pub use graph::{
    FixtureDependency, GraphError, ProjectTaskGraph, TaskGroup, TaskNode, TaskPayload,
    VERIFICATION_TASK,
};
pub use orchestrator::{ConfigureOutcome, OrchestrationError, Orchestrator, OrchestratorOptions};
