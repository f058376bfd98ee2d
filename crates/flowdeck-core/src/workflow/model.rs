//! Workflow domain models.
//!
//! A `Workflow` is a named, orderable sequence of automation steps
//! ("nodes") that can be toggled active/inactive and executed on demand.
//! An `Execution` is one recorded attempt to run a workflow. Workflows use
//! camelCase timestamp keys on the wire to match the remote API's JSON
//! shape; executions are local records and stay snake_case.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Number of execution records retained in the local log. Oldest entries
/// are evicted first.
pub const EXECUTION_LOG_CAP: usize = 10;

/// One automation step inside a workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowNode {
    pub id: String,
    /// Node type identifier as the remote API reports it
    /// (e.g. "trigger", "email", "http").
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
}

impl WorkflowNode {
    pub fn new(
        id: impl Into<String>,
        kind: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
            name: name.into(),
        }
    }
}

/// A named automation workflow. `id` is unique within the owning user's
/// list; `updated_at` is refreshed on every mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workflow {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub nodes: Vec<WorkflowNode>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl Workflow {
    /// Creates a workflow from user-supplied fields with a generated id.
    ///
    /// Defaults: inactive, no nodes, both timestamps set to now.
    pub fn create(fields: NewWorkflow) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: fields.name,
            description: fields.description.unwrap_or_default(),
            active: fields.active.unwrap_or(false),
            nodes: fields.nodes.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Merges the supplied fields over this workflow and refreshes
    /// `updated_at`.
    pub fn apply(&mut self, update: WorkflowUpdate) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(active) = update.active {
            self.active = active;
        }
        if let Some(nodes) = update.nodes {
            self.nodes = nodes;
        }
        self.updated_at = Utc::now();
    }
}

/// Fields supplied when creating a workflow.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewWorkflow {
    pub name: String,
    pub description: Option<String>,
    pub active: Option<bool>,
    pub nodes: Option<Vec<WorkflowNode>>,
}

/// Partial workflow update. `None` means "leave unchanged".
#[derive(Debug, Clone, Default)]
pub struct WorkflowUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub active: Option<bool>,
    pub nodes: Option<Vec<WorkflowNode>>,
}

/// Terminal or in-progress status of one execution attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionStatus {
    Success,
    Failed,
    Running,
}

/// One recorded attempt to run a workflow.
///
/// Carries a denormalized snapshot of the workflow name so the log stays
/// readable after the workflow itself is renamed or deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Execution {
    pub id: String,
    pub workflow_id: String,
    pub workflow_name: String,
    pub status: ExecutionStatus,
    pub created_at: DateTime<Utc>,
}

impl Execution {
    /// Records an execution attempt against `workflow` with the given
    /// outcome.
    pub fn record(workflow: &Workflow, status: ExecutionStatus) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            workflow_id: workflow.id.clone(),
            workflow_name: workflow.name.clone(),
            status,
            created_at: Utc::now(),
        }
    }
}
