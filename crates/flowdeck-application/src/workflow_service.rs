//! Workflow state container (local/demo variant).
//!
//! Owns the in-memory workflow list and the recent execution log. The
//! list is mirrored to the state store on every mutation (write-through,
//! no batching); running a workflow is delegated to the injected
//! execution backend. The API-backed counterpart lives in
//! `remote_workflow_service`.
//!
//! Mutations are persist-then-commit: the full updated list is written to
//! the store first and the in-memory list only replaced on success.

use std::collections::VecDeque;
use std::sync::{Arc, RwLock};

use serde_json::Value;

use flowdeck_core::error::{FlowdeckError, Result};
use flowdeck_core::store::{KEY_WORKFLOWS, StateStore, load_json, save_json};
use flowdeck_core::workflow::{
    EXECUTION_LOG_CAP, Execution, ExecutionBackend, NewWorkflow, Workflow, WorkflowNode,
    WorkflowUpdate,
};

#[derive(Default)]
struct WorkflowState {
    workflows: Vec<Workflow>,
    executions: VecDeque<Execution>,
}

/// Service owning the workflow list and execution log for the signed-in
/// user.
pub struct WorkflowService {
    store: Arc<dyn StateStore>,
    backend: Arc<dyn ExecutionBackend>,
    state: RwLock<WorkflowState>,
}

impl WorkflowService {
    pub fn new(store: Arc<dyn StateStore>, backend: Arc<dyn ExecutionBackend>) -> Self {
        Self {
            store,
            backend,
            state: RwLock::new(WorkflowState::default()),
        }
    }

    /// Loads the persisted workflow list, seeding the demo set when no
    /// list has ever been stored.
    pub async fn hydrate(&self) -> Result<()> {
        let persisted: Option<Vec<Workflow>> = load_json(self.store.as_ref(), KEY_WORKFLOWS)?;

        let workflows = match persisted {
            Some(workflows) => workflows,
            None => {
                let seeded = demo_workflows();
                save_json(self.store.as_ref(), KEY_WORKFLOWS, &seeded)?;
                tracing::info!("seeded demo workflow list");
                seeded
            }
        };

        self.state.write().unwrap().workflows = workflows;
        Ok(())
    }

    /// The current in-memory workflow list.
    pub fn workflows(&self) -> Vec<Workflow> {
        self.state.read().unwrap().workflows.clone()
    }

    /// Recent executions, most recent first, capped at
    /// [`EXECUTION_LOG_CAP`] entries.
    pub fn executions(&self) -> Vec<Execution> {
        self.state
            .read()
            .unwrap()
            .executions
            .iter()
            .cloned()
            .collect()
    }

    /// Creates a workflow and appends it to the list.
    pub async fn create_workflow(&self, fields: NewWorkflow) -> Result<Workflow> {
        let workflow = Workflow::create(fields);

        let mut updated = self.workflows();
        updated.push(workflow.clone());
        self.persist_and_commit(updated)?;

        tracing::info!(id = %workflow.id, name = %workflow.name, "workflow created");
        Ok(workflow)
    }

    /// Merges `update` over the workflow with the given id.
    ///
    /// Fails with `NotFound` when no such workflow exists.
    pub async fn update_workflow(&self, id: &str, update: WorkflowUpdate) -> Result<Workflow> {
        let mut updated = self.workflows();
        let workflow = updated
            .iter_mut()
            .find(|w| w.id == id)
            .ok_or_else(|| FlowdeckError::not_found("workflow", id))?;

        workflow.apply(update);
        let result = workflow.clone();

        self.persist_and_commit(updated)?;
        Ok(result)
    }

    /// Removes the workflow with the given id. Deleting an unknown id is
    /// a no-op.
    pub async fn delete_workflow(&self, id: &str) -> Result<()> {
        let current = self.workflows();
        let updated: Vec<Workflow> = current.iter().filter(|w| w.id != id).cloned().collect();

        if updated.len() == current.len() {
            return Ok(());
        }

        self.persist_and_commit(updated)?;
        tracing::info!(id, "workflow deleted");
        Ok(())
    }

    /// Runs the workflow through the execution backend and records the
    /// outcome in the execution log.
    pub async fn execute_workflow(&self, id: &str, input: Option<Value>) -> Result<Execution> {
        let workflow = self
            .workflows()
            .into_iter()
            .find(|w| w.id == id)
            .ok_or_else(|| FlowdeckError::not_found("workflow", id))?;

        let status = self
            .backend
            .execute(&workflow, input.unwrap_or(Value::Null))
            .await?;

        let execution = Execution::record(&workflow, status);

        let mut state = self.state.write().unwrap();
        state.executions.push_front(execution.clone());
        state.executions.truncate(EXECUTION_LOG_CAP);

        tracing::debug!(workflow = %workflow.name, ?status, "execution recorded");
        Ok(execution)
    }

    /// Writes the list through to the store, committing it to memory
    /// only when the write succeeds.
    fn persist_and_commit(&self, workflows: Vec<Workflow>) -> Result<()> {
        save_json(self.store.as_ref(), KEY_WORKFLOWS, &workflows)?;
        self.state.write().unwrap().workflows = workflows;
        Ok(())
    }
}

/// The three demo workflows seeded for a fresh user.
fn demo_workflows() -> Vec<Workflow> {
    let now = chrono::Utc::now();
    let workflow = |id: &str, name: &str, description: &str, active: bool, nodes| Workflow {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        active,
        nodes,
        created_at: now,
        updated_at: now,
    };

    vec![
        workflow(
            "1",
            "Email Notification Workflow",
            "Sends email notifications when triggered",
            true,
            vec![
                WorkflowNode::new("1", "trigger", "Email Trigger"),
                WorkflowNode::new("2", "email", "Send Email"),
            ],
        ),
        workflow(
            "2",
            "Data Sync Workflow",
            "Syncs data between systems",
            false,
            vec![
                WorkflowNode::new("1", "trigger", "Schedule Trigger"),
                WorkflowNode::new("2", "http", "Fetch Data"),
                WorkflowNode::new("3", "database", "Store Data"),
            ],
        ),
        workflow(
            "3",
            "Slack Integration",
            "Posts updates to Slack channels",
            true,
            vec![
                WorkflowNode::new("1", "trigger", "Webhook Trigger"),
                WorkflowNode::new("2", "slack", "Post Message"),
            ],
        ),
    ]
}
