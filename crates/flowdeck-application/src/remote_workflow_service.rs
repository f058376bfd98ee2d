//! Workflow state container (API-backed variant).
//!
//! Mirrors the remote service's workflows, credentials and webhooks in
//! memory and delegates every mutation to the remote API client. Nothing
//! is interpreted locally beyond the workflow records themselves:
//! credential and webhook payloads are proxied verbatim. Failures are
//! logged and re-thrown; the caller decides whether to roll back any
//! optimistic UI state.

use std::collections::VecDeque;
use std::sync::{Arc, RwLock};

use serde_json::Value;

use flowdeck_core::error::Result;
use flowdeck_core::workflow::{
    EXECUTION_LOG_CAP, Execution, ExecutionStatus, NewWorkflow, Workflow, WorkflowUpdate,
};
use flowdeck_remote::WorkflowApiClient;

use crate::auth_service::AuthService;

#[derive(Default)]
struct RemoteState {
    workflows: Vec<Workflow>,
    executions: VecDeque<Execution>,
    credentials: Vec<Value>,
    webhooks: Vec<Value>,
}

/// Workflow container backed by the remote workflow API.
pub struct RemoteWorkflowService {
    client: WorkflowApiClient,
    auth: Arc<AuthService>,
    state: RwLock<RemoteState>,
}

impl RemoteWorkflowService {
    pub fn new(client: WorkflowApiClient, auth: Arc<AuthService>) -> Self {
        Self {
            client,
            auth,
            state: RwLock::new(RemoteState::default()),
        }
    }

    /// Builds the service from the signed-in profile's API settings.
    ///
    /// Returns `None` when the profile has no base URL/key pair; the
    /// caller falls back to the local demo container.
    pub fn from_profile(auth: Arc<AuthService>) -> Option<Self> {
        let profile = auth.profile()?;
        let base_url = profile.api_base_url?;
        let api_key = profile.api_key?;
        Some(Self::new(WorkflowApiClient::new(base_url, api_key), auth))
    }

    /// Base URL of the remote API this container talks to.
    pub fn api_base_url(&self) -> &str {
        self.client.base_url()
    }

    /// Fetches workflows, credentials and webhooks from the remote
    /// service into the local mirror.
    pub async fn refresh(&self) -> Result<()> {
        let workflows = self.client.list_workflows().await?;
        self.state.write().unwrap().workflows = workflows;

        // Credential/webhook mirrors are best-effort: the dashboard
        // still works without them.
        match self.client.list_credentials().await {
            Ok(credentials) => self.state.write().unwrap().credentials = credentials,
            Err(err) => tracing::warn!(%err, "failed to load credentials"),
        }
        match self.client.list_webhooks().await {
            Ok(webhooks) => self.state.write().unwrap().webhooks = webhooks,
            Err(err) => tracing::warn!(%err, "failed to load webhooks"),
        }

        Ok(())
    }

    pub fn workflows(&self) -> Vec<Workflow> {
        self.state.read().unwrap().workflows.clone()
    }

    pub fn executions(&self) -> Vec<Execution> {
        self.state
            .read()
            .unwrap()
            .executions
            .iter()
            .cloned()
            .collect()
    }

    pub fn credentials(&self) -> Vec<Value> {
        self.state.read().unwrap().credentials.clone()
    }

    pub fn webhooks(&self) -> Vec<Value> {
        self.state.read().unwrap().webhooks.clone()
    }

    // Workflows

    pub async fn create_workflow(&self, fields: NewWorkflow) -> Result<Workflow> {
        let workflow = self.client.create_workflow(&fields).await.map_err(|err| {
            tracing::warn!(%err, "failed to create workflow");
            err
        })?;

        self.state.write().unwrap().workflows.push(workflow.clone());
        Ok(workflow)
    }

    pub async fn update_workflow(&self, id: &str, update: WorkflowUpdate) -> Result<Workflow> {
        // The remote API takes the full record on update, so merge
        // against the mirrored copy first.
        let mut merged = self
            .workflows()
            .into_iter()
            .find(|w| w.id == id)
            .ok_or_else(|| flowdeck_core::FlowdeckError::not_found("workflow", id))?;
        merged.apply(update);

        let workflow = self
            .client
            .update_workflow(id, &merged)
            .await
            .map_err(|err| {
                tracing::warn!(%err, id, "failed to update workflow");
                err
            })?;

        let mut state = self.state.write().unwrap();
        if let Some(existing) = state.workflows.iter_mut().find(|w| w.id == id) {
            *existing = workflow.clone();
        }
        Ok(workflow)
    }

    pub async fn delete_workflow(&self, id: &str) -> Result<()> {
        self.client.delete_workflow(id).await.map_err(|err| {
            tracing::warn!(%err, id, "failed to delete workflow");
            err
        })?;

        self.state.write().unwrap().workflows.retain(|w| w.id != id);
        Ok(())
    }

    /// Executes the workflow remotely, records it in the local execution
    /// log and counts one token against the signed-in profile.
    pub async fn execute_workflow(&self, id: &str, input: Option<Value>) -> Result<Execution> {
        let workflow = self
            .workflows()
            .into_iter()
            .find(|w| w.id == id)
            .ok_or_else(|| flowdeck_core::FlowdeckError::not_found("workflow", id))?;

        let response = self
            .client
            .execute_workflow(id, &input.unwrap_or(Value::Null))
            .await
            .map_err(|err| {
                tracing::warn!(%err, id, "failed to execute workflow");
                err
            })?;

        let execution = Execution::record(&workflow, execution_status_from(&response));

        {
            let mut state = self.state.write().unwrap();
            state.executions.push_front(execution.clone());
            state.executions.truncate(EXECUTION_LOG_CAP);
        }

        // Token accounting is a side effect; an accounting failure must
        // not fail the execution that already happened.
        if let Err(err) = self.auth.record_token_usage(1).await {
            tracing::warn!(%err, "failed to record token usage");
        }

        Ok(execution)
    }

    /// Executions as reported by the remote service for one workflow
    /// (opaque payloads).
    pub async fn remote_executions(&self, workflow_id: &str) -> Result<Vec<Value>> {
        self.client.list_executions(workflow_id).await
    }

    // Credentials

    pub async fn create_credential(&self, credential: Value) -> Result<Value> {
        let created = self.client.create_credential(&credential).await?;
        self.state.write().unwrap().credentials.push(created.clone());
        Ok(created)
    }

    pub async fn update_credential(&self, id: &str, credential: Value) -> Result<Value> {
        let updated = self.client.update_credential(id, &credential).await?;

        let mut state = self.state.write().unwrap();
        if let Some(existing) = state
            .credentials
            .iter_mut()
            .find(|c| c.get("id").and_then(Value::as_str) == Some(id))
        {
            *existing = updated.clone();
        }
        Ok(updated)
    }

    pub async fn delete_credential(&self, id: &str) -> Result<()> {
        self.client.delete_credential(id).await?;
        self.state
            .write()
            .unwrap()
            .credentials
            .retain(|c| c.get("id").and_then(Value::as_str) != Some(id));
        Ok(())
    }

    // Webhooks

    pub async fn create_webhook(&self, webhook: Value) -> Result<Value> {
        let created = self.client.create_webhook(&webhook).await?;
        self.state.write().unwrap().webhooks.push(created.clone());
        Ok(created)
    }

    pub async fn delete_webhook(&self, id: &str) -> Result<()> {
        self.client.delete_webhook(id).await?;
        self.state
            .write()
            .unwrap()
            .webhooks
            .retain(|w| w.get("id").and_then(Value::as_str) != Some(id));
        Ok(())
    }
}

/// Derives a log status from a remote execution response. Unknown shapes
/// count as still running.
fn execution_status_from(response: &Value) -> ExecutionStatus {
    match response.get("status").and_then(Value::as_str) {
        Some("success") => ExecutionStatus::Success,
        Some("failed") | Some("error") => ExecutionStatus::Failed,
        _ => ExecutionStatus::Running,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn status_derived_from_response_body() {
        assert_eq!(
            execution_status_from(&json!({ "status": "success" })),
            ExecutionStatus::Success
        );
        assert_eq!(
            execution_status_from(&json!({ "status": "failed" })),
            ExecutionStatus::Failed
        );
        assert_eq!(
            execution_status_from(&json!({ "status": "error" })),
            ExecutionStatus::Failed
        );
    }

    #[test]
    fn unknown_response_shape_counts_as_running() {
        assert_eq!(
            execution_status_from(&json!({ "executionId": "abc" })),
            ExecutionStatus::Running
        );
        assert_eq!(execution_status_from(&Value::Null), ExecutionStatus::Running);
    }
}
