//! Remote workflow API client.
//!
//! A stateless reqwest wrapper over the external workflow-automation
//! service's REST API. Configured once with a base URL and an API key
//! that rides along in a custom header on every request. Each method
//! issues exactly one HTTP request and returns the parsed response body;
//! a non-2xx response is surfaced as an error with no retry; the calling
//! container decides how to present the failure.

use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::Value;

use flowdeck_core::error::{FlowdeckError, Result};
use flowdeck_core::workflow::{NewWorkflow, Workflow};

/// Header carrying the static API key.
pub const API_KEY_HEADER: &str = "X-API-KEY";

/// Client for the remote workflow API.
#[derive(Debug, Clone)]
pub struct WorkflowApiClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl WorkflowApiClient {
    /// Creates a client for the API rooted at `base_url`.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    /// Returns the configured base URL (without trailing slash).
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, self.endpoint(path))
            .header(API_KEY_HEADER, &self.api_key)
    }

    /// Sends the request and checks the response status.
    async fn send_raw(&self, request: RequestBuilder) -> Result<reqwest::Response> {
        let response = request
            .send()
            .await
            .map_err(|err| FlowdeckError::http(format!("request failed: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "failed to read error body".to_string());
            tracing::warn!(status = status.as_u16(), "remote API request rejected");
            return Err(rejection_error(status, body));
        }

        Ok(response)
    }

    /// Sends the request and parses a JSON response body.
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        self.send_raw(request)
            .await?
            .json()
            .await
            .map_err(|err| FlowdeckError::http(format!("failed to parse response: {err}")))
    }

    /// Sends the request and discards any response body (deletes return
    /// nothing useful, and some services send an empty body).
    async fn send_no_body(&self, request: RequestBuilder) -> Result<()> {
        self.send_raw(request).await.map(|_| ())
    }

    // Workflows

    pub async fn list_workflows(&self) -> Result<Vec<Workflow>> {
        self.send(self.request(Method::GET, "/workflows")).await
    }

    pub async fn get_workflow(&self, id: &str) -> Result<Workflow> {
        self.send(self.request(Method::GET, &format!("/workflows/{id}")))
            .await
    }

    pub async fn create_workflow(&self, workflow: &NewWorkflow) -> Result<Workflow> {
        self.send(self.request(Method::POST, "/workflows").json(workflow))
            .await
    }

    pub async fn update_workflow(&self, id: &str, update: &Workflow) -> Result<Workflow> {
        self.send(
            self.request(Method::PUT, &format!("/workflows/{id}"))
                .json(update),
        )
        .await
    }

    pub async fn delete_workflow(&self, id: &str) -> Result<()> {
        self.send_no_body(self.request(Method::DELETE, &format!("/workflows/{id}")))
            .await
    }

    /// Triggers one execution of the workflow. The response shape is
    /// service-specific, so it is returned verbatim.
    pub async fn execute_workflow(&self, id: &str, input: &Value) -> Result<Value> {
        self.send(
            self.request(Method::POST, &format!("/workflows/{id}/execute"))
                .json(input),
        )
        .await
    }

    // Executions

    pub async fn list_executions(&self, workflow_id: &str) -> Result<Vec<Value>> {
        self.send(self.request(
            Method::GET,
            &format!("/executions?workflowId={workflow_id}"),
        ))
        .await
    }

    pub async fn get_execution(&self, id: &str) -> Result<Value> {
        self.send(self.request(Method::GET, &format!("/executions/{id}")))
            .await
    }

    // Credentials (opaque payloads, proxied verbatim)

    pub async fn list_credentials(&self) -> Result<Vec<Value>> {
        self.send(self.request(Method::GET, "/credentials")).await
    }

    pub async fn create_credential(&self, credential: &Value) -> Result<Value> {
        self.send(self.request(Method::POST, "/credentials").json(credential))
            .await
    }

    pub async fn update_credential(&self, id: &str, credential: &Value) -> Result<Value> {
        self.send(
            self.request(Method::PUT, &format!("/credentials/{id}"))
                .json(credential),
        )
        .await
    }

    pub async fn delete_credential(&self, id: &str) -> Result<()> {
        self.send_no_body(self.request(Method::DELETE, &format!("/credentials/{id}")))
            .await
    }

    // Webhooks

    pub async fn list_webhooks(&self) -> Result<Vec<Value>> {
        self.send(self.request(Method::GET, "/webhooks")).await
    }

    pub async fn create_webhook(&self, webhook: &Value) -> Result<Value> {
        self.send(self.request(Method::POST, "/webhooks").json(webhook))
            .await
    }

    pub async fn delete_webhook(&self, id: &str) -> Result<()> {
        self.send_no_body(self.request(Method::DELETE, &format!("/webhooks/{id}")))
            .await
    }
}

/// Error for a response the service rejected with a non-2xx status.
fn rejection_error(status: reqwest::StatusCode, body: String) -> FlowdeckError {
    FlowdeckError::api(status.as_u16(), body)
}
