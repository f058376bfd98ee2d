//! Workflow execution backend boundary.
//!
//! Running a workflow is delegated to an `ExecutionBackend` so the state
//! container stays agnostic of where executions actually happen: the demo
//! deployment plugs in the random simulation below, the API-backed
//! deployment goes through the remote client instead.

use async_trait::async_trait;
use rand::Rng;
use serde_json::Value;

use super::model::{ExecutionStatus, Workflow};
use crate::error::Result;

/// Executes workflows and reports the outcome.
#[async_trait]
pub trait ExecutionBackend: Send + Sync {
    /// Runs `workflow` with the given input payload and returns the
    /// resulting status.
    async fn execute(&self, workflow: &Workflow, input: Value) -> Result<ExecutionStatus>;
}

/// Demo backend that fabricates an outcome instead of running anything.
///
/// Succeeds with the configured probability (80% by default), fails
/// otherwise. Input data is accepted and ignored.
#[derive(Debug, Clone, Copy)]
pub struct SimulatedBackend {
    success_ratio: f64,
}

impl SimulatedBackend {
    pub fn new() -> Self {
        Self { success_ratio: 0.8 }
    }

    /// Overrides the success probability (clamped to 0.0..=1.0).
    pub fn with_success_ratio(mut self, ratio: f64) -> Self {
        self.success_ratio = ratio.clamp(0.0, 1.0);
        self
    }
}

impl Default for SimulatedBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ExecutionBackend for SimulatedBackend {
    async fn execute(&self, _workflow: &Workflow, _input: Value) -> Result<ExecutionStatus> {
        if rand::thread_rng().gen_bool(self.success_ratio) {
            Ok(ExecutionStatus::Success)
        } else {
            Ok(ExecutionStatus::Failed)
        }
    }
}
