//! Workflow domain: workflow records, executions, execution backend.

pub mod executor;
pub mod model;

pub use executor::{ExecutionBackend, SimulatedBackend};
pub use model::{
    EXECUTION_LOG_CAP, Execution, ExecutionStatus, NewWorkflow, Workflow, WorkflowNode,
    WorkflowUpdate,
};
