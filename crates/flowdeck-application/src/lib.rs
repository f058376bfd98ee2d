//! Application layer for Flowdeck.
//!
//! The state containers the presentation layer talks to: auth, the local
//! demo workflow container, its API-backed counterpart, and the wiring
//! that constructs them.

pub mod auth_service;
pub mod bootstrap;
pub mod remote_workflow_service;
pub mod workflow_service;

pub use auth_service::AuthService;
pub use bootstrap::Flowdeck;
pub use remote_workflow_service::RemoteWorkflowService;
pub use workflow_service::WorkflowService;
