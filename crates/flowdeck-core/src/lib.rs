//! Core domain layer for Flowdeck.
//!
//! Holds the account and workflow domain models, the shared error type,
//! and the trait boundaries (state store, execution backend, role
//! resolver) that the infrastructure and application layers plug into.

pub mod auth;
pub mod config;
pub mod error;
pub mod store;
pub mod workflow;

// Re-export common error type
pub use error::{FlowdeckError, Result};
