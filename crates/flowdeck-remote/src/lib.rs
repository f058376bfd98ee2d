//! Remote workflow API client for Flowdeck.

pub mod client;

pub use client::{API_KEY_HEADER, WorkflowApiClient};
