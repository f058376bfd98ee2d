//! Infrastructure layer for Flowdeck.
//!
//! Concrete implementations of the core persistence boundary plus path
//! and configuration management.

pub mod config;
pub mod json_store;
pub mod memory_store;
pub mod paths;

pub use config::{load_config, load_config_from};
pub use json_store::JsonFileStore;
pub use memory_store::MemoryStore;
pub use paths::FlowdeckPaths;
