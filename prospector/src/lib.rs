// Pipeline error taxonomy
pub mod error;

// Agent, JSON and batching utilities
pub mod workflow_utils;

// Sales discovery pipeline
pub mod discovery;

pub use error::{ProspectorError, Result};
