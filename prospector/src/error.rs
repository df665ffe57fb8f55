//! Error taxonomy for the prospector pipeline

use std::path::PathBuf;
use std::time::Duration;

/// Maximum number of raw characters quoted back in a parse error
pub const EXCERPT_CHARS: usize = 500;

/// Errors produced by any pipeline stage
#[derive(Debug, thiserror::Error)]
pub enum ProspectorError {
    /// The agent's terminal message carried an error flag
    #[error("agent reported an error: {0}")]
    Agent(String),

    /// The agent stream ended without a terminal result message
    #[error("No result received from {task}")]
    NoResult { task: String },

    /// The agent could not be started or its stream broke
    #[error("agent transport error: {0}")]
    Transport(String),

    /// The extracted payload is not valid JSON
    #[error("Failed to parse {context}: {message}. Raw output starts with: {excerpt}")]
    Parse {
        context: String,
        message: String,
        excerpt: String,
    },

    #[error("Failed to parse research bundle: {0}")]
    InvalidResearch(String),

    #[error("Failed to parse batch {batch}: {message}")]
    InvalidBatch { batch: usize, message: String },

    #[error("Invalid file manifest: {0}")]
    InvalidManifest(String),

    #[error("Batch {batch} timed out after {}s", .timeout.as_secs())]
    BatchTimeout { batch: usize, timeout: Duration },

    /// A generated file failed the frontmatter contract
    #[error("File {path} {message}")]
    Frontmatter { path: String, message: String },

    /// A generated file path would land outside the output directory
    #[error("File {path} escapes the output directory")]
    UnsafePath { path: String },

    #[error("Failed to write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid catalog: {0}")]
    InvalidCatalog(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl ProspectorError {
    /// Build a parse error quoting the first [`EXCERPT_CHARS`] characters of `raw`
    pub fn parse(context: impl Into<String>, message: impl ToString, raw: &str) -> Self {
        Self::Parse {
            context: context.into(),
            message: message.to_string(),
            excerpt: excerpt(raw),
        }
    }
}

/// Truncate `raw` to [`EXCERPT_CHARS`] characters on a char boundary
pub fn excerpt(raw: &str) -> String {
    let mut chars = raw.chars();
    let head: String = chars.by_ref().take(EXCERPT_CHARS).collect();
    if chars.next().is_some() {
        format!("{}...", head)
    } else {
        head
    }
}

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, ProspectorError>;
