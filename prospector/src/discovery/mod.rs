//! Sales discovery pipeline
//!
//! Research a company with a web-enabled agent, synthesize the catalog
//! documents in batches, then write them to disk.

pub mod catalog;
pub mod cli;
pub mod phase1_research;
pub mod phase2_synthesize;
pub mod phase3_write;
pub mod prompts;
pub mod types;
pub mod validate;
pub mod workflow;

pub use catalog::{ArtifactSpec, Catalog};
pub use phase3_write::slugify;
pub use types::{FileManifest, GeneratedFile, PipelineInput, ProspectorResult, ResearchBundle};
pub use workflow::{run_prospector, PipelineConfig};
