//! Pipeline orchestration
//!
//! [`run_prospector`] normalizes the input and runs the three phases in
//! order. Data only flows forward: research feeds synthesis, the manifest
//! feeds persistence, and any failure ends the run.

use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{error, info};

use prospector_sdk::{log_phase_complete, log_phase_failed, log_phase_start};

use crate::discovery::catalog::Catalog;
use crate::discovery::phase1_research::run_research;
use crate::discovery::phase2_synthesize::synthesize;
use crate::discovery::phase3_write::write_files;
use crate::discovery::types::{PipelineInput, ProspectorResult};
use crate::error::{ProspectorError, Result};
use crate::workflow_utils::{AgentClient, AgentOptions};

/// Directory that receives `<slug>/` output folders by default
pub const DEFAULT_BASE_DIR: &str = "discovery";

/// Deadline for a single synthesis batch
pub const DEFAULT_BATCH_TIMEOUT: Duration = Duration::from_secs(5 * 60);

const TOTAL_PHASES: usize = 3;

/// Configuration for a pipeline run
///
/// # Examples
///
/// ```
/// use prospector::discovery::PipelineConfig;
/// use std::time::Duration;
///
/// let config = PipelineConfig {
///     batch_timeout: Duration::from_secs(120),
///     ..Default::default()
/// };
/// assert_eq!(config.catalog.len(), 9);
/// ```
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Parent of the per-company output directory
    pub base_dir: PathBuf,
    /// Deadline for each synthesis batch
    pub batch_timeout: Duration,
    /// Options passed to every agent call
    pub agent: AgentOptions,
    /// Documents to generate and their batches
    pub catalog: Catalog,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from(DEFAULT_BASE_DIR),
            batch_timeout: DEFAULT_BATCH_TIMEOUT,
            agent: AgentOptions::default(),
            catalog: Catalog::default(),
        }
    }
}

/// Run one phase with start/complete/failed events around it
async fn run_phase<T, F>(phase: usize, name: &str, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    log_phase_start!(phase, name, TOTAL_PHASES);
    println!("\n{}", "=".repeat(80));
    println!("PHASE {}: {}", phase, name);
    println!("{}", "=".repeat(80));

    match fut.await {
        Ok(value) => {
            log_phase_complete!(phase, name);
            Ok(value)
        }
        Err(e) => {
            error!(phase, name, error = %e, "phase failed");
            log_phase_failed!(phase, name, &e);
            Err(e)
        }
    }
}

/// Run research, synthesis and persistence for one company
///
/// # Errors
///
/// Returns [`ProspectorError::InvalidInput`] when the company name is blank
/// after trimming, and otherwise the first error raised by any phase.
pub async fn run_prospector(
    client: &dyn AgentClient,
    input: &PipelineInput,
    config: &PipelineConfig,
) -> Result<ProspectorResult> {
    let input = input.normalized();
    if input.company.is_empty() {
        return Err(ProspectorError::InvalidInput(
            "company name must not be empty".to_string(),
        ));
    }

    info!(
        company = %input.company,
        artifacts = config.catalog.len(),
        batch_timeout_secs = config.batch_timeout.as_secs(),
        "starting prospector"
    );

    let research = run_phase(1, "Research", run_research(client, &input, &config.agent)).await?;

    let manifest = run_phase(2, "Synthesize", synthesize(client, &input, &research, config)).await?;

    let output_dir = run_phase(
        3,
        "Write Files",
        write_files(&manifest, input.out_dir.as_deref(), &config.base_dir),
    )
    .await?;

    let files_written = manifest.files.len();
    println!("\n{}", "=".repeat(80));
    println!("✅ Discovery pack ready for {}", input.company);
    println!("   Files: {}", files_written);
    println!("   Location: {}", output_dir.display());
    println!("{}", "=".repeat(80));

    Ok(ProspectorResult {
        manifest,
        output_dir,
        files_written,
    })
}
