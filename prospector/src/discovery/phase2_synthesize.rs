//! Phase 2: Synthesize the catalog documents in batches
//!
//! Batches run one after another in catalog order. Each agent call is raced
//! against the configured deadline, its reply must carry every file of the
//! batch, and the accumulated files are checked against the whole catalog
//! before a manifest is returned. The first failure aborts the phase.

use chrono::Local;
use serde_json::{json, Value};
use tracing::info;

use prospector_sdk::{log_batch_complete, log_batch_start};

use crate::discovery::phase3_write::slugify;
use crate::discovery::prompts::{batch_generation_prompt, SYSTEM_PROSPECTOR};
use crate::discovery::types::{FileManifest, PipelineInput, ResearchBundle};
use crate::discovery::validate::{validate_batch_files, validate_manifest};
use crate::discovery::workflow::PipelineConfig;
use crate::error::{ProspectorError, Result};
use crate::workflow_utils::{
    execute_agent, extract_and_parse, run_with_deadline, AgentClient, AgentConfig, ProgressStyle,
};

/// Generate every catalog document and return the validated manifest
pub async fn synthesize(
    client: &dyn AgentClient,
    input: &PipelineInput,
    research: &ResearchBundle,
    config: &PipelineConfig,
) -> Result<FileManifest> {
    let catalog = &config.catalog;
    let batches = catalog.batches();
    let total_batches = batches.len();

    let research_json = research.to_pretty_json()?;
    info!(
        bytes = research_json.len(),
        artifacts = catalog.len(),
        batches = total_batches,
        "starting synthesis"
    );
    println!(
        "📝 Generating {} files in {} batches (research bundle: {} bytes)",
        catalog.len(),
        total_batches,
        research_json.len()
    );

    let today = Local::now().date_naive();
    let options = config.agent.clone().with_system_prompt(SYSTEM_PROSPECTOR);
    let mut files: Vec<Value> = Vec::with_capacity(catalog.len());

    for (idx, keys) in batches.iter().enumerate() {
        let batch_number = idx + 1;
        log_batch_start!(batch_number, total_batches, keys);
        println!(
            "\n   Batch {}/{}: {}",
            batch_number,
            total_batches,
            keys.join(", ")
        );

        let agent_config = AgentConfig::new(
            format!("batch_{}", batch_number),
            "Synthesis Agent",
            format!("Generating {}", keys.join(", ")),
            batch_generation_prompt(input, &research_json, catalog, keys, today),
            options.clone(),
        )
        .with_progress(ProgressStyle::Synthesis);

        let text = run_with_deadline(
            batch_number,
            config.batch_timeout,
            execute_agent(client, agent_config),
        )
        .await?;

        let batch_files = parse_batch(&text, keys, batch_number)?;
        info!(batch = batch_number, files = batch_files.len(), "batch complete");
        println!("   ✓ Batch {} produced {} files", batch_number, batch_files.len());
        log_batch_complete!(batch_number, batch_files.len());

        files.extend(batch_files);
    }

    let manifest = json!({
        "companySlug": slugify(&input.company),
        "files": files,
    });
    validate_manifest(&manifest, catalog)?;

    serde_json::from_value(manifest).map_err(|e| ProspectorError::InvalidManifest(e.to_string()))
}

/// Extract, parse and check one batch reply
pub fn parse_batch(text: &str, keys: &[String], batch_number: usize) -> Result<Vec<Value>> {
    let value: Value = extract_and_parse(text, &format!("batch {}", batch_number))?;
    validate_batch_files(&value, keys, batch_number)
}
