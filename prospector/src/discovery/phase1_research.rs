//! Phase 1: Research the subject company
//!
//! One agent call with web tools produces the research bundle. The reply is
//! extracted, parsed and shape-checked, then passed on unchanged.

use serde_json::Value;
use tracing::info;

use crate::discovery::prompts::{research_prompt, SYSTEM_PROSPECTOR};
use crate::discovery::types::{PipelineInput, ResearchBundle};
use crate::error::Result;
use crate::workflow_utils::{
    execute_agent, extract_and_parse, AgentClient, AgentConfig, AgentOptions, ProgressStyle,
};

/// Tools granted to the research agent
pub const RESEARCH_TOOLS: &[&str] = &["WebSearch", "WebFetch"];

/// Run the research agent and return a validated bundle
pub async fn run_research(
    client: &dyn AgentClient,
    input: &PipelineInput,
    options: &AgentOptions,
) -> Result<ResearchBundle> {
    println!("🔍 Researching {}...", input.company);

    let options = options
        .clone()
        .with_tools(RESEARCH_TOOLS.iter().copied())
        .with_system_prompt(SYSTEM_PROSPECTOR);

    let config = AgentConfig::new(
        "research",
        "Research Agent",
        format!("Researching {}", input.company),
        research_prompt(input),
        options,
    )
    .with_progress(ProgressStyle::Research);

    let text = execute_agent(client, config).await?;
    let bundle = parse_research(&text)?;

    info!(
        facts = bundle.count("facts"),
        sources = bundle.count("sources"),
        personas = bundle.count("personas"),
        "research bundle parsed"
    );
    println!(
        "   ✓ Research complete: {} facts, {} sources",
        bundle.count("facts"),
        bundle.count("sources")
    );

    Ok(bundle)
}

/// Turn the research agent's reply into a bundle
pub fn parse_research(text: &str) -> Result<ResearchBundle> {
    let value: Value = extract_and_parse(text, "research bundle")?;
    ResearchBundle::try_from(value)
}
