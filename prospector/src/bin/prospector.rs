//   Prospector: sales discovery pack generator
//
//   Phase 1: RESEARCH
//     Web research agent (WebSearch, WebFetch), three passes
//     Output: research bundle (facts, timelines, personas, tech signals,
//             initiatives, competition, capabilities, sources)
//
//   Phase 2: SYNTHESIZE
//     One agent call per catalog batch, in order, each with a deadline
//     Output: validated file manifest
//
//   Phase 3: WRITE FILES
//     Frontmatter and path checks, then concurrent writes
//     Output: <base-dir>/<company-slug>/*.md
//
//   USAGE:
//
//   cargo run -- "Acme Corp" --domain acme.com --persona "VP Engineering"
//
//   cargo run -- "Acme Corp" --out-dir ./acme --catalog catalog.yaml --debug

use anyhow::Context;
use clap::Parser;
use tracing::{warn, Level};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use prospector::discovery::cli::Args;
use prospector::discovery::{run_prospector, PipelineInput};
use prospector::workflow_utils::ClaudeAgent;

fn init_tracing(debug: bool) {
    let level = if debug { Level::DEBUG } else { Level::WARN };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .try_init()
        .ok();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let args = Args::parse();
    init_tracing(args.debug);

    if std::env::var("ANTHROPIC_API_KEY").map_or(true, |key| key.trim().is_empty()) {
        warn!("ANTHROPIC_API_KEY is not set; relying on an existing Claude Code login");
    }

    let input = PipelineInput::from(&args);
    let config = args
        .pipeline_config()
        .await
        .context("Failed to build pipeline configuration")?;

    println!("🚀 Prospector started for {}", input.company.trim());

    let result = run_prospector(&ClaudeAgent, &input, &config)
        .await
        .with_context(|| format!("Prospecting {} failed", input.company.trim()))?;

    println!(
        "\n📂 {} files written to {}",
        result.files_written,
        result.output_dir.display()
    );
    Ok(())
}
