//! CLI argument parsing for the prospector

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

use crate::discovery::catalog::Catalog;
use crate::discovery::types::PipelineInput;
use crate::discovery::workflow::{PipelineConfig, DEFAULT_BASE_DIR};
use crate::error::Result;
use crate::workflow_utils::{AgentLogLevel, AgentOptions};

/// Prospector CLI Arguments
#[derive(Parser, Debug, Clone)]
#[command(
    name = "prospector",
    about = "Research a company and generate a sales discovery pack: Research → Synthesize → Write"
)]
pub struct Args {
    /// Company to research
    pub company: String,

    /// Known company domain (repeatable)
    #[arg(long = "domain")]
    pub domains: Vec<String>,

    /// Known contact at the company (repeatable)
    #[arg(long = "contact")]
    pub contacts: Vec<String>,

    /// Product area to emphasize in the generated documents
    #[arg(long)]
    pub product_focus: Option<String>,

    /// Sales objective (repeatable)
    #[arg(long = "objective")]
    pub objectives: Vec<String>,

    /// Persona role to focus research on (repeatable)
    #[arg(long = "persona")]
    pub personas: Vec<String>,

    /// Research window, e.g. "last 6 months"
    #[arg(long)]
    pub timeframe: Option<String>,

    /// Write files here instead of <base-dir>/<company-slug>
    #[arg(short, long)]
    pub out_dir: Option<PathBuf>,

    /// Parent directory for per-company output
    #[arg(long, default_value = DEFAULT_BASE_DIR)]
    pub base_dir: PathBuf,

    /// Deadline for each synthesis batch, in seconds
    #[arg(long, default_value_t = 300)]
    pub batch_timeout_secs: u64,

    /// YAML catalog replacing the built-in discovery documents
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// Forward every agent message and enable debug logging
    #[arg(long)]
    pub debug: bool,
}

fn non_empty(values: &[String]) -> Option<Vec<String>> {
    (!values.is_empty()).then(|| values.to_vec())
}

impl From<&Args> for PipelineInput {
    fn from(args: &Args) -> Self {
        PipelineInput {
            company: args.company.clone(),
            domains: non_empty(&args.domains),
            contacts: non_empty(&args.contacts),
            product_focus: args.product_focus.clone(),
            objectives: non_empty(&args.objectives),
            personas: non_empty(&args.personas),
            timeframe: args.timeframe.clone(),
            out_dir: args.out_dir.clone(),
        }
    }
}

impl Args {
    /// Build the run configuration, loading the catalog file if one was given
    pub async fn pipeline_config(&self) -> Result<PipelineConfig> {
        let catalog = match &self.catalog {
            Some(path) => Catalog::load(path).await?,
            None => Catalog::default(),
        };

        let log_level = if self.debug {
            AgentLogLevel::Debug
        } else {
            AgentLogLevel::Info
        };

        Ok(PipelineConfig {
            base_dir: self.base_dir.clone(),
            batch_timeout: Duration::from_secs(self.batch_timeout_secs),
            agent: AgentOptions {
                log_level,
                ..AgentOptions::default()
            },
            catalog,
        })
    }
}
