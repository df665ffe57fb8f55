//! Data structures shared by the pipeline stages

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::path::PathBuf;

use crate::discovery::validate::validate_research_bundle;
use crate::error::{ProspectorError, Result};

/// Research window applied when the caller does not supply one
pub const DEFAULT_TIMEFRAME: &str = "last 12 months";

/// Caller-supplied description of the subject to prospect
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineInput {
    pub company: String,
    pub domains: Option<Vec<String>>,
    pub contacts: Option<Vec<String>>,
    pub product_focus: Option<String>,
    pub objectives: Option<Vec<String>>,
    pub personas: Option<Vec<String>>,
    pub timeframe: Option<String>,
    pub out_dir: Option<PathBuf>,
}

impl PipelineInput {
    pub fn new(company: impl Into<String>) -> Self {
        Self {
            company: company.into(),
            ..Default::default()
        }
    }

    /// Return a trimmed copy with the default timeframe applied
    ///
    /// Blank optional strings and blank list entries are dropped, so
    /// normalizing twice yields the same value.
    pub fn normalized(&self) -> Self {
        Self {
            company: self.company.trim().to_string(),
            domains: trim_list(&self.domains),
            contacts: trim_list(&self.contacts),
            product_focus: trim_opt(&self.product_focus),
            objectives: trim_list(&self.objectives),
            personas: trim_list(&self.personas),
            timeframe: Some(
                trim_opt(&self.timeframe).unwrap_or_else(|| DEFAULT_TIMEFRAME.to_string()),
            ),
            out_dir: self.out_dir.clone(),
        }
    }
}

fn trim_opt(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn trim_list(values: &Option<Vec<String>>) -> Option<Vec<String>> {
    values.as_ref().map(|items| {
        items
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    })
}

/// Research payload produced by phase 1
///
/// Wraps the agent's JSON exactly as emitted. Construction checks that the
/// eight top-level sections exist with the right container shape; nested
/// records are kept verbatim, nulls and unknown keys included, so synthesis
/// sees the same data the research agent produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Value", into = "Value")]
pub struct ResearchBundle(Value);

impl ResearchBundle {
    /// The validated JSON value
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }

    /// Number of entries in a list-shaped section, zero for object sections
    pub fn count(&self, section: &str) -> usize {
        self.0
            .get(section)
            .and_then(Value::as_array)
            .map_or(0, Vec::len)
    }

    /// Pretty-printed JSON handed to the synthesis prompt
    pub fn to_pretty_json(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.0)
            .map_err(|e| ProspectorError::InvalidResearch(e.to_string()))
    }
}

impl TryFrom<Value> for ResearchBundle {
    type Error = ProspectorError;

    fn try_from(value: Value) -> Result<Self> {
        validate_research_bundle(&value)?;
        Ok(Self(value))
    }
}

impl From<ResearchBundle> for Value {
    fn from(bundle: ResearchBundle) -> Self {
        bundle.0
    }
}

impl Default for ResearchBundle {
    /// A bundle with every section present and empty
    fn default() -> Self {
        Self(json!({
            "facts": [],
            "timelines": [],
            "personas": [],
            "techSignals": {},
            "initiatives": [],
            "competition": {},
            "ampCapabilities": [],
            "sources": []
        }))
    }
}

/// One generated artifact
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedFile {
    pub path: String,
    pub content: String,
}

/// Complete, validated set of generated artifacts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileManifest {
    pub company_slug: String,
    pub files: Vec<GeneratedFile>,
}

/// Outcome of a successful pipeline run
#[derive(Debug, Clone)]
pub struct ProspectorResult {
    pub manifest: FileManifest,
    pub output_dir: PathBuf,
    pub files_written: usize,
}
