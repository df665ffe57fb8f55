//! Common test utilities for pipeline tests

use prospector::discovery::{Catalog, PipelineConfig};
use prospector::workflow_utils::{AgentMessage, Script};
use serde_json::{json, Value};
use std::path::Path;

/// A research reply with every required field and a little content
pub fn research_value() -> Value {
    json!({
        "facts": [
            {"claim": "Acme raised a $40M Series B", "citation": "https://news.example/acme-b", "confidence": "high", "date": "2025-02-01"}
        ],
        "timelines": [
            {"date": "2025-02-01", "event": "Series B", "source": "https://news.example/acme-b"}
        ],
        "personas": [
            {"name": "Jo Park", "role": "CTO", "responsibilities": ["platform", "hiring"]}
        ],
        "techSignals": {"stack": ["Go", "Kubernetes"], "versions": {"go": "1.22"}, "gaps": ["test coverage"]},
        "initiatives": [
            {"initiative": "Monorepo migration", "trigger": "Series B", "relevance": "large refactors"}
        ],
        "competition": {"incumbents": ["Copilot"], "partners": [], "maturity": "early adopter"},
        "ampCapabilities": [
            {"capability": "Subagents", "examples": ["parallel refactors"], "citations": ["https://ampcode.com/manual"]}
        ],
        "sources": [
            {"publisher": "Example News", "title": "Acme raises Series B", "url": "https://news.example/acme-b"}
        ]
    })
}

pub fn research_script() -> Script {
    Script::Messages(vec![
        AgentMessage::assistant_text("Starting Pass A: company basics"),
        AgentMessage::assistant_text("I found the engineering blog: eng.acme.example"),
        AgentMessage::success(format!("```json\n{}\n```", research_value())),
    ])
}

pub fn document(path: &str) -> Value {
    json!({
        "path": path,
        "content": format!("---\ntitle: {}\ncompany: Acme Corp\n---\n\n# {}\n", path, path),
    })
}

/// Batch reply containing exactly `paths`
pub fn batch_script(paths: &[&str]) -> Script {
    let files: Vec<Value> = paths.iter().map(|p| document(p)).collect();
    Script::reply(format!(
        "Here are the files.\n```json\n{}\n```",
        json!({ "files": files })
    ))
}

/// One correct reply per batch of `catalog`
pub fn batch_scripts(catalog: &Catalog) -> Vec<Script> {
    catalog
        .batches()
        .iter()
        .map(|batch| {
            let paths: Vec<&str> = batch.iter().map(String::as_str).collect();
            batch_script(&paths)
        })
        .collect()
}

/// Default configuration writing under `base`
pub fn config_in(base: &Path) -> PipelineConfig {
    PipelineConfig {
        base_dir: base.to_path_buf(),
        ..PipelineConfig::default()
    }
}
