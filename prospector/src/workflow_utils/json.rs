//! JSON utilities for recovering structured payloads from agent prose

use regex::Regex;
use serde::de::DeserializeOwned;
use std::sync::OnceLock;
use tracing::warn;

use crate::error::{ProspectorError, Result};

fn fenced_block() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"```(?:json)?\s*\n([\s\S]*?)\n```").expect("valid regex"))
}

fn brace_span() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\{[\s\S]*\}").expect("valid regex"))
}

/// Extract a JSON-shaped string from free-form agent output
///
/// Handles, in priority order:
/// - the first ```json (or untagged) fenced block
/// - the span from the first `{` to the last `}` in the text
/// - the trimmed text itself
///
/// The brace span is greedy, not balanced: trailing prose containing a `}`
/// is captured too and left for the JSON parser to reject.
pub fn extract_json(text: &str) -> String {
    if let Some(body) = fenced_block()
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim())
        .filter(|body| !body.is_empty())
    {
        return body.to_string();
    }

    if let Some(span) = brace_span().find(text) {
        return span.as_str().to_string();
    }

    text.trim().to_string()
}

fn parse_quoting<T: DeserializeOwned>(json: &str, context: &str, raw: &str) -> Result<T> {
    serde_json::from_str(json).map_err(|e| {
        warn!(context, error = %e, "agent output is not valid JSON");
        ProspectorError::parse(context, e, raw)
    })
}

/// Parse a JSON string into a typed value
///
/// On failure the error quotes the start of `json` under `context`.
pub fn parse_json<T: DeserializeOwned>(json: &str, context: &str) -> Result<T> {
    parse_quoting(json, context, json)
}

/// Extract then parse in one step
///
/// A parse error quotes the start of the agent's full reply, not the
/// extracted span.
pub fn extract_and_parse<T: DeserializeOwned>(text: &str, context: &str) -> Result<T> {
    parse_quoting(&extract_json(text), context, text)
}
