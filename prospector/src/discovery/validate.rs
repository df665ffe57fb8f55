//! Structural contracts for agent payloads
//!
//! Validation runs on untyped [`serde_json::Value`]s before deserialization so
//! that a missing field is reported as a missing field, not silently
//! defaulted.

use serde_json::{Map, Value};

use crate::discovery::catalog::Catalog;
use crate::error::{ProspectorError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
    Array,
    Object,
}

impl Shape {
    fn matches(self, value: &Value) -> bool {
        match self {
            Shape::Array => value.is_array(),
            Shape::Object => value.is_object(),
        }
    }

    fn name(self) -> &'static str {
        match self {
            Shape::Array => "array",
            Shape::Object => "object",
        }
    }
}

/// Top-level research fields, in the order they are checked
const RESEARCH_FIELDS: &[(&str, Shape)] = &[
    ("facts", Shape::Array),
    ("timelines", Shape::Array),
    ("personas", Shape::Array),
    ("techSignals", Shape::Object),
    ("initiatives", Shape::Array),
    ("competition", Shape::Object),
    ("ampCapabilities", Shape::Array),
    ("sources", Shape::Array),
];

/// Check that all eight research fields exist with the right container shape
///
/// Fails on the first missing or mistyped field. Nested records are not
/// inspected.
pub fn validate_research_bundle(value: &Value) -> Result<()> {
    let Some(object) = value.as_object() else {
        return Err(ProspectorError::InvalidResearch(
            "Research bundle must be a JSON object".to_string(),
        ));
    };

    for (field, shape) in RESEARCH_FIELDS {
        if !object.get(*field).is_some_and(|v| shape.matches(v)) {
            return Err(ProspectorError::InvalidResearch(format!(
                "Research bundle missing \"{}\" {}",
                field,
                shape.name()
            )));
        }
    }

    Ok(())
}

fn file_path(file: &Value) -> Option<&str> {
    file.get("path").and_then(Value::as_str)
}

/// Check one batch response and return the files it carries
///
/// Every key of the batch must be matched by a file whose path is exactly
/// that key. Extra files are returned as well and left for the
/// whole-manifest check.
pub fn validate_batch_files(value: &Value, batch: &[String], batch_number: usize) -> Result<Vec<Value>> {
    let invalid = |message: String| ProspectorError::InvalidBatch {
        batch: batch_number,
        message,
    };

    let files = value
        .get("files")
        .and_then(Value::as_array)
        .ok_or_else(|| invalid("Response missing \"files\" array".to_string()))?;

    for key in batch {
        if !files.iter().any(|file| file_path(file) == Some(key.as_str())) {
            return Err(invalid(format!("Missing expected file: {}", key)));
        }
    }

    Ok(files.clone())
}

/// Check the accumulated manifest against the whole catalog
///
/// A key counts as present when some file path ends with it, so prefixed
/// paths such as `docs/01_account_brief.md` are accepted. Errors list the
/// missing keys so an operator can tell which batch under-produced.
pub fn validate_manifest(value: &Value, catalog: &Catalog) -> Result<()> {
    let invalid = |message: String| ProspectorError::InvalidManifest(message);

    let object: &Map<String, Value> = value
        .as_object()
        .ok_or_else(|| invalid("Manifest must be a JSON object".to_string()))?;

    let files = object
        .get("files")
        .and_then(Value::as_array)
        .ok_or_else(|| invalid("Manifest missing \"files\" array".to_string()))?;

    let slug_ok = object
        .get("companySlug")
        .and_then(Value::as_str)
        .is_some_and(|slug| !slug.is_empty());
    if !slug_ok {
        return Err(invalid("Manifest missing \"companySlug\"".to_string()));
    }

    let paths: Vec<&str> = files.iter().filter_map(file_path).collect();
    let missing = catalog.missing_keys(|key| paths.iter().any(|path| path.ends_with(key)));

    if files.len() != catalog.len() {
        return Err(invalid(format!(
            "Expected exactly {} files, got {}. Missing: {}",
            catalog.len(),
            files.len(),
            describe_keys(&missing)
        )));
    }

    if !missing.is_empty() {
        return Err(invalid(format!(
            "Missing required files: {}. Got: {}",
            missing.join(", "),
            paths.join(", ")
        )));
    }

    for (idx, file) in files.iter().enumerate() {
        let path = file_path(file).filter(|p| !p.is_empty());
        let content = file
            .get("content")
            .and_then(Value::as_str)
            .filter(|c| !c.is_empty());

        match (path, content) {
            (Some(_), Some(_)) => {}
            (None, _) => {
                return Err(invalid(format!(
                    "File {} has an empty or non-string path",
                    idx + 1
                )))
            }
            (Some(path), None) => {
                return Err(invalid(format!(
                    "File {} has empty or non-string content",
                    path
                )))
            }
        }
    }

    Ok(())
}

fn describe_keys(keys: &[&str]) -> String {
    if keys.is_empty() {
        "none".to_string()
    } else {
        keys.join(", ")
    }
}
