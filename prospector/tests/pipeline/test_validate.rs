//! Research and manifest contracts against the built-in catalog

use super::common::*;
use prospector::discovery::validate::{validate_manifest, validate_research_bundle};
use prospector::discovery::Catalog;
use serde_json::{json, Value};

const RESEARCH_FIELDS: [&str; 8] = [
    "facts",
    "timelines",
    "personas",
    "techSignals",
    "initiatives",
    "competition",
    "ampCapabilities",
    "sources",
];

fn manifest_for(paths: &[&str]) -> Value {
    let files: Vec<Value> = paths.iter().map(|p| document(p)).collect();
    json!({"companySlug": "acme-corp", "files": files})
}

#[test]
fn test_research_requires_every_field() {
    assert!(validate_research_bundle(&research_value()).is_ok());

    for field in RESEARCH_FIELDS {
        let mut value = research_value();
        value.as_object_mut().unwrap().remove(field);
        let err = validate_research_bundle(&value).unwrap_err();
        assert!(err.to_string().contains(field), "{}", err);
    }
}

#[test]
fn test_full_catalog_manifest_passes() {
    let catalog = Catalog::discovery();
    let keys: Vec<&str> = catalog.keys().collect();

    assert!(validate_manifest(&manifest_for(&keys), &catalog).is_ok());
}

#[test]
fn test_manifest_missing_one_key_names_it() {
    let catalog = Catalog::discovery();
    let keys: Vec<&str> = catalog
        .keys()
        .filter(|k| *k != "05_competition_and_landscape.md")
        .collect();

    let err = validate_manifest(&manifest_for(&keys), &catalog).unwrap_err();
    let text = err.to_string();
    assert!(text.contains("Expected exactly 9 files, got 8"));
    assert!(text.contains("05_competition_and_landscape.md"));
}

#[test]
fn test_manifest_duplicate_with_same_count_fails_on_presence() {
    let catalog = Catalog::discovery();
    let mut keys: Vec<&str> = catalog
        .keys()
        .filter(|k| *k != "09_technical_questionnaire.md")
        .collect();
    keys.push("01_account_brief.md");
    assert_eq!(keys.len(), catalog.len());

    let err = validate_manifest(&manifest_for(&keys), &catalog).unwrap_err();
    assert!(err
        .to_string()
        .contains("Missing required files: 09_technical_questionnaire.md"));
}

#[test]
fn test_manifest_tolerates_path_prefixes() {
    let catalog = Catalog::discovery();
    let prefixed: Vec<String> = catalog.keys().map(|k| format!("acme/{}", k)).collect();
    let paths: Vec<&str> = prefixed.iter().map(String::as_str).collect();

    assert!(validate_manifest(&manifest_for(&paths), &catalog).is_ok());
}
