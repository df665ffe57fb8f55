//! Artifact catalog and its static batch partition
//!
//! The catalog lists every document the synthesis phase must produce, in
//! order, together with the batches used to request them from the agent.
//! Its cardinality is configuration: nothing downstream assumes a fixed
//! number of artifacts.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use crate::error::{ProspectorError, Result};

/// One required output artifact
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactSpec {
    /// Stable file name the agent must return, e.g. `01_account_brief.md`
    pub key: String,
    /// What the document should contain (used only for prompting)
    pub description: String,
}

/// Ordered artifact list plus its partition into generation batches
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawCatalog")]
pub struct Catalog {
    artifacts: Vec<ArtifactSpec>,
    batches: Vec<Vec<String>>,
}

#[derive(Deserialize)]
struct RawCatalog {
    artifacts: Vec<ArtifactSpec>,
    batches: Vec<Vec<String>>,
}

impl TryFrom<RawCatalog> for Catalog {
    type Error = ProspectorError;

    fn try_from(raw: RawCatalog) -> Result<Self> {
        Catalog::new(raw.artifacts, raw.batches)
    }
}

const DISCOVERY_ARTIFACTS: &[(&str, &str)] = &[
    (
        "01_account_brief.md",
        "Company overview, business model, customer segments, and a \"So what for the demo?\" section",
    ),
    (
        "02_org_and_contacts.md",
        "Key personas, buying committee, decision-makers, and known contacts",
    ),
    (
        "03_tech_stack.md",
        "Technology infrastructure, hiring signals, gaps, and a \"So what for the demo?\" section",
    ),
    (
        "04_initiatives_and_triggers.md",
        "Strategic initiatives, trigger events, and timing opportunities",
    ),
    (
        "05_competition_and_landscape.md",
        "Competitive positioning, market maturity, a \"So what for the demo?\" section, and two pilot options",
    ),
    (
        "06_call_plan_and_talk_track.md",
        "Discovery questions and the demo storyline for the first call",
    ),
    (
        "07_discovery_framework.md",
        "Structured conversation framework moving from demographics through culture to wrap-up",
    ),
    (
        "08_custom_demo.md",
        "Tailored demo with prospect-specific use cases, capability mapping, steps, inputs, success metrics, and risk mitigations",
    ),
    (
        "09_technical_questionnaire.md",
        "Short technical questionnaire in the prospect's own vocabulary: three sections (team and environment, codebase and workflow, evaluation criteria) of two or three consultative questions each, aimed at what a tailored demo and trial must prove",
    ),
];

const DISCOVERY_BATCHES: &[&[&str]] = &[
    &["01_account_brief.md", "02_org_and_contacts.md"],
    &["03_tech_stack.md", "04_initiatives_and_triggers.md"],
    &["05_competition_and_landscape.md", "06_call_plan_and_talk_track.md"],
    &["07_discovery_framework.md", "08_custom_demo.md"],
    &["09_technical_questionnaire.md"],
];

impl Catalog {
    /// Build a catalog, checking that `batches` partition `artifacts`
    pub fn new(artifacts: Vec<ArtifactSpec>, batches: Vec<Vec<String>>) -> Result<Self> {
        if artifacts.is_empty() {
            return Err(ProspectorError::InvalidCatalog(
                "catalog has no artifacts".to_string(),
            ));
        }

        let mut known = HashSet::new();
        for spec in &artifacts {
            if spec.key.trim().is_empty() {
                return Err(ProspectorError::InvalidCatalog(
                    "artifact key must not be empty".to_string(),
                ));
            }
            if !known.insert(spec.key.as_str()) {
                return Err(ProspectorError::InvalidCatalog(format!(
                    "artifact {} is listed twice",
                    spec.key
                )));
            }
        }

        let mut assigned = HashSet::new();
        for (idx, batch) in batches.iter().enumerate() {
            if batch.is_empty() {
                return Err(ProspectorError::InvalidCatalog(format!(
                    "batch {} is empty",
                    idx + 1
                )));
            }
            for key in batch {
                if !known.contains(key.as_str()) {
                    return Err(ProspectorError::InvalidCatalog(format!(
                        "batch {} names unknown artifact {}",
                        idx + 1,
                        key
                    )));
                }
                if !assigned.insert(key.as_str()) {
                    return Err(ProspectorError::InvalidCatalog(format!(
                        "artifact {} appears in more than one batch",
                        key
                    )));
                }
            }
        }

        let unassigned: Vec<&str> = artifacts
            .iter()
            .map(|a| a.key.as_str())
            .filter(|key| !assigned.contains(key))
            .collect();
        if !unassigned.is_empty() {
            return Err(ProspectorError::InvalidCatalog(format!(
                "artifacts not assigned to any batch: {}",
                unassigned.join(", ")
            )));
        }

        Ok(Self { artifacts, batches })
    }

    /// The nine-document sales discovery catalog
    pub fn discovery() -> Self {
        Self {
            artifacts: DISCOVERY_ARTIFACTS
                .iter()
                .map(|(key, description)| ArtifactSpec {
                    key: key.to_string(),
                    description: description.to_string(),
                })
                .collect(),
            batches: DISCOVERY_BATCHES
                .iter()
                .map(|batch| batch.iter().map(|k| k.to_string()).collect())
                .collect(),
        }
    }

    /// Parse a catalog from YAML (`artifacts` + `batches`)
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(|e| ProspectorError::InvalidCatalog(e.to_string()))
    }

    /// Load a catalog from a YAML file
    pub async fn load(path: &Path) -> Result<Self> {
        let yaml = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| ProspectorError::InvalidCatalog(format!("{}: {}", path.display(), e)))?;
        Self::from_yaml(&yaml)
    }

    pub fn artifacts(&self) -> &[ArtifactSpec] {
        &self.artifacts
    }

    pub fn batches(&self) -> &[Vec<String>] {
        &self.batches
    }

    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }

    /// Artifact keys in catalog order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.artifacts.iter().map(|a| a.key.as_str())
    }

    pub fn description(&self, key: &str) -> Option<&str> {
        self.artifacts
            .iter()
            .find(|a| a.key == key)
            .map(|a| a.description.as_str())
    }

    /// Keys for which `present` reports no matching file, in catalog order
    pub fn missing_keys<F>(&self, present: F) -> Vec<&str>
    where
        F: Fn(&str) -> bool,
    {
        self.keys().filter(|key| !present(key)).collect()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::discovery()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(key: &str) -> ArtifactSpec {
        ArtifactSpec {
            key: key.to_string(),
            description: format!("About {}", key),
        }
    }

    fn batch(keys: &[&str]) -> Vec<String> {
        keys.iter().map(|k| k.to_string()).collect()
    }

    #[test]
    fn test_discovery_catalog_is_a_valid_partition() {
        let catalog = Catalog::discovery();
        let rebuilt = Catalog::new(catalog.artifacts().to_vec(), catalog.batches().to_vec());

        assert!(rebuilt.is_ok());
        assert_eq!(catalog.len(), 9);
        assert_eq!(catalog.batches().len(), 5);
        assert_eq!(catalog.keys().next(), Some("01_account_brief.md"));
        assert!(catalog
            .description("08_custom_demo.md")
            .unwrap()
            .contains("success metrics"));
    }

    #[test]
    fn test_rejects_overlapping_batches() {
        let err = Catalog::new(
            vec![spec("A"), spec("B")],
            vec![batch(&["A", "B"]), batch(&["B"])],
        )
        .unwrap_err();

        assert!(err.to_string().contains("more than one batch"));
    }

    #[test]
    fn test_rejects_unassigned_artifact() {
        let err = Catalog::new(vec![spec("A"), spec("B"), spec("C")], vec![batch(&["A"])])
            .unwrap_err();

        assert!(err.to_string().contains("B, C"));
    }

    #[test]
    fn test_rejects_unknown_batch_key() {
        let err = Catalog::new(vec![spec("A")], vec![batch(&["A", "Z"])]).unwrap_err();
        assert!(err.to_string().contains("unknown artifact Z"));
    }

    #[test]
    fn test_from_yaml_validates() {
        let yaml = r#"
artifacts:
  - key: A.md
    description: First
  - key: B.md
    description: Second
batches:
  - [A.md]
  - [B.md]
"#;
        let catalog = Catalog::from_yaml(yaml).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.batches()[1], vec!["B.md".to_string()]);

        let broken = r#"
artifacts:
  - key: A.md
    description: First
batches: []
"#;
        assert!(Catalog::from_yaml(broken).is_err());
    }

    #[test]
    fn test_missing_keys_in_catalog_order() {
        let catalog = Catalog::new(
            vec![spec("A"), spec("B"), spec("C")],
            vec![batch(&["A", "B", "C"])],
        )
        .unwrap();

        assert_eq!(catalog.missing_keys(|k| k == "B"), vec!["A", "C"]);
    }
}
