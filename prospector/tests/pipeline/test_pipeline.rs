//! End-to-end runs with a scripted agent

use super::common::*;
use prospector::discovery::{run_prospector, Catalog, PipelineInput};
use prospector::workflow_utils::{Script, ScriptedAgent};
use prospector::ProspectorError;
use std::time::Duration;

fn acme() -> PipelineInput {
    PipelineInput {
        domains: Some(vec![" acme.example ".to_string()]),
        ..PipelineInput::new("  Acme Corp. ")
    }
}

#[tokio::test]
async fn test_full_run_writes_every_catalog_file() {
    let tmp = tempfile::tempdir().unwrap();
    let config = config_in(tmp.path());
    let mut scripts = vec![research_script()];
    scripts.extend(batch_scripts(&config.catalog));
    let agent = ScriptedAgent::new(scripts);

    let result = run_prospector(&agent, &acme(), &config).await.unwrap();

    assert_eq!(result.output_dir, tmp.path().join("acme-corp"));
    assert_eq!(result.files_written, 9);
    assert_eq!(result.manifest.company_slug, "acme-corp");
    for key in Catalog::discovery().keys() {
        let content = std::fs::read_to_string(result.output_dir.join(key)).unwrap();
        assert!(content.starts_with("---\n"), "{} lacks frontmatter", key);
    }

    let prompts = agent.prompts();
    assert_eq!(prompts.len(), 1 + config.catalog.batches().len());
    assert!(prompts[0].contains("Known domains: acme.example"));
    assert!(prompts[1].contains("Jo Park"));
}

#[tokio::test]
async fn test_loose_research_records_still_run() {
    let tmp = tempfile::tempdir().unwrap();
    let config = config_in(tmp.path());
    let mut research = research_value();
    research["facts"] = serde_json::json!(["Acme is hiring platform engineers"]);
    research["personas"][0]["name"] = serde_json::Value::Null;
    research["competition"]["maturity"] = serde_json::Value::Null;

    let mut scripts = vec![Script::reply(research.to_string())];
    scripts.extend(batch_scripts(&config.catalog));
    let agent = ScriptedAgent::new(scripts);

    let result = run_prospector(&agent, &acme(), &config).await.unwrap();

    assert_eq!(result.files_written, 9);
    let prompts = agent.prompts();
    assert!(prompts[1].contains("Acme is hiring platform engineers"));
    assert!(prompts[1].contains(r#""maturity": null"#));
}

#[tokio::test]
async fn test_failing_batch_stops_run_before_writing() {
    let tmp = tempfile::tempdir().unwrap();
    let config = config_in(tmp.path());
    let agent = ScriptedAgent::new([
        research_script(),
        batch_script(&["01_account_brief.md", "02_org_and_contacts.md"]),
        batch_script(&["03_tech_stack.md"]),
        batch_script(&["05_competition_and_landscape.md", "06_call_plan_and_talk_track.md"]),
    ]);

    let err = run_prospector(&agent, &acme(), &config).await.unwrap_err();

    assert_eq!(
        err.to_string(),
        "Failed to parse batch 2: Missing expected file: 04_initiatives_and_triggers.md"
    );
    assert_eq!(agent.calls(), 3);
    assert!(!tmp.path().join("acme-corp").exists());
}

#[tokio::test(start_paused = true)]
async fn test_hanging_batch_times_out() {
    let tmp = tempfile::tempdir().unwrap();
    let config = prospector::discovery::PipelineConfig {
        batch_timeout: Duration::from_secs(30),
        ..config_in(tmp.path())
    };
    let agent = ScriptedAgent::new([research_script(), Script::Hang]);

    let err = run_prospector(&agent, &acme(), &config).await.unwrap_err();

    assert!(matches!(err, ProspectorError::BatchTimeout { batch: 1, .. }));
    assert_eq!(agent.calls(), 2);
}

#[tokio::test]
async fn test_custom_catalog_and_out_dir() {
    let tmp = tempfile::tempdir().unwrap();
    let catalog = Catalog::from_yaml(
        r#"
artifacts:
  - key: A.md
    description: First
  - key: B.md
    description: Second
  - key: C.md
    description: Third
  - key: D.md
    description: Fourth
batches:
  - [A.md, B.md]
  - [C.md, D.md]
"#,
    )
    .unwrap();
    let config = prospector::discovery::PipelineConfig {
        catalog,
        ..config_in(tmp.path())
    };
    let out = tmp.path().join("custom");
    let input = PipelineInput {
        out_dir: Some(out.clone()),
        ..PipelineInput::new("Acme Corp.")
    };
    let agent = ScriptedAgent::new([
        research_script(),
        batch_script(&["A.md", "B.md"]),
        batch_script(&["C.md", "D.md"]),
    ]);

    let result = run_prospector(&agent, &input, &config).await.unwrap();

    assert_eq!(result.output_dir, out);
    let paths: Vec<&str> = result.manifest.files.iter().map(|f| f.path.as_str()).collect();
    assert_eq!(paths, vec!["A.md", "B.md", "C.md", "D.md"]);
    assert!(out.join("D.md").exists());
    assert!(!tmp.path().join("acme-corp").exists());
}

#[tokio::test]
async fn test_research_error_is_reported() {
    let tmp = tempfile::tempdir().unwrap();
    let agent = ScriptedAgent::new([Script::reply("Sorry, I could not research this company.")]);

    let err = run_prospector(&agent, &acme(), &config_in(tmp.path()))
        .await
        .unwrap_err();

    assert!(err.to_string().starts_with("Failed to parse research bundle:"));
    assert_eq!(agent.calls(), 1);
}
