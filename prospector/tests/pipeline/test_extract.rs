//! Payload extraction from free-form agent output

use futures::stream;
use prospector::workflow_utils::{
    collect_result, extract_json, parse_json, AgentMessage, AgentStream,
};
use prospector::ProspectorError;
use serde_json::Value;

fn stream_of(messages: Vec<AgentMessage>) -> AgentStream {
    Box::pin(stream::iter(messages.into_iter().map(Ok::<_, ProspectorError>)))
}

#[test]
fn test_fenced_json_block() {
    let text = "Sure!\n```json\n{\"a\":1}\n```\nAnything else?";
    assert_eq!(extract_json(text), "{\"a\":1}");
}

#[test]
fn test_bare_object_in_prose() {
    assert_eq!(extract_json("Result: {\"a\":1} (done)"), "{\"a\":1}");
}

#[test]
fn test_plain_text_is_trimmed() {
    assert_eq!(extract_json("\n  no json here  \n"), "no json here");
}

#[test]
fn test_nested_objects_survive_greedy_span() {
    let text = "prefix {\"files\": [{\"path\": \"a.md\"}]} suffix";
    let value: Value = parse_json(&extract_json(text), "batch 1").unwrap();
    assert_eq!(value["files"][0]["path"], "a.md");
}

#[tokio::test]
async fn test_last_assistant_text_feeds_extraction() {
    let stream = stream_of(vec![
        AgentMessage::assistant_text("Let me think about this."),
        AgentMessage::assistant_text("```json\n{\"files\": []}\n```"),
        AgentMessage::Result {
            is_error: false,
            error: None,
            result: None,
        },
    ]);

    let text = collect_result(stream, "batch 1").await.unwrap();
    assert_eq!(extract_json(&text), "{\"files\": []}");
}
