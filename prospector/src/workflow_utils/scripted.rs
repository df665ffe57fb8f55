//! Replay agent for offline runs and tests
//!
//! [`ScriptedAgent`] answers each call with the next queued script and
//! records every prompt it received, so callers can assert which calls
//! were made and in what order.

use futures::stream;
use std::collections::VecDeque;
use std::sync::Mutex;

use crate::error::{ProspectorError, Result};
use crate::workflow_utils::agent::{AgentClient, AgentMessage, AgentOptions, AgentStream};

/// Canned response for one agent call
#[derive(Debug, Clone)]
pub enum Script {
    /// Yield these messages, then end the stream
    Messages(Vec<AgentMessage>),
    /// Never yield anything
    Hang,
}

impl Script {
    /// A single successful result carrying `text`
    pub fn reply(text: impl Into<String>) -> Self {
        Script::Messages(vec![AgentMessage::success(text)])
    }
}

#[derive(Debug, Default)]
pub struct ScriptedAgent {
    scripts: Mutex<VecDeque<Script>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedAgent {
    pub fn new(scripts: impl IntoIterator<Item = Script>) -> Self {
        Self {
            scripts: Mutex::new(scripts.into_iter().collect()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Prompts received so far, in call order
    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .map(|prompts| prompts.clone())
            .unwrap_or_default()
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().map(|p| p.len()).unwrap_or(0)
    }
}

impl AgentClient for ScriptedAgent {
    fn execute(&self, prompt: String, _options: &AgentOptions) -> AgentStream {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt);
        }
        let next = self
            .scripts
            .lock()
            .ok()
            .and_then(|mut scripts| scripts.pop_front());

        match next {
            Some(Script::Messages(messages)) => {
                Box::pin(stream::iter(messages.into_iter().map(Ok::<_, ProspectorError>)))
            }
            Some(Script::Hang) => Box::pin(stream::pending::<Result<AgentMessage>>()),
            // Out of scripts: end without a terminal message
            None => Box::pin(stream::empty::<Result<AgentMessage>>()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow_utils::agent::collect_result;

    #[tokio::test]
    async fn test_replays_scripts_in_order() {
        let agent = ScriptedAgent::new([Script::reply("one"), Script::reply("two")]);
        let options = AgentOptions::default();

        let first = collect_result(agent.execute("p1".into(), &options), "a").await.unwrap();
        let second = collect_result(agent.execute("p2".into(), &options), "b").await.unwrap();

        assert_eq!((first.as_str(), second.as_str()), ("one", "two"));
        assert_eq!(agent.prompts(), vec!["p1".to_string(), "p2".to_string()]);
    }

    #[tokio::test]
    async fn test_exhausted_script_ends_without_result() {
        let agent = ScriptedAgent::default();
        let err = collect_result(agent.execute("p".into(), &AgentOptions::default()), "batch 1")
            .await
            .unwrap_err();

        assert!(matches!(err, ProspectorError::NoResult { .. }));
        assert_eq!(agent.calls(), 1);
    }
}
