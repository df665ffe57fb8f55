//! Workflow utilities shared by the pipeline stages
//!
//! - **agent**: Agent execution with stream reduction and progress logging
//! - **json**: JSON extraction from agent prose and parsing
//! - **batch**: Deadline race and bounded concurrent fan-out
//! - **scripted**: Replaying agent for offline runs and tests

pub mod agent;
pub mod batch;
pub mod json;
pub mod scripted;

pub use agent::{
    collect_result, execute_agent, AgentClient, AgentConfig, AgentLogLevel, AgentMessage,
    AgentOptions, AgentStream, ClaudeAgent, ContentSegment, ProgressStyle, Visibility,
};
pub use batch::{execute_concurrent, run_with_deadline, TaskContext};
pub use json::{extract_and_parse, extract_json, parse_json};
pub use scripted::{Script, ScriptedAgent};
