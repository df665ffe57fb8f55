//! Structured progress events for prospector pipelines.
//!
//! Every event is serialized as one `__PROSPECTOR_EVENT__:<json>` line on
//! stderr so a wrapping process can follow phase, batch and agent progress
//! without scraping human-readable output.

use serde::{Deserialize, Serialize};

/// Prefix marking a structured event line on stderr
pub const EVENT_PREFIX: &str = "__PROSPECTOR_EVENT__:";

/// Structured logging events emitted by the pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PipelineLog {
    /// Phase started
    PhaseStarted {
        phase: usize,
        name: String,
        total_phases: usize,
    },
    /// Phase completed
    PhaseCompleted { phase: usize, name: String },
    /// Phase failed
    PhaseFailed {
        phase: usize,
        name: String,
        error: String,
    },
    /// Synthesis batch started
    BatchStarted {
        batch: usize,
        total_batches: usize,
        keys: Vec<String>,
    },
    /// Synthesis batch produced its files
    BatchCompleted { batch: usize, files: usize },
    /// Agent call started
    AgentStarted {
        task_id: String,
        agent_name: String,
        description: String,
    },
    /// Agent progress (text, tool use, findings)
    AgentMessage {
        task_id: String,
        agent_name: String,
        message: String,
    },
    /// Agent call completed
    AgentCompleted {
        task_id: String,
        agent_name: String,
        result: Option<String>,
    },
    /// Agent call failed
    AgentFailed {
        task_id: String,
        agent_name: String,
        error: String,
    },
    /// Artifact written to disk
    FileWritten { path: String, bytes: usize },
}

impl PipelineLog {
    /// Serialize this event as a single prefixed line
    pub fn to_line(&self) -> Option<String> {
        serde_json::to_string(self)
            .ok()
            .map(|json| format!("{}{}", EVENT_PREFIX, json))
    }

    /// Parse a line previously produced by [`PipelineLog::to_line`]
    ///
    /// Returns `None` for ordinary output lines and malformed payloads.
    pub fn parse_line(line: &str) -> Option<Self> {
        let json = line.trim_end().strip_prefix(EVENT_PREFIX)?;
        serde_json::from_str(json).ok()
    }

    /// Emit this event to stderr
    pub fn emit(&self) {
        if let Some(line) = self.to_line() {
            use std::io::Write;
            eprintln!("{}", line);
            // Force flush stderr in async/concurrent contexts
            let _ = std::io::stderr().flush();
        }
    }
}

#[macro_export]
macro_rules! log_phase_start {
    ($phase:expr, $name:expr, $total:expr) => {
        $crate::PipelineLog::PhaseStarted {
            phase: $phase,
            name: $name.to_string(),
            total_phases: $total,
        }
        .emit();
    };
}

#[macro_export]
macro_rules! log_phase_complete {
    ($phase:expr, $name:expr) => {
        $crate::PipelineLog::PhaseCompleted {
            phase: $phase,
            name: $name.to_string(),
        }
        .emit();
    };
}

#[macro_export]
macro_rules! log_phase_failed {
    ($phase:expr, $name:expr, $error:expr) => {
        $crate::PipelineLog::PhaseFailed {
            phase: $phase,
            name: $name.to_string(),
            error: $error.to_string(),
        }
        .emit();
    };
}

#[macro_export]
macro_rules! log_batch_start {
    ($batch:expr, $total:expr, $keys:expr) => {
        $crate::PipelineLog::BatchStarted {
            batch: $batch,
            total_batches: $total,
            keys: $keys.iter().map(|k| k.to_string()).collect(),
        }
        .emit();
    };
}

#[macro_export]
macro_rules! log_batch_complete {
    ($batch:expr, $files:expr) => {
        $crate::PipelineLog::BatchCompleted {
            batch: $batch,
            files: $files,
        }
        .emit();
    };
}

#[macro_export]
macro_rules! log_agent_start {
    ($task_id:expr, $agent:expr, $desc:expr) => {
        $crate::PipelineLog::AgentStarted {
            task_id: $task_id.to_string(),
            agent_name: $agent.to_string(),
            description: $desc.to_string(),
        }
        .emit();
    };
}

#[macro_export]
macro_rules! log_agent_message {
    ($task_id:expr, $agent:expr, $msg:expr) => {
        $crate::PipelineLog::AgentMessage {
            task_id: $task_id.to_string(),
            agent_name: $agent.to_string(),
            message: $msg.to_string(),
        }
        .emit();
    };
}

#[macro_export]
macro_rules! log_agent_complete {
    ($task_id:expr, $agent:expr) => {
        $crate::PipelineLog::AgentCompleted {
            task_id: $task_id.to_string(),
            agent_name: $agent.to_string(),
            result: None,
        }
        .emit();
    };
    ($task_id:expr, $agent:expr, $result:expr) => {
        $crate::PipelineLog::AgentCompleted {
            task_id: $task_id.to_string(),
            agent_name: $agent.to_string(),
            result: Some($result.to_string()),
        }
        .emit();
    };
}

#[macro_export]
macro_rules! log_agent_failed {
    ($task_id:expr, $agent:expr, $error:expr) => {
        $crate::PipelineLog::AgentFailed {
            task_id: $task_id.to_string(),
            agent_name: $agent.to_string(),
            error: $error.to_string(),
        }
        .emit();
    };
}

#[macro_export]
macro_rules! log_file_written {
    ($path:expr, $bytes:expr) => {
        $crate::PipelineLog::FileWritten {
            path: $path.to_string(),
            bytes: $bytes,
        }
        .emit();
    };
}
