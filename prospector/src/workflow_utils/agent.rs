//! Agent execution with stream reduction and progress logging
//!
//! An agent call yields an ordered stream of messages. [`StreamState`] folds
//! that stream into the single text payload the pipeline cares about while
//! keeping only the last assistant text and a few counters, and
//! [`execute_agent`] wraps the fold with structured progress events.

use claude_agent_sdk::{query, ClaudeAgentOptions, ContentBlock, Message, PermissionMode};
use futures::stream::LocalBoxStream;
use futures::StreamExt;
use prospector_sdk::{log_agent_complete, log_agent_failed, log_agent_message, log_agent_start};
use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;
use std::time::Instant;
use tracing::debug;

use crate::error::{ProspectorError, Result};

/// Ordered message stream produced by one agent call
pub type AgentStream = LocalBoxStream<'static, Result<AgentMessage>>;

/// One piece of an assistant message
#[derive(Debug, Clone, PartialEq)]
pub enum ContentSegment {
    Text(String),
    ToolUse { name: String, input: Value },
    Other,
}

/// Agent messages as seen by the pipeline
#[derive(Debug, Clone, PartialEq)]
pub enum AgentMessage {
    /// Assistant turn carrying text and tool-use segments
    Assistant { content: Vec<ContentSegment> },
    /// Terminal message: either an error or the final text payload
    Result {
        is_error: bool,
        error: Option<String>,
        result: Option<String>,
    },
    /// System, user and raw stream events
    Other,
}

impl AgentMessage {
    /// Assistant message with a single text segment
    pub fn assistant_text(text: impl Into<String>) -> Self {
        Self::Assistant {
            content: vec![ContentSegment::Text(text.into())],
        }
    }

    /// Successful terminal message
    pub fn success(result: impl Into<String>) -> Self {
        Self::Result {
            is_error: false,
            error: None,
            result: Some(result.into()),
        }
    }

    /// Failed terminal message
    pub fn failure(error: impl Into<String>) -> Self {
        Self::Result {
            is_error: true,
            error: Some(error.into()),
            result: None,
        }
    }

    /// Map a terminal result onto success or failure
    ///
    /// Error results from the CLI often carry no text; the result subtype
    /// (`error_max_turns`, `error_during_execution`, ...) then becomes the
    /// error description.
    fn terminal(is_error: bool, subtype: &str, result: Option<String>) -> Self {
        if !is_error {
            return AgentMessage::Result {
                is_error: false,
                error: None,
                result,
            };
        }

        let error = result
            .filter(|text| !text.trim().is_empty())
            .or_else(|| (!subtype.is_empty()).then(|| subtype.to_string()));
        AgentMessage::Result {
            is_error: true,
            error,
            result: None,
        }
    }

    /// Text segments concatenated in arrival order and trimmed
    ///
    /// `None` for non-assistant messages and for assistant turns without text.
    pub fn text(&self) -> Option<String> {
        let Self::Assistant { content } = self else {
            return None;
        };
        let joined: String = content
            .iter()
            .filter_map(|segment| match segment {
                ContentSegment::Text(text) => Some(text.as_str()),
                _ => None,
            })
            .collect();
        let trimmed = joined.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::Assistant { .. } => "assistant",
            Self::Result { .. } => "result",
            Self::Other => "other",
        }
    }
}

impl From<ContentBlock> for ContentSegment {
    fn from(block: ContentBlock) -> Self {
        match block {
            ContentBlock::Text { text } => ContentSegment::Text(text),
            ContentBlock::ToolUse { name, input, .. } => ContentSegment::ToolUse { name, input },
            _ => ContentSegment::Other,
        }
    }
}

impl From<Message> for AgentMessage {
    fn from(message: Message) -> Self {
        match message {
            Message::Assistant { message, .. } => AgentMessage::Assistant {
                content: message.content.into_iter().map(ContentSegment::from).collect(),
            },
            Message::Result {
                subtype,
                is_error,
                result,
                ..
            } => AgentMessage::terminal(is_error, &subtype, result),
            _ => AgentMessage::Other,
        }
    }
}


/// Who may see the agent session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Visibility {
    #[default]
    Private,
    Public,
}

/// How much of the agent's own output is forwarded as progress events
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AgentLogLevel {
    /// Progress summaries only
    #[default]
    Info,
    /// Every assistant text segment as well
    Debug,
}

/// Configuration handed to the agent collaborator with every prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentOptions {
    /// Skip tool permission prompts
    pub dangerously_allow_all: bool,
    pub visibility: Visibility,
    pub log_level: AgentLogLevel,
    /// Tools the agent may call; empty leaves the backend default
    pub allowed_tools: Vec<String>,
    pub system_prompt: Option<String>,
}

impl Default for AgentOptions {
    fn default() -> Self {
        Self {
            dangerously_allow_all: true,
            visibility: Visibility::Private,
            log_level: AgentLogLevel::Info,
            allowed_tools: Vec::new(),
            system_prompt: None,
        }
    }
}

impl AgentOptions {
    pub fn with_tools<I, S>(mut self, tools: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_tools = tools.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(system_prompt.into());
        self
    }
}

/// The external generative agent
pub trait AgentClient {
    /// Start an agent call and return its message stream
    ///
    /// Start-up failures surface as the first stream item.
    fn execute(&self, prompt: String, options: &AgentOptions) -> AgentStream;
}

/// Agent backed by the Claude Code CLI through `claude-agent-sdk`
///
/// Sessions are local to the CLI process, so [`Visibility`] has no effect here.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClaudeAgent;

impl ClaudeAgent {
    fn claude_options(options: &AgentOptions) -> ClaudeAgentOptions {
        let mut builder = ClaudeAgentOptions::builder();
        if options.dangerously_allow_all {
            builder = builder.permission_mode(PermissionMode::BypassPermissions);
        }
        if !options.allowed_tools.is_empty() {
            builder = builder.allowed_tools(options.allowed_tools.clone());
        }
        if let Some(system_prompt) = &options.system_prompt {
            builder = builder.system_prompt(system_prompt.clone());
        }
        builder.build()
    }
}

fn transport(e: impl std::fmt::Display) -> ProspectorError {
    ProspectorError::Transport(e.to_string())
}

impl AgentClient for ClaudeAgent {
    fn execute(&self, prompt: String, options: &AgentOptions) -> AgentStream {
        let claude_options = Self::claude_options(options);
        debug!(visibility = ?options.visibility, prompt_len = prompt.len(), "starting claude agent");

        let stream = async_stream::stream! {
            let inner = match query(prompt.as_str(), Some(claude_options)).await {
                Ok(inner) => inner,
                Err(e) => {
                    yield Err::<AgentMessage, ProspectorError>(transport(e));
                    return;
                }
            };
            let mut inner = Box::pin(inner);
            while let Some(message) = inner.next().await {
                yield message.map(AgentMessage::from).map_err(transport);
            }
        };
        Box::pin(stream)
    }
}

/// Bounded state folded from an agent stream
///
/// Later assistant text replaces earlier text; nothing else is retained.
#[derive(Debug, Default)]
pub struct StreamState {
    last_text: String,
    messages: usize,
    turns: usize,
}

impl StreamState {
    /// Fold one message; returns the final payload once the terminal message arrives
    pub fn fold(&mut self, message: &AgentMessage) -> Result<Option<String>> {
        self.messages += 1;
        match message {
            AgentMessage::Assistant { .. } => {
                self.turns += 1;
                if let Some(text) = message.text() {
                    self.last_text = text;
                }
                Ok(None)
            }
            AgentMessage::Result {
                is_error: true,
                error,
                ..
            } => Err(ProspectorError::Agent(
                error
                    .clone()
                    .unwrap_or_else(|| "agent ended with an unspecified error".to_string()),
            )),
            AgentMessage::Result { result, .. } => {
                let final_text = result
                    .as_deref()
                    .map(str::trim)
                    .filter(|text| !text.is_empty())
                    .map(str::to_string)
                    .unwrap_or_else(|| std::mem::take(&mut self.last_text));
                Ok(Some(final_text))
            }
            AgentMessage::Other => Ok(None),
        }
    }

    pub fn messages(&self) -> usize {
        self.messages
    }

    pub fn turns(&self) -> usize {
        self.turns
    }

    pub fn last_text(&self) -> &str {
        &self.last_text
    }
}

/// Reduce an agent stream to its final text payload
///
/// Fails with the carried description when the terminal message is an error,
/// and with [`ProspectorError::NoResult`] when the stream ends without one.
pub async fn collect_result(mut stream: AgentStream, task: &str) -> Result<String> {
    let mut state = StreamState::default();
    while let Some(message) = stream.next().await {
        if let Some(text) = state.fold(&message?)? {
            return Ok(text);
        }
    }
    Err(ProspectorError::NoResult {
        task: task.to_string(),
    })
}

/// Which progress hints to derive from the stream
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ProgressStyle {
    /// Findings and web tool usage
    Research,
    /// Periodic "still generating" turn counter
    Synthesis,
    #[default]
    Quiet,
}

/// One agent invocation
pub struct AgentConfig {
    /// Task ID this agent belongs to
    pub task_id: String,
    /// Agent name (for logging)
    pub agent_name: String,
    /// Description of what this agent is doing
    pub description: String,
    pub prompt: String,
    pub options: AgentOptions,
    pub progress: ProgressStyle,
}

impl AgentConfig {
    pub fn new(
        task_id: impl Into<String>,
        agent_name: impl Into<String>,
        description: impl Into<String>,
        prompt: impl Into<String>,
        options: AgentOptions,
    ) -> Self {
        Self {
            task_id: task_id.into(),
            agent_name: agent_name.into(),
            description: description.into(),
            prompt: prompt.into(),
            options,
            progress: ProgressStyle::Quiet,
        }
    }

    pub fn with_progress(mut self, progress: ProgressStyle) -> Self {
        self.progress = progress;
        self
    }
}

/// Run one agent call to completion and return its final text
///
/// Emits agent start/complete/failed events and derives progress messages
/// from the stream according to [`AgentConfig::progress`].
pub async fn execute_agent(client: &dyn AgentClient, config: AgentConfig) -> Result<String> {
    let AgentConfig {
        task_id,
        agent_name,
        description,
        prompt,
        options,
        progress,
    } = config;

    log_agent_start!(&task_id, &agent_name, &description);

    let stream = client.execute(prompt, &options);
    let reporter = Reporter {
        task_id: &task_id,
        agent_name: &agent_name,
        progress,
        log_level: options.log_level,
    };

    match handle_stream(stream, &reporter).await {
        Ok(text) => {
            log_agent_complete!(&task_id, &agent_name, format!("{} chars", text.len()));
            Ok(text)
        }
        Err(e) => {
            log_agent_failed!(&task_id, &agent_name, &e);
            Err(e)
        }
    }
}

struct Reporter<'a> {
    task_id: &'a str,
    agent_name: &'a str,
    progress: ProgressStyle,
    log_level: AgentLogLevel,
}

impl Reporter<'_> {
    fn report(&self, message: &AgentMessage, turns: usize) {
        let AgentMessage::Assistant { content } = message else {
            return;
        };

        let text = message.text();
        if let Some(text) = &text {
            if self.log_level == AgentLogLevel::Debug {
                log_agent_message!(self.task_id, self.agent_name, text);
            }
        }

        match self.progress {
            ProgressStyle::Research => {
                if let Some(finding) = text.as_deref().and_then(summarize_finding) {
                    println!("   {}", finding);
                    log_agent_message!(self.task_id, self.agent_name, &finding);
                }
                for segment in content {
                    if let ContentSegment::ToolUse { name, input } = segment {
                        if let Some(details) = describe_tool_use(name, input) {
                            println!("   {}", details);
                            log_agent_message!(self.task_id, self.agent_name, &details);
                        }
                    }
                }
            }
            ProgressStyle::Synthesis => {
                if text.is_some() && turns % 3 == 0 {
                    let note = format!("⏳ Generating files... (turn {})", turns);
                    println!("   {}", note);
                    log_agent_message!(self.task_id, self.agent_name, &note);
                }
            }
            ProgressStyle::Quiet => {}
        }
    }
}

async fn handle_stream(mut stream: AgentStream, reporter: &Reporter<'_>) -> Result<String> {
    let mut state = StreamState::default();
    let started = Instant::now();

    while let Some(message) = stream.next().await {
        let message = message?;
        debug!(
            task_id = reporter.task_id,
            message = state.messages() + 1,
            elapsed_secs = started.elapsed().as_secs(),
            kind = message.kind(),
            "agent message"
        );

        if let Some(text) = state.fold(&message)? {
            debug!(
                task_id = reporter.task_id,
                messages = state.messages(),
                chars = text.len(),
                "agent finished"
            );
            return Ok(text);
        }
        reporter.report(&message, state.turns());
    }

    Err(ProspectorError::NoResult {
        task: reporter.task_id.to_string(),
    })
}

fn finding_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)(?:found|discovered|identified).*?:\s*(.{0,80})").expect("valid regex")
    })
}

/// One-line progress hint for research narration, if the text announces something
pub fn summarize_finding(text: &str) -> Option<String> {
    if let Some(found) = finding_pattern()
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim())
        .filter(|m| !m.is_empty())
    {
        return Some(format!("✓ {}", found));
    }

    if text.contains("Pass A") || text.contains("company basics") {
        return Some("→ Researching company basics...".to_string());
    }
    if text.contains("Pass B") || text.contains("12-month") {
        return Some("→ Researching recent initiatives...".to_string());
    }
    if text.contains("Pass C") || text.contains("Amp") {
        return Some("→ Researching Amp capabilities...".to_string());
    }

    None
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        let head: String = text.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", head)
    } else {
        text.to_string()
    }
}

fn host_of(url: &str) -> &str {
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"));
    match rest {
        Some(rest) => rest.split('/').next().unwrap_or(rest),
        None => url,
    }
}

/// Describe a web research tool call for progress output
///
/// Returns `None` for tools that are not worth narrating.
pub fn describe_tool_use(tool_name: &str, input: &Value) -> Option<String> {
    match tool_name {
        "WebSearch" | "web_search" => {
            let query = ["query", "objective"]
                .iter()
                .find_map(|field| input.get(field).and_then(Value::as_str))
                .unwrap_or("");
            Some(format!("🔍 Searching: {}", truncate(query, 60)))
        }
        "WebFetch" | "read_web_page" => {
            let url = input.get("url").and_then(Value::as_str).unwrap_or("");
            Some(format!("📖 Reading: {}", host_of(url)))
        }
        _ => None,
    }
}
