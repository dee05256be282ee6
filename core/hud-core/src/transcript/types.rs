//! Read-only activity snapshot produced by the transcript extractor.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolState {
    Running,
    Completed,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolInvocation {
    pub id: String,
    pub name: String,
    /// Short descriptor of what the tool acted on (path, pattern, URL, command).
    pub target: Option<String>,
    pub state: ToolState,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
}

impl ToolInvocation {
    pub fn is_running(&self) -> bool {
        self.state == ToolState::Running
    }
}

/// Sub-agents have no error state; any result finishes them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentState {
    Running,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentInvocation {
    pub id: String,
    /// Sub-agent type, `"unknown"` when the dispatch didn't name one.
    pub kind: String,
    pub model: Option<String>,
    pub description: Option<String>,
    pub state: AgentState,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
}

impl AgentInvocation {
    pub fn is_running(&self) -> bool {
        self.state == AgentState::Running
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TodoStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
}

impl TodoStatus {
    /// Unrecognised statuses read as pending.
    pub fn from_raw(raw: &str) -> Self {
        match raw {
            "in_progress" => TodoStatus::InProgress,
            "completed" => TodoStatus::Completed,
            _ => TodoStatus::Pending,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoItem {
    pub id: String,
    pub content: String,
    pub status: TodoStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSnapshot {
    pub session_start: Option<DateTime<Utc>>,
    /// At most [`super::MAX_TOOLS`], oldest first.
    pub tools: Vec<ToolInvocation>,
    /// At most [`super::MAX_AGENTS`], oldest first.
    pub agents: Vec<AgentInvocation>,
    pub todos: Vec<TodoItem>,
}

impl TranscriptSnapshot {
    pub fn is_empty(&self) -> bool {
        self.session_start.is_none()
            && self.tools.is_empty()
            && self.agents.is_empty()
            && self.todos.is_empty()
    }
}
