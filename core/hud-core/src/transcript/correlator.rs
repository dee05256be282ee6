//! Event correlation: transcript records → tools, sub-agents, todos.
//!
//! ## State Machine
//!
//! ```text
//! tool_use  name=Task                      → agent  running   (keyed by block id)
//! tool_use  name=TodoWrite|TaskCreate|...  → todos replaced   (no invocation)
//! tool_use  any other name                 → tool   running   (keyed by block id)
//! tool_result is_error=true                → tool   error      | agent completed
//! tool_result otherwise                    → tool   completed  | agent completed
//! tool_result for an unknown id            → no-op
//! ```
//!
//! Starts re-using an open id replace the earlier record in place; the key
//! keeps its original position for capping. Records without a usable
//! timestamp are stamped with the time they were processed.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde_json::Value;

use super::record::{BlockEvent, InvocationKind, TranscriptRecord};
use super::target::extract_target;
use super::types::{
    AgentInvocation, AgentState, TodoItem, TodoStatus, ToolInvocation, ToolState,
    TranscriptSnapshot,
};
use super::{MAX_AGENTS, MAX_TOOLS};

const UNKNOWN_AGENT_KIND: &str = "unknown";

#[derive(Debug, Default)]
pub struct Correlator {
    session_start: Option<DateTime<Utc>>,
    tools: IndexMap<String, ToolInvocation>,
    agents: IndexMap<String, AgentInvocation>,
    todos: Vec<TodoItem>,
}

impl Correlator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ingest(&mut self, record: &TranscriptRecord) {
        self.ingest_at(record, Utc::now());
    }

    /// Like [`Correlator::ingest`], with `now` used for records lacking a timestamp.
    pub fn ingest_at(&mut self, record: &TranscriptRecord, now: DateTime<Utc>) {
        let record_ts = record.timestamp();
        if self.session_start.is_none() {
            self.session_start = record_ts;
        }
        let at = record_ts.unwrap_or(now);

        for event in record.events() {
            match event {
                BlockEvent::Start { id, name, input } => self.start(id, name, input, at),
                BlockEvent::Result {
                    tool_use_id,
                    is_error,
                } => self.finish_invocation(&tool_use_id, is_error, at),
            }
        }
    }

    fn start(&mut self, id: String, name: String, input: Option<Value>, at: DateTime<Utc>) {
        match InvocationKind::classify(&name) {
            InvocationKind::SubAgent => {
                let field = |key: &str| {
                    input
                        .as_ref()
                        .and_then(|i| i.get(key))
                        .and_then(Value::as_str)
                        .map(str::to_string)
                };
                let agent = AgentInvocation {
                    id: id.clone(),
                    kind: field("subagent_type").unwrap_or_else(|| UNKNOWN_AGENT_KIND.to_string()),
                    model: field("model"),
                    description: field("description"),
                    state: AgentState::Running,
                    started_at: at,
                    ended_at: None,
                };
                self.agents.insert(id, agent);
            }
            InvocationKind::TodoMutation => {
                if let Some(todos) = parse_todos(input.as_ref()) {
                    self.todos = todos;
                }
            }
            InvocationKind::Tool => {
                let tool = ToolInvocation {
                    id: id.clone(),
                    target: extract_target(&name, input.as_ref()),
                    name,
                    state: ToolState::Running,
                    started_at: at,
                    ended_at: None,
                };
                if self.tools.insert(id, tool).is_some() {
                    tracing::debug!("Duplicate tool_use id replaced an open invocation");
                }
            }
        }
    }

    /// Only a running invocation finishes; later results for the same id are ignored.
    fn finish_invocation(&mut self, tool_use_id: &str, is_error: bool, at: DateTime<Utc>) {
        if let Some(tool) = self.tools.get_mut(tool_use_id).filter(|t| t.is_running()) {
            tool.state = if is_error {
                ToolState::Error
            } else {
                ToolState::Completed
            };
            tool.ended_at = Some(at);
        }

        if let Some(agent) = self.agents.get_mut(tool_use_id).filter(|a| a.is_running()) {
            agent.state = AgentState::Completed;
            agent.ended_at = Some(at);
        }
    }

    /// Number of invocations currently tracked (before capping).
    pub fn tracked(&self) -> (usize, usize) {
        (self.tools.len(), self.agents.len())
    }

    /// Finalizes into a bounded snapshot: the last [`MAX_TOOLS`] tools and
    /// [`MAX_AGENTS`] agents by insertion order, todos as last replaced.
    pub fn finish(self) -> TranscriptSnapshot {
        TranscriptSnapshot {
            session_start: self.session_start,
            tools: keep_last(self.tools, MAX_TOOLS),
            agents: keep_last(self.agents, MAX_AGENTS),
            todos: self.todos,
        }
    }
}

fn keep_last<T>(map: IndexMap<String, T>, cap: usize) -> Vec<T> {
    let skip = map.len().saturating_sub(cap);
    map.into_values().skip(skip).collect()
}

/// Reads `input.todos`. Returns `None` when there is no todo array, so the
/// caller keeps its current list; non-object entries are dropped.
fn parse_todos(input: Option<&Value>) -> Option<Vec<TodoItem>> {
    let items = input?.get("todos")?.as_array()?;

    Some(
        items
            .iter()
            .filter(|item| item.is_object())
            .map(|item| TodoItem {
                id: match item.get("id") {
                    Some(Value::String(s)) => s.clone(),
                    Some(Value::Number(n)) => n.to_string(),
                    _ => String::new(),
                },
                content: item
                    .get("content")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
                status: item
                    .get("status")
                    .and_then(Value::as_str)
                    .map(TodoStatus::from_raw)
                    .unwrap_or_default(),
            })
            .collect(),
    )
}
