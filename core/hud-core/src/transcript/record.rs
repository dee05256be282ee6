//! Decoding of one transcript line into the parts the correlator cares about.
//!
//! Only `timestamp` and `message.content[]` are read. Everything else on the
//! record is ignored, and a content block that doesn't decode (wrong field
//! types, unknown shape) is dropped on its own without failing the record.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

/// Tool name the host uses to dispatch a sub-agent.
pub const SUBAGENT_TOOL: &str = "Task";

/// Tool names whose input replaces the todo list.
pub const TODO_TOOLS: [&str; 3] = ["TodoWrite", "TaskCreate", "TaskUpdate"];

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct TranscriptRecord {
    timestamp: Option<Value>,
    message: Option<Value>,
}

impl TranscriptRecord {
    pub fn decode(line: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(line)
    }

    /// The record's timestamp, if it carries a non-empty RFC 3339 string.
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        let raw = self.timestamp.as_ref()?.as_str()?.trim();
        if raw.is_empty() {
            return None;
        }
        DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|ts| ts.with_timezone(&Utc))
    }

    /// Invocation events carried by `message.content`, in order.
    pub fn events(&self) -> impl Iterator<Item = BlockEvent> + '_ {
        self.message
            .as_ref()
            .and_then(|m| m.get("content"))
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .filter_map(|block| ContentBlock::deserialize(block).ok())
            .filter_map(ContentBlock::into_event)
    }
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum ContentBlock {
    #[serde(rename = "tool_use")]
    ToolUse {
        #[serde(default)]
        id: Option<String>,
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        input: Option<Value>,
    },
    #[serde(rename = "tool_result")]
    ToolResult {
        #[serde(default)]
        tool_use_id: Option<String>,
        #[serde(default)]
        is_error: Option<Value>,
    },
    #[serde(other)]
    Other,
}

impl ContentBlock {
    fn into_event(self) -> Option<BlockEvent> {
        match self {
            ContentBlock::ToolUse {
                id: Some(id),
                name: Some(name),
                input,
            } if !id.is_empty() && !name.is_empty() => Some(BlockEvent::Start { id, name, input }),
            ContentBlock::ToolResult {
                tool_use_id: Some(tool_use_id),
                is_error,
            } if !tool_use_id.is_empty() => Some(BlockEvent::Result {
                tool_use_id,
                is_error: is_error.as_ref().is_some_and(is_truthy),
            }),
            _ => None,
        }
    }
}

/// Loose truthiness for flags written by tools that don't always emit booleans.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum BlockEvent {
    Start {
        id: String,
        name: String,
        input: Option<Value>,
    },
    Result {
        tool_use_id: String,
        is_error: bool,
    },
}

/// What a start block turns into, decided by its tool name alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvocationKind {
    SubAgent,
    TodoMutation,
    Tool,
}

impl InvocationKind {
    pub fn classify(name: &str) -> Self {
        match name {
            SUBAGENT_TOOL => InvocationKind::SubAgent,
            n if TODO_TOOLS.contains(&n) => InvocationKind::TodoMutation,
            _ => InvocationKind::Tool,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn events(line: &str) -> Vec<BlockEvent> {
        TranscriptRecord::decode(line.as_bytes())
            .unwrap()
            .events()
            .collect()
    }

    #[test]
    fn test_decode_tool_use_and_result() {
        let evs = events(
            r#"{"message":{"content":[
                {"type":"text","text":"hi"},
                {"type":"tool_use","id":"a","name":"Read","input":{"file_path":"/x"}},
                {"type":"tool_result","tool_use_id":"a","is_error":true,"content":"boom"}
            ]}}"#,
        );

        assert_eq!(evs.len(), 2);
        assert!(matches!(&evs[0], BlockEvent::Start { id, name, input: Some(_) } if id == "a" && name == "Read"));
        assert_eq!(
            evs[1],
            BlockEvent::Result {
                tool_use_id: "a".to_string(),
                is_error: true
            }
        );
    }

    #[test]
    fn test_string_content_yields_no_events_but_keeps_timestamp() {
        let record = TranscriptRecord::decode(
            br#"{"timestamp":"2025-01-01T00:00:00Z","message":{"content":"plain text"}}"#,
        )
        .unwrap();
        assert!(record.timestamp().is_some());
        assert_eq!(record.events().count(), 0);
    }

    #[test]
    fn test_start_without_id_or_name_is_ignored() {
        let evs = events(
            r#"{"message":{"content":[
                {"type":"tool_use","name":"Read"},
                {"type":"tool_use","id":"","name":"Read"},
                {"type":"tool_use","id":"b"}
            ]}}"#,
        );
        assert!(evs.is_empty());
    }

    #[test]
    fn test_malformed_block_does_not_poison_siblings() {
        let evs = events(
            r#"{"message":{"content":[
                {"type":"tool_use","id":7,"name":"Read"},
                {"type":"tool_use","id":"ok","name":"Bash"}
            ]}}"#,
        );
        assert_eq!(evs.len(), 1);
    }

    #[test]
    fn test_non_boolean_error_flag_keeps_result() {
        let evs = events(
            r#"{"message":{"content":[
                {"type":"tool_result","tool_use_id":"a","is_error":"true"},
                {"type":"tool_result","tool_use_id":"b","is_error":0},
                {"type":"tool_result","tool_use_id":"c","is_error":null},
                {"type":"tool_result","tool_use_id":"d","is_error":1}
            ]}}"#,
        );
        let flags: Vec<(String, bool)> = evs
            .into_iter()
            .filter_map(|ev| match ev {
                BlockEvent::Result {
                    tool_use_id,
                    is_error,
                } => Some((tool_use_id, is_error)),
                BlockEvent::Start { .. } => None,
            })
            .collect();

        assert_eq!(
            flags,
            vec![
                ("a".to_string(), true),
                ("b".to_string(), false),
                ("c".to_string(), false),
                ("d".to_string(), true),
            ]
        );
    }

    #[test]
    fn test_timestamp_handling() {
        let blank = TranscriptRecord::decode(br#"{"timestamp":"  "}"#).unwrap();
        assert!(blank.timestamp().is_none());

        let garbage = TranscriptRecord::decode(br#"{"timestamp":"yesterday"}"#).unwrap();
        assert!(garbage.timestamp().is_none());

        let numeric = TranscriptRecord::decode(br#"{"timestamp":12}"#).unwrap();
        assert!(numeric.timestamp().is_none());
    }

    #[test]
    fn test_classify_reserved_names() {
        assert_eq!(InvocationKind::classify("Task"), InvocationKind::SubAgent);
        assert_eq!(
            InvocationKind::classify("TodoWrite"),
            InvocationKind::TodoMutation
        );
        assert_eq!(
            InvocationKind::classify("TaskCreate"),
            InvocationKind::TodoMutation
        );
        assert_eq!(
            InvocationKind::classify("TaskUpdate"),
            InvocationKind::TodoMutation
        );
        assert_eq!(InvocationKind::classify("Read"), InvocationKind::Tool);
        assert_eq!(InvocationKind::classify("task"), InvocationKind::Tool);
    }
}
