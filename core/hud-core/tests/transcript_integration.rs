//! Transcript extraction against real files under a temporary trusted root.

use std::path::{Path, PathBuf};

use chrono::{TimeZone, Utc};
use hud_core::transcript::{
    AgentState, TodoStatus, ToolState, TranscriptParser, MAX_AGENTS, MAX_TOOLS,
};
use tempfile::TempDir;

struct Fixture {
    root: TempDir,
}

impl Fixture {
    fn new() -> Self {
        Self {
            root: tempfile::tempdir().unwrap(),
        }
    }

    fn root(&self) -> &Path {
        self.root.path()
    }

    fn write(&self, name: &str, lines: &[String]) -> PathBuf {
        let path = self.root().join("projects").join(name);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, lines.join("\n")).unwrap();
        path
    }

    fn parser(&self) -> TranscriptParser {
        TranscriptParser::with_trusted_root(self.root().to_path_buf())
    }
}

fn tool_use(ts: &str, id: &str, name: &str, input: &str) -> String {
    format!(
        r#"{{"timestamp":"{ts}","message":{{"content":[{{"type":"tool_use","id":"{id}","name":"{name}","input":{input}}}]}}}}"#
    )
}

fn tool_result(ts: &str, id: &str, is_error: bool) -> String {
    format!(
        r#"{{"timestamp":"{ts}","message":{{"content":[{{"type":"tool_result","tool_use_id":"{id}","is_error":{is_error}}}]}}}}"#
    )
}

#[test]
fn test_read_tool_completes_with_target() {
    let fx = Fixture::new();
    let path = fx.write(
        "read.jsonl",
        &[
            tool_use("2025-03-01T10:00:00Z", "t1", "Read", r#"{"file_path":"/x/y.txt"}"#),
            tool_result("2025-03-01T10:00:02Z", "t1", false),
        ],
    );

    let snapshot = fx.parser().parse(path.to_str().unwrap());

    assert_eq!(snapshot.tools.len(), 1);
    let tool = &snapshot.tools[0];
    assert_eq!(tool.name, "Read");
    assert_eq!(tool.target.as_deref(), Some("/x/y.txt"));
    assert_eq!(tool.state, ToolState::Completed);
    assert_eq!(
        tool.ended_at,
        Some(Utc.with_ymd_and_hms(2025, 3, 1, 10, 0, 2).unwrap())
    );
}

#[test]
fn test_failed_tool_and_completed_agent() {
    let fx = Fixture::new();
    let path = fx.write(
        "mixed.jsonl",
        &[
            tool_use("2025-03-01T10:00:00Z", "t1", "Bash", r#"{"command":"false"}"#),
            tool_use(
                "2025-03-01T10:00:01Z",
                "a1",
                "Task",
                r#"{"subagent_type":"reviewer","description":"review the diff"}"#,
            ),
            tool_result("2025-03-01T10:00:02Z", "t1", true),
            tool_result("2025-03-01T10:00:09Z", "a1", false),
        ],
    );

    let snapshot = fx.parser().parse(path.to_str().unwrap());

    assert_eq!(snapshot.tools.len(), 1);
    assert_eq!(snapshot.tools[0].state, ToolState::Error);

    assert_eq!(snapshot.agents.len(), 1);
    let agent = &snapshot.agents[0];
    assert_eq!(agent.kind, "reviewer");
    assert_eq!(agent.description.as_deref(), Some("review the diff"));
    assert_eq!(agent.state, AgentState::Completed);
}

#[test]
fn test_caps_keep_most_recent() {
    let fx = Fixture::new();
    let mut lines: Vec<String> = (1..=25)
        .map(|i| tool_use("2025-03-01T10:00:00Z", &format!("t{i}"), "Grep", r#"{"pattern":"x"}"#))
        .collect();
    lines.extend((1..=12).map(|i| {
        tool_use(
            "2025-03-01T10:00:00Z",
            &format!("a{i}"),
            "Task",
            r#"{"subagent_type":"explore"}"#,
        )
    }));
    let path = fx.write("many.jsonl", &lines);

    let snapshot = fx.parser().parse(path.to_str().unwrap());

    assert_eq!(snapshot.tools.len(), MAX_TOOLS);
    assert_eq!(snapshot.tools.first().unwrap().id, "t6");
    assert_eq!(snapshot.tools.last().unwrap().id, "t25");
    assert_eq!(snapshot.agents.len(), MAX_AGENTS);
    assert_eq!(snapshot.agents.first().unwrap().id, "a3");
}

#[test]
fn test_malformed_lines_are_skipped() {
    let fx = Fixture::new();
    let path = fx.write(
        "malformed.jsonl",
        &[
            tool_use("2025-03-01T10:00:00Z", "t1", "Glob", r#"{"pattern":"**/*.rs"}"#),
            r#"{"timestamp":"2025-03-01T10:00:01Z","message":{"content":[{"type":"#.to_string(),
            String::new(),
            "   ".to_string(),
            tool_use("2025-03-01T10:00:02Z", "t2", "Grep", r#"{"pattern":"fn main"}"#),
        ],
    );

    let snapshot = fx.parser().parse(path.to_str().unwrap());

    let ids: Vec<&str> = snapshot.tools.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["t1", "t2"]);
    assert_eq!(snapshot.tools[1].target.as_deref(), Some("fn main"));
}

#[test]
fn test_last_todo_write_wins() {
    let fx = Fixture::new();
    let path = fx.write(
        "todos.jsonl",
        &[
            tool_use(
                "2025-03-01T10:00:00Z",
                "w1",
                "TodoWrite",
                r#"{"todos":[{"id":"1","content":"old","status":"pending"}]}"#,
            ),
            tool_use(
                "2025-03-01T10:05:00Z",
                "w2",
                "TodoWrite",
                r#"{"todos":[{"id":"1","content":"plan","status":"completed"},{"id":2,"content":"build","status":"in_progress"}]}"#,
            ),
        ],
    );

    let snapshot = fx.parser().parse(path.to_str().unwrap());

    assert_eq!(snapshot.todos.len(), 2);
    assert_eq!(snapshot.todos[0].content, "plan");
    assert_eq!(snapshot.todos[0].status, TodoStatus::Completed);
    assert_eq!(snapshot.todos[1].id, "2");
    assert_eq!(snapshot.todos[1].status, TodoStatus::InProgress);
    assert!(snapshot.tools.is_empty());
}

#[test]
fn test_session_start_is_first_timestamp() {
    let fx = Fixture::new();
    let path = fx.write(
        "start.jsonl",
        &[
            r#"{"type":"summary","message":{"content":"no timestamp here"}}"#.to_string(),
            r#"{"timestamp":"2025-03-01T09:30:00Z","message":{"content":"hello"}}"#.to_string(),
            tool_use("2025-03-01T09:45:00Z", "t1", "Read", r#"{"path":"/a/b"}"#),
        ],
    );

    let snapshot = fx.parser().parse(path.to_str().unwrap());

    assert_eq!(
        snapshot.session_start,
        Some(Utc.with_ymd_and_hms(2025, 3, 1, 9, 30, 0).unwrap())
    );
    assert_eq!(snapshot.tools[0].target.as_deref(), Some("/a/b"));
}

#[test]
fn test_untrusted_paths_yield_empty_snapshot() {
    let fx = Fixture::new();
    let outside_dir = tempfile::tempdir().unwrap();
    let outside = outside_dir.path().join("s.jsonl");
    std::fs::write(
        &outside,
        tool_use("2025-03-01T10:00:00Z", "t1", "Read", r#"{"file_path":"/x"}"#),
    )
    .unwrap();

    let parser = fx.parser();
    assert!(parser.parse(outside.to_str().unwrap()).is_empty());
    assert!(parser.parse("").is_empty());
    assert!(parser.parse("relative/s.jsonl").is_empty());

    let missing = fx.root().join("projects/missing.jsonl");
    assert!(parser.parse(missing.to_str().unwrap()).is_empty());

    let escaping = format!("{}/projects/../../s.jsonl", fx.root().display());
    assert!(parser.parse(&escaping).is_empty());
}
