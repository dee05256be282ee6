//! Transcript activity extraction.
//!
//! Reads the session transcript (`~/.claude/projects/<project>/<session>.jsonl`)
//! line by line and folds it into a [`TranscriptSnapshot`]: recent tool calls,
//! sub-agent dispatches, the current todo list, and the session start time.
//!
//! # Error Handling
//!
//! Extraction never fails. Every problem resolves to a valid snapshot:
//!
//! - **Untrusted or missing path**: empty snapshot.
//! - **Malformed line**: skipped (logged at debug with its line number).
//! - **Read error mid-stream**: whatever was accumulated so far is returned.
//! - **Result without a matching start**: ignored.

mod correlator;
mod reader;
mod record;
mod target;
pub mod types;
mod validate;

use std::path::{Path, PathBuf};

use crate::config::get_claude_dir;

pub use correlator::Correlator;
pub use reader::{RawLine, TranscriptLines};
pub use record::{BlockEvent, InvocationKind, TranscriptRecord, SUBAGENT_TOOL, TODO_TOOLS};
pub use target::extract_target;
pub use types::{
    AgentInvocation, AgentState, TodoItem, TodoStatus, ToolInvocation, ToolState,
    TranscriptSnapshot,
};
pub use validate::is_trusted_transcript_path;

/// Most recent tool invocations kept in a snapshot.
pub const MAX_TOOLS: usize = 20;
/// Most recent sub-agent invocations kept in a snapshot.
pub const MAX_AGENTS: usize = 10;

/// Parses transcripts that live under a trusted root directory.
pub struct TranscriptParser {
    trusted_root: Option<PathBuf>,
}

impl TranscriptParser {
    /// Trusts the user's `~/.claude` directory.
    pub fn new() -> Self {
        Self {
            trusted_root: get_claude_dir(),
        }
    }

    pub fn with_trusted_root(root: PathBuf) -> Self {
        Self {
            trusted_root: Some(root),
        }
    }

    pub fn parse(&self, transcript_path: &str) -> TranscriptSnapshot {
        let Some(root) = self.trusted_root.as_deref() else {
            tracing::debug!("No trusted root available, skipping transcript");
            return TranscriptSnapshot::default();
        };

        if !is_trusted_transcript_path(transcript_path, root) {
            tracing::debug!(
                path = %transcript_path,
                root = %root.display(),
                "Transcript path rejected"
            );
            return TranscriptSnapshot::default();
        }

        let lines = match TranscriptLines::open(Path::new(transcript_path)) {
            Ok(lines) => lines,
            Err(e) => {
                tracing::warn!(error = %e, path = %transcript_path, "Failed to open transcript");
                return TranscriptSnapshot::default();
            }
        };

        fold_lines(lines)
    }
}

impl Default for TranscriptParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Parses the transcript at `transcript_path`, trusting `~/.claude`.
pub fn parse_transcript(transcript_path: &str) -> TranscriptSnapshot {
    TranscriptParser::new().parse(transcript_path)
}

/// Folds a line stream into a snapshot. A stream error ends the fold early
/// and keeps what was read before it.
pub fn fold_lines<I>(lines: I) -> TranscriptSnapshot
where
    I: IntoIterator<Item = std::io::Result<RawLine>>,
{
    let mut correlator = Correlator::new();
    let mut parsed = 0usize;
    let mut skipped = 0usize;

    for line in lines {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                tracing::warn!(error = %e, parsed, "Transcript read failed, keeping partial result");
                break;
            }
        };

        match TranscriptRecord::decode(&line.bytes) {
            Ok(record) => {
                correlator.ingest(&record);
                parsed += 1;
            }
            Err(e) => {
                skipped += 1;
                tracing::debug!(line = line.number, error = %e, "Skipping malformed transcript line");
            }
        }
    }

    let (tools_seen, agents_seen) = correlator.tracked();
    let snapshot = correlator.finish();
    tracing::debug!(
        parsed,
        skipped,
        tools_seen,
        agents_seen,
        tools = snapshot.tools.len(),
        agents = snapshot.agents.len(),
        todos = snapshot.todos.len(),
        "Transcript parsed"
    );
    snapshot
}
