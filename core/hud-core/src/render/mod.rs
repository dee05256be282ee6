//! HUD rendering: gathered data in, coloured lines out.
//!
//! Rendering is pure. [`render`] returns the lines; [`output_line`] prepares
//! one for the terminal. Printing is the caller's job.

mod activity;
pub mod colors;
mod project;
mod rate_limit;
mod session;

use chrono::{DateTime, Utc};

use crate::git::GitStatus;
use crate::transcript::TranscriptSnapshot;
use crate::types::{ConfigCounts, HudConfig, Layout, StdinInput, UsageLimits};

pub use activity::{agents_line, todos_line, tools_line};
pub use project::{config_counts_line, project_line};
pub use rate_limit::rate_limit_lines;
pub use session::session_line;

pub mod icon {
    pub const MODEL: &str = "Model:";
    pub const RATE_LIMIT: &str = "Usage:";
    pub const PROJECT: &str = "Project:";
    pub const GIT: &str = "Git:";
    pub const TOOLS: &str = "Tools:";
    pub const AGENTS: &str = "Agents:";
    pub const TODOS: &str = "Todos:";
    pub const WARNING: &str = "(!)";
    pub const ERROR: &str = "(X)";
    pub const SUCCESS: &str = "(v)";
    pub const RUNNING: &str = ">>";
    pub const PENDING: &str = "[ ]";
    pub const COMPLETED: &str = "[v]";
}

pub mod label {
    pub const FIVE_HOUR: &str = "5h";
    pub const SEVEN_DAY: &str = "7d";
    pub const SEVEN_DAY_SONNET: &str = "Sonnet";
    pub const RUNNING: &str = "running";
    pub const COMPLETED: &str = "done";
    pub const ERROR: &str = "error";
    pub const CLAUDE_MD: &str = "CLAUDE:";
    pub const AGENTS_MD: &str = "AGENTS:";
    pub const RULES: &str = "Rules:";
    pub const MCPS: &str = "MCP:";
    pub const HOOKS: &str = "Hooks:";
    pub const SKILLS: &str = "Skills:";
}

pub(crate) const SEPARATOR: &str = " │ ";

/// Everything the lines need, gathered once per invocation.
#[derive(Debug, Clone, Default)]
pub struct RenderContext {
    pub stdin: StdinInput,
    pub config: HudConfig,
    pub transcript: TranscriptSnapshot,
    pub config_counts: ConfigCounts,
    pub git: Option<GitStatus>,
    pub session_duration: String,
    pub rate_limits: Option<UsageLimits>,
    /// Reference instant for elapsed times.
    pub now: DateTime<Utc>,
}

pub fn render(ctx: &RenderContext) -> Vec<String> {
    match ctx.config.layout {
        Layout::Multiline => render_multiline(ctx),
        Layout::Compact => render_compact(ctx),
    }
}

fn render_multiline(ctx: &RenderContext) -> Vec<String> {
    let mut lines = Vec::new();

    if let Some(line) = session_line(ctx) {
        lines.push(line);
    }

    lines.extend(rate_limit_lines(ctx));

    let project_parts: Vec<String> = [project_line(ctx), config_counts_line(ctx)]
        .into_iter()
        .flatten()
        .collect();
    if !project_parts.is_empty() {
        lines.push(project_parts.join(SEPARATOR));
    }

    lines.extend(tools_line(ctx));
    lines.extend(agents_line(ctx));
    lines.extend(todos_line(ctx));

    lines
}

fn render_compact(ctx: &RenderContext) -> Vec<String> {
    let mut lines = Vec::new();
    let mut rate_limits = rate_limit_lines(ctx).into_iter();

    let head: Vec<String> = [
        session_line(ctx),
        rate_limits.next(),
        project_line(ctx),
        config_counts_line(ctx),
    ]
    .into_iter()
    .flatten()
    .collect();
    if !head.is_empty() {
        lines.push(head.join(SEPARATOR));
    }

    lines.extend(rate_limits);

    let activity: Vec<String> = [tools_line(ctx), agents_line(ctx), todos_line(ctx)]
        .into_iter()
        .flatten()
        .collect();
    if !activity.is_empty() {
        lines.push(activity.join(SEPARATOR));
    }

    lines
}

/// Prefixes the reset code and swaps spaces for non-breaking spaces, which
/// keeps hosts from collapsing or trimming the padding.
pub fn output_line(line: &str) -> String {
    format!("{}{}", colors::RESET, line.replace(' ', "\u{00A0}"))
}

/// The single line printed when nothing could be rendered.
pub fn warning_line() -> String {
    format!("{} {}", colors::yellow(icon::WARNING), colors::RESET)
}
