//! Tool, sub-agent and todo lines.

use super::colors::{blue, cyan, dim, green, magenta, red, yellow};
use super::{icon, label, RenderContext};
use crate::format::{file_name, format_elapsed, truncate};
use crate::transcript::{TodoStatus, ToolState};

const RECENT_TOOLS: usize = 3;
const RECENT_AGENTS: usize = 2;
const TOOL_TARGET_CHARS: usize = 20;
const TODO_CONTENT_CHARS: usize = 30;
const TODO_ICONS: usize = 8;

/// Running tools with target and elapsed time; otherwise the last few finished.
pub fn tools_line(ctx: &RenderContext) -> Option<String> {
    if !ctx.config.display.show_tools {
        return None;
    }
    let tools = &ctx.transcript.tools;
    if tools.is_empty() {
        return None;
    }

    let mut parts = vec![yellow(icon::TOOLS)];

    let running: Vec<String> = tools
        .iter()
        .filter(|t| t.is_running())
        .map(|tool| {
            let target = tool
                .target
                .as_deref()
                .map(|t| format!(" {}", dim(&truncate(file_name(t), TOOL_TARGET_CHARS))))
                .unwrap_or_default();
            let elapsed = format_elapsed(tool.started_at, tool.ended_at, ctx.now);
            format!(
                "{} {}{} {}",
                yellow(icon::RUNNING),
                cyan(&tool.name),
                target,
                dim(&format!("({elapsed})"))
            )
        })
        .collect();

    if running.is_empty() {
        let finished: Vec<_> = tools.iter().filter(|t| !t.is_running()).collect();
        let recent = &finished[finished.len().saturating_sub(RECENT_TOOLS)..];
        let rendered: Vec<String> = recent
            .iter()
            .map(|tool| match tool.state {
                ToolState::Error => red(&format!("{} {}", icon::ERROR, tool.name)),
                _ => green(&format!("{} {}", icon::SUCCESS, tool.name)),
            })
            .collect();
        parts.push(rendered.join(" "));
    } else {
        parts.push(running.join(" "));
    }

    let completed = tools
        .iter()
        .filter(|t| t.state == ToolState::Completed)
        .count();
    let errors = tools.iter().filter(|t| t.state == ToolState::Error).count();

    let mut stats = Vec::new();
    if !running.is_empty() {
        stats.push(format!("{}: {}", label::RUNNING, running.len()));
    }
    if completed > 0 {
        stats.push(format!("{}: {completed}", label::COMPLETED));
    }
    if errors > 0 {
        stats.push(red(&format!("{}: {errors}", label::ERROR)));
    }
    if !stats.is_empty() {
        parts.push(dim(&format!("({})", stats.join(", "))));
    }

    Some(parts.join(" "))
}

/// Running sub-agents, or the last two when none is running.
pub fn agents_line(ctx: &RenderContext) -> Option<String> {
    if !ctx.config.display.show_agents {
        return None;
    }
    let agents = &ctx.transcript.agents;
    if agents.is_empty() {
        return None;
    }

    let mut parts = vec![blue(icon::AGENTS)];

    let running: Vec<String> = agents
        .iter()
        .filter(|a| a.is_running())
        .map(|agent| {
            let elapsed = format_elapsed(agent.started_at, agent.ended_at, ctx.now);
            format!(
                "{} {} {}",
                yellow(icon::RUNNING),
                magenta(&agent.kind),
                dim(&format!("({elapsed})"))
            )
        })
        .collect();

    if running.is_empty() {
        let recent = &agents[agents.len().saturating_sub(RECENT_AGENTS)..];
        let rendered: Vec<String> = recent
            .iter()
            .map(|agent| green(&format!("{} {}", icon::SUCCESS, agent.kind)))
            .collect();
        parts.push(rendered.join(" "));
    } else {
        parts.push(running.join(" "));
    }

    let completed = agents.iter().filter(|a| !a.is_running()).count();
    parts.push(dim(&format!(
        "({}: {}, {}: {completed})",
        label::RUNNING,
        running.len(),
        label::COMPLETED
    )));

    Some(parts.join(" "))
}

/// Progress, the current in-progress item and per-item status icons.
pub fn todos_line(ctx: &RenderContext) -> Option<String> {
    if !ctx.config.display.show_todos {
        return None;
    }
    let todos = &ctx.transcript.todos;
    if todos.is_empty() {
        return None;
    }

    let total = todos.len();
    let completed = todos
        .iter()
        .filter(|t| t.status == TodoStatus::Completed)
        .count();
    let percent = (completed as f64 / total as f64 * 100.0).round() as u32;

    let mut parts = vec![
        green(icon::TODOS),
        format!("{}/{total} ({percent}%)", green(&completed.to_string())),
    ];

    if let Some(current) = todos.iter().find(|t| t.status == TodoStatus::InProgress) {
        parts.push(format!(
            "{} {}",
            yellow(icon::RUNNING),
            cyan(&truncate(&current.content, TODO_CONTENT_CHARS))
        ));
    }

    let icons: String = todos
        .iter()
        .take(TODO_ICONS)
        .map(|todo| match todo.status {
            TodoStatus::Completed => green(icon::COMPLETED),
            TodoStatus::InProgress => yellow(icon::RUNNING),
            TodoStatus::Pending => dim(icon::PENDING),
        })
        .collect();
    parts.push(icons);

    Some(parts.join(" "))
}
