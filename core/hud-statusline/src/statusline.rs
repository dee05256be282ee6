//! The render pipeline: stdin → config → transcript → counts → git → usage → lines.

use std::io::Read;
use std::path::Path;

use chrono::{DateTime, Utc};
use hud_core::config::load_config_from;
use hud_core::format::format_session_duration;
use hud_core::{
    count_configs, fetch_usage_limits, git_status, read_input, render, HudConfig, RenderContext,
    StdinInput, TranscriptParser, TranscriptSnapshot,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StatuslineError {
    #[error("no status snapshot on stdin")]
    NoInput,
}

pub fn run<R: Read>(stdin: R, config_path: Option<&Path>) -> Result<Vec<String>, StatuslineError> {
    let input = read_input(stdin).ok_or(StatuslineError::NoInput)?;
    let config = config_path.map(load_config_from).unwrap_or_default();

    let ctx = gather(input, config, Utc::now());
    Ok(render(&ctx))
}

fn gather(stdin: StdinInput, config: HudConfig, now: DateTime<Utc>) -> RenderContext {
    let transcript = match stdin.transcript_path.as_deref() {
        Some(path) if !path.is_empty() => TranscriptParser::new().parse(path),
        _ => TranscriptSnapshot::default(),
    };

    let config_counts = count_configs(stdin.cwd.as_deref());

    let git = if config.display.show_git {
        git_status(stdin.cwd.as_deref())
    } else {
        None
    };

    let rate_limits = if config.display.show_rate_limit {
        fetch_usage_limits(config.cache.ttl_seconds)
    } else {
        None
    };

    let session_duration = format_session_duration(transcript.session_start, now);

    tracing::debug!(
        tools = transcript.tools.len(),
        agents = transcript.agents.len(),
        todos = transcript.todos.len(),
        git = git.is_some(),
        rate_limits = rate_limits.is_some(),
        "Gathered status data"
    );

    RenderContext {
        stdin,
        config,
        transcript,
        config_counts,
        git,
        session_duration,
        rate_limits,
        now,
    }
}
