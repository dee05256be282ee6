//! Core library for the session status HUD.
//!
//! Collectors (stdin snapshot, transcript activity, usage limits, git, config
//! counts) each resolve to a "no data" value on failure; [`render`] turns the
//! gathered data into coloured lines.

pub mod config;
pub mod config_counts;
pub mod error;
pub mod format;
pub mod git;
mod process;
pub mod render;
pub mod stdin;
pub mod transcript;
pub mod types;
pub mod usage;

pub use config::{load_config, load_config_from, merge_config, save_config_to, update_config_at};
pub use config_counts::{count_configs, count_configs_in};
pub use error::{HudError, Result};
pub use git::{git_status, project_name, GitStatus};
pub use render::{output_line, render, warning_line, RenderContext};
pub use stdin::{read_input, AUTOCOMPACT_BUFFER};
pub use transcript::{parse_transcript, TranscriptParser, TranscriptSnapshot};
pub use types::{ConfigCounts, HudConfig, Layout, Plan, StdinInput, UsageLimits};
pub use usage::{fetch_usage_limits, UsageClient};
