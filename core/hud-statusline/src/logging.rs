//! Structured logging for hud-statusline using tracing.
//!
//! Logs to `~/.claude/hud-statusline/hud-statusline.{date}.log` with daily
//! rotation, keeping 7 files. `RUST_LOG` overrides the default filter.
//!
//! Stdout belongs to the status line, so the fallback when the file appender
//! can't be created is stderr.

use fs_err as fs;
use std::path::{Path, PathBuf};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const DEFAULT_FILTER: &str = "hud_statusline=warn,hud_core=warn";

pub fn init() {
    let log_dir = hud_core::config::get_log_dir().unwrap_or_else(|| PathBuf::from("."));

    let _ = fs::create_dir_all(&log_dir);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    match create_file_appender(&log_dir) {
        Ok(file_appender) => {
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

            // Short-lived process: leak the guard so buffered lines flush at exit.
            std::mem::forget(guard);

            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    fmt::layer()
                        .with_writer(non_blocking)
                        .with_timer(fmt::time::UtcTime::rfc_3339())
                        .with_ansi(false),
                )
                .init();
        }
        Err(_) => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_timer(fmt::time::UtcTime::rfc_3339())
                        .with_ansi(false),
                )
                .init();
        }
    }
}

fn create_file_appender(
    log_dir: &Path,
) -> Result<RollingFileAppender, tracing_appender::rolling::InitError> {
    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("hud-statusline")
        .filename_suffix("log")
        .max_log_files(7)
        .build(log_dir)
}
