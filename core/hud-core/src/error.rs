//! Error types for hud-core.
//!
//! Most collectors in this crate are best-effort and resolve errors into
//! defined "no data" values at their public boundary. The error type exists so
//! the internals can use `?` and so callers that care (config persistence, the
//! CLI) get a real reason.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum HudError {
    #[error("Home directory not found")]
    NoHomeDir,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to persist temp file: {0}")]
    Persist(#[from] tempfile::PersistError),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("No usable credentials: {0}")]
    Credentials(String),

    #[error("Command `{command}` failed: {reason}")]
    Command { command: String, reason: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl From<ureq::Error> for HudError {
    fn from(e: ureq::Error) -> Self {
        HudError::Http(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, HudError>;
