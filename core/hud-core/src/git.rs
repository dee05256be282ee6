//! Git branch and dirty-state lookup for the project line.

use std::path::{Component, Path};
use std::time::Duration;

use crate::process::run_with_timeout;

const GIT_TIMEOUT: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitStatus {
    pub branch: String,
    pub dirty: bool,
}

/// Only absolute, already-normalised paths are handed to git.
fn is_valid_cwd(cwd: &str) -> bool {
    let path = Path::new(cwd);
    if !path.is_absolute() {
        return false;
    }
    if path
        .components()
        .any(|c| matches!(c, Component::CurDir | Component::ParentDir))
    {
        return false;
    }
    // `components()` silently normalises `//` and inner `.`, so check the text too.
    let trimmed = cwd.strip_suffix('/').filter(|s| !s.is_empty()).unwrap_or(cwd);
    !trimmed.contains("//") && !trimmed.contains("/./") && !trimmed.ends_with("/.")
}

/// Returns the branch and dirty flag for `cwd`, or `None` outside a repository.
///
/// A failing dirty check reads as clean.
pub fn git_status(cwd: Option<&str>) -> Option<GitStatus> {
    let cwd = cwd.filter(|c| is_valid_cwd(c))?;
    let dir = Path::new(cwd);

    let branch = match run_with_timeout(
        "git",
        &["rev-parse", "--abbrev-ref", "HEAD"],
        Some(dir),
        GIT_TIMEOUT,
    ) {
        Ok(branch) if !branch.is_empty() => branch,
        Ok(_) => return None,
        Err(e) => {
            tracing::debug!(error = %e, cwd = %cwd, "No git branch");
            return None;
        }
    };

    let dirty = run_with_timeout(
        "git",
        &["status", "--porcelain", "--untracked-files=no"],
        Some(dir),
        GIT_TIMEOUT,
    )
    .map(|status| !status.is_empty())
    .unwrap_or(false);

    Some(GitStatus { branch, dirty })
}

/// The last `levels` path segments of `cwd`, joined with `/`.
pub fn project_name(cwd: &str, levels: usize) -> String {
    let segments: Vec<&str> = cwd
        .split(std::path::MAIN_SEPARATOR)
        .filter(|s| !s.is_empty())
        .collect();
    if segments.is_empty() {
        return "/".to_string();
    }
    let start = segments.len().saturating_sub(levels);
    segments[start..].join("/")
}
