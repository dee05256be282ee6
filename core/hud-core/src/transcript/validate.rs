use fs_err as fs;
use std::path::{Component, Path};

/// Returns true if `candidate` names an existing file inside `trusted_root`.
///
/// Rejects empty and relative paths, `..` components, and anything whose
/// resolved location (after following symlinks) leaves the root. Containment
/// is checked per path component, so a sibling like `~/.claude-other` is
/// outside `~/.claude`.
pub fn is_trusted_transcript_path(candidate: &str, trusted_root: &Path) -> bool {
    if candidate.trim().is_empty() {
        return false;
    }

    let path = Path::new(candidate);
    if !path.is_absolute() {
        return false;
    }
    if path.components().any(|c| matches!(c, Component::ParentDir)) {
        return false;
    }
    if !path.starts_with(trusted_root) {
        return false;
    }

    match (fs::canonicalize(path), fs::canonicalize(trusted_root)) {
        (Ok(real), Ok(root)) => real.starts_with(&root) && real.is_file(),
        _ => false,
    }
}
