//! Counts of instruction files, rules, MCP servers, hooks and skills visible
//! to a session, from the user's home and the project directory.
//!
//! Every count is best-effort: unreadable files and directories count as zero.

use fs_err as fs;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde_json::Value;
use walkdir::WalkDir;

use crate::types::ConfigCounts;

const SKILL_MARKERS: [&str; 3] = ["skill.md", "index.md", "README.md"];

/// Counts using the real home directory.
pub fn count_configs(cwd: Option<&str>) -> ConfigCounts {
    match dirs::home_dir() {
        Some(home) => count_configs_in(&home, cwd.map(Path::new)),
        None => ConfigCounts::default(),
    }
}

pub fn count_configs_in(home: &Path, cwd: Option<&Path>) -> ConfigCounts {
    let global_dir = home.join(".claude");
    let global_settings = global_dir.join("settings.json");
    let local_dir = cwd.map(|c| c.join(".claude"));
    let local_settings = local_dir.as_ref().map(|d| d.join("settings.local.json"));

    let settings: Vec<PathBuf> = std::iter::once(global_settings)
        .chain(local_settings)
        .collect();
    let settings: Vec<Value> = settings.iter().filter_map(|p| read_json(p)).collect();

    let dirs_named = |name: &str| -> Vec<PathBuf> {
        std::iter::once(global_dir.join(name))
            .chain(local_dir.as_ref().map(|d| d.join(name)))
            .collect()
    };

    ConfigCounts {
        claude_md_count: count_instruction_files(home, cwd, "CLAUDE"),
        agents_md_count: count_instruction_files(home, cwd, "AGENTS"),
        rules_count: dirs_named("rules").iter().map(|d| count_files(d)).sum(),
        mcp_count: settings.iter().map(count_mcp_servers).sum(),
        hooks_count: settings.iter().map(count_hooks).sum(),
        skills_count: dirs_named("skills").iter().map(|d| count_skills(d)).sum(),
    }
}

/// `~/<STEM>.md`, `<cwd>/<STEM>.md` (if a different file), `<cwd>/<STEM>.local.md`.
fn count_instruction_files(home: &Path, cwd: Option<&Path>, stem: &str) -> usize {
    let mut seen = HashSet::new();
    let mut count = 0;

    let global = home.join(format!("{stem}.md"));
    if global.is_file() {
        count += 1;
        seen.insert(global);
    }

    if let Some(cwd) = cwd {
        let project = cwd.join(format!("{stem}.md"));
        if !seen.contains(&project) && project.is_file() {
            count += 1;
        }
        if cwd.join(format!("{stem}.local.md")).is_file() {
            count += 1;
        }
    }

    count
}

fn read_json(path: &Path) -> Option<Value> {
    let content = fs::read_to_string(path).ok()?;
    match serde_json::from_str(&content) {
        Ok(v) => Some(v),
        Err(e) => {
            tracing::debug!(error = %e, path = %path.display(), "Ignoring unparsable settings");
            None
        }
    }
}

fn count_mcp_servers(settings: &Value) -> usize {
    settings
        .get("mcpServers")
        .or_else(|| settings.get("mcp_servers"))
        .and_then(Value::as_object)
        .map_or(0, |servers| servers.len())
}

fn count_hooks(settings: &Value) -> usize {
    settings
        .get("hooks")
        .and_then(Value::as_object)
        .map_or(0, |hooks| {
            hooks
                .values()
                .filter_map(Value::as_array)
                .map(Vec::len)
                .sum()
        })
}

/// Regular files directly inside `dir`.
fn count_files(dir: &Path) -> usize {
    direct_children(dir)
        .filter(|entry| entry.file_type().is_file())
        .count()
}

/// Subdirectories holding a skill marker file, plus loose `.md` files.
fn count_skills(dir: &Path) -> usize {
    direct_children(dir)
        .filter(|entry| {
            let path = entry.path();
            if entry.file_type().is_dir() {
                SKILL_MARKERS.iter().any(|m| path.join(m).is_file())
            } else {
                entry.file_type().is_file()
                    && path.extension().and_then(|e| e.to_str()) == Some("md")
            }
        })
        .count()
}

fn direct_children(dir: &Path) -> impl Iterator<Item = walkdir::DirEntry> {
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .into_iter()
        .filter_map(Result::ok)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write(path: &Path, content: &str) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    #[test]
    fn test_empty_home_counts_zero() {
        let home = tempdir().unwrap();
        assert_eq!(count_configs_in(home.path(), None), ConfigCounts::default());
    }

    #[test]
    fn test_instruction_files() {
        let home = tempdir().unwrap();
        let project = tempdir().unwrap();
        write(&home.path().join("CLAUDE.md"), "");
        write(&project.path().join("CLAUDE.md"), "");
        write(&project.path().join("CLAUDE.local.md"), "");
        write(&project.path().join("AGENTS.md"), "");

        let counts = count_configs_in(home.path(), Some(project.path()));
        assert_eq!(counts.claude_md_count, 3);
        assert_eq!(counts.agents_md_count, 1);
    }

    #[test]
    fn test_home_as_cwd_counts_once() {
        let home = tempdir().unwrap();
        write(&home.path().join("CLAUDE.md"), "");

        let counts = count_configs_in(home.path(), Some(home.path()));
        assert_eq!(counts.claude_md_count, 1);
    }

    #[test]
    fn test_settings_mcp_and_hooks() {
        let home = tempdir().unwrap();
        let project = tempdir().unwrap();
        write(
            &home.path().join(".claude/settings.json"),
            r#"{"mcpServers":{"a":{},"b":{}},"hooks":{"PreToolUse":[{},{}],"Stop":[{}],"Bad":"x"}}"#,
        );
        write(
            &project.path().join(".claude/settings.local.json"),
            r#"{"mcp_servers":{"c":{}}}"#,
        );

        let counts = count_configs_in(home.path(), Some(project.path()));
        assert_eq!(counts.mcp_count, 3);
        assert_eq!(counts.hooks_count, 3);
    }

    #[test]
    fn test_corrupt_settings_count_zero() {
        let home = tempdir().unwrap();
        write(&home.path().join(".claude/settings.json"), "{oops");
        let counts = count_configs_in(home.path(), None);
        assert_eq!(counts.mcp_count, 0);
        assert_eq!(counts.hooks_count, 0);
    }

    #[test]
    fn test_rules_count_direct_files_only() {
        let home = tempdir().unwrap();
        let rules = home.path().join(".claude/rules");
        write(&rules.join("one.md"), "");
        write(&rules.join("two.txt"), "");
        write(&rules.join("nested/three.md"), "");

        assert_eq!(count_configs_in(home.path(), None).rules_count, 2);
    }

    #[test]
    fn test_skills() {
        let home = tempdir().unwrap();
        let project = tempdir().unwrap();
        let skills = home.path().join(".claude/skills");
        write(&skills.join("with-marker/skill.md"), "");
        write(&skills.join("readme-skill/README.md"), "");
        write(&skills.join("no-marker/notes.txt"), "");
        write(&skills.join("loose.md"), "");
        write(&skills.join("loose.txt"), "");
        write(&project.path().join(".claude/skills/local/index.md"), "");

        let counts = count_configs_in(home.path(), Some(project.path()));
        assert_eq!(counts.skills_count, 4);
    }
}
