//! Configuration loading and saving utilities.
//!
//! Handles paths and persistence for:
//! - HUD configuration (`~/.claude/hud-statusline.local.json`)
//! - Usage-limit cache (`~/.claude/hud-statusline-cache.json`)
//!
//! Reads are best-effort; malformed files return defaults to keep the status
//! line usable.

use fs_err as fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tempfile::NamedTempFile;

use crate::error::{HudError, Result};
use crate::types::HudConfig;

pub const CONFIG_FILE: &str = "hud-statusline.local.json";
pub const CACHE_FILE: &str = "hud-statusline-cache.json";
pub const LOG_DIR: &str = "hud-statusline";

/// Returns the path to the Claude directory (~/.claude).
///
/// This is also the trusted root for transcript reads.
pub fn get_claude_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".claude"))
}

pub fn get_config_path() -> Option<PathBuf> {
    get_claude_dir().map(|d| d.join(CONFIG_FILE))
}

pub fn get_log_dir() -> Option<PathBuf> {
    get_claude_dir().map(|d| d.join(LOG_DIR))
}

/// Loads the HUD configuration from the default location.
pub fn load_config() -> HudConfig {
    match get_config_path() {
        Some(path) => load_config_from(&path),
        None => HudConfig::default(),
    }
}

/// Loads the HUD configuration, merging the file over the defaults.
///
/// Missing or empty files are silently the defaults; unparsable ones are
/// logged and also the defaults.
pub fn load_config_from(path: &Path) -> HudConfig {
    let content = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return HudConfig::default(),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to read config, using defaults");
            return HudConfig::default();
        }
    };

    if content.trim().is_empty() {
        return HudConfig::default();
    }

    serde_json::from_str(&content).unwrap_or_else(|e| {
        tracing::warn!(error = %e, path = %path.display(), "Failed to parse config, using defaults");
        HudConfig::default()
    })
}

/// Deep-merges a partial JSON update over `base`.
///
/// Objects merge key by key; any other value replaces. A merged document
/// that no longer fits the schema is an error.
pub fn merge_config(base: &HudConfig, update: &Value) -> Result<HudConfig> {
    let mut merged = serde_json::to_value(base)?;
    merge_json(&mut merged, update);
    Ok(serde_json::from_value(merged)?)
}

fn merge_json(base: &mut Value, update: &Value) {
    match (base, update) {
        (Value::Object(base), Value::Object(update)) => {
            for (key, value) in update {
                merge_json(base.entry(key.clone()).or_insert(Value::Null), value);
            }
        }
        (base, update) => *base = update.clone(),
    }
}

/// Applies a partial update on top of the config at `path` and writes it back.
pub fn update_config_at(path: &Path, update: &Value) -> Result<HudConfig> {
    let current = load_config_from(path);
    let merged = merge_config(&current, update)?;
    save_config_to(path, &merged)?;
    Ok(merged)
}

/// Saves the HUD configuration to `path` (pretty JSON, owner-only permissions).
pub fn save_config_to(path: &Path, config: &HudConfig) -> Result<()> {
    let content = serde_json::to_string_pretty(config)?;
    write_private_atomic(path, content.as_bytes())
}

/// Writes `content` atomically using a temporary file and rename.
///
/// The parent directory is created `0700` and the file ends up `0600`
/// on Unix; both may hold account data.
pub(crate) fn write_private_atomic(path: &Path, content: &[u8]) -> Result<()> {
    let dir = path
        .parent()
        .ok_or_else(|| HudError::InvalidInput(format!("{} has no parent", path.display())))?;

    if !dir.exists() {
        fs::create_dir_all(dir)?;
        #[cfg(unix)]
        set_mode(dir, 0o700)?;
    }

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    #[cfg(unix)]
    set_mode(tmp.path(), 0o600)?;
    tmp.persist(path)?;
    Ok(())
}

#[cfg(unix)]
fn set_mode(path: &Path, mode: u32) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, std::fs::Permissions::from_mode(mode))?;
    Ok(())
}
