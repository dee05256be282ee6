//! OAuth access token lookup: macOS keychain first, then the credentials file.

use fs_err as fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{HudError, Result};

pub const CREDENTIALS_FILE: &str = ".credentials.json";

#[cfg(target_os = "macos")]
const KEYCHAIN_SERVICE: &str = "Claude Code-credentials";
#[cfg(target_os = "macos")]
const KEYCHAIN_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(5);

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CredentialsDocument {
    claude_ai_oauth: Option<OAuthCredentials>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct OAuthCredentials {
    access_token: Option<String>,
    /// Epoch milliseconds.
    expires_at: Option<i64>,
}

/// Returns a non-expired access token, or `None` when no source has one.
pub fn access_token(claude_dir: &Path, use_keychain: bool, now_ms: i64) -> Option<String> {
    if use_keychain {
        match keychain_token(now_ms) {
            Ok(Some(token)) => return Some(token),
            Ok(None) => {}
            Err(e) => tracing::debug!(error = %e, "Keychain credentials unavailable"),
        }
    }

    match file_token(&claude_dir.join(CREDENTIALS_FILE), now_ms) {
        Ok(token) => token,
        Err(e) => {
            tracing::debug!(error = %e, "File credentials unavailable");
            None
        }
    }
}

#[cfg(target_os = "macos")]
fn keychain_token(now_ms: i64) -> Result<Option<String>> {
    let raw = crate::process::run_with_timeout(
        "/usr/bin/security",
        &["find-generic-password", "-s", KEYCHAIN_SERVICE, "-w"],
        None,
        KEYCHAIN_TIMEOUT,
    )?;
    if raw.is_empty() {
        return Ok(None);
    }
    parse_token(&raw, now_ms)
}

#[cfg(not(target_os = "macos"))]
fn keychain_token(_now_ms: i64) -> Result<Option<String>> {
    Ok(None)
}

fn file_token(path: &Path, now_ms: i64) -> Result<Option<String>> {
    if !path.is_file() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    parse_token(&content, now_ms)
}

fn parse_token(raw: &str, now_ms: i64) -> Result<Option<String>> {
    let document: CredentialsDocument = serde_json::from_str(raw)?;
    let Some(oauth) = document.claude_ai_oauth else {
        return Ok(None);
    };

    let Some(token) = oauth.access_token.filter(|t| !t.is_empty()) else {
        return Ok(None);
    };

    if let Some(expires_at) = oauth.expires_at {
        if expires_at <= now_ms {
            return Err(HudError::Credentials(format!(
                "access token expired at {expires_at}"
            )));
        }
    }

    Ok(Some(token))
}
