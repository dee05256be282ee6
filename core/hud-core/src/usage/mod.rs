//! Account usage limits from the OAuth usage endpoint.
//!
//! Lookups go through two TTL caches before touching the network: an
//! in-process copy and a JSON file under `~/.claude`. Every failure (no
//! credentials, HTTP error, timeout, bad body) reads as "no data".

mod credentials;

use fs_err as fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use chrono::Utc;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::config::{get_claude_dir, write_private_atomic, CACHE_FILE};
use crate::error::Result;
use crate::types::UsageLimits;

pub use credentials::{access_token, CREDENTIALS_FILE};

pub const USAGE_ENDPOINT: &str = "https://api.anthropic.com/api/oauth/usage";
const API_TIMEOUT: Duration = Duration::from_secs(5);
const OAUTH_BETA: &str = "oauth-2025-04-20";

static DEFAULT_CLIENT: Lazy<Option<UsageClient>> =
    Lazy::new(|| get_claude_dir().map(UsageClient::new));

/// Usage limits for the signed-in account, cached for `ttl_seconds`.
pub fn fetch_usage_limits(ttl_seconds: u64) -> Option<UsageLimits> {
    DEFAULT_CLIENT.as_ref()?.fetch(ttl_seconds)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CacheEntry {
    data: UsageLimits,
    /// Epoch milliseconds at which `data` was stored.
    timestamp: i64,
}

impl CacheEntry {
    fn new(data: UsageLimits) -> Self {
        Self {
            data,
            timestamp: now_ms(),
        }
    }

    fn is_fresh(&self, ttl_seconds: u64, now_ms: i64) -> bool {
        let age_ms = now_ms.saturating_sub(self.timestamp);
        age_ms >= 0 && (age_ms as u64) < ttl_seconds.saturating_mul(1000)
    }
}

pub struct UsageClient {
    claude_dir: PathBuf,
    endpoint: String,
    use_keychain: bool,
    memory: Mutex<Option<CacheEntry>>,
}

impl UsageClient {
    /// Reads credentials and keeps the file cache in `claude_dir`.
    pub fn new(claude_dir: PathBuf) -> Self {
        Self {
            claude_dir,
            endpoint: USAGE_ENDPOINT.to_string(),
            use_keychain: cfg!(target_os = "macos"),
            memory: Mutex::new(None),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn without_keychain(mut self) -> Self {
        self.use_keychain = false;
        self
    }

    fn cache_path(&self) -> PathBuf {
        self.claude_dir.join(CACHE_FILE)
    }

    pub fn fetch(&self, ttl_seconds: u64) -> Option<UsageLimits> {
        let now = now_ms();

        if let Some(data) = self.memory_hit(ttl_seconds, now) {
            return Some(data);
        }

        if let Some(entry) = load_file_cache(&self.cache_path()) {
            if entry.is_fresh(ttl_seconds, now) {
                tracing::debug!("Usage limits served from file cache");
                self.remember(CacheEntry::new(entry.data.clone()));
                return Some(entry.data);
            }
        }

        let token = access_token(&self.claude_dir, self.use_keychain, now)?;
        let limits = match request_limits(&self.endpoint, token) {
            Ok(limits) => limits,
            Err(e) => {
                tracing::debug!(error = %e, "Usage limits request failed");
                return None;
            }
        };

        let entry = CacheEntry::new(limits.clone());
        if let Err(e) = save_file_cache(&self.cache_path(), &entry) {
            tracing::debug!(error = %e, "Failed to write usage cache");
        }
        self.remember(entry);
        Some(limits)
    }

    fn memory_hit(&self, ttl_seconds: u64, now: i64) -> Option<UsageLimits> {
        let guard = self.memory.lock().ok()?;
        guard
            .as_ref()
            .filter(|entry| entry.is_fresh(ttl_seconds, now))
            .map(|entry| entry.data.clone())
    }

    fn remember(&self, entry: CacheEntry) {
        if let Ok(mut guard) = self.memory.lock() {
            *guard = Some(entry);
        }
    }
}

/// The token is moved in and dropped once the request has been sent.
fn request_limits(endpoint: &str, token: String) -> Result<UsageLimits> {
    let agent = make_agent(API_TIMEOUT);
    let request = agent
        .get(endpoint)
        .header("Accept", "application/json")
        .header("Content-Type", "application/json")
        .header(
            "User-Agent",
            &format!("hud-statusline/{}", env!("CARGO_PKG_VERSION")),
        )
        .header("Authorization", &format!("Bearer {token}"))
        .header("anthropic-beta", OAUTH_BETA);
    drop(token);

    let limits = request.call()?.into_body().read_json::<UsageLimits>()?;
    Ok(limits)
}

fn make_agent(timeout: Duration) -> ureq::Agent {
    let config = ureq::Agent::config_builder()
        .timeout_global(Some(timeout))
        .build();
    config.into()
}

fn load_file_cache(path: &Path) -> Option<CacheEntry> {
    let content = fs::read_to_string(path).ok()?;
    match serde_json::from_str(&content) {
        Ok(entry) => Some(entry),
        Err(e) => {
            tracing::debug!(error = %e, "Ignoring unparsable usage cache");
            None
        }
    }
}

fn save_file_cache(path: &Path, entry: &CacheEntry) -> Result<()> {
    let content = serde_json::to_vec(entry)?;
    write_private_atomic(path, &content)
}

fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}
