use serde::{Deserialize, Serialize};

// -----------------------------------------------------------------------------
// Stdin snapshot (written by the host assistant once per status-line refresh)
// -----------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StdinInput {
    pub model: Option<ModelInfo>,
    pub context_window: Option<ContextWindow>,
    pub cost: Option<CostInfo>,
    pub cwd: Option<String>,
    pub transcript_path: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelInfo {
    pub id: Option<String>,
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextWindow {
    pub context_window_size: Option<u64>,
    pub current_usage: Option<CurrentUsage>,
    pub used_percentage: Option<f64>,
    pub remaining_percentage: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurrentUsage {
    pub input_tokens: Option<u64>,
    pub cache_creation_input_tokens: Option<u64>,
    pub cache_read_input_tokens: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CostInfo {
    pub total_cost_usd: Option<f64>,
}

// -----------------------------------------------------------------------------
// Configuration
// -----------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Plan {
    Pro,
    Max100,
    #[default]
    Max200,
    Team,
}

impl Plan {
    /// Max plans get the 7-day windows on the rate-limit line.
    pub fn is_max(self) -> bool {
        matches!(self, Plan::Max100 | Plan::Max200)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    #[default]
    Multiline,
    Compact,
}

/// HUD configuration as stored in `~/.claude/hud-statusline.local.json`.
///
/// Every level carries `#[serde(default)]`, so a partial file is merged over
/// the defaults field by field.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HudConfig {
    pub plan: Plan,
    pub layout: Layout,
    pub display: DisplayConfig,
    pub cache: CacheConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DisplayConfig {
    pub show_context: bool,
    pub show_rate_limit: bool,
    pub show_project: bool,
    pub show_git: bool,
    pub show_tools: bool,
    pub show_agents: bool,
    pub show_todos: bool,
    pub show_config_counts: bool,
    pub show_session_duration: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            show_context: true,
            show_rate_limit: true,
            show_project: true,
            show_git: true,
            show_tools: false,
            show_agents: true,
            show_todos: true,
            show_config_counts: true,
            show_session_duration: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CacheConfig {
    pub ttl_seconds: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { ttl_seconds: 60 }
    }
}

// -----------------------------------------------------------------------------
// Usage limits
// -----------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateLimitInfo {
    pub utilization: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resets_at: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UsageLimits {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub five_hour: Option<RateLimitInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seven_day: Option<RateLimitInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seven_day_sonnet: Option<RateLimitInfo>,
}

// -----------------------------------------------------------------------------
// Config counts
// -----------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConfigCounts {
    pub claude_md_count: usize,
    pub agents_md_count: usize,
    pub rules_count: usize,
    pub mcp_count: usize,
    pub hooks_count: usize,
    pub skills_count: usize,
}
