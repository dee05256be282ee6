//! Text formatting helpers shared by the render lines.

use chrono::{DateTime, Utc};

/// `1.2M`, `45K`, or the raw count below one thousand.
pub fn format_tokens(tokens: u64) -> String {
    if tokens >= 1_000_000 {
        format!("{:.1}M", tokens as f64 / 1_000_000.0)
    } else if tokens >= 1_000 {
        format!("{:.0}K", tokens as f64 / 1_000.0)
    } else {
        tokens.to_string()
    }
}

/// Session age as `<1m`, `42m` or `3h 5m`. Empty when the start is unknown.
pub fn format_session_duration(session_start: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    let Some(start) = session_start else {
        return String::new();
    };

    let mins = now.signed_duration_since(start).num_minutes();
    if mins < 1 {
        return "<1m".to_string();
    }
    if mins < 60 {
        return format!("{mins}m");
    }
    format!("{}h {}m", mins / 60, mins % 60)
}

/// Time since `start` (until `end`, or `now` while still running): `12s`, `3m 4s`.
pub fn format_elapsed(
    start: DateTime<Utc>,
    end: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> String {
    let secs = end
        .unwrap_or(now)
        .signed_duration_since(start)
        .num_seconds()
        .max(0);
    if secs < 60 {
        return format!("{secs}s");
    }
    format!("{}m {}s", secs / 60, secs % 60)
}

/// Model family for known models, else the first word of the name.
///
/// Uses the display name, falling back to the model id.
pub fn shorten_model_name(display_name: Option<&str>, model_id: Option<&str>) -> String {
    let Some(name) = display_name
        .filter(|n| !n.trim().is_empty())
        .or(model_id.filter(|n| !n.trim().is_empty()))
    else {
        return "Unknown".to_string();
    };

    let lower = name.to_lowercase();
    for (family, short) in [("opus", "Opus"), ("sonnet", "Sonnet"), ("haiku", "Haiku")] {
        if lower.contains(family) {
            return short.to_string();
        }
    }

    name.split_whitespace().next().unwrap_or(name).to_string()
}

/// Last component of a `/` or `\` separated path.
pub fn file_name(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

/// Cuts `text` to at most `max_chars` characters, ending in `…` when cut.
pub fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let kept: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    format!("{kept}…")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_format_tokens() {
        assert_eq!(format_tokens(999), "999");
        assert_eq!(format_tokens(45_000), "45K");
        assert_eq!(format_tokens(200_000), "200K");
        assert_eq!(format_tokens(1_240_000), "1.2M");
    }

    #[test]
    fn test_format_session_duration() {
        let now = Utc::now();
        assert_eq!(format_session_duration(None, now), "");
        assert_eq!(format_session_duration(Some(now - Duration::seconds(30)), now), "<1m");
        assert_eq!(format_session_duration(Some(now - Duration::minutes(42)), now), "42m");
        assert_eq!(
            format_session_duration(Some(now - Duration::minutes(185)), now),
            "3h 5m"
        );
    }

    #[test]
    fn test_format_elapsed() {
        let now = Utc::now();
        let start = now - Duration::seconds(184);
        assert_eq!(format_elapsed(start, None, now), "3m 4s");
        assert_eq!(
            format_elapsed(start, Some(start + Duration::seconds(12)), now),
            "12s"
        );
        assert_eq!(format_elapsed(now + Duration::seconds(5), None, now), "0s");
    }

    #[test]
    fn test_shorten_model_name() {
        assert_eq!(shorten_model_name(Some("Claude Opus 4.1"), None), "Opus");
        assert_eq!(shorten_model_name(Some("Sonnet 4.5"), None), "Sonnet");
        assert_eq!(shorten_model_name(None, Some("claude-3-5-haiku-20241022")), "Haiku");
        assert_eq!(shorten_model_name(Some("Mystery Model"), None), "Mystery");
        assert_eq!(shorten_model_name(Some(""), Some("gpt-x")), "gpt-x");
        assert_eq!(shorten_model_name(None, None), "Unknown");
    }

    #[test]
    fn test_file_name() {
        assert_eq!(file_name("/a/b/c.rs"), "c.rs");
        assert_eq!(file_name("C:\\x\\y.txt"), "y.txt");
        assert_eq!(file_name("plain"), "plain");
        assert_eq!(file_name("/trailing/"), "");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("exactly10!", 10), "exactly10!");
        assert_eq!(truncate("a much longer string", 10), "a much lo…");
        assert_eq!(truncate("héllo wörld", 5), "héll…");
    }
}
