use super::colors::{dim, paint, style_for_percent, yellow};
use super::{icon, label, RenderContext};
use crate::types::RateLimitInfo;

/// Usage-limit percentages. A warning glyph stands in when the limits could
/// not be fetched; nothing is rendered when the display flag is off.
pub fn rate_limit_lines(ctx: &RenderContext) -> Vec<String> {
    if !ctx.config.display.show_rate_limit {
        return Vec::new();
    }

    let Some(limits) = &ctx.rate_limits else {
        return vec![format!("{} {}", yellow(icon::RATE_LIMIT), yellow(icon::WARNING))];
    };

    let is_max = ctx.config.plan.is_max();
    let windows = [
        (limits.five_hour.as_ref(), label::FIVE_HOUR),
        (limits.seven_day.as_ref().filter(|_| is_max), label::SEVEN_DAY),
        (
            limits.seven_day_sonnet.as_ref().filter(|_| is_max),
            label::SEVEN_DAY_SONNET,
        ),
    ];

    let items: Vec<String> = windows
        .into_iter()
        .filter_map(|(info, name)| info.map(|info| window_item(info, name)))
        .collect();

    if items.is_empty() {
        return Vec::new();
    }

    vec![format!(
        "{} {}",
        yellow(icon::RATE_LIMIT),
        items.join(&dim(" / "))
    )]
}

fn window_item(info: &RateLimitInfo, name: &str) -> String {
    let percent = info.utilization.round().clamp(0.0, 100.0) as u8;
    format!(
        "{}{}",
        paint(&format!("{percent}%"), style_for_percent(percent)),
        dim(&format!("({name})"))
    )
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{ctx, plain};
    use super::*;
    use crate::types::{Plan, UsageLimits};

    fn info(utilization: f64) -> Option<RateLimitInfo> {
        Some(RateLimitInfo {
            utilization,
            resets_at: None,
        })
    }

    fn limits() -> UsageLimits {
        UsageLimits {
            five_hour: info(15.4),
            seven_day: info(2.0),
            seven_day_sonnet: info(0.0),
        }
    }

    #[test]
    fn test_max_plan_shows_all_windows() {
        let mut ctx = ctx();
        ctx.rate_limits = Some(limits());

        assert_eq!(
            plain(&rate_limit_lines(&ctx)),
            vec!["Usage: 15%(5h) / 2%(7d) / 0%(Sonnet)"]
        );
    }

    #[test]
    fn test_pro_plan_shows_five_hour_only() {
        let mut ctx = ctx();
        ctx.config.plan = Plan::Pro;
        ctx.rate_limits = Some(limits());

        assert_eq!(plain(&rate_limit_lines(&ctx)), vec!["Usage: 15%(5h)"]);
    }

    #[test]
    fn test_missing_limits_show_warning() {
        let ctx = ctx();
        assert_eq!(plain(&rate_limit_lines(&ctx)), vec!["Usage: (!)"]);
    }

    #[test]
    fn test_hidden_or_empty() {
        let mut ctx = ctx();
        ctx.rate_limits = Some(UsageLimits::default());
        assert!(rate_limit_lines(&ctx).is_empty());

        ctx.config.display.show_rate_limit = false;
        assert!(rate_limit_lines(&ctx).is_empty());
    }
}
