use super::colors::{dim, dot_bar, green, paint, style_for_percent};
use super::{icon, RenderContext};
use crate::format::{format_tokens, shorten_model_name};
use crate::stdin::AUTOCOMPACT_BUFFER;

/// Model, session age and context usage.
pub fn session_line(ctx: &RenderContext) -> Option<String> {
    let display = &ctx.config.display;
    let model = shorten_model_name(ctx.stdin.display_name(), ctx.stdin.model_id());

    let mut head = format!("{} {}", green(icon::MODEL), green(&model));
    if display.show_session_duration && !ctx.session_duration.is_empty() {
        head.push_str(&dim(&format!("({})", ctx.session_duration)));
    }

    let mut parts = vec![head];

    if display.show_context {
        let percent = ctx.stdin.context_percent(AUTOCOMPACT_BUFFER);
        let current = ctx.stdin.current_tokens(AUTOCOMPACT_BUFFER);
        let total = ctx.stdin.total_tokens();

        parts.push(dot_bar(percent));
        parts.push(paint(&format!("{percent}%"), style_for_percent(percent)));
        parts.push(dim(&format!(
            "{}/{}",
            format_tokens(current),
            format_tokens(total)
        )));
    }

    Some(parts.join(" "))
}
