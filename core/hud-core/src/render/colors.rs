use owo_colors::{OwoColorize, Style};

pub const RESET: &str = "\x1b[0m";

const BAR_LENGTH: usize = 10;
const BAR_FILLED: &str = "●";
const BAR_EMPTY: &str = "○";

pub fn paint(text: &str, style: Style) -> String {
    text.style(style).to_string()
}

pub fn cyan(text: &str) -> String {
    paint(text, Style::new().cyan())
}

pub fn yellow(text: &str) -> String {
    paint(text, Style::new().yellow())
}

pub fn green(text: &str) -> String {
    paint(text, Style::new().green())
}

pub fn red(text: &str) -> String {
    paint(text, Style::new().red())
}

pub fn magenta(text: &str) -> String {
    paint(text, Style::new().magenta())
}

pub fn blue(text: &str) -> String {
    paint(text, Style::new().blue())
}

pub fn dim(text: &str) -> String {
    paint(text, Style::new().dimmed())
}

/// Severity colour for a usage percentage.
pub fn style_for_percent(percent: u8) -> Style {
    match percent {
        90.. => Style::new().red(),
        75..=89 => Style::new().yellow(),
        50..=74 => Style::new().bright_yellow(),
        _ => Style::new().green(),
    }
}

/// Ten-cell dot bar, filled cells in the severity colour.
pub fn dot_bar(percent: u8) -> String {
    let percent = percent.min(100);
    let filled = ((f64::from(percent) / 100.0) * BAR_LENGTH as f64).round() as usize;
    let empty = BAR_LENGTH - filled;

    format!(
        "{}{}",
        paint(&BAR_FILLED.repeat(filled), style_for_percent(percent)),
        dim(&BAR_EMPTY.repeat(empty)),
    )
}

/// Removes ANSI escape sequences; used to measure and test rendered text.
pub fn strip_ansi(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c == '\x1b' {
            for next in chars.by_ref() {
                if next.is_ascii_alphabetic() {
                    break;
                }
            }
        } else {
            out.push(c);
        }
    }
    out
}
