use serde_json::Value;

const COMMAND_PREVIEW_CHARS: usize = 30;

/// Derives a short "what did this tool act on" string from the tool's input.
///
/// Pure and deterministic. Unknown tools, missing input, or a missing/non-string
/// field all yield `None` rather than an empty string.
pub fn extract_target(tool_name: &str, input: Option<&Value>) -> Option<String> {
    let input = input?;
    let field = |key: &str| input.get(key).and_then(Value::as_str);

    match tool_name {
        "Read" | "Write" | "Edit" => field("file_path").or_else(|| field("path")).map(str::to_string),
        "Glob" | "Grep" => field("pattern").map(str::to_string),
        "Bash" => field("command").map(preview_command),
        "WebFetch" => field("url").map(str::to_string),
        _ => None,
    }
}

fn preview_command(command: &str) -> String {
    let mut chars = command.chars();
    let head: String = chars.by_ref().take(COMMAND_PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("{head}…")
    } else {
        head
    }
}
