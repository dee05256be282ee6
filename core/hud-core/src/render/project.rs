use super::colors::{blue, cyan, red};
use super::{icon, label, RenderContext, SEPARATOR};
use crate::git::project_name;

const PROJECT_LEVELS: usize = 2;

/// Project name and git branch, with `*` for a dirty tree.
pub fn project_line(ctx: &RenderContext) -> Option<String> {
    let display = &ctx.config.display;
    let mut parts = Vec::new();

    if display.show_project {
        if let Some(cwd) = ctx.stdin.cwd.as_deref().filter(|c| !c.is_empty()) {
            let name = project_name(cwd, PROJECT_LEVELS);
            parts.push(format!("{} {}", cyan(icon::PROJECT), cyan(&name)));
        }
    }

    if display.show_git {
        if let Some(git) = &ctx.git {
            let mut part = format!("{} {}", blue(icon::GIT), blue(&git.branch));
            if git.dirty {
                part.push_str(&red("*"));
            }
            parts.push(part);
        }
    }

    (!parts.is_empty()).then(|| parts.join(SEPARATOR))
}

/// Non-zero configuration counts. AGENTS.md is shown as present, not counted.
pub fn config_counts_line(ctx: &RenderContext) -> Option<String> {
    if !ctx.config.display.show_config_counts {
        return None;
    }

    let counts = &ctx.config_counts;
    let mut parts = Vec::new();

    if counts.claude_md_count > 0 {
        parts.push(format!(
            "{} {}",
            cyan(label::CLAUDE_MD),
            cyan(&counts.claude_md_count.to_string())
        ));
    }
    if counts.agents_md_count > 0 {
        parts.push(format!("{} {}", blue(label::AGENTS_MD), blue("✓")));
    }

    let numbered = [
        (counts.mcp_count, label::MCPS, cyan as fn(&str) -> String),
        (counts.skills_count, label::SKILLS, blue),
        (counts.rules_count, label::RULES, cyan),
        (counts.hooks_count, label::HOOKS, blue),
    ];
    for (count, name, colour) in numbered {
        if count > 0 {
            parts.push(format!("{} {}", colour(name), colour(&count.to_string())));
        }
    }

    (!parts.is_empty()).then(|| parts.join(SEPARATOR))
}
