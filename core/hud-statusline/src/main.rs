//! Status line entry point.
//!
//! With no subcommand, reads the session snapshot from stdin and prints the
//! HUD. Rendering never fails loudly: any error or panic prints the warning
//! line and the process still exits 0, so the host keeps painting.

mod logging;
mod statusline;

use std::io::{self, Write};
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use hud_core::config::{get_config_path, load_config_from, save_config_to};
use hud_core::render::{output_line, warning_line};

#[derive(Parser)]
#[command(name = "hud-statusline", version, about = "Session status HUD for the status line")]
struct Cli {
    /// Config file to use instead of ~/.claude/hud-statusline.local.json.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Inspect or create the config file.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration as JSON.
    Show,
    /// Write the effective configuration to the config file.
    Init,
}

fn main() -> ExitCode {
    logging::init();
    let cli = Cli::parse();
    let config_path = cli.config.or_else(get_config_path);

    match cli.command {
        None => render_statusline(config_path),
        Some(Command::Config { action }) => match run_config(action, config_path) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("Error: {e}");
                ExitCode::FAILURE
            }
        },
    }
}

fn render_statusline(config_path: Option<PathBuf>) -> ExitCode {
    panic::set_hook(Box::new(|info| {
        tracing::error!(panic = %info, "Status line panicked");
    }));

    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        statusline::run(io::stdin().lock(), config_path.as_deref())
    }));

    let lines = match outcome {
        Ok(Ok(lines)) => lines.iter().map(|l| output_line(l)).collect(),
        Ok(Err(e)) => {
            tracing::debug!(error = %e, "Nothing to render");
            vec![warning_line()]
        }
        Err(_) => vec![warning_line()],
    };

    let mut stdout = io::stdout().lock();
    for line in lines {
        if writeln!(stdout, "{line}").is_err() {
            break;
        }
    }
    let _ = stdout.flush();

    ExitCode::SUCCESS
}

fn run_config(action: ConfigAction, config_path: Option<PathBuf>) -> hud_core::Result<()> {
    let path = config_path.ok_or(hud_core::HudError::NoHomeDir)?;
    let config = load_config_from(&path);

    match action {
        ConfigAction::Show => {
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        ConfigAction::Init => {
            save_config_to(&path, &config)?;
            println!("Wrote {}", path.display());
        }
    }
    Ok(())
}
