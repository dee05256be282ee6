//! Short-lived subprocesses with a hard deadline.

use std::io::Read;
use std::path::Path;
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use crate::error::{HudError, Result};

const POLL_INTERVAL: Duration = Duration::from_millis(5);

/// Runs `program args...` and returns its trimmed stdout.
///
/// Non-zero exit and exceeding `timeout` are errors; on timeout the child is
/// killed. Stdout is drained on a helper thread so a chatty child can't
/// block on a full pipe while we poll.
pub fn run_with_timeout(
    program: &str,
    args: &[&str],
    cwd: Option<&Path>,
    timeout: Duration,
) -> Result<String> {
    let describe = || format!("{} {}", program, args.join(" "));

    let mut command = Command::new(program);
    command
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null());
    if let Some(dir) = cwd {
        command.current_dir(dir);
    }

    let mut child = command.spawn().map_err(|e| HudError::Command {
        command: describe(),
        reason: e.to_string(),
    })?;

    let mut stdout = child.stdout.take().ok_or_else(|| HudError::Command {
        command: describe(),
        reason: "stdout not captured".to_string(),
    })?;
    let reader = thread::spawn(move || {
        let mut out = String::new();
        let _ = stdout.read_to_string(&mut out);
        out
    });

    let deadline = Instant::now() + timeout;
    let status = loop {
        match child.try_wait()? {
            Some(status) => break status,
            None if Instant::now() >= deadline => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(HudError::Command {
                    command: describe(),
                    reason: format!("timed out after {}ms", timeout.as_millis()),
                });
            }
            None => thread::sleep(POLL_INTERVAL),
        }
    };

    let output = reader.join().unwrap_or_default();

    if !status.success() {
        return Err(HudError::Command {
            command: describe(),
            reason: format!("exited with {status}"),
        });
    }

    Ok(output.trim().to_string())
}
