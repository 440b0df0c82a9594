// src/exec/task_runner.rs

//! Single command process runner.

use std::process::Stdio;

use tokio::process::Command;
use tracing::{debug, info};

use crate::config::CommandSettings;
use crate::errors::{DirpollError, Result};

/// Captured result of a successful command run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

/// Run the configured command once and wait for it.
///
/// - The command line goes through the platform shell (`sh -c` / `cmd /C`).
/// - `working_dir` is applied to the child only; this process's cwd is never
///   touched.
/// - stdout is logged at info, stderr at debug.
/// - A non-zero exit, a spawn failure or hitting the timeout is an error. On
///   timeout the child is killed.
pub async fn run_command(settings: &CommandSettings) -> Result<CommandOutput> {
    let line = settings.command.as_str();

    // Build a shell command appropriate for the platform.
    let mut cmd = if cfg!(windows) {
        let mut c = Command::new("cmd");
        c.arg("/C").arg(line);
        c
    } else {
        let mut c = Command::new("sh");
        c.arg("-c").arg(line);
        c
    };

    if let Some(dir) = &settings.working_dir {
        cmd.current_dir(dir);
    }

    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    info!(cmd = %line, cwd = ?settings.working_dir, "executing command");

    let child = cmd
        .spawn()
        .map_err(|e| DirpollError::Command(format!("spawning `{line}`: {e}")))?;

    let wait = child.wait_with_output();
    let output = match settings.timeout {
        Some(limit) => match tokio::time::timeout(limit, wait).await {
            Ok(res) => res,
            Err(_) => {
                return Err(DirpollError::Command(format!(
                    "`{line}` timed out after {limit:?} and was killed"
                )));
            }
        },
        None => wait.await,
    }
    .map_err(|e| DirpollError::Command(format!("waiting for `{line}`: {e}")))?;

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
    for l in stdout.lines() {
        info!(cmd = %line, "stdout: {}", l);
    }
    for l in stderr.lines() {
        debug!(cmd = %line, "stderr: {}", l);
    }

    let exit_code = output.status.code().unwrap_or(-1);
    info!(
        cmd = %line,
        exit_code,
        success = output.status.success(),
        "command exited"
    );

    if !output.status.success() {
        return Err(DirpollError::Command(format!(
            "`{line}` exited with code {exit_code}"
        )));
    }

    Ok(CommandOutput {
        exit_code,
        stdout,
        stderr,
    })
}
