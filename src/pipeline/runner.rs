//! Child-process launching through the host shell

use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// Captured outcome of one child process
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExecutionResult {
    pub stdout: String,
    pub stderr: String,
    pub exit_status: i32,
}

impl ExecutionResult {
    pub fn success(&self) -> bool {
        self.exit_status == 0
    }

    /// Failure-shaped result for a process that never ran
    pub fn launch_failure(message: impl Into<String>) -> Self {
        Self {
            stdout: String::new(),
            stderr: message.into(),
            exit_status: -1,
        }
    }

    pub fn summary(&self) -> String {
        if self.success() {
            "Command executed successfully".to_string()
        } else {
            format!("Command failed (exit code {})", self.exit_status)
        }
    }
}

/// Launches a command string through a shell interpreter.
///
/// The string is handed over whole: pipes, globs, `;` and `$(...)` are all
/// honored by the shell. Nothing here escapes or validates input.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, command: &str, working_dir: Option<&Path>) -> std::io::Result<ExecutionResult>;
}

/// Runs commands via `sh -c` (or `cmd /C` on Windows), blocking until exit.
#[derive(Debug, Clone, Default)]
pub struct ShellRunner {
    shell: Option<String>,
}

impl ShellRunner {
    pub fn new(shell: Option<String>) -> Self {
        Self { shell }
    }

    fn command_for(&self, command: &str) -> Command {
        match &self.shell {
            Some(shell) => {
                let mut cmd = Command::new(shell);
                cmd.args(["-c", command]);
                cmd
            }
            None if cfg!(target_os = "windows") => {
                let mut cmd = Command::new("cmd");
                cmd.args(["/C", command]);
                cmd
            }
            None => {
                let mut cmd = Command::new("sh");
                cmd.args(["-c", command]);
                cmd
            }
        }
    }
}

#[async_trait]
impl CommandRunner for ShellRunner {
    async fn run(&self, command: &str, working_dir: Option<&Path>) -> std::io::Result<ExecutionResult> {
        let mut cmd = self.command_for(command);

        if let Some(dir) = working_dir {
            cmd.current_dir(dir);
        }

        cmd.stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .stdin(Stdio::null());

        debug!("Spawning: {}", command);
        let output = cmd.spawn()?.wait_with_output().await?;

        Ok(ExecutionResult {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            // Killed by a signal: no code to report.
            exit_status: output.status.code().unwrap_or(-1),
        })
    }
}
