//! Command execution with directory-change interception
//!
//! SECURITY: generic commands are passed whole to a shell interpreter. Any
//! metacharacter or injected fragment in model output or user input runs
//! with the privileges of this process. There is no sandbox and no
//! allow-list here; callers decide what reaches `run`.

use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, warn};

use super::privilege::PrivilegeNormalizer;
use super::runner::{CommandRunner, ExecutionResult};
use super::session::Session;

const CD_TOKEN: &str = "cd";

/// Characters that make a `cd` line a compound shell command
const SHELL_OPERATORS: &[char] = &['&', '|', ';', '<', '>', '`', '$'];

/// Classification of a candidate command, produced once and matched
/// exhaustively by the executor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandKind {
    /// `cd [target]`, applied to the session instead of a shell
    DirectoryChange { target: Option<String> },
    /// Anything else, run through the shell as-is
    GenericShellCommand(String),
}

impl CommandKind {
    pub fn classify(command: &str) -> Self {
        let command = command.trim();
        let mut parts = command.splitn(2, char::is_whitespace);

        if parts.next() == Some(CD_TOKEN) {
            let rest = parts.next().map(str::trim).unwrap_or_default();
            if rest.is_empty() {
                return CommandKind::DirectoryChange { target: None };
            }
            if let Some(target) = single_argument(rest) {
                return CommandKind::DirectoryChange {
                    target: Some(target.to_string()),
                };
            }
        }

        CommandKind::GenericShellCommand(command.to_string())
    }
}

/// The lone path argument of a `cd` line, or `None` when the line needs a shell
fn single_argument(rest: &str) -> Option<&str> {
    for quote in ['"', '\''] {
        if rest.len() >= 2 && rest.starts_with(quote) && rest.ends_with(quote) {
            let inner = &rest[1..rest.len() - 1];
            return (!inner.contains(quote)).then_some(inner);
        }
    }

    if rest.contains(char::is_whitespace) || rest.contains(SHELL_OPERATORS) {
        None
    } else {
        Some(rest)
    }
}

/// Remove inline-code backticks left around a command.
///
/// Only a single pair wrapping the whole command, or an unpaired backtick at
/// either edge, is removed. Paired backticks inside are command substitution
/// and stay.
pub fn strip_code_delimiters(command: &str) -> &str {
    let trimmed = command.trim();
    let count = trimmed.matches('`').count();

    if count == 2 && trimmed.len() >= 2 && trimmed.starts_with('`') && trimmed.ends_with('`') {
        return trimmed[1..trimmed.len() - 1].trim();
    }

    if count % 2 == 1 {
        if let Some(rest) = trimmed.strip_prefix('`') {
            return rest.trim();
        }
        if let Some(rest) = trimmed.strip_suffix('`') {
            return rest.trim();
        }
    }

    trimmed
}

/// Runs candidate commands for a session
#[derive(Clone)]
pub struct CommandExecutor {
    runner: Arc<dyn CommandRunner>,
    normalizer: PrivilegeNormalizer,
}

impl CommandExecutor {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            runner,
            normalizer: PrivilegeNormalizer::new(),
        }
    }

    /// Clean, classify and normalize a raw candidate without running it
    pub fn prepare(&self, command: &str) -> CommandKind {
        match CommandKind::classify(strip_code_delimiters(command)) {
            CommandKind::GenericShellCommand(cmd) => {
                CommandKind::GenericShellCommand(self.normalizer.normalize(&cmd))
            }
            cd => cd,
        }
    }

    /// Prepare and execute `command`. Never fails: every problem is folded
    /// into the returned result.
    pub async fn run(&self, command: &str, session: &mut Session) -> ExecutionResult {
        let kind = self.prepare(command);
        self.execute(&kind, session).await
    }

    /// Execute an already prepared command
    pub async fn execute(&self, kind: &CommandKind, session: &mut Session) -> ExecutionResult {
        match kind {
            CommandKind::DirectoryChange { target } => change_directory(target.as_deref(), session),
            CommandKind::GenericShellCommand(cmd) => {
                match self.runner.run(cmd, Some(session.cwd())).await {
                    Ok(result) => {
                        debug!("'{}' exited with {}", cmd, result.exit_status);
                        result
                    }
                    Err(e) => {
                        warn!("Failed to launch '{}': {}", cmd, e);
                        ExecutionResult::launch_failure(format!("Failed to run command: {}", e))
                    }
                }
            }
        }
    }
}

fn change_directory(target: Option<&str>, session: &mut Session) -> ExecutionResult {
    match resolve_target(target, session) {
        Ok(dir) => {
            let message = format!("Changed directory to {}", dir.display());
            session.change_dir(dir);
            ExecutionResult {
                stdout: message,
                stderr: String::new(),
                exit_status: 0,
            }
        }
        Err(message) => ExecutionResult {
            stdout: String::new(),
            stderr: format!("cd: {}", message),
            exit_status: 1,
        },
    }
}

fn resolve_target(target: Option<&str>, session: &Session) -> Result<PathBuf, String> {
    let candidate = match target {
        None | Some("~") => dirs::home_dir().ok_or_else(|| "home directory not found".to_string())?,
        Some("-") => session
            .previous_dir()
            .map(|p| p.to_path_buf())
            .ok_or_else(|| "no previous directory".to_string())?,
        Some(path) => {
            let expanded = PathBuf::from(shellexpand::tilde(path).as_ref());
            if expanded.is_absolute() {
                expanded
            } else {
                session.cwd().join(expanded)
            }
        }
    };

    let resolved = dunce::canonicalize(&candidate)
        .map_err(|_| format!("no such directory: {}", candidate.display()))?;

    if !resolved.is_dir() {
        return Err(format!("not a directory: {}", candidate.display()));
    }

    Ok(resolved)
}
