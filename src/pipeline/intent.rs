//! Cheap heuristics applied to user input and extracted commands

const GREETINGS: &[&str] = &["hello", "hi", "hey", "bonjour", "salut", "coucou"];

/// Utilities whose name alone marks input as a shell command
const SHELL_UTILITIES: &[&str] = &[
    "ls", "cd", "pwd", "echo", "cat", "grep", "find", "mkdir", "rm", "cp", "mv", "touch",
    "chmod", "chown", "head", "tail", "less", "ps", "kill", "top", "df", "du", "which",
    "open", "git", "brew", "apt", "sudo", "curl", "wget", "tar", "zip", "unzip",
];

pub const GREETING_REPLY: &str =
    "Hello! Tell me what you need: install an app, find a file, run a command...";

pub fn is_greeting(text: &str) -> bool {
    let lowered = text.trim().to_lowercase();
    GREETINGS.contains(&lowered.as_str())
}

/// Input that should skip the model and go straight to the shell
pub fn looks_like_shell_command(text: &str) -> bool {
    let text = text.trim();
    let first = text.split_whitespace().next().unwrap_or("");
    SHELL_UTILITIES.contains(&first) || text.contains('/') || text.contains('.')
}

/// What the assistant does with one extracted command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlannedAction {
    /// Removal of an application named by the command's last token
    Uninstall { command: String, app_name: String },
    /// Any other command, installations included
    Shell(String),
}

impl PlannedAction {
    pub fn classify(command: &str) -> Self {
        let lowered = command.to_lowercase();

        if lowered.contains("uninstall") {
            let app_name = command.split_whitespace().last().unwrap_or_default().to_string();
            return PlannedAction::Uninstall {
                command: command.to_string(),
                app_name,
            };
        }

        PlannedAction::Shell(command.to_string())
    }
}
