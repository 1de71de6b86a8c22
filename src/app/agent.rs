//! The assistant: from one user instruction to executed commands

use std::sync::Arc;
use tracing::{debug, error, info};

use crate::{
    app::{OutputEvent, OutputSink},
    llm::InferenceProvider,
    pipeline::{
        intent::{self, PlannedAction},
        AppLocator, CommandExecutor, CommandExtractor, CommandKind, Session,
    },
};

/// Instruction prepended to every request sent to the model
pub const SYSTEM_PROMPT: &str = "You are a terminal assistant that runs commands and manages files on the user's machine.
You can help to:
- search for files
- run system commands
- create or modify files
- install applications

IMPORTANT:
- Answer concisely and directly
- Put every system command to run in exactly one triple-backtick block (```)
- Do not ask the user for confirmation
- Do not write any text before or after the command block
- On macOS always install with brew
- For GUI applications on macOS always use brew install --cask
- To remove an application, always use the appropriate uninstall command
- If the installation needs extra steps, state them clearly";

/// Turns user instructions into executed commands.
///
/// Model output is untrusted text: whatever command it contains is run
/// through the shell without validation when auto-execution is on.
pub struct Assistant {
    provider: Arc<dyn InferenceProvider>,
    extractor: CommandExtractor,
    executor: CommandExecutor,
    locator: AppLocator,
    sink: Arc<dyn OutputSink>,
    model: String,
    auto_execute: bool,
}

impl Assistant {
    pub fn new(
        provider: Arc<dyn InferenceProvider>,
        executor: CommandExecutor,
        locator: AppLocator,
        sink: Arc<dyn OutputSink>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            extractor: CommandExtractor::new(),
            executor,
            locator,
            sink,
            model: model.into(),
            auto_execute: true,
        }
    }

    pub fn with_auto_execute(mut self, auto_execute: bool) -> Self {
        self.auto_execute = auto_execute;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn build_prompt(user_text: &str) -> String {
        format!("{}\n\nUser request: {}", SYSTEM_PROMPT, user_text)
    }

    /// Handle one instruction. All results go to the sink; nothing here
    /// ends the session.
    pub async fn handle(&self, session: &mut Session, user_text: &str) {
        let text = user_text.trim();
        if text.is_empty() {
            return;
        }

        if intent::is_greeting(text) {
            self.sink.emit(OutputEvent::Reply(intent::GREETING_REPLY.to_string()));
            return;
        }

        if intent::looks_like_shell_command(text) {
            debug!("Treating input as a direct shell command");
            self.run_command(session, text).await;
            return;
        }

        info!("Asking {} for: {}", self.model, text.chars().take(50).collect::<String>());

        let response = match self.provider.generate(&Self::build_prompt(text), &self.model).await {
            Ok(response) => response,
            Err(e) => {
                error!("Inference request failed: {}", e);
                self.sink.emit(OutputEvent::Error(e.user_message()));
                return;
            }
        };

        self.sink.emit(OutputEvent::Ai(response.clone()));

        let commands = self.extractor.extract(&response);
        if commands.is_empty() {
            self.sink
                .emit(OutputEvent::Info("No command found in the response.".to_string()));
            return;
        }

        self.sink.emit(OutputEvent::Commands(commands.clone()));

        if !self.auto_execute {
            self.sink.emit(OutputEvent::Info(
                "Auto-execution is disabled; commands were not run.".to_string(),
            ));
            return;
        }

        for command in &commands {
            self.dispatch(session, PlannedAction::classify(command)).await;
        }
    }

    async fn dispatch(&self, session: &mut Session, action: PlannedAction) {
        match action {
            PlannedAction::Uninstall { command, app_name } => {
                debug!("Uninstall requested by '{}'", command);
                let installed = self.locator.find_installed(&app_name).await;
                if installed != app_name {
                    self.sink
                        .emit(OutputEvent::Info(format!("Application found: {}", installed)));
                    let outcome = self.locator.uninstall(&installed).await;
                    self.sink.emit(OutputEvent::Info(outcome));
                } else {
                    self.sink
                        .emit(OutputEvent::Failure(format!("Application not found: {}", app_name)));
                }
            }
            PlannedAction::Shell(command) => {
                self.run_command(session, &command).await;
            }
        }
    }

    async fn run_command(&self, session: &mut Session, command: &str) {
        let kind = self.executor.prepare(command);
        let shown = match &kind {
            CommandKind::GenericShellCommand(cmd) => cmd.clone(),
            CommandKind::DirectoryChange { .. } => command.trim().to_string(),
        };
        self.sink.emit(OutputEvent::Running(shown));

        let result = self.executor.execute(&kind, session).await;

        if !result.stdout.is_empty() {
            self.sink.emit(OutputEvent::Stdout(result.stdout.clone()));
        }
        if !result.stderr.is_empty() {
            self.sink.emit(OutputEvent::Stderr(result.stderr.clone()));
        }

        if result.success() {
            self.sink.emit(OutputEvent::Success(result.summary()));
        } else {
            self.sink.emit(OutputEvent::Failure(result.summary()));
        }
    }
}
