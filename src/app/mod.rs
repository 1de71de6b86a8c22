//! Core application wiring
//!
//! Builds the assistant from configuration and drives it either for a
//! single instruction or as an interactive line-oriented shell.

mod agent;
mod events;

pub use agent::*;
pub use events::*;

use anyhow::{anyhow, Result};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::{
    config::Config,
    llm::{InferenceProvider, LlmResult, ProviderFactory},
    pipeline::{AppLocator, CommandExecutor, CommandRunner, Session, ShellRunner},
    version,
};

/// Main application structure
pub struct App {
    config: Config,
    provider: Arc<dyn InferenceProvider>,
    runner: Arc<dyn CommandRunner>,
}

impl App {
    /// Create a new application instance
    pub fn new(config: Config) -> Result<Self> {
        debug!("Creating new App instance");

        let provider = ProviderFactory::create_provider(&config)?;
        let runner = Arc::new(ShellRunner::new(config.shell.clone()));

        Ok(App {
            config,
            provider: Arc::from(provider),
            runner,
        })
    }

    pub fn locator(&self) -> AppLocator {
        AppLocator::new(self.runner.clone(), self.config.applications_dir.clone())
    }

    /// Build an assistant writing to `sink`; `None` keeps the configured value
    pub fn assistant(
        &self,
        sink: Arc<dyn OutputSink>,
        model: Option<String>,
        auto_execute: Option<bool>,
    ) -> Assistant {
        Assistant::new(
            self.provider.clone(),
            CommandExecutor::new(self.runner.clone()),
            self.locator(),
            sink,
            model.unwrap_or_else(|| self.config.model.clone()),
        )
        .with_auto_execute(auto_execute.unwrap_or(self.config.auto_execute))
    }

    pub async fn list_models(&self) -> LlmResult<Vec<String>> {
        self.provider.list_models().await
    }

    /// Handle one instruction, printing directly to the terminal
    pub async fn run_once(
        &self,
        instruction: &str,
        model: Option<String>,
        auto_execute: Option<bool>,
    ) -> Result<()> {
        let assistant = self.assistant(Arc::new(ConsoleSink), model, auto_execute);
        let mut session = Session::for_process()?;
        assistant.handle(&mut session, instruction).await;
        Ok(())
    }

    /// Read instructions from stdin until EOF or `exit`.
    ///
    /// Each instruction runs on its own task while a printer task owns the
    /// terminal. The next line is only read once the previous instruction
    /// finished, so the session is never shared.
    pub async fn run_interactive(&self) -> Result<()> {
        info!("Starting interactive mode");

        let (tx, rx) = mpsc::unbounded_channel();
        let printer = tokio::spawn(run_printer(rx));

        tx.emit(OutputEvent::Info(format!(
            "{} ({} via {}). Type 'exit' to quit.",
            version::full_version(),
            self.config.model,
            self.config.endpoint()
        )));

        let assistant = Arc::new(self.assistant(Arc::new(tx.clone()), None, None));
        let mut session = Session::for_process()?;
        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        loop {
            tx.emit(OutputEvent::Prompt(session.cwd().display().to_string()));

            let Some(line) = lines.next_line().await? else {
                break;
            };
            if matches!(line.trim(), "exit" | "quit") {
                break;
            }

            let assistant = assistant.clone();
            let task = tokio::spawn(async move {
                assistant.handle(&mut session, &line).await;
                session
            });
            session = task
                .await
                .map_err(|e| anyhow!("Instruction task failed: {}", e))?;
        }

        drop(assistant);
        drop(tx);
        printer.await?;

        info!("Interactive mode finished");
        Ok(())
    }
}
