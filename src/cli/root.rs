use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{debug, info};

use crate::app::App;
use crate::config::Config;
use super::{cask::CaskCommand, models::ModelsCommand, run::RunCommand, search::SearchCommand};

/// whizterm - ask a local model, run what it answers
#[derive(Parser)]
#[command(
    name = "whizterm",
    version,
    about = "Terminal assistant that turns requests into shell commands with a local Ollama model",
    long_about = r#"whizterm sends your request to a locally running Ollama model, extracts the
shell commands from its answer and runs them.

WARNING: extracted commands are executed through your shell without any
sandboxing, with your privileges. Use `-e false` to only print them.

Examples:
  whizterm                              # Start the interactive shell
  whizterm run "install firefox"        # Handle a single request
  whizterm run -m llama3 "free disk"    # Use another model
  whizterm search invoice               # Find files named *invoice*
  whizterm models                       # List installed models"#
)]
pub struct Cli {
    /// Current working directory
    #[arg(short = 'c', long = "cwd", global = true)]
    pub cwd: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short = 'd', long = "debug", global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Handle a single request non-interactively
    Run(RunCommand),
    /// Find files whose name matches a pattern, recursively
    Search(SearchCommand),
    /// List the models available on the inference endpoint
    Models(ModelsCommand),
    /// Resolve the Homebrew cask identifier of an application
    Cask(CaskCommand),
}

impl Cli {
    pub async fn execute(self) -> Result<()> {
        if self.debug {
            debug!("Debug logging enabled");
        }

        // Change working directory if specified
        if let Some(cwd) = &self.cwd {
            std::env::set_current_dir(cwd)
                .map_err(|e| anyhow::anyhow!("Failed to change directory to {}: {}", cwd.display(), e))?;
            info!("Changed working directory to: {}", cwd.display());
        }

        let config = Config::init().await?;
        config.validate()?;
        debug!("Configuration initialized: {:?}", config);

        match self.command {
            Some(Commands::Run(run_cmd)) => run_cmd.execute(&App::new(config)?).await,
            Some(Commands::Search(search_cmd)) => search_cmd.execute(),
            Some(Commands::Models(models_cmd)) => models_cmd.execute(&App::new(config)?).await,
            Some(Commands::Cask(cask_cmd)) => cask_cmd.execute(&App::new(config)?).await,
            None => App::new(config)?.run_interactive().await,
        }
    }
}
