use anyhow::{anyhow, Result};
use clap::Args;
use std::io::{self, Read};
use tracing::debug;

use crate::app::App;

/// Handle a single request non-interactively
#[derive(Args)]
pub struct RunCommand {
    /// The request. If not provided, it is read from stdin
    pub instruction: Vec<String>,

    /// Ollama model to use
    #[arg(short = 'm', long = "model")]
    pub model: Option<String>,

    /// Execute the suggested commands (true/false)
    #[arg(short = 'e', long = "execute")]
    pub execute: Option<bool>,
}

impl RunCommand {
    pub async fn execute(&self, app: &App) -> Result<()> {
        debug!("Executing run command");

        let instruction = self.get_instruction()?;

        if instruction.trim().is_empty() {
            return Err(anyhow!("No request provided. Use arguments or pipe input via stdin."));
        }

        app.run_once(&instruction, self.model.clone(), self.execute).await
    }

    fn get_instruction(&self) -> Result<String> {
        if !self.instruction.is_empty() {
            Ok(self.instruction.join(" "))
        } else {
            debug!("Reading request from stdin");
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .map_err(|e| anyhow!("Failed to read from stdin: {}", e))?;
            Ok(buffer)
        }
    }
}
