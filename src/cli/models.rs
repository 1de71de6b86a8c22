use anyhow::Result;
use clap::Args;
use crossterm::style::Stylize;
use tracing::error;

use crate::app::App;

/// List the models available on the inference endpoint
#[derive(Args)]
pub struct ModelsCommand;

impl ModelsCommand {
    pub async fn execute(&self, app: &App) -> Result<()> {
        match app.list_models().await {
            Ok(models) => {
                println!("{}", "Available models:".green().bold());
                for model in models {
                    println!("- {}", model);
                }
            }
            Err(e) => {
                error!("Listing models failed: {}", e);
                eprintln!("{}", e.user_message().red().bold());
            }
        }
        Ok(())
    }
}
