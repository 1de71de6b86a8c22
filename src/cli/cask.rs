use anyhow::Result;
use clap::Args;

use crate::app::App;

/// Resolve the Homebrew cask identifier of an application
#[derive(Args)]
pub struct CaskCommand {
    /// Application name or fragment
    pub name: String,

    /// Check the installed casks first, as an uninstall would
    #[arg(long)]
    pub uninstall: bool,
}

impl CaskCommand {
    pub async fn execute(&self, app: &App) -> Result<()> {
        let cask = app.locator().resolve_cask(&self.name, self.uninstall).await;
        println!("{}", cask);
        Ok(())
    }
}
