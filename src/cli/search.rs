use anyhow::Result;
use clap::Args;
use crossterm::style::Stylize;

use crate::utils::fs::search_files;

/// Find files whose name matches a pattern, recursively from the current directory
#[derive(Args)]
pub struct SearchCommand {
    /// Name fragment; glob wildcards are allowed
    pub query: String,
}

impl SearchCommand {
    pub fn execute(&self) -> Result<()> {
        for path in search_files(".", &self.query)? {
            println!("{}", path.display().to_string().blue());
        }
        Ok(())
    }
}
