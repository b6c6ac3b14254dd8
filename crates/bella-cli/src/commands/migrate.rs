//! Schema migration command.

use super::open_pool;
use crate::config::AppConfig;
use anyhow::Result;
use colored::Colorize;

pub fn execute(config: &AppConfig) -> Result<()> {
    open_pool(config)?;
    println!(
        "{} Database schema is up to date ({})",
        "✓".green().bold(),
        config.database_path.display()
    );
    Ok(())
}
