//! CLI command definitions and handlers.

use crate::config::AppConfig;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod finance;
pub mod migrate;
pub mod orders;
pub mod serve;
pub mod service_orders;

/// Bella Design Hub - orders, service orders and shop finances
#[derive(Parser)]
#[command(name = "bella")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Configuration file (defaults to ./bella.toml when present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// SQLite database file, overriding the configuration
    #[arg(long, global = true, env = "BELLA_DB")]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP API
    Serve(serve::ServeArgs),

    /// Create or upgrade the database schema
    Migrate,

    /// List orders
    Orders(orders::OrdersArgs),

    /// List service orders
    ServiceOrders(service_orders::ServiceOrdersArgs),

    /// Monthly revenue, expenses and balance
    Finance(finance::FinanceArgs),
}

impl Cli {
    pub async fn execute(self, mut config: AppConfig) -> Result<()> {
        if let Some(db) = self.db {
            config.database_path = db;
        }

        match self.command {
            Commands::Serve(args) => serve::execute(args, config).await,
            Commands::Migrate => migrate::execute(&config),
            Commands::Orders(args) => orders::execute(args, &config),
            Commands::ServiceOrders(args) => service_orders::execute(args, &config),
            Commands::Finance(args) => finance::execute(args, &config),
        }
    }
}

/// Open the configured database, creating its directory and applying
/// migrations.
pub(crate) fn open_pool(config: &AppConfig) -> Result<bella_db::DbPool> {
    if let Some(parent) = config.database_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
    }
    bella_db::init_pool(&config.database_path).with_context(|| {
        format!(
            "Failed to open database {}",
            config.database_path.display()
        )
    })
}
