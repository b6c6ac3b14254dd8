//! Web server command.

use super::open_pool;
use crate::config::AppConfig;
use anyhow::Result;
use bella_web::ServerOptions;
use clap::Args;
use colored::Colorize;
use std::sync::Arc;

#[derive(Args)]
pub struct ServeArgs {
    /// Port to listen on
    #[arg(long, env = "BELLA_PORT")]
    pub port: Option<u16>,

    /// Host to bind to
    #[arg(long, env = "BELLA_HOST")]
    pub host: Option<String>,

    /// Also write logs to a daily file in the configured log directory
    #[arg(long)]
    pub log: bool,
}

pub async fn execute(args: ServeArgs, config: AppConfig) -> Result<()> {
    let host = args.host.unwrap_or(config.host.clone());
    let port = args.port.unwrap_or(config.port);
    let pool = Arc::new(open_pool(&config)?);

    println!();
    println!("  {} {}", "Bella Design Hub".cyan().bold(), "API".bold());
    println!();
    println!("  {}       http://{}:{}/api", "API".green(), host, port);
    println!("  {}    http://{}:{}/health", "Health".green(), host, port);
    println!(
        "  {}  {}",
        "Database".green(),
        config.database_path.display()
    );
    if args.log {
        println!("  {}      {}", "Logs".green(), config.log_dir.display());
    }
    println!();
    println!("  {}", "Ctrl+C to stop".dimmed());
    println!();

    let options = ServerOptions {
        host,
        port,
        cors_origins: config.cors_origins,
    };
    bella_web::run_server(pool, options).await
}
