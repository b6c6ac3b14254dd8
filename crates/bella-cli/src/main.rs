//! Bella Design Hub CLI.
//!
//! Runs the HTTP API and offers read-only views of the shop's data.

use anyhow::Result;
use clap::Parser;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod output;

use commands::{Cli, Commands};
use config::AppConfig;

/// Initialize tracing, optionally mirroring events to a daily log file
/// under `log_dir`. The returned guard must outlive the program for the file
/// writer to flush.
fn init_tracing(log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "bella=info,bella_web=debug,bella_core=info".into());

    match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "bella.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);

            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer())
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_writer(writer)
                        .with_ansi(false),
                )
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
            None
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref())?;

    let log_dir = match &cli.command {
        Commands::Serve(args) if args.log => Some(config.log_dir.clone()),
        _ => None,
    };
    let _guard = init_tracing(log_dir.as_deref());

    cli.execute(config).await
}
