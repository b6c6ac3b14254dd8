//! Monthly financial summary command.

use super::open_pool;
use crate::config::AppConfig;
use crate::output;
use anyhow::Result;
use chrono::{Datelike, Utc};
use clap::Args;

#[derive(Args)]
pub struct FinanceArgs {
    /// Year (defaults to the current one)
    #[arg(long)]
    pub year: Option<i32>,

    /// Month 1-12 (defaults to the current one)
    #[arg(long)]
    pub month: Option<u32>,
}

pub fn execute(args: FinanceArgs, config: &AppConfig) -> Result<()> {
    let today = Utc::now().date_naive();
    let year = args.year.unwrap_or(today.year());
    let month = args.month.unwrap_or(today.month());

    let pool = open_pool(config)?;
    let summary = bella_core::finance::monthly_summary(&pool, year, month)?;
    output::print_summary(&summary);
    Ok(())
}
