//! Service order listing command.

use super::open_pool;
use crate::config::AppConfig;
use crate::output;
use anyhow::Result;
use bella_core::service_order::{self, model::ServiceOrderQuery, model::ServiceOrderStatus};
use chrono::NaiveDate;
use clap::Args;

#[derive(Args)]
pub struct ServiceOrdersArgs {
    /// Only service orders in this status (scheduled, in_route, delivered, cancelled)
    #[arg(long)]
    pub status: Option<String>,

    /// Earliest scheduled date (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<NaiveDate>,

    /// Latest scheduled date (YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<NaiveDate>,
}

pub fn execute(args: ServiceOrdersArgs, config: &AppConfig) -> Result<()> {
    let status = args
        .status
        .as_deref()
        .map(str::parse::<ServiceOrderStatus>)
        .transpose()?;
    let pool = open_pool(config)?;

    let query = ServiceOrderQuery {
        status,
        scheduled_from: args.from,
        scheduled_to: args.to,
        ..ServiceOrderQuery::default()
    };
    let service_orders = service_order::list_service_orders(&pool, &query)?;
    output::print_service_orders_table(&service_orders);
    Ok(())
}
