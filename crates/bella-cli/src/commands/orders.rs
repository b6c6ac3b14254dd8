//! Order listing command.

use super::open_pool;
use crate::config::AppConfig;
use crate::output;
use anyhow::Result;
use bella_core::order::{self, model::OrderQuery, model::OrderStatus};
use clap::Args;

#[derive(Args)]
pub struct OrdersArgs {
    /// Only orders in this status (e.g. pending, in_production, Delivered)
    #[arg(long)]
    pub status: Option<String>,
}

pub fn execute(args: OrdersArgs, config: &AppConfig) -> Result<()> {
    let status = args
        .status
        .as_deref()
        .map(str::parse::<OrderStatus>)
        .transpose()?;
    let pool = open_pool(config)?;

    let query = OrderQuery {
        status,
        ..OrderQuery::default()
    };
    let orders = order::list_orders(&pool, &query)?;
    output::print_orders_table(&orders);
    Ok(())
}
