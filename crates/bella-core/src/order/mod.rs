//! Sales orders.
//!
//! Every mutation rebuilds the full item list and recomputes the stored
//! total from it, so `total_amount` always equals the sum of the item
//! subtotals.

pub mod model;

use crate::clock::Clock;
use crate::error::{BellaError, BellaResult};
use crate::money;
use bella_db::queries::customers;
use bella_db::queries::orders::{self as queries, OrderFilter, OrderItemRow, OrderRow};
use bella_db::queries::products;
use bella_db::DbPool;
use chrono::{DateTime, Utc};
use model::{
    normalize_items, CreateOrderRequest, Order, OrderItemRequest, OrderQuery, UpdateOrderRequest,
};
use rust_decimal::Decimal;
use std::collections::BTreeSet;
use uuid::Uuid;
use validator::Validate;

/// Order code used when the caller supplies none.
pub fn generate_code(now: DateTime<Utc>) -> String {
    format!("PED-{}", now.format("%Y%m%d%H%M%S"))
}

/// Fail with [`BellaError::InvalidProducts`] unless every distinct product
/// referenced by `items` exists.
fn ensure_products_exist(pool: &DbPool, items: &[OrderItemRequest]) -> BellaResult<()> {
    let requested: BTreeSet<Uuid> = items.iter().filter_map(|i| i.product_id).collect();
    if requested.is_empty() {
        return Ok(());
    }
    let ids: Vec<Uuid> = requested.iter().copied().collect();
    let found = products::existing_product_ids(pool, &ids)?;
    if found.len() != requested.len() {
        return Err(BellaError::InvalidProducts);
    }
    Ok(())
}

fn item_rows(order_id: Uuid, items: Vec<OrderItemRequest>) -> BellaResult<Vec<OrderItemRow>> {
    items
        .into_iter()
        .enumerate()
        .map(|(position, item)| {
            Ok(OrderItemRow {
                id: Uuid::new_v4(),
                order_id,
                product_id: item.product_id,
                position: position as i64,
                description: item.description,
                quantity: item.quantity,
                unit_price: money::ensure_non_negative("unitPrice", item.unit_price)?,
            })
        })
        .collect()
}

fn total_of(items: &[OrderItemRow]) -> BellaResult<Decimal> {
    let lines = items
        .iter()
        .map(|i| money::line_total(i.quantity, i.unit_price))
        .collect::<BellaResult<Vec<_>>>()?;
    money::total(lines)
}

/// Create an order for an existing customer.
pub fn create_order(
    pool: &DbPool,
    clock: &dyn Clock,
    request: CreateOrderRequest,
) -> BellaResult<Order> {
    let request = CreateOrderRequest {
        code: crate::text::optional(request.code),
        items: normalize_items(request.items),
        ..request
    };
    request.validate()?;

    if !customers::customer_exists(pool, request.customer_id)? {
        return Err(BellaError::CustomerNotFound);
    }
    ensure_products_exist(pool, &request.items)?;

    let now = clock.now();
    let id = Uuid::new_v4();
    let items = item_rows(id, request.items)?;
    let row = OrderRow {
        id,
        code: request.code.unwrap_or_else(|| generate_code(now)),
        customer_id: request.customer_id,
        status: model::OrderStatus::Pending.as_str().to_string(),
        total_amount: total_of(&items)?,
        delivery_date: request.delivery_date,
        created_at: now,
        updated_at: None,
    };
    queries::insert_order(pool, &row, &items)?;
    tracing::info!(
        order_id = %row.id,
        code = %row.code,
        total = %row.total_amount,
        items = items.len(),
        "Order created"
    );

    Order::from_rows(row, items)
}

/// Get an order with its items.
pub fn get_order(pool: &DbPool, id: Uuid) -> BellaResult<Order> {
    let row = queries::get_order(pool, id)?;
    let items = queries::list_order_items(pool, id)?;
    Order::from_rows(row, items)
}

/// List orders newest first, items included.
pub fn list_orders(pool: &DbPool, query: &OrderQuery) -> BellaResult<Vec<Order>> {
    let filter = OrderFilter {
        customer_id: query.customer_id,
        status: query.status.map(|s| s.as_str().to_string()),
        created_from: query.created_from,
        created_to: query.created_to,
    };
    let rows = queries::list_orders(pool, &filter)?;
    tracing::debug!(count = rows.len(), "Listed orders");

    rows.into_iter()
        .map(|row| {
            let items = queries::list_order_items(pool, row.id)?;
            Order::from_rows(row, items)
        })
        .collect()
}

/// Replace an order's status, delivery date and items. A blank code keeps
/// the current one.
pub fn update_order(
    pool: &DbPool,
    clock: &dyn Clock,
    id: Uuid,
    request: UpdateOrderRequest,
) -> BellaResult<Order> {
    let request = UpdateOrderRequest {
        code: crate::text::optional(request.code),
        items: normalize_items(request.items),
        ..request
    };
    request.validate()?;

    let mut row = queries::get_order(pool, id)?;
    ensure_products_exist(pool, &request.items)?;

    let items = item_rows(id, request.items)?;
    if let Some(code) = request.code {
        row.code = code;
    }
    row.status = request.status.as_str().to_string();
    row.delivery_date = request.delivery_date;
    row.total_amount = total_of(&items)?;
    row.updated_at = Some(clock.now());
    queries::update_order(pool, &row, &items)?;
    tracing::info!(
        order_id = %id,
        status = %request.status,
        total = %row.total_amount,
        items = items.len(),
        "Order updated"
    );

    Order::from_rows(row, items)
}

/// Delete an order with its items. Fails while service orders reference it.
pub fn delete_order(pool: &DbPool, id: Uuid) -> BellaResult<()> {
    queries::delete_order(pool, id)?;
    tracing::info!(order_id = %id, "Order deleted");
    Ok(())
}
