//! Sales order queries.

use crate::pool::{DbError, DbPool, DbResult};
use crate::queries::{money_at, money_to_sql};
use chrono::{DateTime, Utc};
use rusqlite::types::ToSql;
use rusqlite::{params, Connection, OptionalExtension};
use rust_decimal::Decimal;
use uuid::Uuid;

/// Order row from database.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderRow {
    pub id: Uuid,
    pub code: String,
    pub customer_id: Uuid,
    pub status: String,
    pub total_amount: Decimal,
    pub delivery_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Order item row from database.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderItemRow {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Option<Uuid>,
    pub position: i64,
    pub description: String,
    pub quantity: i64,
    pub unit_price: Decimal,
}

/// Filters for [`list_orders`]. Every supplied field must match.
#[derive(Debug, Clone, Default)]
pub struct OrderFilter {
    pub customer_id: Option<Uuid>,
    pub status: Option<String>,
    pub created_from: Option<DateTime<Utc>>,
    pub created_to: Option<DateTime<Utc>>,
}

const COLUMNS: &str =
    "id, code, customer_id, status, total_amount, delivery_date, created_at, updated_at";

fn map_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<OrderRow> {
    Ok(OrderRow {
        id: row.get(0)?,
        code: row.get(1)?,
        customer_id: row.get(2)?,
        status: row.get(3)?,
        total_amount: money_at(row, 4)?,
        delivery_date: row.get(5)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}

fn map_item(row: &rusqlite::Row<'_>) -> rusqlite::Result<OrderItemRow> {
    Ok(OrderItemRow {
        id: row.get(0)?,
        order_id: row.get(1)?,
        product_id: row.get(2)?,
        position: row.get(3)?,
        description: row.get(4)?,
        quantity: row.get(5)?,
        unit_price: money_at(row, 6)?,
    })
}

fn insert_items(conn: &Connection, items: &[OrderItemRow]) -> DbResult<()> {
    let mut stmt = conn.prepare(
        "INSERT INTO order_items (id, order_id, product_id, position, description, quantity, unit_price)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
    )?;
    for item in items {
        stmt.execute(params![
            item.id,
            item.order_id,
            item.product_id,
            item.position,
            item.description,
            item.quantity,
            money_to_sql(item.unit_price)
        ])?;
    }
    Ok(())
}

/// Insert an order and its items in one transaction.
pub fn insert_order(pool: &DbPool, row: &OrderRow, items: &[OrderItemRow]) -> DbResult<()> {
    pool.with_transaction(|tx| {
        tx.execute(
            "INSERT INTO orders (id, code, customer_id, status, total_amount, delivery_date, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                row.id,
                row.code,
                row.customer_id,
                row.status,
                money_to_sql(row.total_amount),
                row.delivery_date,
                row.created_at,
                row.updated_at
            ],
        )?;
        insert_items(tx, items)
    })
}

/// Get an order by ID.
pub fn get_order(pool: &DbPool, id: Uuid) -> DbResult<OrderRow> {
    pool.with_conn(|conn| {
        conn.query_row(
            &format!("SELECT {} FROM orders WHERE id = ?1", COLUMNS),
            params![id],
            map_row,
        )
        .optional()?
        .ok_or_else(|| DbError::NotFound(format!("Order: {}", id)))
    })
}

/// List orders matching `filter`, newest first.
pub fn list_orders(pool: &DbPool, filter: &OrderFilter) -> DbResult<Vec<OrderRow>> {
    let mut clauses: Vec<String> = Vec::new();
    let mut values: Vec<Box<dyn ToSql>> = Vec::new();

    if let Some(customer_id) = filter.customer_id {
        values.push(Box::new(customer_id));
        clauses.push(format!("customer_id = ?{}", values.len()));
    }
    if let Some(status) = &filter.status {
        values.push(Box::new(status.clone()));
        clauses.push(format!("status = ?{}", values.len()));
    }
    if let Some(from) = filter.created_from {
        values.push(Box::new(from));
        clauses.push(format!("created_at >= ?{}", values.len()));
    }
    if let Some(to) = filter.created_to {
        values.push(Box::new(to));
        clauses.push(format!("created_at <= ?{}", values.len()));
    }

    let mut sql = format!("SELECT {} FROM orders", COLUMNS);
    if !clauses.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&clauses.join(" AND "));
    }
    sql.push_str(" ORDER BY created_at DESC");

    pool.with_conn(|conn| {
        let mut stmt = conn.prepare(&sql)?;
        let params: Vec<&dyn ToSql> = values.iter().map(|v| v.as_ref()).collect();
        let rows = stmt.query_map(params.as_slice(), map_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(DbError::from)
    })
}

/// Items of an order in their stored order.
pub fn list_order_items(pool: &DbPool, order_id: Uuid) -> DbResult<Vec<OrderItemRow>> {
    pool.with_conn(|conn| {
        let mut stmt = conn.prepare(
            "SELECT id, order_id, product_id, position, description, quantity, unit_price
             FROM order_items WHERE order_id = ?1
             ORDER BY position ASC",
        )?;
        let rows = stmt.query_map(params![order_id], map_item)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(DbError::from)
    })
}

/// Overwrite an order header and replace its items wholesale.
///
/// Service-order lines linked to the discarded items keep their copy with
/// the link cleared.
pub fn update_order(pool: &DbPool, row: &OrderRow, items: &[OrderItemRow]) -> DbResult<()> {
    pool.with_transaction(|tx| {
        let changed = tx.execute(
            "UPDATE orders
             SET code = ?2, status = ?3, total_amount = ?4, delivery_date = ?5, updated_at = ?6
             WHERE id = ?1",
            params![
                row.id,
                row.code,
                row.status,
                money_to_sql(row.total_amount),
                row.delivery_date,
                row.updated_at
            ],
        )?;
        if changed == 0 {
            return Err(DbError::NotFound(format!("Order: {}", row.id)));
        }
        tx.execute("DELETE FROM order_items WHERE order_id = ?1", params![row.id])?;
        insert_items(tx, items)
    })
}

/// Delete an order and its items. Service orders referencing it block the
/// delete.
pub fn delete_order(pool: &DbPool, id: Uuid) -> DbResult<()> {
    pool.with_conn(|conn| {
        let changed = conn.execute("DELETE FROM orders WHERE id = ?1", params![id])?;
        if changed == 0 {
            return Err(DbError::NotFound(format!("Order: {}", id)));
        }
        Ok(())
    })
}

/// Number of stored orders.
pub fn count_orders(pool: &DbPool) -> DbResult<i64> {
    pool.with_conn(|conn| {
        conn.query_row("SELECT COUNT(*) FROM orders", [], |row| row.get(0))
            .map_err(DbError::from)
    })
}
