//! Customer queries.

use crate::pool::{DbError, DbPool, DbResult};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

/// Customer row from database.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomerRow {
    pub id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

const COLUMNS: &str = "id, name, email, phone, address, created_at, updated_at";

fn map_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<CustomerRow> {
    Ok(CustomerRow {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        phone: row.get(3)?,
        address: row.get(4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

/// Insert a new customer.
pub fn insert_customer(pool: &DbPool, row: &CustomerRow) -> DbResult<()> {
    pool.with_conn(|conn| {
        conn.execute(
            "INSERT INTO customers (id, name, email, phone, address, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                row.id,
                row.name,
                row.email,
                row.phone,
                row.address,
                row.created_at,
                row.updated_at
            ],
        )?;
        Ok(())
    })
}

/// Get a customer by ID.
pub fn get_customer(pool: &DbPool, id: Uuid) -> DbResult<CustomerRow> {
    pool.with_conn(|conn| fetch_customer(conn, id))
}

fn fetch_customer(conn: &Connection, id: Uuid) -> DbResult<CustomerRow> {
    conn.query_row(
        &format!("SELECT {} FROM customers WHERE id = ?1", COLUMNS),
        params![id],
        map_row,
    )
    .optional()?
    .ok_or_else(|| DbError::NotFound(format!("Customer: {}", id)))
}

/// Whether a customer with this ID exists.
pub fn customer_exists(pool: &DbPool, id: Uuid) -> DbResult<bool> {
    pool.with_conn(|conn| {
        let found: Option<i64> = conn
            .query_row("SELECT 1 FROM customers WHERE id = ?1", params![id], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(found.is_some())
    })
}

/// List all customers ordered by name.
pub fn list_customers(pool: &DbPool) -> DbResult<Vec<CustomerRow>> {
    pool.with_conn(|conn| {
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM customers ORDER BY name COLLATE NOCASE ASC, created_at ASC",
            COLUMNS
        ))?;
        let rows = stmt.query_map([], map_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(DbError::from)
    })
}

/// Overwrite the mutable fields of a customer.
pub fn update_customer(pool: &DbPool, row: &CustomerRow) -> DbResult<()> {
    pool.with_conn(|conn| {
        let changed = conn.execute(
            "UPDATE customers
             SET name = ?2, email = ?3, phone = ?4, address = ?5, updated_at = ?6
             WHERE id = ?1",
            params![row.id, row.name, row.email, row.phone, row.address, row.updated_at],
        )?;
        if changed == 0 {
            return Err(DbError::NotFound(format!("Customer: {}", row.id)));
        }
        Ok(())
    })
}

/// Delete a customer. Fails with [`DbError::ForeignKeyViolation`] while
/// orders or service orders still reference it.
pub fn delete_customer(pool: &DbPool, id: Uuid) -> DbResult<()> {
    pool.with_conn(|conn| {
        let changed = conn.execute("DELETE FROM customers WHERE id = ?1", params![id])?;
        if changed == 0 {
            return Err(DbError::NotFound(format!("Customer: {}", id)));
        }
        Ok(())
    })
}
