//! Product catalog queries (products and their bill-of-materials parts).

use crate::pool::{DbError, DbPool, DbResult};
use crate::queries::{money_at, money_to_sql, placeholders};
use chrono::{DateTime, Utc};
use rusqlite::{params, params_from_iter, Connection, OptionalExtension};
use rust_decimal::Decimal;
use uuid::Uuid;

/// Product row from database.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductRow {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub default_sale_price: Decimal,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Product part row. `position` keeps the caller's ordering.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductPartRow {
    pub id: Uuid,
    pub product_id: Uuid,
    pub position: i64,
    pub name: String,
    pub measurements: Option<String>,
    pub quantity: i64,
}

const COLUMNS: &str =
    "id, name, description, default_sale_price, is_active, created_at, updated_at";

fn map_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<ProductRow> {
    Ok(ProductRow {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        default_sale_price: money_at(row, 3)?,
        is_active: row.get(4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

fn map_part(row: &rusqlite::Row<'_>) -> rusqlite::Result<ProductPartRow> {
    Ok(ProductPartRow {
        id: row.get(0)?,
        product_id: row.get(1)?,
        position: row.get(2)?,
        name: row.get(3)?,
        measurements: row.get(4)?,
        quantity: row.get(5)?,
    })
}

fn insert_parts(conn: &Connection, parts: &[ProductPartRow]) -> DbResult<()> {
    let mut stmt = conn.prepare(
        "INSERT INTO product_parts (id, product_id, position, name, measurements, quantity)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    )?;
    for part in parts {
        stmt.execute(params![
            part.id,
            part.product_id,
            part.position,
            part.name,
            part.measurements,
            part.quantity
        ])?;
    }
    Ok(())
}

/// Insert a product together with its parts in one transaction.
pub fn insert_product(pool: &DbPool, row: &ProductRow, parts: &[ProductPartRow]) -> DbResult<()> {
    pool.with_transaction(|tx| {
        tx.execute(
            "INSERT INTO products (id, name, description, default_sale_price, is_active, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                row.id,
                row.name,
                row.description,
                money_to_sql(row.default_sale_price),
                row.is_active,
                row.created_at,
                row.updated_at
            ],
        )?;
        insert_parts(tx, parts)
    })
}

/// Get a product by ID.
pub fn get_product(pool: &DbPool, id: Uuid) -> DbResult<ProductRow> {
    pool.with_conn(|conn| fetch_product(conn, id))
}

fn fetch_product(conn: &Connection, id: Uuid) -> DbResult<ProductRow> {
    conn.query_row(
        &format!("SELECT {} FROM products WHERE id = ?1", COLUMNS),
        params![id],
        map_row,
    )
    .optional()?
    .ok_or_else(|| DbError::NotFound(format!("Product: {}", id)))
}

/// List all products ordered by name.
pub fn list_products(pool: &DbPool) -> DbResult<Vec<ProductRow>> {
    pool.with_conn(|conn| {
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM products ORDER BY name COLLATE NOCASE ASC, created_at ASC",
            COLUMNS
        ))?;
        let rows = stmt.query_map([], map_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(DbError::from)
    })
}

/// Parts of a product in their stored order.
pub fn list_parts(pool: &DbPool, product_id: Uuid) -> DbResult<Vec<ProductPartRow>> {
    pool.with_conn(|conn| fetch_parts(conn, product_id))
}

fn fetch_parts(conn: &Connection, product_id: Uuid) -> DbResult<Vec<ProductPartRow>> {
    let mut stmt = conn.prepare(
        "SELECT id, product_id, position, name, measurements, quantity
         FROM product_parts WHERE product_id = ?1
         ORDER BY position ASC",
    )?;
    let rows = stmt.query_map(params![product_id], map_part)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(DbError::from)
}

/// Of the given IDs, those that name an existing product.
pub fn existing_product_ids(pool: &DbPool, ids: &[Uuid]) -> DbResult<Vec<Uuid>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    pool.with_conn(|conn| {
        let mut stmt = conn.prepare(&format!(
            "SELECT id FROM products WHERE id IN ({})",
            placeholders(ids.len())
        ))?;
        let rows = stmt.query_map(params_from_iter(ids.iter()), |row| row.get(0))?;
        rows.collect::<Result<Vec<_>, _>>().map_err(DbError::from)
    })
}

/// Overwrite a product and replace its parts wholesale.
pub fn update_product(pool: &DbPool, row: &ProductRow, parts: &[ProductPartRow]) -> DbResult<()> {
    pool.with_transaction(|tx| {
        let changed = tx.execute(
            "UPDATE products
             SET name = ?2, description = ?3, default_sale_price = ?4, is_active = ?5, updated_at = ?6
             WHERE id = ?1",
            params![
                row.id,
                row.name,
                row.description,
                money_to_sql(row.default_sale_price),
                row.is_active,
                row.updated_at
            ],
        )?;
        if changed == 0 {
            return Err(DbError::NotFound(format!("Product: {}", row.id)));
        }
        tx.execute(
            "DELETE FROM product_parts WHERE product_id = ?1",
            params![row.id],
        )?;
        insert_parts(tx, parts)
    })
}

/// Delete a product. Order items keep their copy with the link cleared;
/// production schedules block the delete.
pub fn delete_product(pool: &DbPool, id: Uuid) -> DbResult<()> {
    pool.with_conn(|conn| {
        let changed = conn.execute("DELETE FROM products WHERE id = ?1", params![id])?;
        if changed == 0 {
            return Err(DbError::NotFound(format!("Product: {}", id)));
        }
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::test_support;
    use rust_decimal_macros::dec;

    fn product(name: &str) -> ProductRow {
        ProductRow {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: None,
            default_sale_price: dec!(1890.90),
            is_active: true,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    fn part(product_id: Uuid, position: i64, name: &str, quantity: i64) -> ProductPartRow {
        ProductPartRow {
            id: Uuid::new_v4(),
            product_id,
            position,
            name: name.to_string(),
            measurements: Some("60x40".to_string()),
            quantity,
        }
    }

    #[test]
    fn test_price_survives_round_trip_exactly() {
        let pool = test_support::pool();
        let row = product("Rack");
        insert_product(&pool, &row, &[part(row.id, 0, "Lateral", 2)]).unwrap();

        let loaded = get_product(&pool, row.id).unwrap();
        assert_eq!(loaded.default_sale_price, dec!(1890.90));
    }

    #[test]
    fn test_update_replaces_parts() {
        let pool = test_support::pool();
        let mut row = product("Armario");
        insert_product(
            &pool,
            &row,
            &[part(row.id, 0, "Porta", 2), part(row.id, 1, "Prateleira", 3)],
        )
        .unwrap();

        row.name = "Armario Duplo".to_string();
        row.updated_at = Some(Utc::now());
        update_product(&pool, &row, &[part(row.id, 0, "Tampo", 1)]).unwrap();

        let parts = list_parts(&pool, row.id).unwrap();
        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0].name, "Tampo");
        assert_eq!(get_product(&pool, row.id).unwrap().name, "Armario Duplo");
    }

    #[test]
    fn test_existing_product_ids() {
        let pool = test_support::pool();
        let row = product("Mesa");
        insert_product(&pool, &row, &[]).unwrap();

        let unknown = Uuid::new_v4();
        let found = existing_product_ids(&pool, &[row.id, unknown]).unwrap();
        assert_eq!(found, vec![row.id]);
        assert!(existing_product_ids(&pool, &[]).unwrap().is_empty());
    }

    #[test]
    fn test_delete_cascades_to_parts() {
        let pool = test_support::pool();
        let row = product("Banco");
        insert_product(&pool, &row, &[part(row.id, 0, "Assento", 1)]).unwrap();

        delete_product(&pool, row.id).unwrap();
        assert!(list_parts(&pool, row.id).unwrap().is_empty());
        assert!(matches!(get_product(&pool, row.id), Err(DbError::NotFound(_))));
    }
}
