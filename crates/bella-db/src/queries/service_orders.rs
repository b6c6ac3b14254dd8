//! Service order (delivery/installation) queries.

use crate::pool::{DbError, DbPool, DbResult};
use crate::queries::{money_at, money_to_sql};
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::types::ToSql;
use rusqlite::{params, Connection, OptionalExtension};
use rust_decimal::Decimal;
use uuid::Uuid;

/// Service order row from database.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceOrderRow {
    pub id: Uuid,
    pub order_id: Uuid,
    pub customer_id: Uuid,
    pub scheduled_date: NaiveDate,
    pub status: String,
    pub responsible: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Service order item row. `order_item_id` is `None` for ad hoc lines.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceOrderItemRow {
    pub id: Uuid,
    pub service_order_id: Uuid,
    pub order_item_id: Option<Uuid>,
    pub position: i64,
    pub description: String,
    pub quantity: i64,
    pub unit_price: Decimal,
}

/// Filters for [`list_service_orders`]. Date bounds are inclusive.
#[derive(Debug, Clone, Default)]
pub struct ServiceOrderFilter {
    pub customer_id: Option<Uuid>,
    pub order_id: Option<Uuid>,
    pub status: Option<String>,
    pub scheduled_from: Option<NaiveDate>,
    pub scheduled_to: Option<NaiveDate>,
}

const COLUMNS: &str = "id, order_id, customer_id, scheduled_date, status, responsible, notes, created_at, updated_at";

fn map_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<ServiceOrderRow> {
    Ok(ServiceOrderRow {
        id: row.get(0)?,
        order_id: row.get(1)?,
        customer_id: row.get(2)?,
        scheduled_date: row.get(3)?,
        status: row.get(4)?,
        responsible: row.get(5)?,
        notes: row.get(6)?,
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}

fn map_item(row: &rusqlite::Row<'_>) -> rusqlite::Result<ServiceOrderItemRow> {
    Ok(ServiceOrderItemRow {
        id: row.get(0)?,
        service_order_id: row.get(1)?,
        order_item_id: row.get(2)?,
        position: row.get(3)?,
        description: row.get(4)?,
        quantity: row.get(5)?,
        unit_price: money_at(row, 6)?,
    })
}

fn insert_items(conn: &Connection, items: &[ServiceOrderItemRow]) -> DbResult<()> {
    let mut stmt = conn.prepare(
        "INSERT INTO service_order_items
            (id, service_order_id, order_item_id, position, description, quantity, unit_price)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
    )?;
    for item in items {
        stmt.execute(params![
            item.id,
            item.service_order_id,
            item.order_item_id,
            item.position,
            item.description,
            item.quantity,
            money_to_sql(item.unit_price)
        ])?;
    }
    Ok(())
}

/// Insert a service order and its items in one transaction.
pub fn insert_service_order(
    pool: &DbPool,
    row: &ServiceOrderRow,
    items: &[ServiceOrderItemRow],
) -> DbResult<()> {
    pool.with_transaction(|tx| {
        tx.execute(
            "INSERT INTO service_orders
                (id, order_id, customer_id, scheduled_date, status, responsible, notes, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                row.id,
                row.order_id,
                row.customer_id,
                row.scheduled_date,
                row.status,
                row.responsible,
                row.notes,
                row.created_at,
                row.updated_at
            ],
        )?;
        insert_items(tx, items)
    })
}

/// Get a service order by ID.
pub fn get_service_order(pool: &DbPool, id: Uuid) -> DbResult<ServiceOrderRow> {
    pool.with_conn(|conn| {
        conn.query_row(
            &format!("SELECT {} FROM service_orders WHERE id = ?1", COLUMNS),
            params![id],
            map_row,
        )
        .optional()?
        .ok_or_else(|| DbError::NotFound(format!("Service order: {}", id)))
    })
}

/// List service orders matching `filter`, by scheduled date then creation.
pub fn list_service_orders(
    pool: &DbPool,
    filter: &ServiceOrderFilter,
) -> DbResult<Vec<ServiceOrderRow>> {
    let mut clauses: Vec<String> = Vec::new();
    let mut values: Vec<Box<dyn ToSql>> = Vec::new();

    if let Some(customer_id) = filter.customer_id {
        values.push(Box::new(customer_id));
        clauses.push(format!("customer_id = ?{}", values.len()));
    }
    if let Some(order_id) = filter.order_id {
        values.push(Box::new(order_id));
        clauses.push(format!("order_id = ?{}", values.len()));
    }
    if let Some(status) = &filter.status {
        values.push(Box::new(status.clone()));
        clauses.push(format!("status = ?{}", values.len()));
    }
    if let Some(from) = filter.scheduled_from {
        values.push(Box::new(from));
        clauses.push(format!("scheduled_date >= ?{}", values.len()));
    }
    if let Some(to) = filter.scheduled_to {
        values.push(Box::new(to));
        clauses.push(format!("scheduled_date <= ?{}", values.len()));
    }

    let mut sql = format!("SELECT {} FROM service_orders", COLUMNS);
    if !clauses.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&clauses.join(" AND "));
    }
    sql.push_str(" ORDER BY scheduled_date ASC, created_at ASC");

    pool.with_conn(|conn| {
        let mut stmt = conn.prepare(&sql)?;
        let params: Vec<&dyn ToSql> = values.iter().map(|v| v.as_ref()).collect();
        let rows = stmt.query_map(params.as_slice(), map_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(DbError::from)
    })
}

/// Items of a service order in their stored order.
pub fn list_service_order_items(
    pool: &DbPool,
    service_order_id: Uuid,
) -> DbResult<Vec<ServiceOrderItemRow>> {
    pool.with_conn(|conn| {
        let mut stmt = conn.prepare(
            "SELECT id, service_order_id, order_item_id, position, description, quantity, unit_price
             FROM service_order_items WHERE service_order_id = ?1
             ORDER BY position ASC",
        )?;
        let rows = stmt.query_map(params![service_order_id], map_item)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(DbError::from)
    })
}

/// Overwrite a service order and replace its items wholesale. The status
/// column is left alone.
pub fn update_service_order(
    pool: &DbPool,
    row: &ServiceOrderRow,
    items: &[ServiceOrderItemRow],
) -> DbResult<()> {
    pool.with_transaction(|tx| {
        let changed = tx.execute(
            "UPDATE service_orders
             SET order_id = ?2, customer_id = ?3, scheduled_date = ?4,
                 responsible = ?5, notes = ?6, updated_at = ?7
             WHERE id = ?1",
            params![
                row.id,
                row.order_id,
                row.customer_id,
                row.scheduled_date,
                row.responsible,
                row.notes,
                row.updated_at
            ],
        )?;
        if changed == 0 {
            return Err(DbError::NotFound(format!("Service order: {}", row.id)));
        }
        tx.execute(
            "DELETE FROM service_order_items WHERE service_order_id = ?1",
            params![row.id],
        )?;
        insert_items(tx, items)
    })
}

/// Overwrite the status of a service order.
pub fn update_service_order_status(
    pool: &DbPool,
    id: Uuid,
    status: &str,
    updated_at: DateTime<Utc>,
) -> DbResult<()> {
    pool.with_conn(|conn| {
        let changed = conn.execute(
            "UPDATE service_orders SET status = ?2, updated_at = ?3 WHERE id = ?1",
            params![id, status, updated_at],
        )?;
        if changed == 0 {
            return Err(DbError::NotFound(format!("Service order: {}", id)));
        }
        Ok(())
    })
}

/// Delete a service order and its items.
pub fn delete_service_order(pool: &DbPool, id: Uuid) -> DbResult<()> {
    pool.with_conn(|conn| {
        let changed = conn.execute("DELETE FROM service_orders WHERE id = ?1", params![id])?;
        if changed == 0 {
            return Err(DbError::NotFound(format!("Service order: {}", id)));
        }
        Ok(())
    })
}

/// Number of stored service orders.
pub fn count_service_orders(pool: &DbPool) -> DbResult<i64> {
    pool.with_conn(|conn| {
        conn.query_row("SELECT COUNT(*) FROM service_orders", [], |row| row.get(0))
            .map_err(DbError::from)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::customers::{self, CustomerRow};
    use crate::queries::orders::{self, OrderItemRow, OrderRow};
    use crate::queries::test_support;
    use rust_decimal_macros::dec;

    struct Fixture {
        customer_id: Uuid,
        order_id: Uuid,
        order_item_id: Uuid,
    }

    fn fixture(pool: &DbPool) -> Fixture {
        let customer = CustomerRow {
            id: Uuid::new_v4(),
            name: "Cliente".to_string(),
            email: None,
            phone: None,
            address: None,
            created_at: Utc::now(),
            updated_at: None,
        };
        customers::insert_customer(pool, &customer).unwrap();

        let order = OrderRow {
            id: Uuid::new_v4(),
            code: "PED-1".to_string(),
            customer_id: customer.id,
            status: "pending".to_string(),
            total_amount: dec!(2500),
            delivery_date: None,
            created_at: Utc::now(),
            updated_at: None,
        };
        let item = OrderItemRow {
            id: Uuid::new_v4(),
            order_id: order.id,
            product_id: None,
            position: 0,
            description: "Armario".to_string(),
            quantity: 1,
            unit_price: dec!(2500),
        };
        orders::insert_order(pool, &order, std::slice::from_ref(&item)).unwrap();

        Fixture {
            customer_id: customer.id,
            order_id: order.id,
            order_item_id: item.id,
        }
    }

    fn service_order(f: &Fixture, day: u32) -> ServiceOrderRow {
        ServiceOrderRow {
            id: Uuid::new_v4(),
            order_id: f.order_id,
            customer_id: f.customer_id,
            scheduled_date: NaiveDate::from_ymd_opt(2026, 3, day).unwrap(),
            status: "scheduled".to_string(),
            responsible: Some("Joao".to_string()),
            notes: None,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    fn linked_item(service_order_id: Uuid, order_item_id: Uuid) -> ServiceOrderItemRow {
        ServiceOrderItemRow {
            id: Uuid::new_v4(),
            service_order_id,
            order_item_id: Some(order_item_id),
            position: 0,
            description: "Armario".to_string(),
            quantity: 1,
            unit_price: dec!(2500),
        }
    }

    #[test]
    fn test_list_by_date_range_is_sorted() {
        let pool = test_support::pool();
        let f = fixture(&pool);
        let late = service_order(&f, 20);
        let early = service_order(&f, 5);
        insert_service_order(&pool, &late, &[]).unwrap();
        insert_service_order(&pool, &early, &[]).unwrap();

        let all = list_service_orders(&pool, &ServiceOrderFilter::default()).unwrap();
        assert_eq!(all[0].id, early.id);
        assert_eq!(all[1].id, late.id);

        let window = list_service_orders(
            &pool,
            &ServiceOrderFilter {
                scheduled_from: NaiveDate::from_ymd_opt(2026, 3, 10),
                scheduled_to: NaiveDate::from_ymd_opt(2026, 3, 20),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(window.len(), 1);
        assert_eq!(window[0].id, late.id);
    }

    #[test]
    fn test_replacing_order_items_clears_links() {
        let pool = test_support::pool();
        let f = fixture(&pool);
        let so = service_order(&f, 1);
        insert_service_order(&pool, &so, &[linked_item(so.id, f.order_item_id)]).unwrap();

        let order = orders::get_order(&pool, f.order_id).unwrap();
        orders::update_order(&pool, &order, &[]).unwrap();

        let items = list_service_order_items(&pool, so.id).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].order_item_id, None);
        assert_eq!(items[0].description, "Armario");
    }

    #[test]
    fn test_order_with_service_orders_cannot_be_deleted() {
        let pool = test_support::pool();
        let f = fixture(&pool);
        let so = service_order(&f, 1);
        insert_service_order(&pool, &so, &[]).unwrap();

        assert!(matches!(
            orders::delete_order(&pool, f.order_id),
            Err(DbError::ForeignKeyViolation(_))
        ));

        delete_service_order(&pool, so.id).unwrap();
        orders::delete_order(&pool, f.order_id).unwrap();
    }

    #[test]
    fn test_status_update() {
        let pool = test_support::pool();
        let f = fixture(&pool);
        let so = service_order(&f, 1);
        insert_service_order(&pool, &so, &[]).unwrap();

        update_service_order_status(&pool, so.id, "delivered", Utc::now()).unwrap();
        let loaded = get_service_order(&pool, so.id).unwrap();
        assert_eq!(loaded.status, "delivered");
        assert!(loaded.updated_at.is_some());
        assert!(matches!(
            update_service_order_status(&pool, Uuid::new_v4(), "delivered", Utc::now()),
            Err(DbError::NotFound(_))
        ));
    }
}
