//! Production schedule queries.

use crate::pool::{DbError, DbPool, DbResult};
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::types::ToSql;
use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

/// Production schedule row from database.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleRow {
    pub id: Uuid,
    pub product_id: Uuid,
    pub scheduled_date: NaiveDate,
    pub quantity: i64,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Snapshot of one product part at planning time.
#[derive(Debug, Clone, PartialEq)]
pub struct SchedulePartRow {
    pub id: Uuid,
    pub schedule_id: Uuid,
    pub position: i64,
    pub name: String,
    pub measurements: Option<String>,
    pub quantity: i64,
}

#[derive(Debug, Clone, Default)]
pub struct ScheduleFilter {
    pub scheduled_date: Option<NaiveDate>,
    pub product_id: Option<Uuid>,
}

const COLUMNS: &str = "id, product_id, scheduled_date, quantity, status, created_at, updated_at";

fn map_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<ScheduleRow> {
    Ok(ScheduleRow {
        id: row.get(0)?,
        product_id: row.get(1)?,
        scheduled_date: row.get(2)?,
        quantity: row.get(3)?,
        status: row.get(4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

fn map_part(row: &rusqlite::Row<'_>) -> rusqlite::Result<SchedulePartRow> {
    Ok(SchedulePartRow {
        id: row.get(0)?,
        schedule_id: row.get(1)?,
        position: row.get(2)?,
        name: row.get(3)?,
        measurements: row.get(4)?,
        quantity: row.get(5)?,
    })
}

fn insert_parts(conn: &Connection, parts: &[SchedulePartRow]) -> DbResult<()> {
    let mut stmt = conn.prepare(
        "INSERT INTO production_schedule_parts
            (id, production_schedule_id, position, name, measurements, quantity)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    )?;
    for part in parts {
        stmt.execute(params![
            part.id,
            part.schedule_id,
            part.position,
            part.name,
            part.measurements,
            part.quantity
        ])?;
    }
    Ok(())
}

/// Insert a schedule with its parts snapshot in one transaction.
pub fn insert_schedule(pool: &DbPool, row: &ScheduleRow, parts: &[SchedulePartRow]) -> DbResult<()> {
    pool.with_transaction(|tx| {
        tx.execute(
            "INSERT INTO production_schedules
                (id, product_id, scheduled_date, quantity, status, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                row.id,
                row.product_id,
                row.scheduled_date,
                row.quantity,
                row.status,
                row.created_at,
                row.updated_at
            ],
        )?;
        insert_parts(tx, parts)
    })
}

/// Get a schedule by ID.
pub fn get_schedule(pool: &DbPool, id: Uuid) -> DbResult<ScheduleRow> {
    pool.with_conn(|conn| {
        conn.query_row(
            &format!("SELECT {} FROM production_schedules WHERE id = ?1", COLUMNS),
            params![id],
            map_row,
        )
        .optional()?
        .ok_or_else(|| DbError::NotFound(format!("Production schedule: {}", id)))
    })
}

/// List schedules, by scheduled date then creation.
pub fn list_schedules(pool: &DbPool, filter: &ScheduleFilter) -> DbResult<Vec<ScheduleRow>> {
    let mut clauses: Vec<String> = Vec::new();
    let mut values: Vec<Box<dyn ToSql>> = Vec::new();

    if let Some(date) = filter.scheduled_date {
        values.push(Box::new(date));
        clauses.push(format!("scheduled_date = ?{}", values.len()));
    }
    if let Some(product_id) = filter.product_id {
        values.push(Box::new(product_id));
        clauses.push(format!("product_id = ?{}", values.len()));
    }

    let mut sql = format!("SELECT {} FROM production_schedules", COLUMNS);
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

pub fn list_schedule_parts(pool: &DbPool, schedule_id: Uuid) -> DbResult<Vec<SchedulePartRow>> {
    pool.with_conn(|conn| {
        let mut stmt = conn.prepare(
            "SELECT id, production_schedule_id, position, name, measurements, quantity
             FROM production_schedule_parts WHERE production_schedule_id = ?1
             ORDER BY position ASC",
        )?;
        let rows = stmt.query_map(params![schedule_id], map_part)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(DbError::from)
    })
}

/// Overwrite the status of a schedule.
pub fn update_schedule_status(
    pool: &DbPool,
    id: Uuid,
    status: &str,
    updated_at: DateTime<Utc>,
) -> DbResult<()> {
    pool.with_conn(|conn| {
        let changed = conn.execute(
            "UPDATE production_schedules SET status = ?2, updated_at = ?3 WHERE id = ?1",
            params![id, status, updated_at],
        )?;
        if changed == 0 {
            return Err(DbError::NotFound(format!("Production schedule: {}", id)));
        }
        Ok(())
    })
}

/// Delete a schedule and its parts snapshot.
pub fn delete_schedule(pool: &DbPool, id: Uuid) -> DbResult<()> {
    pool.with_conn(|conn| {
        let changed = conn.execute(
            "DELETE FROM production_schedules WHERE id = ?1",
            params![id],
        )?;
        if changed == 0 {
            return Err(DbError::NotFound(format!("Production schedule: {}", id)));
        }
        Ok(())
    })
}
