//! Expense queries.

use crate::pool::{DbError, DbPool, DbResult};
use crate::queries::{money_at, money_to_sql};
use chrono::{DateTime, Utc};
use rusqlite::types::ToSql;
use rusqlite::{params, OptionalExtension};
use rust_decimal::Decimal;
use uuid::Uuid;

/// Expense row from database.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseRow {
    pub id: Uuid,
    pub description: String,
    pub amount: Decimal,
    pub category: String,
    pub expense_date: DateTime<Utc>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Filters for [`list_expenses`]. Date bounds are inclusive.
#[derive(Debug, Clone, Default)]
pub struct ExpenseFilter {
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub category: Option<String>,
}

const COLUMNS: &str =
    "id, description, amount, category, expense_date, notes, created_at, updated_at";

fn map_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<ExpenseRow> {
    Ok(ExpenseRow {
        id: row.get(0)?,
        description: row.get(1)?,
        amount: money_at(row, 2)?,
        category: row.get(3)?,
        expense_date: row.get(4)?,
        notes: row.get(5)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}

/// Insert a new expense.
pub fn insert_expense(pool: &DbPool, row: &ExpenseRow) -> DbResult<()> {
    pool.with_conn(|conn| {
        conn.execute(
            "INSERT INTO expenses (id, description, amount, category, expense_date, notes, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                row.id,
                row.description,
                money_to_sql(row.amount),
                row.category,
                row.expense_date,
                row.notes,
                row.created_at,
                row.updated_at
            ],
        )?;
        Ok(())
    })
}

/// Get an expense by ID.
pub fn get_expense(pool: &DbPool, id: Uuid) -> DbResult<ExpenseRow> {
    pool.with_conn(|conn| {
        conn.query_row(
            &format!("SELECT {} FROM expenses WHERE id = ?1", COLUMNS),
            params![id],
            map_row,
        )
        .optional()?
        .ok_or_else(|| DbError::NotFound(format!("Expense: {}", id)))
    })
}

/// List expenses matching `filter`, most recent expense date first.
pub fn list_expenses(pool: &DbPool, filter: &ExpenseFilter) -> DbResult<Vec<ExpenseRow>> {
    let mut clauses: Vec<String> = Vec::new();
    let mut values: Vec<Box<dyn ToSql>> = Vec::new();

    if let Some(start) = filter.start_date {
        values.push(Box::new(start));
        clauses.push(format!("expense_date >= ?{}", values.len()));
    }
    if let Some(end) = filter.end_date {
        values.push(Box::new(end));
        clauses.push(format!("expense_date <= ?{}", values.len()));
    }
    if let Some(category) = &filter.category {
        values.push(Box::new(category.clone()));
        clauses.push(format!("category = ?{}", values.len()));
    }

    let mut sql = format!("SELECT {} FROM expenses", COLUMNS);
    if !clauses.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&clauses.join(" AND "));
    }
    sql.push_str(" ORDER BY expense_date DESC, created_at DESC");

    pool.with_conn(|conn| {
        let mut stmt = conn.prepare(&sql)?;
        let params: Vec<&dyn ToSql> = values.iter().map(|v| v.as_ref()).collect();
        let rows = stmt.query_map(params.as_slice(), map_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(DbError::from)
    })
}

/// Overwrite the mutable fields of an expense.
pub fn update_expense(pool: &DbPool, row: &ExpenseRow) -> DbResult<()> {
    pool.with_conn(|conn| {
        let changed = conn.execute(
            "UPDATE expenses
             SET description = ?2, amount = ?3, category = ?4, expense_date = ?5,
                 notes = ?6, updated_at = ?7
             WHERE id = ?1",
            params![
                row.id,
                row.description,
                money_to_sql(row.amount),
                row.category,
                row.expense_date,
                row.notes,
                row.updated_at
            ],
        )?;
        if changed == 0 {
            return Err(DbError::NotFound(format!("Expense: {}", row.id)));
        }
        Ok(())
    })
}

/// Delete an expense.
pub fn delete_expense(pool: &DbPool, id: Uuid) -> DbResult<()> {
    pool.with_conn(|conn| {
        let changed = conn.execute("DELETE FROM expenses WHERE id = ?1", params![id])?;
        if changed == 0 {
            return Err(DbError::NotFound(format!("Expense: {}", id)));
        }
        Ok(())
    })
}
