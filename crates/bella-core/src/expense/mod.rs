//! Operating expenses.

pub mod model;

use crate::clock::Clock;
use crate::error::BellaResult;
use crate::{money, text};
use bella_db::queries::expenses::{self as queries, ExpenseFilter, ExpenseRow};
use bella_db::DbPool;
use model::{Expense, ExpenseInput, ExpenseQuery};
use uuid::Uuid;
use validator::Validate;

fn normalized(input: ExpenseInput) -> ExpenseInput {
    ExpenseInput {
        description: input.description.trim().to_string(),
        notes: text::optional(input.notes),
        ..input
    }
}

/// Record an expense.
pub fn create_expense(pool: &DbPool, clock: &dyn Clock, input: ExpenseInput) -> BellaResult<Expense> {
    let input = normalized(input);
    input.validate()?;

    let row = ExpenseRow {
        id: Uuid::new_v4(),
        description: input.description,
        amount: money::ensure_non_negative("amount", input.amount)?,
        category: input.category.as_str().to_string(),
        expense_date: input.expense_date,
        notes: input.notes,
        created_at: clock.now(),
        updated_at: None,
    };
    queries::insert_expense(pool, &row)?;
    tracing::info!(expense_id = %row.id, amount = %row.amount, category = %row.category, "Expense recorded");

    Expense::from_row(row)
}

pub fn get_expense(pool: &DbPool, id: Uuid) -> BellaResult<Expense> {
    Expense::from_row(queries::get_expense(pool, id)?)
}

/// List expenses, most recent first.
pub fn list_expenses(pool: &DbPool, query: &ExpenseQuery) -> BellaResult<Vec<Expense>> {
    let filter = ExpenseFilter {
        start_date: query.start_date,
        end_date: query.end_date,
        category: query.category.map(|c| c.as_str().to_string()),
    };
    let rows = queries::list_expenses(pool, &filter)?;
    rows.into_iter().map(Expense::from_row).collect()
}

pub fn update_expense(
    pool: &DbPool,
    clock: &dyn Clock,
    id: Uuid,
    input: ExpenseInput,
) -> BellaResult<Expense> {
    let input = normalized(input);
    input.validate()?;

    let mut row = queries::get_expense(pool, id)?;
    row.description = input.description;
    row.amount = money::ensure_non_negative("amount", input.amount)?;
    row.category = input.category.as_str().to_string();
    row.expense_date = input.expense_date;
    row.notes = input.notes;
    row.updated_at = Some(clock.now());
    queries::update_expense(pool, &row)?;
    tracing::info!(expense_id = %id, "Expense updated");

    Expense::from_row(row)
}

pub fn delete_expense(pool: &DbPool, id: Uuid) -> BellaResult<()> {
    queries::delete_expense(pool, id)?;
    tracing::info!(expense_id = %id, "Expense deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::SystemClock;
    use crate::error::ErrorKind;
    use crate::test_support::pool;
    use chrono::{TimeZone, Utc};
    use model::ExpenseCategory;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn input(day: u32, category: ExpenseCategory, amount: Decimal) -> ExpenseInput {
        ExpenseInput {
            description: "MDF 18mm".to_string(),
            amount,
            category,
            expense_date: Utc.with_ymd_and_hms(2026, 2, day, 9, 0, 0).unwrap(),
            notes: None,
        }
    }

    #[test]
    fn test_list_filters_are_inclusive_and_newest_first() {
        let pool = pool();
        let early = create_expense(&pool, &SystemClock, input(1, ExpenseCategory::Materials, dec!(320))).unwrap();
        let mid = create_expense(&pool, &SystemClock, input(14, ExpenseCategory::Labor, dec!(1200))).unwrap();
        let late = create_expense(&pool, &SystemClock, input(28, ExpenseCategory::Materials, dec!(75.40))).unwrap();

        let all = list_expenses(&pool, &ExpenseQuery::default()).unwrap();
        let ids: Vec<Uuid> = all.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![late.id, mid.id, early.id]);

        let window = list_expenses(
            &pool,
            &ExpenseQuery {
                start_date: Some(mid.expense_date),
                end_date: Some(late.expense_date),
                category: None,
            },
        )
        .unwrap();
        assert_eq!(window.len(), 2);

        let materials = list_expenses(
            &pool,
            &ExpenseQuery {
                category: Some(ExpenseCategory::Materials),
                ..Default::default()
            },
        )
        .unwrap();
        assert!(materials.iter().all(|e| e.category == ExpenseCategory::Materials));
        assert_eq!(materials.len(), 2);
    }

    #[test]
    fn test_negative_amount_is_rejected() {
        let pool = pool();
        let err = create_expense(&pool, &SystemClock, input(1, ExpenseCategory::Other, dec!(-5))).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValidationFailure);
    }

    #[test]
    fn test_update() {
        let pool = pool();
        let created = create_expense(&pool, &SystemClock, input(3, ExpenseCategory::Other, dec!(10))).unwrap();
        let updated = update_expense(
            &pool,
            &SystemClock,
            created.id,
            input(4, ExpenseCategory::Utilities, dec!(189.90)),
        )
        .unwrap();

        assert_eq!(updated.category, ExpenseCategory::Utilities);
        assert_eq!(get_expense(&pool, created.id).unwrap().amount, dec!(189.90));
        assert!(updated.updated_at.is_some());
    }
}
