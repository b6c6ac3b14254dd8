//! Monthly financial summary.
//!
//! Revenue counts delivered orders by their accounting date (the delivery
//! date, or the creation time when no delivery date was recorded). Costs
//! are the expenses dated inside the month.

use crate::error::{BellaError, BellaResult};
use crate::expense::model::Expense;
use crate::money;
use crate::order::model::{Order, OrderStatus};
use bella_db::queries::expenses::{self, ExpenseFilter};
use bella_db::queries::orders::{self, OrderFilter};
use bella_db::DbPool;
use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlySummary {
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub total_orders: usize,
    pub total_revenue: Decimal,
    pub total_expenses: Decimal,
    pub balance: Decimal,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct SummaryQuery {
    pub year: i32,
    pub month: u32,
}

/// First day of the month and first day of the following month.
fn month_bounds(year: i32, month: u32) -> BellaResult<(NaiveDate, NaiveDate)> {
    let start = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| BellaError::validation(format!("Invalid month: {}-{}", year, month)))?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .ok_or_else(|| BellaError::validation(format!("Invalid month: {}-{}", year, month)))?;
    Ok((start, next))
}

fn midnight(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::default()).and_utc()
}

/// Summarize revenue and expenses for one calendar month (UTC).
pub fn monthly_summary(pool: &DbPool, year: i32, month: u32) -> BellaResult<MonthlySummary> {
    let (start, next) = month_bounds(year, month)?;
    let (from, until) = (midnight(start), midnight(next));
    let in_period = |at: DateTime<Utc>| at >= from && at < until;

    let delivered = orders::list_orders(
        pool,
        &OrderFilter {
            status: Some(OrderStatus::Delivered.as_str().to_string()),
            ..Default::default()
        },
    )?;
    let revenue_orders: Vec<Order> = delivered
        .into_iter()
        .map(|row| Order::from_rows(row, Vec::new()))
        .collect::<BellaResult<Vec<_>>>()?
        .into_iter()
        .filter(|order| in_period(order.accounting_date()))
        .collect();
    let total_revenue = money::total(revenue_orders.iter().map(|o| o.total_amount))?;

    let expenses = expenses::list_expenses(
        pool,
        &ExpenseFilter {
            start_date: Some(from),
            ..Default::default()
        },
    )?;
    let expenses = expenses
        .into_iter()
        .map(Expense::from_row)
        .collect::<BellaResult<Vec<_>>>()?;
    let total_expenses = money::total(
        expenses
            .iter()
            .filter(|e| in_period(e.expense_date))
            .map(|e| e.amount),
    )?;

    let summary = MonthlySummary {
        period_start: start,
        period_end: next.pred_opt().unwrap_or(start),
        total_orders: revenue_orders.len(),
        total_revenue,
        total_expenses,
        balance: total_revenue
            .checked_sub(total_expenses)
            .ok_or_else(|| BellaError::validation("Balance is out of range"))?,
    };
    tracing::debug!(
        year = start.year(),
        month = start.month(),
        orders = summary.total_orders,
        balance = %summary.balance,
        "Computed financial summary"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::expense::{self, model::{ExpenseCategory, ExpenseInput}};
    use crate::order::{self, model::{CreateOrderRequest, UpdateOrderRequest}};
    use crate::test_support::{customer, item, pool};
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn at(month: u32, day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, month, day, 10, 0, 0).unwrap()
    }

    fn delivered_order(
        pool: &DbPool,
        customer_id: uuid::Uuid,
        created: DateTime<Utc>,
        delivery: Option<DateTime<Utc>>,
        amount: Decimal,
    ) {
        let clock = FixedClock(created);
        let order = order::create_order(
            pool,
            &clock,
            CreateOrderRequest {
                customer_id,
                code: None,
                delivery_date: None,
                items: vec![item("Movel", 1, amount)],
            },
        )
        .unwrap();
        order::update_order(
            pool,
            &clock,
            order.id,
            UpdateOrderRequest {
                code: None,
                status: OrderStatus::Delivered,
                delivery_date: delivery,
                items: vec![item("Movel", 1, amount)],
            },
        )
        .unwrap();
    }

    fn expense(pool: &DbPool, date: DateTime<Utc>, amount: Decimal) {
        expense::create_expense(
            pool,
            &FixedClock(date),
            ExpenseInput {
                description: "Compra".to_string(),
                amount,
                category: ExpenseCategory::Materials,
                expense_date: date,
                notes: None,
            },
        )
        .unwrap();
    }

    #[test]
    fn test_summary_counts_delivered_orders_in_month() {
        let pool = pool();
        let ana = customer(&pool, "Ana");

        // Delivered in March, created in February.
        delivered_order(&pool, ana.id, at(2, 20), Some(at(3, 5)), dec!(1000));
        // No delivery date: falls back to creation time.
        delivered_order(&pool, ana.id, at(3, 31), None, dec!(500));
        // Delivered in April.
        delivered_order(&pool, ana.id, at(3, 10), Some(at(4, 1)), dec!(9999));
        // March order that is still pending.
        order::create_order(
            &pool,
            &FixedClock(at(3, 15)),
            CreateOrderRequest {
                customer_id: ana.id,
                code: None,
                delivery_date: None,
                items: vec![item("Mesa", 1, dec!(700))],
            },
        )
        .unwrap();

        expense(&pool, at(3, 1), dec!(200));
        expense(&pool, at(3, 31), dec!(50.50));
        expense(&pool, at(4, 1), dec!(400));

        let summary = monthly_summary(&pool, 2026, 3).unwrap();
        assert_eq!(summary.period_start, NaiveDate::from_ymd_opt(2026, 3, 1).unwrap());
        assert_eq!(summary.period_end, NaiveDate::from_ymd_opt(2026, 3, 31).unwrap());
        assert_eq!(summary.total_orders, 2);
        assert_eq!(summary.total_revenue, dec!(1500));
        assert_eq!(summary.total_expenses, dec!(250.50));
        assert_eq!(summary.balance, dec!(1249.50));
    }

    #[test]
    fn test_december_rolls_into_next_year() {
        let (start, next) = month_bounds(2025, 12).unwrap();
        assert_eq!(start, NaiveDate::from_ymd_opt(2025, 12, 1).unwrap());
        assert_eq!(next, NaiveDate::from_ymd_opt(2026, 1, 1).unwrap());
    }

    #[test]
    fn test_invalid_month_is_rejected() {
        let pool = pool();
        assert!(matches!(
            monthly_summary(&pool, 2026, 13),
            Err(BellaError::Validation(_))
        ));
        assert!(monthly_summary(&pool, 2026, 0).is_err());
    }
}
