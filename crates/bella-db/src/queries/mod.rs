//! Database query implementations.

pub mod customers;
pub mod expenses;
pub mod orders;
pub mod production;
pub mod products;
pub mod service_orders;

use rusqlite::types::Type;
use rusqlite::Row;
use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

/// Render a monetary value the way it is stored: two fractional digits.
pub(crate) fn money_to_sql(value: Decimal) -> String {
    format!(
        "{:.2}",
        value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    )
}

/// Read a monetary column written by [`money_to_sql`].
pub(crate) fn money_at(row: &Row<'_>, idx: usize) -> rusqlite::Result<Decimal> {
    let raw: String = row.get(idx)?;
    Decimal::from_str(&raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// `?1, ?2, ... ?n` for `IN (...)` clauses.
pub(crate) fn placeholders(count: usize) -> String {
    (1..=count)
        .map(|i| format!("?{}", i))
        .collect::<Vec<_>>()
        .join(", ")
}


#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_money_is_rendered_with_two_digits() {
        assert_eq!(money_to_sql(dec!(2500)), "2500.00");
        assert_eq!(money_to_sql(dec!(12.5)), "12.50");
        assert_eq!(money_to_sql(dec!(0.005)), "0.01");
    }

    #[test]
    fn test_placeholders() {
        assert_eq!(placeholders(1), "?1");
        assert_eq!(placeholders(3), "?1, ?2, ?3");
    }
}
