//! Monetary helpers.

use crate::error::{BellaError, BellaResult};
use rust_decimal::{Decimal, RoundingStrategy};

/// Upper bound for catalog prices.
pub const MAX_PRICE: Decimal = Decimal::from_parts(999_999_999, 0, 0, false, 0);

/// Round to cents, half away from zero.
pub fn round(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Largest quantity accepted on any line.
pub const MAX_QUANTITY: i64 = i32::MAX as i64;

/// `quantity × unit_price`, rounded to cents.
pub fn line_total(quantity: i64, unit_price: Decimal) -> BellaResult<Decimal> {
    Decimal::from(quantity)
        .checked_mul(unit_price)
        .map(round)
        .ok_or_else(|| BellaError::validation("Line total is too large"))
}

/// Sum of `amounts`, failing instead of overflowing.
pub fn total<I>(amounts: I) -> BellaResult<Decimal>
where
    I: IntoIterator<Item = Decimal>,
{
    amounts
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, amount| acc.checked_add(amount))
        .ok_or_else(|| BellaError::validation("Total is too large"))
}

/// Reject negative amounts, naming `field` in the message.
pub fn ensure_non_negative(field: &str, value: Decimal) -> BellaResult<Decimal> {
    if value < Decimal::ZERO {
        return Err(BellaError::validation(format!("{} must not be negative", field)));
    }
    Ok(round(value))
}

/// Catalog prices lie in `0..=MAX_PRICE`.
pub fn ensure_catalog_price(value: Decimal) -> BellaResult<Decimal> {
    let value = ensure_non_negative("defaultSalePrice", value)?;
    if value > MAX_PRICE {
        return Err(BellaError::validation(format!(
            "defaultSalePrice must not exceed {}",
            MAX_PRICE
        )));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use rust_decimal_macros::dec;

    #[test]
    fn test_line_total() {
        assert_eq!(line_total(2, dec!(1000)).unwrap(), dec!(2000));
        assert_eq!(line_total(3, dec!(0.335)).unwrap(), dec!(1.01));
        assert_eq!(
            line_total(MAX_QUANTITY, dec!(999999999)).unwrap(),
            dec!(2147483644852516353)
        );
    }

    #[test]
    fn test_overflow_is_an_error() {
        let err = line_total(i64::MAX, dec!(10000000000)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValidationFailure);
        assert!(line_total(2, Decimal::MAX).is_err());
        assert!(total([Decimal::MAX, dec!(1)]).is_err());
        assert_eq!(total([dec!(1.50), dec!(2.25)]).unwrap(), dec!(3.75));
        assert_eq!(total(Vec::new()).unwrap(), Decimal::ZERO);
    }

    #[test]
    fn test_price_bounds() {
        assert_eq!(ensure_catalog_price(dec!(0)).unwrap(), dec!(0));
        assert!(ensure_catalog_price(MAX_PRICE).is_ok());
        assert!(ensure_catalog_price(dec!(1000000000)).is_err());
        assert!(ensure_non_negative("amount", dec!(-0.01)).is_err());
        assert_eq!(ensure_non_negative("amount", dec!(12.345)).unwrap(), dec!(12.35));
    }
}
