use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use thiserror::Error;

pub const CURRENCY_SCALE: u32 = 2;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PriceError {
    #[error("price must not be negative")]
    Negative,
    #[error("price must have at most {CURRENCY_SCALE} fractional digits")]
    TooPrecise,
    #[error("price is out of range")]
    OutOfRange,
}

/// Rounds half away from zero to whole cents and pins the scale to two
/// digits, so `120` renders as `120.00`.
pub fn round_currency(amount: Decimal) -> Decimal {
    let mut rounded =
        amount.round_dp_with_strategy(CURRENCY_SCALE, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(CURRENCY_SCALE);
    rounded
}

pub fn to_cents(amount: Decimal) -> Option<i64> {
    round_currency(amount)
        .checked_mul(Decimal::ONE_HUNDRED)?
        .to_i64()
}

pub fn from_cents(cents: i64) -> Decimal {
    Decimal::new(cents, CURRENCY_SCALE)
}

pub fn validate_price(price: Decimal) -> Result<Decimal, PriceError> {
    if price.is_sign_negative() && !price.is_zero() {
        return Err(PriceError::Negative);
    }
    if price.normalize().scale() > CURRENCY_SCALE {
        return Err(PriceError::TooPrecise);
    }
    if to_cents(price).is_none() {
        return Err(PriceError::OutOfRange);
    }
    Ok(round_currency(price))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_currency() {
        assert_eq!(round_currency(Decimal::new(120, 0)).to_string(), "120.00");
        assert_eq!(round_currency(Decimal::new(12345, 3)).to_string(), "12.35");
        assert_eq!(round_currency(Decimal::new(-12345, 3)).to_string(), "-12.35");
        assert_eq!(round_currency(Decimal::new(12344, 3)).to_string(), "12.34");
    }

    #[test]
    fn test_cents_conversion() {
        assert_eq!(to_cents(Decimal::new(6000, 2)), Some(6000));
        assert_eq!(to_cents(Decimal::new(75, 1)), Some(750));
        assert_eq!(from_cents(12000).to_string(), "120.00");
        assert_eq!(from_cents(0).to_string(), "0.00");
        assert_eq!(to_cents(Decimal::MAX), None);
    }

    #[test]
    fn test_validate_price() {
        assert_eq!(
            validate_price(Decimal::new(60, 0)).map(|p| p.to_string()),
            Ok("60.00".to_string())
        );
        assert_eq!(
            validate_price(Decimal::new(79990, 3)).map(|p| p.to_string()),
            Ok("79.99".to_string())
        );
        assert!(validate_price(Decimal::ZERO).is_ok());
        assert_eq!(validate_price(Decimal::new(-1, 2)), Err(PriceError::Negative));
        assert_eq!(
            validate_price(Decimal::new(60001, 3)),
            Err(PriceError::TooPrecise)
        );
        assert_eq!(
            validate_price(Decimal::MAX),
            Err(PriceError::OutOfRange)
        );
        assert_eq!(
            validate_price(Decimal::from(i64::MAX)),
            Err(PriceError::OutOfRange)
        );
    }
}
