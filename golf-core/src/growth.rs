use rust_decimal::{Decimal, RoundingStrategy};

pub const GROWTH_SCALE: u32 = 1;

/// Relative change in percent, one decimal place. A zero baseline yields zero.
pub fn percent_change(current: Decimal, previous: Decimal) -> Decimal {
    if previous.is_zero() {
        let mut zero = Decimal::ZERO;
        zero.rescale(GROWTH_SCALE);
        return zero;
    }
    let change = (current - previous) / previous * Decimal::ONE_HUNDRED;
    let mut rounded =
        change.round_dp_with_strategy(GROWTH_SCALE, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(GROWTH_SCALE);
    rounded
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_change() {
        assert_eq!(
            percent_change(Decimal::from(110), Decimal::from(100)),
            Decimal::new(100, 1)
        );
        assert_eq!(
            percent_change(Decimal::from(90), Decimal::from(100)),
            Decimal::new(-100, 1)
        );
        assert_eq!(
            percent_change(Decimal::from(110), Decimal::from(100)).to_string(),
            "10.0"
        );
    }

    #[test]
    fn test_percent_change_zero_baseline() {
        for current in [0, 1, 250, -4] {
            let change = percent_change(Decimal::from(current), Decimal::ZERO);
            assert!(change.is_zero());
            assert_eq!(change.to_string(), "0.0");
        }
    }

    #[test]
    fn test_percent_change_rounds_to_one_place() {
        // 1/3 -> 33.333..%
        assert_eq!(
            percent_change(Decimal::from(4), Decimal::from(3)).to_string(),
            "33.3"
        );
        // 0.05% rounds away from zero in both directions
        assert_eq!(
            percent_change(Decimal::from(2001), Decimal::from(2000)).to_string(),
            "0.1"
        );
        assert_eq!(
            percent_change(Decimal::from(1999), Decimal::from(2000)).to_string(),
            "-0.1"
        );
    }
}
