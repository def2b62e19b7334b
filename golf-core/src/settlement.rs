use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::money::round_currency;

pub const DEFAULT_MAX_PLAYERS: u32 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceSchedule {
    pub weekday_price: Decimal,
    pub weekend_price: Decimal,
}

impl PriceSchedule {
    pub fn new(weekday_price: Decimal, weekend_price: Decimal) -> Self {
        Self {
            weekday_price,
            weekend_price,
        }
    }

    pub fn price_per_player(&self, is_weekend: bool) -> Decimal {
        if is_weekend {
            self.weekend_price
        } else {
            self.weekday_price
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettlementError {
    #[error("player count must be positive, got {0}")]
    InvalidPlayerCount(i64),
    #[error("player count {count} exceeds the venue limit of {max}")]
    TooManyPlayers { count: i64, max: u32 },
}

/// Total for one round. Day type is decided by the caller.
pub fn compute_cost(
    player_count: i64,
    is_weekend: bool,
    prices: &PriceSchedule,
) -> Result<Decimal, SettlementError> {
    if player_count <= 0 {
        return Err(SettlementError::InvalidPlayerCount(player_count));
    }
    let price = prices.price_per_player(is_weekend);
    Ok(round_currency(price * Decimal::from(player_count)))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettlementPolicy {
    pub max_players: u32,
}

impl Default for SettlementPolicy {
    fn default() -> Self {
        Self {
            max_players: DEFAULT_MAX_PLAYERS,
        }
    }
}

impl SettlementPolicy {
    pub fn new(max_players: u32) -> Self {
        Self { max_players }
    }

    pub fn check_player_count(&self, player_count: i64) -> Result<(), SettlementError> {
        if player_count <= 0 {
            return Err(SettlementError::InvalidPlayerCount(player_count));
        }
        if player_count > self.max_players as i64 {
            return Err(SettlementError::TooManyPlayers {
                count: player_count,
                max: self.max_players,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prices() -> PriceSchedule {
        PriceSchedule::new(Decimal::new(6000, 2), Decimal::new(8000, 2))
    }

    #[test]
    fn test_compute_cost_weekday_and_weekend() {
        let cost = compute_cost(2, false, &prices()).unwrap();
        assert_eq!(cost.to_string(), "120.00");
        let cost = compute_cost(3, true, &prices()).unwrap();
        assert_eq!(cost.to_string(), "240.00");
    }

    #[test]
    fn test_compute_cost_is_linear() {
        let odd = PriceSchedule::new(Decimal::new(3333, 2), Decimal::new(4999, 2));
        for is_weekend in [false, true] {
            let single = compute_cost(1, is_weekend, &odd).unwrap();
            for count in 1..=10 {
                let total = compute_cost(count, is_weekend, &odd).unwrap();
                assert_eq!(total, single * Decimal::from(count));
            }
        }
    }

    #[test]
    fn test_compute_cost_rejects_non_positive_count() {
        assert_eq!(
            compute_cost(0, false, &prices()),
            Err(SettlementError::InvalidPlayerCount(0))
        );
        assert_eq!(
            compute_cost(-3, true, &prices()),
            Err(SettlementError::InvalidPlayerCount(-3))
        );
    }

    #[test]
    fn test_free_rate_costs_nothing() {
        let free = PriceSchedule::new(Decimal::ZERO, Decimal::ZERO);
        assert_eq!(compute_cost(4, true, &free).unwrap().to_string(), "0.00");
    }

    #[test]
    fn test_policy_bounds() {
        let policy = SettlementPolicy::default();
        assert!(policy.check_player_count(1).is_ok());
        assert!(policy.check_player_count(8).is_ok());
        assert_eq!(
            policy.check_player_count(9),
            Err(SettlementError::TooManyPlayers { count: 9, max: 8 })
        );
        assert_eq!(
            policy.check_player_count(0),
            Err(SettlementError::InvalidPlayerCount(0))
        );
        assert!(SettlementPolicy::new(10).check_player_count(10).is_ok());
    }
}
