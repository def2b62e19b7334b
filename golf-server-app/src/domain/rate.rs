use std::sync::Arc;

use chrono::{DateTime, Utc};
use golf_core::{PriceError, PriceSchedule, validate_price};
use rust_decimal::Decimal;
use thiserror::Error;

use crate::{
    domain::{AdminId, ErrorKind, RateId, RepoError},
    ports::clock::Clock,
};

pub const DEFAULT_WEEKDAY_PRICE_CENTS: i64 = 6000;
pub const DEFAULT_WEEKEND_PRICE_CENTS: i64 = 8000;

/// A price rule, effective from `updated_at` until a newer row exists.
#[derive(Clone, Debug, PartialEq)]
pub struct Rate {
    pub id: RateId,
    pub prices: PriceSchedule,
    pub updated_at: DateTime<Utc>,
    pub updated_by: AdminId,
}

#[async_trait::async_trait]
pub trait RateRepository {
    async fn insert_rate(&self, rate: &Rate) -> Result<(), RepoError>;
    /// Newest row by `updated_at`, ties broken by insertion order.
    async fn latest_rate(&self) -> Result<Option<Rate>, RepoError>;
    /// All rows, newest first.
    async fn rate_history(&self) -> Result<Vec<Rate>, RepoError>;
}

#[derive(Debug, Error)]
pub enum GetRateError {
    #[error("pricing has not been configured")]
    NoRateConfigured,
    #[error("storage error")]
    Storage,
}

impl GetRateError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GetRateError::NoRateConfigured => ErrorKind::Configuration,
            GetRateError::Storage => ErrorKind::Store,
        }
    }
}

#[derive(Debug, Error)]
pub enum SetRateError {
    #[error("invalid weekday price: {0}")]
    InvalidWeekdayPrice(PriceError),
    #[error("invalid weekend price: {0}")]
    InvalidWeekendPrice(PriceError),
    #[error("storage error")]
    Storage,
}

impl SetRateError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SetRateError::InvalidWeekdayPrice(_) | SetRateError::InvalidWeekendPrice(_) => {
                ErrorKind::Validation
            }
            SetRateError::Storage => ErrorKind::Store,
        }
    }
}

#[async_trait::async_trait]
pub trait RateTable {
    async fn get_current_rate(&self) -> Result<Rate, GetRateError>;
    async fn set_rate(
        &self,
        weekday_price: Decimal,
        weekend_price: Decimal,
        set_by: AdminId,
    ) -> Result<Rate, SetRateError>;
    async fn get_rate_history(&self) -> Result<Vec<Rate>, GetRateError>;
}

pub struct RateTableImpl<R: RateRepository, C: Clock> {
    rate_repository: Arc<R>,
    clock: Arc<C>,
}

impl<R: RateRepository, C: Clock> RateTableImpl<R, C> {
    pub fn new(rate_repository: Arc<R>, clock: Arc<C>) -> Self {
        Self {
            rate_repository,
            clock,
        }
    }
}

#[async_trait::async_trait]
impl<R: RateRepository + Send + Sync + 'static, C: Clock + Send + Sync + 'static> RateTable
    for RateTableImpl<R, C>
{
    async fn get_current_rate(&self) -> Result<Rate, GetRateError> {
        match self.rate_repository.latest_rate().await {
            Ok(Some(rate)) => Ok(rate),
            Ok(None) => Err(GetRateError::NoRateConfigured),
            Err(RepoError::StorageError(e)) => {
                log::error!("Failed to load current rate: {}", e);
                Err(GetRateError::Storage)
            }
        }
    }

    async fn set_rate(
        &self,
        weekday_price: Decimal,
        weekend_price: Decimal,
        set_by: AdminId,
    ) -> Result<Rate, SetRateError> {
        let weekday_price =
            validate_price(weekday_price).map_err(SetRateError::InvalidWeekdayPrice)?;
        let weekend_price =
            validate_price(weekend_price).map_err(SetRateError::InvalidWeekendPrice)?;

        let rate = Rate {
            id: RateId::new(),
            prices: PriceSchedule::new(weekday_price, weekend_price),
            updated_at: self.clock.now(),
            updated_by: set_by,
        };
        if let Err(RepoError::StorageError(e)) = self.rate_repository.insert_rate(&rate).await {
            log::error!("Failed to store rate: {}", e);
            return Err(SetRateError::Storage);
        }
        log::info!(
            "Rate set by {}: weekday {} / weekend {}",
            set_by,
            weekday_price,
            weekend_price
        );
        Ok(rate)
    }

    async fn get_rate_history(&self) -> Result<Vec<Rate>, GetRateError> {
        self.rate_repository.rate_history().await.map_err(|e| {
            log::error!("Failed to load rate history: {}", e);
            GetRateError::Storage
        })
    }
}
