use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use golf_core::{
    DayBucket, HourBucket, Sale, SalesTotals, VenueCalendar, WeekBucket,
    breakdown::{MAX_DAILY_BUCKETS, daily_buckets, hourly_buckets, weekly_buckets, weekly_window_start},
};
use thiserror::Error;

use crate::{
    domain::{
        ErrorKind,
        game::{GameQuery, GameRepository},
    },
    ports::clock::Clock,
};

#[derive(Debug, Error)]
pub enum SalesError {
    #[error("invalid date range")]
    InvalidRange,
    #[error("storage error")]
    Storage,
}

impl SalesError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SalesError::InvalidRange => ErrorKind::Validation,
            SalesError::Storage => ErrorKind::Store,
        }
    }
}

/// Revenue reporting over non-demo games only.
#[async_trait::async_trait]
pub trait SalesAggregator {
    async fn aggregate(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<SalesTotals, SalesError>;
    async fn hourly_breakdown(&self, date: NaiveDate) -> Result<Vec<HourBucket>, SalesError>;
    async fn daily_breakdown(
        &self,
        first: NaiveDate,
        last: NaiveDate,
    ) -> Result<Vec<DayBucket>, SalesError>;
    async fn weekly_bucketed_last_28_days(&self) -> Result<Vec<WeekBucket>, SalesError>;
}

pub struct SalesAggregatorImpl<G: GameRepository, C: Clock> {
    game_repository: Arc<G>,
    clock: Arc<C>,
    calendar: VenueCalendar,
}

impl<G: GameRepository, C: Clock> SalesAggregatorImpl<G, C> {
    pub fn new(game_repository: Arc<G>, clock: Arc<C>, calendar: VenueCalendar) -> Self {
        Self {
            game_repository,
            clock,
            calendar,
        }
    }

    async fn sales_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Sale>, SalesError> {
        if end < start {
            return Ok(Vec::new());
        }
        let games = self
            .game_repository
            .query_games(GameQuery::in_range(start, end))
            .await
            .map_err(|e| {
                log::error!("Failed to query games for sales: {}", e);
                SalesError::Storage
            })?;
        Ok(games.iter().map(|g| g.as_sale()).collect())
    }
}

#[async_trait::async_trait]
impl<G: GameRepository + Send + Sync + 'static, C: Clock + Send + Sync + 'static> SalesAggregator
    for SalesAggregatorImpl<G, C>
{
    async fn aggregate(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<SalesTotals, SalesError> {
        let sales = self.sales_between(start, end).await?;
        Ok(SalesTotals::from_sales(&sales))
    }

    async fn hourly_breakdown(&self, date: NaiveDate) -> Result<Vec<HourBucket>, SalesError> {
        let (start, end) = self
            .calendar
            .day_bounds(date)
            .ok_or(SalesError::InvalidRange)?;
        let sales = self.sales_between(start, end).await?;
        Ok(hourly_buckets(&sales, date, &self.calendar))
    }

    async fn daily_breakdown(
        &self,
        first: NaiveDate,
        last: NaiveDate,
    ) -> Result<Vec<DayBucket>, SalesError> {
        if last < first || (last - first).num_days() >= MAX_DAILY_BUCKETS {
            return Err(SalesError::InvalidRange);
        }
        let (start, end) = self
            .calendar
            .range_bounds(first, last)
            .ok_or(SalesError::InvalidRange)?;
        let sales = self.sales_between(start, end).await?;
        Ok(daily_buckets(&sales, first, last, &self.calendar))
    }

    async fn weekly_bucketed_last_28_days(&self) -> Result<Vec<WeekBucket>, SalesError> {
        let now = self.clock.now();
        let sales = self.sales_between(weekly_window_start(now), now).await?;
        Ok(weekly_buckets(&sales, now))
    }
}
