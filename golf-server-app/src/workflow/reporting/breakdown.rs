use std::sync::Arc;

use chrono::{NaiveDate, TimeDelta};
use golf_core::{DayBucket, HourBucket, VenueCalendar, WeekBucket};

use crate::{domain::sales::SalesAggregator, ports::clock::Clock, workflow::reporting::ReportError};

pub const DAILY_TREND_DAYS: i64 = 7;

#[async_trait::async_trait]
pub trait SalesBreakdownUseCase {
    /// Defaults to today in venue time.
    async fn hourly(&self, date: Option<NaiveDate>) -> Result<Vec<HourBucket>, ReportError>;
    /// One bucket per local day for the last 7 days, today included.
    async fn last_seven_days(&self) -> Result<Vec<DayBucket>, ReportError>;
    async fn last_four_weeks(&self) -> Result<Vec<WeekBucket>, ReportError>;
    async fn custom(&self, first: NaiveDate, last: NaiveDate)
    -> Result<Vec<DayBucket>, ReportError>;
}

pub struct SalesBreakdownUseCaseImpl<S: SalesAggregator, C: Clock> {
    sales_aggregator: Arc<S>,
    clock: Arc<C>,
    calendar: VenueCalendar,
}

impl<S: SalesAggregator, C: Clock> SalesBreakdownUseCaseImpl<S, C> {
    pub fn new(sales_aggregator: Arc<S>, clock: Arc<C>, calendar: VenueCalendar) -> Self {
        Self {
            sales_aggregator,
            clock,
            calendar,
        }
    }

    fn today(&self) -> NaiveDate {
        self.calendar.local_date(self.clock.now())
    }
}

#[async_trait::async_trait]
impl<S: SalesAggregator + Send + Sync + 'static, C: Clock + Send + Sync + 'static>
    SalesBreakdownUseCase for SalesBreakdownUseCaseImpl<S, C>
{
    async fn hourly(&self, date: Option<NaiveDate>) -> Result<Vec<HourBucket>, ReportError> {
        let date = date.unwrap_or_else(|| self.today());
        Ok(self.sales_aggregator.hourly_breakdown(date).await?)
    }

    async fn last_seven_days(&self) -> Result<Vec<DayBucket>, ReportError> {
        let last = self.today();
        let first = last
            .checked_sub_signed(TimeDelta::days(DAILY_TREND_DAYS - 1))
            .ok_or(ReportError::InvalidRange)?;
        Ok(self.sales_aggregator.daily_breakdown(first, last).await?)
    }

    async fn last_four_weeks(&self) -> Result<Vec<WeekBucket>, ReportError> {
        Ok(self.sales_aggregator.weekly_bucketed_last_28_days().await?)
    }

    async fn custom(
        &self,
        first: NaiveDate,
        last: NaiveDate,
    ) -> Result<Vec<DayBucket>, ReportError> {
        Ok(self.sales_aggregator.daily_breakdown(first, last).await?)
    }
}
