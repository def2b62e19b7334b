use std::{str::FromStr, sync::Arc};

use chrono::{DateTime, Months, NaiveDate, TimeDelta, Utc};
use golf_core::{SalesTotals, VenueCalendar};
use rust_decimal::Decimal;

use crate::{domain::sales::SalesAggregator, ports::clock::Clock, workflow::reporting::ReportError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SalesPeriod {
    /// Today in venue time.
    Day,
    /// The last 7 days up to now.
    Week,
    /// Same instant one calendar month ago up to now.
    Month,
    /// Inclusive local days.
    Custom { first: NaiveDate, last: NaiveDate },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeriodKind {
    Day,
    Week,
    Month,
    Custom,
}

impl FromStr for PeriodKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "day" => Ok(PeriodKind::Day),
            "week" => Ok(PeriodKind::Week),
            "month" => Ok(PeriodKind::Month),
            "custom" => Ok(PeriodKind::Custom),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PeriodSales {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub totals: SalesTotals,
    pub average_per_game: Decimal,
}

#[async_trait::async_trait]
pub trait SalesPeriodUseCase {
    async fn sales_for_period(&self, period: SalesPeriod) -> Result<PeriodSales, ReportError>;
}

pub struct SalesPeriodUseCaseImpl<S: SalesAggregator, C: Clock> {
    sales_aggregator: Arc<S>,
    clock: Arc<C>,
    calendar: VenueCalendar,
}

impl<S: SalesAggregator, C: Clock> SalesPeriodUseCaseImpl<S, C> {
    pub fn new(sales_aggregator: Arc<S>, clock: Arc<C>, calendar: VenueCalendar) -> Self {
        Self {
            sales_aggregator,
            clock,
            calendar,
        }
    }

    fn bounds(&self, period: SalesPeriod) -> Result<(DateTime<Utc>, DateTime<Utc>), ReportError> {
        let now = self.clock.now();
        match period {
            SalesPeriod::Day => self
                .calendar
                .day_bounds(self.calendar.local_date(now))
                .ok_or(ReportError::InvalidRange),
            SalesPeriod::Week => Ok((now - TimeDelta::days(7), now)),
            SalesPeriod::Month => {
                let start = self
                    .calendar
                    .local(now)
                    .checked_sub_months(Months::new(1))
                    .ok_or(ReportError::InvalidRange)?;
                Ok((start.with_timezone(&Utc), now))
            }
            SalesPeriod::Custom { first, last } => {
                if last < first {
                    return Err(ReportError::InvalidRange);
                }
                self.calendar
                    .range_bounds(first, last)
                    .ok_or(ReportError::InvalidRange)
            }
        }
    }
}

#[async_trait::async_trait]
impl<S: SalesAggregator + Send + Sync + 'static, C: Clock + Send + Sync + 'static>
    SalesPeriodUseCase for SalesPeriodUseCaseImpl<S, C>
{
    async fn sales_for_period(&self, period: SalesPeriod) -> Result<PeriodSales, ReportError> {
        let (start, end) = self.bounds(period)?;
        let totals = self.sales_aggregator.aggregate(start, end).await?;
        Ok(PeriodSales {
            start,
            end,
            average_per_game: totals.average_per_game(),
            totals,
        })
    }
}
