use std::{fmt, sync::Arc};

use chrono::NaiveDate;
use golf_core::VenueCalendar;

use crate::{
    domain::game::GameLedger,
    ports::clock::Clock,
    workflow::reporting::{ReportError, recent_games::GameSummary},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayType {
    Weekday,
    Weekend,
}

impl fmt::Display for DayType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DayType::Weekday => write!(f, "Weekday"),
            DayType::Weekend => write!(f, "Weekend"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub game: GameSummary,
    pub day_type: DayType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionRange {
    /// A single local day, today when absent.
    Day(Option<NaiveDate>),
    Days { first: NaiveDate, last: NaiveDate },
}

#[async_trait::async_trait]
pub trait TransactionsUseCase {
    async fn list_transactions(
        &self,
        range: TransactionRange,
    ) -> Result<Vec<Transaction>, ReportError>;
}

pub struct TransactionsUseCaseImpl<L: GameLedger, C: Clock> {
    game_ledger: Arc<L>,
    clock: Arc<C>,
    calendar: VenueCalendar,
}

impl<L: GameLedger, C: Clock> TransactionsUseCaseImpl<L, C> {
    pub fn new(game_ledger: Arc<L>, clock: Arc<C>, calendar: VenueCalendar) -> Self {
        Self {
            game_ledger,
            clock,
            calendar,
        }
    }
}

#[async_trait::async_trait]
impl<L: GameLedger + Send + Sync + 'static, C: Clock + Send + Sync + 'static> TransactionsUseCase
    for TransactionsUseCaseImpl<L, C>
{
    async fn list_transactions(
        &self,
        range: TransactionRange,
    ) -> Result<Vec<Transaction>, ReportError> {
        let (first, last) = match range {
            TransactionRange::Day(date) => {
                let date = date.unwrap_or_else(|| self.calendar.local_date(self.clock.now()));
                (date, date)
            }
            TransactionRange::Days { first, last } => (first, last),
        };
        if last < first {
            return Err(ReportError::InvalidRange);
        }
        let (start, end) = self
            .calendar
            .range_bounds(first, last)
            .ok_or(ReportError::InvalidRange)?;
        let games = self
            .game_ledger
            .get_games_in_range(start, end, false)
            .await?;
        Ok(games
            .iter()
            .map(|game| Transaction {
                game: GameSummary::from(game),
                day_type: if game.is_weekend {
                    DayType::Weekend
                } else {
                    DayType::Weekday
                },
            })
            .collect())
    }
}
