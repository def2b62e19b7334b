use std::sync::Arc;

use golf_core::{VenueCalendar, percent_change};
use rust_decimal::Decimal;

use crate::{domain::sales::SalesAggregator, ports::clock::Clock, workflow::reporting::ReportError};

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardStats {
    pub today_games: u64,
    pub today_revenue: Decimal,
    pub total_players: u64,
    pub yesterday_games: u64,
    pub yesterday_revenue: Decimal,
    pub games_growth: Decimal,
    pub revenue_growth: Decimal,
}

#[async_trait::async_trait]
pub trait DashboardUseCase {
    async fn get_stats(&self) -> Result<DashboardStats, ReportError>;
}

pub struct DashboardUseCaseImpl<S: SalesAggregator, C: Clock> {
    sales_aggregator: Arc<S>,
    clock: Arc<C>,
    calendar: VenueCalendar,
}

impl<S: SalesAggregator, C: Clock> DashboardUseCaseImpl<S, C> {
    pub fn new(sales_aggregator: Arc<S>, clock: Arc<C>, calendar: VenueCalendar) -> Self {
        Self {
            sales_aggregator,
            clock,
            calendar,
        }
    }
}

#[async_trait::async_trait]
impl<S: SalesAggregator + Send + Sync + 'static, C: Clock + Send + Sync + 'static> DashboardUseCase
    for DashboardUseCaseImpl<S, C>
{
    async fn get_stats(&self) -> Result<DashboardStats, ReportError> {
        let today = self.calendar.local_date(self.clock.now());
        let yesterday = today.pred_opt().ok_or(ReportError::InvalidRange)?;

        let (start, end) = self
            .calendar
            .day_bounds(today)
            .ok_or(ReportError::InvalidRange)?;
        let today_totals = self.sales_aggregator.aggregate(start, end).await?;
        let (start, end) = self
            .calendar
            .day_bounds(yesterday)
            .ok_or(ReportError::InvalidRange)?;
        let yesterday_totals = self.sales_aggregator.aggregate(start, end).await?;

        Ok(DashboardStats {
            games_growth: percent_change(
                Decimal::from(today_totals.total_games),
                Decimal::from(yesterday_totals.total_games),
            ),
            revenue_growth: percent_change(
                today_totals.total_revenue,
                yesterday_totals.total_revenue,
            ),
            today_games: today_totals.total_games,
            today_revenue: today_totals.total_revenue,
            total_players: today_totals.total_players,
            yesterday_games: yesterday_totals.total_games,
            yesterday_revenue: yesterday_totals.total_revenue,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{
            GameId, PlayerId,
            game::{Game, GameRepository},
            sales::SalesAggregatorImpl,
        },
        ports::clock::FixedClock,
        test_support::{InMemoryStore, at},
    };

    async fn insert(store: &InMemoryStore, completed_at: &str, cents: i64, is_demo_game: bool) {
        store
            .insert_game(&Game {
                id: GameId::new(),
                player_id: PlayerId::new(),
                player_names: vec!["A".to_string(), "B".to_string()],
                player_count: 2,
                total_cost: Decimal::new(cents, 2),
                is_weekend: false,
                is_demo_game,
                completed_at: at(completed_at),
            })
            .await
            .unwrap();
    }

    fn use_case(
        store: Arc<InMemoryStore>,
    ) -> DashboardUseCaseImpl<SalesAggregatorImpl<InMemoryStore, FixedClock>, FixedClock> {
        // 2025-03-14 16:00 at the venue
        let clock = Arc::new(FixedClock::new(at("2025-03-14T10:30:00Z")));
        let calendar = VenueCalendar::default();
        let sales = Arc::new(SalesAggregatorImpl::new(store, clock.clone(), calendar));
        DashboardUseCaseImpl::new(sales, clock, calendar)
    }

    #[tokio::test]
    async fn test_dashboard_compares_with_yesterday() {
        let store = Arc::new(InMemoryStore::new());
        insert(&store, "2025-03-14T04:00:00Z", 12000, false).await;
        insert(&store, "2025-03-14T05:00:00Z", 10000, false).await;
        insert(&store, "2025-03-14T06:00:00Z", 50000, true).await;
        // 2025-03-13 23:59 at the venue
        insert(&store, "2025-03-13T18:29:00Z", 20000, false).await;

        let stats = use_case(store).get_stats().await.unwrap();
        assert_eq!(stats.today_games, 2);
        assert_eq!(stats.today_revenue.to_string(), "220.00");
        assert_eq!(stats.total_players, 4);
        assert_eq!(stats.yesterday_games, 1);
        assert_eq!(stats.games_growth.to_string(), "100.0");
        assert_eq!(stats.revenue_growth.to_string(), "10.0");
    }

    #[tokio::test]
    async fn test_dashboard_without_history() {
        let store = Arc::new(InMemoryStore::new());
        insert(&store, "2025-03-14T04:00:00Z", 12000, false).await;
        let stats = use_case(store).get_stats().await.unwrap();
        assert_eq!(stats.yesterday_games, 0);
        assert_eq!(stats.games_growth.to_string(), "0.0");
        assert_eq!(stats.revenue_growth.to_string(), "0.0");
    }
}
