use std::sync::Arc;

use chrono::{DateTime, Utc};
use golf_core::VenueCalendar;
use rust_decimal::Decimal;

use crate::{
    domain::{
        GameId,
        game::{Game, GameQuery, GameRepository},
    },
    ports::clock::Clock,
    workflow::reporting::ReportError,
};

pub const RECENT_GAMES_LIMIT: usize = 10;
pub const UNKNOWN_PLAYER: &str = "Unknown";

#[derive(Debug, Clone, PartialEq)]
pub struct GameSummary {
    pub id: GameId,
    pub lead_player: String,
    pub player_count: u32,
    pub total_cost: Decimal,
    pub is_weekend: bool,
    pub completed_at: DateTime<Utc>,
}

impl From<&Game> for GameSummary {
    fn from(game: &Game) -> Self {
        Self {
            id: game.id,
            lead_player: game.lead_player().unwrap_or(UNKNOWN_PLAYER).to_string(),
            player_count: game.player_count,
            total_cost: game.total_cost,
            is_weekend: game.is_weekend,
            completed_at: game.completed_at,
        }
    }
}

#[async_trait::async_trait]
pub trait RecentGamesUseCase {
    async fn recent_games(&self) -> Result<Vec<GameSummary>, ReportError>;
}

pub struct RecentGamesUseCaseImpl<G: GameRepository, C: Clock> {
    game_repository: Arc<G>,
    clock: Arc<C>,
    calendar: VenueCalendar,
}

impl<G: GameRepository, C: Clock> RecentGamesUseCaseImpl<G, C> {
    pub fn new(game_repository: Arc<G>, clock: Arc<C>, calendar: VenueCalendar) -> Self {
        Self {
            game_repository,
            clock,
            calendar,
        }
    }
}

#[async_trait::async_trait]
impl<G: GameRepository + Send + Sync + 'static, C: Clock + Send + Sync + 'static>
    RecentGamesUseCase for RecentGamesUseCaseImpl<G, C>
{
    async fn recent_games(&self) -> Result<Vec<GameSummary>, ReportError> {
        let today = self.calendar.local_date(self.clock.now());
        let (start, end) = self
            .calendar
            .day_bounds(today)
            .ok_or(ReportError::InvalidRange)?;
        let games = self
            .game_repository
            .query_games(GameQuery::in_range(start, end).with_limit(RECENT_GAMES_LIMIT))
            .await
            .map_err(|e| {
                log::error!("Failed to load recent games: {}", e);
                ReportError::Storage
            })?;
        Ok(games.iter().map(GameSummary::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeDelta;

    use super::*;
    use crate::{
        domain::PlayerId,
        ports::clock::FixedClock,
        test_support::{InMemoryStore, at},
    };

    fn game(completed_at: DateTime<Utc>, names: Vec<String>, is_demo_game: bool) -> Game {
        Game {
            id: GameId::new(),
            player_id: PlayerId::new(),
            player_count: names.len().max(1) as u32,
            player_names: names,
            total_cost: Decimal::new(6000, 2),
            is_weekend: false,
            is_demo_game,
            completed_at,
        }
    }

    #[tokio::test]
    async fn test_recent_games_today_newest_first() {
        let store = Arc::new(InMemoryStore::new());
        let opening = at("2025-03-14T08:00:00Z");
        for i in 0..12 {
            store
                .insert_game(&game(
                    opening + TimeDelta::minutes(i),
                    vec![format!("Player {}", i)],
                    false,
                ))
                .await
                .unwrap();
        }
        store
            .insert_game(&game(at("2025-03-14T09:00:00Z"), vec!["Demo".into()], true))
            .await
            .unwrap();
        store
            .insert_game(&game(at("2025-03-13T09:00:00Z"), vec!["Old".into()], false))
            .await
            .unwrap();

        let use_case = RecentGamesUseCaseImpl::new(
            store,
            Arc::new(FixedClock::new(at("2025-03-14T12:00:00Z"))),
            VenueCalendar::utc(),
        );
        let recent = use_case.recent_games().await.unwrap();
        assert_eq!(recent.len(), RECENT_GAMES_LIMIT);
        assert_eq!(recent[0].lead_player, "Player 11");
        assert_eq!(recent[9].lead_player, "Player 2");
    }

    #[test]
    fn test_summary_without_roster() {
        let summary = GameSummary::from(&game(at("2025-03-14T08:00:00Z"), vec![], false));
        assert_eq!(summary.lead_player, UNKNOWN_PLAYER);
    }
}
