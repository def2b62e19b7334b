use std::{collections::HashMap, sync::Arc};

use chrono::{DateTime, Utc};
use golf_core::{Sale, SettlementError, SettlementPolicy, compute_cost};
use rust_decimal::Decimal;
use thiserror::Error;

use crate::{
    domain::{
        ErrorKind, GameId, PlayerId, RepoError, RepoRetrieveError, ScoreId,
        rate::{GetRateError, RateTable},
    },
    ports::clock::Clock,
};

pub const PLACEHOLDER_HOLE: u32 = 0;

/// One round, priced when it was created.
#[derive(Clone, Debug, PartialEq)]
pub struct Game {
    pub id: GameId,
    pub player_id: PlayerId,
    pub player_names: Vec<String>,
    pub player_count: u32,
    pub total_cost: Decimal,
    pub is_weekend: bool,
    pub is_demo_game: bool,
    pub completed_at: DateTime<Utc>,
}

impl Game {
    pub fn lead_player(&self) -> Option<&str> {
        self.player_names.first().map(String::as_str)
    }

    pub fn roster_name(&self, name: &str) -> Option<&str> {
        let key = roster_key(name);
        self.player_names
            .iter()
            .find(|n| roster_key(n) == key)
            .map(String::as_str)
    }

    pub fn as_sale(&self) -> Sale {
        Sale {
            completed_at: self.completed_at,
            total_cost: self.total_cost,
            player_count: self.player_count,
            is_demo: self.is_demo_game,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Score {
    pub id: ScoreId,
    pub game_id: GameId,
    pub player_name: String,
    pub hole: u32,
    pub strokes: i32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ScoreEntry {
    pub player_name: String,
    pub hole: Option<u32>,
    pub strokes: i32,
}

#[derive(Clone, Debug)]
pub struct NewGame {
    pub player_id: PlayerId,
    pub player_names: Vec<String>,
    pub player_count: i64,
    pub is_weekend: bool,
    pub is_demo_game: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Scorecard {
    pub game: Game,
    pub scores: Vec<Score>,
    pub totals: Vec<(String, i64)>,
}

#[derive(Debug, Clone, Default)]
pub struct GameQuery {
    pub range: Option<(DateTime<Utc>, DateTime<Utc>)>,
    pub include_demo: bool,
    pub limit: Option<usize>,
}

impl GameQuery {
    pub fn in_range(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            range: Some((start, end)),
            ..Default::default()
        }
    }

    pub fn with_demo(mut self, include_demo: bool) -> Self {
        self.include_demo = include_demo;
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

#[derive(Debug)]
pub enum RecordScoresError {
    NotFound,
    NegativeTotal { player: String, total: i64 },
    StorageError(String),
}

impl std::fmt::Display for RecordScoresError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordScoresError::NotFound => write!(f, "Resource not found"),
            RecordScoresError::NegativeTotal { player, total } => {
                write!(f, "Negative stroke total {} for {}", total, player)
            }
            RecordScoresError::StorageError(e) => write!(f, "Storage error: {}", e),
        }
    }
}

#[async_trait::async_trait]
pub trait GameRepository {
    async fn insert_game(&self, game: &Game) -> Result<(), RepoError>;
    async fn get_game(&self, game_id: GameId) -> Result<Game, RepoRetrieveError>;
    async fn get_scores(&self, game_id: GameId) -> Result<Vec<Score>, RepoError>;
    /// Appends the rows and moves the completion timestamp atomically.
    /// Nothing is written if any player's stored plus new strokes would
    /// total below zero.
    async fn record_scores(
        &self,
        game_id: GameId,
        scores: &[Score],
        completed_at: DateTime<Utc>,
    ) -> Result<(), RecordScoresError>;
    /// Games with `completed_at` inside the closed range, newest first.
    async fn query_games(&self, query: GameQuery) -> Result<Vec<Game>, RepoError>;
}

#[derive(Debug, Error)]
pub enum CreateGameError {
    #[error("player count must be positive, got {0}")]
    InvalidPlayerCount(i64),
    #[error("at most {max} players can play together, got {count}")]
    TooManyPlayers { count: i64, max: u32 },
    #[error("at least one player name is required")]
    EmptyRoster,
    #[error("player names must not be blank")]
    BlankPlayerName,
    #[error("player count {count} does not match {names} player names")]
    PlayerCountMismatch { count: i64, names: usize },
    #[error("duplicate player name: {0}")]
    DuplicatePlayerName(String),
    #[error("pricing has not been configured")]
    NoRateConfigured,
    #[error("storage error")]
    Storage,
}

impl CreateGameError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CreateGameError::InvalidPlayerCount(_)
            | CreateGameError::TooManyPlayers { .. }
            | CreateGameError::EmptyRoster
            | CreateGameError::BlankPlayerName => ErrorKind::Validation,
            CreateGameError::PlayerCountMismatch { .. }
            | CreateGameError::DuplicatePlayerName(_) => ErrorKind::Conflict,
            CreateGameError::NoRateConfigured => ErrorKind::Configuration,
            CreateGameError::Storage => ErrorKind::Store,
        }
    }
}

impl From<SettlementError> for CreateGameError {
    fn from(value: SettlementError) -> Self {
        match value {
            SettlementError::InvalidPlayerCount(count) => CreateGameError::InvalidPlayerCount(count),
            SettlementError::TooManyPlayers { count, max } => {
                CreateGameError::TooManyPlayers { count, max }
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum AppendScoresError {
    #[error("game not found")]
    GameNotFound,
    #[error("no scores given")]
    EmptyBatch,
    #[error("player {0} is not part of this game")]
    UnknownPlayer(String),
    #[error("total strokes for {player} must not be negative, got {total}")]
    InvalidScoreTotal { player: String, total: i64 },
    #[error("storage error")]
    Storage,
}

impl AppendScoresError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppendScoresError::GameNotFound => ErrorKind::NotFound,
            AppendScoresError::EmptyBatch
            | AppendScoresError::UnknownPlayer(_)
            | AppendScoresError::InvalidScoreTotal { .. } => ErrorKind::Validation,
            AppendScoresError::Storage => ErrorKind::Store,
        }
    }
}

#[derive(Debug, Error)]
pub enum GetGameError {
    #[error("game not found")]
    GameNotFound,
    #[error("storage error")]
    Storage,
}

impl GetGameError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GetGameError::GameNotFound => ErrorKind::NotFound,
            GetGameError::Storage => ErrorKind::Store,
        }
    }
}

#[derive(Debug, Error)]
#[error("storage error")]
pub struct QueryGamesError;

#[async_trait::async_trait]
pub trait GameLedger {
    async fn create_game(&self, new_game: NewGame) -> Result<Game, CreateGameError>;
    async fn append_scores(
        &self,
        game_id: GameId,
        scores: Vec<ScoreEntry>,
    ) -> Result<Vec<Score>, AppendScoresError>;
    async fn get_game(&self, game_id: GameId) -> Result<Game, GetGameError>;
    async fn get_scorecard(&self, game_id: GameId) -> Result<Scorecard, GetGameError>;
    async fn get_games_in_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        include_demo: bool,
    ) -> Result<Vec<Game>, QueryGamesError>;
}

pub struct GameLedgerImpl<G: GameRepository, T: RateTable, C: Clock> {
    game_repository: Arc<G>,
    rate_table: Arc<T>,
    clock: Arc<C>,
    policy: SettlementPolicy,
}

impl<G: GameRepository, T: RateTable, C: Clock> GameLedgerImpl<G, T, C> {
    pub fn new(
        game_repository: Arc<G>,
        rate_table: Arc<T>,
        clock: Arc<C>,
        policy: SettlementPolicy,
    ) -> Self {
        Self {
            game_repository,
            rate_table,
            clock,
            policy,
        }
    }

    fn validate_roster(&self, new_game: &NewGame) -> Result<Vec<String>, CreateGameError> {
        self.policy.check_player_count(new_game.player_count)?;
        if new_game.player_names.is_empty() {
            return Err(CreateGameError::EmptyRoster);
        }
        if new_game.player_names.len() as i64 != new_game.player_count {
            return Err(CreateGameError::PlayerCountMismatch {
                count: new_game.player_count,
                names: new_game.player_names.len(),
            });
        }
        let mut seen = HashMap::new();
        let mut roster = Vec::with_capacity(new_game.player_names.len());
        for name in &new_game.player_names {
            let trimmed = name.trim();
            if trimmed.is_empty() {
                return Err(CreateGameError::BlankPlayerName);
            }
            if seen.insert(roster_key(trimmed), ()).is_some() {
                return Err(CreateGameError::DuplicatePlayerName(trimmed.to_string()));
            }
            roster.push(trimmed.to_string());
        }
        Ok(roster)
    }
}

fn roster_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Sums strokes per roster name in first-seen order.
pub fn score_totals(scores: &[Score]) -> Vec<(String, i64)> {
    let mut totals: Vec<(String, i64)> = Vec::new();
    for score in scores {
        match totals.iter_mut().find(|(name, _)| *name == score.player_name) {
            Some((_, total)) => *total += score.strokes as i64,
            None => totals.push((score.player_name.clone(), score.strokes as i64)),
        }
    }
    totals
}

#[async_trait::async_trait]
impl<G, T, C> GameLedger for GameLedgerImpl<G, T, C>
where
    G: GameRepository + Send + Sync + 'static,
    T: RateTable + Send + Sync + 'static,
    C: Clock + Send + Sync + 'static,
{
    async fn create_game(&self, new_game: NewGame) -> Result<Game, CreateGameError> {
        let roster = self.validate_roster(&new_game)?;
        let rate = self.rate_table.get_current_rate().await.map_err(|e| match e {
            GetRateError::NoRateConfigured => CreateGameError::NoRateConfigured,
            GetRateError::Storage => CreateGameError::Storage,
        })?;
        let total_cost = compute_cost(new_game.player_count, new_game.is_weekend, &rate.prices)?;

        let game = Game {
            id: GameId::new(),
            player_id: new_game.player_id,
            player_count: roster.len() as u32,
            player_names: roster,
            total_cost,
            is_weekend: new_game.is_weekend,
            is_demo_game: new_game.is_demo_game,
            completed_at: self.clock.now(),
        };
        if let Err(RepoError::StorageError(e)) = self.game_repository.insert_game(&game).await {
            log::error!("Failed to store game {}: {}", game.id, e);
            return Err(CreateGameError::Storage);
        }
        log::debug!(
            "Created game {} for {} players at {}{}",
            game.id,
            game.player_count,
            game.total_cost,
            if game.is_demo_game { " (demo)" } else { "" }
        );
        Ok(game)
    }

    async fn append_scores(
        &self,
        game_id: GameId,
        entries: Vec<ScoreEntry>,
    ) -> Result<Vec<Score>, AppendScoresError> {
        if entries.is_empty() {
            return Err(AppendScoresError::EmptyBatch);
        }
        let game = match self.game_repository.get_game(game_id).await {
            Ok(game) => game,
            Err(RepoRetrieveError::NotFound) => return Err(AppendScoresError::GameNotFound),
            Err(RepoRetrieveError::StorageError(e)) => {
                log::error!("Failed to load game {}: {}", game_id, e);
                return Err(AppendScoresError::Storage);
            }
        };

        let mut scores = Vec::with_capacity(entries.len());
        for entry in entries {
            let Some(player_name) = game.roster_name(&entry.player_name) else {
                return Err(AppendScoresError::UnknownPlayer(
                    entry.player_name.trim().to_string(),
                ));
            };
            scores.push(Score {
                id: ScoreId::new(),
                game_id,
                player_name: player_name.to_string(),
                hole: entry.hole.unwrap_or(PLACEHOLDER_HOLE),
                strokes: entry.strokes,
            });
        }

        match self
            .game_repository
            .record_scores(game_id, &scores, self.clock.now())
            .await
        {
            Ok(()) => Ok(scores),
            Err(RecordScoresError::NotFound) => Err(AppendScoresError::GameNotFound),
            Err(RecordScoresError::NegativeTotal { player, total }) => {
                Err(AppendScoresError::InvalidScoreTotal { player, total })
            }
            Err(RecordScoresError::StorageError(e)) => {
                log::error!("Failed to record scores for game {}: {}", game_id, e);
                Err(AppendScoresError::Storage)
            }
        }
    }

    async fn get_game(&self, game_id: GameId) -> Result<Game, GetGameError> {
        match self.game_repository.get_game(game_id).await {
            Ok(game) => Ok(game),
            Err(RepoRetrieveError::NotFound) => Err(GetGameError::GameNotFound),
            Err(RepoRetrieveError::StorageError(e)) => {
                log::error!("Failed to load game {}: {}", game_id, e);
                Err(GetGameError::Storage)
            }
        }
    }

    async fn get_scorecard(&self, game_id: GameId) -> Result<Scorecard, GetGameError> {
        let game = self.get_game(game_id).await?;
        let mut scores = self
            .game_repository
            .get_scores(game_id)
            .await
            .map_err(|e| {
                log::error!("Failed to load scores for game {}: {}", game_id, e);
                GetGameError::Storage
            })?;
        scores.sort_by(|a, b| {
            a.hole
                .cmp(&b.hole)
                .then_with(|| a.player_name.cmp(&b.player_name))
        });
        let sums = score_totals(&scores);
        let totals = game
            .player_names
            .iter()
            .map(|name| {
                let total = sums
                    .iter()
                    .find(|(player, _)| player == name)
                    .map_or(0, |(_, total)| *total);
                (name.clone(), total)
            })
            .collect();
        Ok(Scorecard {
            game,
            scores,
            totals,
        })
    }

    async fn get_games_in_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        include_demo: bool,
    ) -> Result<Vec<Game>, QueryGamesError> {
        let query = GameQuery::in_range(start, end).with_demo(include_demo);
        self.game_repository.query_games(query).await.map_err(|e| {
            log::error!("Failed to query games: {}", e);
            QueryGamesError
        })
    }
}
