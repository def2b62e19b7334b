use std::sync::Mutex;

use chrono::{DateTime, Utc};

use crate::domain::{
    AdminId, DemoNumberId, GameId, PlayerId, RepoCreateError, RepoError, RepoRetrieveError,
    RepoUpdateError,
    admin::{AdminRepository, AdminUser},
    demo::{DemoNumberRepository, DemoPhoneNumber},
    game::{Game, GameQuery, GameRepository, RecordScoresError, Score, score_totals},
    player::{Player, PlayerRepository},
    rate::{Rate, RateRepository},
};

pub fn at(rfc3339: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(rfc3339)
        .unwrap()
        .with_timezone(&Utc)
}

#[derive(Default)]
pub struct InMemoryStore {
    players: Mutex<Vec<Player>>,
    admins: Mutex<Vec<AdminUser>>,
    rates: Mutex<Vec<Rate>>,
    games: Mutex<Vec<Game>>,
    scores: Mutex<Vec<Score>>,
    demo_numbers: Mutex<Vec<DemoPhoneNumber>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn games(&self) -> Vec<Game> {
        self.games.lock().unwrap().clone()
    }

    pub fn admins(&self) -> Vec<AdminUser> {
        self.admins.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl PlayerRepository for InMemoryStore {
    async fn create_player(&self, player: &Player) -> Result<(), RepoCreateError> {
        let mut players = self.players.lock().unwrap();
        if players.iter().any(|p| p.id == player.id) {
            return Err(RepoCreateError::Conflict);
        }
        players.push(player.clone());
        Ok(())
    }

    async fn get_player(&self, player_id: PlayerId) -> Result<Player, RepoRetrieveError> {
        self.players
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == player_id)
            .cloned()
            .ok_or(RepoRetrieveError::NotFound)
    }
}

#[async_trait::async_trait]
impl AdminRepository for InMemoryStore {
    async fn create_admin(&self, admin: &AdminUser) -> Result<(), RepoCreateError> {
        let mut admins = self.admins.lock().unwrap();
        if admins.iter().any(|a| a.username == admin.username) {
            return Err(RepoCreateError::Conflict);
        }
        admins.push(admin.clone());
        Ok(())
    }

    async fn get_admin(&self, admin_id: AdminId) -> Result<AdminUser, RepoRetrieveError> {
        self.admins
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.id == admin_id)
            .cloned()
            .ok_or(RepoRetrieveError::NotFound)
    }

    async fn get_admin_by_username(
        &self,
        username: &str,
    ) -> Result<AdminUser, RepoRetrieveError> {
        self.admins
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.username == username)
            .cloned()
            .ok_or(RepoRetrieveError::NotFound)
    }

    async fn list_admins(&self) -> Result<Vec<AdminUser>, RepoError> {
        Ok(self.admins.lock().unwrap().clone())
    }
}

#[async_trait::async_trait]
impl RateRepository for InMemoryStore {
    async fn insert_rate(&self, rate: &Rate) -> Result<(), RepoError> {
        self.rates.lock().unwrap().push(rate.clone());
        Ok(())
    }

    async fn latest_rate(&self) -> Result<Option<Rate>, RepoError> {
        Ok(self.rate_history().await?.into_iter().next())
    }

    async fn rate_history(&self) -> Result<Vec<Rate>, RepoError> {
        let mut history: Vec<Rate> = self.rates.lock().unwrap().iter().rev().cloned().collect();
        // stable sort keeps later inserts first among equal timestamps
        history.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(history)
    }
}

#[async_trait::async_trait]
impl GameRepository for InMemoryStore {
    async fn insert_game(&self, game: &Game) -> Result<(), RepoError> {
        self.games.lock().unwrap().push(game.clone());
        Ok(())
    }

    async fn get_game(&self, game_id: GameId) -> Result<Game, RepoRetrieveError> {
        self.games
            .lock()
            .unwrap()
            .iter()
            .find(|g| g.id == game_id)
            .cloned()
            .ok_or(RepoRetrieveError::NotFound)
    }

    async fn get_scores(&self, game_id: GameId) -> Result<Vec<Score>, RepoError> {
        Ok(self
            .scores
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.game_id == game_id)
            .cloned()
            .collect())
    }

    async fn record_scores(
        &self,
        game_id: GameId,
        scores: &[Score],
        completed_at: DateTime<Utc>,
    ) -> Result<(), RecordScoresError> {
        let mut games = self.games.lock().unwrap();
        let mut stored = self.scores.lock().unwrap();
        let game = games
            .iter_mut()
            .find(|g| g.id == game_id)
            .ok_or(RecordScoresError::NotFound)?;
        let mut combined: Vec<Score> = stored
            .iter()
            .filter(|s| s.game_id == game_id)
            .cloned()
            .collect();
        combined.extend(scores.iter().cloned());
        if let Some((player, total)) = score_totals(&combined)
            .into_iter()
            .find(|(_, total)| *total < 0)
        {
            return Err(RecordScoresError::NegativeTotal { player, total });
        }
        game.completed_at = completed_at;
        stored.extend(scores.iter().cloned());
        Ok(())
    }

    async fn query_games(&self, query: GameQuery) -> Result<Vec<Game>, RepoError> {
        let mut games: Vec<Game> = self
            .games
            .lock()
            .unwrap()
            .iter()
            .filter(|g| query.include_demo || !g.is_demo_game)
            .filter(|g| match query.range {
                Some((start, end)) => g.completed_at >= start && g.completed_at <= end,
                None => true,
            })
            .cloned()
            .collect();
        games.sort_by(|a, b| b.completed_at.cmp(&a.completed_at));
        if let Some(limit) = query.limit {
            games.truncate(limit);
        }
        Ok(games)
    }
}

#[async_trait::async_trait]
impl DemoNumberRepository for InMemoryStore {
    async fn insert_if_absent(
        &self,
        entry: &DemoPhoneNumber,
    ) -> Result<DemoPhoneNumber, RepoError> {
        let mut numbers = self.demo_numbers.lock().unwrap();
        if let Some(existing) = numbers
            .iter()
            .find(|n| n.phone_number == entry.phone_number)
        {
            return Ok(existing.clone());
        }
        numbers.push(entry.clone());
        Ok(entry.clone())
    }

    async fn remove(&self, id: DemoNumberId) -> Result<(), RepoUpdateError> {
        let mut numbers = self.demo_numbers.lock().unwrap();
        let before = numbers.len();
        numbers.retain(|n| n.id != id);
        if numbers.len() == before {
            return Err(RepoUpdateError::NotFound);
        }
        Ok(())
    }

    async fn list(&self) -> Result<Vec<DemoPhoneNumber>, RepoError> {
        let mut numbers = self.demo_numbers.lock().unwrap().clone();
        numbers.sort_by(|a, b| b.added_at.cmp(&a.added_at));
        Ok(numbers)
    }

    async fn contains(&self, phone_number: &str) -> Result<bool, RepoError> {
        Ok(self
            .demo_numbers
            .lock()
            .unwrap()
            .iter()
            .any(|n| n.phone_number == phone_number))
    }
}
