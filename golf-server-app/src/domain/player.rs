use chrono::{DateTime, Utc};

use crate::domain::{PlayerId, RepoCreateError, RepoRetrieveError};

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub contact: String,
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[async_trait::async_trait]
pub trait PlayerRepository {
    async fn create_player(&self, player: &Player) -> Result<(), RepoCreateError>;
    async fn get_player(&self, player_id: PlayerId) -> Result<Player, RepoRetrieveError>;
}
