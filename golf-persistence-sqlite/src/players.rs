use golf_server_app::domain::{
    PlayerId, RepoCreateError, RepoRetrieveError,
    player::{Player, PlayerRepository},
};
use sqlx::{Row, SqlitePool, sqlite::SqliteRow};

use crate::{from_millis, is_unique_violation, parse_uuid, retry_on_busy, to_millis};

pub struct SqlitePlayerRepository {
    pool: SqlitePool,
}

impl SqlitePlayerRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn row_to_player(row: SqliteRow) -> Result<Player, String> {
    let id: String = row.try_get("id").map_err(|e| e.to_string())?;
    Ok(Player {
        id: PlayerId(parse_uuid("player id", &id)?),
        name: row.try_get("name").map_err(|e| e.to_string())?,
        contact: row.try_get("contact").map_err(|e| e.to_string())?,
        email: row.try_get("email").map_err(|e| e.to_string())?,
        created_at: from_millis(row.try_get("created_at").map_err(|e| e.to_string())?)?,
    })
}

#[async_trait::async_trait]
impl PlayerRepository for SqlitePlayerRepository {
    async fn create_player(&self, player: &Player) -> Result<(), RepoCreateError> {
        retry_on_busy(|| {
            sqlx::query(
                "INSERT INTO players (id, name, contact, email, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
            )
            .bind(player.id.to_string())
            .bind(&player.name)
            .bind(&player.contact)
            .bind(&player.email)
            .bind(to_millis(player.created_at))
            .execute(&self.pool)
        })
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                RepoCreateError::Conflict
            } else {
                RepoCreateError::StorageError(e.to_string())
            }
        })?;
        Ok(())
    }

    async fn get_player(&self, player_id: PlayerId) -> Result<Player, RepoRetrieveError> {
        let row = sqlx::query(
            "SELECT id, name, contact, email, created_at FROM players WHERE id = ?1",
        )
        .bind(player_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepoRetrieveError::StorageError(e.to_string()))?;

        match row {
            Some(row) => row_to_player(row).map_err(RepoRetrieveError::StorageError),
            None => Err(RepoRetrieveError::NotFound),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::connect_in_memory;

    #[tokio::test]
    async fn test_create_and_get_player() {
        let repo = SqlitePlayerRepository::new(connect_in_memory().await.unwrap());
        let player = Player {
            id: PlayerId::new(),
            name: "Asha".to_string(),
            contact: "+91 80159-89208".to_string(),
            email: None,
            created_at: Utc.timestamp_millis_opt(1_741_946_400_123).unwrap(),
        };
        repo.create_player(&player).await.unwrap();
        assert_eq!(repo.get_player(player.id).await.unwrap(), player);

        assert!(matches!(
            repo.create_player(&player).await,
            Err(RepoCreateError::Conflict)
        ));
        assert!(matches!(
            repo.get_player(PlayerId::new()).await,
            Err(RepoRetrieveError::NotFound)
        ));
    }
}
