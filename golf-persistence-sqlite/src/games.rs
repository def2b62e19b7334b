use chrono::{DateTime, Utc};
use golf_core::{from_cents, to_cents};
use golf_server_app::domain::{
    GameId, PlayerId, RepoError, RepoRetrieveError, ScoreId,
    game::{Game, GameQuery, GameRepository, RecordScoresError, Score},
};
use sqlx::{Row, SqlitePool, sqlite::SqliteRow};

use crate::{from_millis, parse_uuid, retry_on_busy, to_millis};

const GAME_COLUMNS: &str = "id, player_id, player_names, player_count, total_cost_cents, is_weekend, is_demo, completed_at";

pub struct SqliteGameRepository {
    pool: SqlitePool,
}

enum RecordOutcome {
    Recorded,
    GameNotFound,
    NegativeTotal { player: String, total: i64 },
}

impl SqliteGameRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn record_scores_once(
        &self,
        game_id: GameId,
        scores: &[Score],
        completed_at: DateTime<Utc>,
    ) -> Result<RecordOutcome, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        // write first so the transaction holds the lock before the check
        let updated = sqlx::query("UPDATE games SET completed_at = ?1 WHERE id = ?2")
            .bind(to_millis(completed_at))
            .bind(game_id.to_string())
            .execute(&mut *tx)
            .await?;
        if updated.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(RecordOutcome::GameNotFound);
        }

        for score in scores {
            sqlx::query(
                "INSERT INTO scores (id, game_id, player_name, hole, strokes) VALUES (?1, ?2, ?3, ?4, ?5)",
            )
            .bind(score.id.to_string())
            .bind(game_id.to_string())
            .bind(&score.player_name)
            .bind(score.hole as i64)
            .bind(score.strokes as i64)
            .execute(&mut *tx)
            .await?;
        }

        let negative = sqlx::query(
            "SELECT player_name, SUM(strokes) AS total FROM scores WHERE game_id = ?1 \
             GROUP BY player_name HAVING SUM(strokes) < 0 ORDER BY player_name LIMIT 1",
        )
        .bind(game_id.to_string())
        .fetch_optional(&mut *tx)
        .await?;
        if let Some(row) = negative {
            tx.rollback().await?;
            return Ok(RecordOutcome::NegativeTotal {
                player: row.try_get("player_name")?,
                total: row.try_get("total")?,
            });
        }
        tx.commit().await?;
        Ok(RecordOutcome::Recorded)
    }
}

fn row_to_game(row: SqliteRow) -> Result<Game, String> {
    let id: String = row.try_get("id").map_err(|e| e.to_string())?;
    let player_id: String = row.try_get("player_id").map_err(|e| e.to_string())?;
    let player_names: String = row.try_get("player_names").map_err(|e| e.to_string())?;
    let player_count: i64 = row.try_get("player_count").map_err(|e| e.to_string())?;
    let total_cost_cents: i64 = row.try_get("total_cost_cents").map_err(|e| e.to_string())?;
    Ok(Game {
        id: GameId(parse_uuid("game id", &id)?),
        player_id: PlayerId(parse_uuid("player id", &player_id)?),
        player_names: serde_json::from_str(&player_names)
            .map_err(|e| format!("invalid player_names: {}", e))?,
        player_count: u32::try_from(player_count).map_err(|e| e.to_string())?,
        total_cost: from_cents(total_cost_cents),
        is_weekend: row.try_get("is_weekend").map_err(|e| e.to_string())?,
        is_demo_game: row.try_get("is_demo").map_err(|e| e.to_string())?,
        completed_at: from_millis(row.try_get("completed_at").map_err(|e| e.to_string())?)?,
    })
}

fn row_to_score(row: SqliteRow) -> Result<Score, String> {
    let id: String = row.try_get("id").map_err(|e| e.to_string())?;
    let game_id: String = row.try_get("game_id").map_err(|e| e.to_string())?;
    let hole: i64 = row.try_get("hole").map_err(|e| e.to_string())?;
    let strokes: i64 = row.try_get("strokes").map_err(|e| e.to_string())?;
    Ok(Score {
        id: ScoreId(parse_uuid("score id", &id)?),
        game_id: GameId(parse_uuid("game id", &game_id)?),
        player_name: row.try_get("player_name").map_err(|e| e.to_string())?,
        hole: u32::try_from(hole).map_err(|e| e.to_string())?,
        strokes: i32::try_from(strokes).map_err(|e| e.to_string())?,
    })
}

#[async_trait::async_trait]
impl GameRepository for SqliteGameRepository {
    async fn insert_game(&self, game: &Game) -> Result<(), RepoError> {
        let player_names = serde_json::to_string(&game.player_names)
            .map_err(|e| RepoError::StorageError(e.to_string()))?;
        let total_cost_cents = to_cents(game.total_cost)
            .ok_or_else(|| RepoError::StorageError("total cost out of range".to_string()))?;
        let sql = format!(
            "INSERT INTO games ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            GAME_COLUMNS
        );
        retry_on_busy(|| {
            sqlx::query(&sql)
                .bind(game.id.to_string())
                .bind(game.player_id.to_string())
                .bind(&player_names)
                .bind(game.player_count as i64)
                .bind(total_cost_cents)
                .bind(game.is_weekend)
                .bind(game.is_demo_game)
                .bind(to_millis(game.completed_at))
                .execute(&self.pool)
        })
        .await
        .map_err(|e| RepoError::StorageError(e.to_string()))?;
        Ok(())
    }

    async fn get_game(&self, game_id: GameId) -> Result<Game, RepoRetrieveError> {
        let row = sqlx::query(&format!("SELECT {} FROM games WHERE id = ?1", GAME_COLUMNS))
            .bind(game_id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepoRetrieveError::StorageError(e.to_string()))?;
        match row {
            Some(row) => row_to_game(row).map_err(RepoRetrieveError::StorageError),
            None => Err(RepoRetrieveError::NotFound),
        }
    }

    async fn get_scores(&self, game_id: GameId) -> Result<Vec<Score>, RepoError> {
        let rows = sqlx::query(
            "SELECT id, game_id, player_name, hole, strokes FROM scores WHERE game_id = ?1 ORDER BY hole, player_name",
        )
        .bind(game_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepoError::StorageError(e.to_string()))?;
        rows.into_iter()
            .map(|row| row_to_score(row).map_err(RepoError::StorageError))
            .collect()
    }

    async fn record_scores(
        &self,
        game_id: GameId,
        scores: &[Score],
        completed_at: DateTime<Utc>,
    ) -> Result<(), RecordScoresError> {
        match retry_on_busy(|| self.record_scores_once(game_id, scores, completed_at)).await {
            Ok(RecordOutcome::Recorded) => Ok(()),
            Ok(RecordOutcome::GameNotFound) => Err(RecordScoresError::NotFound),
            Ok(RecordOutcome::NegativeTotal { player, total }) => {
                Err(RecordScoresError::NegativeTotal { player, total })
            }
            Err(e) => Err(RecordScoresError::StorageError(e.to_string())),
        }
    }

    async fn query_games(&self, query: GameQuery) -> Result<Vec<Game>, RepoError> {
        let (start, end) = match query.range {
            Some((start, end)) => (Some(to_millis(start)), Some(to_millis(end))),
            None => (None, None),
        };
        // a negative LIMIT means no limit in SQLite
        let limit = query.limit.map(|l| l as i64).unwrap_or(-1);
        let rows = sqlx::query(&format!(
            "SELECT {} FROM games \
             WHERE (?1 IS NULL OR completed_at >= ?1) \
             AND (?2 IS NULL OR completed_at <= ?2) \
             AND (?3 OR is_demo = 0) \
             ORDER BY completed_at DESC, rowid DESC \
             LIMIT ?4",
            GAME_COLUMNS
        ))
        .bind(start)
        .bind(end)
        .bind(query.include_demo)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepoError::StorageError(e.to_string()))?;
        rows.into_iter()
            .map(|row| row_to_game(row).map_err(RepoError::StorageError))
            .collect()
    }
}
