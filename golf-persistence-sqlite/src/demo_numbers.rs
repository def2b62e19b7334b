use golf_server_app::domain::{
    DemoNumberId, RepoError, RepoUpdateError,
    demo::{DemoNumberRepository, DemoPhoneNumber},
};
use sqlx::{Row, SqlitePool, sqlite::SqliteRow};

use crate::{from_millis, parse_uuid, retry_on_busy, to_millis};

pub struct SqliteDemoNumberRepository {
    pool: SqlitePool,
}

impl SqliteDemoNumberRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn row_to_demo_number(row: SqliteRow) -> Result<DemoPhoneNumber, String> {
    let id: String = row.try_get("id").map_err(|e| e.to_string())?;
    Ok(DemoPhoneNumber {
        id: DemoNumberId(parse_uuid("demo number id", &id)?),
        phone_number: row.try_get("phone_number").map_err(|e| e.to_string())?,
        added_at: from_millis(row.try_get("added_at").map_err(|e| e.to_string())?)?,
    })
}

#[async_trait::async_trait]
impl DemoNumberRepository for SqliteDemoNumberRepository {
    async fn insert_if_absent(
        &self,
        entry: &DemoPhoneNumber,
    ) -> Result<DemoPhoneNumber, RepoError> {
        retry_on_busy(|| {
            sqlx::query(
                "INSERT INTO demo_numbers (id, phone_number, added_at) VALUES (?1, ?2, ?3) \
                 ON CONFLICT(phone_number) DO NOTHING",
            )
            .bind(entry.id.to_string())
            .bind(&entry.phone_number)
            .bind(to_millis(entry.added_at))
            .execute(&self.pool)
        })
        .await
        .map_err(|e| RepoError::StorageError(e.to_string()))?;

        let row = sqlx::query(
            "SELECT id, phone_number, added_at FROM demo_numbers WHERE phone_number = ?1",
        )
        .bind(&entry.phone_number)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| RepoError::StorageError(e.to_string()))?;
        row_to_demo_number(row).map_err(RepoError::StorageError)
    }

    async fn remove(&self, id: DemoNumberId) -> Result<(), RepoUpdateError> {
        let result = retry_on_busy(|| {
            sqlx::query("DELETE FROM demo_numbers WHERE id = ?1")
                .bind(id.to_string())
                .execute(&self.pool)
        })
        .await
        .map_err(|e| RepoUpdateError::StorageError(e.to_string()))?;
        if result.rows_affected() == 0 {
            return Err(RepoUpdateError::NotFound);
        }
        Ok(())
    }

    async fn list(&self) -> Result<Vec<DemoPhoneNumber>, RepoError> {
        let rows = sqlx::query(
            "SELECT id, phone_number, added_at FROM demo_numbers ORDER BY added_at DESC, rowid DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepoError::StorageError(e.to_string()))?;
        rows.into_iter()
            .map(|row| row_to_demo_number(row).map_err(RepoError::StorageError))
            .collect()
    }

    async fn contains(&self, phone_number: &str) -> Result<bool, RepoError> {
        let row = sqlx::query("SELECT 1 FROM demo_numbers WHERE phone_number = ?1")
            .bind(phone_number)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepoError::StorageError(e.to_string()))?;
        Ok(row.is_some())
    }
}
