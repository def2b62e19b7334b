use golf_core::{PriceSchedule, from_cents, to_cents};
use golf_server_app::domain::{
    AdminId, RateId, RepoError,
    rate::{Rate, RateRepository},
};
use sqlx::{Row, SqlitePool, sqlite::SqliteRow};

use crate::{from_millis, parse_uuid, retry_on_busy, to_millis};

const RATE_COLUMNS: &str =
    "id, weekday_price_cents, weekend_price_cents, updated_at, updated_by";

pub struct SqliteRateRepository {
    pool: SqlitePool,
}

impl SqliteRateRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn row_to_rate(row: SqliteRow) -> Result<Rate, String> {
    let id: String = row.try_get("id").map_err(|e| e.to_string())?;
    let updated_by: String = row.try_get("updated_by").map_err(|e| e.to_string())?;
    let weekday: i64 = row
        .try_get("weekday_price_cents")
        .map_err(|e| e.to_string())?;
    let weekend: i64 = row
        .try_get("weekend_price_cents")
        .map_err(|e| e.to_string())?;
    Ok(Rate {
        id: RateId(parse_uuid("rate id", &id)?),
        prices: PriceSchedule::new(from_cents(weekday), from_cents(weekend)),
        updated_at: from_millis(row.try_get("updated_at").map_err(|e| e.to_string())?)?,
        updated_by: AdminId(parse_uuid("updated_by", &updated_by)?),
    })
}

#[async_trait::async_trait]
impl RateRepository for SqliteRateRepository {
    async fn insert_rate(&self, rate: &Rate) -> Result<(), RepoError> {
        let weekday = to_cents(rate.prices.weekday_price)
            .ok_or_else(|| RepoError::StorageError("weekday price out of range".to_string()))?;
        let weekend = to_cents(rate.prices.weekend_price)
            .ok_or_else(|| RepoError::StorageError("weekend price out of range".to_string()))?;
        retry_on_busy(|| {
            sqlx::query(
                "INSERT INTO rates (id, weekday_price_cents, weekend_price_cents, updated_at, updated_by) \
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )
            .bind(rate.id.to_string())
            .bind(weekday)
            .bind(weekend)
            .bind(to_millis(rate.updated_at))
            .bind(rate.updated_by.to_string())
            .execute(&self.pool)
        })
        .await
        .map_err(|e| RepoError::StorageError(e.to_string()))?;
        Ok(())
    }

    async fn latest_rate(&self) -> Result<Option<Rate>, RepoError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM rates ORDER BY updated_at DESC, seq DESC LIMIT 1",
            RATE_COLUMNS
        ))
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepoError::StorageError(e.to_string()))?;
        row.map(row_to_rate)
            .transpose()
            .map_err(RepoError::StorageError)
    }

    async fn rate_history(&self) -> Result<Vec<Rate>, RepoError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM rates ORDER BY updated_at DESC, seq DESC",
            RATE_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepoError::StorageError(e.to_string()))?;
        rows.into_iter()
            .map(|row| row_to_rate(row).map_err(RepoError::StorageError))
            .collect()
    }
}
