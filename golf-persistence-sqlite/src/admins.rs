use golf_server_app::domain::{
    AdminId, RepoCreateError, RepoError, RepoRetrieveError,
    admin::{AdminRepository, AdminUser},
};
use sqlx::{Row, SqlitePool, sqlite::SqliteRow};

use crate::{is_unique_violation, parse_uuid, retry_on_busy};

pub struct SqliteAdminRepository {
    pool: SqlitePool,
}

impl SqliteAdminRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Creates the account or replaces the password of an existing one.
    pub async fn upsert_admin(&self, admin: &AdminUser) -> Result<AdminUser, RepoError> {
        retry_on_busy(|| {
            sqlx::query(
                "INSERT INTO admins (id, username, password_hash) VALUES (?1, ?2, ?3) \
                 ON CONFLICT(username) DO UPDATE SET password_hash = excluded.password_hash",
            )
            .bind(admin.id.to_string())
            .bind(&admin.username)
            .bind(&admin.password_hash)
            .execute(&self.pool)
        })
        .await
        .map_err(|e| RepoError::StorageError(e.to_string()))?;

        self.get_admin_by_username(&admin.username)
            .await
            .map_err(|e| RepoError::StorageError(e.to_string()))
    }
}

fn row_to_admin(row: SqliteRow) -> Result<AdminUser, String> {
    let id: String = row.try_get("id").map_err(|e| e.to_string())?;
    Ok(AdminUser {
        id: AdminId(parse_uuid("admin id", &id)?),
        username: row.try_get("username").map_err(|e| e.to_string())?,
        password_hash: row.try_get("password_hash").map_err(|e| e.to_string())?,
    })
}

#[async_trait::async_trait]
impl AdminRepository for SqliteAdminRepository {
    async fn create_admin(&self, admin: &AdminUser) -> Result<(), RepoCreateError> {
        retry_on_busy(|| {
            sqlx::query("INSERT INTO admins (id, username, password_hash) VALUES (?1, ?2, ?3)")
                .bind(admin.id.to_string())
                .bind(&admin.username)
                .bind(&admin.password_hash)
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

    async fn get_admin(&self, admin_id: AdminId) -> Result<AdminUser, RepoRetrieveError> {
        let row = sqlx::query("SELECT id, username, password_hash FROM admins WHERE id = ?1")
            .bind(admin_id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepoRetrieveError::StorageError(e.to_string()))?;
        match row {
            Some(row) => row_to_admin(row).map_err(RepoRetrieveError::StorageError),
            None => Err(RepoRetrieveError::NotFound),
        }
    }

    async fn get_admin_by_username(
        &self,
        username: &str,
    ) -> Result<AdminUser, RepoRetrieveError> {
        let row =
            sqlx::query("SELECT id, username, password_hash FROM admins WHERE username = ?1")
                .bind(username)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| RepoRetrieveError::StorageError(e.to_string()))?;
        match row {
            Some(row) => row_to_admin(row).map_err(RepoRetrieveError::StorageError),
            None => Err(RepoRetrieveError::NotFound),
        }
    }

    async fn list_admins(&self) -> Result<Vec<AdminUser>, RepoError> {
        let rows = sqlx::query("SELECT id, username, password_hash FROM admins ORDER BY rowid")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepoError::StorageError(e.to_string()))?;
        rows.into_iter()
            .map(|row| row_to_admin(row).map_err(RepoError::StorageError))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connect_in_memory;

    fn admin(username: &str, hash: &str) -> AdminUser {
        AdminUser {
            id: AdminId::new(),
            username: username.to_string(),
            password_hash: hash.to_string(),
        }
    }

    #[tokio::test]
    async fn test_admin_lookup() {
        let repo = SqliteAdminRepository::new(connect_in_memory().await.unwrap());
        assert!(repo.list_admins().await.unwrap().is_empty());

        let first = admin("admin", "hash-1");
        repo.create_admin(&first).await.unwrap();
        assert_eq!(repo.get_admin(first.id).await.unwrap(), first);
        assert_eq!(repo.get_admin_by_username("admin").await.unwrap(), first);
        assert!(matches!(
            repo.get_admin_by_username("root").await,
            Err(RepoRetrieveError::NotFound)
        ));
        assert!(matches!(
            repo.create_admin(&admin("admin", "hash-2")).await,
            Err(RepoCreateError::Conflict)
        ));
        assert_eq!(repo.list_admins().await.unwrap(), vec![first]);
    }

    #[tokio::test]
    async fn test_upsert_replaces_password() {
        let repo = SqliteAdminRepository::new(connect_in_memory().await.unwrap());
        let original = repo.upsert_admin(&admin("admin", "hash-1")).await.unwrap();
        let replaced = repo.upsert_admin(&admin("admin", "hash-2")).await.unwrap();
        assert_eq!(replaced.id, original.id);
        assert_eq!(replaced.password_hash, "hash-2");
        assert_eq!(repo.list_admins().await.unwrap().len(), 1);
    }
}
