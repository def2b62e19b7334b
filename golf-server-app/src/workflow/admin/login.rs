use std::sync::Arc;

use thiserror::Error;

use crate::domain::{
    ErrorKind, RepoRetrieveError,
    admin::{AdminRepository, AdminUser},
};

#[derive(Debug, Error)]
pub enum AdminLoginError {
    #[error("invalid username or password")]
    InvalidCredentials,
    #[error("storage error")]
    Storage,
}

impl AdminLoginError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AdminLoginError::InvalidCredentials => ErrorKind::Validation,
            AdminLoginError::Storage => ErrorKind::Store,
        }
    }
}

#[async_trait::async_trait]
pub trait AdminLoginUseCase {
    async fn login(&self, username: &str, password: &str) -> Result<AdminUser, AdminLoginError>;
}

pub struct AdminLoginUseCaseImpl<A: AdminRepository> {
    admin_repository: Arc<A>,
}

impl<A: AdminRepository> AdminLoginUseCaseImpl<A> {
    pub fn new(admin_repository: Arc<A>) -> Self {
        Self { admin_repository }
    }
}

#[async_trait::async_trait]
impl<A: AdminRepository + Send + Sync + 'static> AdminLoginUseCase for AdminLoginUseCaseImpl<A> {
    async fn login(&self, username: &str, password: &str) -> Result<AdminUser, AdminLoginError> {
        let admin = match self
            .admin_repository
            .get_admin_by_username(username.trim())
            .await
        {
            Ok(admin) => admin,
            Err(RepoRetrieveError::NotFound) => {
                log::info!("Login attempt for unknown admin {}", username.trim());
                return Err(AdminLoginError::InvalidCredentials);
            }
            Err(RepoRetrieveError::StorageError(e)) => {
                log::error!("Failed to load admin {}: {}", username.trim(), e);
                return Err(AdminLoginError::Storage);
            }
        };

        let password = password.to_string();
        let hash = admin.password_hash.clone();
        let valid = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
            .await
            .map_err(|e| {
                log::error!("Password check task failed: {}", e);
                AdminLoginError::Storage
            })?
            .unwrap_or_else(|e| {
                log::error!("Stored hash for admin {} is unreadable: {}", admin.id, e);
                false
            });
        if !valid {
            log::info!("Failed login for admin {}", admin.username);
            return Err(AdminLoginError::InvalidCredentials);
        }
        log::info!("Admin {} logged in", admin.username);
        Ok(admin)
    }
}
