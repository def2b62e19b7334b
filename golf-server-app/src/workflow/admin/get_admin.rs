use std::sync::Arc;

use thiserror::Error;

use crate::domain::{
    AdminId, ErrorKind, RepoRetrieveError,
    admin::{AdminRepository, AdminUser},
};

#[derive(Debug, Error)]
pub enum GetAdminError {
    #[error("admin not found")]
    NotFound,
    #[error("storage error")]
    Storage,
}

impl GetAdminError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GetAdminError::NotFound => ErrorKind::NotFound,
            GetAdminError::Storage => ErrorKind::Store,
        }
    }
}

#[async_trait::async_trait]
pub trait GetAdminUseCase {
    async fn get_admin(&self, admin_id: AdminId) -> Result<AdminUser, GetAdminError>;
}

pub struct GetAdminUseCaseImpl<A: AdminRepository> {
    admin_repository: Arc<A>,
}

impl<A: AdminRepository> GetAdminUseCaseImpl<A> {
    pub fn new(admin_repository: Arc<A>) -> Self {
        Self { admin_repository }
    }
}

#[async_trait::async_trait]
impl<A: AdminRepository + Send + Sync + 'static> GetAdminUseCase for GetAdminUseCaseImpl<A> {
    async fn get_admin(&self, admin_id: AdminId) -> Result<AdminUser, GetAdminError> {
        match self.admin_repository.get_admin(admin_id).await {
            Ok(admin) => Ok(admin),
            Err(RepoRetrieveError::NotFound) => Err(GetAdminError::NotFound),
            Err(RepoRetrieveError::StorageError(e)) => {
                log::error!("Failed to load admin {}: {}", admin_id, e);
                Err(GetAdminError::Storage)
            }
        }
    }
}
