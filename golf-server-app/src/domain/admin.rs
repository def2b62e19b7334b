use crate::domain::{AdminId, RepoCreateError, RepoError, RepoRetrieveError};

#[derive(Clone, Debug, PartialEq)]
pub struct AdminUser {
    pub id: AdminId,
    pub username: String,
    pub password_hash: String,
}

#[async_trait::async_trait]
pub trait AdminRepository {
    async fn create_admin(&self, admin: &AdminUser) -> Result<(), RepoCreateError>;
    async fn get_admin(&self, admin_id: AdminId) -> Result<AdminUser, RepoRetrieveError>;
    async fn get_admin_by_username(&self, username: &str)
    -> Result<AdminUser, RepoRetrieveError>;
    async fn list_admins(&self) -> Result<Vec<AdminUser>, RepoError>;
}
