use std::sync::Arc;

use passwords::PasswordGenerator;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::domain::{
    AdminId, ErrorKind, RepoCreateError,
    admin::{AdminRepository, AdminUser},
    rate::{DEFAULT_WEEKDAY_PRICE_CENTS, DEFAULT_WEEKEND_PRICE_CENTS, GetRateError, RateTable},
};

pub const DEFAULT_ADMIN_USERNAME: &str = "admin";

#[derive(Debug, Clone)]
pub struct AdminSeed {
    pub username: String,
    pub password: Option<String>,
}

impl Default for AdminSeed {
    fn default() -> Self {
        Self {
            username: DEFAULT_ADMIN_USERNAME.to_string(),
            password: None,
        }
    }
}

#[derive(Debug, Default, PartialEq)]
pub struct BootstrapReport {
    pub created_admin: Option<String>,
    pub generated_password: Option<String>,
    pub seeded_rate: bool,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("could not generate an admin password: {0}")]
    PasswordGeneration(String),
    #[error("could not hash the admin password")]
    Hashing,
    #[error("storage error")]
    Storage,
}

impl BootstrapError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            BootstrapError::PasswordGeneration(_) | BootstrapError::Hashing => {
                ErrorKind::Configuration
            }
            BootstrapError::Storage => ErrorKind::Store,
        }
    }
}

pub fn generate_password() -> Result<String, BootstrapError> {
    let password_gen = PasswordGenerator::new()
        .length(12)
        .numbers(true)
        .lowercase_letters(true)
        .uppercase_letters(true)
        .spaces(false)
        .symbols(false)
        .exclude_similar_characters(true)
        .strict(true);
    password_gen
        .generate_one()
        .map_err(|e| BootstrapError::PasswordGeneration(e.to_string()))
}

pub async fn hash_password(password: &str, cost: u32) -> Result<String, BootstrapError> {
    let password = password.to_string();
    tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(|_| BootstrapError::Hashing)?
        .map_err(|_| BootstrapError::Hashing)
}

/// Seeds the first admin and the opening rate on an empty store.
#[async_trait::async_trait]
pub trait BootstrapWorkflow {
    async fn ensure_seeded(&self, seed: AdminSeed) -> Result<BootstrapReport, BootstrapError>;
}

pub struct BootstrapWorkflowImpl<A: AdminRepository, T: RateTable> {
    admin_repository: Arc<A>,
    rate_table: Arc<T>,
    hash_cost: u32,
}

impl<A: AdminRepository, T: RateTable> BootstrapWorkflowImpl<A, T> {
    pub fn new(admin_repository: Arc<A>, rate_table: Arc<T>) -> Self {
        Self {
            admin_repository,
            rate_table,
            hash_cost: bcrypt::DEFAULT_COST,
        }
    }

    pub fn with_hash_cost(mut self, hash_cost: u32) -> Self {
        self.hash_cost = hash_cost;
        self
    }
}

#[async_trait::async_trait]
impl<A: AdminRepository + Send + Sync + 'static, T: RateTable + Send + Sync + 'static>
    BootstrapWorkflow for BootstrapWorkflowImpl<A, T>
{
    async fn ensure_seeded(&self, seed: AdminSeed) -> Result<BootstrapReport, BootstrapError> {
        let mut report = BootstrapReport::default();
        let admins = self.admin_repository.list_admins().await.map_err(|e| {
            log::error!("Failed to list admins: {}", e);
            BootstrapError::Storage
        })?;

        let owner = match admins.into_iter().next() {
            Some(admin) => admin,
            None => {
                let password = match seed.password {
                    Some(password) => password,
                    None => {
                        let password = generate_password()?;
                        log::warn!(
                            "No admin password configured, generated one for {}: {}",
                            seed.username,
                            password
                        );
                        report.generated_password = Some(password.clone());
                        password
                    }
                };
                let admin = AdminUser {
                    id: AdminId::new(),
                    username: seed.username.clone(),
                    password_hash: hash_password(&password, self.hash_cost).await?,
                };
                match self.admin_repository.create_admin(&admin).await {
                    Ok(()) => {}
                    Err(RepoCreateError::Conflict) => {
                        log::error!("Admin {} appeared during bootstrap", admin.username);
                        return Err(BootstrapError::Storage);
                    }
                    Err(RepoCreateError::StorageError(e)) => {
                        log::error!("Failed to create admin {}: {}", admin.username, e);
                        return Err(BootstrapError::Storage);
                    }
                }
                log::info!("Created admin {}", admin.username);
                report.created_admin = Some(admin.username.clone());
                admin
            }
        };

        match self.rate_table.get_current_rate().await {
            Ok(_) => {}
            Err(GetRateError::NoRateConfigured) => {
                self.rate_table
                    .set_rate(
                        Decimal::new(DEFAULT_WEEKDAY_PRICE_CENTS, 2),
                        Decimal::new(DEFAULT_WEEKEND_PRICE_CENTS, 2),
                        owner.id,
                    )
                    .await
                    .map_err(|_| BootstrapError::Storage)?;
                report.seeded_rate = true;
            }
            Err(GetRateError::Storage) => return Err(BootstrapError::Storage),
        }
        Ok(report)
    }
}
