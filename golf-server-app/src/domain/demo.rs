use std::sync::Arc;

use chrono::{DateTime, Utc};
use golf_core::normalize_phone_number;
use thiserror::Error;

use crate::{
    domain::{DemoNumberId, ErrorKind, RepoError, RepoUpdateError},
    ports::clock::Clock,
};

#[derive(Clone, Debug, PartialEq)]
pub struct DemoPhoneNumber {
    pub id: DemoNumberId,
    pub phone_number: String,
    pub added_at: DateTime<Utc>,
}

#[async_trait::async_trait]
pub trait DemoNumberRepository {
    /// Returns the stored row, which is the existing one if the normalized
    /// number is already registered.
    async fn insert_if_absent(&self, entry: &DemoPhoneNumber)
    -> Result<DemoPhoneNumber, RepoError>;
    async fn remove(&self, id: DemoNumberId) -> Result<(), RepoUpdateError>;
    async fn list(&self) -> Result<Vec<DemoPhoneNumber>, RepoError>;
    async fn contains(&self, phone_number: &str) -> Result<bool, RepoError>;
}

#[derive(Debug, Error)]
pub enum DemoNumberError {
    #[error("phone number must contain digits")]
    InvalidNumber,
    #[error("demo number not found")]
    NotFound,
    #[error("storage error")]
    Storage,
}

impl DemoNumberError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DemoNumberError::InvalidNumber => ErrorKind::Validation,
            DemoNumberError::NotFound => ErrorKind::NotFound,
            DemoNumberError::Storage => ErrorKind::Store,
        }
    }
}

#[async_trait::async_trait]
pub trait DemoRegistry {
    fn normalize(&self, phone_number: &str) -> String;
    async fn add(&self, phone_number: &str) -> Result<DemoPhoneNumber, DemoNumberError>;
    async fn remove(&self, id: DemoNumberId) -> Result<(), DemoNumberError>;
    async fn list(&self) -> Result<Vec<DemoPhoneNumber>, DemoNumberError>;
    async fn is_demo(&self, phone_number: &str) -> Result<bool, DemoNumberError>;
}

pub struct DemoRegistryImpl<R: DemoNumberRepository, C: Clock> {
    demo_repository: Arc<R>,
    clock: Arc<C>,
}

impl<R: DemoNumberRepository, C: Clock> DemoRegistryImpl<R, C> {
    pub fn new(demo_repository: Arc<R>, clock: Arc<C>) -> Self {
        Self {
            demo_repository,
            clock,
        }
    }
}

#[async_trait::async_trait]
impl<R: DemoNumberRepository + Send + Sync + 'static, C: Clock + Send + Sync + 'static>
    DemoRegistry for DemoRegistryImpl<R, C>
{
    fn normalize(&self, phone_number: &str) -> String {
        normalize_phone_number(phone_number)
    }

    async fn add(&self, phone_number: &str) -> Result<DemoPhoneNumber, DemoNumberError> {
        let normalized = self.normalize(phone_number);
        if normalized.is_empty() {
            return Err(DemoNumberError::InvalidNumber);
        }
        let entry = DemoPhoneNumber {
            id: DemoNumberId::new(),
            phone_number: normalized,
            added_at: self.clock.now(),
        };
        let stored = self
            .demo_repository
            .insert_if_absent(&entry)
            .await
            .map_err(|e| {
                log::error!("Failed to store demo number: {}", e);
                DemoNumberError::Storage
            })?;
        if stored.id == entry.id {
            log::info!("Registered demo number {}", stored.phone_number);
        }
        Ok(stored)
    }

    async fn remove(&self, id: DemoNumberId) -> Result<(), DemoNumberError> {
        match self.demo_repository.remove(id).await {
            Ok(()) => {
                log::info!("Removed demo number {}", id);
                Ok(())
            }
            Err(RepoUpdateError::NotFound) => Err(DemoNumberError::NotFound),
            Err(e) => {
                log::error!("Failed to remove demo number {}: {}", id, e);
                Err(DemoNumberError::Storage)
            }
        }
    }

    async fn list(&self) -> Result<Vec<DemoPhoneNumber>, DemoNumberError> {
        self.demo_repository.list().await.map_err(|e| {
            log::error!("Failed to list demo numbers: {}", e);
            DemoNumberError::Storage
        })
    }

    async fn is_demo(&self, phone_number: &str) -> Result<bool, DemoNumberError> {
        let normalized = self.normalize(phone_number);
        if normalized.is_empty() {
            return Ok(false);
        }
        self.demo_repository
            .contains(&normalized)
            .await
            .map_err(|e| {
                log::error!("Failed to look up demo number: {}", e);
                DemoNumberError::Storage
            })
    }
}
