use thiserror::Error;

use crate::domain::{ErrorKind, game::QueryGamesError, sales::SalesError};

pub mod breakdown;
pub mod dashboard;
pub mod recent_games;
pub mod sales_period;
pub mod transactions;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("invalid date range")]
    InvalidRange,
    #[error("storage error")]
    Storage,
}

impl ReportError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ReportError::InvalidRange => ErrorKind::Validation,
            ReportError::Storage => ErrorKind::Store,
        }
    }
}

impl From<SalesError> for ReportError {
    fn from(value: SalesError) -> Self {
        match value {
            SalesError::InvalidRange => ReportError::InvalidRange,
            SalesError::Storage => ReportError::Storage,
        }
    }
}

impl From<QueryGamesError> for ReportError {
    fn from(_: QueryGamesError) -> Self {
        ReportError::Storage
    }
}
