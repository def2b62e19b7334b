use std::sync::Arc;

use thiserror::Error;
use validator::Validate;

use crate::{
    domain::{
        ErrorKind, PlayerId, RepoCreateError,
        player::{Player, PlayerRepository},
    },
    ports::clock::Clock,
};

#[derive(Debug, Clone)]
pub struct RegisterPlayer {
    pub name: String,
    pub contact: String,
    pub email: Option<String>,
}

#[derive(Validate)]
struct EmailValidator {
    #[validate(email)]
    email: String,
}

#[derive(Debug, Error)]
pub enum RegisterPlayerError {
    #[error("name is required")]
    MissingName,
    #[error("contact number is required")]
    MissingContact,
    #[error("invalid email address")]
    InvalidEmail,
    #[error("storage error")]
    Storage,
}

impl RegisterPlayerError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RegisterPlayerError::Storage => ErrorKind::Store,
            _ => ErrorKind::Validation,
        }
    }
}

#[async_trait::async_trait]
pub trait RegisterPlayerUseCase {
    async fn register_player(&self, request: RegisterPlayer)
    -> Result<Player, RegisterPlayerError>;
}

pub struct RegisterPlayerUseCaseImpl<P: PlayerRepository, C: Clock> {
    player_repository: Arc<P>,
    clock: Arc<C>,
}

impl<P: PlayerRepository, C: Clock> RegisterPlayerUseCaseImpl<P, C> {
    pub fn new(player_repository: Arc<P>, clock: Arc<C>) -> Self {
        Self {
            player_repository,
            clock,
        }
    }
}

fn validate_email(email: Option<String>) -> Result<Option<String>, RegisterPlayerError> {
    let Some(email) = email.map(|e| e.trim().to_string()) else {
        return Ok(None);
    };
    if email.is_empty() {
        return Ok(None);
    }
    let validator = EmailValidator { email };
    if validator.validate().is_err() {
        return Err(RegisterPlayerError::InvalidEmail);
    }
    Ok(Some(validator.email))
}

#[async_trait::async_trait]
impl<P: PlayerRepository + Send + Sync + 'static, C: Clock + Send + Sync + 'static>
    RegisterPlayerUseCase for RegisterPlayerUseCaseImpl<P, C>
{
    async fn register_player(
        &self,
        request: RegisterPlayer,
    ) -> Result<Player, RegisterPlayerError> {
        let name = request.name.trim();
        if name.is_empty() {
            return Err(RegisterPlayerError::MissingName);
        }
        let contact = request.contact.trim();
        if contact.is_empty() {
            return Err(RegisterPlayerError::MissingContact);
        }
        let email = validate_email(request.email)?;

        let player = Player {
            id: PlayerId::new(),
            name: name.to_string(),
            contact: contact.to_string(),
            email,
            created_at: self.clock.now(),
        };
        match self.player_repository.create_player(&player).await {
            Ok(()) => Ok(player),
            Err(RepoCreateError::Conflict) => {
                log::error!("Player id collision for {}", player.id);
                Err(RegisterPlayerError::Storage)
            }
            Err(RepoCreateError::StorageError(e)) => {
                log::error!("Failed to store player: {}", e);
                Err(RegisterPlayerError::Storage)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        ports::clock::FixedClock,
        test_support::{InMemoryStore, at},
    };

    fn use_case() -> (
        Arc<InMemoryStore>,
        RegisterPlayerUseCaseImpl<InMemoryStore, FixedClock>,
    ) {
        let store = Arc::new(InMemoryStore::new());
        let clock = Arc::new(FixedClock::new(at("2025-03-14T10:00:00Z")));
        (store.clone(), RegisterPlayerUseCaseImpl::new(store, clock))
    }

    fn request(name: &str, contact: &str, email: Option<&str>) -> RegisterPlayer {
        RegisterPlayer {
            name: name.to_string(),
            contact: contact.to_string(),
            email: email.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_register_player() {
        let (store, use_case) = use_case();
        let player = use_case
            .register_player(request(" Asha ", "+91 80159-89208", Some(" asha@example.com ")))
            .await
            .unwrap();
        assert_eq!(player.name, "Asha");
        assert_eq!(player.contact, "+91 80159-89208");
        assert_eq!(player.email.as_deref(), Some("asha@example.com"));
        assert_eq!(player.created_at, at("2025-03-14T10:00:00Z"));
        assert_eq!(store.get_player(player.id).await.unwrap(), player);
    }

    #[tokio::test]
    async fn test_blank_email_is_dropped() {
        let (_, use_case) = use_case();
        let player = use_case
            .register_player(request("Ben", "9999999999", Some("  ")))
            .await
            .unwrap();
        assert_eq!(player.email, None);
    }

    #[tokio::test]
    async fn test_register_player_validation() {
        let (_, use_case) = use_case();
        assert!(matches!(
            use_case.register_player(request("  ", "1", None)).await,
            Err(RegisterPlayerError::MissingName)
        ));
        assert!(matches!(
            use_case.register_player(request("Ben", "", None)).await,
            Err(RegisterPlayerError::MissingContact)
        ));
        let err = use_case
            .register_player(request("Ben", "1", Some("not-an-email")))
            .await
            .unwrap_err();
        assert!(matches!(err, RegisterPlayerError::InvalidEmail));
        assert_eq!(err.kind(), ErrorKind::Validation);
    }
}
