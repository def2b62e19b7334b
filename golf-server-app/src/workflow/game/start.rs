use std::sync::Arc;

use thiserror::Error;

use crate::domain::{
    ErrorKind, PlayerId, RepoRetrieveError,
    demo::DemoRegistry,
    game::{CreateGameError, Game, GameLedger, NewGame},
    player::PlayerRepository,
};

#[derive(Debug, Clone)]
pub struct StartGame {
    pub player_id: PlayerId,
    pub player_names: Vec<String>,
    pub player_count: i64,
    pub is_weekend: bool,
}

#[derive(Debug, Error)]
pub enum StartGameError {
    #[error("player not found")]
    PlayerNotFound,
    #[error(transparent)]
    Create(#[from] CreateGameError),
    #[error("storage error")]
    Storage,
}

impl StartGameError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            StartGameError::PlayerNotFound => ErrorKind::NotFound,
            StartGameError::Create(e) => e.kind(),
            StartGameError::Storage => ErrorKind::Store,
        }
    }
}

#[async_trait::async_trait]
pub trait StartGameUseCase {
    async fn start_game(&self, request: StartGame) -> Result<Game, StartGameError>;
}

pub struct StartGameUseCaseImpl<P: PlayerRepository, D: DemoRegistry, L: GameLedger> {
    player_repository: Arc<P>,
    demo_registry: Arc<D>,
    game_ledger: Arc<L>,
}

impl<P: PlayerRepository, D: DemoRegistry, L: GameLedger> StartGameUseCaseImpl<P, D, L> {
    pub fn new(player_repository: Arc<P>, demo_registry: Arc<D>, game_ledger: Arc<L>) -> Self {
        Self {
            player_repository,
            demo_registry,
            game_ledger,
        }
    }
}

#[async_trait::async_trait]
impl<
    P: PlayerRepository + Send + Sync + 'static,
    D: DemoRegistry + Send + Sync + 'static,
    L: GameLedger + Send + Sync + 'static,
> StartGameUseCase for StartGameUseCaseImpl<P, D, L>
{
    async fn start_game(&self, request: StartGame) -> Result<Game, StartGameError> {
        let player = match self.player_repository.get_player(request.player_id).await {
            Ok(player) => player,
            Err(RepoRetrieveError::NotFound) => return Err(StartGameError::PlayerNotFound),
            Err(RepoRetrieveError::StorageError(e)) => {
                log::error!("Failed to load player {}: {}", request.player_id, e);
                return Err(StartGameError::Storage);
            }
        };
        // demo status is frozen into the game row
        let is_demo_game = self
            .demo_registry
            .is_demo(&player.contact)
            .await
            .map_err(|_| StartGameError::Storage)?;

        let game = self
            .game_ledger
            .create_game(NewGame {
                player_id: player.id,
                player_names: request.player_names,
                player_count: request.player_count,
                is_weekend: request.is_weekend,
                is_demo_game,
            })
            .await?;
        Ok(game)
    }
}
