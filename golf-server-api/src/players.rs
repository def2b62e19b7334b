use axum::{Json, extract::State};
use chrono::{DateTime, Utc};
use golf_server_app::{domain::player::Player, workflow::player::register::RegisterPlayer};

use crate::{AppState, ServiceError};

#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct JsonRegisterPlayer {
    name: String,
    contact: String,
    #[serde(default)]
    email: Option<String>,
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonPlayer {
    id: String,
    name: String,
    contact: String,
    email: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<Player> for JsonPlayer {
    fn from(player: Player) -> Self {
        JsonPlayer {
            id: player.id.to_string(),
            name: player.name,
            contact: player.contact,
            email: player.email,
            created_at: player.created_at,
        }
    }
}

pub async fn register(
    State(app_state): State<AppState>,
    Json(body): Json<JsonRegisterPlayer>,
) -> Result<Json<JsonPlayer>, ServiceError> {
    let player = app_state
        .app
        .player_register_use_case
        .register_player(RegisterPlayer {
            name: body.name,
            contact: body.contact,
            email: body.email,
        })
        .await?;
    Ok(Json(player.into()))
}
