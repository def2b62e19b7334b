use axum::{
    Json,
    extract::{Path, State},
};
use chrono::{DateTime, Utc};
use golf_server_app::domain::{DemoNumberId, demo::DemoPhoneNumber};

use crate::{AdminSession, AppState, ServiceError};

#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct JsonNewDemoNumber {
    phone_number: String,
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonDemoNumber {
    id: String,
    phone_number: String,
    added_at: DateTime<Utc>,
}

impl From<DemoPhoneNumber> for JsonDemoNumber {
    fn from(entry: DemoPhoneNumber) -> Self {
        JsonDemoNumber {
            id: entry.id.to_string(),
            phone_number: entry.phone_number,
            added_at: entry.added_at,
        }
    }
}

pub async fn list(
    State(app_state): State<AppState>,
    _session: AdminSession,
) -> Result<Json<Vec<JsonDemoNumber>>, ServiceError> {
    let entries = app_state.app.demo_registry.list().await?;
    Ok(Json(entries.into_iter().map(Into::into).collect()))
}

pub async fn add(
    State(app_state): State<AppState>,
    _session: AdminSession,
    Json(body): Json<JsonNewDemoNumber>,
) -> Result<Json<JsonDemoNumber>, ServiceError> {
    let entry = app_state.app.demo_registry.add(&body.phone_number).await?;
    Ok(Json(entry.into()))
}

pub async fn remove(
    State(app_state): State<AppState>,
    _session: AdminSession,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let id = DemoNumberId::parse(&id)
        .ok_or_else(|| ServiceError::NotFound("demo number not found".to_string()))?;
    app_state.app.demo_registry.remove(id).await?;
    Ok(Json(serde_json::json!({ "message": "Demo number removed" })))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::test_support::server;

    #[tokio::test]
    async fn test_demo_number_management() {
        let server = server().await;
        let cookie = server.login().await;

        let (status, entry) = server
            .json(
                "POST",
                "/api/admin/demo-numbers",
                Some(cookie.as_str()),
                Some(json!({ "phoneNumber": "+91 80159-89208" })),
            )
            .await;
        assert_eq!(status, 200);
        assert_eq!(entry["phoneNumber"], "8015989208");

        let (status, again) = server
            .json(
                "POST",
                "/api/admin/demo-numbers",
                Some(cookie.as_str()),
                Some(json!({ "phoneNumber": "80159 89208" })),
            )
            .await;
        assert_eq!(status, 200);
        assert_eq!(again["id"], entry["id"]);

        let (status, list) = server
            .json("GET", "/api/admin/demo-numbers", Some(cookie.as_str()), None)
            .await;
        assert_eq!(status, 200);
        assert_eq!(list.as_array().unwrap().len(), 1);

        let uri = format!("/api/admin/demo-numbers/{}", entry["id"].as_str().unwrap());
        let (status, _) = server.json("DELETE", &uri, Some(cookie.as_str()), None).await;
        assert_eq!(status, 200);
        let (status, _) = server.json("DELETE", &uri, Some(cookie.as_str()), None).await;
        assert_eq!(status, 404);
    }

    #[tokio::test]
    async fn test_demo_number_without_digits() {
        let server = server().await;
        let cookie = server.login().await;
        let (status, _) = server
            .json(
                "POST",
                "/api/admin/demo-numbers",
                Some(cookie.as_str()),
                Some(json!({ "phoneNumber": "n/a" })),
            )
            .await;
        assert_eq!(status, 400);
    }

    #[tokio::test]
    async fn test_demo_player_games_are_flagged() {
        let server = server().await;
        let cookie = server.login().await;
        server.set_rate(&cookie, "60.00", "80.00").await;
        server
            .json(
                "POST",
                "/api/admin/demo-numbers",
                Some(cookie.as_str()),
                Some(json!({ "phoneNumber": "8015989208" })),
            )
            .await;
        let player_id = server.register_player("Tester", "80159 89208").await;

        let (status, game) = server
            .json(
                "POST",
                "/api/games",
                None,
                Some(json!({
                    "playerId": player_id,
                    "playerNames": ["Tester"],
                    "playerCount": 1,
                    "isWeekend": false,
                })),
            )
            .await;
        assert_eq!(status, 200);
        assert_eq!(game["isDemoGame"], true);

        let (_, stats) = server
            .json("GET", "/api/admin/dashboard-stats", Some(cookie.as_str()), None)
            .await;
        assert_eq!(stats["todayGames"], 0);
    }
}
