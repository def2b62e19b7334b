use axum::{
    Json,
    extract::{Path, State},
};
use chrono::{DateTime, Utc};
use golf_server_app::{
    domain::{
        GameId, PlayerId,
        game::{Game, Score, ScoreEntry, Scorecard},
    },
    workflow::game::start::StartGame,
};
use rust_decimal::Decimal;

use crate::{AppState, ServiceError};

#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct JsonNewGame {
    player_id: String,
    player_names: Vec<String>,
    player_count: i64,
    is_weekend: bool,
}

#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct JsonScoreEntry {
    player_name: String,
    #[serde(default)]
    hole: Option<u32>,
    strokes: i32,
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonGame {
    id: String,
    player_id: String,
    player_names: Vec<String>,
    player_count: u32,
    total_cost: Decimal,
    is_weekend: bool,
    is_demo_game: bool,
    completed_at: DateTime<Utc>,
}

impl From<Game> for JsonGame {
    fn from(game: Game) -> Self {
        JsonGame {
            id: game.id.to_string(),
            player_id: game.player_id.to_string(),
            player_names: game.player_names,
            player_count: game.player_count,
            total_cost: game.total_cost,
            is_weekend: game.is_weekend,
            is_demo_game: game.is_demo_game,
            completed_at: game.completed_at,
        }
    }
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonScore {
    id: String,
    game_id: String,
    player_name: String,
    hole: u32,
    strokes: i32,
}

impl From<Score> for JsonScore {
    fn from(score: Score) -> Self {
        JsonScore {
            id: score.id.to_string(),
            game_id: score.game_id.to_string(),
            player_name: score.player_name,
            hole: score.hole,
            strokes: score.strokes,
        }
    }
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonPlayerTotal {
    player_name: String,
    total_strokes: i64,
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonScorecard {
    #[serde(flatten)]
    game: JsonGame,
    scores: Vec<JsonScore>,
    totals: Vec<JsonPlayerTotal>,
}

impl From<Scorecard> for JsonScorecard {
    fn from(scorecard: Scorecard) -> Self {
        JsonScorecard {
            game: scorecard.game.into(),
            scores: scorecard.scores.into_iter().map(Into::into).collect(),
            totals: scorecard
                .totals
                .into_iter()
                .map(|(player_name, total_strokes)| JsonPlayerTotal {
                    player_name,
                    total_strokes,
                })
                .collect(),
        }
    }
}

fn parse_game_id(id: &str) -> Result<GameId, ServiceError> {
    GameId::parse(id).ok_or_else(|| ServiceError::NotFound("game not found".to_string()))
}

pub async fn create(
    State(app_state): State<AppState>,
    Json(body): Json<JsonNewGame>,
) -> Result<Json<JsonGame>, ServiceError> {
    let player_id = PlayerId::parse(&body.player_id)
        .ok_or_else(|| ServiceError::NotFound("player not found".to_string()))?;
    let game = app_state
        .app
        .game_start_use_case
        .start_game(StartGame {
            player_id,
            player_names: body.player_names,
            player_count: body.player_count,
            is_weekend: body.is_weekend,
        })
        .await?;
    Ok(Json(game.into()))
}

pub async fn append_scores(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<Vec<JsonScoreEntry>>,
) -> Result<Json<Vec<JsonScore>>, ServiceError> {
    let game_id = parse_game_id(&id)?;
    let entries = body
        .into_iter()
        .map(|entry| ScoreEntry {
            player_name: entry.player_name,
            hole: entry.hole,
            strokes: entry.strokes,
        })
        .collect();
    let scores = app_state
        .app
        .game_ledger
        .append_scores(game_id, entries)
        .await?;
    Ok(Json(scores.into_iter().map(Into::into).collect()))
}

pub async fn get_by_id(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<JsonScorecard>, ServiceError> {
    let game_id = parse_game_id(&id)?;
    let scorecard = app_state.app.game_ledger.get_scorecard(game_id).await?;
    Ok(Json(scorecard.into()))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::test_support::server;

    #[tokio::test]
    async fn test_game_requires_configured_rate() {
        let server = server().await;
        let player_id = server.register_player("Asha", "8015989208").await;
        let (status, body) = server
            .json(
                "POST",
                "/api/games",
                None,
                Some(json!({
                    "playerId": player_id,
                    "playerNames": ["Asha", "Ravi"],
                    "playerCount": 2,
                    "isWeekend": false,
                })),
            )
            .await;
        assert_eq!(status, 500);
        assert_eq!(body["message"], "pricing has not been configured");
    }

    #[tokio::test]
    async fn test_create_game_scores_and_read_back() {
        let server = server().await;
        let cookie = server.login().await;
        server.set_rate(&cookie, "60.00", "80.00").await;
        let player_id = server.register_player("Asha", "8015989208").await;

        let (status, game) = server
            .json(
                "POST",
                "/api/games",
                None,
                Some(json!({
                    "playerId": player_id,
                    "playerNames": ["Asha", "Ravi", "Meera"],
                    "playerCount": 3,
                    "isWeekend": true,
                })),
            )
            .await;
        assert_eq!(status, 200);
        assert_eq!(game["totalCost"], "240.00");
        assert_eq!(game["isDemoGame"], false);
        let game_id = game["id"].as_str().unwrap().to_string();

        let (status, scores) = server
            .json(
                "POST",
                &format!("/api/games/{}/scores", game_id),
                None,
                Some(json!([
                    { "playerName": "Asha", "hole": 1, "strokes": 3 },
                    { "playerName": "ravi", "hole": 1, "strokes": 4 },
                    { "playerName": "Asha", "hole": 2, "strokes": 2 },
                ])),
            )
            .await;
        assert_eq!(status, 200);
        assert_eq!(scores.as_array().unwrap().len(), 3);

        let (status, scorecard) = server
            .json("GET", &format!("/api/games/{}", game_id), None, None)
            .await;
        assert_eq!(status, 200);
        assert_eq!(scorecard["id"], game_id.as_str());
        assert_eq!(scorecard["scores"].as_array().unwrap().len(), 3);
        let asha = scorecard["totals"]
            .as_array()
            .unwrap()
            .iter()
            .find(|t| t["playerName"] == "Asha")
            .unwrap();
        assert_eq!(asha["totalStrokes"], 5);
    }

    #[tokio::test]
    async fn test_scores_posted_hole_by_hole() {
        let server = server().await;
        let cookie = server.login().await;
        server.set_rate(&cookie, "60.00", "80.00").await;
        let player_id = server.register_player("Asha", "8015989208").await;

        let (_, game) = server
            .json(
                "POST",
                "/api/games",
                None,
                Some(json!({
                    "playerId": player_id,
                    "playerNames": ["Asha", "Ben"],
                    "playerCount": 2,
                    "isWeekend": false,
                })),
            )
            .await;
        let scores_uri = format!("/api/games/{}/scores", game["id"].as_str().unwrap());

        let batches = [
            json!([
                { "playerName": "Asha", "hole": 1, "strokes": 3 },
                { "playerName": "Ben", "hole": 1, "strokes": 2 },
            ]),
            json!([
                { "playerName": "Asha", "hole": 2, "strokes": 4 },
                { "playerName": "Ben", "hole": 2, "strokes": 3 },
            ]),
        ];
        for batch in batches {
            let (status, _) = server.json("POST", &scores_uri, None, Some(batch)).await;
            assert_eq!(status, 200);
        }

        let (status, body) = server
            .json(
                "POST",
                &scores_uri,
                None,
                Some(json!([{ "playerName": "Ben", "hole": 3, "strokes": -6 }])),
            )
            .await;
        assert_eq!(status, 400);
        assert_eq!(
            body["message"],
            "total strokes for Ben must not be negative, got -1"
        );

        let (_, scorecard) = server
            .json("GET", &format!("/api/games/{}", game["id"].as_str().unwrap()), None, None)
            .await;
        assert_eq!(scorecard["scores"].as_array().unwrap().len(), 4);
        assert_eq!(scorecard["totals"][0]["totalStrokes"], 7);
        assert_eq!(scorecard["totals"][1]["totalStrokes"], 5);
    }

    #[tokio::test]
    async fn test_invalid_games_are_rejected() {
        let server = server().await;
        let cookie = server.login().await;
        server.set_rate(&cookie, "60.00", "80.00").await;
        let player_id = server.register_player("Asha", "8015989208").await;

        let cases = [
            json!({ "playerId": player_id, "playerNames": ["Asha"], "playerCount": 0, "isWeekend": false }),
            json!({ "playerId": player_id, "playerNames": ["Asha"], "playerCount": 2, "isWeekend": false }),
            json!({ "playerId": player_id, "playerNames": ["Asha", "asha"], "playerCount": 2, "isWeekend": false }),
        ];
        for case in cases {
            let (status, _) = server.json("POST", "/api/games", None, Some(case)).await;
            assert_eq!(status, 400);
        }

        let (status, _) = server
            .json(
                "POST",
                "/api/games",
                None,
                Some(json!({
                    "playerId": "00000000-0000-0000-0000-000000000000",
                    "playerNames": ["Asha"],
                    "playerCount": 1,
                    "isWeekend": false,
                })),
            )
            .await;
        assert_eq!(status, 404);
    }

    #[tokio::test]
    async fn test_unknown_game() {
        let server = server().await;
        let (status, _) = server.json("GET", "/api/games/not-a-uuid", None, None).await;
        assert_eq!(status, 404);
        let (status, _) = server
            .json(
                "POST",
                "/api/games/00000000-0000-0000-0000-000000000000/scores",
                None,
                Some(json!([{ "playerName": "Asha", "strokes": 3 }])),
            )
            .await;
        assert_eq!(status, 404);
    }
}
