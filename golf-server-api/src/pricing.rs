use axum::{Json, extract::State};
use chrono::{DateTime, Utc};
use golf_server_app::domain::rate::{GetRateError, Rate};
use rust_decimal::Decimal;

use crate::{AdminSession, AppState, ServiceError};

#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct JsonSetRate {
    weekday_price: Decimal,
    weekend_price: Decimal,
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonRate {
    id: String,
    weekday_price: Decimal,
    weekend_price: Decimal,
    updated_at: DateTime<Utc>,
    updated_by: String,
}

impl From<Rate> for JsonRate {
    fn from(rate: Rate) -> Self {
        JsonRate {
            id: rate.id.to_string(),
            weekday_price: rate.prices.weekday_price,
            weekend_price: rate.prices.weekend_price,
            updated_at: rate.updated_at,
            updated_by: rate.updated_by.to_string(),
        }
    }
}

pub async fn current_rate(
    State(app_state): State<AppState>,
) -> Result<Json<JsonRate>, ServiceError> {
    match app_state.app.rate_table.get_current_rate().await {
        Ok(rate) => Ok(Json(rate.into())),
        Err(GetRateError::NoRateConfigured) => {
            Err(ServiceError::NotFound("Pricing not found".to_string()))
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn set_rate(
    State(app_state): State<AppState>,
    session: AdminSession,
    Json(body): Json<JsonSetRate>,
) -> Result<Json<JsonRate>, ServiceError> {
    let rate = app_state
        .app
        .rate_table
        .set_rate(body.weekday_price, body.weekend_price, session.admin_id)
        .await?;
    Ok(Json(rate.into()))
}

pub async fn rate_history(
    State(app_state): State<AppState>,
    _session: AdminSession,
) -> Result<Json<Vec<JsonRate>>, ServiceError> {
    let history = app_state.app.rate_table.get_rate_history().await?;
    Ok(Json(history.into_iter().map(Into::into).collect()))
}
