use axum::{
    Json,
    extract::State,
    http::header::SET_COOKIE,
    response::{AppendHeaders, IntoResponse},
};
use golf_server_app::{
    domain::admin::AdminUser,
    workflow::admin::{get_admin::GetAdminError, login::AdminLoginError},
};
use log::info;

use crate::{AdminSession, AppState, ServiceError};

#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct JsonLogin {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminIdentity {
    id: String,
    username: String,
}

impl From<AdminUser> for AdminIdentity {
    fn from(admin: AdminUser) -> Self {
        AdminIdentity {
            id: admin.id.to_string(),
            username: admin.username,
        }
    }
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    message: &'static str,
    user: AdminIdentity,
}

pub async fn login(
    State(app_state): State<AppState>,
    Json(body): Json<JsonLogin>,
) -> Result<impl IntoResponse, ServiceError> {
    let username = body.username.trim();
    if username.is_empty() || body.password.is_empty() {
        return Err(ServiceError::BadRequest(
            "Username and password required".to_string(),
        ));
    }
    let admin = app_state
        .app
        .admin_login_use_case
        .login(username, &body.password)
        .await
        .map_err(|e| match e {
            AdminLoginError::InvalidCredentials => {
                ServiceError::Unauthorized("Invalid credentials".to_string())
            }
            e => e.into(),
        })?;

    let token = app_state.sessions.create(admin.id);
    Ok((
        AppendHeaders([(SET_COOKIE, app_state.sessions.session_cookie(&token))]),
        Json(LoginResponse {
            message: "Login successful",
            user: admin.into(),
        }),
    ))
}

pub async fn logout(
    State(app_state): State<AppState>,
    session: AdminSession,
) -> impl IntoResponse {
    app_state.sessions.destroy(&session.token);
    info!("Admin {} logged out", session.admin_id);
    (
        AppendHeaders([(SET_COOKIE, app_state.sessions.expired_cookie())]),
        Json(serde_json::json!({ "message": "Logout successful" })),
    )
}

pub async fn me(
    State(app_state): State<AppState>,
    session: AdminSession,
) -> Result<Json<AdminIdentity>, ServiceError> {
    let admin = app_state
        .app
        .admin_get_use_case
        .get_admin(session.admin_id)
        .await
        .map_err(|e| match e {
            GetAdminError::NotFound => ServiceError::NotFound("User not found".to_string()),
            e => e.into(),
        })?;
    Ok(Json(admin.into()))
}
