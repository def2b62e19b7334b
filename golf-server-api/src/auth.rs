use std::time::Duration;

use axum::{RequestPartsExt, extract::FromRequestParts, http::request::Parts};
use axum_extra::{TypedHeader, headers::Cookie};
use golf_server_app::domain::AdminId;
use uuid::Uuid;

use crate::{AppState, ServiceError};

pub const SESSION_COOKIE: &str = "golf_session";

/// Server-side admin sessions keyed by an opaque cookie token.
pub struct SessionStore {
    sessions: moka::sync::Cache<Uuid, AdminId>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: moka::sync::Cache::builder().time_to_live(ttl).build(),
            ttl,
        }
    }

    pub fn create(&self, admin_id: AdminId) -> Uuid {
        let token = Uuid::new_v4();
        self.sessions.insert(token, admin_id);
        token
    }

    pub fn get(&self, token: &Uuid) -> Option<AdminId> {
        self.sessions.get(token)
    }

    pub fn destroy(&self, token: &Uuid) {
        self.sessions.invalidate(token);
    }

    pub fn session_cookie(&self, token: &Uuid) -> String {
        format!(
            "{}={}; HttpOnly; Path=/; SameSite=Lax; Max-Age={}",
            SESSION_COOKIE,
            token,
            self.ttl.as_secs()
        )
    }

    pub fn expired_cookie(&self) -> String {
        format!("{}=; HttpOnly; Path=/; SameSite=Lax; Max-Age=0", SESSION_COOKIE)
    }
}

pub struct AdminSession {
    pub token: Uuid,
    pub admin_id: AdminId,
}

fn unauthorized() -> ServiceError {
    ServiceError::Unauthorized("Authentication required".to_string())
}

impl FromRequestParts<AppState> for AdminSession {
    type Rejection = ServiceError;

    async fn from_request_parts(
        parts: &mut Parts,
        app: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let TypedHeader(cookie) = parts
            .extract::<TypedHeader<Cookie>>()
            .await
            .map_err(|_| unauthorized())?;
        let token = cookie
            .get(SESSION_COOKIE)
            .and_then(|value| Uuid::parse_str(value).ok())
            .ok_or_else(unauthorized)?;
        let admin_id = app.sessions.get(&token).ok_or_else(unauthorized)?;
        Ok(AdminSession { token, admin_id })
    }
}
