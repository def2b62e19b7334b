use axum::{http::StatusCode, response::IntoResponse};
use golf_server_app::{
    domain::{
        ErrorKind,
        demo::DemoNumberError,
        game::{AppendScoresError, CreateGameError, GetGameError, QueryGamesError},
        rate::{GetRateError, SetRateError},
    },
    workflow::{
        admin::{get_admin::GetAdminError, login::AdminLoginError},
        game::start::StartGameError,
        player::register::RegisterPlayerError,
        reporting::ReportError,
    },
};

const INTERNAL_MESSAGE: &str = "Internal server error";

#[derive(Debug)]
pub enum ServiceError {
    NotFound(String),
    Unauthorized(String),
    BadRequest(String),
    Internal(String),
}

impl ServiceError {
    pub fn from_kind(kind: ErrorKind, msg: String) -> Self {
        match kind {
            ErrorKind::Validation | ErrorKind::Conflict => ServiceError::BadRequest(msg),
            ErrorKind::NotFound => ServiceError::NotFound(msg),
            ErrorKind::Configuration => ServiceError::Internal(msg),
            ErrorKind::Store => ServiceError::Internal(INTERNAL_MESSAGE.to_string()),
        }
    }
}

impl std::fmt::Display for ServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServiceError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ServiceError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ServiceError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ServiceError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> axum::http::Response<axum::body::Body> {
        let (status, msg) = match self {
            ServiceError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ServiceError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            ServiceError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ServiceError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };
        let body = serde_json::json!({ "message": msg });
        (status, axum::Json(body)).into_response()
    }
}

macro_rules! classified {
    ($($error:ty),* $(,)?) => {
        $(
            impl From<$error> for ServiceError {
                fn from(e: $error) -> Self {
                    ServiceError::from_kind(e.kind(), e.to_string())
                }
            }
        )*
    };
}

classified!(
    RegisterPlayerError,
    StartGameError,
    CreateGameError,
    AppendScoresError,
    GetGameError,
    GetRateError,
    SetRateError,
    DemoNumberError,
    AdminLoginError,
    GetAdminError,
    ReportError,
);

impl From<QueryGamesError> for ServiceError {
    fn from(_: QueryGamesError) -> Self {
        ServiceError::Internal(INTERNAL_MESSAGE.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_errors_hide_details() {
        let err = ServiceError::from_kind(ErrorKind::Store, "disk I/O error".to_string());
        assert!(matches!(err, ServiceError::Internal(msg) if msg == INTERNAL_MESSAGE));
    }

    #[test]
    fn test_kind_to_status() {
        let status = |kind| {
            ServiceError::from_kind(kind, "x".to_string())
                .into_response()
                .status()
        };
        assert_eq!(status(ErrorKind::Validation), StatusCode::BAD_REQUEST);
        assert_eq!(status(ErrorKind::Conflict), StatusCode::BAD_REQUEST);
        assert_eq!(status(ErrorKind::NotFound), StatusCode::NOT_FOUND);
        assert_eq!(
            status(ErrorKind::Configuration),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(status(ErrorKind::Store), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
