use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Sqlx(#[from] sqlx::Error),
    #[error("password hashing error: {0}")]
    PasswordHash(#[from] argon2::password_hash::Error),
    #[error("token error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
    #[error("{0}")]
    Json(#[from] JsonRejection),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("not authenticated")]
    LoginFail,
    #[error("not authenticated")]
    Unauthenticated,
    #[error("method not allowed {0}")]
    MethodNotAllowed(String),
    #[error("{0}")]
    Config(String),
    /// Auth gate denial; the message is one of a fixed set of generic bodies.
    #[error("{0}")]
    Forbidden(&'static str),
}

impl AppError {
    pub const PERMISSION_DENIED: AppError = AppError::Forbidden("permission denied");
    pub const INVALID_TOKEN: AppError = AppError::Forbidden("invalid token");
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Sqlx(e) => {
                tracing::error!("Database error: {}", e);
                StatusCode::BAD_REQUEST
            }
            AppError::PasswordHash(e) => {
                tracing::error!("Password hashing error: {}", e);
                StatusCode::BAD_REQUEST
            }
            AppError::Jwt(e) => {
                tracing::error!("JWT error: {}", e);
                StatusCode::BAD_REQUEST
            }
            _ => StatusCode::BAD_REQUEST,
        };

        let body = Json(json!({
            "error": self.to_string(),
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_of(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn handler_errors_are_bad_request() {
        let (status, body) = body_of(AppError::NotFound("account 7 not found".into())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "account 7 not found" }));

        let (status, body) = body_of(AppError::MethodNotAllowed("PUT".into())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "method not allowed PUT");
    }

    #[tokio::test]
    async fn gate_denials_are_forbidden() {
        let (status, body) = body_of(AppError::PERMISSION_DENIED).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body, json!({ "error": "permission denied" }));

        let (status, body) = body_of(AppError::INVALID_TOKEN).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body, json!({ "error": "invalid token" }));
    }
}
