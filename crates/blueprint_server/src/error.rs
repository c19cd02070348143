//! API error taxonomy.
//!
//! Validation problems answer 400 with a message the UI can show as-is;
//! upstream failures are logged in full and answered with a generic 500.
//! AI-layer errors map to distinct statuses instead of the original's
//! error-message substring sniffing.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use blueprint_ai::AiError;
use serde_json::json;

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Unauthorized(String),
    NotFound(String),
    RateLimited(String),
    Internal(anyhow::Error),
}

impl ApiError {
    pub fn bad_request(msg: &str) -> Self {
        ApiError::BadRequest(msg.to_string())
    }

    pub fn not_found(msg: &str) -> Self {
        ApiError::NotFound(msg.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::RateLimited(msg) => (StatusCode::TOO_MANY_REQUESTS, msg),
            ApiError::Internal(err) => {
                tracing::error!("Internal error: {:#}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "요청 처리 중 오류가 발생했습니다".to_string(),
                )
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::Internal(err)
    }
}

impl From<AiError> for ApiError {
    fn from(err: AiError) -> Self {
        match err {
            AiError::MissingApiKey => ApiError::Unauthorized(err.to_string()),
            AiError::RateLimited => ApiError::RateLimited(err.to_string()),
            AiError::EmptyInput => ApiError::BadRequest(err.to_string()),
            AiError::Upstream(inner) => ApiError::Internal(inner),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ai_error_status_mapping() {
        assert!(matches!(
            ApiError::from(AiError::MissingApiKey),
            ApiError::Unauthorized(_)
        ));
        assert!(matches!(
            ApiError::from(AiError::RateLimited),
            ApiError::RateLimited(_)
        ));
        assert!(matches!(
            ApiError::from(AiError::EmptyInput),
            ApiError::BadRequest(_)
        ));
        assert!(matches!(
            ApiError::from(AiError::Upstream(anyhow::anyhow!("boom"))),
            ApiError::Internal(_)
        ));
    }
}
