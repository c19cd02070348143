//! Admin endpoints.

use crate::AppState;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use blueprint_store::migrate_profile_data;
use serde_json::{json, Value};

/// POST /api/admin/migrate — import the file-backed demo data into the
/// database. Idempotent; a second run imports nothing. Guarded by a
/// bearer token when one is configured.
pub async fn migrate(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    if let Some(token) = &state.admin_token {
        let expected = format!("Bearer {}", token);
        let authorized = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(|v| v == expected)
            .unwrap_or(false);
        if !authorized {
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "success": false, "error": "관리자 인증이 필요합니다" })),
            );
        }
    }

    match migrate_profile_data(
        state.profile.as_ref(),
        state.users.as_ref(),
        state.blueprints.as_ref(),
    )
    .await
    {
        Ok(report) => (
            StatusCode::OK,
            Json(json!({ "success": true, "message": report.message() })),
        ),
        Err(e) => {
            tracing::error!("Migration failed: {:#}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "success": false, "error": "데이터 이전에 실패했습니다" })),
            )
        }
    }
}
