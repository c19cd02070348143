//! Demo profile endpoints (the local-storage path) and the follow toggle.

use crate::error::ApiError;
use crate::AppState;
use axum::extract::{Path, State};
use axum::Json;
use blueprint_core::User;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// GET /api/profile — returns the stored profile, creating the default
/// demo user on first call.
pub async fn get_profile(State(state): State<AppState>) -> Result<Json<User>, ApiError> {
    let user = state.profile.load_or_create_user()?;
    Ok(Json(user))
}

/// PUT /api/profile — full-object rewrite, matching the local-storage
/// contract. The stored id is preserved; a mismatched id is rejected.
pub async fn put_profile(
    State(state): State<AppState>,
    Json(user): Json<User>,
) -> Result<Json<User>, ApiError> {
    let existing = state.profile.load_or_create_user()?;
    if existing.id != user.id {
        return Err(ApiError::bad_request("프로필 id가 일치하지 않습니다"));
    }
    state.profile.save_user(&user)?;
    Ok(Json(user))
}

// ============================================================================
// POST /api/users/{id}/follow
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowRequest {
    pub follower_id: Uuid,
    pub following: bool,
}

#[derive(Debug, Serialize)]
pub struct FollowResponse {
    pub following: bool,
}

pub async fn follow(
    State(state): State<AppState>,
    Path(followee): Path<Uuid>,
    Json(req): Json<FollowRequest>,
) -> Result<Json<FollowResponse>, ApiError> {
    if req.follower_id == followee {
        return Err(ApiError::bad_request("자기 자신은 팔로우할 수 없습니다"));
    }
    let following = state
        .users
        .set_follow(req.follower_id, followee, req.following)
        .await?;
    Ok(Json(FollowResponse { following }))
}
