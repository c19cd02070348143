//! Community gallery endpoints.

use crate::error::ApiError;
use crate::AppState;
use axum::extract::{Path, Query, State};
use axum::Json;
use blueprint_store::{CommunityPage, CommunityQuery, SortKey};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// GET /api/community/goals
// ============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct GoalsParams {
    pub category: Option<String>,
    pub sort: Option<String>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

pub async fn list_goals(
    State(state): State<AppState>,
    Query(params): Query<GoalsParams>,
) -> Result<Json<CommunityPage>, ApiError> {
    let sort = match params.sort.as_deref() {
        None => SortKey::default(),
        Some(raw) => SortKey::parse_str(raw)
            .ok_or_else(|| ApiError::BadRequest(format!("지원하지 않는 정렬 방식입니다: {}", raw)))?,
    };

    let query = CommunityQuery {
        category: params.category,
        sort,
        limit: params.limit.unwrap_or(0),
        offset: params.offset.unwrap_or(0),
    };

    let page = state.community.list_public(&query).await?;
    Ok(Json(page))
}

// ============================================================================
// POST /api/community/goals/{id}/reactions
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReactionRequest {
    pub user_id: Uuid,
    pub kind: String,
}

#[derive(Debug, Serialize)]
pub struct ReactionResponse {
    pub reacted: bool,
}

pub async fn toggle_reaction(
    State(state): State<AppState>,
    Path(goal_id): Path<Uuid>,
    Json(req): Json<ReactionRequest>,
) -> Result<Json<ReactionResponse>, ApiError> {
    if req.kind.trim().is_empty() {
        return Err(ApiError::bad_request("반응 종류를 입력해주세요"));
    }
    let reacted = state
        .community
        .toggle_reaction(goal_id, req.user_id, &req.kind)
        .await?;
    Ok(Json(ReactionResponse { reacted }))
}

// ============================================================================
// POST /api/community/goals/{id}/journals
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalRequest {
    pub user_id: Uuid,
    pub body: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalResponse {
    pub id: i64,
    pub journal_count: i64,
}

pub async fn add_journal(
    State(state): State<AppState>,
    Path(goal_id): Path<Uuid>,
    Json(req): Json<JournalRequest>,
) -> Result<Json<JournalResponse>, ApiError> {
    if req.body.trim().is_empty() {
        return Err(ApiError::bad_request("기록 내용을 입력해주세요"));
    }
    let id = state
        .community
        .add_journal(goal_id, req.user_id, &req.body)
        .await?;
    let journal_count = state.community.journal_count(goal_id).await?;
    Ok(Json(JournalResponse { id, journal_count }))
}
