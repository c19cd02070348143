//! Blueprint CRUD endpoints.

use crate::error::ApiError;
use crate::AppState;
use axum::extract::{Path, Query, State};
use axum::Json;
use blueprint_core::Blueprint;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveBlueprintRequest {
    pub owner_id: Uuid,
    pub blueprint: Blueprint,
}

#[derive(Debug, Serialize)]
pub struct SaveBlueprintResponse {
    pub id: Uuid,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerParams {
    pub owner_id: Uuid,
}

/// POST /api/blueprints — create or fully replace.
pub async fn save(
    State(state): State<AppState>,
    Json(req): Json<SaveBlueprintRequest>,
) -> Result<Json<SaveBlueprintResponse>, ApiError> {
    if req.blueprint.title.trim().is_empty() {
        return Err(ApiError::bad_request("청사진 제목을 입력해주세요"));
    }
    req.blueprint
        .validate()
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    state.blueprints.save(req.owner_id, &req.blueprint).await?;
    Ok(Json(SaveBlueprintResponse {
        id: req.blueprint.id,
    }))
}

/// PUT /api/blueprints/{id} — same body; the path id must match.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<SaveBlueprintRequest>,
) -> Result<Json<SaveBlueprintResponse>, ApiError> {
    if req.blueprint.id != id {
        return Err(ApiError::bad_request("경로의 id와 본문의 id가 다릅니다"));
    }
    if state.blueprints.get(id).await?.is_none() {
        return Err(ApiError::not_found("청사진을 찾을 수 없습니다"));
    }
    req.blueprint
        .validate()
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    state.blueprints.save(req.owner_id, &req.blueprint).await?;
    Ok(Json(SaveBlueprintResponse { id }))
}

/// GET /api/blueprints/{id}
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Blueprint>, ApiError> {
    match state.blueprints.get(id).await? {
        Some(blueprint) => Ok(Json(blueprint)),
        None => Err(ApiError::not_found("청사진을 찾을 수 없습니다")),
    }
}

/// GET /api/blueprints?ownerId=...
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<OwnerParams>,
) -> Result<Json<Vec<Blueprint>>, ApiError> {
    let list = state.blueprints.list_by_owner(params.owner_id).await?;
    Ok(Json(list))
}

/// DELETE /api/blueprints/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if !state.blueprints.delete(id).await? {
        return Err(ApiError::not_found("청사진을 찾을 수 없습니다"));
    }
    Ok(Json(serde_json::json!({ "deleted": true })))
}
