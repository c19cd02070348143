//! AI-backed endpoints: goal clarification, detailed analysis, branding.

use crate::error::ApiError;
use crate::AppState;
use axum::extract::State;
use axum::Json;
use blueprint_ai::{clarify_goal, generate_branding, generate_insights, BrandingInput, ChatMessage, ClarifyOutcome};
use blueprint_core::{analyze, BasicAnalysis, Blueprint};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// POST /api/ai/analyze-goal
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct AnalyzeGoalRequest {
    pub goal: String,
    #[serde(default)]
    pub conversation: Vec<ChatMessage>,
}

/// One clarification turn. Stateless: the client resends the whole
/// conversation each time.
pub async fn analyze_goal(
    State(state): State<AppState>,
    Json(req): Json<AnalyzeGoalRequest>,
) -> Result<Json<ClarifyOutcome>, ApiError> {
    if req.goal.trim().is_empty() {
        return Err(ApiError::bad_request("목표를 입력해주세요"));
    }
    let outcome = clarify_goal(state.llm.as_ref(), &req.goal, req.conversation).await?;
    Ok(Json(outcome))
}

// ============================================================================
// POST /api/detailed-analysis
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct DetailedAnalysisRequest {
    pub blueprints: Vec<Blueprint>,
}

#[derive(Debug, Serialize)]
pub struct DetailedAnalysisResponse {
    pub success: bool,
    pub data: DetailedAnalysisData,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailedAnalysisData {
    pub basic_analysis: BasicAnalysis,
    pub ai_insights: Option<String>,
    pub generated_at: DateTime<Utc>,
    #[serde(rename = "hasAIInsights")]
    pub has_ai_insights: bool,
}

/// Local analysis always runs; the AI narrative is best-effort. An AI
/// failure degrades the response instead of failing it.
pub async fn detailed_analysis(
    State(state): State<AppState>,
    Json(req): Json<DetailedAnalysisRequest>,
) -> Result<Json<DetailedAnalysisResponse>, ApiError> {
    if req.blueprints.is_empty() {
        return Err(ApiError::bad_request("분석할 청사진이 없습니다"));
    }

    let basic_analysis = analyze(&req.blueprints);

    let ai_insights = match generate_insights(state.llm.as_ref(), &basic_analysis).await {
        Ok(text) => Some(text),
        Err(e) => {
            tracing::warn!("AI insight generation failed, degrading: {}", e);
            None
        }
    };

    let has_ai_insights = ai_insights.is_some();
    Ok(Json(DetailedAnalysisResponse {
        success: true,
        data: DetailedAnalysisData {
            basic_analysis,
            ai_insights,
            generated_at: Utc::now(),
            has_ai_insights,
        },
    }))
}

// ============================================================================
// POST /api/generate-branding
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct BrandingRequest {
    #[serde(rename = "brandingData")]
    pub branding_data: BrandingInput,
}

#[derive(Debug, Serialize)]
pub struct BrandingResponse {
    pub statements: Vec<String>,
}

pub async fn branding(
    State(state): State<AppState>,
    Json(req): Json<BrandingRequest>,
) -> Result<Json<BrandingResponse>, ApiError> {
    if req.branding_data.is_empty() {
        return Err(ApiError::bad_request("브랜딩 정보를 입력해주세요"));
    }
    let statements = generate_branding(state.llm.as_ref(), &req.branding_data).await?;
    Ok(Json(BrandingResponse { statements }))
}
