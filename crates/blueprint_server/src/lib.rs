pub mod error;
pub mod routes;

pub use error::ApiError;

use axum::routing::{get, post};
use axum::Router;
use blueprint_ai::LlmClient;
use blueprint_store::{BlueprintRepo, CommunityRepo, ProfileStore, UserRepo};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

/// Shared state for the API server. Repositories and the LLM client are
/// injected behind trait objects; tests swap in the in-memory store and
/// the mock provider.
#[derive(Clone)]
pub struct AppState {
    pub blueprints: Arc<dyn BlueprintRepo>,
    pub users: Arc<dyn UserRepo>,
    pub community: Arc<dyn CommunityRepo>,
    pub llm: Arc<dyn LlmClient>,
    pub profile: Arc<ProfileStore>,
    pub admin_token: Option<String>,
}

/// Build the full route table.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/ai/analyze-goal", post(routes::ai::analyze_goal))
        .route("/api/detailed-analysis", post(routes::ai::detailed_analysis))
        .route("/api/generate-branding", post(routes::ai::branding))
        .route("/api/community/goals", get(routes::community::list_goals))
        .route(
            "/api/community/goals/:id/reactions",
            post(routes::community::toggle_reaction),
        )
        .route(
            "/api/community/goals/:id/journals",
            post(routes::community::add_journal),
        )
        .route(
            "/api/blueprints",
            post(routes::blueprints::save).get(routes::blueprints::list),
        )
        .route(
            "/api/blueprints/:id",
            get(routes::blueprints::get)
                .put(routes::blueprints::update)
                .delete(routes::blueprints::delete),
        )
        .route(
            "/api/profile",
            get(routes::profile::get_profile).put(routes::profile::put_profile),
        )
        .route("/api/users/:id/follow", post(routes::profile::follow))
        .route("/api/admin/migrate", post(routes::admin::migrate))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

/// The API HTTP server.
pub struct ApiServer {
    state: AppState,
    host: String,
    port: u16,
}

impl ApiServer {
    pub fn new(state: AppState, host: &str, port: u16) -> Self {
        Self {
            state,
            host: host.to_string(),
            port,
        }
    }

    /// Start the server. Spawns a background task and returns its handle.
    pub fn start(self) -> tokio::task::JoinHandle<()> {
        let app = router(self.state);
        let addr = format!("{}:{}", self.host, self.port);

        tokio::spawn(async move {
            let listener = match tokio::net::TcpListener::bind(&addr).await {
                Ok(l) => l,
                Err(e) => {
                    tracing::error!("API server failed to bind {}: {}", addr, e);
                    return;
                }
            };
            tracing::info!("API server listening on {}", addr);
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!("API server error: {}", e);
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_health_endpoint() {
        let result = health().await;
        assert_eq!(result, "ok");
    }
}
