use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// `ok` when the quota database answers, `degraded` otherwise. While
/// degraded the Gemini step is skipped and the other steps still run.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub db_healthy: bool,
    /// Pipeline steps with a configured provider, e.g. `gemini`, `openai_edit`.
    pub providers: Vec<&'static str>,
}

async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_healthy = adforge_db::health_check(&state.pool).await.is_ok();

    let status = if db_healthy { "ok" } else { "degraded" };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
        providers: state.pipeline.configured_providers(),
    })
}

/// `GET /health`, mounted beside `/api/v1` for load balancer probes.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
