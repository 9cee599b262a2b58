use adforge_providers::quota::QuotaSnapshot;
use axum::extract::State;
use axum::Json;
use chrono::Utc;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /quota -- Gemini usage, limits and whether a call would be allowed now.
pub async fn get_quota(State(state): State<AppState>) -> AppResult<Json<DataResponse<QuotaSnapshot>>> {
    let snapshot = state.quota.snapshot(Utc::now()).await?;
    Ok(Json(DataResponse { data: snapshot }))
}
