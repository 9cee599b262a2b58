//! Pass-through handlers for the Railway image service.

use adforge_core::error::CoreError;
use adforge_providers::railway::GenerateRequest;
use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::handlers::ads::ImageResponse;
use crate::response::DataResponse;
use crate::state::AppState;

const DEFAULT_REFERENCE_COUNT: u32 = 3;
const MAX_REFERENCE_COUNT: u32 = 20;

#[derive(Debug, Serialize)]
pub struct ServiceStatus {
    pub available: bool,
}

#[derive(Debug, Deserialize)]
pub struct ReferencesQuery {
    pub count: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub prompt: String,
    pub industry: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RenderDetails {
    pub prompt: Option<String>,
    pub metadata: serde_json::Value,
}

/// GET /railway/health
pub async fn service_status(State(state): State<AppState>) -> Json<DataResponse<ServiceStatus>> {
    Json(DataResponse {
        data: ServiceStatus {
            available: state.railway.is_available().await,
        },
    })
}

/// GET /railway/references/{industry}?count=
pub async fn list_references(
    State(state): State<AppState>,
    Path(industry): Path<String>,
    Query(query): Query<ReferencesQuery>,
) -> Json<DataResponse<Vec<serde_json::Value>>> {
    let count = query
        .count
        .unwrap_or(DEFAULT_REFERENCE_COUNT)
        .clamp(1, MAX_REFERENCE_COUNT);
    Json(DataResponse {
        data: state.railway.references(&industry, count).await,
    })
}

/// GET /railway/references?prompt=&industry=
pub async fn search_references(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<DataResponse<Vec<serde_json::Value>>>> {
    if query.prompt.trim().is_empty() {
        return Err(CoreError::Validation("prompt must not be empty".to_string()).into());
    }
    let references = state
        .railway
        .search_references(&query.prompt, query.industry.as_deref())
        .await;
    Ok(Json(DataResponse { data: references }))
}

/// POST /railway/generate -- the service's own design-system generation.
pub async fn generate(
    State(state): State<AppState>,
    Json(input): Json<GenerateRequest>,
) -> AppResult<Json<DataResponse<ImageResponse<RenderDetails>>>> {
    if input.user_prompt.trim().is_empty() {
        return Err(CoreError::Validation("userPrompt must not be empty".to_string()).into());
    }
    let image = state.railway.generate(&input).await?;
    Ok(Json(DataResponse {
        data: ImageResponse::png(
            &image.bytes,
            RenderDetails {
                prompt: image.prompt,
                metadata: image.metadata,
            },
        ),
    }))
}
