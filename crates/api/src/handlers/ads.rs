//! Handlers for ad generation and standalone compositing.

use adforge_pipeline::{AdRequest, AdResult, CompositeRequest, CompositeResult};
use axum::extract::State;
use axum::Json;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::Serialize;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// An image inlined as base64 next to the details of how it was made.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageResponse<T: Serialize> {
    pub mime_type: &'static str,
    pub image_base64: String,
    #[serde(flatten)]
    pub details: T,
}

impl<T: Serialize> ImageResponse<T> {
    pub fn png(bytes: &[u8], details: T) -> Self {
        Self {
            mime_type: "image/png",
            image_base64: STANDARD.encode(bytes),
            details,
        }
    }
}

/// POST /ads/generate -- run the full pipeline.
pub async fn generate_ad(
    State(state): State<AppState>,
    Json(input): Json<AdRequest>,
) -> AppResult<Json<DataResponse<ImageResponse<AdResult>>>> {
    let mut result = state.pipeline.generate(&input).await?;
    let png = std::mem::take(&mut result.png);
    Ok(Json(DataResponse {
        data: ImageResponse::png(&png, result),
    }))
}

/// POST /ads/composite -- place a product without any AI step.
pub async fn composite_ad(
    State(state): State<AppState>,
    Json(input): Json<CompositeRequest>,
) -> AppResult<Json<DataResponse<ImageResponse<CompositeResult>>>> {
    let mut result = state.pipeline.compose(&input).await?;
    let png = std::mem::take(&mut result.png);
    Ok(Json(DataResponse {
        data: ImageResponse::png(&png, result),
    }))
}
