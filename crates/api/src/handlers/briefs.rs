use adforge_core::brief::{BriefInput, BriefPrompt, CreativeBrief};
use axum::Json;
use chrono::Utc;
use serde::Serialize;

use crate::response::DataResponse;

#[derive(Debug, Serialize)]
pub struct BriefResponse {
    pub brief: CreativeBrief,
    pub prompt: BriefPrompt,
}

/// POST /briefs -- build the creative brief and the copywriting prompts.
pub async fn create_brief(Json(input): Json<BriefInput>) -> Json<DataResponse<BriefResponse>> {
    let brief = CreativeBrief::build(&input, Utc::now());
    let prompt = BriefPrompt::from_brief(&brief);
    tracing::debug!(style_id = prompt.style_id, industry = %brief.product.industry, "Built brief");
    Json(DataResponse {
        data: BriefResponse { brief, prompt },
    })
}
