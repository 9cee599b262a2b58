//! Handlers for the static libraries: layouts, ad styles, backgrounds,
//! color schemes and prompt rendering.

use std::collections::HashMap;

use adforge_core::ad_styles::{
    build_image_prompt, get_ad_style, recommend_ad_styles, AdStyle, StyleQuery, AD_STYLES,
    DEFAULT_STYLE_ID,
};
use adforge_core::backgrounds::{PremiumBackground, PREMIUM_BACKGROUNDS};
use adforge_core::color_scheme::{ColorScheme, COLOR_SCHEMES};
use adforge_core::error::CoreError;
use adforge_core::layouts::{
    build_layout_background_prompt, get_layout, BackgroundPromptOptions, LayoutTemplate, LAYOUTS,
};
use adforge_core::template::{extract_placeholders, render_template};
use axum::extract::{Path, Query};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::response::DataResponse;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackgroundPromptQuery {
    /// Replaces the stock panel color in the prompt.
    pub primary_color: Option<String>,
    pub industry: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BackgroundPromptResponse {
    pub layout_id: &'static str,
    pub prompt: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RecommendStylesRequest {
    pub industry: Option<String>,
    pub product_type: Option<String>,
    pub goal: Option<String>,
}

/// Either a raw template or a style whose image prompt template is used.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RenderPromptRequest {
    pub style_id: Option<String>,
    pub template: Option<String>,
    pub variables: HashMap<String, String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderPromptResponse {
    /// `None` when a raw template was rendered.
    pub style_id: Option<&'static str>,
    pub placeholders: Vec<String>,
    pub prompt: String,
}

// ---------------------------------------------------------------------------
// Layouts
// ---------------------------------------------------------------------------

/// GET /layouts
pub async fn list_layouts() -> Json<DataResponse<Vec<&'static LayoutTemplate>>> {
    Json(DataResponse {
        data: LAYOUTS.to_vec(),
    })
}

/// GET /layouts/{id}. Unknown ids resolve to the default layout.
pub async fn get_layout_by_id(Path(id): Path<String>) -> Json<DataResponse<&'static LayoutTemplate>> {
    Json(DataResponse {
        data: get_layout(&id),
    })
}

/// GET /layouts/{id}/background-prompt
pub async fn layout_background_prompt(
    Path(id): Path<String>,
    Query(query): Query<BackgroundPromptQuery>,
) -> Json<DataResponse<BackgroundPromptResponse>> {
    let layout = get_layout(&id);
    let prompt = build_layout_background_prompt(
        layout,
        &BackgroundPromptOptions {
            primary_color: query.primary_color.as_deref(),
            industry: query.industry.as_deref(),
        },
    );
    Json(DataResponse {
        data: BackgroundPromptResponse {
            layout_id: layout.id,
            prompt,
        },
    })
}

// ---------------------------------------------------------------------------
// Styles
// ---------------------------------------------------------------------------

/// GET /styles
pub async fn list_styles() -> Json<DataResponse<Vec<&'static AdStyle>>> {
    Json(DataResponse {
        data: AD_STYLES.to_vec(),
    })
}

/// POST /styles/recommend
pub async fn recommend_styles(
    Json(input): Json<RecommendStylesRequest>,
) -> Json<DataResponse<Vec<&'static AdStyle>>> {
    let styles = recommend_ad_styles(&StyleQuery {
        industry: input.industry.as_deref(),
        product_type: input.product_type.as_deref(),
        goal: input.goal.as_deref(),
    });
    Json(DataResponse { data: styles })
}

/// POST /prompts/render
pub async fn render_prompt(
    Json(input): Json<RenderPromptRequest>,
) -> AppResult<Json<DataResponse<RenderPromptResponse>>> {
    let rendered = match &input.template {
        Some(template) if template.trim().is_empty() => {
            return Err(CoreError::Validation("template must not be empty".to_string()).into());
        }
        Some(template) => RenderPromptResponse {
            style_id: None,
            placeholders: extract_placeholders(template),
            prompt: render_template(template, &input.variables),
        },
        None => {
            let style = get_ad_style(input.style_id.as_deref().unwrap_or(DEFAULT_STYLE_ID));
            RenderPromptResponse {
                style_id: Some(style.id),
                placeholders: extract_placeholders(style.image_prompt_template),
                prompt: build_image_prompt(style, &input.variables),
            }
        }
    };
    Ok(Json(DataResponse { data: rendered }))
}

// ---------------------------------------------------------------------------
// Backgrounds and color schemes
// ---------------------------------------------------------------------------

/// GET /backgrounds
pub async fn list_backgrounds() -> Json<DataResponse<&'static [PremiumBackground]>> {
    Json(DataResponse {
        data: &PREMIUM_BACKGROUNDS,
    })
}

/// GET /color-schemes
pub async fn list_color_schemes() -> Json<DataResponse<Vec<&'static ColorScheme>>> {
    Json(DataResponse {
        data: COLOR_SCHEMES.to_vec(),
    })
}
