pub mod ads;
pub mod catalog;
pub mod health;
pub mod railway;

use axum::routing::{get, post};
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /layouts                                   list layouts
/// /layouts/{id}                              one layout (unknown id -> default)
/// /layouts/{id}/background-prompt            background prompt for a layout
/// /styles                                    list ad styles
/// /styles/recommend                          top three styles (POST)
/// /backgrounds                               premium background styles
/// /color-schemes                             overlay color schemes
/// /prompts/render                            render a prompt template (POST)
///
/// /briefs                                    creative brief + prompts (POST)
///
/// /ads/generate                              full generation pipeline (POST)
/// /ads/composite                             compositor only (POST)
///
/// /quota                                     Gemini quota snapshot
///
/// /railway/health                            Railway service availability
/// /railway/references                        search references
/// /railway/references/{industry}             references for an industry
/// /railway/generate                          Railway design-system render (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Static libraries and prompt tooling.
        .merge(catalog::router())
        .route("/briefs", post(handlers::briefs::create_brief))
        .nest("/ads", ads::router())
        .route("/quota", get(handlers::quota::get_quota))
        .nest("/railway", railway::router())
}
