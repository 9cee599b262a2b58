use axum::routing::{get, post};
use axum::Router;

use crate::handlers::catalog;
use crate::state::AppState;

/// Library routes, merged at the `/api/v1` root.
///
/// ```text
/// GET  /layouts                          -> list_layouts
/// GET  /layouts/{id}                     -> get_layout_by_id
/// GET  /layouts/{id}/background-prompt   -> layout_background_prompt
/// GET  /styles                           -> list_styles
/// POST /styles/recommend                 -> recommend_styles
/// GET  /backgrounds                      -> list_backgrounds
/// GET  /color-schemes                    -> list_color_schemes
/// POST /prompts/render                   -> render_prompt
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/layouts", get(catalog::list_layouts))
        .route("/layouts/{id}", get(catalog::get_layout_by_id))
        .route(
            "/layouts/{id}/background-prompt",
            get(catalog::layout_background_prompt),
        )
        .route("/styles", get(catalog::list_styles))
        .route("/styles/recommend", post(catalog::recommend_styles))
        .route("/backgrounds", get(catalog::list_backgrounds))
        .route("/color-schemes", get(catalog::list_color_schemes))
        .route("/prompts/render", post(catalog::render_prompt))
}
