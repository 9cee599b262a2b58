use axum::routing::{get, post};
use axum::Router;

use crate::handlers::railway;
use crate::state::AppState;

/// Routes mounted at `/railway`.
///
/// ```text
/// GET  /health                  -> service_status
/// GET  /references              -> search_references
/// GET  /references/{industry}   -> list_references
/// POST /generate                -> generate
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(railway::service_status))
        .route("/references", get(railway::search_references))
        .route("/references/{industry}", get(railway::list_references))
        .route("/generate", post(railway::generate))
}
