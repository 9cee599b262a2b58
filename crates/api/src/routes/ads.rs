use axum::routing::post;
use axum::Router;

use crate::handlers::ads;
use crate::state::AppState;

/// Routes mounted at `/ads`.
///
/// ```text
/// POST /generate    -> generate_ad
/// POST /composite   -> composite_ad
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/generate", post(ads::generate_ad))
        .route("/composite", post(ads::composite_ad))
}
