#![allow(dead_code)]

use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;

use adforge_api::config::{ProviderConfig, ServerConfig};
use adforge_api::router::build_app_router;
use adforge_api::state::AppState;
use adforge_core::quota::{QuotaLimits, QuotaState};
use adforge_pipeline::AdPipeline;
use adforge_providers::poll::PollConfig;
use adforge_providers::quota::{MemoryQuotaStore, QuotaTracker};
use adforge_providers::railway::RailwayClient;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use http_body_util::BodyExt;
use image::{ImageFormat, Rgba, RgbaImage};
use serde_json::Value;
use sqlx::postgres::PgPoolOptions;
use tower::ServiceExt;

pub const TEST_CANVAS: u32 = 256;

/// Nothing listens here, so the lazy pool and the Railway client fail fast.
const UNREACHABLE: &str = "127.0.0.1:1";

/// Build a test `ServerConfig` with no provider keys.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        providers: ProviderConfig {
            openai: None,
            gemini: None,
            gemini_limits: QuotaLimits {
                per_minute: 10,
                per_day: 500,
            },
            quota_cache_ttl: Duration::from_secs(5),
            railway_url: format!("http://{UNREACHABLE}"),
            railway_poll: PollConfig::default(),
            canvas_size: TEST_CANVAS,
            http_timeout: Duration::from_secs(5),
            http_connect_timeout: Duration::from_secs(1),
        },
    }
}

/// State without a reachable database: a lazy pool, an in-memory quota
/// store and a pipeline with no AI providers.
pub fn test_state() -> AppState {
    test_state_with(QuotaState::default(), &format!("http://{UNREACHABLE}"))
}

pub fn test_state_with(quota: QuotaState, railway_url: &str) -> AppState {
    test_state_from(test_config(), quota, railway_url)
}

pub fn test_state_from(config: ServerConfig, quota: QuotaState, railway_url: &str) -> AppState {
    let pool = PgPoolOptions::new()
        .acquire_timeout(Duration::from_millis(500))
        .connect_lazy(&format!("postgres://adforge:adforge@{UNREACHABLE}/adforge"))
        .unwrap();
    let quota = Arc::new(QuotaTracker::new(
        Arc::new(MemoryQuotaStore::new(quota)),
        config.providers.gemini_limits,
        config.providers.quota_cache_ttl,
    ));
    let pipeline = AdPipeline::new(config.providers.http_client()).with_canvas_size(TEST_CANVAS);

    AppState {
        pool,
        config: Arc::new(config),
        pipeline: Arc::new(pipeline),
        quota,
        railway: Arc::new(RailwayClient::new(railway_url.to_string())),
    }
}

pub fn build_test_app(state: AppState) -> Router {
    let config = test_config();
    build_app_router(state, &config)
}

pub fn test_app() -> Router {
    build_test_app(test_state())
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Assert the status and return the `data` payload.
pub async fn expect_data(response: Response, status: StatusCode) -> Value {
    assert_eq!(response.status(), status);
    body_json(response).await["data"].clone()
}

/// Assert the status and return the error `code`.
pub async fn expect_error(response: Response, status: StatusCode) -> String {
    assert_eq!(response.status(), status);
    let json = body_json(response).await;
    json["code"].as_str().unwrap().to_string()
}

// ---------------------------------------------------------------------------
// Images
// ---------------------------------------------------------------------------

pub fn png(width: u32, height: u32, px: [u8; 4]) -> Vec<u8> {
    let mut out = Cursor::new(Vec::new());
    RgbaImage::from_pixel(width, height, Rgba(px))
        .write_to(&mut out, ImageFormat::Png)
        .unwrap();
    out.into_inner()
}

pub fn data_url(bytes: &[u8]) -> String {
    format!("data:image/png;base64,{}", STANDARD.encode(bytes))
}

/// Decode a base64 PNG from a response and return its dimensions.
pub fn decoded_size(b64: &Value) -> (u32, u32) {
    let bytes = STANDARD.decode(b64.as_str().unwrap()).unwrap();
    let image = image::load_from_memory(&bytes).unwrap();
    (image.width(), image.height())
}

// ---------------------------------------------------------------------------
// Fake upstream
// ---------------------------------------------------------------------------

/// Serve `app` on an ephemeral port and return its base URL.
pub async fn spawn(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    base
}
