use std::sync::Arc;

use adforge_pipeline::AdPipeline;
use adforge_providers::gemini::GeminiClient;
use adforge_providers::openai::OpenAiClient;
use adforge_providers::quota::{PgQuotaStore, QuotaTracker};
use adforge_providers::railway::RailwayClient;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: adforge_db::DbPool,
    pub config: Arc<ServerConfig>,
    pub pipeline: Arc<AdPipeline>,
    /// Gemini quota, backed by the `gemini_quota` row.
    pub quota: Arc<QuotaTracker>,
    pub railway: Arc<RailwayClient>,
}

impl AppState {
    /// Wire the provider clients named in `config` into a pipeline.
    pub fn new(pool: adforge_db::DbPool, config: ServerConfig) -> Self {
        let providers = &config.providers;
        let http = providers.http_client();

        let quota = Arc::new(QuotaTracker::new(
            Arc::new(PgQuotaStore::new(pool.clone())),
            providers.gemini_limits,
            providers.quota_cache_ttl,
        ));

        let railway = Arc::new(
            RailwayClient::with_client(http.clone(), providers.railway_url.clone())
                .with_poll_config(providers.railway_poll),
        );

        let mut pipeline = AdPipeline::new(http.clone())
            .with_renderer(railway.clone())
            .with_quota(Arc::clone(&quota))
            .with_canvas_size(providers.canvas_size);

        if let Some(openai) = &providers.openai {
            let client = Arc::new(OpenAiClient::with_client(http.clone(), openai.clone()));
            pipeline = pipeline
                .with_image_editor(client.clone())
                .with_background_generator(client.clone())
                .with_copywriter(client.clone())
                .with_analyzer(client);
        }

        if let Some(gemini) = &providers.gemini {
            let client = Arc::new(GeminiClient::with_client(http, gemini.clone()));
            pipeline = pipeline.with_gemini(client.clone());
            // Vision through OpenAI when both are configured.
            if providers.openai.is_none() {
                pipeline = pipeline.with_analyzer(client);
            }
        }

        tracing::info!(
            providers = ?pipeline.configured_providers(),
            canvas_size = pipeline.canvas_size(),
            "Ad pipeline configured"
        );

        Self {
            pool,
            config: Arc::new(config),
            pipeline: Arc::new(pipeline),
            quota,
            railway,
        }
    }
}
