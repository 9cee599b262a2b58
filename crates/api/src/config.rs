use std::str::FromStr;
use std::time::Duration;

use adforge_core::quota::QuotaLimits;
use adforge_pipeline::request::DEFAULT_CANVAS_SIZE;
use adforge_providers::gemini::GeminiConfig;
use adforge_providers::openai::OpenAiConfig;
use adforge_providers::poll::PollConfig;
use adforge_providers::{gemini, openai, railway};

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development. Provider keys
/// are optional; a provider without a key is left out of the pipeline.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `180`). Generation with
    /// several provider fallbacks is slow.
    pub request_timeout_secs: u64,
    pub providers: ProviderConfig,
}

/// External AI provider settings.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub openai: Option<OpenAiConfig>,
    pub gemini: Option<GeminiConfig>,
    pub gemini_limits: QuotaLimits,
    pub quota_cache_ttl: Duration,
    pub railway_url: String,
    pub railway_poll: PollConfig,
    pub canvas_size: u32,
    /// Default timeout of the shared HTTP client. Provider calls set their
    /// own per-request timeouts.
    pub http_timeout: Duration,
    pub http_connect_timeout: Duration,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `180`                      |
    ///
    /// Provider variables are listed on [`ProviderConfig::from_env`].
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Self {
            host,
            port: parse_env("PORT", 3000),
            cors_origins,
            request_timeout_secs: parse_env("REQUEST_TIMEOUT_SECS", 180),
            providers: ProviderConfig::from_env(),
        }
    }
}

impl ProviderConfig {
    /// Build the HTTP client shared by the provider clients and the
    /// product image fetch.
    ///
    /// Panics if the TLS backend cannot be initialized.
    pub fn http_client(&self) -> reqwest::Client {
        reqwest::Client::builder()
            .timeout(self.http_timeout)
            .connect_timeout(self.http_connect_timeout)
            .build()
            .expect("Failed to build reqwest HTTP client")
    }

    /// | Env Var                      | Default                                             |
    /// |------------------------------|-----------------------------------------------------|
    /// | `OPENAI_API_KEY`             | unset (OpenAI steps skipped)                        |
    /// | `OPENAI_BASE_URL`            | `https://api.openai.com/v1`                         |
    /// | `OPENAI_COPY_MODEL`          | `gpt-4o`                                            |
    /// | `OPENAI_VISION_MODEL`        | `gpt-4o`                                            |
    /// | `OPENAI_IMAGE_MODEL`         | `gpt-image-1`                                       |
    /// | `GEMINI_API_KEY`             | unset (Gemini step skipped)                         |
    /// | `GEMINI_BASE_URL`            | `https://generativelanguage.googleapis.com/v1beta`  |
    /// | `GEMINI_IMAGE_MODEL`         | `gemini-2.0-flash-exp`                              |
    /// | `GEMINI_REQUESTS_PER_MINUTE` | `10`                                                |
    /// | `GEMINI_REQUESTS_PER_DAY`    | `500`                                               |
    /// | `QUOTA_CACHE_TTL_SECS`       | `5`                                                 |
    /// | `RAILWAY_IMAGE_SERVICE_URL`  | `https://adruby-image-service.up.railway.app`       |
    /// | `RAILWAY_POLL_INTERVAL_MS`   | `2000`                                              |
    /// | `RAILWAY_POLL_TIMEOUT_SECS`  | `180`                                               |
    /// | `CANVAS_SIZE`                | `1024`                                              |
    /// | `HTTP_TIMEOUT_SECS`          | `60`                                                |
    /// | `HTTP_CONNECT_TIMEOUT_SECS`  | `10`                                                |
    pub fn from_env() -> Self {
        let openai = non_empty_env("OPENAI_API_KEY").map(|key| OpenAiConfig {
            base_url: string_env("OPENAI_BASE_URL", openai::DEFAULT_BASE_URL),
            copy_model: string_env("OPENAI_COPY_MODEL", openai::DEFAULT_COPY_MODEL),
            vision_model: string_env("OPENAI_VISION_MODEL", openai::DEFAULT_VISION_MODEL),
            image_model: string_env("OPENAI_IMAGE_MODEL", openai::DEFAULT_IMAGE_MODEL),
            ..OpenAiConfig::new(key)
        });

        let gemini = non_empty_env("GEMINI_API_KEY").map(|key| GeminiConfig {
            base_url: string_env("GEMINI_BASE_URL", gemini::DEFAULT_BASE_URL),
            image_model: string_env("GEMINI_IMAGE_MODEL", gemini::DEFAULT_IMAGE_MODEL),
            ..GeminiConfig::new(key)
        });

        Self {
            openai,
            gemini,
            gemini_limits: QuotaLimits {
                per_minute: parse_env("GEMINI_REQUESTS_PER_MINUTE", 10),
                per_day: parse_env("GEMINI_REQUESTS_PER_DAY", 500),
            },
            quota_cache_ttl: Duration::from_secs(parse_env("QUOTA_CACHE_TTL_SECS", 5)),
            railway_url: string_env("RAILWAY_IMAGE_SERVICE_URL", railway::DEFAULT_BASE_URL),
            railway_poll: PollConfig {
                interval: Duration::from_millis(parse_env("RAILWAY_POLL_INTERVAL_MS", 2000)),
                timeout: Duration::from_secs(parse_env("RAILWAY_POLL_TIMEOUT_SECS", 180)),
            },
            canvas_size: parse_env("CANVAS_SIZE", DEFAULT_CANVAS_SIZE),
            http_timeout: Duration::from_secs(parse_env("HTTP_TIMEOUT_SECS", 60)),
            http_connect_timeout: Duration::from_secs(parse_env("HTTP_CONNECT_TIMEOUT_SECS", 10)),
        }
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn string_env(name: &str, default: &str) -> String {
    non_empty_env(name).unwrap_or_else(|| default.to_string())
}

/// Parse `name`, falling back to `default` when unset. Panics on a value
/// that does not parse: misconfiguration should fail at startup.
fn parse_env<T>(name: &str, default: T) -> T
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match non_empty_env(name) {
        Some(raw) => raw
            .parse()
            .unwrap_or_else(|e| panic!("{name} must be a valid {}: {e}", std::any::type_name::<T>())),
        None => default,
    }
}
