use adforge_core::error::CoreError;
use adforge_core::quota::QuotaWindow;
use adforge_core::types::Timestamp;

/// Errors from the provider clients.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The provider answered with a non-2xx status.
    #[error("{provider} API error ({status}): {body}")]
    Api {
        provider: &'static str,
        status: u16,
        body: String,
    },

    /// The provider has no API key configured.
    #[error("{0} is not configured")]
    NotConfigured(&'static str),

    /// A successful response carried no image.
    #[error("{provider} returned no image: {detail}")]
    NoImage {
        provider: &'static str,
        detail: String,
    },

    #[error("Base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Gemini quota exhausted ({window:?} window), retry at {retry_at}")]
    QuotaExhausted {
        window: QuotaWindow,
        retry_at: Timestamp,
    },

    #[error("Job {job_id} failed: {message}")]
    JobFailed { job_id: String, message: String },

    #[error("Job {job_id} did not finish within {waited_secs}s")]
    JobTimeout { job_id: String, waited_secs: u64 },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Core(#[from] CoreError),
}

impl ProviderError {
    /// Whether the upstream refused the call for quota, rate-limit or
    /// billing reasons. Such errors stop model fallback and block the
    /// Gemini quota.
    pub fn is_rate_limited(&self) -> bool {
        match self {
            Self::Api { status, body, .. } => {
                let body = body.to_lowercase();
                *status == 429
                    || ["quota", "rate limit", "billing", "exceeded"]
                        .iter()
                        .any(|needle| body.contains(needle))
            }
            Self::QuotaExhausted { .. } => true,
            _ => false,
        }
    }
}
