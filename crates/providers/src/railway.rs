//! Client for the companion image service hosted on Railway.
//!
//! The service renders complete ads server-side. Synchronous endpoints
//! block for up to two minutes; the async composite endpoint returns a job
//! id that is polled until it completes, fails or the poll deadline passes.

use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::error::ProviderError;
use crate::http::parse_response;
use crate::poll::{poll_until, PollConfig, PollError, PollStep};

const PROVIDER: &str = "Railway";

pub const DEFAULT_BASE_URL: &str = "https://adruby-image-service.up.railway.app";

const GENERATE_TIMEOUT: Duration = Duration::from_secs(120);
const REFERENCES_TIMEOUT: Duration = Duration::from_secs(30);
const HEALTH_TIMEOUT: Duration = Duration::from_secs(5);

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Body of `POST /generate`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GenerateRequest {
    pub user_prompt: String,
    pub industry: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headline: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tagline: Option<String>,
    pub features: Vec<String>,
    pub stats: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cta: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_image_url: Option<String>,
    pub format: String,
}

/// Body of `POST /generate-composite` and `POST /generate-composite-async`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompositeRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_image_base64: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headline: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tagline: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cta: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_prompt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    pub accent_color: String,
}

pub const DEFAULT_ACCENT_COLOR: &str = "#FF4757";

impl Default for CompositeRequest {
    fn default() -> Self {
        Self {
            product_image_base64: None,
            product_image_url: None,
            headline: None,
            tagline: None,
            cta: None,
            user_prompt: None,
            industry: None,
            accent_color: DEFAULT_ACCENT_COLOR.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImageEnvelope {
    #[serde(default)]
    image_base64: Option<String>,
    #[serde(default)]
    prompt: Option<String>,
    #[serde(default)]
    metadata: serde_json::Value,
}

/// A rendered ad returned by the service.
#[derive(Debug, Clone)]
pub struct RailwayImage {
    pub bytes: Vec<u8>,
    pub prompt: Option<String>,
    pub metadata: serde_json::Value,
}

impl TryFrom<ImageEnvelope> for RailwayImage {
    type Error = ProviderError;

    fn try_from(envelope: ImageEnvelope) -> Result<Self, Self::Error> {
        let b64 = envelope
            .image_base64
            .filter(|b| !b.is_empty())
            .ok_or_else(|| ProviderError::NoImage {
                provider: PROVIDER,
                detail: "response has no imageBase64".to_string(),
            })?;
        Ok(Self {
            bytes: STANDARD.decode(b64.trim())?,
            prompt: envelope.prompt,
            metadata: envelope.metadata,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JobCreated {
    job_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobState {
    Queued,
    Processing,
    Completed,
    Failed,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JobStatus {
    pub status: JobState,
    #[serde(default)]
    pub progress: Option<f64>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ReferenceList {
    #[serde(default)]
    references: Vec<serde_json::Value>,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// HTTP client for the Railway image service.
pub struct RailwayClient {
    client: reqwest::Client,
    base_url: String,
    poll: PollConfig,
}

impl RailwayClient {
    pub fn new(base_url: String) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: String) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            poll: PollConfig::default(),
        }
    }

    pub fn with_poll_config(mut self, poll: PollConfig) -> Self {
        self.poll = poll;
        self
    }

    /// `POST /generate`: full design-system generation.
    pub async fn generate(&self, request: &GenerateRequest) -> Result<RailwayImage, ProviderError> {
        tracing::info!(provider = PROVIDER, industry = %request.industry, format = %request.format, "Requesting generation");
        let response = self
            .client
            .post(format!("{}/generate", self.base_url))
            .timeout(GENERATE_TIMEOUT)
            .json(request)
            .send()
            .await?;
        let envelope: ImageEnvelope = parse_response(PROVIDER, response).await?;
        envelope.try_into()
    }

    /// `POST /generate-composite`: background plus product overlay, rendered
    /// in one blocking call.
    pub async fn generate_composite(&self, request: &CompositeRequest) -> Result<RailwayImage, ProviderError> {
        tracing::info!(provider = PROVIDER, "Requesting composite");
        let response = self
            .client
            .post(format!("{}/generate-composite", self.base_url))
            .timeout(GENERATE_TIMEOUT)
            .json(request)
            .send()
            .await?;
        let envelope: ImageEnvelope = parse_response(PROVIDER, response).await?;
        envelope.try_into()
    }

    /// `POST /generate-composite-async`. Returns the job id.
    pub async fn start_composite_job(&self, request: &CompositeRequest) -> Result<String, ProviderError> {
        let response = self
            .client
            .post(format!("{}/generate-composite-async", self.base_url))
            .timeout(REFERENCES_TIMEOUT)
            .json(request)
            .send()
            .await?;
        let created: JobCreated = parse_response(PROVIDER, response).await?;
        tracing::debug!(provider = PROVIDER, job_id = %created.job_id, "Composite job queued");
        Ok(created.job_id)
    }

    /// `GET /job/{id}/status`.
    pub async fn job_status(&self, job_id: &str) -> Result<JobStatus, ProviderError> {
        let response = self
            .client
            .get(format!("{}/job/{}/status", self.base_url, job_id))
            .timeout(REFERENCES_TIMEOUT)
            .send()
            .await?;
        parse_response(PROVIDER, response).await
    }

    /// `GET /job/{id}/result`.
    pub async fn job_result(&self, job_id: &str) -> Result<RailwayImage, ProviderError> {
        let response = self
            .client
            .get(format!("{}/job/{}/result", self.base_url, job_id))
            .timeout(GENERATE_TIMEOUT)
            .send()
            .await?;
        let envelope: ImageEnvelope = parse_response(PROVIDER, response).await?;
        envelope.try_into()
    }

    /// Start an async composite job and poll it to completion.
    pub async fn generate_composite_polled(
        &self,
        request: &CompositeRequest,
    ) -> Result<RailwayImage, ProviderError> {
        let job_id = self.start_composite_job(request).await?;

        let id = job_id.as_str();
        let outcome = poll_until(&self.poll, move || async move {
            let status = self.job_status(id).await?;
            match status.status {
                JobState::Completed => Ok(PollStep::Done(())),
                JobState::Failed => Err(ProviderError::JobFailed {
                    job_id: id.to_string(),
                    message: status.error.unwrap_or_else(|| "unknown error".to_string()),
                }),
                JobState::Queued | JobState::Processing => {
                    tracing::debug!(provider = PROVIDER, job_id = %id, progress = ?status.progress, "Job pending");
                    Ok(PollStep::Pending)
                }
            }
        })
        .await;

        match outcome {
            Ok(()) => self.job_result(&job_id).await,
            Err(PollError::Check(e)) => Err(e),
            Err(PollError::TimedOut { attempts }) => {
                tracing::warn!(provider = PROVIDER, job_id = %job_id, attempts, "Job polling timed out");
                Err(ProviderError::JobTimeout {
                    job_id,
                    waited_secs: self.poll.timeout.as_secs(),
                })
            }
        }
    }

    /// `GET /health`. Any failure counts as unavailable.
    pub async fn is_available(&self) -> bool {
        match self
            .client
            .get(format!("{}/health", self.base_url))
            .timeout(HEALTH_TIMEOUT)
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                tracing::debug!(provider = PROVIDER, error = %e, "Health check failed");
                false
            }
        }
    }

    /// `GET /references/{industry}?count=`. Empty on any failure.
    pub async fn references(&self, industry: &str, count: u32) -> Vec<serde_json::Value> {
        let request = self
            .client
            .get(format!("{}/references/{}", self.base_url, industry))
            .query(&[("count", count)])
            .timeout(REFERENCES_TIMEOUT);
        self.reference_list(request).await
    }

    /// `GET /search-references?prompt=&industry=`. Empty on any failure.
    pub async fn search_references(&self, prompt: &str, industry: Option<&str>) -> Vec<serde_json::Value> {
        let mut query = vec![("prompt", prompt)];
        if let Some(industry) = industry {
            query.push(("industry", industry));
        }
        let request = self
            .client
            .get(format!("{}/search-references", self.base_url))
            .query(&query)
            .timeout(REFERENCES_TIMEOUT);
        self.reference_list(request).await
    }

    // ---- private helpers ----

    async fn reference_list(&self, request: reqwest::RequestBuilder) -> Vec<serde_json::Value> {
        let result: Result<ReferenceList, ProviderError> = async {
            let response = request.send().await?;
            parse_response(PROVIDER, response).await
        }
        .await;
        match result {
            Ok(list) => list.references,
            Err(e) => {
                tracing::warn!(provider = PROVIDER, error = %e, "Reference lookup failed");
                Vec::new()
            }
        }
    }
}
