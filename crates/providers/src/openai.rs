//! OpenAI REST client: chat completions (copy and vision) and the image
//! generation and edit endpoints.

use std::time::Duration;

use adforge_core::brief::BriefPrompt;
use adforge_core::copy::GeneratedAd;
use adforge_core::scene::{ProductProfile, PRODUCT_ANALYSIS_PROMPT};
use adforge_core::template::parse_ai_json;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::Deserialize;
use serde_json::json;

use crate::error::ProviderError;
use crate::http::{ensure_success, parse_response, sniff_image};

const PROVIDER: &str = "OpenAI";

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_COPY_MODEL: &str = "gpt-4o";
pub const DEFAULT_VISION_MODEL: &str = "gpt-4o";
pub const DEFAULT_IMAGE_MODEL: &str = "gpt-image-1";

/// Square size requested from the image endpoints. The image models only
/// accept a few fixed sizes; results are resized to the canvas afterwards.
pub const IMAGE_SIZE: &str = "1024x1024";

/// Models tried after the configured copy model, in order.
pub const COPY_MODEL_FALLBACKS: [&str; 2] = ["gpt-4o-mini", "gpt-3.5-turbo"];

#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub base_url: String,
    pub copy_model: String,
    pub vision_model: String,
    pub image_model: String,
    pub timeout: Duration,
}

impl OpenAiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            copy_model: DEFAULT_COPY_MODEL.to_string(),
            vision_model: DEFAULT_VISION_MODEL.to_string(),
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
            timeout: Duration::from_secs(120),
        }
    }

    /// The configured copy model followed by the fallbacks, without
    /// duplicates.
    pub fn copy_models(&self) -> Vec<String> {
        let mut models = vec![self.copy_model.clone()];
        for m in COPY_MODEL_FALLBACKS {
            if !models.iter().any(|existing| existing == m) {
                models.push(m.to_string());
            }
        }
        models
    }
}

/// HTTP client for the OpenAI API.
pub struct OpenAiClient {
    client: reqwest::Client,
    config: OpenAiConfig,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ImageResponse {
    #[serde(default)]
    data: Vec<ImageDatum>,
}

#[derive(Debug, Deserialize)]
struct ImageDatum {
    #[serde(default)]
    b64_json: Option<String>,
    #[serde(default)]
    url: Option<String>,
}

impl OpenAiClient {
    pub fn new(config: OpenAiConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    /// Reuse an existing [`reqwest::Client`] for connection pooling.
    pub fn with_client(client: reqwest::Client, config: OpenAiConfig) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &OpenAiConfig {
        &self.config
    }

    /// Run a JSON-mode chat completion, falling back through the copy
    /// models. Rate-limit and quota errors end the fallback immediately.
    pub async fn chat_json(&self, system: &str, user: &str) -> Result<String, ProviderError> {
        let models = self.config.copy_models();
        let mut last_err = None;

        for model in &models {
            let body = json!({
                "model": model,
                "messages": [
                    { "role": "system", "content": system },
                    { "role": "user", "content": user },
                ],
                "temperature": 0.8,
                "max_tokens": 2000,
                "response_format": { "type": "json_object" },
            });
            match self.chat(&body).await {
                Ok(content) => {
                    tracing::debug!(provider = PROVIDER, model = %model, "Chat completion succeeded");
                    return Ok(content);
                }
                Err(e) if e.is_rate_limited() => return Err(e),
                Err(e) => {
                    tracing::warn!(provider = PROVIDER, model = %model, error = %e, "Chat model failed, trying next");
                    last_err = Some(e);
                }
            }
        }

        Err(last_err.unwrap_or(ProviderError::NotConfigured(PROVIDER)))
    }

    /// Ask for ad copy and parse the model's JSON answer.
    pub async fn generate_copy(&self, prompt: &BriefPrompt) -> Result<GeneratedAd, ProviderError> {
        let content = self.chat_json(prompt.system, &prompt.user).await?;
        Ok(parse_ai_json(&content)?)
    }

    /// Describe the product image with the vision model.
    pub async fn try_analyze_product(&self, image: &[u8]) -> Result<ProductProfile, ProviderError> {
        let (mime, _) = sniff_image(image);
        let data_url = format!("data:{mime};base64,{}", STANDARD.encode(image));
        let body = json!({
            "model": self.config.vision_model,
            "messages": [{
                "role": "user",
                "content": [
                    { "type": "text", "text": PRODUCT_ANALYSIS_PROMPT },
                    { "type": "image_url", "image_url": { "url": data_url } },
                ],
            }],
            "max_tokens": 500,
        });
        let content = self.chat(&body).await?;
        Ok(parse_ai_json(&content)?)
    }

    /// Like [`Self::try_analyze_product`], returning the default profile on
    /// any failure.
    pub async fn analyze_product(&self, image: &[u8]) -> ProductProfile {
        match self.try_analyze_product(image).await {
            Ok(profile) => profile,
            Err(e) => {
                tracing::warn!(provider = PROVIDER, error = %e, "Product analysis failed, using default profile");
                ProductProfile::default()
            }
        }
    }

    /// `POST /images/generations`. Returns the encoded image.
    pub async fn generate_image(&self, prompt: &str) -> Result<Vec<u8>, ProviderError> {
        let body = json!({
            "model": self.config.image_model,
            "prompt": prompt,
            "size": IMAGE_SIZE,
            "n": 1,
        });
        let response = self
            .client
            .post(format!("{}/images/generations", self.config.base_url))
            .bearer_auth(&self.config.api_key)
            .timeout(self.config.timeout)
            .json(&body)
            .send()
            .await?;
        let parsed: ImageResponse = parse_response(PROVIDER, response).await?;
        self.first_image(parsed).await
    }

    /// `POST /images/edits` with the product image as the base.
    /// The part is labelled with the sniffed format of `image`.
    pub async fn edit_image(&self, image: &[u8], prompt: &str) -> Result<Vec<u8>, ProviderError> {
        let (mime, extension) = sniff_image(image);
        let part = reqwest::multipart::Part::bytes(image.to_vec())
            .file_name(format!("product.{extension}"))
            .mime_str(mime)?;
        let form = reqwest::multipart::Form::new()
            .text("model", self.config.image_model.clone())
            .text("prompt", prompt.to_string())
            .text("size", IMAGE_SIZE)
            .part("image", part);

        let response = self
            .client
            .post(format!("{}/images/edits", self.config.base_url))
            .bearer_auth(&self.config.api_key)
            .timeout(self.config.timeout)
            .multipart(form)
            .send()
            .await?;
        let parsed: ImageResponse = parse_response(PROVIDER, response).await?;
        self.first_image(parsed).await
    }

    // ---- private helpers ----

    async fn chat(&self, body: &serde_json::Value) -> Result<String, ProviderError> {
        let response = self
            .client
            .post(format!("{}/chat/completions", self.config.base_url))
            .bearer_auth(&self.config.api_key)
            .timeout(self.config.timeout)
            .json(body)
            .send()
            .await?;
        let parsed: ChatResponse = parse_response(PROVIDER, response).await?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| ProviderError::Api {
                provider: PROVIDER,
                status: 200,
                body: "empty completion".to_string(),
            })
    }

    /// Decode the first returned image, downloading it when only a URL
    /// came back.
    async fn first_image(&self, response: ImageResponse) -> Result<Vec<u8>, ProviderError> {
        let datum = response.data.into_iter().next().ok_or(ProviderError::NoImage {
            provider: PROVIDER,
            detail: "empty data array".to_string(),
        })?;
        if let Some(b64) = datum.b64_json {
            return Ok(STANDARD.decode(b64.trim())?);
        }
        if let Some(url) = datum.url {
            let response = self.client.get(&url).send().await?;
            let response = ensure_success(PROVIDER, response).await?;
            return Ok(response.bytes().await?.to_vec());
        }
        Err(ProviderError::NoImage {
            provider: PROVIDER,
            detail: "neither b64_json nor url".to_string(),
        })
    }
}
