//! Gemini `generateContent` client for image-to-image ad generation and
//! product analysis.

use std::time::Duration;

use adforge_core::scene::{ProductProfile, PRODUCT_ANALYSIS_PROMPT};
use adforge_core::template::parse_ai_json;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::error::ProviderError;
use crate::http::{parse_response, sniff_image};

const PROVIDER: &str = "Gemini";

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_IMAGE_MODEL: &str = "gemini-2.0-flash-exp";

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub base_url: String,
    pub image_model: String,
    pub timeout: Duration,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
            timeout: Duration::from_secs(120),
        }
    }
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: [Content<'a>; 1],
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum RequestPart<'a> {
    #[serde(rename_all = "camelCase")]
    Inline { inline_data: InlineData },
    Text { text: &'a str },
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    #[serde(default)]
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_modalities: [&'static str; 2],
}

#[derive(Debug, Default, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Default, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Default, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    inline_data: Option<InlineData>,
}

impl GenerateContentResponse {
    fn parts(&self) -> impl Iterator<Item = &ResponsePart> {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|c| c.parts.as_slice())
            .unwrap_or_default()
            .iter()
    }

    fn first_image(&self) -> Option<&str> {
        self.parts()
            .filter_map(|p| p.inline_data.as_ref())
            .map(|d| d.data.as_str())
            .find(|d| !d.is_empty())
    }

    fn text(&self) -> String {
        self.parts().filter_map(|p| p.text.as_deref()).collect::<Vec<_>>().join("")
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// HTTP client for the Gemini API.
pub struct GeminiClient {
    client: reqwest::Client,
    config: GeminiConfig,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    pub fn with_client(client: reqwest::Client, config: GeminiConfig) -> Self {
        Self { client, config }
    }

    pub fn model(&self) -> &str {
        &self.config.image_model
    }

    /// Send the product image plus `prompt` and return the first image in
    /// the answer. A text-only answer is [`ProviderError::NoImage`].
    pub async fn generate_ad_image(&self, product: &[u8], prompt: &str) -> Result<Vec<u8>, ProviderError> {
        let response = self.generate_content(product, prompt, true).await?;
        match response.first_image() {
            Some(data) => {
                let bytes = STANDARD.decode(data.trim())?;
                tracing::debug!(provider = PROVIDER, size = bytes.len(), "Ad image generated");
                Ok(bytes)
            }
            None => {
                let detail: String = response.text().chars().take(200).collect();
                Err(ProviderError::NoImage {
                    provider: PROVIDER,
                    detail,
                })
            }
        }
    }

    pub async fn try_analyze_product(&self, image: &[u8]) -> Result<ProductProfile, ProviderError> {
        let response = self.generate_content(image, PRODUCT_ANALYSIS_PROMPT, false).await?;
        Ok(parse_ai_json(&response.text())?)
    }

    /// Product analysis that falls back to the default profile.
    pub async fn analyze_product(&self, image: &[u8]) -> ProductProfile {
        match self.try_analyze_product(image).await {
            Ok(profile) => profile,
            Err(e) => {
                tracing::warn!(provider = PROVIDER, error = %e, "Product analysis failed, using default profile");
                ProductProfile::default()
            }
        }
    }

    // ---- private helpers ----

    async fn generate_content(
        &self,
        image: &[u8],
        prompt: &str,
        want_image: bool,
    ) -> Result<GenerateContentResponse, ProviderError> {
        let request = GenerateContentRequest {
            contents: [Content {
                parts: vec![
                    RequestPart::Inline {
                        inline_data: InlineData {
                            mime_type: sniff_image(image).0.to_string(),
                            data: STANDARD.encode(image),
                        },
                    },
                    RequestPart::Text { text: prompt },
                ],
            }],
            generation_config: want_image.then_some(GenerationConfig {
                response_modalities: ["TEXT", "IMAGE"],
            }),
        };

        let response = self
            .client
            .post(format!(
                "{}/models/{}:generateContent",
                self.config.base_url, self.config.image_model
            ))
            .header("x-goog-api-key", &self.config.api_key)
            .timeout(self.config.timeout)
            .json(&request)
            .send()
            .await?;
        parse_response(PROVIDER, response).await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn response(value: serde_json::Value) -> GenerateContentResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn request_serializes_inline_data_first() {
        let request = GenerateContentRequest {
            contents: [Content {
                parts: vec![
                    RequestPart::Inline {
                        inline_data: InlineData {
                            mime_type: "image/png".to_string(),
                            data: "AAAA".to_string(),
                        },
                    },
                    RequestPart::Text { text: "hi" },
                ],
            }],
            generation_config: Some(GenerationConfig {
                response_modalities: ["TEXT", "IMAGE"],
            }),
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "contents": [{ "parts": [
                    { "inlineData": { "mimeType": "image/png", "data": "AAAA" } },
                    { "text": "hi" },
                ]}],
                "generationConfig": { "responseModalities": ["TEXT", "IMAGE"] },
            })
        );
    }

    #[test]
    fn finds_first_image_after_text() {
        let r = response(json!({
            "candidates": [{ "content": { "parts": [
                { "text": "Here you go" },
                { "inlineData": { "mimeType": "image/png", "data": "iVBO" } },
            ]}}]
        }));
        assert_eq!(r.first_image(), Some("iVBO"));
        assert_eq!(r.text(), "Here you go");
    }

    #[test]
    fn empty_response_has_no_image() {
        let r = response(json!({}));
        assert_eq!(r.first_image(), None);
        assert_eq!(r.text(), "");
    }
}
