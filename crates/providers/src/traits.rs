//! Seams between the pipeline and the concrete provider clients.
//!
//! The pipeline holds these as `Arc<dyn ...>` so each step can be absent
//! (no API key configured) or replaced by a stub in tests.

use adforge_core::brief::BriefPrompt;
use adforge_core::copy::GeneratedAd;
use adforge_core::scene::ProductProfile;
use async_trait::async_trait;

use crate::error::ProviderError;
use crate::gemini::GeminiClient;
use crate::openai::OpenAiClient;
use crate::railway::{CompositeRequest, RailwayClient, RailwayImage};

/// Produces a finished ad from the product photo and a prompt.
#[async_trait]
pub trait AdImageGenerator: Send + Sync {
    /// Short provider name for logs and results.
    fn provider(&self) -> &'static str;

    async fn generate_ad(&self, product: &[u8], prompt: &str, size: u32) -> Result<Vec<u8>, ProviderError>;
}

/// Produces a product-free background image.
#[async_trait]
pub trait BackgroundGenerator: Send + Sync {
    async fn generate_background(&self, prompt: &str, size: u32) -> Result<Vec<u8>, ProviderError>;
}

/// Describes a product photo. Never fails; falls back to
/// [`ProductProfile::default`].
#[async_trait]
pub trait ProductAnalyzer: Send + Sync {
    async fn analyze(&self, image: &[u8]) -> ProductProfile;
}

/// Writes ad copy for a brief.
#[async_trait]
pub trait Copywriter: Send + Sync {
    async fn write_copy(&self, prompt: &BriefPrompt) -> Result<GeneratedAd, ProviderError>;
}

/// Renders a complete composite ad remotely.
#[async_trait]
pub trait CompositeRenderer: Send + Sync {
    /// With `use_job`, go through the async job endpoint and poll.
    async fn render(&self, request: &CompositeRequest, use_job: bool) -> Result<RailwayImage, ProviderError>;
}

// ---------------------------------------------------------------------------
// Gemini
// ---------------------------------------------------------------------------

#[async_trait]
impl AdImageGenerator for GeminiClient {
    fn provider(&self) -> &'static str {
        "gemini"
    }

    /// Gemini picks the output size itself; `size` is only used in the prompt.
    async fn generate_ad(&self, product: &[u8], prompt: &str, _size: u32) -> Result<Vec<u8>, ProviderError> {
        self.generate_ad_image(product, prompt).await
    }
}

#[async_trait]
impl ProductAnalyzer for GeminiClient {
    async fn analyze(&self, image: &[u8]) -> ProductProfile {
        self.analyze_product(image).await
    }
}

// ---------------------------------------------------------------------------
// OpenAI
// ---------------------------------------------------------------------------

#[async_trait]
impl AdImageGenerator for OpenAiClient {
    fn provider(&self) -> &'static str {
        "openai_edit"
    }

    /// The edit comes back at [`crate::openai::IMAGE_SIZE`]; the pipeline resizes it.
    async fn generate_ad(&self, product: &[u8], prompt: &str, _size: u32) -> Result<Vec<u8>, ProviderError> {
        self.edit_image(product, prompt).await
    }
}

#[async_trait]
impl BackgroundGenerator for OpenAiClient {
    async fn generate_background(&self, prompt: &str, _size: u32) -> Result<Vec<u8>, ProviderError> {
        self.generate_image(prompt).await
    }
}

#[async_trait]
impl ProductAnalyzer for OpenAiClient {
    async fn analyze(&self, image: &[u8]) -> ProductProfile {
        self.analyze_product(image).await
    }
}

#[async_trait]
impl Copywriter for OpenAiClient {
    async fn write_copy(&self, prompt: &BriefPrompt) -> Result<GeneratedAd, ProviderError> {
        self.generate_copy(prompt).await
    }
}

// ---------------------------------------------------------------------------
// Railway
// ---------------------------------------------------------------------------

#[async_trait]
impl CompositeRenderer for RailwayClient {
    async fn render(&self, request: &CompositeRequest, use_job: bool) -> Result<RailwayImage, ProviderError> {
        if use_job {
            self.generate_composite_polled(request).await
        } else {
            self.generate_composite(request).await
        }
    }
}
