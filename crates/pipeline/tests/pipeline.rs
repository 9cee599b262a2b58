use std::io::Cursor;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use adforge_core::brief::{BriefInput, BriefPrompt};
use adforge_core::copy::{AdCopy, GeneratedAd};
use adforge_core::quota::{QuotaLimits, QuotaState};
use adforge_core::scene::{DeviceFrame, ProductProfile};
use adforge_pipeline::pipeline::DEFAULT_CTA;
use adforge_pipeline::request::ProductPlacement;
use adforge_pipeline::{AdPipeline, AdRequest, AdSource, CompositeRequest, GenerationMode, PipelineError};
use adforge_providers::quota::{MemoryQuotaStore, QuotaStore, QuotaTracker};
use adforge_providers::railway::{CompositeRequest as RailwayRequest, RailwayImage};
use adforge_providers::traits::{
    AdImageGenerator, BackgroundGenerator, CompositeRenderer, Copywriter, ProductAnalyzer,
};
use adforge_providers::ProviderError;
use assert_matches::assert_matches;
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::{ImageFormat, Rgba, RgbaImage};

const CANVAS: u32 = 256;

fn png(width: u32, height: u32, px: [u8; 4]) -> Vec<u8> {
    let mut out = Cursor::new(Vec::new());
    RgbaImage::from_pixel(width, height, Rgba(px))
        .write_to(&mut out, ImageFormat::Png)
        .unwrap();
    out.into_inner()
}

fn data_url(bytes: &[u8]) -> String {
    format!("data:image/png;base64,{}", STANDARD.encode(bytes))
}

fn request() -> AdRequest {
    let mut request = AdRequest::new(data_url(&png(120, 80, [200, 30, 30, 255])));
    request.canvas_size = Some(CANVAS);
    request.brief = BriefInput {
        product_name: Some("Trailrunner X".to_string()),
        industry: Some("Fitness".to_string()),
        ..BriefInput::default()
    };
    request.copy = Some(AdCopy {
        headline: "Run further".to_string(),
        subheadline: Some("Grip on every trail".to_string()),
        cta: Some("Shop now".to_string()),
        badge: None,
        features: vec!["Light".to_string(), "Waterproof".to_string()],
    });
    request
}

fn upstream_error(status: u16, body: &str) -> ProviderError {
    ProviderError::Api {
        provider: "Mock",
        status,
        body: body.to_string(),
    }
}

fn decoded_size(bytes: &[u8]) -> (u32, u32) {
    let image = image::load_from_memory(bytes).unwrap();
    (image.width(), image.height())
}

// ---------------------------------------------------------------------------
// Mock providers
// ---------------------------------------------------------------------------

/// Image provider returning a fixed image, or failing with a fixed status.
struct MockImages {
    name: &'static str,
    fail_with: Option<(u16, &'static str)>,
    calls: AtomicU32,
    prompts: Mutex<Vec<String>>,
}

impl MockImages {
    fn ok(name: &'static str) -> Arc<Self> {
        Arc::new(Self {
            name,
            fail_with: None,
            calls: AtomicU32::new(0),
            prompts: Mutex::new(Vec::new()),
        })
    }

    fn failing(name: &'static str, status: u16, body: &'static str) -> Arc<Self> {
        Arc::new(Self {
            name,
            fail_with: Some((status, body)),
            calls: AtomicU32::new(0),
            prompts: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    fn respond(&self, prompt: &str) -> Result<Vec<u8>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_string());
        match self.fail_with {
            Some((status, body)) => Err(upstream_error(status, body)),
            None => Ok(png(64, 64, [20, 20, 60, 255])),
        }
    }
}

#[async_trait]
impl AdImageGenerator for MockImages {
    fn provider(&self) -> &'static str {
        self.name
    }

    async fn generate_ad(&self, _product: &[u8], prompt: &str, _size: u32) -> Result<Vec<u8>, ProviderError> {
        self.respond(prompt)
    }
}

#[async_trait]
impl BackgroundGenerator for MockImages {
    async fn generate_background(&self, prompt: &str, _size: u32) -> Result<Vec<u8>, ProviderError> {
        self.respond(prompt)
    }
}

struct FixedAnalyzer(ProductProfile);

#[async_trait]
impl ProductAnalyzer for FixedAnalyzer {
    async fn analyze(&self, _image: &[u8]) -> ProductProfile {
        self.0.clone()
    }
}

struct MockCopywriter(Option<GeneratedAd>);

#[async_trait]
impl Copywriter for MockCopywriter {
    async fn write_copy(&self, _prompt: &BriefPrompt) -> Result<GeneratedAd, ProviderError> {
        self.0.clone().ok_or_else(|| upstream_error(500, "model unavailable"))
    }
}

#[derive(Default)]
struct MockRenderer {
    seen: Mutex<Vec<(RailwayRequest, bool)>>,
}

#[async_trait]
impl CompositeRenderer for MockRenderer {
    async fn render(&self, request: &RailwayRequest, use_job: bool) -> Result<RailwayImage, ProviderError> {
        self.seen.lock().unwrap().push((request.clone(), use_job));
        Ok(RailwayImage {
            bytes: b"railway-png".to_vec(),
            prompt: Some("remote prompt".to_string()),
            metadata: serde_json::Value::Null,
        })
    }
}

fn tracker(store: Arc<MemoryQuotaStore>, per_minute: u32) -> Arc<QuotaTracker> {
    Arc::new(QuotaTracker::new(
        store,
        QuotaLimits {
            per_minute,
            per_day: 100,
        },
        Duration::from_secs(5),
    ))
}

fn steps(result: &adforge_pipeline::AdResult) -> Vec<(&'static str, bool)> {
    result
        .attempts
        .iter()
        .map(|a| (a.step, a.error.is_none()))
        .collect()
}

// -- integrated chain --

#[tokio::test]
async fn without_providers_the_local_composite_is_used() {
    let pipeline = AdPipeline::new(reqwest::Client::new());

    let result = pipeline.generate(&request()).await.unwrap();

    assert_eq!(result.source, AdSource::LocalComposite);
    assert_eq!(steps(&result), vec![("local_composite", true)]);
    assert_eq!(result.layout_id, "feature_callout");
    assert!(result.product_position.is_some());
    assert_eq!(decoded_size(&result.png), (CANVAS, CANVAS));
}

#[tokio::test]
async fn gemini_success_ends_the_chain_and_counts_quota() {
    let gemini = MockImages::ok("gemini");
    let editor = MockImages::ok("openai_edit");
    let store = Arc::new(MemoryQuotaStore::default());
    let pipeline = AdPipeline::new(reqwest::Client::new())
        .with_gemini(gemini.clone())
        .with_image_editor(editor.clone())
        .with_quota(tracker(store.clone(), 10));

    let result = pipeline.generate(&request()).await.unwrap();

    assert_eq!(result.source, AdSource::Gemini);
    assert_eq!(editor.calls(), 0);
    assert_eq!(decoded_size(&result.png), (CANVAS, CANVAS));
    assert!(result.prompt.unwrap().contains("Run further"));
    assert_eq!(store.load().await.unwrap().minute_count, 1);
}

#[tokio::test]
async fn gemini_failure_falls_back_to_edit() {
    let gemini = MockImages::failing("gemini", 500, "internal");
    let editor = MockImages::ok("openai_edit");
    let store = Arc::new(MemoryQuotaStore::default());
    let pipeline = AdPipeline::new(reqwest::Client::new())
        .with_gemini(gemini.clone())
        .with_image_editor(editor.clone())
        .with_quota(tracker(store.clone(), 10));

    let result = pipeline.generate(&request()).await.unwrap();

    assert_eq!(result.source, AdSource::OpenaiEdit);
    assert_eq!(steps(&result), vec![("gemini", false), ("openai_edit", true)]);
    let quota = store.load().await.unwrap();
    assert_eq!(quota.error_count, 1);
    assert_eq!(quota.blocked_until, None);
}

#[tokio::test]
async fn gemini_rate_limit_blocks_the_quota() {
    let gemini = MockImages::failing("gemini", 429, "RESOURCE_EXHAUSTED");
    let store = Arc::new(MemoryQuotaStore::default());
    let pipeline = AdPipeline::new(reqwest::Client::new())
        .with_gemini(gemini.clone())
        .with_quota(tracker(store.clone(), 10));

    pipeline.generate(&request()).await.unwrap();
    assert!(store.load().await.unwrap().blocked_until.is_some());

    // The block keeps the next request away from Gemini.
    let result = pipeline.generate(&request()).await.unwrap();
    assert_eq!(gemini.calls(), 1);
    assert_eq!(result.source, AdSource::LocalComposite);
    assert_eq!(result.attempts[0].step, "gemini");
    assert!(result.attempts[0].error.as_deref().unwrap().contains("quota"));
}

#[tokio::test]
async fn exhausted_quota_skips_gemini() {
    let gemini = MockImages::ok("gemini");
    let mut state = QuotaState::default();
    state.record_success(chrono::Utc::now());
    let store = Arc::new(MemoryQuotaStore::new(state));
    let pipeline = AdPipeline::new(reqwest::Client::new())
        .with_gemini(gemini.clone())
        .with_quota(tracker(store, 1));

    let result = pipeline.generate(&request()).await.unwrap();

    assert_eq!(gemini.calls(), 0);
    assert_eq!(steps(&result), vec![("gemini", false), ("local_composite", true)]);
}

#[tokio::test]
async fn scene_step_composites_into_generated_context() {
    let editor = MockImages::failing("openai_edit", 400, "bad image");
    let backgrounds = MockImages::ok("openai_background");
    let pipeline = AdPipeline::new(reqwest::Client::new())
        .with_image_editor(editor)
        .with_background_generator(backgrounds.clone())
        .with_analyzer(Arc::new(FixedAnalyzer(ProductProfile {
            product_type: "screenshot".to_string(),
            ..ProductProfile::default()
        })));

    let mut req = request();
    req.user_prompt = Some("dashboard on an iPad, dark mode".to_string());
    let result = pipeline.generate(&req).await.unwrap();

    assert_eq!(result.source, AdSource::OpenaiScene);
    assert_eq!(steps(&result), vec![("openai_edit", false), ("openai_scene", true)]);
    assert_eq!(
        result.product_position,
        Some(DeviceFrame::Ipad.screen_area().to_pixels(CANVAS, CANVAS))
    );
    assert!(backgrounds.prompts.lock().unwrap()[0].contains("iPad Pro"));
    assert_eq!(result.profile.unwrap().product_type, "screenshot");
}

#[tokio::test]
async fn every_provider_failing_still_yields_an_ad() {
    let pipeline = AdPipeline::new(reqwest::Client::new())
        .with_gemini(MockImages::failing("gemini", 503, "overloaded"))
        .with_image_editor(MockImages::failing("openai_edit", 500, "boom"))
        .with_background_generator(MockImages::failing("openai_background", 500, "boom"));

    let result = pipeline.generate(&request()).await.unwrap();

    assert_eq!(result.source, AdSource::LocalComposite);
    assert_eq!(
        steps(&result),
        vec![
            ("gemini", false),
            ("openai_edit", false),
            ("openai_scene", false),
            ("local_composite", true),
        ]
    );
}

#[tokio::test]
async fn unreadable_product_is_a_hard_error() {
    let pipeline = AdPipeline::new(reqwest::Client::new());
    let mut req = request();
    req.product_image_url = "data:image/png;base64,***".to_string();

    let err = pipeline.generate(&req).await.unwrap_err();

    assert_matches!(err, PipelineError::Product(_));
}

// -- copy --

#[tokio::test]
async fn copywriter_fills_missing_copy() {
    let generated = GeneratedAd {
        headline: "Trails, solved".to_string(),
        slogan: Some("Built for mud".to_string()),
        cta: "Jetzt sichern".to_string(),
        ..GeneratedAd::default()
    };
    let pipeline = AdPipeline::new(reqwest::Client::new())
        .with_copywriter(Arc::new(MockCopywriter(Some(generated))));
    let mut req = request();
    req.copy = None;

    let result = pipeline.generate(&req).await.unwrap();

    assert_eq!(result.copy.headline, "Trails, solved");
    assert_eq!(result.copy.subheadline.as_deref(), Some("Built for mud"));
    // No features: the minimal layout.
    assert_eq!(result.layout_id, "hero_center_minimal");
}

#[tokio::test]
async fn failed_copywriter_falls_back_to_brief() {
    let pipeline = AdPipeline::new(reqwest::Client::new()).with_copywriter(Arc::new(MockCopywriter(None)));
    let mut req = request();
    req.copy = None;

    let result = pipeline.generate(&req).await.unwrap();

    assert_eq!(result.copy.headline, "Trailrunner X");
    assert_eq!(result.copy.cta.as_deref(), Some(DEFAULT_CTA));
}

// -- composite mode --

#[tokio::test]
async fn composite_mode_places_product_on_generated_background() {
    let backgrounds = MockImages::ok("openai_background");
    let pipeline = AdPipeline::new(reqwest::Client::new()).with_background_generator(backgrounds.clone());
    let mut req = request();
    req.mode = GenerationMode::Composite;
    req.layout_id = Some("hero_left_checklist".to_string());

    let result = pipeline.generate(&req).await.unwrap();

    assert_eq!(result.source, AdSource::LocalComposite);
    assert_eq!(result.layout_id, "hero_left_checklist");
    assert_eq!(steps(&result), vec![("openai_background", true), ("local_composite", true)]);
    assert!(backgrounds.prompts.lock().unwrap()[0].contains("NO PRODUCT"));
}

#[tokio::test]
async fn composite_failure_returns_background_only() {
    let pipeline =
        AdPipeline::new(reqwest::Client::new()).with_background_generator(MockImages::ok("openai_background"));
    let mut req = request();
    req.mode = GenerationMode::Composite;
    req.product_image_url = data_url(b"not an image");

    let result = pipeline.generate(&req).await.unwrap();

    assert_eq!(result.source, AdSource::BackgroundOnly);
    assert_eq!(result.product_position, None);
    assert_eq!(steps(&result), vec![("openai_background", true), ("local_composite", false)]);
}

// -- railway mode --

#[tokio::test]
async fn railway_mode_requires_the_service() {
    let pipeline = AdPipeline::new(reqwest::Client::new());
    let mut req = request();
    req.mode = GenerationMode::Railway;

    assert_matches!(pipeline.generate(&req).await, Err(PipelineError::NotConfigured(_)));
}

#[tokio::test]
async fn railway_mode_sends_inline_product_and_copy() {
    let renderer = Arc::new(MockRenderer::default());
    let pipeline = AdPipeline::new(reqwest::Client::new()).with_renderer(renderer.clone());
    let mut req = request();
    req.mode = GenerationMode::Railway;
    req.railway_async = true;

    let result = pipeline.generate(&req).await.unwrap();

    assert_eq!(result.source, AdSource::Railway);
    assert_eq!(result.png, b"railway-png");
    let seen = renderer.seen.lock().unwrap();
    let (sent, use_job) = &seen[0];
    assert!(use_job);
    assert!(sent.product_image_base64.is_some());
    assert_eq!(sent.product_image_url, None);
    assert_eq!(sent.headline.as_deref(), Some("Run further"));
    assert_eq!(sent.industry.as_deref(), Some("Fitness"));
}

// -- standalone compose --

#[tokio::test]
async fn compose_places_product_in_device() {
    let pipeline = AdPipeline::new(reqwest::Client::new());
    let request = CompositeRequest {
        product_image_url: data_url(&png(90, 160, [255, 255, 255, 255])),
        background_image_url: Some(data_url(&png(300, 300, [0, 0, 0, 255]))),
        layout_id: None,
        color_scheme: None,
        copy: AdCopy::default(),
        placement: ProductPlacement::Device {
            frame: DeviceFrame::Iphone,
        },
        glow: None,
        text_overlay: None,
        canvas_size: Some(CANVAS),
    };

    let result = pipeline.compose(&request).await.unwrap();

    assert_eq!(result.layout_id, None);
    assert_eq!(
        result.product_position,
        DeviceFrame::Iphone.screen_area().to_pixels(CANVAS, CANVAS)
    );
    assert_eq!(decoded_size(&result.png), (CANVAS, CANVAS));
}
