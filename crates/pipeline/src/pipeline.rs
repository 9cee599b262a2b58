//! The ad generation pipeline.
//!
//! Builds the brief and copy, picks layout, background style and color
//! scheme, then produces the image according to the request mode. In the
//! default integrated mode providers are tried in order:
//!
//! 1. Gemini image-to-image (skipped while the quota is exhausted)
//! 2. OpenAI image edit
//! 3. OpenAI scene generation with local product compositing
//! 4. Local layout composite over a gradient (no network)
//!
//! A failed step is logged and recorded in the result's attempt list; only
//! the last step's failure is returned as an error.

use std::sync::Arc;
use std::time::Instant;

use adforge_compositor::fetch::fetch_image_bytes;
use adforge_core::backgrounds::{
    color_scheme_for_background, detect_background_style, premium_background,
    premium_background_prompt, BackgroundHints,
};
use adforge_core::brief::{BriefPrompt, CreativeBrief};
use adforge_core::color_scheme::{color_scheme, ColorScheme};
use adforge_core::copy::{quality_gate, AdCopy};
use adforge_core::geometry::PixelRect;
use adforge_core::layouts::{
    build_layout_background_prompt, detect_best_layout, get_layout, BackgroundPromptOptions,
    LayoutHints, LayoutTemplate, DEFAULT_LAYOUT_ID,
};
use adforge_core::scene::{
    build_gemini_ad_prompt, build_integrated_prompt, scene_style_for_scheme, ProductProfile,
};
use adforge_providers::quota::QuotaTracker;
use adforge_providers::railway::CompositeRequest as RailwayRequest;
use adforge_providers::traits::{
    AdImageGenerator, BackgroundGenerator, CompositeRenderer, Copywriter, ProductAnalyzer,
};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::Utc;

use crate::compose::{self, blocking, SceneJob, StandaloneJob};
use crate::error::PipelineError;
use crate::request::{
    AdRequest, AdResult, AdSource, CompositeRequest, CompositeResult, GenerationMode,
    StepAttempt, DEFAULT_CANVAS_SIZE, MAX_CANVAS_SIZE, MIN_CANVAS_SIZE,
};

/// Attempt name for background generation in composite mode.
const BACKGROUND_STEP: &str = "openai_background";

/// CTA used when no copy was supplied or written.
pub const DEFAULT_CTA: &str = "Jetzt entdecken";

/// Layout, background style and color scheme for one request.
#[derive(Debug, Clone, Copy)]
struct Selection {
    layout: &'static LayoutTemplate,
    background_style: &'static str,
    scheme: &'static ColorScheme,
}

/// What a successful step produced.
struct Outcome {
    png: Vec<u8>,
    source: AdSource,
    product_position: Option<PixelRect>,
    prompt: Option<String>,
}

/// Per-request inputs shared by the mode handlers.
struct Context<'a> {
    request: &'a AdRequest,
    brief: &'a CreativeBrief,
    product: &'a [u8],
    profile: Option<&'a ProductProfile>,
    copy: &'a AdCopy,
    selection: Selection,
    canvas_size: u32,
}

pub struct AdPipeline {
    http: reqwest::Client,
    gemini: Option<Arc<dyn AdImageGenerator>>,
    editor: Option<Arc<dyn AdImageGenerator>>,
    backgrounds: Option<Arc<dyn BackgroundGenerator>>,
    analyzer: Option<Arc<dyn ProductAnalyzer>>,
    copywriter: Option<Arc<dyn Copywriter>>,
    renderer: Option<Arc<dyn CompositeRenderer>>,
    quota: Option<Arc<QuotaTracker>>,
    canvas_size: u32,
}

impl AdPipeline {
    /// A pipeline with no providers: every request ends in the local
    /// composite.
    pub fn new(http: reqwest::Client) -> Self {
        Self {
            http,
            gemini: None,
            editor: None,
            backgrounds: None,
            analyzer: None,
            copywriter: None,
            renderer: None,
            quota: None,
            canvas_size: DEFAULT_CANVAS_SIZE,
        }
    }

    pub fn with_gemini(mut self, generator: Arc<dyn AdImageGenerator>) -> Self {
        self.gemini = Some(generator);
        self
    }

    pub fn with_image_editor(mut self, editor: Arc<dyn AdImageGenerator>) -> Self {
        self.editor = Some(editor);
        self
    }

    pub fn with_background_generator(mut self, generator: Arc<dyn BackgroundGenerator>) -> Self {
        self.backgrounds = Some(generator);
        self
    }

    pub fn with_analyzer(mut self, analyzer: Arc<dyn ProductAnalyzer>) -> Self {
        self.analyzer = Some(analyzer);
        self
    }

    pub fn with_copywriter(mut self, copywriter: Arc<dyn Copywriter>) -> Self {
        self.copywriter = Some(copywriter);
        self
    }

    pub fn with_renderer(mut self, renderer: Arc<dyn CompositeRenderer>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    /// Guard the Gemini step with `quota`.
    pub fn with_quota(mut self, quota: Arc<QuotaTracker>) -> Self {
        self.quota = Some(quota);
        self
    }

    pub fn with_canvas_size(mut self, canvas_size: u32) -> Self {
        self.canvas_size = canvas_size.clamp(MIN_CANVAS_SIZE, MAX_CANVAS_SIZE);
        self
    }

    pub fn canvas_size(&self) -> u32 {
        self.canvas_size
    }

    /// Names of the configured providers, for health output.
    pub fn configured_providers(&self) -> Vec<&'static str> {
        [
            ("gemini", self.gemini.is_some()),
            ("openai_edit", self.editor.is_some()),
            ("openai_background", self.backgrounds.is_some()),
            ("vision", self.analyzer.is_some()),
            ("copywriter", self.copywriter.is_some()),
            ("railway", self.renderer.is_some()),
        ]
        .into_iter()
        .filter_map(|(name, configured)| configured.then_some(name))
        .collect()
    }

    // -----------------------------------------------------------------------
    // Full generation
    // -----------------------------------------------------------------------

    pub async fn generate(&self, request: &AdRequest) -> Result<AdResult, PipelineError> {
        let started = Instant::now();
        request.validate()?;
        let canvas_size = request.canvas_size.unwrap_or(self.canvas_size);

        let product = fetch_image_bytes(&self.http, &request.product_image_url)
            .await
            .map_err(PipelineError::Product)?;

        let profile = match (&self.analyzer, request.analyze_product) {
            (Some(analyzer), true) => Some(analyzer.analyze(&product).await),
            _ => None,
        };

        let mut brief_input = request.brief.clone();
        if brief_input.product_image_url.is_none() && !request.product_image_url.starts_with("data:") {
            brief_input.product_image_url = Some(request.product_image_url.clone());
        }
        if brief_input.vision_description.is_none() {
            brief_input.vision_description = profile.as_ref().map(|p| p.description.clone());
        }
        let brief = CreativeBrief::build(&brief_input, Utc::now());

        let copy = self.resolve_copy(request, &brief).await;
        let selection = select(request, &brief, &copy);
        tracing::info!(
            mode = ?request.mode,
            layout_id = selection.layout.id,
            background_style = selection.background_style,
            color_scheme = selection.scheme.id,
            "Generating ad"
        );

        let ctx = Context {
            request,
            brief: &brief,
            product: &product,
            profile: profile.as_ref(),
            copy: &copy,
            selection,
            canvas_size,
        };
        let mut attempts = Vec::new();
        let outcome = match request.mode {
            GenerationMode::Integrated => self.integrated(&ctx, &mut attempts).await?,
            GenerationMode::Composite => self.composite(&ctx, &mut attempts).await?,
            GenerationMode::Railway => self.railway(&ctx, &mut attempts).await?,
        };

        let elapsed_ms = started.elapsed().as_millis() as u64;
        tracing::info!(
            source = outcome.source.as_str(),
            elapsed_ms,
            attempts = attempts.len(),
            "Ad generated"
        );

        Ok(AdResult {
            png: outcome.png,
            source: outcome.source,
            layout_id: selection.layout.id,
            background_style: selection.background_style,
            color_scheme: selection.scheme.id,
            style_id: brief.visual.primary_style.id,
            product_position: outcome.product_position,
            copy,
            profile,
            prompt: outcome.prompt,
            attempts,
            elapsed_ms,
        })
    }

    /// Supplied copy, else the copywriter's, else copy derived from the
    /// brief.
    async fn resolve_copy(&self, request: &AdRequest, brief: &CreativeBrief) -> AdCopy {
        if let Some(copy) = &request.copy {
            return copy.clone();
        }
        if let Some(copywriter) = &self.copywriter {
            let prompt = BriefPrompt::from_brief(brief);
            match copywriter.write_copy(&prompt).await {
                Ok(generated) => {
                    let report = quality_gate(&generated);
                    if !report.passed {
                        tracing::warn!(score = report.score, issues = ?report.issues, "Generated copy below quality bar");
                    }
                    return generated.to_ad_copy(Vec::new());
                }
                Err(e) => tracing::warn!(error = %e, "Copy generation failed, using brief copy"),
            }
        }
        AdCopy {
            headline: brief.product.name.clone(),
            subheadline: Some(brief.product.usp.clone()),
            cta: Some(DEFAULT_CTA.to_string()),
            badge: None,
            features: Vec::new(),
        }
    }

    // -----------------------------------------------------------------------
    // Integrated mode
    // -----------------------------------------------------------------------

    async fn integrated(
        &self,
        ctx: &Context<'_>,
        attempts: &mut Vec<StepAttempt>,
    ) -> Result<Outcome, PipelineError> {
        let style = scene_style_for_scheme(ctx.selection.scheme.id);
        let ad_prompt = build_gemini_ad_prompt(ctx.copy, ctx.profile, style, ctx.canvas_size);

        if let Some(gemini) = &self.gemini {
            let result = self.gemini_step(gemini.as_ref(), ctx, &ad_prompt).await;
            if let Some(outcome) = record(attempts, AdSource::Gemini.as_str(), result) {
                return Ok(outcome);
            }
        }

        if let Some(editor) = &self.editor {
            let result = finished_ad(editor.as_ref(), ctx, &ad_prompt, AdSource::OpenaiEdit).await;
            if let Some(outcome) = record(attempts, AdSource::OpenaiEdit.as_str(), result) {
                return Ok(outcome);
            }
        }

        if let Some(backgrounds) = &self.backgrounds {
            let result = self.scene_step(backgrounds.as_ref(), ctx).await;
            if let Some(outcome) = record(attempts, AdSource::OpenaiScene.as_str(), result) {
                return Ok(outcome);
            }
        }

        let result = self.local_composite(ctx, None, None).await;
        attempts.push(StepAttempt {
            step: AdSource::LocalComposite.as_str(),
            error: result.as_ref().err().map(ToString::to_string),
        });
        result
    }

    async fn gemini_step(
        &self,
        gemini: &dyn AdImageGenerator,
        ctx: &Context<'_>,
        prompt: &str,
    ) -> Result<Outcome, PipelineError> {
        let Some(quota) = &self.quota else {
            return finished_ad(gemini, ctx, prompt, AdSource::Gemini).await;
        };

        quota.ensure_available(Utc::now()).await?;
        let result = finished_ad(gemini, ctx, prompt, AdSource::Gemini).await;

        let now = Utc::now();
        let recorded = match &result {
            Ok(_) => quota.record_success(now).await,
            Err(PipelineError::Provider(e)) => quota.record_failure(now, e).await,
            // The call itself succeeded; the returned image was unusable.
            Err(_) => quota.record_success(now).await,
        };
        if let Err(e) = recorded {
            tracing::warn!(error = %e, "Failed to record Gemini quota usage");
        }
        result
    }

    async fn scene_step(
        &self,
        backgrounds: &dyn BackgroundGenerator,
        ctx: &Context<'_>,
    ) -> Result<Outcome, PipelineError> {
        let default_profile;
        let profile = match ctx.profile {
            Some(profile) => profile,
            None => {
                default_profile = ProductProfile::default();
                &default_profile
            }
        };
        let user_prompt = ctx
            .request
            .user_prompt
            .as_deref()
            .unwrap_or(ctx.brief.product.description.as_str());
        let headline = Some(ctx.copy.headline.as_str()).filter(|h| !h.trim().is_empty());
        let integrated = build_integrated_prompt(
            profile,
            user_prompt,
            headline,
            ctx.request.text_position,
            ctx.canvas_size,
        );

        let context_image = backgrounds
            .generate_background(&integrated.prompt, ctx.canvas_size)
            .await?;

        let job = SceneJob {
            context: context_image,
            product: ctx.product.to_vec(),
            device: integrated.device_frame,
            glow: integrated.glow,
            copy: ctx.copy.clone(),
            text_position: ctx.request.text_position,
            canvas_size: ctx.canvas_size,
        };
        let (png, rect) = blocking(move || Ok(compose::scene_ad(job)?)).await?;

        Ok(Outcome {
            png,
            source: AdSource::OpenaiScene,
            product_position: Some(rect),
            prompt: Some(integrated.prompt),
        })
    }

    async fn local_composite(
        &self,
        ctx: &Context<'_>,
        background: Option<Vec<u8>>,
        prompt: Option<String>,
    ) -> Result<Outcome, PipelineError> {
        let product = ctx.product.to_vec();
        let copy = ctx.copy.clone();
        let Selection { layout, scheme, .. } = ctx.selection;
        let canvas_size = ctx.canvas_size;

        let ad = blocking(move || {
            Ok(compose::layout_ad(background.as_deref(), &product, layout, scheme, &copy, canvas_size)?)
        })
        .await?;

        Ok(Outcome {
            png: ad.png,
            source: AdSource::LocalComposite,
            product_position: Some(ad.product_position),
            prompt,
        })
    }

    // -----------------------------------------------------------------------
    // Composite mode
    // -----------------------------------------------------------------------

    async fn composite(
        &self,
        ctx: &Context<'_>,
        attempts: &mut Vec<StepAttempt>,
    ) -> Result<Outcome, PipelineError> {
        let Selection {
            layout,
            background_style,
            scheme,
        } = ctx.selection;
        let prompt = match ctx.request.background_style {
            Some(_) => premium_background_prompt(background_style, Some(layout.product)),
            None => build_layout_background_prompt(
                layout,
                &BackgroundPromptOptions {
                    primary_color: ctx.request.color_scheme.as_ref().map(|_| scheme.background_top),
                    industry: Some(ctx.brief.product.industry.as_str()),
                },
            ),
        };

        let background = match &self.backgrounds {
            Some(generator) => {
                let result = generator
                    .generate_background(&prompt, ctx.canvas_size)
                    .await
                    .map_err(PipelineError::from);
                record(attempts, BACKGROUND_STEP, result)
            }
            None => None,
        };

        let result = self.local_composite(ctx, background.clone(), Some(prompt.clone())).await;
        attempts.push(StepAttempt {
            step: AdSource::LocalComposite.as_str(),
            error: result.as_ref().err().map(ToString::to_string),
        });

        match (result, background) {
            (Ok(outcome), _) => Ok(outcome),
            (Err(e), Some(background)) => {
                tracing::warn!(error = %e, "Compositing failed, returning background only");
                Ok(Outcome {
                    png: background,
                    source: AdSource::BackgroundOnly,
                    product_position: None,
                    prompt: Some(prompt),
                })
            }
            (Err(e), None) => Err(e),
        }
    }

    // -----------------------------------------------------------------------
    // Railway mode
    // -----------------------------------------------------------------------

    async fn railway(
        &self,
        ctx: &Context<'_>,
        attempts: &mut Vec<StepAttempt>,
    ) -> Result<Outcome, PipelineError> {
        let renderer = self
            .renderer
            .as_ref()
            .ok_or(PipelineError::NotConfigured("Railway image service"))?;

        let url = &ctx.request.product_image_url;
        let is_remote = url.starts_with("http://") || url.starts_with("https://");
        let request = RailwayRequest {
            product_image_base64: (!is_remote).then(|| STANDARD.encode(ctx.product)),
            product_image_url: is_remote.then(|| url.clone()),
            headline: Some(ctx.copy.headline.clone()).filter(|h| !h.trim().is_empty()),
            tagline: ctx.copy.subheadline.clone(),
            cta: ctx.copy.cta.clone(),
            user_prompt: ctx.request.user_prompt.clone(),
            industry: Some(ctx.brief.product.industry.clone()),
            accent_color: ctx.selection.scheme.accent.to_string(),
        };

        let result = renderer.render(&request, ctx.request.railway_async).await;
        attempts.push(StepAttempt {
            step: AdSource::Railway.as_str(),
            error: result.as_ref().err().map(ToString::to_string),
        });
        let image = result?;

        Ok(Outcome {
            png: image.bytes,
            source: AdSource::Railway,
            product_position: None,
            prompt: image.prompt,
        })
    }

    // -----------------------------------------------------------------------
    // Standalone composite
    // -----------------------------------------------------------------------

    /// Compose the product onto a supplied (or gradient) background without
    /// any AI step.
    pub async fn compose(&self, request: &CompositeRequest) -> Result<CompositeResult, PipelineError> {
        if request.product_image_url.trim().is_empty() {
            return Err(adforge_core::error::CoreError::Validation(
                "productImageUrl is required".to_string(),
            )
            .into());
        }
        let canvas_size = request
            .canvas_size
            .unwrap_or(self.canvas_size)
            .clamp(MIN_CANVAS_SIZE, MAX_CANVAS_SIZE);

        let product = fetch_image_bytes(&self.http, &request.product_image_url)
            .await
            .map_err(PipelineError::Product)?;
        let background = match &request.background_image_url {
            Some(url) => Some(fetch_image_bytes(&self.http, url).await?),
            None => None,
        };

        let job = StandaloneJob {
            product,
            background,
            layout: get_layout(request.layout_id.as_deref().unwrap_or(DEFAULT_LAYOUT_ID)),
            scheme: color_scheme(request.color_scheme.as_deref().unwrap_or_default()),
            copy: request.copy.clone(),
            placement: request.placement.clone(),
            glow: request.glow.clone(),
            text_overlay: request.text_overlay,
            canvas_size,
        };
        blocking(move || Ok(compose::compose_standalone(job)?)).await
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Ask `generator` for a finished ad and normalize it to the canvas.
async fn finished_ad(
    generator: &dyn AdImageGenerator,
    ctx: &Context<'_>,
    prompt: &str,
    source: AdSource,
) -> Result<Outcome, PipelineError> {
    let bytes = generator.generate_ad(ctx.product, prompt, ctx.canvas_size).await?;
    let canvas_size = ctx.canvas_size;
    let png = blocking(move || Ok(compose::normalize(&bytes, canvas_size)?)).await?;
    Ok(Outcome {
        png,
        source,
        product_position: None,
        prompt: Some(prompt.to_string()),
    })
}

/// Log and record a step. Returns the value on success.
fn record<T>(
    attempts: &mut Vec<StepAttempt>,
    step: &'static str,
    result: Result<T, PipelineError>,
) -> Option<T> {
    match result {
        Ok(value) => {
            attempts.push(StepAttempt { step, error: None });
            Some(value)
        }
        Err(e) => {
            tracing::warn!(step, error = %e, "Generation step failed");
            attempts.push(StepAttempt {
                step,
                error: Some(e.to_string()),
            });
            None
        }
    }
}

/// Explicit choices win; the rest follows from copy and brief.
fn select(request: &AdRequest, brief: &CreativeBrief, copy: &AdCopy) -> Selection {
    let industry = brief.product.industry.as_str();

    let layout = match request.layout_id.as_deref() {
        Some(id) => get_layout(id),
        None => detect_best_layout(&LayoutHints {
            feature_count: copy.features.len(),
            industry: Some(industry),
            minimal: false,
        }),
    };

    let background_style = match request.background_style.as_deref() {
        Some(id) => premium_background(id).id,
        None => detect_background_style(&BackgroundHints {
            industry: Some(industry),
            tone: Some(brief.campaign.tone.as_str()),
            ..BackgroundHints::default()
        }),
    };

    let scheme = match request.color_scheme.as_deref() {
        Some(id) => color_scheme(id),
        None => color_scheme(color_scheme_for_background(background_style)),
    };

    Selection {
        layout,
        background_style,
        scheme,
    }
}
