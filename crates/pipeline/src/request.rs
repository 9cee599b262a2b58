//! Request and result types for ad generation.

use adforge_compositor::placement::Placement;
use adforge_core::brief::BriefInput;
use adforge_core::copy::AdCopy;
use adforge_core::error::CoreError;
use adforge_core::geometry::PixelRect;
use adforge_core::scene::{DeviceFrame, ProductProfile, TextPosition};
use serde::{Deserialize, Serialize};

pub const DEFAULT_CANVAS_SIZE: u32 = 1024;
pub const MIN_CANVAS_SIZE: u32 = 256;
pub const MAX_CANVAS_SIZE: u32 = 2048;

/// How the final image is produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationMode {
    /// Image-to-image providers first, local compositing last.
    #[default]
    Integrated,
    /// Generated background plus layout-aware local compositing.
    Composite,
    /// The remote Railway composite service.
    Railway,
}

/// Which step produced the returned image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdSource {
    Gemini,
    OpenaiEdit,
    OpenaiScene,
    LocalComposite,
    Railway,
    BackgroundOnly,
}

impl AdSource {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Gemini => "gemini",
            Self::OpenaiEdit => "openai_edit",
            Self::OpenaiScene => "openai_scene",
            Self::LocalComposite => "local_composite",
            Self::Railway => "railway",
            Self::BackgroundOnly => "background_only",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdRequest {
    /// `http(s)` or base64 `data:` URL of the product photo.
    pub product_image_url: String,
    #[serde(default)]
    pub brief: BriefInput,
    /// Overlay copy. Written by the copywriter, or derived from the brief,
    /// when absent.
    #[serde(default)]
    pub copy: Option<AdCopy>,
    #[serde(default)]
    pub mode: GenerationMode,
    #[serde(default)]
    pub layout_id: Option<String>,
    #[serde(default)]
    pub background_style: Option<String>,
    #[serde(default)]
    pub color_scheme: Option<String>,
    /// Free-text creative direction for scene prompts.
    #[serde(default)]
    pub user_prompt: Option<String>,
    #[serde(default)]
    pub text_position: TextPosition,
    #[serde(default)]
    pub canvas_size: Option<u32>,
    #[serde(default = "default_true")]
    pub analyze_product: bool,
    /// Railway mode only: use the async job endpoint.
    #[serde(default)]
    pub railway_async: bool,
}

fn default_true() -> bool {
    true
}

impl AdRequest {
    pub fn new(product_image_url: impl Into<String>) -> Self {
        Self {
            product_image_url: product_image_url.into(),
            brief: BriefInput::default(),
            copy: None,
            mode: GenerationMode::default(),
            layout_id: None,
            background_style: None,
            color_scheme: None,
            user_prompt: None,
            text_position: TextPosition::default(),
            canvas_size: None,
            analyze_product: true,
            railway_async: false,
        }
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if self.product_image_url.trim().is_empty() {
            return Err(CoreError::Validation("productImageUrl is required".to_string()));
        }
        if let Some(size) = self.canvas_size {
            if !(MIN_CANVAS_SIZE..=MAX_CANVAS_SIZE).contains(&size) {
                return Err(CoreError::Validation(format!(
                    "canvasSize must be between {MIN_CANVAS_SIZE} and {MAX_CANVAS_SIZE}, got {size}"
                )));
            }
        }
        Ok(())
    }
}

/// One step of the fallback chain and how it went.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepAttempt {
    pub step: &'static str,
    /// `None` when the step succeeded.
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdResult {
    #[serde(skip)]
    pub png: Vec<u8>,
    pub source: AdSource,
    pub layout_id: &'static str,
    pub background_style: &'static str,
    pub color_scheme: &'static str,
    pub style_id: &'static str,
    pub product_position: Option<PixelRect>,
    pub copy: AdCopy,
    pub profile: Option<ProductProfile>,
    /// Prompt sent to the step that produced the image.
    pub prompt: Option<String>,
    pub attempts: Vec<StepAttempt>,
    pub elapsed_ms: u64,
}

// ---------------------------------------------------------------------------
// Standalone compositing
// ---------------------------------------------------------------------------

/// How a standalone composite places the product.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProductPlacement {
    /// Into the layout's product zone, with the layout overlay.
    #[default]
    Layout,
    /// Anchored on the background at a fraction of its width.
    Anchor(Placement),
    /// Into a device screen.
    Device { frame: DeviceFrame },
    /// Centered in the scene.
    Scene {
        #[serde(default = "default_scene_scale")]
        scale: f64,
        #[serde(default, rename = "yOffset")]
        y_offset: i64,
    },
}

fn default_scene_scale() -> f64 {
    adforge_compositor::placement::DEFAULT_SCENE_SCALE
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlowOptions {
    #[serde(default = "default_glow_color")]
    pub color: String,
    #[serde(default = "default_glow_intensity")]
    pub intensity: f64,
}

fn default_glow_color() -> String {
    adforge_compositor::overlay::DEFAULT_GLOW_COLOR.to_string()
}

fn default_glow_intensity() -> f64 {
    adforge_compositor::overlay::DEFAULT_GLOW_INTENSITY
}

/// Compose a product onto a supplied background without any AI step.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompositeRequest {
    pub product_image_url: String,
    /// Without a background the color scheme gradient is used.
    #[serde(default)]
    pub background_image_url: Option<String>,
    #[serde(default)]
    pub layout_id: Option<String>,
    #[serde(default)]
    pub color_scheme: Option<String>,
    #[serde(default)]
    pub copy: AdCopy,
    #[serde(default)]
    pub placement: ProductPlacement,
    #[serde(default)]
    pub glow: Option<GlowOptions>,
    /// Draw the scene text overlay. Ignored for layout placement, which
    /// always draws the layout overlay.
    #[serde(default)]
    pub text_overlay: Option<TextPosition>,
    #[serde(default)]
    pub canvas_size: Option<u32>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompositeResult {
    #[serde(skip)]
    pub png: Vec<u8>,
    pub layout_id: Option<&'static str>,
    pub product_position: PixelRect,
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use serde_json::json;

    use super::*;

    #[test]
    fn request_defaults() {
        let request: AdRequest = serde_json::from_value(json!({ "productImageUrl": "https://x/p.png" })).unwrap();
        assert_eq!(request.mode, GenerationMode::Integrated);
        assert!(request.analyze_product);
        assert_eq!(request.text_position, TextPosition::Bottom);
        assert!(request.copy.is_none());
    }

    #[test]
    fn blank_product_url_is_rejected() {
        assert_matches!(AdRequest::new("  ").validate(), Err(CoreError::Validation(_)));
    }

    #[test]
    fn canvas_size_is_bounded() {
        let mut request = AdRequest::new("https://x/p.png");
        request.canvas_size = Some(64);
        assert!(request.validate().is_err());
        request.canvas_size = Some(1080);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn placement_is_tagged_by_kind() {
        let p: ProductPlacement = serde_json::from_value(json!({ "kind": "device", "frame": "iphone" })).unwrap();
        assert_matches!(p, ProductPlacement::Device { frame: DeviceFrame::Iphone });

        let p: ProductPlacement =
            serde_json::from_value(json!({ "kind": "anchor", "anchor": "center-bottom", "scale": 0.3 })).unwrap();
        assert_matches!(p, ProductPlacement::Anchor(Placement { scale, .. }) if (scale - 0.3).abs() < 1e-9);

        let p: ProductPlacement = serde_json::from_value(json!({ "kind": "scene" })).unwrap();
        assert_matches!(p, ProductPlacement::Scene { y_offset: 0, .. });
    }

    #[test]
    fn source_names_match_serde() {
        for source in [AdSource::Gemini, AdSource::OpenaiEdit, AdSource::BackgroundOnly] {
            assert_eq!(serde_json::to_value(source).unwrap(), json!(source.as_str()));
        }
    }
}
