//! CPU-bound image work for the pipeline. Everything here is synchronous;
//! the pipeline runs it through [`blocking`].

use adforge_compositor::layout_ad::compose_layout_ad_bytes;
use adforge_compositor::overlay::{DEFAULT_GLOW_COLOR, DEFAULT_GLOW_INTENSITY};
use adforge_compositor::placement::{
    apply_glow, apply_text_overlay, composite_into_device, composite_into_scene,
    composite_product_on_background, DEFAULT_SCENE_SCALE,
};
use adforge_compositor::raster;
use adforge_compositor::{CompositeError, ComposedAd, LayoutAdSpec};
use adforge_core::color_scheme::ColorScheme;
use adforge_core::copy::AdCopy;
use adforge_core::geometry::PixelRect;
use adforge_core::layouts::LayoutTemplate;
use adforge_core::scene::{DeviceFrame, TextPosition};
use image::{DynamicImage, RgbaImage};

use crate::error::PipelineError;
use crate::request::{CompositeResult, GlowOptions, ProductPlacement};

/// Scene products sit slightly below center, leaving room for the headline.
const SCENE_Y_OFFSET_FRACTION: f64 = 0.05;

/// Run `f` on the blocking thread pool.
pub(crate) async fn blocking<T, F>(f: F) -> Result<T, PipelineError>
where
    F: FnOnce() -> Result<T, PipelineError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f).await?
}

/// Re-encode a finished ad as a square PNG of the canvas size.
pub fn normalize(bytes: &[u8], canvas_size: u32) -> Result<Vec<u8>, CompositeError> {
    let image = raster::decode(bytes)?;
    raster::encode_png(&raster::cover(&image, canvas_size, canvas_size))
}

/// Optional glow and text passes, in that order. Without either the image
/// is only resized to the canvas.
fn finish(
    image: RgbaImage,
    glow: Option<(&str, f64)>,
    text: Option<(&AdCopy, TextPosition)>,
    canvas_size: u32,
) -> Result<RgbaImage, CompositeError> {
    let mut current = DynamicImage::ImageRgba8(image);
    if let Some((color, intensity)) = glow {
        current = DynamicImage::ImageRgba8(apply_glow(&current, color, intensity, canvas_size)?);
    }
    match text {
        Some((copy, position)) => Ok(apply_text_overlay(&current, copy, position, canvas_size)),
        None => Ok(raster::cover(&current, canvas_size, canvas_size)),
    }
}

fn has_text(copy: &AdCopy) -> bool {
    !copy.headline.trim().is_empty()
}

// ---------------------------------------------------------------------------
// Pipeline steps
// ---------------------------------------------------------------------------

/// Inputs for compositing the product into a generated scene.
pub(crate) struct SceneJob {
    pub context: Vec<u8>,
    pub product: Vec<u8>,
    pub device: Option<DeviceFrame>,
    pub glow: bool,
    pub copy: AdCopy,
    pub text_position: TextPosition,
    pub canvas_size: u32,
}

/// Product into a device screen or the scene center, then glow and the
/// text overlay.
pub(crate) fn scene_ad(job: SceneJob) -> Result<(Vec<u8>, PixelRect), CompositeError> {
    let size = job.canvas_size;
    let context = DynamicImage::ImageRgba8(raster::cover(&raster::decode(&job.context)?, size, size));
    let product = raster::decode(&job.product)?;

    let (canvas, rect) = match job.device {
        Some(frame) => composite_into_device(&context, &product, frame)?,
        None => {
            let y_offset = (f64::from(size) * SCENE_Y_OFFSET_FRACTION).round() as i64;
            composite_into_scene(&context, &product, DEFAULT_SCENE_SCALE, y_offset)?
        }
    };

    let glow = job.glow.then_some((DEFAULT_GLOW_COLOR, DEFAULT_GLOW_INTENSITY));
    let text = has_text(&job.copy).then_some((&job.copy, job.text_position));
    let finished = finish(canvas, glow, text, size)?;
    Ok((raster::encode_png(&finished)?, rect))
}

/// Layout composite over `background`, or over the scheme gradient.
pub(crate) fn layout_ad(
    background: Option<&[u8]>,
    product: &[u8],
    layout: &'static LayoutTemplate,
    scheme: &'static ColorScheme,
    copy: &AdCopy,
    canvas_size: u32,
) -> Result<ComposedAd, CompositeError> {
    let spec = LayoutAdSpec {
        layout,
        copy,
        scheme,
        canvas_size,
    };
    compose_layout_ad_bytes(background, product, &spec)
}

// ---------------------------------------------------------------------------
// Standalone composite
// ---------------------------------------------------------------------------

pub(crate) struct StandaloneJob {
    pub product: Vec<u8>,
    pub background: Option<Vec<u8>>,
    pub layout: &'static LayoutTemplate,
    pub scheme: &'static ColorScheme,
    pub copy: AdCopy,
    pub placement: ProductPlacement,
    pub glow: Option<GlowOptions>,
    pub text_overlay: Option<TextPosition>,
    pub canvas_size: u32,
}

pub(crate) fn compose_standalone(job: StandaloneJob) -> Result<CompositeResult, CompositeError> {
    let size = job.canvas_size;
    let prepare = || -> Result<(DynamicImage, DynamicImage), CompositeError> {
        let background = match &job.background {
            Some(bytes) => raster::cover(&raster::decode(bytes)?, size, size),
            None => raster::gradient_background(job.scheme, size, size),
        };
        Ok((DynamicImage::ImageRgba8(background), raster::decode(&job.product)?))
    };

    let (canvas, rect) = match job.placement {
        ProductPlacement::Layout => {
            let ad = layout_ad(job.background.as_deref(), &job.product, job.layout, job.scheme, &job.copy, size)?;
            return Ok(CompositeResult {
                png: ad.png,
                layout_id: Some(ad.layout_id),
                product_position: ad.product_position,
            });
        }
        ProductPlacement::Anchor(placement) => {
            let (background, product) = prepare()?;
            composite_product_on_background(&background, &product, &placement)?
        }
        ProductPlacement::Device { frame } => {
            let (background, product) = prepare()?;
            composite_into_device(&background, &product, frame)?
        }
        ProductPlacement::Scene { scale, y_offset } => {
            let (background, product) = prepare()?;
            composite_into_scene(&background, &product, scale, y_offset)?
        }
    };

    let glow = job.glow.as_ref().map(|g| (g.color.as_str(), g.intensity));
    let text = job.text_overlay.map(|position| (&job.copy, position));
    let finished = finish(canvas, glow, text, size)?;

    Ok(CompositeResult {
        png: raster::encode_png(&finished)?,
        layout_id: None,
        product_position: rect,
    })
}
