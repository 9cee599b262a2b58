//! Product placement without a layout: anchored, device screen and scene
//! composites, plus the glow and text finishing passes.

use adforge_core::copy::AdCopy;
use adforge_core::geometry::{anchor_position, fit_contain, Anchor, PixelRect};
use adforge_core::scene::{DeviceFrame, TextPosition};
use image::{imageops, DynamicImage, RgbaImage};
use serde::Deserialize;

use crate::error::CompositeError;
use crate::overlay::{glow_svg, text_overlay_svg};
use crate::raster::{self, RESIZE_FILTER};

pub const DEFAULT_PRODUCT_SCALE: f64 = 0.45;
pub const DEFAULT_SCENE_SCALE: f64 = 0.55;

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Placement {
    pub anchor: Anchor,
    /// Product width as a fraction of the background width.
    pub scale: f64,
    pub offset_x: i64,
    pub offset_y: i64,
}

impl Default for Placement {
    fn default() -> Self {
        Self {
            anchor: Anchor::Center,
            scale: DEFAULT_PRODUCT_SCALE,
            offset_x: 0,
            offset_y: 0,
        }
    }
}

fn paste(canvas: &mut RgbaImage, item: &RgbaImage, left: u32, top: u32) -> PixelRect {
    imageops::overlay(canvas, item, i64::from(left), i64::from(top));
    PixelRect {
        left,
        top,
        width: item.width(),
        height: item.height(),
    }
}

/// Paste the product onto the background at an anchor. The product keeps
/// its aspect ratio and fits a box `scale` times the background width wide
/// and as tall as the background, so it never leaves the canvas.
pub fn composite_product_on_background(
    background: &DynamicImage,
    product: &DynamicImage,
    placement: &Placement,
) -> Result<(RgbaImage, PixelRect), CompositeError> {
    if product.width() == 0 || product.height() == 0 {
        return Err(CompositeError::Canvas {
            width: product.width(),
            height: product.height(),
        });
    }
    let mut canvas = background.to_rgba8();
    let (bw, bh) = canvas.dimensions();

    let scale = placement.scale.clamp(0.01, 1.0);
    let bounds = PixelRect {
        left: 0,
        top: 0,
        width: ((f64::from(bw) * scale).round() as u32).clamp(1, bw.max(1)),
        height: bh,
    };
    let PixelRect { width, height, .. } = fit_contain(product.width(), product.height(), bounds)?;
    let scaled = product.resize_exact(width, height, RESIZE_FILTER).to_rgba8();

    let (left, top) = anchor_position(
        placement.anchor,
        (bw, bh),
        (width, height),
        (placement.offset_x, placement.offset_y),
    );
    let left = left.min(bw - width);
    let top = top.min(bh - height);
    let rect = paste(&mut canvas, &scaled, left, top);
    tracing::debug!(left, top, width, height, "Product composited on background");
    Ok((canvas, rect))
}

/// Fill the device's screen area with the product (cover fit).
pub fn composite_into_device(
    context: &DynamicImage,
    product: &DynamicImage,
    frame: DeviceFrame,
) -> Result<(RgbaImage, PixelRect), CompositeError> {
    let mut canvas = context.to_rgba8();
    let (w, h) = canvas.dimensions();
    let screen = frame.screen_area().to_pixels(w, h);
    if screen.width == 0 || screen.height == 0 {
        return Err(CompositeError::Canvas {
            width: screen.width,
            height: screen.height,
        });
    }
    let fitted = raster::cover(product, screen.width, screen.height);
    let rect = paste(&mut canvas, &fitted, screen.left, screen.top);
    tracing::debug!(device = frame.as_str(), "Device composite complete");
    Ok((canvas, rect))
}

/// Contain-fit the product into a centered box `scale` times the context
/// size, shifted down by `y_offset` pixels.
pub fn composite_into_scene(
    context: &DynamicImage,
    product: &DynamicImage,
    scale: f64,
    y_offset: i64,
) -> Result<(RgbaImage, PixelRect), CompositeError> {
    let mut canvas = context.to_rgba8();
    let (w, h) = canvas.dimensions();
    let scale = scale.clamp(0.0, 1.0);
    let box_w = (f64::from(w) * scale).round() as u32;
    let box_h = (f64::from(h) * scale).round() as u32;
    let top = (i64::from(h.saturating_sub(box_h) / 2) + y_offset).clamp(0, i64::from(h.saturating_sub(box_h)));
    let area = PixelRect {
        left: (w - box_w) / 2,
        top: top as u32,
        width: box_w,
        height: box_h,
    };

    let placement = fit_contain(product.width(), product.height(), area)?;
    let scaled = product
        .resize_exact(placement.width, placement.height, RESIZE_FILTER)
        .to_rgba8();
    let rect = paste(&mut canvas, &scaled, placement.left, placement.top);
    tracing::debug!(scale, y_offset, "Scene composite complete");
    Ok((canvas, rect))
}

/// Screen-blend a centered radial glow over the image, after resizing it
/// to the square canvas.
pub fn apply_glow(
    image: &DynamicImage,
    color: &str,
    intensity: f64,
    canvas_size: u32,
) -> Result<RgbaImage, CompositeError> {
    let mut canvas = raster::cover(image, canvas_size, canvas_size);
    let glow = raster::rasterize_svg(&glow_svg(color, intensity, canvas_size), canvas_size, canvas_size)?;
    raster::screen_blend(&mut canvas, &glow);
    Ok(canvas)
}

/// Resize to the square canvas and draw headline, subheadline and CTA.
/// A failed overlay render leaves the resized image without text.
pub fn apply_text_overlay(
    image: &DynamicImage,
    copy: &AdCopy,
    position: TextPosition,
    canvas_size: u32,
) -> RgbaImage {
    let mut canvas = raster::cover(image, canvas_size, canvas_size);
    let svg = text_overlay_svg(copy, position, canvas_size);
    match raster::rasterize_svg(&svg, canvas_size, canvas_size) {
        Ok(overlay) => imageops::overlay(&mut canvas, &overlay, 0, 0),
        Err(e) => tracing::warn!(error = %e, "Text overlay failed, returning image without text"),
    }
    canvas
}
