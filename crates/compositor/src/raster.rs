//! Pixel-level helpers: decoding, encoding, SVG rasterization, gradient
//! fills and blend modes.

use std::io::Cursor;
use std::sync::{Arc, LazyLock};

use adforge_core::color_scheme::ColorScheme;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use resvg::tiny_skia::{Pixmap, Transform};
use resvg::usvg;

use crate::error::CompositeError;

/// Filter used for every resize.
pub const RESIZE_FILTER: FilterType = FilterType::Lanczos3;

/// System fonts, loaded once for every overlay render.
static FONTS: LazyLock<Arc<usvg::fontdb::Database>> = LazyLock::new(|| {
    let mut db = usvg::fontdb::Database::new();
    db.load_system_fonts();
    tracing::debug!(faces = db.len(), "Loaded system fonts for overlays");
    Arc::new(db)
});

pub fn decode(bytes: &[u8]) -> Result<DynamicImage, CompositeError> {
    Ok(image::load_from_memory(bytes)?)
}

pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, CompositeError> {
    let mut buf = Vec::new();
    image.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)?;
    Ok(buf)
}

/// Scale and center-crop `image` to exactly `width` x `height`.
pub fn cover(image: &DynamicImage, width: u32, height: u32) -> RgbaImage {
    image.resize_to_fill(width, height, RESIZE_FILTER).to_rgba8()
}

/// Render an SVG document onto a transparent `width` x `height` canvas.
pub fn rasterize_svg(svg: &str, width: u32, height: u32) -> Result<RgbaImage, CompositeError> {
    let options = usvg::Options {
        fontdb: Arc::clone(&FONTS),
        ..usvg::Options::default()
    };
    let tree = usvg::Tree::from_str(svg, &options)?;

    let mut pixmap = Pixmap::new(width, height).ok_or(CompositeError::Canvas { width, height })?;
    resvg::render(&tree, Transform::default(), &mut pixmap.as_mut());

    // tiny-skia stores premultiplied alpha; `image` expects straight alpha.
    let mut out = RgbaImage::new(width, height);
    for (dst, src) in out.pixels_mut().zip(pixmap.pixels()) {
        let c = src.demultiply();
        *dst = Rgba([c.red(), c.green(), c.blue(), c.alpha()]);
    }
    Ok(out)
}

/// Parse `#RRGGBB` into an opaque pixel.
pub fn parse_hex_color(hex: &str) -> Option<Rgba<u8>> {
    let digits = hex.strip_prefix('#')?;
    if digits.len() != 6 || !digits.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
    Some(Rgba([channel(0)?, channel(2)?, channel(4)?, 255]))
}

fn lerp(a: u8, b: u8, t: f64) -> u8 {
    (f64::from(a) + (f64::from(b) - f64::from(a)) * t).round() as u8
}

/// Vertical gradient between the scheme's background stops. Used when no
/// generated background is available.
pub fn gradient_background(scheme: &ColorScheme, width: u32, height: u32) -> RgbaImage {
    let top = parse_hex_color(scheme.background_top).unwrap_or(Rgba([10, 10, 18, 255]));
    let bottom = parse_hex_color(scheme.background_bottom).unwrap_or(Rgba([26, 26, 46, 255]));
    let span = f64::from(height.saturating_sub(1).max(1));

    RgbaImage::from_fn(width, height, |_, y| {
        let t = f64::from(y) / span;
        Rgba([
            lerp(top[0], bottom[0], t),
            lerp(top[1], bottom[1], t),
            lerp(top[2], bottom[2], t),
            255,
        ])
    })
}

/// Screen-blend `overlay` onto `base`, weighted by the overlay's alpha.
/// Both images must have the same dimensions; extra pixels are ignored.
pub fn screen_blend(base: &mut RgbaImage, overlay: &RgbaImage) {
    for (b, o) in base.pixels_mut().zip(overlay.pixels()) {
        let alpha = f64::from(o[3]) / 255.0;
        if alpha == 0.0 {
            continue;
        }
        for i in 0..3 {
            let (bc, oc) = (f64::from(b[i]), f64::from(o[i]));
            let screened = 255.0 - (255.0 - bc) * (255.0 - oc) / 255.0;
            b[i] = (bc + (screened - bc) * alpha).round().clamp(0.0, 255.0) as u8;
        }
    }
}
