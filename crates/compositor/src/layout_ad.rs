//! Layout-aware ad composition: background, product in its zone, overlay.

use adforge_core::color_scheme::ColorScheme;
use adforge_core::copy::AdCopy;
use adforge_core::geometry::{fit_contain, PixelRect};
use adforge_core::layouts::LayoutTemplate;
use image::{imageops, DynamicImage};

use crate::error::CompositeError;
use crate::overlay::layout_overlay_svg;
use crate::raster::{self, RESIZE_FILTER};

pub struct LayoutAdSpec<'a> {
    pub layout: &'a LayoutTemplate,
    pub copy: &'a AdCopy,
    pub scheme: &'a ColorScheme,
    pub canvas_size: u32,
}

#[derive(Debug, Clone)]
pub struct ComposedAd {
    pub png: Vec<u8>,
    pub layout_id: &'static str,
    pub layout_name: &'static str,
    pub product_position: PixelRect,
    /// The product is pasted unmodified apart from scaling.
    pub product_preserved: bool,
}

/// Flatten `background` (or the scheme gradient when absent), the product
/// scaled into the layout's product zone, and the text overlay.
pub fn compose_layout_ad(
    background: Option<&DynamicImage>,
    product: &DynamicImage,
    spec: &LayoutAdSpec<'_>,
) -> Result<ComposedAd, CompositeError> {
    let size = spec.canvas_size;
    let mut canvas = match background {
        Some(bg) => raster::cover(bg, size, size),
        None => raster::gradient_background(spec.scheme, size, size),
    };

    let zone = spec.layout.product.to_pixels(size, size);
    let placement = fit_contain(product.width(), product.height(), zone)?;
    let scaled = product
        .resize_exact(placement.width, placement.height, RESIZE_FILTER)
        .to_rgba8();
    imageops::overlay(
        &mut canvas,
        &scaled,
        i64::from(placement.left),
        i64::from(placement.top),
    );

    let svg = layout_overlay_svg(spec.layout, spec.copy, spec.scheme, (size, size));
    let overlay = raster::rasterize_svg(&svg, size, size)?;
    imageops::overlay(&mut canvas, &overlay, 0, 0);

    tracing::debug!(
        layout_id = spec.layout.id,
        left = placement.left,
        top = placement.top,
        width = placement.width,
        height = placement.height,
        "Composed layout ad"
    );

    Ok(ComposedAd {
        png: raster::encode_png(&canvas)?,
        layout_id: spec.layout.id,
        layout_name: spec.layout.name,
        product_position: placement,
        product_preserved: true,
    })
}

/// Decode encoded images and compose. A missing background uses the
/// scheme gradient.
pub fn compose_layout_ad_bytes(
    background: Option<&[u8]>,
    product: &[u8],
    spec: &LayoutAdSpec<'_>,
) -> Result<ComposedAd, CompositeError> {
    let background = background.map(raster::decode).transpose()?;
    let product = raster::decode(product)?;
    compose_layout_ad(background.as_ref(), &product, spec)
}

#[cfg(test)]
mod tests {
    use adforge_core::color_scheme::DARK;
    use adforge_core::error::CoreError;
    use adforge_core::layouts::{FEATURE_CALLOUT, HERO_LEFT_CHECKLIST};
    use assert_matches::assert_matches;
    use image::{Rgba, RgbaImage};

    use super::*;

    fn solid(width: u32, height: u32, px: [u8; 4]) -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, Rgba(px)))
    }

    fn headline_only() -> AdCopy {
        AdCopy {
            headline: "Test".to_string(),
            ..AdCopy::default()
        }
    }

    fn spec<'a>(layout: &'a LayoutTemplate, copy: &'a AdCopy, canvas_size: u32) -> LayoutAdSpec<'a> {
        LayoutAdSpec {
            layout,
            copy,
            scheme: &DARK,
            canvas_size,
        }
    }

    // -- compose_layout_ad --

    #[test]
    fn product_is_contained_and_centered_in_zone() {
        let copy = headline_only();
        let bg = solid(300, 200, [0, 0, 255, 255]);
        let product = solid(100, 50, [255, 0, 0, 255]);

        let ad = compose_layout_ad(Some(&bg), &product, &spec(&FEATURE_CALLOUT, &copy, 256)).unwrap();
        assert_eq!(
            ad.product_position,
            PixelRect {
                left: 64,
                top: 96,
                width: 128,
                height: 64
            }
        );
        assert_eq!(ad.layout_id, "feature_callout");
        assert!(ad.product_preserved);

        let out = raster::decode(&ad.png).unwrap().to_rgba8();
        assert_eq!(out.dimensions(), (256, 256));
        let center = out.get_pixel(128, 128);
        assert!(center[0] >= 250 && center[1] <= 5 && center[2] <= 5, "{center:?}");
        // Background outside the product zone.
        let side = out.get_pixel(40, 128);
        assert!(side[2] >= 250 && side[0] <= 5, "{side:?}");
    }

    #[test]
    fn feature_callout_product_stays_in_center_half() {
        let copy = headline_only();
        let product = solid(300, 900, [0, 255, 0, 255]);
        let ad = compose_layout_ad(None, &product, &spec(&FEATURE_CALLOUT, &copy, 1024)).unwrap();
        let bounds = PixelRect {
            left: 256,
            top: 256,
            width: 512,
            height: 512,
        };
        assert!(bounds.contains(&ad.product_position), "{:?}", ad.product_position);
    }

    #[test]
    fn missing_background_uses_gradient() {
        let copy = AdCopy::default();
        let product = solid(10, 10, [255, 255, 255, 255]);
        let ad = compose_layout_ad(None, &product, &spec(&HERO_LEFT_CHECKLIST, &copy, 128)).unwrap();
        let out = raster::decode(&ad.png).unwrap().to_rgba8();
        assert_eq!(*out.get_pixel(127, 0), Rgba([0x0A, 0x0A, 0x12, 255]));
    }

    #[test]
    fn empty_product_is_rejected() {
        let copy = headline_only();
        let product = DynamicImage::ImageRgba8(RgbaImage::new(0, 0));
        assert_matches!(
            compose_layout_ad(None, &product, &spec(&FEATURE_CALLOUT, &copy, 64)),
            Err(CompositeError::Geometry(CoreError::Validation(_)))
        );
    }

    // -- compose_layout_ad_bytes --

    #[test]
    fn undecodable_product_is_an_error() {
        let copy = headline_only();
        assert_matches!(
            compose_layout_ad_bytes(None, b"not an image", &spec(&FEATURE_CALLOUT, &copy, 64)),
            Err(CompositeError::Image(_))
        );
    }
}
