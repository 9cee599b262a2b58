//! Zone geometry for layout-aware compositing.
//!
//! Layouts describe element positions as fractions of the canvas. This
//! module converts those fractions into pixel rectangles and computes
//! aspect-preserving placements inside them.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Zone
// ---------------------------------------------------------------------------

/// A rectangle expressed as fractions (`0.0..=1.0`) of the canvas size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Zone {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Convert to a pixel rectangle on a `canvas_width` x `canvas_height` canvas.
    ///
    /// Fractions are clamped into `[0, 1]` and the far edges are clamped to
    /// the canvas, so the result always lies inside the canvas.
    pub fn to_pixels(&self, canvas_width: u32, canvas_height: u32) -> PixelRect {
        let (left, width) = span(self.x, self.width, canvas_width);
        let (top, height) = span(self.y, self.height, canvas_height);
        PixelRect {
            left,
            top,
            width,
            height,
        }
    }

    /// Center point in canvas fractions.
    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

fn clamp_unit(v: f64) -> f64 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(0.0, 1.0)
    }
}

/// Map a fractional `[start, start + extent]` span onto `0..=total` pixels.
fn span(start: f64, extent: f64, total: u32) -> (u32, u32) {
    let start = clamp_unit(start);
    let end = clamp_unit(start + clamp_unit(extent));
    let total_f = f64::from(total);

    let a = ((start * total_f).round() as u32).min(total);
    let b = ((end * total_f).round() as u32).clamp(a, total);
    (a, b - a)
}

// ---------------------------------------------------------------------------
// PixelRect
// ---------------------------------------------------------------------------

/// An axis-aligned pixel rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelRect {
    pub left: u32,
    pub top: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    pub fn right(&self) -> u32 {
        self.left + self.width
    }

    pub fn bottom(&self) -> u32 {
        self.top + self.height
    }

    /// Whether `other` lies entirely inside `self`.
    pub fn contains(&self, other: &PixelRect) -> bool {
        other.left >= self.left
            && other.top >= self.top
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }
}

// ---------------------------------------------------------------------------
// Fitting
// ---------------------------------------------------------------------------

/// Scale a `source_width` x `source_height` image to the largest size that
/// fits inside `zone` without distortion, then center it in the zone.
pub fn fit_contain(
    source_width: u32,
    source_height: u32,
    zone: PixelRect,
) -> Result<PixelRect, CoreError> {
    if source_width == 0 || source_height == 0 {
        return Err(CoreError::Validation(format!(
            "Source image has no area ({source_width}x{source_height})"
        )));
    }
    if zone.width == 0 || zone.height == 0 {
        return Err(CoreError::Validation(format!(
            "Target zone has no area ({}x{})",
            zone.width, zone.height
        )));
    }

    let scale = f64::min(
        f64::from(zone.width) / f64::from(source_width),
        f64::from(zone.height) / f64::from(source_height),
    );
    let width = ((f64::from(source_width) * scale).round() as u32).clamp(1, zone.width);
    let height = ((f64::from(source_height) * scale).round() as u32).clamp(1, zone.height);

    Ok(PixelRect {
        left: zone.left + (zone.width - width).div_ceil(2),
        top: zone.top + (zone.height - height).div_ceil(2),
        width,
        height,
    })
}

// ---------------------------------------------------------------------------
// Anchors
// ---------------------------------------------------------------------------

/// Preset positions for placing a product on a background without a layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Anchor {
    #[default]
    Center,
    #[serde(alias = "center-bottom")]
    CenterBottom,
    #[serde(alias = "center-left")]
    CenterLeft,
    #[serde(alias = "center-right")]
    CenterRight,
}

/// Distance kept between a bottom-anchored item and the canvas edge.
pub const BOTTOM_MARGIN: i64 = 100;

/// Top-left position of an `item_width` x `item_height` item anchored on a
/// canvas, shifted by `offset` and clamped to non-negative coordinates.
pub fn anchor_position(
    anchor: Anchor,
    canvas: (u32, u32),
    item: (u32, u32),
    offset: (i64, i64),
) -> (u32, u32) {
    let (cw, ch) = (i64::from(canvas.0), i64::from(canvas.1));
    let (iw, ih) = (i64::from(item.0), i64::from(item.1));

    let centered_x = ((cw - iw) as f64 / 2.0).round() as i64;
    let centered_y = ((ch - ih) as f64 / 2.0).round() as i64;

    let (left, top) = match anchor {
        Anchor::Center => (centered_x, centered_y),
        Anchor::CenterBottom => (centered_x, ch - ih - BOTTOM_MARGIN),
        Anchor::CenterLeft => ((cw as f64 * 0.1).round() as i64, centered_y),
        Anchor::CenterRight => ((cw as f64 * 0.9).round() as i64 - iw, centered_y),
    };

    (
        (left + offset.0).max(0) as u32,
        (top + offset.1).max(0) as u32,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const CANVASES: &[(u32, u32)] = &[(1, 1), (2, 3), (7, 7), (100, 37), (1024, 1024), (1080, 1920)];

    fn fractions() -> Vec<f64> {
        vec![0.0, 0.01, 0.1, 0.25, 0.333, 0.5, 0.73, 0.98, 1.0]
    }

    // -- Zone::to_pixels --

    #[test]
    fn feature_callout_product_zone_on_1024() {
        let rect = Zone::new(0.25, 0.25, 0.5, 0.5).to_pixels(1024, 1024);
        assert_eq!(
            rect,
            PixelRect {
                left: 256,
                top: 256,
                width: 512,
                height: 512
            }
        );
        assert_eq!(rect.right(), 768);
        assert_eq!(rect.bottom(), 768);
    }

    #[test]
    fn pixel_rect_always_inside_canvas() {
        for &(w, h) in CANVASES {
            let canvas = PixelRect {
                left: 0,
                top: 0,
                width: w,
                height: h,
            };
            for &x in &fractions() {
                for &width in &fractions() {
                    for &y in &[0.0, 0.5, 1.0] {
                        for &height in &[0.0, 0.5, 1.0] {
                            let rect = Zone::new(x, y, width, height).to_pixels(w, h);
                            assert!(
                                canvas.contains(&rect),
                                "zone ({x},{y},{width},{height}) on {w}x{h} escaped: {rect:?}"
                            );
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn out_of_range_fractions_are_clamped() {
        let rect = Zone::new(-0.5, 0.9, 2.0, 0.5).to_pixels(100, 100);
        assert_eq!(rect.left, 0);
        assert_eq!(rect.right(), 100);
        assert_eq!(rect.top, 90);
        assert_eq!(rect.bottom(), 100);
    }

    #[test]
    fn nan_fractions_collapse_to_zero() {
        let rect = Zone::new(f64::NAN, 0.0, f64::NAN, 1.0).to_pixels(50, 50);
        assert_eq!(rect.left, 0);
        assert_eq!(rect.width, 0);
        assert_eq!(rect.height, 50);
    }

    // -- fit_contain --

    #[test]
    fn wide_product_fills_zone_width() {
        let zone = PixelRect {
            left: 256,
            top: 256,
            width: 512,
            height: 512,
        };
        let placed = fit_contain(1000, 500, zone).unwrap();
        assert_eq!(placed.width, 512);
        assert_eq!(placed.height, 256);
        assert_eq!(placed.left, 256);
        assert_eq!(placed.top, 384);
    }

    #[test]
    fn tall_product_fills_zone_height() {
        let zone = PixelRect {
            left: 0,
            top: 0,
            width: 400,
            height: 200,
        };
        let placed = fit_contain(300, 600, zone).unwrap();
        assert_eq!(placed.height, 200);
        assert_eq!(placed.width, 100);
        assert_eq!(placed.left, 150);
        assert_eq!(placed.top, 0);
    }

    #[test]
    fn placement_preserves_aspect_and_centers() {
        let zones = [
            PixelRect { left: 256, top: 256, width: 512, height: 512 },
            PixelRect { left: 20, top: 153, width: 461, height: 717 },
            PixelRect { left: 0, top: 0, width: 1000, height: 120 },
        ];
        let sources = [(1, 1), (640, 480), (480, 640), (1920, 1080), (200, 900), (3000, 2999)];

        for zone in zones {
            for (sw, sh) in sources {
                let placed = fit_contain(sw, sh, zone).unwrap();
                assert!(zone.contains(&placed), "{placed:?} outside {zone:?}");

                // One dimension touches the zone edges.
                assert!(placed.width == zone.width || placed.height == zone.height);

                let expected = f64::from(sw) / f64::from(sh);
                let actual = f64::from(placed.width) / f64::from(placed.height);
                let tolerance = 1.0 / f64::from(placed.width.min(placed.height)) + 1e-9;
                assert!(
                    (actual / expected - 1.0).abs() <= tolerance,
                    "{sw}x{sh} in {zone:?} distorted to {}x{}",
                    placed.width,
                    placed.height
                );

                let left_gap = placed.left - zone.left;
                let right_gap = zone.right() - placed.right();
                let top_gap = placed.top - zone.top;
                let bottom_gap = zone.bottom() - placed.bottom();
                assert!(left_gap.abs_diff(right_gap) <= 1);
                assert!(top_gap.abs_diff(bottom_gap) <= 1);
            }
        }
    }

    #[test]
    fn zero_sized_source_rejected() {
        let zone = PixelRect { left: 0, top: 0, width: 10, height: 10 };
        let err = fit_contain(0, 10, zone).unwrap_err();
        assert!(err.to_string().contains("no area"));
    }

    #[test]
    fn empty_zone_rejected() {
        let zone = PixelRect { left: 5, top: 5, width: 0, height: 10 };
        assert!(fit_contain(10, 10, zone).is_err());
    }

    // -- anchor_position --

    #[test]
    fn center_anchor_centers_item() {
        assert_eq!(anchor_position(Anchor::Center, (1024, 1024), (460, 230), (0, 0)), (282, 397));
    }

    #[test]
    fn bottom_anchor_keeps_margin() {
        let (_, top) = anchor_position(Anchor::CenterBottom, (1000, 1000), (200, 200), (0, 0));
        assert_eq!(top, 700);
    }

    #[test]
    fn side_anchors_use_ten_percent_inset() {
        assert_eq!(anchor_position(Anchor::CenterLeft, (1000, 800), (200, 200), (0, 0)), (100, 300));
        assert_eq!(anchor_position(Anchor::CenterRight, (1000, 800), (200, 200), (0, 0)), (700, 300));
    }

    #[test]
    fn negative_positions_clamp_to_zero() {
        assert_eq!(anchor_position(Anchor::Center, (100, 100), (300, 300), (-10, 0)), (0, 0));
    }

    #[test]
    fn anchor_parses_kebab_alias() {
        let anchor: Anchor = serde_json::from_str("\"center-bottom\"").unwrap();
        assert_eq!(anchor, Anchor::CenterBottom);
    }
}
