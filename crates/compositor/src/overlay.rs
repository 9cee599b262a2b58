//! SVG overlay documents.
//!
//! Overlays are built as SVG text and rasterized with [`crate::raster`].
//! Every user-supplied string goes through [`escape_xml`] first.

use std::fmt::Write as _;

use adforge_core::color_scheme::ColorScheme;
use adforge_core::copy::AdCopy;
use adforge_core::geometry::Zone;
use adforge_core::layouts::{LayoutTemplate, ZoneRole, FEATURE_ROLES};
use adforge_core::scene::TextPosition;

const FONT_FAMILY: &str = "Arial, Helvetica, sans-serif";

/// Maximum number of feature callouts a layout renders.
pub const MAX_FEATURES: usize = 4;

pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// Greedy word wrap at `max_chars` characters per line. Words longer than
/// a line are kept whole on their own line.
pub fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let needed = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };
        if needed > max_chars && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// A zone scaled to canvas pixels, kept fractional for SVG coordinates.
#[derive(Debug, Clone, Copy)]
struct Frame {
    x: f64,
    y: f64,
    w: f64,
    h: f64,
}

impl Frame {
    fn of(zone: Zone, width: u32, height: u32) -> Self {
        Self {
            x: zone.x * f64::from(width),
            y: zone.y * f64::from(height),
            w: zone.width * f64::from(width),
            h: zone.height * f64::from(height),
        }
    }

    fn center_x(&self) -> f64 {
        self.x + self.w / 2.0
    }

    fn center_y(&self) -> f64 {
        self.y + self.h / 2.0
    }
}

fn headline_font_size(headline: &str) -> u32 {
    match headline.chars().count() {
        n if n > 25 => 38,
        n if n > 18 => 44,
        _ => 52,
    }
}

// ---------------------------------------------------------------------------
// Layout overlay
// ---------------------------------------------------------------------------

/// Overlay for a layout-aware ad: badge, headline, subheadline, feature
/// callouts with arrows towards the product, and the CTA button.
///
/// Elements whose text is missing, or whose zone the layout does not
/// define, are skipped.
pub fn layout_overlay_svg(
    layout: &LayoutTemplate,
    copy: &AdCopy,
    scheme: &ColorScheme,
    canvas: (u32, u32),
) -> String {
    let (width, height) = canvas;
    let frame = |role: ZoneRole| layout.zone(role).map(|z| Frame::of(z, width, height));
    let mut body = String::new();

    if let (Some(badge), Some(f)) = (non_blank(copy.badge.as_deref()), frame(ZoneRole::Badge)) {
        let _ = write!(
            body,
            r#"<rect x="{x:.1}" y="{y:.1}" width="{w:.1}" height="{h:.1}" rx="20" fill="{bg}"/><text x="{cx:.1}" y="{ty:.1}" font-family="{FONT_FAMILY}" font-size="13" font-weight="700" letter-spacing="1" fill="{fg}" text-anchor="middle">{text}</text>"#,
            x = f.x,
            y = f.y,
            w = f.w,
            h = f.h,
            bg = scheme.badge_bg,
            cx = f.center_x(),
            ty = f.center_y() + 5.0,
            fg = scheme.badge_text,
            text = escape_xml(&badge.to_uppercase()),
        );
    }

    if let (Some(headline), Some(f)) = (non_blank(Some(copy.headline.as_str())), frame(ZoneRole::Headline)) {
        let size = headline_font_size(headline);
        let text = escape_xml(headline);
        let (cx, ty) = (f.center_x(), f.y + f.h * 0.7);
        let _ = write!(
            body,
            r#"<text x="{cx:.1}" y="{ty:.1}" font-family="{FONT_FAMILY}" font-size="{size}" font-weight="800" fill="{glow}" text-anchor="middle" filter="url(#glow)" opacity="0.5">{text}</text><text x="{cx:.1}" y="{ty:.1}" font-family="{FONT_FAMILY}" font-size="{size}" font-weight="800" fill="{fill}" text-anchor="middle" filter="url(#shadow)">{text}</text>"#,
            glow = scheme.headline_glow,
            fill = scheme.headline,
        );
    }

    if let (Some(sub), Some(f)) = (non_blank(copy.subheadline.as_deref()), frame(ZoneRole::Subheadline)) {
        let _ = write!(
            body,
            r#"<text x="{cx:.1}" y="{ty:.1}" font-family="{FONT_FAMILY}" font-size="18" fill="{fill}" text-anchor="middle">{text}</text>"#,
            cx = f.center_x(),
            ty = f.y + f.h * 0.6,
            fill = scheme.subtext,
            text = escape_xml(sub),
        );
    }

    let features: Vec<&str> = copy
        .features
        .iter()
        .map(|f| f.trim())
        .filter(|f| !f.is_empty())
        .take(MAX_FEATURES)
        .collect();

    for arrow in layout.arrows {
        let Some(index) = FEATURE_ROLES.iter().position(|r| *r == arrow.from) else {
            continue;
        };
        if index >= features.len() {
            continue;
        }
        let (Some(from), Some(to)) = (frame(arrow.from), target_frame(layout, arrow.to, width, height))
        else {
            continue;
        };
        body.push_str(&arrow_path(from, to, index, scheme.arrow));
    }

    for (role, feature) in FEATURE_ROLES.iter().zip(&features) {
        let Some(f) = frame(*role) else { continue };
        let ty = f.y + f.h / 2.0 + 5.0;
        let _ = write!(
            body,
            r#"<rect x="{x:.1}" y="{y:.1}" width="{w:.1}" height="{h:.1}" rx="12" fill="{bg}" stroke="{border}" stroke-width="1"/><text x="{cx:.1}" y="{ty:.1}" font-family="{FONT_FAMILY}" font-size="20" font-weight="700" fill="{check}">✓</text><text x="{tx:.1}" y="{ty:.1}" font-family="{FONT_FAMILY}" font-size="15" fill="{fg}">{text}</text>"#,
            x = f.x,
            y = f.y,
            w = f.w,
            h = f.h,
            bg = scheme.feature_bg,
            border = scheme.feature_border,
            cx = f.x + 30.0,
            check = scheme.checkmark,
            tx = f.x + 55.0,
            fg = scheme.feature_text,
            text = escape_xml(feature),
        );
    }

    if let (Some(cta), Some(f)) = (non_blank(copy.cta.as_deref()), frame(ZoneRole::Cta)) {
        let _ = write!(
            body,
            r#"<rect x="{x:.1}" y="{y:.1}" width="{w:.1}" height="{h:.1}" rx="{rx:.1}" fill="url(#cta)"/><text x="{cx:.1}" y="{ty:.1}" font-family="{FONT_FAMILY}" font-size="18" font-weight="700" fill="{fg}" text-anchor="middle">{text}</text>"#,
            x = f.x,
            y = f.y,
            w = f.w,
            h = f.h,
            rx = f.h / 2.0,
            cx = f.center_x(),
            ty = f.center_y() + 6.0,
            fg = scheme.cta_text,
            text = escape_xml(cta),
        );
    }

    format!(
        r##"<svg width="{width}" height="{height}" viewBox="0 0 {width} {height}" xmlns="http://www.w3.org/2000/svg"><defs><filter id="shadow" x="-20%" y="-20%" width="140%" height="140%"><feDropShadow dx="0" dy="4" stdDeviation="8" flood-color="#000000" flood-opacity="0.5"/></filter><filter id="glow" x="-20%" y="-20%" width="140%" height="140%"><feGaussianBlur stdDeviation="3"/></filter><linearGradient id="cta" x1="0%" y1="0%" x2="100%" y2="0%"><stop offset="0%" stop-color="{start}"/><stop offset="100%" stop-color="{end}"/></linearGradient></defs>{body}</svg>"##,
        start = scheme.cta_gradient_start,
        end = scheme.cta_gradient_end,
    )
}

fn non_blank(text: Option<&str>) -> Option<&str> {
    text.map(str::trim).filter(|t| !t.is_empty())
}

fn target_frame(layout: &LayoutTemplate, role: ZoneRole, width: u32, height: u32) -> Option<Frame> {
    match role {
        ZoneRole::Product => Some(Frame::of(layout.product, width, height)),
        other => layout.zone(other).map(|z| Frame::of(z, width, height)),
    }
}

/// Dashed quadratic curve from the feature edge facing the target to the
/// target's near edge. Odd and even callouts bend in opposite directions.
fn arrow_path(from: Frame, to: Frame, index: usize, color: &str) -> String {
    let (from_x, to_x) = if from.center_x() < to.center_x() {
        (from.x + from.w, to.x)
    } else {
        (from.x, to.x + to.w)
    };
    let (from_y, to_y) = (from.center_y(), to.center_y());
    let mid_x = (from_x + to_x) / 2.0;
    let curve = if index % 2 == 0 { -30.0 } else { 30.0 };
    format!(
        r#"<path d="M {from_x:.1},{from_y:.1} Q {mid_x:.1},{ctrl_y:.1} {to_x:.1},{to_y:.1}" stroke="{color}" stroke-width="2" stroke-dasharray="5,5" fill="none" opacity="0.6"/>"#,
        ctrl_y = from_y + curve,
    )
}

// ---------------------------------------------------------------------------
// Scene text overlay
// ---------------------------------------------------------------------------

const SUBHEADLINE_WRAP: usize = 50;
const SUBHEADLINE_MAX_LINES: usize = 2;
const CTA_HEIGHT: u32 = 50;

fn scene_headline_size(headline: &str) -> u32 {
    match headline.chars().count() {
        n if n > 35 => 42,
        n if n > 25 => 52,
        _ => 64,
    }
}

/// Headline, subheadline and CTA over a darkening fade, for scene and
/// device composites that have no layout zones.
pub fn text_overlay_svg(copy: &AdCopy, position: TextPosition, canvas_size: u32) -> String {
    let size = canvas_size;
    let center = f64::from(size) / 2.0;
    let mut body = String::new();

    let (headline_y, sub_offset, cta_y) = match position {
        TextPosition::Bottom => (f64::from(size) - 160.0, 45.0, f64::from(size) - 55.0),
        TextPosition::Top => (90.0, 60.0, 90.0 + 60.0 + 70.0),
    };

    if let Some(headline) = non_blank(Some(copy.headline.as_str())) {
        let _ = write!(
            body,
            r##"<text x="{center:.1}" y="{headline_y:.1}" font-family="{FONT_FAMILY}" font-size="{fs}" font-weight="800" fill="#FFFFFF" text-anchor="middle" filter="url(#shadow)">{text}</text>"##,
            fs = scene_headline_size(headline),
            text = escape_xml(headline),
        );
    }

    if let Some(sub) = non_blank(copy.subheadline.as_deref()) {
        for (i, line) in wrap_text(sub, SUBHEADLINE_WRAP)
            .iter()
            .take(SUBHEADLINE_MAX_LINES)
            .enumerate()
        {
            let _ = write!(
                body,
                r#"<text x="{center:.1}" y="{y:.1}" font-family="{FONT_FAMILY}" font-size="22" font-weight="500" fill="rgba(255,255,255,0.85)" text-anchor="middle" filter="url(#shadow)">{text}</text>"#,
                y = headline_y + sub_offset + 26.0 * i as f64,
                text = escape_xml(line),
            );
        }
    }

    if let Some(cta) = non_blank(copy.cta.as_deref()) {
        let cta_width = (cta.chars().count() as u32 * 16 + 50).max(180);
        let cta_x = center - f64::from(cta_width) / 2.0;
        let _ = write!(
            body,
            r##"<rect x="{cta_x:.1}" y="{cta_y:.1}" width="{cta_width}" height="{CTA_HEIGHT}" rx="25" fill="#FF4444"/><text x="{center:.1}" y="{ty:.1}" font-family="{FONT_FAMILY}" font-size="18" font-weight="700" fill="#FFFFFF" text-anchor="middle">{text}</text>"##,
            ty = cta_y + 25.0 + 7.0,
            text = escape_xml(cta),
        );
    }

    format!(
        r##"<svg width="{size}" height="{size}" viewBox="0 0 {size} {size}" xmlns="http://www.w3.org/2000/svg"><defs><linearGradient id="fade" x1="0%" y1="0%" x2="0%" y2="100%"><stop offset="0%" stop-color="#000000" stop-opacity="0"/><stop offset="65%" stop-color="#000000" stop-opacity="0"/><stop offset="100%" stop-color="#000000" stop-opacity="0.75"/></linearGradient><filter id="shadow" x="-50%" y="-50%" width="200%" height="200%"><feDropShadow dx="0" dy="3" stdDeviation="6" flood-color="#000000" flood-opacity="0.7"/></filter></defs><rect x="0" y="0" width="{size}" height="{size}" fill="url(#fade)"/>{body}</svg>"##
    )
}

// ---------------------------------------------------------------------------
// Glow
// ---------------------------------------------------------------------------

pub const DEFAULT_GLOW_COLOR: &str = "#FF4444";
pub const DEFAULT_GLOW_INTENSITY: f64 = 0.3;

/// Centered elliptical radial glow, meant to be screen-blended.
pub fn glow_svg(color: &str, intensity: f64, canvas_size: u32) -> String {
    let size = f64::from(canvas_size);
    let intensity = intensity.clamp(0.0, 1.0);
    let color = escape_xml(color);
    format!(
        r#"<svg width="{canvas_size}" height="{canvas_size}" xmlns="http://www.w3.org/2000/svg"><defs><radialGradient id="glow" cx="50%" cy="50%" r="50%"><stop offset="0%" stop-color="{color}" stop-opacity="{intensity}"/><stop offset="50%" stop-color="{color}" stop-opacity="{mid}"/><stop offset="100%" stop-color="{color}" stop-opacity="0"/></radialGradient></defs><ellipse cx="{c:.1}" cy="{c:.1}" rx="{rx:.1}" ry="{ry:.1}" fill="url(#glow)"/></svg>"#,
        mid = intensity * 0.3,
        c = size / 2.0,
        rx = size * 0.4,
        ry = size * 0.35,
    )
}

#[cfg(test)]
mod tests {
    use adforge_core::color_scheme::DARK;
    use adforge_core::layouts::{FEATURE_CALLOUT, HERO_CENTER_MINIMAL};

    use super::*;

    fn copy() -> AdCopy {
        AdCopy {
            headline: "Fokus in 7 Tagen".to_string(),
            subheadline: Some("Für Teams, die liefern".to_string()),
            cta: Some("Jetzt testen".to_string()),
            badge: Some("neu".to_string()),
            features: vec!["Leise".to_string(), "Kabellos".to_string()],
        }
    }

    // -- escape_xml --

    #[test]
    fn escapes_markup() {
        assert_eq!(escape_xml(r#"<b>"A" & 'B'</b>"#), "&lt;b&gt;&quot;A&quot; &amp; &apos;B&apos;&lt;/b&gt;");
        assert_eq!(escape_xml("Größe ✓"), "Größe ✓");
    }

    // -- wrap_text --

    #[test]
    fn wraps_on_word_boundaries() {
        assert_eq!(wrap_text("one two three four", 9), vec!["one two", "three", "four"]);
    }

    #[test]
    fn long_words_stay_whole() {
        assert_eq!(wrap_text("a supercalifragilistic b", 5), vec!["a", "supercalifragilistic", "b"]);
        assert!(wrap_text("   ", 10).is_empty());
    }

    // -- layout_overlay_svg --

    #[test]
    fn layout_overlay_has_all_elements() {
        let svg = layout_overlay_svg(&FEATURE_CALLOUT, &copy(), &DARK, (1024, 1024));
        assert!(svg.contains(">NEU</text>"));
        assert!(svg.contains("Fokus in 7 Tagen"));
        assert!(svg.contains("Kabellos"));
        assert!(svg.contains("Jetzt testen"));
        assert_eq!(svg.matches("✓").count(), 2);
        // One arrow per rendered feature.
        assert_eq!(svg.matches("<path").count(), 2);
    }

    #[test]
    fn layout_overlay_escapes_copy() {
        let c = AdCopy {
            headline: "Tom & Jerry <3".to_string(),
            ..AdCopy::default()
        };
        let svg = layout_overlay_svg(&FEATURE_CALLOUT, &c, &DARK, (512, 512));
        assert!(svg.contains("Tom &amp; Jerry &lt;3"));
        assert!(!svg.contains("<3"));
    }

    #[test]
    fn features_are_capped() {
        let c = AdCopy {
            features: (1..=6).map(|i| format!("F{i}")).collect(),
            ..copy()
        };
        let svg = layout_overlay_svg(&FEATURE_CALLOUT, &c, &DARK, (1024, 1024));
        assert_eq!(svg.matches("✓").count(), MAX_FEATURES);
        assert!(!svg.contains("F5"));
    }

    #[test]
    fn layout_without_feature_zones_skips_features() {
        let svg = layout_overlay_svg(&HERO_CENTER_MINIMAL, &copy(), &DARK, (1024, 1024));
        assert!(!svg.contains("✓"));
        assert!(!svg.contains("<path"));
    }

    #[test]
    fn left_feature_arrow_starts_at_right_edge() {
        let c = AdCopy {
            features: vec!["Only".to_string()],
            ..AdCopy::default()
        };
        // feature_1 spans x 0.02..0.27 and the product starts at 0.25.
        let svg = layout_overlay_svg(&FEATURE_CALLOUT, &c, &DARK, (1000, 1000));
        assert!(svg.contains(r#"d="M 270.0,250.0 Q 260.0,220.0 250.0,500.0""#), "{svg}");
    }

    #[test]
    fn headline_shrinks_with_length() {
        assert_eq!(headline_font_size("Kurz"), 52);
        assert_eq!(headline_font_size("Neunzehn Zeichen!!"), 52);
        assert_eq!(headline_font_size("Neunzehn Zeichen!!!"), 44);
        assert_eq!(headline_font_size(&"x".repeat(26)), 38);
    }

    // -- text_overlay_svg --

    #[test]
    fn bottom_overlay_has_fade_and_cta() {
        let svg = text_overlay_svg(&copy(), TextPosition::Bottom, 1024);
        assert!(svg.contains(r#"fill="url(#fade)""#));
        assert!(svg.contains(r#"y="864.0""#));
        assert!(svg.contains("Jetzt testen"));
    }

    #[test]
    fn top_overlay_stacks_from_the_top() {
        let svg = text_overlay_svg(&copy(), TextPosition::Top, 1024);
        assert!(svg.contains(r#"y="90.0""#));
        assert!(svg.contains(r#"y="150.0""#));
        assert!(svg.contains(r#"y="220.0""#));
    }

    #[test]
    fn subheadline_is_limited_to_two_lines() {
        let c = AdCopy {
            subheadline: Some("word ".repeat(40)),
            ..copy()
        };
        let svg = text_overlay_svg(&c, TextPosition::Bottom, 1024);
        assert_eq!(svg.matches(r#"font-size="22""#).count(), 2);
    }

    #[test]
    fn scene_headline_sizes() {
        assert_eq!(scene_headline_size("Short"), 64);
        assert_eq!(scene_headline_size(&"x".repeat(30)), 52);
        assert_eq!(scene_headline_size(&"x".repeat(40)), 42);
    }

    // -- glow_svg --

    #[test]
    fn glow_scales_with_canvas() {
        let svg = glow_svg("#00FF00", 0.5, 1000);
        assert!(svg.contains(r#"rx="400.0""#));
        assert!(svg.contains(r#"ry="350.0""#));
        assert!(svg.contains(r#"stop-opacity="0.15""#));
    }
}
