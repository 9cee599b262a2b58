//! Overlay color schemes.

use serde::Serialize;

/// Colors for every overlay element, plus the two stops of the local
/// gradient used when no generated background is available.
#[derive(Debug, Serialize)]
pub struct ColorScheme {
    pub id: &'static str,
    pub headline: &'static str,
    pub headline_glow: &'static str,
    pub subtext: &'static str,
    pub accent: &'static str,
    pub feature_bg: &'static str,
    pub feature_border: &'static str,
    pub feature_text: &'static str,
    pub checkmark: &'static str,
    pub cta_gradient_start: &'static str,
    pub cta_gradient_end: &'static str,
    pub cta_text: &'static str,
    pub badge_bg: &'static str,
    pub badge_text: &'static str,
    pub arrow: &'static str,
    pub background_top: &'static str,
    pub background_bottom: &'static str,
}

pub static DARK: ColorScheme = ColorScheme {
    id: "dark",
    headline: "#FFFFFF",
    headline_glow: "rgba(255,255,255,0.3)",
    subtext: "rgba(255,255,255,0.8)",
    accent: "#FF4444",
    feature_bg: "rgba(255,255,255,0.06)",
    feature_border: "rgba(255,255,255,0.1)",
    feature_text: "#FFFFFF",
    checkmark: "#00E676",
    cta_gradient_start: "#FF4444",
    cta_gradient_end: "#FF6666",
    cta_text: "#FFFFFF",
    badge_bg: "rgba(255,68,68,0.95)",
    badge_text: "#FFFFFF",
    arrow: "#666666",
    background_top: "#0A0A12",
    background_bottom: "#1A1A2E",
};

pub static GAMING: ColorScheme = ColorScheme {
    id: "gaming",
    headline: "#FFFFFF",
    headline_glow: "rgba(0,255,255,0.3)",
    subtext: "rgba(255,255,255,0.8)",
    accent: "#00FFFF",
    feature_bg: "rgba(0,255,255,0.08)",
    feature_border: "rgba(0,255,255,0.3)",
    feature_text: "#FFFFFF",
    checkmark: "#00FFFF",
    cta_gradient_start: "#FF00FF",
    cta_gradient_end: "#00FFFF",
    cta_text: "#FFFFFF",
    badge_bg: "rgba(255,0,255,0.9)",
    badge_text: "#FFFFFF",
    arrow: "#00FFFF",
    background_top: "#050508",
    background_bottom: "#0A0A15",
};

pub static VIBRANT: ColorScheme = ColorScheme {
    id: "vibrant",
    headline: "#FFFFFF",
    headline_glow: "rgba(236,72,153,0.3)",
    subtext: "rgba(255,255,255,0.85)",
    accent: "#EC4899",
    feature_bg: "rgba(255,255,255,0.1)",
    feature_border: "rgba(255,255,255,0.2)",
    feature_text: "#FFFFFF",
    checkmark: "#34D399",
    cta_gradient_start: "#EC4899",
    cta_gradient_end: "#8B5CF6",
    cta_text: "#FFFFFF",
    badge_bg: "rgba(139,92,246,0.95)",
    badge_text: "#FFFFFF",
    arrow: "#FFFFFF",
    background_top: "#6B21A8",
    background_bottom: "#EC4899",
};

pub static LIGHT: ColorScheme = ColorScheme {
    id: "light",
    headline: "#1A1A2E",
    headline_glow: "rgba(0,0,0,0.1)",
    subtext: "rgba(0,0,0,0.7)",
    accent: "#FF4444",
    feature_bg: "rgba(0,0,0,0.04)",
    feature_border: "rgba(0,0,0,0.08)",
    feature_text: "#1A1A2E",
    checkmark: "#10B981",
    cta_gradient_start: "#1A1A2E",
    cta_gradient_end: "#2D2D44",
    cta_text: "#FFFFFF",
    badge_bg: "rgba(255,68,68,0.95)",
    badge_text: "#FFFFFF",
    arrow: "#999999",
    background_top: "#F8F8FA",
    background_bottom: "#EAEAEF",
};

pub static COLOR_SCHEMES: [&ColorScheme; 4] = [&DARK, &GAMING, &VIBRANT, &LIGHT];

/// Look up a scheme by id, falling back to `dark`.
pub fn color_scheme(id: &str) -> &'static ColorScheme {
    COLOR_SCHEMES
        .iter()
        .copied()
        .find(|s| s.id.eq_ignore_ascii_case(id))
        .unwrap_or(&DARK)
}
