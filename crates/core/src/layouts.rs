//! Ad layout templates.
//!
//! Each layout fixes where the product sits and where the headline, badge,
//! feature callouts and CTA go, plus the background prompt used to generate
//! a matching empty backdrop.

use serde::{Deserialize, Serialize};

use crate::geometry::Zone;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// The element a zone is reserved for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoneRole {
    Product,
    Headline,
    Subheadline,
    Badge,
    Feature1,
    Feature2,
    Feature3,
    Feature4,
    Cta,
}

/// Feature roles in display order.
pub const FEATURE_ROLES: [ZoneRole; 4] = [
    ZoneRole::Feature1,
    ZoneRole::Feature2,
    ZoneRole::Feature3,
    ZoneRole::Feature4,
];

#[derive(Debug, Clone, Copy, Serialize)]
pub struct LayoutZone {
    pub role: ZoneRole,
    pub zone: Zone,
}

/// A curved callout arrow drawn from one zone towards another.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Arrow {
    pub from: ZoneRole,
    pub to: ZoneRole,
}

#[derive(Debug, Serialize)]
pub struct LayoutTemplate {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub product: Zone,
    pub zones: &'static [LayoutZone],
    pub arrows: &'static [Arrow],
    pub background_prompt: &'static str,
}

impl LayoutTemplate {
    /// Look up the zone for `role`, if this layout reserves one.
    pub fn zone(&self, role: ZoneRole) -> Option<Zone> {
        if role == ZoneRole::Product {
            return Some(self.product);
        }
        self.zones.iter().find(|z| z.role == role).map(|z| z.zone)
    }
}

const fn lz(role: ZoneRole, x: f64, y: f64, width: f64, height: f64) -> LayoutZone {
    LayoutZone {
        role,
        zone: Zone::new(x, y, width, height),
    }
}

// ---------------------------------------------------------------------------
// Library
// ---------------------------------------------------------------------------

pub const DEFAULT_LAYOUT_ID: &str = "feature_callout";

pub static FEATURE_CALLOUT: LayoutTemplate = LayoutTemplate {
    id: "feature_callout",
    name: "Feature Callout",
    description: "Product centered with feature callouts around it",
    product: Zone::new(0.25, 0.25, 0.50, 0.50),
    zones: &[
        lz(ZoneRole::Headline, 0.05, 0.02, 0.90, 0.12),
        lz(ZoneRole::Badge, 0.75, 0.02, 0.22, 0.08),
        lz(ZoneRole::Feature1, 0.02, 0.20, 0.25, 0.10),
        lz(ZoneRole::Feature2, 0.73, 0.20, 0.25, 0.10),
        lz(ZoneRole::Feature3, 0.02, 0.70, 0.25, 0.10),
        lz(ZoneRole::Feature4, 0.73, 0.70, 0.25, 0.10),
        lz(ZoneRole::Cta, 0.30, 0.85, 0.40, 0.10),
    ],
    arrows: &[
        Arrow { from: ZoneRole::Feature1, to: ZoneRole::Product },
        Arrow { from: ZoneRole::Feature2, to: ZoneRole::Product },
        Arrow { from: ZoneRole::Feature3, to: ZoneRole::Product },
        Arrow { from: ZoneRole::Feature4, to: ZoneRole::Product },
    ],
    background_prompt: "Premium advertisement background with EMPTY CENTER for product placement.
Dark gradient background (#1A1A2E to #2D2D44).
Subtle geometric shapes in corners (low opacity).
Space for 4 feature callouts in corners with curved arrows.
Modern, premium aesthetic.
Center 50% of image MUST be empty for product overlay.",
};

pub static HERO_LEFT_CHECKLIST: LayoutTemplate = LayoutTemplate {
    id: "hero_left_checklist",
    name: "Hero Left + Checklist",
    description: "Product on left, benefits checklist on right",
    product: Zone::new(0.02, 0.15, 0.45, 0.70),
    zones: &[
        lz(ZoneRole::Headline, 0.50, 0.08, 0.48, 0.15),
        lz(ZoneRole::Badge, 0.75, 0.02, 0.22, 0.06),
        lz(ZoneRole::Feature1, 0.52, 0.28, 0.45, 0.10),
        lz(ZoneRole::Feature2, 0.52, 0.42, 0.45, 0.10),
        lz(ZoneRole::Feature3, 0.52, 0.56, 0.45, 0.10),
        lz(ZoneRole::Feature4, 0.52, 0.70, 0.45, 0.10),
        lz(ZoneRole::Cta, 0.52, 0.82, 0.40, 0.12),
    ],
    arrows: &[],
    background_prompt: "Split-layout advertisement background.
Left 45%: Subtle gradient or lifestyle scene, EMPTY for product overlay.
Right 55%: Dark panel (#1A1A2E) for text content.
Modern glassmorphism divider between sections.
Premium, clean aesthetic.
LEFT SIDE MUST BE EMPTY for product placement.",
};

pub static HERO_CENTER_MINIMAL: LayoutTemplate = LayoutTemplate {
    id: "hero_center_minimal",
    name: "Minimal Center Hero",
    description: "Product centered with minimal premium text",
    product: Zone::new(0.20, 0.20, 0.60, 0.55),
    zones: &[
        lz(ZoneRole::Headline, 0.10, 0.02, 0.80, 0.15),
        lz(ZoneRole::Badge, 0.78, 0.02, 0.20, 0.06),
        lz(ZoneRole::Subheadline, 0.15, 0.78, 0.70, 0.08),
        lz(ZoneRole::Cta, 0.30, 0.88, 0.40, 0.10),
    ],
    arrows: &[],
    background_prompt: "Ultra-minimal premium advertisement background.
Clean gradient from #0F0F1A to #1A1A2E.
Subtle ambient glow in center (soft circle).
Very minimal design elements.
Center 60% EMPTY for large product hero shot.
Apple-level premium aesthetic.",
};

pub static GAMING_SHOWCASE: LayoutTemplate = LayoutTemplate {
    id: "gaming_showcase",
    name: "Gaming Showcase",
    description: "Perfect for gaming products with RGB aesthetics",
    product: Zone::new(0.25, 0.22, 0.50, 0.50),
    zones: &[
        lz(ZoneRole::Headline, 0.05, 0.02, 0.90, 0.12),
        lz(ZoneRole::Badge, 0.02, 0.02, 0.20, 0.06),
        lz(ZoneRole::Feature1, 0.70, 0.25, 0.28, 0.12),
        lz(ZoneRole::Feature2, 0.70, 0.42, 0.28, 0.12),
        lz(ZoneRole::Feature3, 0.70, 0.59, 0.28, 0.12),
        lz(ZoneRole::Cta, 0.25, 0.82, 0.50, 0.12),
    ],
    arrows: &[],
    background_prompt: "Gaming/eSports style advertisement background.
Dark base (#0A0A0F) with RGB neon accents.
Subtle grid pattern overlay.
Glowing edges and particle effects.
Neon accent lines (pink, cyan, purple).
Center area EMPTY for product.
Premium gaming aesthetic, NOT cheap.",
};

pub static LIFESTYLE_BLEND: LayoutTemplate = LayoutTemplate {
    id: "lifestyle_blend",
    name: "Lifestyle Blend",
    description: "Product in lifestyle context",
    product: Zone::new(0.30, 0.30, 0.40, 0.45),
    zones: &[
        lz(ZoneRole::Headline, 0.05, 0.03, 0.60, 0.12),
        lz(ZoneRole::Badge, 0.80, 0.02, 0.18, 0.06),
        lz(ZoneRole::Subheadline, 0.05, 0.80, 0.50, 0.08),
        lz(ZoneRole::Cta, 0.55, 0.85, 0.40, 0.10),
    ],
    arrows: &[],
    background_prompt: "Lifestyle/aspirational advertisement background.
Warm ambient lighting, cozy atmosphere.
Blurred lifestyle scene (desk, room, creative space).
Gradient overlay at bottom for text.
Product area (center) should have neutral/complementary colors.
Center-right area EMPTY for product overlay.",
};

pub static LAYOUTS: [&LayoutTemplate; 5] = [
    &FEATURE_CALLOUT,
    &HERO_LEFT_CHECKLIST,
    &HERO_CENTER_MINIMAL,
    &GAMING_SHOWCASE,
    &LIFESTYLE_BLEND,
];

/// Look up a layout by id, falling back to `feature_callout`.
pub fn get_layout(id: &str) -> &'static LayoutTemplate {
    LAYOUTS
        .iter()
        .copied()
        .find(|l| l.id == id)
        .unwrap_or(&FEATURE_CALLOUT)
}

// ---------------------------------------------------------------------------
// Selection
// ---------------------------------------------------------------------------

/// Content hints used to pick a layout when none was requested.
#[derive(Debug, Default)]
pub struct LayoutHints<'a> {
    pub feature_count: usize,
    pub industry: Option<&'a str>,
    pub minimal: bool,
}

pub fn detect_best_layout(hints: &LayoutHints<'_>) -> &'static LayoutTemplate {
    let industry = hints.industry.map(str::to_lowercase);
    if matches!(industry.as_deref(), Some("gaming") | Some("tech")) {
        return &GAMING_SHOWCASE;
    }
    if hints.minimal || hints.feature_count <= 1 {
        return &HERO_CENTER_MINIMAL;
    }
    if hints.feature_count >= 3 {
        return &HERO_LEFT_CHECKLIST;
    }
    &FEATURE_CALLOUT
}

// ---------------------------------------------------------------------------
// Background prompt
// ---------------------------------------------------------------------------

/// Color the stock background prompts use for their dark panels.
const PROMPT_BASE_COLOR: &str = "#1A1A2E";

#[derive(Debug, Default)]
pub struct BackgroundPromptOptions<'a> {
    pub primary_color: Option<&'a str>,
    pub industry: Option<&'a str>,
}

fn percent(fraction: f64) -> i64 {
    (fraction * 100.0).round() as i64
}

/// Build the prompt for generating an empty background that fits `layout`.
pub fn build_layout_background_prompt(
    layout: &LayoutTemplate,
    options: &BackgroundPromptOptions<'_>,
) -> String {
    let mut prompt = match options.primary_color {
        Some(color) => layout.background_prompt.replace(PROMPT_BASE_COLOR, color),
        None => layout.background_prompt.to_string(),
    };

    if options
        .industry
        .is_some_and(|i| i.eq_ignore_ascii_case("gaming"))
    {
        prompt.push_str("\nGaming aesthetic: RGB neon accents, subtle grid pattern.");
    }

    let product = layout.product;
    prompt.push_str(&format!(
        "\n\nCRITICAL REQUIREMENTS:
1. The PRODUCT ZONE ({}% from left, {}% from top, {}% wide) MUST be EMPTY or have only subtle background
2. Leave space for text overlays in defined zones
3. Professional, premium, 2025-level design
4. 1:1 aspect ratio (1024x1024)

NO PRODUCT in the generated image - product will be composited later.",
        percent(product.x),
        percent(product.y),
        percent(product.width),
    ));

    prompt
}
