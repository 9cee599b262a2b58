//! Premium background prompt library.
//!
//! These prompts ask an image model for an empty backdrop; the product is
//! always composited afterwards.

use serde::Serialize;

use crate::geometry::Zone;

#[derive(Debug, Serialize)]
pub struct PremiumBackground {
    pub id: &'static str,
    pub name: &'static str,
    /// Overlay color scheme that reads well on this background.
    pub color_scheme: &'static str,
    pub prompt: &'static str,
}

pub const DEFAULT_BACKGROUND_ID: &str = "dark_premium";

pub static PREMIUM_BACKGROUNDS: [PremiumBackground; 6] = [
    PremiumBackground {
        id: "dark_premium",
        name: "Dark Premium",
        color_scheme: "dark",
        prompt: "Create a STUNNING premium advertisement background. NO PRODUCT - leave center 50% empty.

STYLE: Ultra-premium, Apple keynote level, $100,000 agency production

BACKGROUND COMPOSITION:
- Base: Deep gradient from #0A0A12 (near black) to #1A1A2E (dark navy)
- Subtle concentric light rings emanating from center (very low opacity 5-10%)
- Ambient purple/blue glow spots floating in background (soft, blurred)
- Micro-texture: subtle noise grain for premium feel
- Subtle depth through layered gradients

LIGHTING:
- Soft ambient light source from top-center
- Creates gentle highlight zone where product will sit
- Volumetric light rays (barely visible, 3-5% opacity)
- Rim light effect at edges

ATMOSPHERE:
- Clean, spacious, premium
- Feels like a luxury product reveal
- Magazine-quality, not stock photo

CENTER 50% MUST BE COMPLETELY EMPTY - product composited later.

Technical: 1024x1024, photorealistic lighting, ultra-high quality render.",
    },
    PremiumBackground {
        id: "gaming_rgb",
        name: "Gaming RGB",
        color_scheme: "gaming",
        prompt: "Create an EPIC gaming-style advertisement background. NO PRODUCT - leave center empty.

STYLE: Premium gaming/eSports quality

BACKGROUND COMPOSITION:
- Base: Ultra-dark #050508 to #0A0A15 gradient
- RGB neon accents: Cyan (#00FFFF), Magenta (#FF00FF), Electric blue (#0080FF)
- Subtle hexagonal grid pattern (10% opacity) receding into depth
- Floating geometric shapes with neon edges
- Light streaks/particles suggesting motion and energy

NEON EFFECTS:
- Glowing edge lines in corners (not overwhelming)
- Soft neon ambient glow from edges
- Light bloom on bright elements

LIGHTING:
- Dramatic side lighting creating depth
- RGB color mixing where lights overlap
- Center spot slightly brighter for product placement

ATMOSPHERE:
- High-tech, futuristic, exciting
- Premium gaming, NOT cheap gamer aesthetic

CENTER 50% EMPTY for product. 1024x1024, ultra quality.",
    },
    PremiumBackground {
        id: "warm_lifestyle",
        name: "Warm Lifestyle",
        color_scheme: "dark",
        prompt: "Create a WARM, INVITING advertisement background. NO PRODUCT - leave center empty.

STYLE: Cozy lifestyle, hygge vibes, premium home aesthetic

BACKGROUND COMPOSITION:
- Base: Warm gradient from #1A1510 to #2A2018
- Soft golden/amber light spots (bokeh effect)
- Subtle wood texture grain (barely visible)
- Warm color temperature throughout

LIGHTING:
- Golden hour lighting feel
- Soft, diffused light from upper left
- Gentle shadows creating depth
- Warm spot light on center area

ATMOSPHERE:
- Cozy, welcoming, comfortable
- Premium but approachable
- Evokes feelings of comfort and quality

CENTER EMPTY for product. Lifestyle/home product focus.",
    },
    PremiumBackground {
        id: "clean_minimal",
        name: "Clean Minimal",
        color_scheme: "light",
        prompt: "Create an ULTRA-CLEAN minimalist advertisement background. NO PRODUCT - leave center empty.

STYLE: Apple-level minimal, premium white space, museum gallery feel

BACKGROUND COMPOSITION:
- Base: Clean gradient from #F8F8FA to #EAEAEF
- Subtle shadow suggesting infinite white space
- Minimal design elements - less is more
- Perfect lighting, no harsh shadows

LIGHTING:
- Soft, even studio lighting
- Gentle gradient from top (brighter) to bottom (slightly shadowed)
- Professional product photography lighting setup

SUBTLE ELEMENTS:
- Very soft drop shadow where product will sit (suggesting surface)
- Minimal vignette

This is for light-on-light compositions. Product pops against clean background.",
    },
    PremiumBackground {
        id: "gradient_mesh",
        name: "Gradient Mesh",
        color_scheme: "vibrant",
        prompt: "Create a VIBRANT gradient mesh advertisement background. NO PRODUCT - leave center empty.

STYLE: Modern 2025, attention-grabbing

BACKGROUND COMPOSITION:
- Flowing gradient mesh with 4-5 color nodes
- Colors: Deep purple (#6B21A8) to Hot pink (#EC4899) to Orange (#F97316) to Coral
- Smooth transitions, no harsh edges
- Organic, flowing shapes

LIGHTING:
- Colors create their own luminosity
- Brighter in center fading to edges

ATMOSPHERE:
- Energetic, youthful, exciting
- Social media optimized (scroll-stopping)

TEXTURE:
- Subtle grain overlay for texture
- Not flat - has depth through gradients

CENTER lighter/more neutral for product visibility.",
    },
    PremiumBackground {
        id: "nature_organic",
        name: "Nature Organic",
        color_scheme: "dark",
        prompt: "Create an ORGANIC, nature-inspired advertisement background. NO PRODUCT - leave center empty.

STYLE: Eco-premium, natural luxury, sustainable brand aesthetic

BACKGROUND COMPOSITION:
- Base: Soft sage green (#A3B18A) to deep forest (#344E41) gradient
- Subtle leaf shadows/patterns (15% opacity)
- Natural texture - paper, linen, or organic material feel

LIGHTING:
- Soft natural daylight feel
- Dappled light effect (as if through leaves)
- Golden hour tint

ATMOSPHERE:
- Fresh, clean, natural
- Premium eco - not cheap green

For natural/eco products. Center empty for product.",
    },
];

/// Look up a background by id, falling back to `dark_premium`.
pub fn premium_background(id: &str) -> &'static PremiumBackground {
    PREMIUM_BACKGROUNDS
        .iter()
        .find(|b| b.id == id)
        .unwrap_or(&PREMIUM_BACKGROUNDS[0])
}

/// Background prompt, optionally annotated with the product zone bounds.
pub fn premium_background_prompt(id: &str, product_zone: Option<Zone>) -> String {
    let mut prompt = premium_background(id).prompt.to_string();
    if let Some(pz) = product_zone {
        let pct = |v: f64| (v * 100.0).round() as i64;
        prompt.push_str(&format!(
            "\n\nPRODUCT ZONE: The area from {}% to {}% horizontally and {}% to {}% vertically \
             should have subtle highlights and be ready for product placement.",
            pct(pz.x),
            pct(pz.x + pz.width),
            pct(pz.y),
            pct(pz.y + pz.height),
        ));
    }
    prompt
}

#[derive(Debug, Default)]
pub struct BackgroundHints<'a> {
    pub industry: Option<&'a str>,
    pub tone: Option<&'a str>,
    pub gaming: bool,
    pub natural: bool,
    pub minimal: bool,
    pub vibrant: bool,
}

pub fn detect_background_style(hints: &BackgroundHints<'_>) -> &'static str {
    let industry = hints.industry.map(str::to_lowercase);
    let industry = industry.as_deref();
    let tone = hints.tone.map(str::to_lowercase);
    let tone = tone.as_deref();

    if hints.gaming || matches!(industry, Some("gaming") | Some("tech")) {
        "gaming_rgb"
    } else if hints.natural || matches!(industry, Some("organic") | Some("eco")) {
        "nature_organic"
    } else if hints.minimal || tone == Some("minimal") {
        "clean_minimal"
    } else if hints.vibrant || tone == Some("playful") {
        "gradient_mesh"
    } else {
        DEFAULT_BACKGROUND_ID
    }
}

/// Overlay scheme id that pairs with background `id`.
pub fn color_scheme_for_background(id: &str) -> &'static str {
    premium_background(id).color_scheme
}
