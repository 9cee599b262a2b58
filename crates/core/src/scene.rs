//! Product profiles from vision analysis and the prompts for scenes that
//! integrate the product: device mockups, context scenes and full
//! image-to-image ads.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::copy::AdCopy;
use crate::geometry::Zone;

// ---------------------------------------------------------------------------
// Product profile
// ---------------------------------------------------------------------------

/// Instruction sent with the product image to a vision model.
pub const PRODUCT_ANALYSIS_PROMPT: &str = r#"Analyze this product image for ad creation. Return JSON only:
{
    "productType": "screenshot|lamp|electronics|apparel|food|beauty|toy|other",
    "description": "Brief description of what you see",
    "suggestedContext": "macbook|ipad|iphone|studio|lifestyle|christmas|glow|etc",
    "colors": ["primary color", "secondary color"],
    "mood": "premium|playful|professional|cozy|energetic",
    "suggestedEffects": ["glow", "shadow", "reflection", etc],
    "isScreenContent": true/false,
    "aspectRatio": "portrait|landscape|square"
}"#;

/// What a vision model saw in the product image.
///
/// `Default` is the generic profile used whenever analysis fails.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductProfile {
    pub product_type: String,
    pub description: String,
    pub suggested_context: String,
    pub colors: Vec<String>,
    pub mood: String,
    pub suggested_effects: Vec<String>,
    pub is_screen_content: bool,
    pub aspect_ratio: String,
}

impl Default for ProductProfile {
    fn default() -> Self {
        Self {
            product_type: "product".to_string(),
            description: "Product image".to_string(),
            suggested_context: "studio".to_string(),
            colors: vec!["#FFFFFF".to_string(), "#000000".to_string()],
            mood: "premium".to_string(),
            suggested_effects: vec!["shadow".to_string()],
            is_screen_content: false,
            aspect_ratio: "square".to_string(),
        }
    }
}

impl ProductProfile {
    /// Screenshots go into a device mockup instead of a scene.
    pub fn wants_device(&self) -> bool {
        self.is_screen_content || self.product_type == "screenshot"
    }
}

// ---------------------------------------------------------------------------
// Device frames
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceFrame {
    Macbook,
    Ipad,
    Iphone,
}

impl DeviceFrame {
    /// Where the screen sits in a generated device image that fills most of
    /// the canvas.
    pub fn screen_area(self) -> Zone {
        match self {
            Self::Macbook => Zone::new(0.05, 0.06, 0.90, 0.58),
            Self::Ipad => Zone::new(0.08, 0.08, 0.84, 0.84),
            Self::Iphone => Zone::new(0.10, 0.08, 0.80, 0.84),
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Self::Macbook => "MacBook Pro Space Black",
            Self::Ipad => "iPad Pro",
            Self::Iphone => "iPhone 15 Pro",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Macbook => "macbook",
            Self::Ipad => "ipad",
            Self::Iphone => "iphone",
        }
    }
}

// ---------------------------------------------------------------------------
// Integrated scene prompt
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextPosition {
    Top,
    #[default]
    Bottom,
}

#[derive(Debug, Clone, Serialize)]
pub struct IntegratedPrompt {
    pub prompt: String,
    pub device_frame: Option<DeviceFrame>,
    pub context_type: String,
    pub glow: bool,
    pub christmas: bool,
}

static ACCENT_COLOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)rot|red|grün|green|blau|blue|gold|pink|lila|purple|orange|gelb|yellow")
        .expect("valid regex")
});

fn mentions_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}

/// Build the scene prompt for `profile` steered by the user's free-text
/// creative direction.
pub fn build_integrated_prompt(
    profile: &ProductProfile,
    user_prompt: &str,
    headline: Option<&str>,
    text_position: TextPosition,
    canvas_size: u32,
) -> IntegratedPrompt {
    let lower = user_prompt.to_lowercase();
    let christmas = mentions_any(&lower, &["weihnacht", "christmas"]);
    let glow = mentions_any(&lower, &["glow", "leuchten", "neon"]);
    let dark = mentions_any(&lower, &["dark", "dunkel"]);

    let device_frame = profile.wants_device().then(|| {
        if mentions_any(&lower, &["macbook", "laptop"]) {
            DeviceFrame::Macbook
        } else if mentions_any(&lower, &["ipad", "tablet"]) {
            DeviceFrame::Ipad
        } else if mentions_any(&lower, &["iphone", "phone", "handy"]) {
            DeviceFrame::Iphone
        } else {
            DeviceFrame::Macbook
        }
    });
    let context_type = match device_frame {
        Some(frame) => format!("{}_scene", frame.as_str()),
        None => profile.suggested_context.clone(),
    };

    let mut style = Vec::new();
    if dark {
        style.push("dark mode aesthetic, deep blacks".to_string());
    }
    if glow {
        style.push("subtle neon glow accents".to_string());
    }
    if christmas {
        style.push("christmas atmosphere, festive lighting".to_string());
    }
    if profile.mood == "premium" {
        style.push("premium, Apple-like quality".to_string());
    }
    let accents: Vec<&str> = ACCENT_COLOR_RE
        .find_iter(user_prompt)
        .map(|m| m.as_str())
        .collect();
    if !accents.is_empty() {
        style.push(format!("accent colors: {}", accents.join(", ")));
    }
    let style = style.join(", ");

    let size = format!("{canvas_size}x{canvas_size}px");
    let prompt = match device_frame {
        Some(frame) => {
            let headline_line = headline
                .map(|h| format!("- Large bold headline text at BOTTOM of image: \"{h}\"\n"))
                .unwrap_or_default();
            let style = if style.is_empty() {
                "Premium dark aesthetic, cinematic lighting"
            } else {
                style.as_str()
            };
            format!(
                "PROFESSIONAL ADVERTISEMENT WITH DEVICE MOCKUP

Create a {size} advertisement image featuring a {device}.

DEVICE PLACEMENT:
- Position the {frame} taking up 85-90% of the image width
- Device should be angled slightly (3D perspective) for premium feel
- THE SCREEN MUST BE COMPLETELY BLACK/EMPTY - the actual content will be composited later
- Device is centered horizontally

SCENE & ATMOSPHERE:
{user_prompt}

STYLE:
{style}

TEXT IN IMAGE (CRITICAL - MUST BE RENDERED):
{headline_line}- Text should be white, bold, and highly readable
- Use clean sans-serif typography
- Add subtle shadow behind text for readability

CRITICAL:
- Device screen MUST be solid black (content added later)
- Text MUST be rendered clearly and legibly at the bottom
- Photorealistic device with designed background

OUTPUT: {size}",
                device = frame.display_name(),
                frame = frame.as_str(),
            )
        }
        None => {
            let mut extras = String::new();
            if christmas {
                extras.push_str(
                    "- Include festive Christmas elements (hat on product position, decorations)\n",
                );
            }
            if glow {
                extras.push_str("- Add glow/light effects emanating from center where product will be\n");
            }
            let style = if style.is_empty() { "Premium aesthetic" } else { style.as_str() };
            let text_zone = match text_position {
                TextPosition::Top => "Keep the TOP 15% relatively empty for headline text.",
                TextPosition::Bottom => {
                    "Keep the BOTTOM 20% relatively dark/simple for headline and CTA text."
                }
            };
            format!(
                "PROFESSIONAL ADVERTISEMENT - INTEGRATED PRODUCT SCENE

Create a {size} advertisement featuring this product context:
- Product type: {product_type}
- Product description: {description}

USER'S CREATIVE VISION:
{user_prompt}

INTEGRATION STYLE:
- Generate a scene where this type of product would naturally appear
- Leave a central area for the actual product to be composited
- Match the mood: {mood}
{extras}
SCENE STYLE:
{style}

TEXT ZONES:
{text_zone}

CRITICAL:
- Central product area should have subtle lighting/glow for integration
- NO text or typography
- Premium quality

OUTPUT: {size}",
                product_type = profile.product_type,
                description = profile.description,
                mood = profile.mood,
            )
        }
    };

    IntegratedPrompt {
        prompt,
        device_frame,
        context_type,
        glow,
        christmas,
    }
}

// ---------------------------------------------------------------------------
// Image-to-image ad prompt
// ---------------------------------------------------------------------------

/// Scene look for a full image-to-image ad.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SceneStyle {
    #[default]
    PremiumDark,
    MinimalLight,
    Vibrant,
}

impl SceneStyle {
    fn directions(self) -> [&'static str; 3] {
        match self {
            Self::PremiumDark => [
                "Eleganter schwarzer/dunkler Hintergrund mit subtilen Lichteffekten",
                "Cinematische Drei-Punkt-Beleuchtung, Hauptlicht von links",
                "Subtiler Glow, professionelle Schatten, Bokeh im Hintergrund",
            ],
            Self::MinimalLight => [
                "Sauberer weißer/heller Hintergrund mit weichen Schatten",
                "Diffuses, gleichmäßiges Licht, keine harten Schatten",
                "Minimalistisch, clean, luftig",
            ],
            Self::Vibrant => [
                "Lebhafter farbiger Hintergrund mit Gradient",
                "Dynamische Beleuchtung mit farbigen Akzenten",
                "Energetisch, modern, Gen-Z Appeal",
            ],
        }
    }
}

/// Scene style matching an overlay color scheme id.
pub fn scene_style_for_scheme(scheme_id: &str) -> SceneStyle {
    match scheme_id {
        "light" => SceneStyle::MinimalLight,
        "vibrant" | "gaming" => SceneStyle::Vibrant,
        _ => SceneStyle::PremiumDark,
    }
}

/// Prompt asking an image-to-image model to build a complete ad around the
/// supplied product photo, text included.
pub fn build_gemini_ad_prompt(
    copy: &AdCopy,
    profile: Option<&ProductProfile>,
    style: SceneStyle,
    canvas_size: u32,
) -> String {
    let [background, lighting, effects] = style.directions();
    let description = profile
        .map(|p| p.description.as_str())
        .unwrap_or("premium product");
    let mood = profile.map(|p| p.mood.as_str()).unwrap_or("premium");
    let colors = profile
        .filter(|p| !p.colors.is_empty())
        .map(|p| p.colors.join(", "))
        .unwrap_or_else(|| "elegant colors".to_string());

    let mut text_lines = String::new();
    if !copy.headline.trim().is_empty() {
        text_lines.push_str(&format!(
            "- HEADLINE: \"{}\" - Große, fette, weiße Schrift\n",
            copy.headline
        ));
    }
    if let Some(sub) = &copy.subheadline {
        text_lines.push_str(&format!("- SUBHEADLINE: \"{sub}\" - Kleinere weiße Schrift\n"));
    }
    if let Some(cta) = &copy.cta {
        text_lines.push_str(&format!("- CTA-BUTTON: Roter Pill-Button mit \"{cta}\"\n"));
    }

    format!(
        "GENERIERE EINE KOMPLETTE META-WERBEANZEIGE ({canvas_size}x{canvas_size}px):

Du siehst ein Produktbild. Erstelle eine KOMPLETT NEUE, PROFESSIONELLE Werbeanzeige.

NAHTLOSE INTEGRATION:
- Das Produkt muss NATÜRLICH in die Szene eingebettet sein
- KEINE sichtbaren Ränder oder Rechteck-Rahmen um das Produkt
- Gleiche Beleuchtung, Schatten und Perspektive wie die Umgebung
- Form, Farben und Details des Produkts bleiben unverändert

SZENE:
- {background}
- {lighting}
- {effects}
- Das Produkt ({description}) steht/liegt natürlich in der Szene
- Stimmung: {mood}
- Farbpalette: {colors}

KOMPOSITION:
- Produkt im oberen/mittleren Bereich (ca. 40-60% der Bildhöhe)
- Natürliche Schatten UNTER dem Produkt

TEXT IM BILD (unterer Bereich):
{text_lines}
QUALITÄT:
- Professionelle Meta/Instagram Ad Qualität
- Keine sichtbaren Kanten oder Compositing-Artefakte
- Das finale Bild muss aussehen wie EIN zusammenhängendes Foto"
    )
}
