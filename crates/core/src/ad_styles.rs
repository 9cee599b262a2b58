//! Ad style library.
//!
//! Twelve ad formats, each with a composition recipe, an image prompt
//! template, a copy formula and the psychological triggers it leans on.

use serde::Serialize;

use crate::template::render_template;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Composition {
    pub product_placement: &'static str,
    pub background_type: &'static str,
    pub lighting_style: &'static str,
    pub aspect_ratio: &'static str,
    pub negative_space: &'static str,
}

#[derive(Debug, Serialize)]
pub struct CopyFormula {
    pub headline: &'static str,
    pub description: &'static str,
    pub cta: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdStyle {
    pub id: &'static str,
    pub name: &'static str,
    #[serde(rename = "nameDE")]
    pub name_de: &'static str,
    pub description: &'static str,
    pub best_for: &'static [&'static str],
    pub composition: Composition,
    pub image_prompt_template: &'static str,
    pub copy_formula: CopyFormula,
    pub triggers: &'static [&'static str],
}

// ---------------------------------------------------------------------------
// Library
// ---------------------------------------------------------------------------

pub const DEFAULT_STYLE_ID: &str = "hero_product";

static HERO_PRODUCT: AdStyle = AdStyle {
    id: "hero_product",
    name: "Hero Product Shot",
    name_de: "Hero-Produktbild",
    description: "Clean, premium product photography with dramatic lighting. The product is the undisputed star.",
    best_for: &["Product launches", "Premium brands", "E-commerce", "High-ticket items"],
    composition: Composition {
        product_placement: "center-dominant",
        background_type: "gradient or solid",
        lighting_style: "three-point studio with rim light",
        aspect_ratio: "1:1 or 4:5",
        negative_space: "30-40%",
    },
    image_prompt_template: "Award-winning commercial product photography of {PRODUCT_DESCRIPTION}.
Hero shot composition with product floating center-frame as the undisputed star.
Professional three-point lighting: soft key light at 45 degrees, subtle fill, dramatic rim light for edge definition.
Clean gradient background transitioning from {COLOR_1} to {COLOR_2}.
Shallow depth of field f/1.4, perfect focus on product, subtle reflection on glossy surface below.
Shot on Hasselblad H6D-100c medium format, 4K ultra-resolution.
Premium luxury brand aesthetic, magazine-quality, scroll-stopping.
CRITICAL: Absolutely NO text, words, logos, or watermarks in the image.",
    copy_formula: CopyFormula {
        headline: "Benefit + Specificity (e.g., \"43% mehr [Ergebnis] in [Zeitraum]\")",
        description: "Feature-Benefit Bridge + Social Proof + Urgency",
        cta: "Action + Value (e.g., \"Jetzt 30% sichern\")",
    },
    triggers: &["Premium perception", "Desire", "Quality signals"],
};

static LIFESTYLE_CONTEXT: AdStyle = AdStyle {
    id: "lifestyle_context",
    name: "Lifestyle in Context",
    name_de: "Lifestyle im Kontext",
    description: "Product shown in real-life use. Aspirational but relatable.",
    best_for: &["Fashion", "Fitness", "Home decor", "Food & beverage"],
    composition: Composition {
        product_placement: "natural integration, rule of thirds",
        background_type: "lifestyle environment",
        lighting_style: "golden hour natural light",
        aspect_ratio: "4:5 or 9:16",
        negative_space: "20-30%",
    },
    image_prompt_template: "Authentic lifestyle photography showing {PRODUCT_DESCRIPTION} in natural use.
Real person (age {TARGET_AGE}, {TARGET_GENDER}) using the product in {LIFESTYLE_SETTING}.
Golden hour natural lighting streaming through windows, warm and inviting atmosphere.
Documentary authenticity with commercial production value.
The product is clearly visible but feels naturally integrated, not staged.
Aspirational yet relatable - the viewer thinks \"that could be me\".
Shot on Sony A7IV, 35mm lens, f/2.8, shallow depth of field.
Magazine editorial quality, Instagram-worthy composition.
NO text, logos, or watermarks.",
    copy_formula: CopyFormula {
        headline: "Transformation Promise (e.g., \"Endlich [Wunsch] ohne [Hindernis]\")",
        description: "Story arc: Before pain → Product solution → After joy",
        cta: "Experience-focused (e.g., \"Selbst erleben\")",
    },
    triggers: &["Aspiration", "Social belonging", "FOMO"],
};

static BEFORE_AFTER: AdStyle = AdStyle {
    id: "before_after",
    name: "Before/After Transformation",
    name_de: "Vorher/Nachher",
    description: "Split composition showing dramatic transformation.",
    best_for: &["Beauty", "Fitness", "Cleaning products", "Home improvement"],
    composition: Composition {
        product_placement: "center or between panels",
        background_type: "split/comparison layout",
        lighting_style: "consistent across both sides",
        aspect_ratio: "1:1 or 4:5",
        negative_space: "minimal",
    },
    image_prompt_template: "Dramatic before/after transformation photography.
LEFT SIDE (Before): {BEFORE_STATE} - dull lighting, muted colors, problem clearly visible.
RIGHT SIDE (After): {AFTER_STATE} - bright lighting, vibrant colors, transformation complete.
Clean diagonal or vertical split composition.
{PRODUCT_DESCRIPTION} visible as the catalyst of change.
Consistent camera angle and framing across both sides.
The contrast is DRAMATIC and instantly readable.
Professional advertising quality, high contrast, impactful.
NO text or labels - the visual tells the story.",
    copy_formula: CopyFormula {
        headline: "Contrast Statement (e.g., \"Von [Problem] zu [Lösung] in [Zeit]\")",
        description: "Problem agitation + Transformation proof + Easy next step",
        cta: "Result-focused (e.g., \"Transformation starten\")",
    },
    triggers: &["Transformation desire", "Proof", "Hope"],
};

static SOCIAL_PROOF: AdStyle = AdStyle {
    id: "social_proof",
    name: "Social Proof Showcase",
    name_de: "Social Proof",
    description: "Testimonial or UGC style that builds trust through others.",
    best_for: &["Services", "SaaS", "High-consideration purchases", "B2B"],
    composition: Composition {
        product_placement: "secondary to person",
        background_type: "authentic environment",
        lighting_style: "natural, unpolished feel",
        aspect_ratio: "1:1 or 4:5",
        negative_space: "25-35%",
    },
    image_prompt_template: "Authentic testimonial-style photography.
Real person ({TARGET_DEMO}) showing genuine satisfaction or joy with {PRODUCT_DESCRIPTION}.
Natural home or office environment, soft ambient lighting.
The expression is authentic - a real smile, not posed.
Product visible but secondary to the human connection.
UGC aesthetic: feels like a real customer photo, not an ad.
Warm color grading, slightly casual composition.
Trust-building authenticity is the priority.
NO text overlays, logos, or watermarks.",
    copy_formula: CopyFormula {
        headline: "Testimonial Hook (e.g., \"Warum 12.000+ Kunden...\")",
        description: "Star rating + Quote snippet + Specific result",
        cta: "Community-focused (e.g., \"Auch überzeugen lassen\")",
    },
    triggers: &["Social validation", "Trust", "Bandwagon effect"],
};

static FEATURE_CALLOUT: AdStyle = AdStyle {
    id: "feature_callout",
    name: "Feature Callout Diagram",
    name_de: "Feature-Übersicht",
    description: "Product with visual callouts highlighting key features.",
    best_for: &["Tech products", "Complex products", "Multi-feature items"],
    composition: Composition {
        product_placement: "center with space for callouts",
        background_type: "clean solid or subtle gradient",
        lighting_style: "even studio lighting",
        aspect_ratio: "1:1",
        negative_space: "40-50% for callout space",
    },
    image_prompt_template: "Technical product showcase photography of {PRODUCT_DESCRIPTION}.
Product centered with generous space around it for potential annotations.
Clean, professional studio lighting - even illumination showing all details.
Solid {BACKGROUND_COLOR} background for maximum product clarity.
The product is shot at a slight angle to show multiple faces/features.
Sharp focus throughout, deep depth of field f/8.
Technical precision aesthetic - Apple-style product photography.
Ultra-clean, minimal, premium tech brand feel.
NO text, annotations, lines, or watermarks - these will be added in post.",
    copy_formula: CopyFormula {
        headline: "Feature Stack (e.g., \"3 Features, die alles ändern\")",
        description: "Feature → Benefit translations with specifics",
        cta: "Discovery-focused (e.g., \"Alle Features entdecken\")",
    },
    triggers: &["Logic", "Comparison", "Value stacking"],
};

static URGENCY_SALE: AdStyle = AdStyle {
    id: "urgency_sale",
    name: "Urgency/Sale Announcement",
    name_de: "Dringlichkeits-Sale",
    description: "Bold, attention-grabbing promotion creative.",
    best_for: &["Flash sales", "Limited offers", "Seasonal promotions"],
    composition: Composition {
        product_placement: "dynamic angle, action-oriented",
        background_type: "bold colors, high contrast",
        lighting_style: "dramatic with strong shadows",
        aspect_ratio: "1:1 or 4:5",
        negative_space: "minimal, high density",
    },
    image_prompt_template: "High-impact promotional photography of {PRODUCT_DESCRIPTION}.
Dynamic diagonal composition creating energy and urgency.
Bold, saturated colors - {PRIMARY_COLOR} dominant.
Dramatic lighting with strong contrasts and deep shadows.
The product appears to be in motion or bursting from the frame.
Premium sale aesthetic - exciting but not cheap or discount-bin.
Subtle starburst or light flare elements suggesting excitement.
Eye-catching, scroll-stopping, demands attention.
NO text, discount numbers, or promotional elements - added in post.",
    copy_formula: CopyFormula {
        headline: "Urgency + Value (e.g., \"Nur heute: 50% auf alles\")",
        description: "Scarcity + Original price contrast + Deadline",
        cta: "Urgent action (e.g., \"Jetzt sichern - endet Mitternacht\")",
    },
    triggers: &["FOMO", "Scarcity", "Loss aversion"],
};

static MINIMALIST_ELEGANT: AdStyle = AdStyle {
    id: "minimalist_elegant",
    name: "Minimalist Elegant",
    name_de: "Minimalistisch Elegant",
    description: "Ultra-clean, luxury brand aesthetic with maximum negative space.",
    best_for: &["Luxury goods", "Premium services", "Design-focused brands"],
    composition: Composition {
        product_placement: "asymmetric, lots of breathing room",
        background_type: "solid white, cream, or black",
        lighting_style: "soft, diffused, shadowless",
        aspect_ratio: "1:1",
        negative_space: "60-70%",
    },
    image_prompt_template: "Ultra-minimalist luxury product photography of {PRODUCT_DESCRIPTION}.
Asymmetric placement with dramatic negative space - at least 60% empty.
Pure {BACKGROUND_COLOR} background, perfectly clean and seamless.
Soft, diffused lighting creating gentle shadows and depth.
The product floats in space, exuding quiet confidence.
Luxury fashion brand aesthetic - think Hermès, Apple, Aesop.
Obsessive attention to detail, no distractions.
The restraint IS the statement.
Shot on medium format, color-accurate, museum-quality.
Absolutely NO text, logos, or any elements except the product.",
    copy_formula: CopyFormula {
        headline: "Understated Power (e.g., \"Weniger. Aber besser.\")",
        description: "Single powerful statement + Craftsmanship detail",
        cta: "Exclusive action (e.g., \"Exklusiv entdecken\")",
    },
    triggers: &["Status", "Exclusivity", "Sophistication"],
};

static PROBLEM_SOLUTION: AdStyle = AdStyle {
    id: "problem_solution",
    name: "Problem/Solution Visual",
    name_de: "Problem/Lösung",
    description: "Shows the problem being solved in action.",
    best_for: &["Problem-solving products", "Innovations", "Pain point solutions"],
    composition: Composition {
        product_placement: "as the hero solving the problem",
        background_type: "contextual to the problem",
        lighting_style: "editorial, story-driven",
        aspect_ratio: "4:5",
        negative_space: "20-30%",
    },
    image_prompt_template: "Editorial problem-solution photography.
Scene: {PROBLEM_CONTEXT} - a relatable pain point situation.
{PRODUCT_DESCRIPTION} is THE solution, prominently placed as the hero.
Visual narrative: the problem is being actively solved.
Natural lighting appropriate to the context.
The viewer instantly understands: THIS product fixes THIS problem.
Emotionally resonant - the relief is palpable.
Documentary style with commercial polish.
NO text overlays or annotations.",
    copy_formula: CopyFormula {
        headline: "Problem Question (e.g., \"Kennen Sie das?\" or \"Nie wieder [Problem]\")",
        description: "PAS Framework: Problem → Agitate → Solution",
        cta: "Solution-focused (e.g., \"Problem lösen\")",
    },
    triggers: &["Pain relief", "Empathy", "Solution seeking"],
};

static INGREDIENT_SPOTLIGHT: AdStyle = AdStyle {
    id: "ingredient_spotlight",
    name: "Ingredient/Material Spotlight",
    name_de: "Inhaltsstoffe im Fokus",
    description: "Highlights what the product is made of.",
    best_for: &["Beauty/Skincare", "Food", "Natural products", "Supplements"],
    composition: Composition {
        product_placement: "surrounded by ingredients",
        background_type: "natural, organic textures",
        lighting_style: "bright, fresh, natural",
        aspect_ratio: "1:1",
        negative_space: "25-35%",
    },
    image_prompt_template: "Fresh ingredient-focused product photography.
{PRODUCT_DESCRIPTION} surrounded by its key ingredients: {INGREDIENTS}.
Natural raw ingredients arranged artistically around the product.
Fresh, vibrant, alive - water droplets, fresh cuts, natural textures.
Bright, diffused natural lighting - morning freshness feel.
Organic wood, marble, or stone surface.
The ingredients EXPLAIN the product's power.
Clean beauty or natural product aesthetic.
Fresh, healthy, pure, premium quality signals.
NO text, labels, or graphics.",
    copy_formula: CopyFormula {
        headline: "Ingredient Power (e.g., \"Die Kraft von [Inhaltsstoff]\")",
        description: "Ingredient benefit + Science/tradition backing + Purity promise",
        cta: "Discovery (e.g., \"Natürliche Wirkung entdecken\")",
    },
    triggers: &["Natural appeal", "Health consciousness", "Transparency"],
};

static SCALE_COMPARISON: AdStyle = AdStyle {
    id: "scale_comparison",
    name: "Scale/Size Comparison",
    name_de: "Größenvergleich",
    description: "Shows product size relative to everyday objects.",
    best_for: &["Compact products", "Large products", "Size-matters categories"],
    composition: Composition {
        product_placement: "next to comparison object",
        background_type: "neutral, non-distracting",
        lighting_style: "even, clear",
        aspect_ratio: "1:1 or 4:5",
        negative_space: "35-45%",
    },
    image_prompt_template: "Scale comparison product photography.
{PRODUCT_DESCRIPTION} placed next to {COMPARISON_OBJECT} for size reference.
Clean neutral background - white, light gray, or wood surface.
Both objects clearly visible with accurate proportions.
The size relationship is INSTANTLY clear.
Even lighting, no distracting shadows.
Simple, informative, trustworthy aesthetic.
E-commerce clarity meets advertising quality.
NO text, measurements, or annotations.",
    copy_formula: CopyFormula {
        headline: "Size Surprise (e.g., \"So kompakt. So mächtig.\")",
        description: "Size benefit + Portability/capacity advantage",
        cta: "Practical (e.g., \"Perfekte Größe sichern\")",
    },
    triggers: &["Practical logic", "Space efficiency", "Convenience"],
};

static UNBOXING_MOMENT: AdStyle = AdStyle {
    id: "unboxing_moment",
    name: "Unboxing/First Reveal",
    name_de: "Unboxing-Moment",
    description: "The exciting moment of opening and discovering.",
    best_for: &["Subscription boxes", "Gift items", "Premium packaging"],
    composition: Composition {
        product_placement: "emerging from packaging",
        background_type: "lifestyle surface",
        lighting_style: "warm, anticipatory",
        aspect_ratio: "1:1 or 4:5",
        negative_space: "20-30%",
    },
    image_prompt_template: "Exciting unboxing moment photography.
{PRODUCT_DESCRIPTION} being revealed from premium packaging.
Hands gently opening a beautiful box, the product emerging.
Anticipation and excitement captured in the moment.
Warm, inviting lighting - golden hour feel.
Premium packaging details visible - tissue paper, ribbons, quality materials.
The experience of receiving something special.
Lifestyle surface - marble, wood, cozy textile.
Authentic joy, not staged - real human connection.
NO faces fully visible, focus on hands and product.",
    copy_formula: CopyFormula {
        headline: "Experience Hook (e.g., \"Das Gefühl, wenn...\")",
        description: "Sensory description + Anticipation building + Gift potential",
        cta: "Experience (e.g., \"Dieses Gefühl erleben\")",
    },
    triggers: &["Anticipation", "Novelty", "Gifting psychology"],
};

static FLAT_LAY: AdStyle = AdStyle {
    id: "flat_lay",
    name: "Curated Flat Lay",
    name_de: "Kuratierte Flatlays",
    description: "Bird's eye view of product with complementary items.",
    best_for: &["Fashion accessories", "Beauty products", "Stationery", "Food"],
    composition: Composition {
        product_placement: "center of curated arrangement",
        background_type: "textured surface (marble, wood, fabric)",
        lighting_style: "overhead soft light",
        aspect_ratio: "1:1",
        negative_space: "15-25%",
    },
    image_prompt_template: "Curated flat lay photography from directly above.
{PRODUCT_DESCRIPTION} as the hero center piece.
Artistically arranged complementary items: {COMPLEMENTARY_ITEMS}.
Beautiful textured surface - {SURFACE_TYPE}.
Soft overhead lighting with minimal shadows.
Instagram-worthy, highly shareable aesthetic.
Color palette: {COLOR_PALETTE} - harmonious and intentional.
Every item placed with purpose, nothing random.
Lifestyle editorial quality, influencer-ready.
NO text, logos, or watermarks.",
    copy_formula: CopyFormula {
        headline: "Lifestyle Identity (e.g., \"Für alle, die [Identity]\")",
        description: "Curation story + Lifestyle aspiration + Collection potential",
        cta: "Collection (e.g., \"Deinen Style finden\")",
    },
    triggers: &["Aesthetic pleasure", "Curation desire", "Identity expression"],
};

pub static AD_STYLES: [&AdStyle; 12] = [
    &HERO_PRODUCT,
    &LIFESTYLE_CONTEXT,
    &BEFORE_AFTER,
    &SOCIAL_PROOF,
    &FEATURE_CALLOUT,
    &URGENCY_SALE,
    &MINIMALIST_ELEGANT,
    &PROBLEM_SOLUTION,
    &INGREDIENT_SPOTLIGHT,
    &SCALE_COMPARISON,
    &UNBOXING_MOMENT,
    &FLAT_LAY
];

/// Look up a style by id, falling back to `hero_product`.
pub fn get_ad_style(id: &str) -> &'static AdStyle {
    AD_STYLES
        .iter()
        .copied()
        .find(|s| s.id == id)
        .unwrap_or(&HERO_PRODUCT)
}

// ---------------------------------------------------------------------------
// Recommendation
// ---------------------------------------------------------------------------

const BEST_FOR_SCORE: u32 = 30;
const GOAL_SCORE: u32 = 20;

const CONVERSION_STYLES: [&str; 3] = ["urgency_sale", "before_after", "problem_solution"];
const AWARENESS_STYLES: [&str; 3] = ["hero_product", "lifestyle_context", "minimalist_elegant"];

/// Inputs for [`recommend_ad_styles`].
#[derive(Debug, Default)]
pub struct StyleQuery<'a> {
    pub industry: Option<&'a str>,
    pub product_type: Option<&'a str>,
    pub goal: Option<&'a str>,
}

fn style_score(style: &AdStyle, query: &StyleQuery<'_>) -> u32 {
    let industry = query.industry.map(str::to_lowercase);
    let product_type = query.product_type.map(str::to_lowercase);

    let mut score = 0;
    for use_case in style.best_for {
        let use_case = use_case.to_lowercase();
        let hit = |field: &Option<String>| field.as_deref().is_some_and(|f| f.contains(&use_case));
        if hit(&industry) || hit(&product_type) {
            score += BEST_FOR_SCORE;
        }
    }

    let bonus = match query.goal {
        Some("conversion") => CONVERSION_STYLES.contains(&style.id),
        Some("awareness") => AWARENESS_STYLES.contains(&style.id),
        _ => false,
    };
    if bonus {
        score += GOAL_SCORE;
    }
    score
}

/// The three best-scoring styles for `query`. Ties keep library order.
pub fn recommend_ad_styles(query: &StyleQuery<'_>) -> Vec<&'static AdStyle> {
    let mut scored: Vec<_> = AD_STYLES.iter().map(|s| (*s, style_score(s, query))).collect();
    // `sort_by` is stable.
    scored.sort_by(|a, b| b.1.cmp(&a.1));
    scored.into_iter().take(3).map(|(s, _)| s).collect()
}

// ---------------------------------------------------------------------------
// Prompts
// ---------------------------------------------------------------------------

/// Fill the style's image prompt template. Unknown placeholders are dropped.
pub fn build_image_prompt<I, K, V>(style: &AdStyle, vars: I) -> String
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    render_template(style.image_prompt_template, vars)
}

const NO_TEXT_STYLES: [&str; 2] = ["minimalist_elegant", "ingredient_spotlight"];
const TEXT_HEAVY_STYLES: [&str; 3] = ["urgency_sale", "before_after", "social_proof"];

/// Whether the image model should be asked to render the headline itself.
pub fn should_attempt_text_in_image(style: &AdStyle, headline: Option<&str>) -> bool {
    if NO_TEXT_STYLES.contains(&style.id) {
        return false;
    }
    let words = headline.map_or(0, |h| h.split_whitespace().count());
    if words > 0 && words <= 5 {
        return true;
    }
    TEXT_HEAVY_STYLES.contains(&style.id)
}
