//! Creative brief assembly and copywriter prompts.
//!
//! A brief is built per request from loose marketing inputs, enriched with
//! audience pain points inferred from the industry and a recommended ad
//! style. It is never persisted.

use serde::{Deserialize, Serialize};

use crate::ad_styles::{
    build_image_prompt, get_ad_style, recommend_ad_styles, should_attempt_text_in_image, AdStyle,
    StyleQuery,
};
use crate::copy::infer_template_category;
use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

pub const DEFAULT_INDUSTRY: &str = "General";
pub const DEFAULT_USP: &str = "Premium quality";
pub const DEFAULT_AUDIENCE: &str = "Broad audience";
pub const DEFAULT_GOAL: &str = "conversion";
pub const DEFAULT_TONE: &str = "professional";
pub const DEFAULT_LANGUAGE: &str = "de";
pub const DEFAULT_PRODUCT_NAME: &str = "Product";

const PRODUCT_NAME_WORDS: usize = 5;
const PRODUCT_NAME_MAX_CHARS: usize = 50;

/// System prompt for the copywriting model. Copy is written in the
/// requested language, image prompts always in English.
pub const MASTER_SYSTEM_PROMPT: &str = r#"Du bist ein erfahrener Creative Director für Meta Ads mit tausenden geschalteten Kampagnen.

## ERFOLGSFORMEL
HOOK → PROBLEM → PROOF → BENEFIT → CTA
- Headline: eine konkrete Transformation oder ein messbares Ergebnis, unter 60 Zeichen
- Description: PAS oder AIDA, immer mit Zahlen und Social Proof
- CTA: aktives Verb + klarer Wert + niedrige Hürde
- Visual: Produkt als Hero, im Kontext oder als Transformation

## VERBOTEN
- Generische Headlines ohne konkreten Benefit
- Features statt Benefits
- CTAs wie "Mehr erfahren"
- Superlative ohne Beleg

## OUTPUT
Antworte IMMER mit validem JSON:
{
    "confidenceScore": 1-10,
    "styleUsed": "style_id",
    "headline": "...",
    "slogan": "...",
    "description": "...",
    "cta": "...",
    "imagePrompt": "...",
    "textInImage": {
        "enabled": true/false,
        "headline": "max 5 Wörter",
        "badge": "max 3 Wörter",
        "ctaText": "max 4 Wörter"
    },
    "qualityChecks": {
        "headlineScore": 1-10,
        "descriptionScore": 1-10,
        "ctaScore": 1-10,
        "imagePromptScore": 1-10,
        "overallScore": 1-10
    },
    "reasoning": "Kurze Begründung"
}

## TEXT IM BILD
Nur kurze, perfekt lesbare Texte in modernen Sans-Serif Fonts, hoher Kontrast, niemals über dem Produkt. Badge oben rechts.

## QUALITÄTSSCHWELLE
Liegt dein overallScore unter 8, überarbeite alles.

SPRACHEN:
- Copy: Deutsch (oder wie angefragt)
- Image Prompt: IMMER Englisch"#;

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// Loose marketing inputs. Every field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BriefInput {
    pub mode: Option<String>,
    pub language: Option<String>,
    pub product_name: Option<String>,
    pub product_description: Option<String>,
    pub industry: Option<String>,
    pub target_audience: Option<String>,
    pub usp: Option<String>,
    pub tone: Option<String>,
    pub goal: Option<String>,
    /// Explicit ad style id; overrides the recommendation.
    pub template: Option<String>,
    /// Free-text description used when the structured fields are missing.
    pub text: Option<String>,
    pub product_image_url: Option<String>,
    pub vision_description: Option<String>,
}

// ---------------------------------------------------------------------------
// Brief
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductInfo {
    pub name: String,
    pub description: String,
    pub industry: String,
    pub usp: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AudienceProfile {
    pub description: String,
    pub pain_points: Vec<&'static str>,
    pub desires: Vec<&'static str>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CampaignParams {
    pub goal: String,
    pub tone: String,
    pub language: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualDirection {
    pub primary_style: &'static AdStyle,
    pub alternative_styles: Vec<&'static AdStyle>,
    pub product_image_url: Option<String>,
    pub vision_description: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BriefMeta {
    pub mode: Option<String>,
    pub generated_at: Timestamp,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreativeBrief {
    pub product: ProductInfo,
    pub audience: AudienceProfile,
    pub campaign: CampaignParams,
    pub visual: VisualDirection,
    pub meta: BriefMeta,
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl CreativeBrief {
    pub fn build(input: &BriefInput, now: Timestamp) -> Self {
        let text = non_blank(&input.text);
        let description = non_blank(&input.product_description).or(text).unwrap_or_default();

        // Without an explicit industry, guess one from the free text.
        let industry = non_blank(&input.industry)
            .or_else(|| infer_template_category(description))
            .unwrap_or(DEFAULT_INDUSTRY);

        let goal = non_blank(&input.goal).unwrap_or(DEFAULT_GOAL);
        let product_name = non_blank(&input.product_name)
            .map(str::to_string)
            .unwrap_or_else(|| extract_product_name(text));

        let recommended = recommend_ad_styles(&StyleQuery {
            industry: Some(industry),
            product_type: Some(product_name.as_str()),
            goal: Some(goal),
        });
        let primary_style = match non_blank(&input.template) {
            Some(id) => get_ad_style(id),
            None => recommended[0],
        };
        let alternative_styles = recommended
            .into_iter()
            .filter(|s| s.id != primary_style.id)
            .take(2)
            .collect();

        Self {
            product: ProductInfo {
                name: product_name,
                description: description.to_string(),
                industry: industry.to_string(),
                usp: non_blank(&input.usp).unwrap_or(DEFAULT_USP).to_string(),
            },
            audience: AudienceProfile {
                description: non_blank(&input.target_audience)
                    .unwrap_or(DEFAULT_AUDIENCE)
                    .to_string(),
                pain_points: infer_pain_points(industry).to_vec(),
                desires: infer_desires(industry).to_vec(),
            },
            campaign: CampaignParams {
                goal: goal.to_string(),
                tone: non_blank(&input.tone).unwrap_or(DEFAULT_TONE).to_string(),
                language: non_blank(&input.language)
                    .unwrap_or(DEFAULT_LANGUAGE)
                    .to_string(),
            },
            visual: VisualDirection {
                primary_style,
                alternative_styles,
                product_image_url: non_blank(&input.product_image_url).map(str::to_string),
                vision_description: non_blank(&input.vision_description).map(str::to_string),
            },
            meta: BriefMeta {
                mode: input.mode.clone(),
                generated_at: now,
            },
        }
    }
}

/// First few words of free text, capped in length.
fn extract_product_name(text: Option<&str>) -> String {
    let Some(text) = text else {
        return DEFAULT_PRODUCT_NAME.to_string();
    };
    let name: String = text
        .split_whitespace()
        .take(PRODUCT_NAME_WORDS)
        .collect::<Vec<_>>()
        .join(" ")
        .chars()
        .take(PRODUCT_NAME_MAX_CHARS)
        .collect();
    if name.is_empty() {
        DEFAULT_PRODUCT_NAME.to_string()
    } else {
        name
    }
}

// ---------------------------------------------------------------------------
// Audience inference
// ---------------------------------------------------------------------------

const DEFAULT_PAIN_POINTS: [&str; 3] = ["Zeit sparen", "Geld sparen", "Stress reduzieren"];
const DEFAULT_DESIRES: [&str; 3] = ["Einfachheit", "Schnelle Ergebnisse", "Beste Qualität"];

const INDUSTRY_PAIN_POINTS: [(&str, [&str; 3]); 5] = [
    ("beauty", ["Hautprobleme", "Alterungszeichen", "Produktüberflutung"]),
    ("fitness", ["Keine Zeit", "Motivation fehlt", "Keine Ergebnisse"]),
    ("tech", ["Komplizierte Bedienung", "Veraltete Lösungen", "Hohe Kosten"]),
    ("e-commerce", ["Qualität unklar", "Lange Lieferzeit", "Hohe Versandkosten"]),
    ("food", ["Ungesunde Ernährung", "Keine Zeit zum Kochen", "Langeweile"]),
];

const INDUSTRY_DESIRES: [(&str, [&str; 3]); 5] = [
    ("beauty", ["Jugendliche Ausstrahlung", "Natürliche Schönheit", "Selbstbewusstsein"]),
    ("fitness", ["Traumkörper", "Mehr Energie", "Gesundes Leben"]),
    ("tech", ["Produktivität", "Einfachheit", "Modernität"]),
    ("e-commerce", ["Beste Deals", "Premium Qualität", "Schnelle Lieferung"]),
    ("food", ["Genuss", "Gesundheit", "Bequemlichkeit"]),
];

fn lookup_by_industry(
    table: &'static [(&'static str, [&'static str; 3])],
    industry: &str,
    default: &'static [&'static str; 3],
) -> &'static [&'static str; 3] {
    let industry = industry.to_lowercase();
    table
        .iter()
        .find(|(key, _)| industry.contains(key))
        .map_or(default, |(_, values)| values)
}

pub fn infer_pain_points(industry: &str) -> &'static [&'static str; 3] {
    lookup_by_industry(&INDUSTRY_PAIN_POINTS, industry, &DEFAULT_PAIN_POINTS)
}

pub fn infer_desires(industry: &str) -> &'static [&'static str; 3] {
    lookup_by_industry(&INDUSTRY_DESIRES, industry, &DEFAULT_DESIRES)
}

// ---------------------------------------------------------------------------
// Prompt
// ---------------------------------------------------------------------------

/// Variables for the style image prompt. The vision description, when
/// present, replaces the marketing description of the product.
pub fn image_prompt_vars(brief: &CreativeBrief) -> Vec<(&'static str, String)> {
    let product_description = brief
        .visual
        .vision_description
        .clone()
        .unwrap_or_else(|| brief.product.description.clone());

    let mut vars = vec![("product_description", product_description)];
    vars.extend(
        [
            ("target_age", "25-45"),
            ("target_gender", "diverse"),
            ("lifestyle_setting", "modern home or office"),
            ("color_1", "#ffffff"),
            ("color_2", "#f0f0f0"),
            ("background_color", "pure white"),
            ("primary_color", "vibrant brand color"),
            ("before_state", "the problem situation"),
            ("after_state", "the transformed result"),
            ("problem_context", "everyday frustration scenario"),
            ("ingredients", "natural premium ingredients"),
            ("comparison_object", "common everyday object for scale"),
            ("complementary_items", "styled accessories and lifestyle items"),
            ("surface_type", "marble or light wood"),
            ("color_palette", "harmonious brand colors"),
            ("target_demo", "happy satisfied customer"),
        ]
        .map(|(k, v)| (k, v.to_string())),
    );
    vars
}

/// Prompts for the copywriting model, derived from a brief.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BriefPrompt {
    pub system: &'static str,
    pub user: String,
    pub style_id: &'static str,
    pub image_prompt: String,
    pub attempt_text_in_image: bool,
}

impl BriefPrompt {
    pub fn from_brief(brief: &CreativeBrief) -> Self {
        let style = brief.visual.primary_style;
        let image_prompt = build_image_prompt(style, image_prompt_vars(brief));
        let attempt_text_in_image = should_attempt_text_in_image(style, Some(brief.product.name.as_str()));

        Self {
            system: MASTER_SYSTEM_PROMPT,
            user: build_user_prompt(brief, &image_prompt),
            style_id: style.id,
            image_prompt,
            attempt_text_in_image,
        }
    }
}

fn build_user_prompt(brief: &CreativeBrief, image_prompt: &str) -> String {
    let style = brief.visual.primary_style;
    let language = if brief.campaign.language == "de" {
        "Deutsch"
    } else {
        "English"
    };
    let triggers = style
        .triggers
        .iter()
        .map(|t| format!("- {t}"))
        .collect::<Vec<_>>()
        .join("\n");

    let mut prompt = format!(
        "## CREATIVE BRIEF

### Produkt
- Name: {name}
- Beschreibung: {description}
- USP: {usp}
- Branche: {industry}

### Zielgruppe
- Beschreibung: {audience}
- Pain Points: {pains}
- Wünsche: {desires}

### Kampagnenziel
- Ziel: {goal}
- Tonalität: {tone}
- Sprache: {language}

### Ad Style
- Primary Style: {style_name} ({style_name_de})
- Beschreibung: {style_description}
- Best For: {best_for}

### Copy Formula für diesen Style
- Headline: {cf_headline}
- Description: {cf_description}
- CTA: {cf_cta}

### Psychologische Trigger
{triggers}

### Visual Composition
- Product Placement: {placement}
- Background: {background}
- Lighting: {lighting}
- Negative Space: {negative_space}

### Image Prompt Template (nutze als Basis)
{image_prompt}

---

## DEINE AUFGABE

Erstelle jetzt eine 10/10 Meta Ad basierend auf diesem Brief.

1. Nutze die Copy Formula des Styles als Leitfaden
2. Wende die psychologischen Trigger an
3. Der Image Prompt MUSS das Produkt EXAKT wie beschrieben zeigen
4. Qualitätsscore muss 8+ sein
",
        name = brief.product.name,
        description = brief.product.description,
        usp = brief.product.usp,
        industry = brief.product.industry,
        audience = brief.audience.description,
        pains = brief.audience.pain_points.join(", "),
        desires = brief.audience.desires.join(", "),
        goal = brief.campaign.goal,
        tone = brief.campaign.tone,
        style_name = style.name,
        style_name_de = style.name_de,
        style_description = style.description,
        best_for = style.best_for.join(", "),
        cf_headline = style.copy_formula.headline,
        cf_description = style.copy_formula.description,
        cf_cta = style.copy_formula.cta,
        placement = style.composition.product_placement,
        background = style.composition.background_type,
        lighting = style.composition.lighting_style,
        negative_space = style.composition.negative_space,
    );

    if let Some(vision) = &brief.visual.vision_description {
        prompt.push_str(&format!(
            "
### KRITISCH: PRODUKT-INTEGRITÄT
Das Produkt wurde analysiert und sieht so aus:
{vision}

Die visuelle Erscheinung des Produkts (Form, Farben, Details) darf NICHT verändert werden!
Nur Hintergrund, Beleuchtung und Kontext dürfen angepasst werden.
"
        ));
    }

    prompt.push_str("\nAntworte NUR mit validem JSON.");
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::extract_placeholders;

    fn now() -> Timestamp {
        chrono::DateTime::from_timestamp(1_760_000_000, 0).unwrap()
    }

    // -- CreativeBrief::build --

    #[test]
    fn empty_input_uses_defaults() {
        let brief = CreativeBrief::build(&BriefInput::default(), now());
        assert_eq!(brief.product.name, DEFAULT_PRODUCT_NAME);
        assert_eq!(brief.product.industry, DEFAULT_INDUSTRY);
        assert_eq!(brief.product.usp, DEFAULT_USP);
        assert_eq!(brief.audience.description, DEFAULT_AUDIENCE);
        assert_eq!(brief.campaign.goal, "conversion");
        assert_eq!(brief.campaign.tone, "professional");
        assert_eq!(brief.campaign.language, "de");
        assert_eq!(brief.audience.pain_points, DEFAULT_PAIN_POINTS.to_vec());
        assert_eq!(brief.meta.generated_at, now());
    }

    #[test]
    fn product_name_comes_from_free_text() {
        let input = BriefInput {
            text: Some("Ergonomic standing desk with memory presets and cable tray".to_string()),
            ..Default::default()
        };
        let brief = CreativeBrief::build(&input, now());
        assert_eq!(brief.product.name, "Ergonomic standing desk with memory");
        assert_eq!(
            brief.product.description,
            "Ergonomic standing desk with memory presets and cable tray"
        );
    }

    #[test]
    fn explicit_template_overrides_recommendation() {
        let input = BriefInput {
            template: Some("flat_lay".to_string()),
            ..Default::default()
        };
        let brief = CreativeBrief::build(&input, now());
        assert_eq!(brief.visual.primary_style.id, "flat_lay");
        assert!(brief.visual.alternative_styles.iter().all(|s| s.id != "flat_lay"));
    }

    #[test]
    fn industry_drives_audience_inference() {
        let input = BriefInput {
            industry: Some("Beauty & Wellness".to_string()),
            ..Default::default()
        };
        let brief = CreativeBrief::build(&input, now());
        assert_eq!(brief.audience.pain_points[0], "Hautprobleme");
        assert_eq!(brief.audience.desires[2], "Selbstbewusstsein");
        assert_eq!(brief.visual.primary_style.id, "before_after");
    }

    #[test]
    fn industry_is_inferred_from_description() {
        let input = BriefInput {
            product_description: Some("Cold brew coffee in cans".to_string()),
            ..Default::default()
        };
        let brief = CreativeBrief::build(&input, now());
        assert_eq!(brief.product.industry, "food");
        assert_eq!(brief.audience.desires[0], "Genuss");
    }

    // -- BriefPrompt::from_brief --

    #[test]
    fn prompt_contains_brief_sections() {
        let input = BriefInput {
            product_name: Some("Aurora Lamp".to_string()),
            industry: Some("Tech".to_string()),
            ..Default::default()
        };
        let prompt = BriefPrompt::from_brief(&CreativeBrief::build(&input, now()));
        assert_eq!(prompt.system, MASTER_SYSTEM_PROMPT);
        assert!(prompt.user.contains("- Name: Aurora Lamp"));
        assert!(prompt.user.contains("- Branche: Tech"));
        assert!(prompt.user.contains("Sprache: Deutsch"));
        assert!(!prompt.user.contains("PRODUKT-INTEGRITÄT"));
        assert!(extract_placeholders(&prompt.image_prompt).is_empty());
        // Two-word name counts as a short headline.
        assert!(prompt.attempt_text_in_image);
    }

    #[test]
    fn vision_description_replaces_product_description() {
        let input = BriefInput {
            product_description: Some("Our best lamp".to_string()),
            template: Some("hero_product".to_string()),
            vision_description: Some("a brass desk lamp with a round white shade".to_string()),
            language: Some("en".to_string()),
            ..Default::default()
        };
        let prompt = BriefPrompt::from_brief(&CreativeBrief::build(&input, now()));
        assert!(prompt.image_prompt.contains("a brass desk lamp with a round white shade"));
        assert!(!prompt.image_prompt.contains("Our best lamp"));
        assert!(prompt.user.contains("PRODUKT-INTEGRITÄT"));
        assert!(prompt.user.contains("Sprache: English"));
    }
}
