//! Ad copy types, the copy quality gate and industry inference from free
//! text.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Text rendered onto a composed ad.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdCopy {
    pub headline: String,
    #[serde(default)]
    pub subheadline: Option<String>,
    #[serde(default)]
    pub cta: Option<String>,
    #[serde(default)]
    pub badge: Option<String>,
    #[serde(default)]
    pub features: Vec<String>,
}

// ---------------------------------------------------------------------------
// Copywriter output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QualityChecks {
    pub headline_score: f64,
    pub description_score: f64,
    pub cta_score: f64,
    pub image_prompt_score: f64,
    pub overall_score: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TextInImage {
    pub enabled: bool,
    pub headline: Option<String>,
    pub badge: Option<String>,
    pub cta_text: Option<String>,
}

/// The JSON object the copywriting model is asked to return.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GeneratedAd {
    pub confidence_score: Option<f64>,
    pub style_used: Option<String>,
    pub headline: String,
    pub slogan: Option<String>,
    pub description: String,
    pub cta: String,
    pub image_prompt: String,
    pub text_in_image: Option<TextInImage>,
    pub quality_checks: Option<QualityChecks>,
    pub reasoning: Option<String>,
}

impl GeneratedAd {
    /// Overlay copy for compositing. The slogan doubles as subheadline.
    pub fn to_ad_copy(&self, features: Vec<String>) -> AdCopy {
        let non_empty = |s: &str| (!s.trim().is_empty()).then(|| s.to_string());
        AdCopy {
            headline: self.headline.clone(),
            subheadline: self.slogan.as_deref().and_then(non_empty),
            cta: non_empty(&self.cta),
            badge: self
                .text_in_image
                .as_ref()
                .and_then(|t| t.badge.as_deref())
                .and_then(non_empty),
            features,
        }
    }
}

// ---------------------------------------------------------------------------
// Quality gate
// ---------------------------------------------------------------------------

pub const MIN_OVERALL_SCORE: f64 = 8.0;
pub const MIN_HEADLINE_CHARS: usize = 10;
pub const MIN_DESCRIPTION_CHARS: usize = 50;
pub const MIN_IMAGE_PROMPT_CHARS: usize = 100;

/// Words that mark a headline as generic.
pub const GENERIC_HEADLINE_WORDS: [&str; 4] = ["beste", "einzigartig", "revolutionär", "unglaublich"];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QualityReport {
    pub passed: bool,
    pub issues: Vec<String>,
    pub score: f64,
}

pub fn quality_gate(ad: &GeneratedAd) -> QualityReport {
    let score = ad
        .quality_checks
        .as_ref()
        .map_or(0.0, |q| q.overall_score);
    let mut issues = Vec::new();

    if score < MIN_OVERALL_SCORE {
        issues.push(format!("Overall score {score}/10 is below threshold (8+)"));
    }
    if ad.headline.chars().count() < MIN_HEADLINE_CHARS {
        issues.push("Headline too short or missing".to_string());
    }
    if ad.description.chars().count() < MIN_DESCRIPTION_CHARS {
        issues.push("Description too short or missing".to_string());
    }
    if ad.image_prompt.chars().count() < MIN_IMAGE_PROMPT_CHARS {
        issues.push("Image prompt not detailed enough (need 100+ chars)".to_string());
    }

    let headline = ad.headline.to_lowercase();
    for word in GENERIC_HEADLINE_WORDS {
        if headline.contains(word) {
            issues.push(format!("Headline contains generic word: \"{word}\""));
        }
    }

    QualityReport {
        passed: issues.is_empty(),
        issues,
        score,
    }
}

// ---------------------------------------------------------------------------
// Industry inference
// ---------------------------------------------------------------------------

static CATEGORY_RULES: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    [
        (r"dropship|drop ship", "dropshipping"),
        (r"e-?commerce|shop|store|marketplace", "ecommerce"),
        (r"saas|software|app|tech|digital|\bai\b", "tech"),
        (r"marketing|sales|lead|conversion|agency", "marketing"),
        (r"fashion|apparel|streetwear", "fashion"),
        (r"beauty|skincare|makeup", "beauty"),
        (r"food|restaurant|coffee|drink", "food"),
        (r"fitness|gym|sport", "fitness"),
        (r"home|furniture|decor", "interior-design"),
    ]
    .into_iter()
    .map(|(pattern, category)| (Regex::new(pattern).expect("valid regex"), category))
    .collect()
});

/// Guess a category from free text. First matching rule wins.
pub fn infer_template_category(text: &str) -> Option<&'static str> {
    let text = text.to_lowercase();
    CATEGORY_RULES
        .iter()
        .find(|(re, _)| re.is_match(&text))
        .map(|(_, category)| *category)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn good_ad() -> GeneratedAd {
        GeneratedAd {
            headline: "43% mehr Fokus in 7 Tagen".to_string(),
            description: "Über 12.000 Kunden arbeiten konzentrierter. Testen Sie 30 Tage ohne Risiko."
                .to_string(),
            cta: "Jetzt 30% sichern".to_string(),
            image_prompt: "x".repeat(MIN_IMAGE_PROMPT_CHARS),
            quality_checks: Some(QualityChecks {
                overall_score: 9.0,
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    // -- quality_gate --

    #[test]
    fn complete_ad_passes() {
        let report = quality_gate(&good_ad());
        assert!(report.passed, "{:?}", report.issues);
        assert_eq!(report.score, 9.0);
    }

    #[test]
    fn missing_scores_count_as_zero() {
        let ad = GeneratedAd {
            quality_checks: None,
            ..good_ad()
        };
        let report = quality_gate(&ad);
        assert!(!report.passed);
        assert_eq!(report.score, 0.0);
        assert!(report.issues[0].contains("below threshold"));
    }

    #[test]
    fn short_fields_are_flagged() {
        let ad = GeneratedAd {
            headline: "Kurz".to_string(),
            description: "Zu kurz".to_string(),
            image_prompt: "product".to_string(),
            ..good_ad()
        };
        let report = quality_gate(&ad);
        assert_eq!(report.issues.len(), 3);
    }

    #[test]
    fn generic_words_are_flagged_case_insensitively() {
        let ad = GeneratedAd {
            headline: "Die BESTE Lampe der Welt".to_string(),
            ..good_ad()
        };
        let report = quality_gate(&ad);
        assert!(!report.passed);
        assert!(report.issues.iter().any(|i| i.contains("\"beste\"")));
    }

    #[test]
    fn lengths_count_characters_not_bytes() {
        // 9 characters, 18 bytes.
        let ad = GeneratedAd {
            headline: "äöüäöüäöü".to_string(),
            ..good_ad()
        };
        assert!(!quality_gate(&ad).passed);
    }

    // -- GeneratedAd --

    #[test]
    fn parses_model_json_with_missing_fields() {
        let ad: GeneratedAd = serde_json::from_str(
            r#"{"headline":"Hi","cta":"Go","textInImage":{"enabled":true,"badge":"NEU"}}"#,
        )
        .unwrap();
        assert_eq!(ad.headline, "Hi");
        assert!(ad.description.is_empty());

        let copy = ad.to_ad_copy(vec!["Fast".to_string()]);
        assert_eq!(copy.badge.as_deref(), Some("NEU"));
        assert_eq!(copy.cta.as_deref(), Some("Go"));
        assert_eq!(copy.subheadline, None);
    }

    // -- infer_template_category --

    #[test]
    fn first_matching_rule_wins() {
        assert_eq!(infer_template_category("Dropship store for gadgets"), Some("dropshipping"));
        assert_eq!(infer_template_category("Online Shop for coffee"), Some("ecommerce"));
        assert_eq!(infer_template_category("B2B SaaS"), Some("tech"));
        assert_eq!(infer_template_category("Organic skincare"), Some("beauty"));
        assert_eq!(infer_template_category("Furniture outlet"), Some("interior-design"));
    }

    #[test]
    fn ai_only_matches_as_a_word() {
        assert_eq!(infer_template_category("AI writing assistant"), Some("tech"));
        assert_eq!(infer_template_category("hair care"), None);
    }
}
