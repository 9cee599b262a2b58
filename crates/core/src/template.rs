//! `{PLACEHOLDER}` interpolation for prompt templates and parsing of
//! JSON answers from chat models.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;
use serde::de::DeserializeOwned;

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Regex pattern matching `{UPPER_SNAKE}` tokens in prompt templates.
pub const PLACEHOLDER_PATTERN: &str = r"\{([A-Z_]+)\}";

static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(PLACEHOLDER_PATTERN).expect("valid regex"));

static CODE_FENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```(?:json|JSON)?").expect("valid regex"));

// ---------------------------------------------------------------------------
// Interpolation
// ---------------------------------------------------------------------------

/// Substitute `{KEY}` tokens in `template` with the matching variable.
///
/// Variable keys are upper-cased before matching, so `product_name`
/// fills `{PRODUCT_NAME}`. Tokens without a variable are removed and runs
/// of whitespace collapse to a single space. The output never contains a
/// placeholder token, so rendering it again returns it unchanged.
pub fn render_template<I, K, V>(template: &str, vars: I) -> String
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut out = template.to_string();
    for (key, value) in vars {
        let token = format!("{{{}}}", key.as_ref().to_uppercase());
        out = out.replace(&token, value.as_ref());
    }

    // Removing one token can join braces into a new one, e.g. `{{A}B}`.
    while PLACEHOLDER_RE.is_match(&out) {
        out = PLACEHOLDER_RE.replace_all(&out, "").into_owned();
    }

    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Placeholder names in `template`, sorted and de-duplicated.
pub fn extract_placeholders(template: &str) -> Vec<String> {
    PLACEHOLDER_RE
        .captures_iter(template)
        .map(|c| c[1].to_string())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

// ---------------------------------------------------------------------------
// Model output
// ---------------------------------------------------------------------------

/// Parse a JSON object out of a chat completion.
///
/// Models often wrap JSON in Markdown fences or add a sentence around it.
/// Fences are stripped first; if that still fails to parse, the slice from
/// the first `{` to the last `}` is tried.
pub fn parse_ai_json<T: DeserializeOwned>(content: &str) -> Result<T, CoreError> {
    let cleaned = CODE_FENCE_RE.replace_all(content, "");
    let cleaned = cleaned.trim();

    match serde_json::from_str(cleaned) {
        Ok(value) => Ok(value),
        Err(first) => {
            let (Some(start), Some(end)) = (cleaned.find('{'), cleaned.rfind('}')) else {
                return Err(CoreError::Validation(format!(
                    "Model response is not JSON: {first}"
                )));
            };
            if end < start {
                return Err(CoreError::Validation(format!(
                    "Model response is not JSON: {first}"
                )));
            }
            serde_json::from_str(&cleaned[start..=end]).map_err(|e| {
                CoreError::Validation(format!("Model response is not JSON: {e}"))
            })
        }
    }
}
