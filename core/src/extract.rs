use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

static JSON_FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)```json(.*?)```").expect("json fence pattern is valid")
});
static ANY_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```(.*?)```").expect("fence pattern is valid"));

/// Recover the intended JSON substring from free-form model text.
/// Precedence: a fence explicitly tagged as JSON, then any fence, then the
/// trimmed text itself.
pub fn extract_json(text: &str) -> &str {
    for pattern in [&*JSON_FENCE, &*ANY_FENCE] {
        if let Some(captures) = pattern.captures(text) {
            if let Some(inner) = captures.get(1) {
                return inner.as_str().trim();
            }
        }
    }
    text.trim()
}

/// Parse the recovered substring as JSON. A parse failure is reported to the
/// caller (who attaches the raw text for diagnosis); it is never coerced
/// into an empty result.
pub fn parse_model_output(text: &str) -> Result<Value, serde_json::Error> {
    serde_json::from_str(extract_json(text))
}
