use serde::Serialize;
use serde_json::Value;
use utoipa::ToSchema;

/// Personalization attributes embedded verbatim into generation prompts.
/// After `resolve`, every field is present; missing or wrong-typed inputs
/// fall back to the documented default. Values are never validated beyond
/// type coercion; unknown strings pass through to the prompt untouched.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// What the user wants out of the idea (e.g. "explore", "side_income")
    pub intent: String,
    /// Technical comfort level (e.g. "no_code", "dev")
    pub skill_level: String,
    /// Weekly time budget, always positive
    pub hours_per_week: f64,
    /// Bucketed spending range (e.g. "0_100")
    pub budget: String,
    /// Voice the generated content should take
    pub tone: String,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            intent: "explore".to_string(),
            skill_level: "no_code".to_string(),
            hours_per_week: 5.0,
            budget: "0_100".to_string(),
            tone: "coach".to_string(),
        }
    }
}

impl UserProfile {
    /// Merge a partial profile over the defaults, field by field. A field of
    /// the wrong JSON type counts as missing; extra keys are ignored. Total,
    /// there is no failure path.
    pub fn resolve(raw: Option<&Value>) -> Self {
        let defaults = Self::default();
        let Some(raw) = raw else { return defaults };
        Self {
            intent: string_field(raw, "intent").unwrap_or(defaults.intent),
            skill_level: string_field(raw, "skillLevel").unwrap_or(defaults.skill_level),
            hours_per_week: raw
                .get("hoursPerWeek")
                .and_then(Value::as_f64)
                .filter(|hours| *hours > 0.0)
                .unwrap_or(defaults.hours_per_week),
            budget: string_field(raw, "budget").unwrap_or(defaults.budget),
            tone: string_field(raw, "tone").unwrap_or(defaults.tone),
        }
    }
}

fn string_field(raw: &Value, key: &str) -> Option<String> {
    raw.get(key).and_then(Value::as_str).map(str::to_string)
}
