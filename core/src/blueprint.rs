use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use utoipa::ToSchema;

use crate::entitlement::CapabilityMode;

/// Alternate key names the model sometimes uses for the spark string.
const SPARK_KEYS: &[&str] = &["spark", "oneLiner", "title"];

/// Leading bullet or numbering markers stripped during list coercion.
static LIST_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[•\-\d).]+\s*").expect("list marker pattern is valid"));

/// Canonical blueprint shape. Every field is present in every response;
/// whatever the model omitted or mangled coerces to an empty string or list.
/// `blueprintMode` is set by the gateway after normalization and never
/// trusted from model output.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Blueprint {
    pub summary: String,
    pub who_it_helps: String,
    pub why_now: String,
    pub startup_cost: String,
    pub income_potential: String,
    pub tools_needed: Vec<String>,
    pub step_by_step_plan: Vec<String>,
    pub marketing_plan: Vec<String>,
    pub name_ideas: Vec<String>,
    pub roadmap7_days: Vec<String>,
    pub no_code_version: Vec<String>,
    pub risks_and_fixes: Vec<String>,
    pub mvp_features: Vec<String>,
    pub card_tag: String,
    pub card_icon: String,
    pub difficulty: String,
    pub cost: String,
    pub duration_weeks: String,
    pub blueprint_mode: CapabilityMode,
}

/// Coerce the parsed model object into the canonical shape, tolerating
/// missing fields, scalar-vs-list mismatches, and extraneous keys. The
/// effective mode overwrites whatever the model claimed.
pub fn normalize_blueprint(raw: &Value, effective_mode: CapabilityMode) -> Blueprint {
    Blueprint {
        summary: coerce_text(raw.get("summary")),
        who_it_helps: coerce_text(raw.get("whoItHelps")),
        why_now: coerce_text(raw.get("whyNow")),
        startup_cost: coerce_text(raw.get("startupCost")),
        income_potential: coerce_text(raw.get("incomePotential")),
        tools_needed: coerce_list(raw.get("toolsNeeded")),
        step_by_step_plan: coerce_list(raw.get("stepByStepPlan")),
        marketing_plan: coerce_list(raw.get("marketingPlan")),
        name_ideas: coerce_list(raw.get("nameIdeas")),
        roadmap7_days: coerce_list(raw.get("roadmap7Days")),
        no_code_version: coerce_list(raw.get("noCodeVersion")),
        risks_and_fixes: coerce_list(raw.get("risksAndFixes")),
        mvp_features: coerce_list(raw.get("mvpFeatures")),
        card_tag: coerce_text(raw.get("cardTag")),
        card_icon: coerce_text(raw.get("cardIcon")),
        difficulty: coerce_text(raw.get("difficulty")),
        cost: coerce_text(raw.get("cost")),
        duration_weeks: coerce_text(raw.get("durationWeeks")),
        blueprint_mode: effective_mode,
    }
}

/// The spark string, read from the primary key with legacy fallbacks (first
/// non-null key wins), trimmed. Blank means the model produced nothing
/// usable; callers treat that as fatal and do not cache it.
pub fn spark_text(raw: &Value) -> String {
    let value = SPARK_KEYS
        .iter()
        .find_map(|key| raw.get(*key).filter(|value| !value.is_null()));
    coerce_text(value).trim().to_string()
}

/// Scalar coercion: absent/null → empty, strings pass through, numbers and
/// booleans stringify, anything else renders as its JSON text.
fn coerce_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text.clone(),
        Some(Value::Number(number)) => number.to_string(),
        Some(Value::Bool(flag)) => flag.to_string(),
        Some(other) => other.to_string(),
    }
}

/// List coercion: a sequence stringifies element-wise with blanks dropped; a
/// single string splits into lines with leading bullet/numbering markers
/// stripped; any other shape yields an empty list.
fn coerce_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| coerce_text(Some(item)).trim().to_string())
            .filter(|item| !item.is_empty())
            .collect(),
        Some(Value::String(text)) => text
            .lines()
            .map(|line| LIST_MARKER.replace(line, "").trim().to_string())
            .filter(|line| !line.is_empty())
            .collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::{Blueprint, coerce_list, normalize_blueprint, spark_text};
    use crate::entitlement::CapabilityMode;
    use serde_json::json;

    const ALL_KEYS: &[&str] = &[
        "summary",
        "whoItHelps",
        "whyNow",
        "startupCost",
        "incomePotential",
        "toolsNeeded",
        "stepByStepPlan",
        "marketingPlan",
        "nameIdeas",
        "roadmap7Days",
        "noCodeVersion",
        "risksAndFixes",
        "mvpFeatures",
        "cardTag",
        "cardIcon",
        "difficulty",
        "cost",
        "durationWeeks",
    ];

    fn to_object(blueprint: &Blueprint) -> serde_json::Map<String, serde_json::Value> {
        match serde_json::to_value(blueprint).expect("serializable") {
            serde_json::Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn sequences_keep_order_and_drop_blanks() {
        let coerced = coerce_list(Some(&json!(["Buy leash", "  ", "Print flyers", "Launch"])));
        assert_eq!(coerced, vec!["Buy leash", "Print flyers", "Launch"]);
    }

    #[test]
    fn bulleted_strings_split_into_clean_lines() {
        let coerced = coerce_list(Some(&json!("- A\n2) B\n• C")));
        assert_eq!(coerced, vec!["A", "B", "C"]);
    }

    #[test]
    fn numbered_dot_markers_are_stripped_too() {
        let coerced = coerce_list(Some(&json!("1. First\n\n2. Second")));
        assert_eq!(coerced, vec!["First", "Second"]);
    }

    #[test]
    fn non_list_non_string_values_become_empty_lists() {
        assert!(coerce_list(Some(&json!(42))).is_empty());
        assert!(coerce_list(Some(&json!({ "steps": [] }))).is_empty());
        assert!(coerce_list(None).is_empty());
    }

    #[test]
    fn empty_model_object_still_yields_every_key() {
        let blueprint = normalize_blueprint(&json!({}), CapabilityMode::Lite);
        let object = to_object(&blueprint);
        for key in ALL_KEYS {
            assert!(object.contains_key(*key), "missing key {key}");
        }
        assert_eq!(object["blueprintMode"], json!("lite"));
        assert_eq!(object["summary"], json!(""));
        assert_eq!(object["toolsNeeded"], json!([]));
    }

    #[test]
    fn model_claimed_mode_is_never_trusted() {
        let raw = json!({ "summary": "S", "blueprintMode": "full" });
        let blueprint = normalize_blueprint(&raw, CapabilityMode::Lite);
        assert_eq!(blueprint.blueprint_mode, CapabilityMode::Lite);
    }

    #[test]
    fn scalars_coerce_and_extraneous_keys_are_dropped() {
        let raw = json!({
            "summary": "Walk dogs",
            "durationWeeks": 3,
            "difficulty": null,
            "totallyUnknown": { "nested": true },
        });
        let blueprint = normalize_blueprint(&raw, CapabilityMode::Full);
        assert_eq!(blueprint.summary, "Walk dogs");
        assert_eq!(blueprint.duration_weeks, "3");
        assert_eq!(blueprint.difficulty, "");
        assert!(!to_object(&blueprint).contains_key("totallyUnknown"));
    }

    #[test]
    fn spark_falls_back_through_alternate_keys() {
        assert_eq!(spark_text(&json!({ "spark": " Walk dogs " })), "Walk dogs");
        assert_eq!(spark_text(&json!({ "oneLiner": "Walk dogs" })), "Walk dogs");
        assert_eq!(spark_text(&json!({ "title": "Walk dogs" })), "Walk dogs");
        assert_eq!(
            spark_text(&json!({ "spark": null, "title": "Walk dogs" })),
            "Walk dogs"
        );
    }

    #[test]
    fn blank_spark_stays_blank() {
        assert_eq!(spark_text(&json!({ "spark": "   " })), "");
        assert_eq!(spark_text(&json!({})), "");
    }
}
