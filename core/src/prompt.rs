//! Prompt compilation. Deterministic string rendering only: no I/O, no
//! clocks, no randomness. The decoding parameters live with the provider
//! client; this module decides what the model is asked for.

use crate::entitlement::CapabilityMode;
use crate::profile::UserProfile;

/// Render the single-idea ("spark") instruction. The full variant asks for a
/// rationale alongside the idea; only the `spark` key is consumed downstream.
pub fn spark_prompt(profile: &UserProfile, mode: CapabilityMode) -> String {
    match mode {
        CapabilityMode::Full => format!(
            "You are Ideafii, a startup coach. Generate one concise startup idea plus a quick rationale.\n\
             {profile}\n\
             \n\
             Return JSON only with this exact shape:\n\
             {{\n\
             \x20 \"spark\": string,\n\
             \x20 \"whyFit\": string,\n\
             \x20 \"steps\": string[],\n\
             \x20 \"tools\": string[]\n\
             }}",
            profile = profile_block(profile),
        ),
        CapabilityMode::Lite => format!(
            "You are Ideafii, a startup coach. Generate one concise startup idea.\n\
             {profile}\n\
             \n\
             Return JSON only with this exact shape:\n\
             {{\n\
             \x20 \"spark\": string\n\
             }}",
            profile = profile_block(profile),
        ),
    }
}

/// Render the full blueprint instruction: persona, optional modifier, the
/// profile block, the idea, and a literal schema description with closed
/// enumerations for `difficulty` and `cost`. The `blueprintMode` value is
/// pinned to the effective mode so the model echoes the tier-enforced level.
pub fn blueprint_prompt(
    profile: &UserProfile,
    idea: &str,
    modifier: Option<&str>,
    effective_mode: CapabilityMode,
) -> String {
    let modifier_line = modifier
        .map(str::trim)
        .filter(|modifier| !modifier.is_empty())
        .map(|modifier| format!("Modifier: {modifier}\n"))
        .unwrap_or_default();

    format!(
        "You are Ideafii, a startup coach. Generate a concise, actionable blueprint.\n\
         {modifier_line}{profile}\n\
         \n\
         Idea: {idea}\n\
         \n\
         Return JSON only, with exactly these keys and types.\n\
         If blueprintMode is \"lite\", keep non-core sections short or empty, but still include all keys.\n\
         {{\n\
         \x20 \"summary\": string,\n\
         \x20 \"whoItHelps\": string,\n\
         \x20 \"whyNow\": string,\n\
         \x20 \"startupCost\": string,\n\
         \x20 \"incomePotential\": string,\n\
         \x20 \"toolsNeeded\": string[],\n\
         \x20 \"stepByStepPlan\": string[],\n\
         \x20 \"marketingPlan\": string[],\n\
         \x20 \"nameIdeas\": string[],\n\
         \x20 \"roadmap7Days\": string[],\n\
         \x20 \"noCodeVersion\": string[],\n\
         \x20 \"risksAndFixes\": string[],\n\
         \x20 \"mvpFeatures\": string[],\n\
         \x20 \"cardTag\": string, // e.g. \"AI Tools\", \"Local\", \"Digital\", \"Low Cost\"\n\
         \x20 \"cardIcon\": string, // emoji icon that fits the idea\n\
         \x20 \"difficulty\": string, // Beginner | Intermediate | Advanced\n\
         \x20 \"cost\": string, // $ | $$ | $$$ | $$$$\n\
         \x20 \"durationWeeks\": string, // e.g. \"2-3 weeks\"\n\
         \x20 \"blueprintMode\": \"{mode}\"\n\
         }}",
        profile = profile_block(profile),
        mode = effective_mode.as_str(),
    )
}

/// The five profile attributes, listed verbatim for personalization.
fn profile_block(profile: &UserProfile) -> String {
    format!(
        "Personalize for this user:\n\
         - intent: {intent}\n\
         - skill: {skill}\n\
         - budget: {budget}\n\
         - time: {hours} hours per week\n\
         - tone: {tone}",
        intent = profile.intent,
        skill = profile.skill_level,
        budget = profile.budget,
        hours = profile.hours_per_week,
        tone = profile.tone,
    )
}
