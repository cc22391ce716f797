use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Plan claims that grant the premium tier, matched case-insensitively.
const PREMIUM_PLANS: &[&str] = &["premium", "premium_x"];

/// Subscription tier resolved from the identity provider's plan claim.
/// Derived per request, never stored by the gateway.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlanTier {
    Free,
    Premium,
}

impl PlanTier {
    /// Premium iff the claim matches the allow-set; anything else, including
    /// a missing claim, is free.
    pub fn from_plan_claim(plan: Option<&str>) -> Self {
        match plan {
            Some(plan) if PREMIUM_PLANS.contains(&plan.trim().to_lowercase().as_str()) => {
                Self::Premium
            }
            _ => Self::Free,
        }
    }

    /// The downgrade is unconditional: free-tier callers get the baseline
    /// mode regardless of what the request payload asked for.
    pub fn effective_mode(self, requested: CapabilityMode) -> CapabilityMode {
        match self {
            Self::Premium => requested,
            Self::Free => CapabilityMode::Lite,
        }
    }
}

/// How much content the generation prompt asks the model for.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum CapabilityMode {
    #[default]
    Lite,
    Full,
}

impl CapabilityMode {
    /// Lenient request parsing: anything other than exactly "full" is lite.
    pub fn from_request(requested: Option<&str>) -> Self {
        if requested == Some("full") {
            Self::Full
        } else {
            Self::Lite
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lite => "lite",
            Self::Full => "full",
        }
    }
}
