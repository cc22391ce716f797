use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::Value;
use utoipa::ToSchema;

use ideafii_core::blueprint::Blueprint;
use ideafii_core::entitlement::CapabilityMode;
use ideafii_core::error::ApiError;
use ideafii_core::profile::UserProfile;

use crate::error::AppError;
use crate::pipeline::{self, BlueprintRequest, SparkRequest};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/v1/generate", post(generate))
}

/// Inbound generation request. One shape serves both flows; `mode` selects
/// which one runs.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct GenerateRequest {
    /// Cache key component; required for the daily-spark flow.
    #[serde(default)]
    pub day: Option<String>,
    /// Subject of generation; required for the blueprint flow.
    #[serde(default)]
    pub idea: Option<String>,
    /// Optional free text refining the idea.
    #[serde(default)]
    pub modifier: Option<String>,
    /// "blueprint" (default) or "daily_spark".
    #[serde(default)]
    pub mode: Option<String>,
    /// Requested capability for the blueprint flow: "lite" (default) or "full".
    #[serde(default)]
    pub blueprint_mode: Option<String>,
    /// Requested capability for the spark flow: "lite" (default) or "full".
    #[serde(default)]
    pub spark_mode: Option<String>,
    /// Partial profile, merged over defaults field by field.
    #[serde(default)]
    pub user_profile: Option<Value>,
}

/// Generate a daily spark or a full blueprint
///
/// The daily-spark flow requires an authenticated caller and a `day`, and is
/// idempotent per (caller, day). The blueprint flow requires an `idea` and
/// tolerates anonymous callers, who generate at the free tier.
#[utoipa::path(
    post,
    path = "/v1/generate",
    request_body = GenerateRequest,
    responses(
        (status = 200, description = "Generated spark ({\"spark\": string}) or full blueprint", body = Blueprint),
        (status = 400, description = "Missing required field", body = ApiError),
        (status = 401, description = "Missing or invalid identity assertion (spark flow)", body = ApiError),
        (status = 500, description = "Provider failure or unusable model output", body = ApiError)
    ),
    security(("bearer_auth" = [])),
    tag = "generate"
)]
pub async fn generate(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<GenerateRequest>,
) -> Result<Response, AppError> {
    let authorization = identity_assertion(&headers);
    let profile = UserProfile::resolve(request.user_profile.as_ref());

    if is_spark_flow(request.mode.as_deref()) {
        let response = pipeline::run_spark(
            &state.identity,
            &state.store,
            &state.provider,
            authorization.as_deref(),
            SparkRequest {
                day: request.day.unwrap_or_default(),
                requested_mode: CapabilityMode::from_request(request.spark_mode.as_deref()),
                profile,
            },
        )
        .await?;
        Ok(Json(response).into_response())
    } else {
        let blueprint = pipeline::run_blueprint(
            &state.identity,
            &state.provider,
            authorization.as_deref(),
            BlueprintRequest {
                idea: request.idea.unwrap_or_default(),
                modifier: request.modifier,
                requested_mode: CapabilityMode::from_request(request.blueprint_mode.as_deref()),
                profile,
            },
        )
        .await?;
        Ok(Json(blueprint).into_response())
    }
}

fn is_spark_flow(mode: Option<&str>) -> bool {
    mode == Some("daily_spark")
}

/// The raw Authorization header, forwarded opaquely to the identity provider.
fn identity_assertion(headers: &HeaderMap) -> Option<String> {
    headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}
