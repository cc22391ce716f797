//! Request orchestration for the two generation flows. The external
//! collaborators (identity provider, spark store, generation provider) are
//! injected as capability traits so the flow logic runs in tests without any
//! network. Each request is strictly sequential: identity exchange, cache
//! read, model call, cache write. Nothing overlaps within one request.

use async_trait::async_trait;
use serde::Serialize;
use utoipa::ToSchema;

use ideafii_core::blueprint::{self, Blueprint};
use ideafii_core::entitlement::{CapabilityMode, PlanTier};
use ideafii_core::extract;
use ideafii_core::profile::UserProfile;
use ideafii_core::prompt;

use crate::error::AppError;
use crate::identity::{Identity, IdentityError};
use crate::provider::{BLUEPRINT_DECODING, DecodingParams, ProviderError, SPARK_DECODING};
use crate::store::StoreError;

/// Exchanges an opaque bearer assertion for the caller's identity.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn resolve_identity(&self, authorization: &str) -> Result<Identity, IdentityError>;
}

/// Day-scoped cache of generated sparks, keyed by (subject, day).
#[async_trait]
pub trait SparkStore: Send + Sync {
    async fn fetch_spark(&self, user_id: &str, day: &str) -> Result<Option<String>, StoreError>;
    async fn upsert_spark(&self, user_id: &str, day: &str, spark: &str) -> Result<(), StoreError>;
}

/// External generative-text provider.
#[async_trait]
pub trait GenerationProvider: Send + Sync {
    async fn generate(&self, prompt: &str, params: DecodingParams) -> Result<String, ProviderError>;
}

#[derive(Debug)]
pub struct SparkRequest {
    pub day: String,
    pub requested_mode: CapabilityMode,
    pub profile: UserProfile,
}

#[derive(Debug)]
pub struct BlueprintRequest {
    pub idea: String,
    pub modifier: Option<String>,
    pub requested_mode: CapabilityMode,
    pub profile: UserProfile,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SparkResponse {
    pub spark: String,
}

/// The daily-spark flow. Requires a non-empty day and an authenticated
/// subject; the result is cached per (subject, day) so repeat calls return
/// the stored spark without another model invocation.
pub async fn run_spark<I, S, G>(
    identity: &I,
    store: &S,
    provider: &G,
    authorization: Option<&str>,
    request: SparkRequest,
) -> Result<SparkResponse, AppError>
where
    I: IdentityProvider,
    S: SparkStore,
    G: GenerationProvider,
{
    let day = request.day.trim();
    if day.is_empty() {
        return Err(AppError::Validation {
            message: "Missing day".to_string(),
        });
    }

    let authorization = authorization.ok_or_else(|| AppError::Unauthorized {
        message: "Missing Authorization".to_string(),
    })?;
    let caller = identity
        .resolve_identity(authorization)
        .await
        .map_err(|err| {
            tracing::warn!(error = %err, "identity resolution failed");
            AppError::Unauthorized {
                message: "Unauthorized".to_string(),
            }
        })?;

    let tier = PlanTier::from_plan_claim(caller.plan.as_deref());
    let mode = tier.effective_mode(request.requested_mode);

    // Read before write; a failed read is just a miss.
    match store.fetch_spark(&caller.subject, day).await {
        Ok(Some(spark)) => return Ok(SparkResponse { spark }),
        Ok(None) => {}
        Err(err) => {
            tracing::warn!(error = %err, "spark cache read failed, regenerating");
        }
    }

    let compiled = prompt::spark_prompt(&request.profile, mode);
    let raw = provider
        .generate(&compiled, SPARK_DECODING)
        .await
        .map_err(provider_error)?;
    let parsed = extract::parse_model_output(&raw)
        .map_err(|_| AppError::InvalidModelOutput { raw: raw.clone() })?;

    let spark = blueprint::spark_text(&parsed);
    if spark.is_empty() {
        return Err(AppError::EmptySpark);
    }

    // Best effort: a failed write only costs future idempotence, never the
    // freshly generated result.
    if let Err(err) = store.upsert_spark(&caller.subject, day, &spark).await {
        tracing::warn!(error = %err, "spark cache write failed");
    }

    Ok(SparkResponse { spark })
}

/// The blueprint flow. Tolerates anonymous or unverifiable callers by
/// treating them as free tier, and is never cached.
pub async fn run_blueprint<I, G>(
    identity: &I,
    provider: &G,
    authorization: Option<&str>,
    request: BlueprintRequest,
) -> Result<Blueprint, AppError>
where
    I: IdentityProvider,
    G: GenerationProvider,
{
    let idea = request.idea.trim();
    if idea.is_empty() {
        return Err(AppError::Validation {
            message: "Missing idea".to_string(),
        });
    }

    let tier = match authorization {
        Some(authorization) => match identity.resolve_identity(authorization).await {
            Ok(caller) => PlanTier::from_plan_claim(caller.plan.as_deref()),
            Err(err) => {
                tracing::warn!(error = %err, "identity resolution failed, treating caller as free tier");
                PlanTier::Free
            }
        },
        None => PlanTier::Free,
    };
    let mode = tier.effective_mode(request.requested_mode);

    let compiled = prompt::blueprint_prompt(&request.profile, idea, request.modifier.as_deref(), mode);
    let raw = provider
        .generate(&compiled, BLUEPRINT_DECODING)
        .await
        .map_err(provider_error)?;
    let parsed = extract::parse_model_output(&raw)
        .map_err(|_| AppError::InvalidModelOutput { raw: raw.clone() })?;

    Ok(blueprint::normalize_blueprint(&parsed, mode))
}

fn provider_error(err: ProviderError) -> AppError {
    match err {
        ProviderError::Upstream { body, .. } => AppError::Provider { detail: body },
        ProviderError::Transport(err) => AppError::Provider {
            detail: err.to_string(),
        },
    }
}
