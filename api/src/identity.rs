use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::pipeline::IdentityProvider;

/// Resolved caller identity: an opaque subject id plus the raw plan claim.
/// The gateway never interprets the subject beyond using it as a cache key.
#[derive(Debug, Clone)]
pub struct Identity {
    pub subject: String,
    pub plan: Option<String>,
}

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("identity request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("identity provider returned {0}")]
    Upstream(reqwest::StatusCode),
    #[error("identity response has no subject")]
    NoSubject,
}

#[derive(Debug, Deserialize)]
struct UserResponse {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    user_metadata: Value,
    #[serde(default)]
    app_metadata: Value,
}

/// Client for the external identity provider. Exchanges the caller's opaque
/// bearer assertion for a subject id and a plan claim.
#[derive(Clone)]
pub struct IdentityClient {
    http: reqwest::Client,
    base_url: String,
    anon_key: String,
}

impl IdentityClient {
    pub fn new(http: reqwest::Client, base_url: String, anon_key: String) -> Self {
        Self {
            http,
            base_url,
            anon_key,
        }
    }
}

#[async_trait]
impl IdentityProvider for IdentityClient {
    async fn resolve_identity(&self, authorization: &str) -> Result<Identity, IdentityError> {
        let response = self
            .http
            .get(format!(
                "{}/auth/v1/user",
                self.base_url.trim_end_matches('/')
            ))
            .header("Authorization", authorization)
            .header("apikey", &self.anon_key)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(IdentityError::Upstream(status));
        }

        identity_from_user(response.json::<UserResponse>().await?)
    }
}

/// The plan claim lives in either metadata bag; first non-empty wins.
fn identity_from_user(user: UserResponse) -> Result<Identity, IdentityError> {
    let subject = user
        .id
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty())
        .ok_or(IdentityError::NoSubject)?;
    let plan = plan_claim(&user.user_metadata).or_else(|| plan_claim(&user.app_metadata));
    Ok(Identity { subject, plan })
}

fn plan_claim(metadata: &Value) -> Option<String> {
    metadata
        .get("plan")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|plan| !plan.is_empty())
        .map(str::to_string)
}
