use async_trait::async_trait;
use serde_json::{Value, json};
use thiserror::Error;

use crate::pipeline::GenerationProvider;

/// Fixed decoding parameters, chosen per flow.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DecodingParams {
    pub temperature: f64,
    pub max_output_tokens: u32,
}

/// Spark requests trade length for variety.
pub const SPARK_DECODING: DecodingParams = DecodingParams {
    temperature: 0.8,
    max_output_tokens: 200,
};

/// Blueprint requests want steadier, longer output.
pub const BLUEPRINT_DECODING: DecodingParams = DecodingParams {
    temperature: 0.7,
    max_output_tokens: 1200,
};

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("provider request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("provider returned {status}: {body}")]
    Upstream {
        status: reqwest::StatusCode,
        body: String,
    },
}

/// Client for the external generation provider (Gemini-style generateContent
/// API). One single-turn call per request, never retried; retry policy
/// belongs to the gateway's caller.
#[derive(Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl GeminiClient {
    pub fn new(http: reqwest::Client, base_url: String, api_key: String, model: String) -> Self {
        Self {
            http,
            base_url,
            api_key,
            model,
        }
    }
}

#[async_trait]
impl GenerationProvider for GeminiClient {
    async fn generate(&self, prompt: &str, params: DecodingParams) -> Result<String, ProviderError> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url.trim_end_matches('/'),
            self.model,
            self.api_key,
        );

        let response = self
            .http
            .post(&url)
            .json(&json!({
                "contents": [
                    { "role": "user", "parts": [{ "text": prompt }] }
                ],
                "generationConfig": {
                    "temperature": params.temperature,
                    "maxOutputTokens": params.max_output_tokens,
                },
            }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = %status, "generation provider returned non-success status");
            return Err(ProviderError::Upstream { status, body });
        }

        let body = response.json::<Value>().await?;
        Ok(candidate_text(&body))
    }
}

/// Pull the completion text out of the provider's candidate list: the first
/// candidate's first part, falling back to joining all of its part texts.
fn candidate_text(body: &Value) -> String {
    let parts = body
        .get("candidates")
        .and_then(|candidates| candidates.get(0))
        .and_then(|candidate| candidate.get("content"))
        .and_then(|content| content.get("parts"));

    if let Some(text) = parts
        .and_then(|parts| parts.get(0))
        .and_then(|part| part.get("text"))
        .and_then(Value::as_str)
    {
        return text.to_string();
    }

    match parts.and_then(Value::as_array) {
        Some(parts) => parts
            .iter()
            .filter_map(|part| part.get("text").and_then(Value::as_str))
            .collect::<Vec<_>>()
            .join("\n"),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::{BLUEPRINT_DECODING, SPARK_DECODING, candidate_text};
    use serde_json::json;

    #[test]
    fn direct_first_part_text_is_taken() {
        let body = json!({
            "candidates": [
                { "content": { "parts": [{ "text": "{\"spark\":\"A\"}" }] } },
                { "content": { "parts": [{ "text": "ignored" }] } },
            ]
        });
        assert_eq!(candidate_text(&body), "{\"spark\":\"A\"}");
    }

    #[test]
    fn parts_without_a_direct_text_are_joined() {
        let body = json!({
            "candidates": [
                { "content": { "parts": [{ "thought": true }, { "text": "line one" }, { "text": "line two" }] } }
            ]
        });
        assert_eq!(candidate_text(&body), "line one\nline two");
    }

    #[test]
    fn missing_candidates_yield_empty_text() {
        assert_eq!(candidate_text(&json!({})), "");
        assert_eq!(candidate_text(&json!({ "candidates": [] })), "");
    }

    #[test]
    fn decoding_params_differ_per_flow() {
        assert!(SPARK_DECODING.temperature > BLUEPRINT_DECODING.temperature);
        assert!(SPARK_DECODING.max_output_tokens < BLUEPRINT_DECODING.max_output_tokens);
    }
}
