use serde::Serialize;
use utoipa::ToSchema;

/// Wire shape of every failure response. `detail` carries an upstream
/// provider body; `raw` carries unparseable model text for diagnosis.
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiError {
    /// Short description of what went wrong (e.g. "Missing idea")
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
}

impl ApiError {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            detail: None,
            raw: None,
        }
    }
}
