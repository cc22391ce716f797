use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use ideafii_core::error::ApiError;

/// Internal error type that converts to the gateway's structured failure
/// responses. No variant is retried; every failure is reported to the
/// caller immediately.
#[derive(Debug)]
pub enum AppError {
    /// Missing or malformed request field (400)
    Validation { message: String },
    /// Missing/invalid identity assertion, or no subject (401)
    Unauthorized { message: String },
    /// Generation provider returned a non-success response (500)
    Provider { detail: String },
    /// Model output contained no parseable JSON (500)
    InvalidModelOutput { raw: String },
    /// Parsed JSON yielded a blank spark (500)
    EmptySpark,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::Validation { message } => (StatusCode::BAD_REQUEST, ApiError::new(message)),
            AppError::Unauthorized { message } => (StatusCode::UNAUTHORIZED, ApiError::new(message)),
            AppError::Provider { detail } => {
                tracing::error!(detail = %detail, "generation provider returned an error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiError {
                        error: "Generation provider error".to_string(),
                        detail: Some(detail),
                        raw: None,
                    },
                )
            }
            AppError::InvalidModelOutput { raw } => {
                tracing::error!("model output contained no parseable JSON");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiError {
                        error: "Invalid JSON from model".to_string(),
                        detail: None,
                        raw: Some(raw),
                    },
                )
            }
            AppError::EmptySpark => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::new("Empty spark"),
            ),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::AppError;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;

    #[test]
    fn validation_maps_to_400() {
        let response = AppError::Validation {
            message: "Missing idea".to_string(),
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn unauthorized_maps_to_401() {
        let response = AppError::Unauthorized {
            message: "Missing Authorization".to_string(),
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn upstream_failures_map_to_500() {
        for error in [
            AppError::Provider {
                detail: "quota exceeded".to_string(),
            },
            AppError::InvalidModelOutput {
                raw: "not json".to_string(),
            },
            AppError::EmptySpark,
        ] {
            assert_eq!(
                error.into_response().status(),
                StatusCode::INTERNAL_SERVER_ERROR
            );
        }
    }
}
