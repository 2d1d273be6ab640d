use axum::{
    extract::rejection::{FormRejection, JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

use crate::generation::generator::GenerationError;
use crate::generation::validator::ValidationError;

/// The only message end users see for any generation-side failure.
pub const GENERATION_FAILED_MESSAGE: &str = "Failed to generate content. Please try again.";

/// Classification of a failed generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    Validation,
    Transport,
    EmptyResponse,
    MalformedResponse,
}

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Body could not be read as a submission (wrong content type, bad JSON, wrong field types).
    #[error("Malformed request: {0}")]
    MalformedRequest(String),

    #[error("Generation error: {0}")]
    Generation(#[from] GenerationError),
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Validation(_) | AppError::MalformedRequest(_) => ErrorKind::Validation,
            AppError::Generation(e) => match e {
                GenerationError::Transport(_)
                | GenerationError::Timeout(_)
                | GenerationError::Cancelled => ErrorKind::Transport,
                GenerationError::EmptyResponse => ErrorKind::EmptyResponse,
                GenerationError::MalformedResponse { .. } => ErrorKind::MalformedResponse,
            },
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::MalformedRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Generation(GenerationError::Cancelled) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Generation(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show the end user. Generation details never leak here.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Validation(e) => e.to_string(),
            AppError::MalformedRequest(msg) => msg.clone(),
            AppError::Generation(_) => GENERATION_FAILED_MESSAGE.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let kind = self.kind();

        let body = match &self {
            AppError::Validation(e) => json!({
                "error": self.user_message(),
                "code": kind,
                "field": e.field(),
            }),
            AppError::MalformedRequest(_) => json!({
                "error": self.user_message(),
                "code": kind,
            }),
            AppError::Generation(e) => {
                tracing::error!("Generation failed ({kind:?}): {e}");
                json!({
                    "error": self.user_message(),
                    "code": kind,
                })
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::MalformedRequest(rejection.body_text())
    }
}

impl From<FormRejection> for AppError {
    fn from(rejection: FormRejection) -> Self {
        AppError::MalformedRequest(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::LlmError;

    #[test]
    fn test_validation_maps_to_400_with_field_message() {
        let err = AppError::from(ValidationError::TopicRequired);
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(err.user_message().contains("Topic is required"));
    }

    #[test]
    fn test_generation_failures_map_to_500_generic_message() {
        let cases = [
            (
                GenerationError::Transport(LlmError::Api {
                    status: 502,
                    message: "bad gateway from upstream".to_string(),
                }),
                ErrorKind::Transport,
            ),
            (GenerationError::EmptyResponse, ErrorKind::EmptyResponse),
            (
                GenerationError::MalformedResponse {
                    source: serde_json::from_str::<u8>("nope").unwrap_err(),
                    raw: "nope".to_string(),
                },
                ErrorKind::MalformedResponse,
            ),
        ];

        for (err, kind) in cases {
            let err = AppError::from(err);
            assert_eq!(err.kind(), kind);
            assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
            assert_eq!(err.user_message(), GENERATION_FAILED_MESSAGE);
        }
    }

    #[test]
    fn test_timeout_is_transport_kind() {
        let err = AppError::from(GenerationError::Timeout(std::time::Duration::from_secs(30)));
        assert_eq!(err.kind(), ErrorKind::Transport);
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_cancelled_is_service_unavailable() {
        let err = AppError::from(GenerationError::Cancelled);
        assert_eq!(err.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(err.user_message(), GENERATION_FAILED_MESSAGE);
    }
}
