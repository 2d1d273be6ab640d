//! Generation pipeline — one submission in, one terminal outcome out.
//!
//! Received → Validating → {Rejected | Prompting} → Awaiting Service →
//! {Parsed | TransportFailed | EmptyResponse | MalformedResponse}.
//!
//! Stateless: nothing survives the call, so concurrent runs need no coordination.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, info_span, Instrument};
use uuid::Uuid;

use crate::errors::{AppError, ErrorKind};
use crate::generation::generator::ContentGenerator;
use crate::generation::validator::validate_submission;
use crate::models::content::GeneratedContent;

/// Raw fields as submitted by a client. Every field may be missing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateSubmission {
    pub topic: Option<String>,
    pub tone: Option<String>,
    pub keywords: Option<String>,
}

/// Terminal result of one pipeline run. Exactly one variant; never partial.
#[derive(Debug)]
pub enum GenerationOutcome {
    Success(GeneratedContent),
    Failure(AppError),
}

impl GenerationOutcome {
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            GenerationOutcome::Success(_) => None,
            GenerationOutcome::Failure(e) => Some(e.kind()),
        }
    }
}

impl From<Result<GeneratedContent, AppError>> for GenerationOutcome {
    fn from(result: Result<GeneratedContent, AppError>) -> Self {
        match result {
            Ok(content) => GenerationOutcome::Success(content),
            Err(e) => GenerationOutcome::Failure(e),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub success: bool,
    pub content: GeneratedContent,
}

impl IntoResponse for GenerationOutcome {
    fn into_response(self) -> Response {
        match self {
            GenerationOutcome::Success(content) => (
                StatusCode::OK,
                Json(GenerateResponse {
                    success: true,
                    content,
                }),
            )
                .into_response(),
            GenerationOutcome::Failure(e) => e.into_response(),
        }
    }
}

/// Validates a submission and, if it passes, generates content for it.
///
/// The completion service is never called for a rejected submission.
pub async fn run(
    generator: &ContentGenerator,
    submission: GenerateSubmission,
    cancel: &CancellationToken,
) -> GenerationOutcome {
    let request_id = Uuid::new_v4();
    let span = info_span!("generate", %request_id);

    async move {
        debug!("Validating submission");
        let request = match validate_submission(
            submission.topic.as_deref(),
            submission.tone.as_deref(),
            submission.keywords.as_deref(),
        ) {
            Ok(request) => request,
            Err(e) => {
                info!("Submission rejected: field={} ({e})", e.field());
                return GenerationOutcome::Failure(e.into());
            }
        };

        info!(
            "Generating post: tone={}, keywords={}",
            request.tone,
            request.keywords.len()
        );

        let outcome: GenerationOutcome = generator
            .generate_cancellable(&request, cancel)
            .await
            .map_err(AppError::from)
            .into();

        match outcome.kind() {
            None => info!("Generation succeeded"),
            Some(kind) => info!("Generation ended without content: {kind:?}"),
        }

        outcome
    }
    .instrument(span)
    .await
}
