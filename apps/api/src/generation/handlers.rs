//! Axum route handlers for the Generation API.

use axum::{
    extract::{
        rejection::{FormRejection, JsonRejection},
        State,
    },
    Form, Json,
};

use crate::errors::AppError;
use crate::generation::pipeline::{self, GenerateSubmission, GenerationOutcome};
use crate::state::AppState;

/// POST /api/v1/generate
///
/// JSON body `{topic, tone?, keywords?}`. Returns `{success: true, content}`
/// or `{error, code}` with 400 (bad input) or 500 (generation failed).
pub async fn handle_generate(
    State(state): State<AppState>,
    submission: Result<Json<GenerateSubmission>, JsonRejection>,
) -> GenerationOutcome {
    match submission {
        Ok(Json(submission)) => pipeline::run(&state.generator, submission, &state.shutdown).await,
        Err(rejection) => GenerationOutcome::Failure(AppError::from(rejection)),
    }
}

/// POST /generate
///
/// Same pipeline for `application/x-www-form-urlencoded` form posts.
pub async fn handle_generate_form(
    State(state): State<AppState>,
    submission: Result<Form<GenerateSubmission>, FormRejection>,
) -> GenerationOutcome {
    match submission {
        Ok(Form(submission)) => pipeline::run(&state.generator, submission, &state.shutdown).await,
        Err(rejection) => GenerationOutcome::Failure(AppError::from(rejection)),
    }
}
