use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Serialize;
use serde_json::json;

use super::domain::CheckerAnswers;
use super::steps::{checker_steps, StepSlug, RESULTS_SLUG, TOTAL_STEPS};
use super::validation::{completed_steps, first_invalid_step, validate_step};
use crate::workflows::leads::router::service_error_response;
use crate::workflows::leads::{LeadRepository, LeadService};

/// Public questionnaire endpoints. Submission stores a lead through the lead service.
pub fn checker_router<R>(service: Arc<LeadService<R>>) -> Router
where
    R: LeadRepository + 'static,
{
    Router::new()
        .route("/api/v1/checker/steps", get(steps_handler))
        .route(
            "/api/v1/checker/steps/:slug/validate",
            post(validate_handler),
        )
        .route("/api/v1/checker/progress", post(progress_handler))
        .route("/api/v1/checker/evaluate", post(evaluate_handler::<R>))
        .route("/api/v1/checker/submit", post(submit_handler::<R>))
        .with_state(service)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckerProgress {
    pub completed_steps: usize,
    pub total_steps: usize,
    pub next_step: &'static str,
}

impl CheckerProgress {
    pub fn from_answers(answers: &CheckerAnswers) -> Self {
        Self {
            completed_steps: completed_steps(answers),
            total_steps: TOTAL_STEPS,
            next_step: first_invalid_step(answers)
                .map(|(step, _)| step.as_str())
                .unwrap_or(RESULTS_SLUG),
        }
    }
}

pub(crate) async fn steps_handler() -> Response {
    (StatusCode::OK, axum::Json(checker_steps())).into_response()
}

pub(crate) async fn validate_handler(
    Path(slug): Path<String>,
    axum::Json(answers): axum::Json<CheckerAnswers>,
) -> Response {
    match StepSlug::parse(&slug) {
        Some(step) => (StatusCode::OK, axum::Json(validate_step(&answers, step))).into_response(),
        None => {
            let payload = json!({
                "error": format!("unknown step '{slug}'"),
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn progress_handler(axum::Json(answers): axum::Json<CheckerAnswers>) -> Response {
    (StatusCode::OK, axum::Json(CheckerProgress::from_answers(&answers))).into_response()
}

pub(crate) async fn evaluate_handler<R>(
    State(service): State<Arc<LeadService<R>>>,
    axum::Json(answers): axum::Json<CheckerAnswers>,
) -> Response
where
    R: LeadRepository + 'static,
{
    let result = service.engine().evaluate(&answers);
    (StatusCode::OK, axum::Json(result)).into_response()
}

pub(crate) async fn submit_handler<R>(
    State(service): State<Arc<LeadService<R>>>,
    axum::Json(answers): axum::Json<CheckerAnswers>,
) -> Response
where
    R: LeadRepository + 'static,
{
    match service.submit(&answers) {
        Ok(outcome) => {
            let status = if outcome.lead.success {
                StatusCode::CREATED
            } else {
                StatusCode::OK
            };
            (status, axum::Json(outcome)).into_response()
        }
        Err(err) => service_error_response(err),
    }
}
