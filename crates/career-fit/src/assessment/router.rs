use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{Answer, QuestionId, Response as AssessmentResponse, LIKERT_LABELS};
use super::repository::SessionRepository;
use super::service::AssessmentService;
use super::session::SessionId;
use crate::error::AppError;

/// Request body for recording an answer.
#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
    pub question_id: QuestionId,
    pub answer: Answer,
}

/// Request body for scoring a detached response list.
#[derive(Debug, Deserialize)]
pub struct EvaluateRequest {
    pub responses: Vec<AssessmentResponse>,
}

/// Router builder exposing the catalog, stateless evaluation, and session endpoints.
pub fn assessment_router<R>(service: Arc<AssessmentService<R>>) -> Router
where
    R: SessionRepository + 'static,
{
    Router::new()
        .route("/api/v1/assessment/questions", get(questions_handler::<R>))
        .route("/api/v1/assessment/evaluate", post(evaluate_handler::<R>))
        .route("/api/v1/assessment/sessions", post(start_handler::<R>))
        .route(
            "/api/v1/assessment/sessions/:session_id",
            get(session_handler::<R>),
        )
        .route(
            "/api/v1/assessment/sessions/:session_id/responses",
            post(answer_handler::<R>),
        )
        .route(
            "/api/v1/assessment/sessions/:session_id/back",
            post(back_handler::<R>),
        )
        .route(
            "/api/v1/assessment/sessions/:session_id/submit",
            post(submit_handler::<R>),
        )
        .with_state(service)
}

pub(crate) async fn questions_handler<R>(
    State(service): State<Arc<AssessmentService<R>>>,
) -> Response
where
    R: SessionRepository + 'static,
{
    let scale: Vec<_> = LIKERT_LABELS
        .iter()
        .map(|(value, label)| json!({ "value": value, "label": label }))
        .collect();
    let payload = json!({
        "questions": service.catalog().questions(),
        "likert_scale": scale,
    });
    (StatusCode::OK, axum::Json(payload)).into_response()
}

pub(crate) async fn evaluate_handler<R>(
    State(service): State<Arc<AssessmentService<R>>>,
    axum::Json(request): axum::Json<EvaluateRequest>,
) -> Response
where
    R: SessionRepository + 'static,
{
    match service.evaluate(&request.responses) {
        Ok(result) => (StatusCode::OK, axum::Json(result)).into_response(),
        Err(err) => AppError::from(err).into_response(),
    }
}

pub(crate) async fn start_handler<R>(State(service): State<Arc<AssessmentService<R>>>) -> Response
where
    R: SessionRepository + 'static,
{
    match service.start() {
        Ok(view) => (StatusCode::CREATED, axum::Json(view)).into_response(),
        Err(err) => AppError::from(err).into_response(),
    }
}

pub(crate) async fn session_handler<R>(
    State(service): State<Arc<AssessmentService<R>>>,
    Path(session_id): Path<String>,
) -> Response
where
    R: SessionRepository + 'static,
{
    match service.get(&SessionId(session_id)) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(err) => AppError::from(err).into_response(),
    }
}

pub(crate) async fn answer_handler<R>(
    State(service): State<Arc<AssessmentService<R>>>,
    Path(session_id): Path<String>,
    axum::Json(request): axum::Json<AnswerRequest>,
) -> Response
where
    R: SessionRepository + 'static,
{
    match service.answer(&SessionId(session_id), request.question_id, request.answer) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(err) => AppError::from(err).into_response(),
    }
}

pub(crate) async fn back_handler<R>(
    State(service): State<Arc<AssessmentService<R>>>,
    Path(session_id): Path<String>,
) -> Response
where
    R: SessionRepository + 'static,
{
    match service.back(&SessionId(session_id)) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(err) => AppError::from(err).into_response(),
    }
}

pub(crate) async fn submit_handler<R>(
    State(service): State<Arc<AssessmentService<R>>>,
    Path(session_id): Path<String>,
) -> Response
where
    R: SessionRepository + 'static,
{
    match service.submit(&SessionId(session_id)) {
        Ok(result) => (StatusCode::OK, axum::Json(result)).into_response(),
        Err(err) => AppError::from(err).into_response(),
    }
}
