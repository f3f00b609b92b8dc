use actix_web::{get, post, web, HttpResponse};
use validator::Validate;

use crate::{
    app_state::AppState,
    errors::AppError,
    models::{
        domain::AttemptAnswer,
        dto::{
            request::{StartAttemptRequest, SubmitAttemptRequest},
            response::StartAttemptResponse,
        },
    },
};

#[post("/api/quizzes/{code}/attempts")]
async fn start_attempt(
    state: web::Data<AppState>,
    code: web::Path<String>,
    request: web::Json<StartAttemptRequest>,
) -> Result<HttpResponse, AppError> {
    request.validate()?;

    let attempt = state
        .attempt_service
        .start(&code, &request.student_id, &request.student_name)
        .await?;

    let now = state.clock.now();
    Ok(HttpResponse::Created().json(StartAttemptResponse::from_attempt(&attempt, now)))
}

#[post("/api/attempts/{id}/submit")]
async fn submit_attempt(
    state: web::Data<AppState>,
    id: web::Path<String>,
    request: web::Json<SubmitAttemptRequest>,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();

    // Advisory only; expiry is decided by the server clock
    if let Some(elapsed) = request.client_reported_elapsed_seconds {
        log::debug!("Client reports {}s elapsed for attempt '{}'", elapsed, id);
    }

    let answers: Vec<AttemptAnswer> = request
        .answers
        .into_iter()
        .map(|a| AttemptAnswer {
            question_id: a.question_id,
            selected_option_ids: a.selected_option_ids,
        })
        .collect();

    let outcome = state.attempt_service.submit(&id, answers).await?;
    Ok(HttpResponse::Ok().json(outcome))
}

/// System-triggered expiry for attempts whose deadline passed without a
/// client submission.
#[post("/api/attempts/{id}/expire")]
async fn expire_attempt(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let outcome = state.attempt_service.expire(&id).await?;
    Ok(HttpResponse::Ok().json(outcome))
}

#[get("/api/attempts/{id}")]
async fn get_attempt(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let (attempt, effective_status) = state.attempt_service.get_attempt(&id).await?;
    let now = state.clock.now();

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "attempt_id": attempt.id,
        "quiz_id": attempt.quiz_id,
        "status": effective_status,
        "started_at": attempt.started_at,
        "deadline_at": attempt.deadline_at,
        "remaining_seconds": attempt.remaining_seconds(now),
    })))
}
