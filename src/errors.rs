use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Already attempted: {0}")]
    AlreadyAttempted(String),

    #[error("Already submitted: {0}")]
    AlreadySubmitted(String),

    /// Internal signal for the expired branch of a finalization. Callers of
    /// the state machine see a graded `Expired` outcome, not this error.
    #[error("Deadline exceeded: {0}")]
    DeadlineExceeded(String),

    #[error("Answers reference questions outside the quiz: {0}")]
    InvalidAnswerScope(String),

    #[error("No qualifying results: {0}")]
    EmptyDataset(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl AppError {
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::AlreadyAttempted(_) => "ALREADY_ATTEMPTED",
            AppError::AlreadySubmitted(_) => "ALREADY_SUBMITTED",
            AppError::DeadlineExceeded(_) => "DEADLINE_EXCEEDED",
            AppError::InvalidAnswerScope(_) => "INVALID_ANSWER_SCOPE",
            AppError::EmptyDataset(_) => "EMPTY_DATASET",
            AppError::ValidationError(_) => "VALIDATION_ERROR",
            AppError::DatabaseError(_) => "DATABASE_ERROR",
            AppError::InternalError(_) => "INTERNAL_ERROR",
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
    pub error_code: &'static str,
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::AlreadyAttempted(_) => StatusCode::CONFLICT,
            AppError::AlreadySubmitted(_) => StatusCode::CONFLICT,
            AppError::DeadlineExceeded(_) => StatusCode::CONFLICT,
            AppError::InvalidAnswerScope(_) => StatusCode::BAD_REQUEST,
            AppError::EmptyDataset(_) => StatusCode::NOT_FOUND,
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: self.to_string(),
            code: self.status_code().as_u16(),
            error_code: self.error_code(),
        })
    }
}

impl From<mongodb::error::Error> for AppError {
    fn from(err: mongodb::error::Error) -> Self {
        AppError::DatabaseError(err.to_string())
    }
}

impl From<mongodb::bson::ser::Error> for AppError {
    fn from(err: mongodb::bson::ser::Error) -> Self {
        AppError::InternalError(format!("BSON serialization error: {}", err))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::ValidationError(err.to_string())
    }
}

impl From<rust_xlsxwriter::XlsxError> for AppError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        AppError::InternalError(format!("Workbook error: {}", err))
    }
}

pub type AppResult<T> = Result<T, AppError>;
