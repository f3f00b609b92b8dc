use std::sync::Arc;

use validator::Validate;

use crate::{
    errors::{AppError, AppResult},
    models::{domain::Quiz, dto::request::CreateQuizRequest},
    repositories::QuizRepository,
};

pub struct QuizService {
    repository: Arc<dyn QuizRepository>,
}

impl QuizService {
    pub fn new(repository: Arc<dyn QuizRepository>) -> Self {
        Self { repository }
    }

    pub async fn create_quiz(&self, request: CreateQuizRequest) -> AppResult<Quiz> {
        request.validate()?;

        for question in &request.questions {
            question.validate()?;
            if !question.options.iter().any(|opt| opt.correct) {
                return Err(AppError::ValidationError(format!(
                    "question '{}' has no correct option",
                    question.prompt
                )));
            }
        }

        let quiz = request.into_quiz();
        self.repository.create(quiz).await
    }

    pub async fn get_quiz_by_code(&self, code: &str) -> AppResult<Quiz> {
        self.repository
            .find_by_code(code)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Quiz with code '{}' not found", code)))
    }
}
