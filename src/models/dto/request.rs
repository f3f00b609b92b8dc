use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::domain::question::{Question, QuestionOption, QuestionType};
use crate::models::domain::Quiz;

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct CreateQuizRequest {
    /// Teacher identity reference; authentication happens upstream.
    #[validate(length(min = 1, max = 64))]
    pub teacher_id: String,

    #[validate(length(min = 1, max = 100))]
    pub title: String,

    /// Time budget in seconds; omit for an untimed quiz.
    #[validate(range(min = 1))]
    pub time_limit_seconds: Option<i64>,

    /// Finalized attempts allowed per student; defaults to 1.
    pub attempt_limit: Option<i16>,

    #[validate(length(min = 1))]
    pub questions: Vec<CreateQuestionRequest>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct CreateQuestionRequest {
    #[validate(length(min = 1))]
    pub prompt: String,

    pub question_type: QuestionType,

    #[validate(length(min = 2))]
    pub options: Vec<CreateOptionRequest>,

    /// Relative worth of the question; capped so weighted totals stay in a
    /// sane range.
    #[validate(range(min = 1, max = 100))]
    pub weight: Option<i16>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CreateOptionRequest {
    pub text: String,
    pub correct: bool,
}

impl CreateQuizRequest {
    pub fn into_quiz(self) -> Quiz {
        let questions = self
            .questions
            .into_iter()
            .enumerate()
            .map(|(idx, q)| q.into_question(idx as i16 + 1))
            .collect();

        Quiz::new(
            &self.title,
            &self.teacher_id,
            questions,
            self.time_limit_seconds,
            self.attempt_limit.unwrap_or(1),
        )
    }
}

impl CreateQuestionRequest {
    fn into_question(self, order: i16) -> Question {
        Question {
            id: Uuid::new_v4().to_string(),
            prompt: self.prompt,
            question_type: self.question_type,
            options: self
                .options
                .into_iter()
                .map(|opt| QuestionOption {
                    id: Uuid::new_v4().to_string(),
                    text: opt.text,
                    correct: opt.correct,
                })
                .collect(),
            weight: self.weight.unwrap_or(1),
            order,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct StartAttemptRequest {
    #[validate(length(min = 1, max = 64))]
    pub student_id: String,

    #[validate(length(min = 1, max = 120))]
    pub student_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubmitAttemptRequest {
    pub answers: Vec<QuestionAnswerInput>,

    /// Advisory only; the server clock decides expiry.
    pub client_reported_elapsed_seconds: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuestionAnswerInput {
    pub question_id: String,
    pub selected_option_ids: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReportCardQuery {
    /// Comma-separated student ids.
    pub student_ids: String,
}

impl ReportCardQuery {
    pub fn parsed_ids(&self) -> Vec<String> {
        self.student_ids
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }
}
