use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::domain::question::QuestionType;
use crate::models::domain::{Attempt, AttemptResult, AttemptStatus, Quiz};

/// Outcome of a finalizing submission: the attempt's terminal status plus
/// the graded result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionOutcome {
    pub attempt_id: String,
    pub status: AttemptStatus,
    pub score: i32,
    pub maximum: i32,
    pub performance_label: String,
}

impl SubmissionOutcome {
    pub fn from_parts(status: AttemptStatus, result: &AttemptResult) -> Self {
        SubmissionOutcome {
            attempt_id: result.attempt_id.clone(),
            status,
            score: result.score,
            maximum: result.maximum,
            performance_label: result.performance_label.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StartAttemptResponse {
    pub attempt_id: String,
    pub quiz_id: String,
    pub attempt_number: i16,
    pub started_at: DateTime<Utc>,
    pub deadline_at: Option<DateTime<Utc>>,
    pub remaining_seconds: Option<i64>,
}

impl StartAttemptResponse {
    pub fn from_attempt(attempt: &Attempt, now: DateTime<Utc>) -> Self {
        StartAttemptResponse {
            attempt_id: attempt.id.clone(),
            quiz_id: attempt.quiz_id.clone(),
            attempt_number: attempt.attempt_number,
            started_at: attempt.started_at,
            deadline_at: attempt.deadline_at,
            remaining_seconds: attempt.remaining_seconds(now),
        }
    }
}

/// Quiz view served to students: correct-answer flags stripped.
#[derive(Debug, Clone, Serialize)]
pub struct QuizForStudent {
    pub id: String,
    pub code: String,
    pub title: String,
    pub time_limit_seconds: Option<i64>,
    pub questions: Vec<QuestionForStudent>,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuestionForStudent {
    pub id: String,
    pub prompt: String,
    pub question_type: QuestionType,
    pub order: i16,
    pub options: Vec<OptionForStudent>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OptionForStudent {
    pub id: String,
    pub text: String,
}

impl From<&Quiz> for QuizForStudent {
    fn from(quiz: &Quiz) -> Self {
        QuizForStudent {
            id: quiz.id.clone(),
            code: quiz.code.clone(),
            title: quiz.title.clone(),
            time_limit_seconds: quiz.time_limit_seconds,
            questions: quiz
                .questions
                .iter()
                .map(|q| QuestionForStudent {
                    id: q.id.clone(),
                    prompt: q.prompt.clone(),
                    question_type: q.question_type,
                    order: q.order,
                    options: q
                        .options
                        .iter()
                        .map(|opt| OptionForStudent {
                            id: opt.id.clone(),
                            text: opt.text.clone(),
                        })
                        .collect(),
                })
                .collect(),
        }
    }
}
