use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::domain::question::Question;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Quiz {
    pub id: String,
    pub code: String, // Opaque access token; the QR collaborator encodes it
    pub title: String,
    pub created_by_user_id: String, // Teacher who created the quiz
    pub questions: Vec<Question>,
    pub time_limit_seconds: Option<i64>, // None = untimed
    pub is_active: bool,                 // Teacher can stop/re-open
    pub attempt_limit: i16,              // Finalized attempts allowed per student
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<DateTime<Utc>>,
}

impl Quiz {
    pub fn new(
        title: &str,
        created_by_user_id: &str,
        questions: Vec<Question>,
        time_limit_seconds: Option<i64>,
        attempt_limit: i16,
    ) -> Self {
        Quiz {
            id: Uuid::new_v4().to_string(),
            code: Self::generate_code(),
            title: title.to_string(),
            created_by_user_id: created_by_user_id.to_string(),
            questions,
            time_limit_seconds,
            is_active: true,
            attempt_limit: attempt_limit.max(1),
            created_at: Some(Utc::now()),
            modified_at: Some(Utc::now()),
        }
    }

    /// Students can start only while the teacher has the quiz open.
    pub fn can_start(&self) -> bool {
        self.is_active
    }

    /// Sum of all question weights, widened so large quizzes cannot
    /// overflow the total.
    pub fn maximum_score(&self) -> i32 {
        self.questions.iter().map(|q| i32::from(q.weight)).sum()
    }

    pub fn question(&self, question_id: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == question_id)
    }

    /// Short uppercase code students type in or scan.
    fn generate_code() -> String {
        Uuid::new_v4().simple().to_string()[..6].to_uppercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::domain::question::{QuestionOption, QuestionType};

    fn two_question_quiz() -> Quiz {
        let questions = vec![
            Question {
                id: "q-1".to_string(),
                prompt: "First question".to_string(),
                question_type: QuestionType::Single,
                options: vec![
                    QuestionOption {
                        id: "q1-a".to_string(),
                        text: "Right".to_string(),
                        correct: true,
                    },
                    QuestionOption {
                        id: "q1-b".to_string(),
                        text: "Wrong".to_string(),
                        correct: false,
                    },
                ],
                weight: 1,
                order: 1,
            },
            Question {
                id: "q-2".to_string(),
                prompt: "Second question".to_string(),
                question_type: QuestionType::Bool,
                options: vec![
                    QuestionOption {
                        id: "q2-true".to_string(),
                        text: "True".to_string(),
                        correct: false,
                    },
                    QuestionOption {
                        id: "q2-false".to_string(),
                        text: "False".to_string(),
                        correct: true,
                    },
                ],
                weight: 2,
                order: 2,
            },
        ];
        Quiz::new("Sample quiz", "teacher-1", questions, Some(600), 1)
    }

    #[test]
    fn new_quiz_generates_code_and_is_active() {
        let quiz = two_question_quiz();

        assert_eq!(quiz.code.len(), 6);
        assert_eq!(quiz.code, quiz.code.to_uppercase());
        assert!(quiz.can_start());
        assert_eq!(quiz.attempt_limit, 1);
    }

    #[test]
    fn maximum_score_sums_question_weights() {
        let quiz = two_question_quiz();
        assert_eq!(quiz.maximum_score(), 3);
    }

    #[test]
    fn stopped_quiz_cannot_start() {
        let mut quiz = two_question_quiz();
        quiz.is_active = false;
        assert!(!quiz.can_start());
    }

    #[test]
    fn question_lookup_by_id() {
        let quiz = two_question_quiz();
        assert!(quiz.question("q-2").is_some());
        assert!(quiz.question("q-99").is_none());
    }
}
