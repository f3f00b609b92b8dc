#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;

use quizfy_server::{
    clock::Clock,
    errors::{AppError, AppResult},
    models::domain::{
        question::{Question, QuestionOption, QuestionType},
        Attempt, AttemptAnswer, AttemptResult, AttemptStatus, Quiz,
    },
    repositories::{AttemptRepository, QuizRepository, ResultRepository},
    services::{AttemptService, Evaluator, GradingBands, QuizService, ReportService},
};

/// Clock the tests can move by hand.
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn at(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    pub fn advance(&self, duration: Duration) {
        let mut now = self.now.lock().unwrap();
        *now += duration;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

pub struct InMemoryQuizRepository {
    quizzes: Arc<RwLock<HashMap<String, Quiz>>>,
}

impl InMemoryQuizRepository {
    pub fn new() -> Self {
        Self {
            quizzes: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl QuizRepository for InMemoryQuizRepository {
    async fn create(&self, quiz: Quiz) -> AppResult<Quiz> {
        let mut quizzes = self.quizzes.write().await;
        if quizzes.contains_key(&quiz.id) {
            return Err(AppError::DatabaseError(format!(
                "quiz '{}' already exists",
                quiz.id
            )));
        }
        quizzes.insert(quiz.id.clone(), quiz.clone());
        Ok(quiz)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Quiz>> {
        let quizzes = self.quizzes.read().await;
        Ok(quizzes.get(id).cloned())
    }

    async fn find_by_code(&self, code: &str) -> AppResult<Option<Quiz>> {
        let quizzes = self.quizzes.read().await;
        Ok(quizzes.values().find(|q| q.code == code).cloned())
    }
}

pub struct InMemoryAttemptRepository {
    attempts: Arc<RwLock<HashMap<String, Attempt>>>,
}

impl InMemoryAttemptRepository {
    pub fn new() -> Self {
        Self {
            attempts: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl AttemptRepository for InMemoryAttemptRepository {
    async fn create(&self, attempt: Attempt) -> AppResult<Attempt> {
        let mut attempts = self.attempts.write().await;
        attempts.insert(attempt.id.clone(), attempt.clone());
        Ok(attempt)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Attempt>> {
        let attempts = self.attempts.read().await;
        Ok(attempts.get(id).cloned())
    }

    async fn find_in_progress(
        &self,
        quiz_id: &str,
        student_id: &str,
    ) -> AppResult<Option<Attempt>> {
        let attempts = self.attempts.read().await;
        Ok(attempts
            .values()
            .find(|a| {
                a.quiz_id == quiz_id
                    && a.student_id == student_id
                    && a.status == AttemptStatus::InProgress
            })
            .cloned())
    }

    async fn count_finalized(&self, quiz_id: &str, student_id: &str) -> AppResult<usize> {
        let attempts = self.attempts.read().await;
        Ok(attempts
            .values()
            .filter(|a| {
                a.quiz_id == quiz_id && a.student_id == student_id && a.status.is_terminal()
            })
            .count())
    }

    async fn finalize(
        &self,
        attempt_id: &str,
        new_status: AttemptStatus,
        answers: &[AttemptAnswer],
        submitted_at: DateTime<Utc>,
    ) -> AppResult<Attempt> {
        // Write lock makes the check-and-set atomic, like the conditional
        // update in the real store
        let mut attempts = self.attempts.write().await;
        let attempt = attempts
            .get_mut(attempt_id)
            .ok_or_else(|| AppError::NotFound(format!("Attempt '{}' not found", attempt_id)))?;

        if attempt.status != AttemptStatus::InProgress {
            return Err(AppError::AlreadySubmitted(format!(
                "attempt '{}' is already finalized",
                attempt_id
            )));
        }

        attempt.status = new_status;
        attempt.answers = answers.to_vec();
        attempt.submitted_at = Some(submitted_at);
        attempt.modified_at = Some(submitted_at);
        Ok(attempt.clone())
    }
}

pub struct InMemoryResultRepository {
    results: Arc<RwLock<HashMap<String, AttemptResult>>>,
}

impl InMemoryResultRepository {
    pub fn new() -> Self {
        Self {
            results: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub async fn count(&self) -> usize {
        self.results.read().await.len()
    }

    fn sorted(mut results: Vec<AttemptResult>) -> Vec<AttemptResult> {
        results.sort_by(|a, b| {
            a.student_id
                .cmp(&b.student_id)
                .then_with(|| a.computed_at.cmp(&b.computed_at))
        });
        results
    }
}

#[async_trait]
impl ResultRepository for InMemoryResultRepository {
    async fn create_if_absent(&self, result: AttemptResult) -> AppResult<AttemptResult> {
        let mut results = self.results.write().await;
        // Keyed by attempt id: the first write wins
        Ok(results
            .entry(result.attempt_id.clone())
            .or_insert(result)
            .clone())
    }

    async fn find_by_attempt_id(&self, attempt_id: &str) -> AppResult<Option<AttemptResult>> {
        let results = self.results.read().await;
        Ok(results.get(attempt_id).filter(|r| !r.superseded).cloned())
    }

    async fn find_by_student(&self, student_id: &str) -> AppResult<Vec<AttemptResult>> {
        let results = self.results.read().await;
        Ok(Self::sorted(
            results
                .values()
                .filter(|r| r.student_id == student_id && !r.superseded)
                .cloned()
                .collect(),
        ))
    }

    async fn find_by_quiz(&self, quiz_id: &str) -> AppResult<Vec<AttemptResult>> {
        let results = self.results.read().await;
        Ok(Self::sorted(
            results
                .values()
                .filter(|r| r.quiz_id == quiz_id && !r.superseded)
                .cloned()
                .collect(),
        ))
    }

    async fn find_by_students(&self, student_ids: &[String]) -> AppResult<Vec<AttemptResult>> {
        let results = self.results.read().await;
        Ok(Self::sorted(
            results
                .values()
                .filter(|r| student_ids.contains(&r.student_id) && !r.superseded)
                .cloned()
                .collect(),
        ))
    }
}

/// Everything a lifecycle test needs, wired together over in-memory stores.
pub struct TestHarness {
    pub quizzes: Arc<InMemoryQuizRepository>,
    pub attempts: Arc<InMemoryAttemptRepository>,
    pub results: Arc<InMemoryResultRepository>,
    pub clock: Arc<ManualClock>,
    pub quiz_service: QuizService,
    pub attempt_service: AttemptService,
    pub report_service: ReportService,
}

impl TestHarness {
    pub fn new() -> Self {
        let quizzes = Arc::new(InMemoryQuizRepository::new());
        let attempts = Arc::new(InMemoryAttemptRepository::new());
        let results = Arc::new(InMemoryResultRepository::new());
        let clock = Arc::new(ManualClock::at(Utc::now()));

        let quiz_service = QuizService::new(quizzes.clone());
        let attempt_service = AttemptService::new(
            quizzes.clone(),
            attempts.clone(),
            results.clone(),
            Evaluator::new(GradingBands::default()),
            clock.clone(),
        );
        let report_service = ReportService::new(results.clone(), quizzes.clone());

        Self {
            quizzes,
            attempts,
            results,
            clock,
            quiz_service,
            attempt_service,
            report_service,
        }
    }

    pub async fn seed_quiz(&self, quiz: Quiz) -> Quiz {
        self.quizzes.create(quiz).await.expect("quiz seeds")
    }
}

fn option(id: &str, text: &str, correct: bool) -> QuestionOption {
    QuestionOption {
        id: id.to_string(),
        text: text.to_string(),
        correct,
    }
}

/// Two single-choice questions, weight 1 each; correct answers are
/// `q1-a` and `q2-b`.
pub fn two_question_quiz(time_limit_seconds: Option<i64>, attempt_limit: i16) -> Quiz {
    let questions = vec![
        Question {
            id: "q-1".to_string(),
            prompt: "First question".to_string(),
            question_type: QuestionType::Single,
            options: vec![option("q1-a", "Right", true), option("q1-b", "Wrong", false)],
            weight: 1,
            order: 1,
        },
        Question {
            id: "q-2".to_string(),
            prompt: "Second question".to_string(),
            question_type: QuestionType::Single,
            options: vec![option("q2-a", "Wrong", false), option("q2-b", "Right", true)],
            weight: 1,
            order: 2,
        },
    ];
    Quiz::new("Sample quiz", "teacher-1", questions, time_limit_seconds, attempt_limit)
}

pub fn answer(question_id: &str, selected: &str) -> AttemptAnswer {
    AttemptAnswer {
        question_id: question_id.to_string(),
        selected_option_ids: vec![selected.to_string()],
    }
}
