use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::{
    clock::Clock,
    errors::{AppError, AppResult},
    models::{
        domain::{Attempt, AttemptAnswer, AttemptResult, AttemptStatus, Quiz},
        dto::response::SubmissionOutcome,
    },
    repositories::{AttemptRepository, QuizRepository, ResultRepository},
    services::evaluator::Evaluator,
};

/// State machine for one student's attempt at one quiz:
/// `InProgress -> {Submitted | Expired}`, with at most one finalizing
/// transition per attempt. The server clock is authoritative for expiry.
pub struct AttemptService {
    quizzes: Arc<dyn QuizRepository>,
    attempts: Arc<dyn AttemptRepository>,
    results: Arc<dyn ResultRepository>,
    evaluator: Evaluator,
    clock: Arc<dyn Clock>,
}

impl AttemptService {
    pub fn new(
        quizzes: Arc<dyn QuizRepository>,
        attempts: Arc<dyn AttemptRepository>,
        results: Arc<dyn ResultRepository>,
        evaluator: Evaluator,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            quizzes,
            attempts,
            results,
            evaluator,
            clock,
        }
    }

    /// Opens an attempt the moment the student reaches the quiz. An existing
    /// in-progress attempt is returned as-is, so a page refresh never starts
    /// the timer over.
    pub async fn start(
        &self,
        quiz_code: &str,
        student_id: &str,
        student_name: &str,
    ) -> AppResult<Attempt> {
        let quiz = self.quiz_by_code(quiz_code).await?;

        if !quiz.can_start() {
            return Err(AppError::ValidationError(format!(
                "quiz '{}' is closed",
                quiz.code
            )));
        }

        if let Some(existing) = self
            .attempts
            .find_in_progress(&quiz.id, student_id)
            .await?
        {
            return Ok(existing);
        }

        let used = self.attempts.count_finalized(&quiz.id, student_id).await?;
        if used >= quiz.attempt_limit as usize {
            return Err(AppError::AlreadyAttempted(format!(
                "student '{}' has used {} of {} attempts for quiz '{}'",
                student_id, used, quiz.attempt_limit, quiz.code
            )));
        }

        let attempt = Attempt::start(
            &quiz,
            student_id,
            student_name,
            used as i16 + 1,
            self.clock.now(),
        );
        self.attempts.create(attempt).await
    }

    /// Student-initiated finalization. On time (deadline inclusive) the
    /// submitted answers are stored and graded; late submissions transition
    /// to `Expired` and are graded as fully unanswered, because answers
    /// arriving after the deadline are rejected. Re-submitting a finalized
    /// attempt returns the stored result unchanged.
    pub async fn submit(
        &self,
        attempt_id: &str,
        answers: Vec<AttemptAnswer>,
    ) -> AppResult<SubmissionOutcome> {
        let now = self.clock.now();
        let attempt = self.attempt_by_id(attempt_id).await?;
        let quiz = self.quiz_of(&attempt).await?;

        if attempt.is_terminal() {
            return self.existing_outcome(&attempt, &quiz).await;
        }

        // Rejected payloads must leave the attempt in its prior state, so
        // scope is checked before any write.
        Evaluator::validate_answer_scope(&quiz, &answers)?;

        let (new_status, final_answers) = match Self::check_deadline(&attempt, now) {
            Ok(()) => (AttemptStatus::Submitted, answers),
            Err(AppError::DeadlineExceeded(reason)) => {
                log::info!("Rejecting late answers: {}", reason);
                (AttemptStatus::Expired, Vec::new())
            }
            Err(other) => return Err(other),
        };

        self.finalize(&attempt, &quiz, new_status, final_answers, now)
            .await
    }

    /// System-triggered twin of the late-submit branch, for when no client
    /// request arrives before the deadline. Safe to race with `submit`.
    pub async fn expire(&self, attempt_id: &str) -> AppResult<SubmissionOutcome> {
        let now = self.clock.now();
        let attempt = self.attempt_by_id(attempt_id).await?;
        let quiz = self.quiz_of(&attempt).await?;

        if attempt.is_terminal() {
            return self.existing_outcome(&attempt, &quiz).await;
        }

        if Self::check_deadline(&attempt, now).is_ok() {
            return Err(AppError::ValidationError(format!(
                "attempt '{}' has not reached its deadline",
                attempt_id
            )));
        }

        self.finalize(&attempt, &quiz, AttemptStatus::Expired, Vec::new(), now)
            .await
    }

    /// Read-only view with lazy expiry applied.
    pub async fn get_attempt(&self, attempt_id: &str) -> AppResult<(Attempt, AttemptStatus)> {
        let attempt = self.attempt_by_id(attempt_id).await?;
        let status = attempt.effective_status(self.clock.now());
        Ok((attempt, status))
    }

    fn check_deadline(attempt: &Attempt, now: DateTime<Utc>) -> AppResult<()> {
        if attempt.is_past_deadline(now) {
            return Err(AppError::DeadlineExceeded(format!(
                "attempt '{}' deadline {} passed at {}",
                attempt.id,
                attempt
                    .deadline_at
                    .map(|d| d.to_rfc3339())
                    .unwrap_or_default(),
                now.to_rfc3339()
            )));
        }
        Ok(())
    }

    /// One finalizing transition wins; the loser degrades to the idempotent
    /// read of the winner's result.
    async fn finalize(
        &self,
        attempt: &Attempt,
        quiz: &Quiz,
        new_status: AttemptStatus,
        answers: Vec<AttemptAnswer>,
        now: DateTime<Utc>,
    ) -> AppResult<SubmissionOutcome> {
        let finalized = match self
            .attempts
            .finalize(&attempt.id, new_status, &answers, now)
            .await
        {
            Ok(finalized) => finalized,
            Err(AppError::AlreadySubmitted(_)) => {
                let current = self.attempt_by_id(&attempt.id).await?;
                return self.existing_outcome(&current, quiz).await;
            }
            Err(other) => return Err(other),
        };

        let result = self.derive_result(&finalized, quiz, now)?;
        let stored = self.results.create_if_absent(result).await?;
        Ok(SubmissionOutcome::from_parts(finalized.status, &stored))
    }

    /// Idempotent path for terminal attempts. A missing result (crash
    /// between the status transition and the result write) is re-derived
    /// from the stored answers; evaluation purity makes this safe.
    async fn existing_outcome(
        &self,
        attempt: &Attempt,
        quiz: &Quiz,
    ) -> AppResult<SubmissionOutcome> {
        if !attempt.is_terminal() {
            return Err(AppError::InternalError(format!(
                "attempt '{}' has no finalizing transition",
                attempt.id
            )));
        }

        if let Some(result) = self.results.find_by_attempt_id(&attempt.id).await? {
            return Ok(SubmissionOutcome::from_parts(attempt.status, &result));
        }

        log::warn!(
            "Result missing for finalized attempt '{}', re-deriving",
            attempt.id
        );
        let result = self.derive_result(attempt, quiz, self.clock.now())?;
        let stored = self.results.create_if_absent(result).await?;
        Ok(SubmissionOutcome::from_parts(attempt.status, &stored))
    }

    fn derive_result(
        &self,
        attempt: &Attempt,
        quiz: &Quiz,
        computed_at: DateTime<Utc>,
    ) -> AppResult<AttemptResult> {
        let evaluation = self.evaluator.evaluate(quiz, &attempt.answers)?;
        Ok(AttemptResult::new(
            &attempt.id,
            &quiz.id,
            &attempt.student_id,
            &attempt.student_name,
            evaluation.score,
            evaluation.maximum,
            &evaluation.performance_label,
            computed_at,
        ))
    }

    async fn quiz_by_code(&self, code: &str) -> AppResult<Quiz> {
        self.quizzes
            .find_by_code(code)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Quiz with code '{}' not found", code)))
    }

    async fn quiz_of(&self, attempt: &Attempt) -> AppResult<Quiz> {
        self.quizzes
            .find_by_id(&attempt.quiz_id)
            .await?
            .ok_or_else(|| {
                AppError::InternalError(format!(
                    "quiz '{}' referenced by attempt '{}' is missing",
                    attempt.quiz_id, attempt.id
                ))
            })
    }

    async fn attempt_by_id(&self, attempt_id: &str) -> AppResult<Attempt> {
        self.attempts
            .find_by_id(attempt_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Attempt '{}' not found", attempt_id)))
    }
}
