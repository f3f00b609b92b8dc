use std::collections::{HashMap, HashSet};

use crate::errors::{AppError, AppResult};
use crate::models::domain::question::{Question, QuestionType};
use crate::models::domain::{AttemptAnswer, Quiz};

/// Performance classification bands, ordered by `min_ratio` descending.
/// The first band whose bound the score ratio satisfies wins. Institutions
/// tune these via the `GRADING_BANDS` configuration; nothing is hard-coded.
#[derive(Clone, Debug, PartialEq)]
pub struct GradingBands {
    bands: Vec<GradingBand>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GradingBand {
    pub min_ratio: f64,
    pub label: String,
}

impl GradingBands {
    pub fn new(bands: Vec<(f64, &str)>) -> AppResult<Self> {
        if bands.is_empty() {
            return Err(AppError::ValidationError(
                "grading bands must not be empty".to_string(),
            ));
        }

        let mut bands: Vec<GradingBand> = bands
            .into_iter()
            .map(|(min_ratio, label)| GradingBand {
                min_ratio,
                label: label.to_string(),
            })
            .collect();

        for band in &bands {
            if !(0.0..=1.0).contains(&band.min_ratio) {
                return Err(AppError::ValidationError(format!(
                    "band threshold {} is outside [0, 1]",
                    band.min_ratio
                )));
            }
            if band.label.trim().is_empty() {
                return Err(AppError::ValidationError(
                    "band label must not be empty".to_string(),
                ));
            }
        }

        bands.sort_by(|a, b| b.min_ratio.total_cmp(&a.min_ratio));

        if bands.windows(2).any(|w| w[0].min_ratio == w[1].min_ratio) {
            return Err(AppError::ValidationError(
                "duplicate band threshold".to_string(),
            ));
        }

        // A 0.0 catch-all guarantees every ratio classifies.
        if bands.last().map(|b| b.min_ratio) != Some(0.0) {
            return Err(AppError::ValidationError(
                "grading bands must include a 0.0 catch-all".to_string(),
            ));
        }

        Ok(Self { bands })
    }

    /// Parses `"0.8:Pass,0.5:Needs Improvement,0.0:Fail"`.
    pub fn from_spec(spec: &str) -> AppResult<Self> {
        let mut pairs = Vec::new();
        for entry in spec.split(',') {
            let entry = entry.trim();
            if entry.is_empty() {
                continue;
            }
            let (ratio, label) = entry.split_once(':').ok_or_else(|| {
                AppError::ValidationError(format!("band entry '{}' is not ratio:label", entry))
            })?;
            let ratio: f64 = ratio.trim().parse().map_err(|_| {
                AppError::ValidationError(format!("band threshold '{}' is not a number", ratio))
            })?;
            pairs.push((ratio, label.trim()));
        }
        Self::new(pairs)
    }

    pub fn classify(&self, ratio: f64) -> &str {
        self.bands
            .iter()
            .find(|band| ratio >= band.min_ratio)
            .map(|band| band.label.as_str())
            // unreachable given the 0.0 catch-all, but never panic on a grade
            .unwrap_or("Unclassified")
    }

    pub fn is_empty(&self) -> bool {
        self.bands.is_empty()
    }
}

impl Default for GradingBands {
    fn default() -> Self {
        Self::new(vec![(0.8, "Pass"), (0.5, "Needs Improvement"), (0.0, "Fail")])
            .expect("default bands are valid")
    }
}

/// Deterministic grading outcome; timestamps are attached by the caller.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Evaluation {
    pub score: i32,
    pub maximum: i32,
    pub performance_label: String,
}

pub struct Evaluator {
    bands: GradingBands,
}

impl Evaluator {
    pub fn new(bands: GradingBands) -> Self {
        Self { bands }
    }

    /// Rejects answer payloads that reference questions outside the quiz or
    /// answer the same question twice. Called before any finalizing write so
    /// a rejected submission leaves the attempt untouched.
    pub fn validate_answer_scope(quiz: &Quiz, answers: &[AttemptAnswer]) -> AppResult<()> {
        let mut seen = HashSet::new();
        for answer in answers {
            if quiz.question(&answer.question_id).is_none() {
                return Err(AppError::InvalidAnswerScope(format!(
                    "question '{}' does not belong to quiz '{}'",
                    answer.question_id, quiz.id
                )));
            }
            if !seen.insert(answer.question_id.as_str()) {
                return Err(AppError::ValidationError(format!(
                    "question '{}' answered more than once",
                    answer.question_id
                )));
            }
        }
        Ok(())
    }

    /// Pure scoring: identical inputs always yield an identical evaluation,
    /// which is what makes crash recovery by re-derivation safe.
    pub fn evaluate(&self, quiz: &Quiz, answers: &[AttemptAnswer]) -> AppResult<Evaluation> {
        Self::validate_answer_scope(quiz, answers)?;

        let answered: HashMap<&str, &AttemptAnswer> = answers
            .iter()
            .map(|a| (a.question_id.as_str(), a))
            .collect();

        // Weights are per-question i16; totals accumulate widened so even
        // absurd weight sums cannot overflow
        let mut score: i32 = 0;
        let mut maximum: i32 = 0;

        for question in &quiz.questions {
            maximum += i32::from(question.weight);

            // Unanswered questions score zero, they are not an error
            let Some(answer) = answered.get(question.id.as_str()) else {
                continue;
            };

            if Self::grade_question(question, &answer.selected_option_ids)? {
                score += i32::from(question.weight);
            }
        }

        let ratio = if maximum == 0 {
            0.0
        } else {
            f64::from(score) / f64::from(maximum)
        };

        Ok(Evaluation {
            score,
            maximum,
            performance_label: self.bands.classify(ratio).to_string(),
        })
    }

    /// Binary per question: full weight or zero, no partial credit.
    fn grade_question(question: &Question, selected_option_ids: &[String]) -> AppResult<bool> {
        let correct_option_ids = question.correct_option_ids();

        let is_correct = match question.question_type {
            QuestionType::Single | QuestionType::Bool => {
                // Correct if exactly one option selected AND it's correct
                selected_option_ids.len() == 1
                    && !correct_option_ids.is_empty()
                    && selected_option_ids[0] == correct_option_ids[0]
            }
            QuestionType::Multi => {
                // Set equality: all correct options selected, zero incorrect
                if correct_option_ids.is_empty() {
                    return Err(AppError::ValidationError(format!(
                        "multi-choice question '{}' has no correct options",
                        question.id
                    )));
                }

                let selected: HashSet<&str> =
                    selected_option_ids.iter().map(String::as_str).collect();
                let correct: HashSet<&str> = correct_option_ids.iter().copied().collect();
                selected == correct
            }
        };

        Ok(is_correct)
    }
}
