use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::{
    errors::{AppError, AppResult},
    models::domain::AttemptResult,
    repositories::{QuizRepository, ResultRepository},
    services::workbook,
};

/// Row of an individual report: one finalized result for one student.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IndividualRow {
    pub quiz_title: String,
    pub attempt_date: DateTime<Utc>,
    pub score: i32,
    pub maximum: i32,
    pub status: String,
}

/// Row of a group report: one student's latest result for one quiz.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GroupRow {
    pub student_id: String,
    pub student_name: String,
    pub score: i32,
    pub maximum: i32,
    pub status: String,
}

/// One worksheet of a report card: a student's results across quizzes plus
/// an overall summary.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReportCardSheet {
    pub student_id: String,
    pub student_name: String,
    pub rows: Vec<IndividualRow>,
    pub total_score: i32,
    pub total_maximum: i32,
}

impl ReportCardSheet {
    pub fn overall_ratio(&self) -> f64 {
        if self.total_maximum == 0 {
            0.0
        } else {
            f64::from(self.total_score) / f64::from(self.total_maximum)
        }
    }
}

/// Reads finalized results and produces spreadsheet workbooks. Row building
/// is pure and fully ordered, so the same result set always yields the same
/// data content.
pub struct ReportService {
    results: Arc<dyn ResultRepository>,
    quizzes: Arc<dyn QuizRepository>,
}

impl ReportService {
    pub fn new(results: Arc<dyn ResultRepository>, quizzes: Arc<dyn QuizRepository>) -> Self {
        Self { results, quizzes }
    }

    /// All of one student's results across quizzes, one row per result.
    pub async fn individual_report(&self, student_id: &str) -> AppResult<Vec<u8>> {
        let results = self.results.find_by_student(student_id).await?;
        if results.is_empty() {
            return Err(AppError::EmptyDataset(format!(
                "no finalized results for student '{}'",
                student_id
            )));
        }

        let titles = self.quiz_titles(&results).await?;
        let rows = build_individual_rows(&results, &titles);
        let student_name = results[0].student_name.clone();

        workbook::render_individual(&student_name, &rows)
    }

    /// One quiz across its roster, one row per student, ordered by student
    /// id ascending.
    pub async fn group_report(&self, quiz_id: &str) -> AppResult<Vec<u8>> {
        let quiz = self
            .quizzes
            .find_by_id(quiz_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Quiz with id '{}' not found", quiz_id)))?;

        let results = self.results.find_by_quiz(quiz_id).await?;
        if results.is_empty() {
            return Err(AppError::EmptyDataset(format!(
                "no finalized results for quiz '{}'",
                quiz_id
            )));
        }

        let rows = build_group_rows(&results);
        workbook::render_group(&quiz.title, &rows)
    }

    /// Per-student aggregation across quizzes, one worksheet per student.
    pub async fn report_card(&self, student_ids: &[String]) -> AppResult<Vec<u8>> {
        if student_ids.is_empty() {
            return Err(AppError::ValidationError(
                "report card requires at least one student id".to_string(),
            ));
        }

        let results = self.results.find_by_students(student_ids).await?;
        if results.is_empty() {
            return Err(AppError::EmptyDataset(format!(
                "no finalized results for students {:?}",
                student_ids
            )));
        }

        let titles = self.quiz_titles(&results).await?;
        let sheets = build_report_card_sheets(&results, &titles);
        workbook::render_report_card(&sheets)
    }

    /// Live quiz titles for the quizzes the results reference; a deleted
    /// quiz falls back to its id.
    async fn quiz_titles(&self, results: &[AttemptResult]) -> AppResult<HashMap<String, String>> {
        let mut titles = HashMap::new();
        for result in results {
            if titles.contains_key(&result.quiz_id) {
                continue;
            }
            let title = self
                .quizzes
                .find_by_id(&result.quiz_id)
                .await?
                .map(|quiz| quiz.title)
                .unwrap_or_else(|| result.quiz_id.clone());
            titles.insert(result.quiz_id.clone(), title);
        }
        Ok(titles)
    }
}

pub fn build_individual_rows(
    results: &[AttemptResult],
    titles: &HashMap<String, String>,
) -> Vec<IndividualRow> {
    let mut rows: Vec<IndividualRow> = results
        .iter()
        .map(|r| IndividualRow {
            quiz_title: titles
                .get(&r.quiz_id)
                .cloned()
                .unwrap_or_else(|| r.quiz_id.clone()),
            attempt_date: r.computed_at,
            score: r.score,
            maximum: r.maximum,
            status: r.performance_label.clone(),
        })
        .collect();

    rows.sort_by(|a, b| {
        a.attempt_date
            .cmp(&b.attempt_date)
            .then_with(|| a.quiz_title.cmp(&b.quiz_title))
    });
    rows
}

pub fn build_group_rows(results: &[AttemptResult]) -> Vec<GroupRow> {
    let mut rows: Vec<GroupRow> = latest_per_key(results, |r| r.student_id.clone())
        .into_values()
        .map(|r| GroupRow {
            student_id: r.student_id.clone(),
            student_name: r.student_name.clone(),
            score: r.score,
            maximum: r.maximum,
            status: r.performance_label.clone(),
        })
        .collect();

    // Documented stable ordering key for reproducible exports
    rows.sort_by(|a, b| a.student_id.cmp(&b.student_id));
    rows
}

pub fn build_report_card_sheets(
    results: &[AttemptResult],
    titles: &HashMap<String, String>,
) -> Vec<ReportCardSheet> {
    let mut by_student: HashMap<String, Vec<&AttemptResult>> = HashMap::new();
    for result in results {
        by_student
            .entry(result.student_id.clone())
            .or_default()
            .push(result);
    }

    let mut student_ids: Vec<String> = by_student.keys().cloned().collect();
    student_ids.sort();

    student_ids
        .into_iter()
        .map(|student_id| {
            let student_results = &by_student[&student_id];

            // One row per quiz: the latest result wins
            let latest = latest_per_key(
                &student_results.iter().map(|r| (*r).clone()).collect::<Vec<_>>(),
                |r| r.quiz_id.clone(),
            );

            let mut rows: Vec<IndividualRow> = latest
                .into_values()
                .map(|r| IndividualRow {
                    quiz_title: titles
                        .get(&r.quiz_id)
                        .cloned()
                        .unwrap_or_else(|| r.quiz_id.clone()),
                    attempt_date: r.computed_at,
                    score: r.score,
                    maximum: r.maximum,
                    status: r.performance_label.clone(),
                })
                .collect();
            rows.sort_by(|a, b| a.quiz_title.cmp(&b.quiz_title));

            let total_score = rows.iter().map(|r| r.score).sum();
            let total_maximum = rows.iter().map(|r| r.maximum).sum();

            ReportCardSheet {
                student_name: student_results[0].student_name.clone(),
                student_id,
                rows,
                total_score,
                total_maximum,
            }
        })
        .collect()
}

/// Latest result per key, decided by `computed_at` with the result id as a
/// deterministic tie-break.
fn latest_per_key<K, F>(results: &[AttemptResult], key_of: F) -> HashMap<K, AttemptResult>
where
    K: std::hash::Hash + Eq,
    F: Fn(&AttemptResult) -> K,
{
    let mut latest: HashMap<K, AttemptResult> = HashMap::new();
    for result in results {
        let key = key_of(result);
        match latest.get(&key) {
            Some(existing)
                if (existing.computed_at, existing.id.as_str())
                    >= (result.computed_at, result.id.as_str()) => {}
            _ => {
                latest.insert(key, result.clone());
            }
        }
    }
    latest
}
