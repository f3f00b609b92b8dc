use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Finalized grading outcome for one attempt. Immutable once written; a
/// re-grade creates a superseding record instead of mutating in place.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct AttemptResult {
    pub id: String,
    pub attempt_id: String,
    // Denormalized for report queries
    pub quiz_id: String,
    pub student_id: String,
    pub student_name: String,
    pub score: i32,
    pub maximum: i32,
    pub performance_label: String,
    pub computed_at: DateTime<Utc>,
    #[serde(default)]
    pub superseded: bool,
}

impl AttemptResult {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        attempt_id: &str,
        quiz_id: &str,
        student_id: &str,
        student_name: &str,
        score: i32,
        maximum: i32,
        performance_label: &str,
        computed_at: DateTime<Utc>,
    ) -> Self {
        AttemptResult {
            id: Uuid::new_v4().to_string(),
            attempt_id: attempt_id.to_string(),
            quiz_id: quiz_id.to_string(),
            student_id: student_id.to_string(),
            student_name: student_name.to_string(),
            score,
            maximum,
            performance_label: performance_label.to_string(),
            computed_at,
            superseded: false,
        }
    }

    pub fn ratio(&self) -> f64 {
        if self.maximum == 0 {
            0.0
        } else {
            f64::from(self.score) / f64::from(self.maximum)
        }
    }
}
