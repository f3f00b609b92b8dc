use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::domain::quiz::Quiz;

/// One student's single pass at one quiz. Created in `InProgress` the moment
/// the student opens the quiz; finalized exactly once, never deleted.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Attempt {
    pub id: String,
    pub quiz_id: String,
    pub student_id: String,
    pub student_name: String,
    pub attempt_number: i16,
    pub status: AttemptStatus,
    pub started_at: DateTime<Utc>,
    /// Snapshotted at start from the quiz's time budget; later quiz edits do
    /// not move it. None = untimed.
    pub deadline_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submitted_at: Option<DateTime<Utc>>,
    pub answers: Vec<AttemptAnswer>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct AttemptAnswer {
    pub question_id: String,
    pub selected_option_ids: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, Copy)]
pub enum AttemptStatus {
    InProgress,
    Submitted,
    Expired,
}

impl AttemptStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, AttemptStatus::Submitted | AttemptStatus::Expired)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AttemptStatus::InProgress => "InProgress",
            AttemptStatus::Submitted => "Submitted",
            AttemptStatus::Expired => "Expired",
        }
    }
}

impl Attempt {
    pub fn start(
        quiz: &Quiz,
        student_id: &str,
        student_name: &str,
        attempt_number: i16,
        now: DateTime<Utc>,
    ) -> Self {
        Attempt {
            id: Uuid::new_v4().to_string(),
            quiz_id: quiz.id.clone(),
            student_id: student_id.to_string(),
            student_name: student_name.to_string(),
            attempt_number,
            status: AttemptStatus::InProgress,
            started_at: now,
            deadline_at: quiz.time_limit_seconds.map(|s| now + Duration::seconds(s)),
            submitted_at: None,
            answers: Vec::new(),
            created_at: Some(now),
            modified_at: Some(now),
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// The deadline itself is on time; only strictly after it is late.
    pub fn is_past_deadline(&self, now: DateTime<Utc>) -> bool {
        match self.deadline_at {
            Some(deadline) => now > deadline,
            None => false,
        }
    }

    /// Lazy expiry view: an in-progress attempt past its deadline reads as
    /// `Expired` even before the finalizing write has happened.
    pub fn effective_status(&self, now: DateTime<Utc>) -> AttemptStatus {
        if self.status == AttemptStatus::InProgress && self.is_past_deadline(now) {
            AttemptStatus::Expired
        } else {
            self.status
        }
    }

    pub fn remaining_seconds(&self, now: DateTime<Utc>) -> Option<i64> {
        self.deadline_at
            .map(|deadline| (deadline - now).num_seconds().max(0))
    }
}
