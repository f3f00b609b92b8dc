use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mongodb::{
    bson::{doc, to_bson},
    options::{IndexOptions, ReturnDocument},
    Collection, IndexModel,
};

use crate::{
    db::Database,
    errors::{AppError, AppResult},
    models::domain::{Attempt, AttemptAnswer, AttemptStatus},
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AttemptRepository: Send + Sync {
    async fn create(&self, attempt: Attempt) -> AppResult<Attempt>;
    async fn find_by_id(&self, id: &str) -> AppResult<Option<Attempt>>;
    async fn find_in_progress(
        &self,
        quiz_id: &str,
        student_id: &str,
    ) -> AppResult<Option<Attempt>>;
    async fn count_finalized(&self, quiz_id: &str, student_id: &str) -> AppResult<usize>;
    /// Atomic check-and-set scoped to one attempt: succeeds only while the
    /// status is still `InProgress`. A lost race against the other finalizing
    /// transition surfaces as `AppError::AlreadySubmitted`.
    async fn finalize(
        &self,
        attempt_id: &str,
        new_status: AttemptStatus,
        answers: &[AttemptAnswer],
        submitted_at: DateTime<Utc>,
    ) -> AppResult<Attempt>;
}

pub struct MongoAttemptRepository {
    collection: Collection<Attempt>,
}

impl MongoAttemptRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("attempts");
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for attempts collection");

        let id_index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("id_unique".to_string())
                    .build(),
            )
            .build();

        let student_quiz_index = IndexModel::builder()
            .keys(doc! { "quiz_id": 1, "student_id": 1 })
            .options(
                IndexOptions::builder()
                    .name("quiz_student".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(id_index).await?;
        self.collection.create_index(student_quiz_index).await?;

        Ok(())
    }
}

#[async_trait]
impl AttemptRepository for MongoAttemptRepository {
    async fn create(&self, attempt: Attempt) -> AppResult<Attempt> {
        self.collection.insert_one(&attempt).await?;
        Ok(attempt)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Attempt>> {
        let attempt = self.collection.find_one(doc! { "id": id }).await?;
        Ok(attempt)
    }

    async fn find_in_progress(
        &self,
        quiz_id: &str,
        student_id: &str,
    ) -> AppResult<Option<Attempt>> {
        let attempt = self
            .collection
            .find_one(doc! {
                "quiz_id": quiz_id,
                "student_id": student_id,
                "status": AttemptStatus::InProgress.as_str(),
            })
            .await?;
        Ok(attempt)
    }

    async fn count_finalized(&self, quiz_id: &str, student_id: &str) -> AppResult<usize> {
        let count = self
            .collection
            .count_documents(doc! {
                "quiz_id": quiz_id,
                "student_id": student_id,
                "status": { "$ne": AttemptStatus::InProgress.as_str() },
            })
            .await?;
        Ok(count as usize)
    }

    async fn finalize(
        &self,
        attempt_id: &str,
        new_status: AttemptStatus,
        answers: &[AttemptAnswer],
        submitted_at: DateTime<Utc>,
    ) -> AppResult<Attempt> {
        let answers_bson = to_bson(answers)?;

        let updated = self
            .collection
            .find_one_and_update(
                doc! {
                    "id": attempt_id,
                    "status": AttemptStatus::InProgress.as_str(),
                },
                doc! {
                    "$set": {
                        "status": new_status.as_str(),
                        "answers": answers_bson,
                        "submitted_at": to_bson(&submitted_at)?,
                        "modified_at": to_bson(&submitted_at)?,
                    }
                },
            )
            .return_document(ReturnDocument::After)
            .await?;

        updated.ok_or_else(|| {
            AppError::AlreadySubmitted(format!("attempt '{}' is already finalized", attempt_id))
        })
    }
}
