use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::doc,
    error::{ErrorKind, WriteFailure},
    options::IndexOptions,
    Collection, IndexModel,
};

use crate::{
    db::Database,
    errors::{AppError, AppResult},
    models::domain::AttemptResult,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ResultRepository: Send + Sync {
    /// Put-if-absent keyed by attempt id: at most one non-superseded result
    /// per attempt. Returns the stored record; an existing one wins.
    async fn create_if_absent(&self, result: AttemptResult) -> AppResult<AttemptResult>;
    async fn find_by_attempt_id(&self, attempt_id: &str) -> AppResult<Option<AttemptResult>>;
    async fn find_by_student(&self, student_id: &str) -> AppResult<Vec<AttemptResult>>;
    async fn find_by_quiz(&self, quiz_id: &str) -> AppResult<Vec<AttemptResult>>;
    async fn find_by_students(&self, student_ids: &[String]) -> AppResult<Vec<AttemptResult>>;
}

pub struct MongoResultRepository {
    collection: Collection<AttemptResult>,
}

impl MongoResultRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("results");
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for results collection");

        let attempt_index = IndexModel::builder()
            .keys(doc! { "attempt_id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("attempt_unique".to_string())
                    .build(),
            )
            .build();

        let student_index = IndexModel::builder()
            .keys(doc! { "student_id": 1 })
            .options(
                IndexOptions::builder()
                    .name("student_id".to_string())
                    .build(),
            )
            .build();

        let quiz_index = IndexModel::builder()
            .keys(doc! { "quiz_id": 1 })
            .options(IndexOptions::builder().name("quiz_id".to_string()).build())
            .build();

        self.collection.create_index(attempt_index).await?;
        self.collection.create_index(student_index).await?;
        self.collection.create_index(quiz_index).await?;

        Ok(())
    }
}

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(write_error)) => write_error.code == 11000,
        _ => false,
    }
}

#[async_trait]
impl ResultRepository for MongoResultRepository {
    async fn create_if_absent(&self, result: AttemptResult) -> AppResult<AttemptResult> {
        match self.collection.insert_one(&result).await {
            Ok(_) => Ok(result),
            Err(err) if is_duplicate_key(&err) => self
                .find_by_attempt_id(&result.attempt_id)
                .await?
                .ok_or_else(|| {
                    AppError::DatabaseError(format!(
                        "Result for attempt '{}' vanished after duplicate-key conflict",
                        result.attempt_id
                    ))
                }),
            Err(err) => Err(err.into()),
        }
    }

    async fn find_by_attempt_id(&self, attempt_id: &str) -> AppResult<Option<AttemptResult>> {
        let result = self
            .collection
            .find_one(doc! { "attempt_id": attempt_id, "superseded": false })
            .await?;
        Ok(result)
    }

    // No server-side ordering below: `computed_at` is stored as an RFC 3339
    // string, which does not sort chronologically. The report row builders
    // order results in memory.

    async fn find_by_student(&self, student_id: &str) -> AppResult<Vec<AttemptResult>> {
        let results = self
            .collection
            .find(doc! { "student_id": student_id, "superseded": false })
            .await?
            .try_collect()
            .await?;
        Ok(results)
    }

    async fn find_by_quiz(&self, quiz_id: &str) -> AppResult<Vec<AttemptResult>> {
        let results = self
            .collection
            .find(doc! { "quiz_id": quiz_id, "superseded": false })
            .await?
            .try_collect()
            .await?;
        Ok(results)
    }

    async fn find_by_students(&self, student_ids: &[String]) -> AppResult<Vec<AttemptResult>> {
        let results = self
            .collection
            .find(doc! {
                "student_id": { "$in": student_ids },
                "superseded": false,
            })
            .await?
            .try_collect()
            .await?;
        Ok(results)
    }
}
