pub mod attempt_repository;
pub mod quiz_repository;
pub mod result_repository;

pub use attempt_repository::{AttemptRepository, MongoAttemptRepository};
pub use quiz_repository::{MongoQuizRepository, QuizRepository};
pub use result_repository::{MongoResultRepository, ResultRepository};
