use std::sync::Arc;

use crate::{
    clock::{Clock, SystemClock},
    config::Config,
    db::Database,
    errors::AppResult,
    repositories::{MongoAttemptRepository, MongoQuizRepository, MongoResultRepository},
    services::{AttemptService, Evaluator, QuizService, ReportService},
};

#[derive(Clone)]
pub struct AppState {
    pub quiz_service: Arc<QuizService>,
    pub attempt_service: Arc<AttemptService>,
    pub report_service: Arc<ReportService>,
    pub clock: Arc<dyn Clock>,
    pub config: Arc<Config>,
}

impl AppState {
    pub async fn new(config: Config) -> AppResult<Self> {
        let db = Database::connect(&config).await?;

        let quiz_repository = Arc::new(MongoQuizRepository::new(&db));
        quiz_repository.ensure_indexes().await?;

        let attempt_repository = Arc::new(MongoAttemptRepository::new(&db));
        attempt_repository.ensure_indexes().await?;

        let result_repository = Arc::new(MongoResultRepository::new(&db));
        result_repository.ensure_indexes().await?;

        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let evaluator = Evaluator::new(config.grading_bands.clone());

        let quiz_service = Arc::new(QuizService::new(quiz_repository.clone()));
        let attempt_service = Arc::new(AttemptService::new(
            quiz_repository.clone(),
            attempt_repository,
            result_repository.clone(),
            evaluator,
            clock.clone(),
        ));
        let report_service = Arc::new(ReportService::new(result_repository, quiz_repository));

        Ok(Self {
            quiz_service,
            attempt_service,
            report_service,
            clock,
            config: Arc::new(config),
        })
    }
}
