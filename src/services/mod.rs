pub mod attempt_service;
pub mod evaluator;
pub mod quiz_service;
pub mod report_service;
pub mod workbook;

pub use attempt_service::AttemptService;
pub use evaluator::{Evaluator, GradingBands};
pub use quiz_service::QuizService;
pub use report_service::ReportService;
