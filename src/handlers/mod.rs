pub mod attempt_handler;
pub mod quiz_handler;
pub mod report_handler;

pub use attempt_handler::{expire_attempt, get_attempt, start_attempt, submit_attempt};
pub use quiz_handler::{create_quiz, get_quiz_by_code, health_check};
pub use report_handler::{group_report, individual_report, report_card};
