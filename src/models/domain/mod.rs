pub mod attempt;
pub mod question;
pub mod quiz;
pub mod result;

pub use attempt::{Attempt, AttemptAnswer, AttemptStatus};
pub use question::{Question, QuestionOption, QuestionType};
pub use quiz::Quiz;
pub use result::AttemptResult;
