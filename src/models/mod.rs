pub mod grade;
pub mod loaders;
pub mod question;

pub use grade::{GradeResult, GradeStatus, RunSummary};
pub use loaders::{load_questions, read_input, REQUIRED_COLUMNS};
pub use question::{AnswerLetter, ExtractedAnswer, QuestionRecord};
