pub mod question_ctx;
pub mod question_flow;

pub use question_ctx::RowCtx;
pub use question_flow::{QuestionFlow, RowOutcome};
