pub mod answer_extractor;
pub mod answer_generator;
pub mod grader;
pub mod report_builder;
pub mod sample_template;

pub use answer_extractor::AnswerExtractor;
pub use answer_generator::AnswerGenerator;
pub use grader::grade;
pub use report_builder::{parse_report, ReportBuilder, ReportRow, REPORT_HEADER};
pub use sample_template::{sample_csv, sample_records};
