//! 判分 - 规范化后严格相等，没有部分得分

use crate::models::{AnswerLetter, ExtractedAnswer, GradeStatus};

/// `extracted` 与标准答案比较，标准答案会先去空白并转大写
///
/// 未知答案永远判错；标准答案不是单个 A-D 时也永远判错。
pub fn grade(extracted: ExtractedAnswer, correct: &str) -> GradeStatus {
    match (extracted.letter(), AnswerLetter::parse(correct)) {
        (Some(answer), Some(expected)) if answer == expected => GradeStatus::Correct,
        _ => GradeStatus::Incorrect,
    }
}
