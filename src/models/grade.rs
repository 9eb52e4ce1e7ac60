use std::fmt;

use super::question::ExtractedAnswer;

/// 判分结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GradeStatus {
    Correct,
    Incorrect,
}

impl GradeStatus {
    /// 报告中使用的固定标记
    pub fn marker(self) -> &'static str {
        match self {
            GradeStatus::Correct => "✅ Correct",
            GradeStatus::Incorrect => "❌ Incorrect",
        }
    }

    pub fn is_correct(self) -> bool {
        matches!(self, GradeStatus::Correct)
    }
}

impl fmt::Display for GradeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.marker())
    }
}

/// 单道题的判分记录，对应报告中的一行
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradeResult {
    pub question_id: i64,
    pub question_text: String,
    /// 规范化后的标准答案
    pub correct_answer: String,
    pub extracted_answer: ExtractedAnswer,
    pub status: GradeStatus,
}

/// 一次运行的统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub total: usize,
    pub correct: usize,
    pub incorrect: usize,
    /// 其中未能提取答案的数量（已计入 incorrect）
    pub unknown: usize,
}

impl RunSummary {
    pub fn from_results<'a>(results: impl IntoIterator<Item = &'a GradeResult>) -> Self {
        results
            .into_iter()
            .fold(RunSummary::default(), |mut summary, result| {
                summary.total += 1;
                if result.status.is_correct() {
                    summary.correct += 1;
                } else {
                    summary.incorrect += 1;
                }
                if result.extracted_answer.is_unknown() {
                    summary.unknown += 1;
                }
                summary
            })
    }

    /// 正确率，空报告返回 0
    pub fn accuracy(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.correct as f64 / self.total as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::question::AnswerLetter;

    fn result(status: GradeStatus, answer: ExtractedAnswer) -> GradeResult {
        GradeResult {
            question_id: 1,
            question_text: "q".into(),
            correct_answer: "A".into(),
            extracted_answer: answer,
            status,
        }
    }

    #[test]
    fn test_summary_counts() {
        let results = vec![
            result(GradeStatus::Correct, AnswerLetter::A.into()),
            result(GradeStatus::Incorrect, AnswerLetter::B.into()),
            result(GradeStatus::Incorrect, ExtractedAnswer::Unknown),
        ];
        let summary = RunSummary::from_results(&results);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.correct, 1);
        assert_eq!(summary.incorrect, 2);
        assert_eq!(summary.unknown, 1);
        assert!((summary.accuracy() - 1.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_summary_accuracy_is_zero() {
        assert_eq!(RunSummary::default().accuracy(), 0.0);
    }

    #[test]
    fn test_status_markers() {
        assert_eq!(GradeStatus::Correct.to_string(), "✅ Correct");
        assert_eq!(GradeStatus::Incorrect.to_string(), "❌ Incorrect");
    }
}
