//! 报告构建服务 - 业务能力层
//!
//! 按输入顺序累积判分结果，并序列化为可下载的 CSV

use serde::Deserialize;

use crate::error::{AppError, AppResult, FileError, ParseError};
use crate::models::{GradeResult, RunSummary};

/// 报告表头
pub const REPORT_HEADER: [&str; 5] = ["ID", "Question", "Correct Answer", "AI Answer", "Status"];

/// 报告构建器
#[derive(Debug, Default, Clone)]
pub struct ReportBuilder {
    results: Vec<GradeResult>,
}

impl ReportBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加一行，保持顺序
    pub fn append(&mut self, result: GradeResult) {
        self.results.push(result);
    }

    pub fn results(&self) -> &[GradeResult] {
        &self.results
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary::from_results(&self.results)
    }

    /// 清空，开始新一次运行
    pub fn clear(&mut self) {
        self.results.clear();
    }

    /// 序列化当前累积的全部结果
    ///
    /// 不修改内部状态，两次调用之间没有 `append` 时输出字节完全相同。
    pub fn finalize(&self) -> AppResult<Vec<u8>> {
        let mut writer = csv::Writer::from_writer(Vec::new());

        writer
            .write_record(REPORT_HEADER)
            .map_err(FileError::serialize)?;

        for result in &self.results {
            writer
                .write_record([
                    result.question_id.to_string().as_str(),
                    result.question_text.as_str(),
                    result.correct_answer.as_str(),
                    result.extracted_answer.as_str(),
                    result.status.marker(),
                ])
                .map_err(FileError::serialize)?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| FileError::serialize(e.into_error()))?;
        Ok(bytes)
    }
}

/// 报告中的一行（读回时使用）
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReportRow {
    #[serde(rename = "ID")]
    pub id: i64,
    #[serde(rename = "Question")]
    pub question: String,
    #[serde(rename = "Correct Answer")]
    pub correct_answer: String,
    #[serde(rename = "AI Answer")]
    pub ai_answer: String,
    #[serde(rename = "Status")]
    pub status: String,
}

/// 读回报告 CSV
pub fn parse_report(bytes: &[u8]) -> AppResult<Vec<ReportRow>> {
    let mut reader = csv::Reader::from_reader(bytes);
    reader
        .deserialize::<ReportRow>()
        .enumerate()
        .map(|(index, row)| {
            row.map_err(|source| {
                AppError::from(ParseError::InvalidRow {
                    row: index + 1,
                    source,
                })
            })
        })
        .collect()
}
