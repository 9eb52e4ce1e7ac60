use std::path::Path;

use tokio::fs;
use tracing::{debug, info, warn};

use crate::error::{AppResult, FileError, ParseError};
use crate::models::question::{AnswerLetter, QuestionRecord};

/// 上传文件必须包含的列
pub const REQUIRED_COLUMNS: [&str; 11] = [
    "id",
    "sub_category",
    "category",
    "question_name",
    "question_description",
    "A",
    "B",
    "C",
    "D",
    "Answer",
    "Level",
];

/// 从 CSV 字节流解析题目列表，保持输入顺序
///
/// 缺列、非法 CSV 或任意一行无法解析都会让整个加载失败，不做部分恢复。
/// `Answer` 列不做校验，非 A-D 的值只记录警告。
pub fn load_questions(input: &[u8]) -> AppResult<Vec<QuestionRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(input);

    let headers = reader
        .headers()
        .map_err(|source| ParseError::InvalidCsv { source })?
        .clone();
    debug!("CSV 表头: {:?}", headers);

    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|column| !headers.iter().any(|h| h == **column))
        .map(|column| column.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(ParseError::MissingColumns { missing }.into());
    }

    let mut records = Vec::new();
    for (index, row) in reader.deserialize::<QuestionRecord>().enumerate() {
        let record = row.map_err(|source| ParseError::InvalidRow {
            row: index + 1,
            source,
        })?;

        if AnswerLetter::parse(&record.correct_answer).is_none() {
            warn!(
                "题目 {} 的标准答案 '{}' 不是 A-D，将按错误计分",
                record.id, record.correct_answer
            );
        }
        records.push(record);
    }

    info!("✓ 从 CSV 中解析出 {} 道题目", records.len());
    Ok(records)
}

/// 读取输入文件的原始字节，交给 [`load_questions`] 解析
pub async fn read_input(path: &Path) -> AppResult<Vec<u8>> {
    let content = fs::read(path).await.map_err(|source| FileError::ReadFailed {
        path: path.display().to_string(),
        source,
    })?;
    debug!("读取 {} 字节: {}", content.len(), path.display());
    Ok(content)
}
