//! 示例模板 - 让用户了解输入文件的格式

use crate::error::{AppResult, FileError};
use crate::models::QuestionRecord;

/// 模板中的两道示例题
pub fn sample_records() -> Vec<QuestionRecord> {
    vec![
        QuestionRecord {
            id: 1,
            sub_category: "Basic Hardware".into(),
            category: "Technical".into(),
            name: "Which component stores the OS?".into(),
            description: "Identify where the OS is stored.".into(),
            option_a: "RAM".into(),
            option_b: "Hard Drive".into(),
            option_c: "GPU".into(),
            option_d: "Cache".into(),
            correct_answer: "B".into(),
            level: 1,
        },
        QuestionRecord {
            id: 2,
            sub_category: "Software".into(),
            category: "Technical".into(),
            name: "What is an example of OS?".into(),
            description: "Choose an example of an OS.".into(),
            option_a: "Chrome".into(),
            option_b: "Windows".into(),
            option_c: "Google Drive".into(),
            option_d: "CPU".into(),
            correct_answer: "B".into(),
            level: 1,
        },
    ]
}

/// 带表头的示例 CSV
pub fn sample_csv() -> AppResult<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for record in sample_records() {
        writer.serialize(record).map_err(FileError::serialize)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| FileError::serialize(e.into_error()))?;
    Ok(bytes)
}
