//! 答案提取服务 - 业务能力层
//!
//! 自由文本与类型化答案之间唯一的解析边界

use regex::Regex;
use tracing::debug;

use crate::error::{AppResult, ConfigError};
use crate::models::{AnswerLetter, ExtractedAnswer};

const ANSWER_PATTERN: &str = r"ANSWER:\s*([ABCD])";

/// 答案提取服务
pub struct AnswerExtractor {
    pattern: Regex,
}

impl AnswerExtractor {
    pub fn new() -> AppResult<Self> {
        let pattern = Regex::new(ANSWER_PATTERN).map_err(|e| ConfigError::InvalidValue {
            key: "answer_pattern".to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self { pattern })
    }

    /// 在整段文本中查找 `ANSWER: X`，大小写不敏感，取第一个匹配
    pub fn extract(&self, raw: &str) -> ExtractedAnswer {
        let normalized = raw.to_uppercase();

        let answer = self
            .pattern
            .captures(&normalized)
            .and_then(|cap| cap.get(1))
            .and_then(|m| AnswerLetter::parse(m.as_str()))
            .map(ExtractedAnswer::Letter)
            .unwrap_or(ExtractedAnswer::Unknown);

        debug!("提取答案: {}", answer);
        answer
    }
}
