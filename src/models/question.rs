use serde::{Deserialize, Serialize};
use std::fmt;

/// 输入 CSV 中的一道选择题
///
/// 字段名与上传文件的列名一一对应，加载后不再修改。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionRecord {
    pub id: i64,
    pub sub_category: String,
    pub category: String,
    #[serde(rename = "question_name")]
    pub name: String,
    #[serde(rename = "question_description")]
    pub description: String,
    #[serde(rename = "A")]
    pub option_a: String,
    #[serde(rename = "B")]
    pub option_b: String,
    #[serde(rename = "C")]
    pub option_c: String,
    #[serde(rename = "D")]
    pub option_d: String,
    /// 标准答案，未做校验
    #[serde(rename = "Answer")]
    pub correct_answer: String,
    #[serde(rename = "Level")]
    pub level: i64,
}

impl QuestionRecord {
    /// 规范化后的标准答案（去空白 + 大写）
    pub fn normalized_answer(&self) -> String {
        normalize(&self.correct_answer)
    }

    /// 按 A..D 顺序返回四个选项
    pub fn options(&self) -> [(AnswerLetter, &str); 4] {
        [
            (AnswerLetter::A, self.option_a.as_str()),
            (AnswerLetter::B, self.option_b.as_str()),
            (AnswerLetter::C, self.option_c.as_str()),
            (AnswerLetter::D, self.option_d.as_str()),
        ]
    }
}

/// 去空白并转大写
pub fn normalize(value: &str) -> String {
    value.trim().to_uppercase()
}

/// 选项字母
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnswerLetter {
    A,
    B,
    C,
    D,
}

impl AnswerLetter {
    pub fn as_str(self) -> &'static str {
        match self {
            AnswerLetter::A => "A",
            AnswerLetter::B => "B",
            AnswerLetter::C => "C",
            AnswerLetter::D => "D",
        }
    }

    /// 规范化后解析，只接受单个 A-D
    pub fn parse(value: &str) -> Option<Self> {
        match normalize(value).as_str() {
            "A" => Some(AnswerLetter::A),
            "B" => Some(AnswerLetter::B),
            "C" => Some(AnswerLetter::C),
            "D" => Some(AnswerLetter::D),
            _ => None,
        }
    }
}

impl fmt::Display for AnswerLetter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 从模型输出中提取的答案
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractedAnswer {
    Letter(AnswerLetter),
    /// 输出中没有 `ANSWER: X` 标记
    Unknown,
}

impl ExtractedAnswer {
    /// 报告与界面中的显示文本，未知答案显示为 `?`
    pub fn as_str(self) -> &'static str {
        match self {
            ExtractedAnswer::Letter(letter) => letter.as_str(),
            ExtractedAnswer::Unknown => "?",
        }
    }

    pub fn letter(self) -> Option<AnswerLetter> {
        match self {
            ExtractedAnswer::Letter(letter) => Some(letter),
            ExtractedAnswer::Unknown => None,
        }
    }

    pub fn is_unknown(self) -> bool {
        matches!(self, ExtractedAnswer::Unknown)
    }
}

impl From<AnswerLetter> for ExtractedAnswer {
    fn from(letter: AnswerLetter) -> Self {
        ExtractedAnswer::Letter(letter)
    }
}

impl fmt::Display for ExtractedAnswer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
