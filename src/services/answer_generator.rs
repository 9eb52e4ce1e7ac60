//! 答案生成服务 - 业务能力层
//!
//! 把题目、四个选项和搜索上下文原样填入固定模板，交给模型，返回原始文本。
//! 不检查输出格式，格式解析由 `AnswerExtractor` 负责。

use tracing::debug;

use crate::clients::ChatModel;
use crate::error::AppResult;
use crate::models::QuestionRecord;

/// 答案生成服务
pub struct AnswerGenerator<M> {
    model: M,
}

impl<M: ChatModel> AnswerGenerator<M> {
    pub fn new(model: M) -> Self {
        Self { model }
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn model_name(&self) -> &str {
        self.model.model_name()
    }

    /// 生成原始回答
    pub async fn generate(
        &self,
        question: &str,
        option_a: &str,
        option_b: &str,
        option_c: &str,
        option_d: &str,
        context: &str,
    ) -> AppResult<String> {
        let prompt = build_prompt(question, option_a, option_b, option_c, option_d, context);
        debug!("提示词:\n{}", prompt);
        self.model.complete(&prompt).await
    }

    /// 以题目记录为输入，题干使用 `question_description`
    pub async fn generate_for(&self, record: &QuestionRecord, context: &str) -> AppResult<String> {
        self.generate(
            &record.description,
            &record.option_a,
            &record.option_b,
            &record.option_c,
            &record.option_d,
            context,
        )
        .await
    }
}

/// 填充提示词模板
pub fn build_prompt(
    question: &str,
    option_a: &str,
    option_b: &str,
    option_c: &str,
    option_d: &str,
    context: &str,
) -> String {
    format!(
        r#"You are an AI assistant that answers multiple-choice questions accurately and concisely, using the web search results below.
Question: {question}
Options:
A) {option_a}
B) {option_b}
C) {option_c}
D) {option_d}
Web Search Context: {context}

Give the correct option in exactly this format:
ANSWER: X"#
    )
}
