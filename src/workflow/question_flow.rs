//! 单题处理流程 - 流程层
//!
//! 流程顺序：搜索 → 生成 → 提取 → 判分
//!
//! 每一步都等上一步完成；外部调用失败直接返回错误，不重试。

use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::clients::{ChatModel, LlmClient, SearchClient, SearchProvider};
use crate::config::Config;
use crate::error::AppResult;
use crate::models::{AnswerLetter, GradeResult, QuestionRecord};
use crate::services::{grade, AnswerExtractor, AnswerGenerator};
use crate::utils::logging::truncate_text;
use crate::workflow::question_ctx::RowCtx;

/// 单题处理结果
#[derive(Debug, Clone, PartialEq)]
pub struct RowOutcome {
    pub result: GradeResult,
    /// 模型原始输出
    pub raw_response: String,
    /// 搜索上下文长度（字符数）
    pub context_chars: usize,
}

/// 单题处理流程
///
/// - 只依赖搜索能力与模型能力（通过 trait 注入）
/// - 不持有运行状态，报告由编排层累积
pub struct QuestionFlow<S, M> {
    search: S,
    generator: AnswerGenerator<M>,
    extractor: AnswerExtractor,
    search_limit: usize,
    row_delay: Duration,
    verbose_logging: bool,
}

impl QuestionFlow<SearchClient, LlmClient> {
    /// 使用真实的 DuckDuckGo 与 LLM 客户端
    pub fn from_config(config: &Config) -> AppResult<Self> {
        Self::new(SearchClient::new(config)?, LlmClient::new(config), config)
    }
}

impl<S: SearchProvider, M: ChatModel> QuestionFlow<S, M> {
    pub fn new(search: S, model: M, config: &Config) -> AppResult<Self> {
        Ok(Self {
            search,
            generator: AnswerGenerator::new(model),
            extractor: AnswerExtractor::new()?,
            search_limit: config.search_max_results,
            row_delay: Duration::from_millis(config.row_delay_ms),
            verbose_logging: config.verbose_logging,
        })
    }

    pub fn model_name(&self) -> &str {
        self.generator.model_name()
    }

    pub async fn run(&self, record: &QuestionRecord, ctx: &RowCtx) -> AppResult<RowOutcome> {
        let question = &record.description;

        // ========== 1. 搜索 ==========
        info!("{} 🔄 正在搜索: {}", ctx, truncate_text(question, 80));
        let context = self.search.search(question, self.search_limit).await?;
        if context.is_empty() {
            warn!("{} ⚠️ 搜索上下文为空", ctx);
        } else if self.verbose_logging {
            debug!("{} 搜索上下文: {}", ctx, truncate_text(&context, 300));
        }

        if !self.row_delay.is_zero() {
            sleep(self.row_delay).await;
        }

        // ========== 2. 生成 ==========
        info!("{} 🤖 正在生成 AI 答案...", ctx);
        let raw_response = self.generator.generate_for(record, &context).await?;
        if self.verbose_logging {
            debug!("{} 模型输出: {}", ctx, truncate_text(&raw_response, 300));
        }

        // ========== 3. 提取 + 判分 ==========
        let extracted = self.extractor.extract(&raw_response);
        if extracted.is_unknown() {
            warn!("{} ⚠️ 模型输出中没有 ANSWER 标记", ctx);
        }

        let correct_answer = record.normalized_answer();
        if AnswerLetter::parse(&correct_answer).is_none() {
            warn!("{} ⚠️ 标准答案 '{}' 无效，按错误计分", ctx, correct_answer);
        }
        let status = grade(extracted, &correct_answer);

        Ok(RowOutcome {
            result: GradeResult {
                question_id: record.id,
                question_text: question.clone(),
                correct_answer,
                extracted_answer: extracted,
                status,
            },
            raw_response,
            context_chars: context.chars().count(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExternalCallError;
    use crate::models::{ExtractedAnswer, GradeStatus};
    use crate::services::sample_records;
    use std::sync::Mutex;

    struct FixedSearch(&'static str);

    impl SearchProvider for FixedSearch {
        async fn search(&self, _query: &str, _limit: usize) -> AppResult<String> {
            Ok(self.0.to_string())
        }
    }

    struct FailingSearch;

    impl SearchProvider for FailingSearch {
        async fn search(&self, query: &str, _limit: usize) -> AppResult<String> {
            Err(ExternalCallError::SearchStatus {
                query: query.to_string(),
                status: 503,
            }
            .into())
        }
    }

    struct RecordingModel {
        reply: &'static str,
        prompts: Mutex<Vec<String>>,
    }

    impl RecordingModel {
        fn new(reply: &'static str) -> Self {
            Self {
                reply,
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    impl ChatModel for RecordingModel {
        fn model_name(&self) -> &str {
            "mock"
        }

        async fn complete(&self, prompt: &str) -> AppResult<String> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            Ok(self.reply.to_string())
        }
    }

    #[tokio::test]
    async fn test_flow_passes_search_context_into_prompt() {
        let flow = QuestionFlow::new(
            FixedSearch("The OS lives on the hard drive."),
            RecordingModel::new("ANSWER: B"),
            &Config::default(),
        )
        .unwrap();
        let record = &sample_records()[0];

        let outcome = flow.run(record, &RowCtx::new(1, 1, record.id)).await.unwrap();

        assert_eq!(outcome.result.extracted_answer, AnswerLetter::B.into());
        assert_eq!(outcome.result.status, GradeStatus::Correct);
        assert_eq!(outcome.result.question_text, "Identify where the OS is stored.");
        assert_eq!(outcome.context_chars, "The OS lives on the hard drive.".len());

        let prompts = flow.generator_prompts();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("Web Search Context: The OS lives on the hard drive."));
        assert!(prompts[0].contains("Question: Identify where the OS is stored."));
    }

    #[tokio::test]
    async fn test_flow_without_marker_is_unknown_and_incorrect() {
        let flow = QuestionFlow::new(
            FixedSearch(""),
            RecordingModel::new("I'm not sure."),
            &Config::default(),
        )
        .unwrap();
        let record = &sample_records()[1];

        let outcome = flow.run(record, &RowCtx::new(1, 1, record.id)).await.unwrap();

        assert_eq!(outcome.result.extracted_answer, ExtractedAnswer::Unknown);
        assert_eq!(outcome.result.status, GradeStatus::Incorrect);
        assert_eq!(outcome.raw_response, "I'm not sure.");
    }

    #[tokio::test]
    async fn test_search_failure_skips_generation() {
        let flow = QuestionFlow::new(
            FailingSearch,
            RecordingModel::new("ANSWER: B"),
            &Config::default(),
        )
        .unwrap();
        let record = &sample_records()[0];

        let err = flow.run(record, &RowCtx::new(1, 1, record.id)).await.unwrap_err();

        assert!(err.is_external());
        assert!(flow.generator_prompts().is_empty());
    }

    impl<S> QuestionFlow<S, RecordingModel> {
        fn generator_prompts(&self) -> Vec<String> {
            self.generator.model().prompts.lock().unwrap().clone()
        }
    }
}
