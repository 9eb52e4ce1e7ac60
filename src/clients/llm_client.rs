/// LLM API 客户端
///
/// 封装所有与 LLM API 相关的调用逻辑，兼容 OpenAI 接口的服务（Ollama、vLLM 等）
use std::future::Future;

use async_openai::{
    config::OpenAIConfig,
    types::chat::{ChatCompletionRequestMessage, ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs},
    Client,
};
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{AppResult, ExternalCallError};

/// 对话模型能力：提示词进，原始文本出
pub trait ChatModel {
    fn model_name(&self) -> &str;

    fn complete(&self, prompt: &str) -> impl Future<Output = AppResult<String>> + Send;
}

/// LLM 客户端
pub struct LlmClient {
    client: Client<OpenAIConfig>,
    model_name: String,
    temperature: f32,
}

impl LlmClient {
    /// 创建新的 LLM 客户端
    pub fn new(config: &Config) -> Self {
        let openai_config = OpenAIConfig::new()
            .with_api_key(&config.llm_api_key)
            .with_api_base(&config.llm_api_base_url);

        Self {
            client: Client::with_config(openai_config),
            model_name: config.llm_model_name.clone(),
            temperature: config.llm_temperature,
        }
    }
}

impl ChatModel for LlmClient {
    fn model_name(&self) -> &str {
        &self.model_name
    }

    async fn complete(&self, prompt: &str) -> AppResult<String> {
        debug!("调用 LLM API，模型: {}", self.model_name);
        debug!("提示词长度: {} 字符", prompt.len());

        let user_msg = ChatCompletionRequestUserMessageArgs::default()
            .content(prompt)
            .build()
            .map_err(|e| ExternalCallError::llm_failed(&self.model_name, e))?;

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model_name)
            .messages(vec![ChatCompletionRequestMessage::User(user_msg)])
            .temperature(self.temperature)
            .build()
            .map_err(|e| ExternalCallError::llm_failed(&self.model_name, e))?;

        let response = self.client.chat().create(request).await.map_err(|e| {
            warn!("LLM API 调用失败: {}", e);
            ExternalCallError::llm_failed(&self.model_name, e)
        })?;

        debug!("LLM API 调用成功");

        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or_else(|| ExternalCallError::EmptyResponse {
                model: self.model_name.clone(),
            })?;

        Ok(content.trim().to_string())
    }
}
