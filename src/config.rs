use serde::Deserialize;
use tracing::info;

use crate::error::{AppResult, ConfigError};

/// 指定 TOML 配置文件路径的环境变量
pub const CONFIG_PATH_ENV: &str = "VALIDATOR_CONFIG";

/// 程序配置
#[derive(Clone, Debug)]
pub struct Config {
    // --- LLM 配置 ---
    pub llm_api_key: String,
    pub llm_api_base_url: String,
    pub llm_model_name: String,
    /// 采样温度，进程启动后固定
    pub llm_temperature: f32,
    // --- 搜索配置 ---
    pub search_base_url: String,
    /// 每道题取多少条搜索结果
    pub search_max_results: usize,
    /// HTTP 请求超时（秒）
    pub request_timeout_secs: u64,
    /// 搜索与生成之间的间隔（毫秒），0 表示不等待
    pub row_delay_ms: u64,
    // --- 输出 ---
    pub report_file: String,
    pub sample_file: String,
    pub output_log_file: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            llm_api_key: "ollama".to_string(),
            llm_api_base_url: "http://localhost:11434/v1".to_string(),
            llm_model_name: "llama3.2:3b".to_string(),
            llm_temperature: 0.7,
            search_base_url: "https://html.duckduckgo.com/html/".to_string(),
            search_max_results: 5,
            request_timeout_secs: 60,
            row_delay_ms: 0,
            report_file: "question_validation_report.csv".to_string(),
            sample_file: "sample_questions.csv".to_string(),
            output_log_file: "validation_log.txt".to_string(),
            verbose_logging: false,
        }
    }
}

/// TOML 配置文件，所有字段可选
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    llm_api_key: Option<String>,
    llm_api_base_url: Option<String>,
    llm_model_name: Option<String>,
    llm_temperature: Option<f32>,
    search_base_url: Option<String>,
    search_max_results: Option<usize>,
    request_timeout_secs: Option<u64>,
    row_delay_ms: Option<u64>,
    report_file: Option<String>,
    sample_file: Option<String>,
    output_log_file: Option<String>,
    verbose_logging: Option<bool>,
}

impl Config {
    /// 默认值 → TOML 文件（`VALIDATOR_CONFIG`，可选）→ 环境变量
    pub fn load() -> AppResult<Self> {
        let mut config = Self::default();

        if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            let content = std::fs::read_to_string(&path).map_err(|source| {
                ConfigError::ReadFailed {
                    path: path.clone(),
                    source,
                }
            })?;
            config = config.overlay_toml(&content, &path)?;
            info!(%path, "已加载配置文件");
        }

        let config = config.overlay_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// 用 TOML 文本覆盖当前配置
    pub fn overlay_toml(self, content: &str, path: &str) -> AppResult<Self> {
        let file: ConfigFile =
            toml::from_str(content).map_err(|source| ConfigError::TomlParseFailed {
                path: path.to_string(),
                source,
            })?;

        Ok(Self {
            llm_api_key: file.llm_api_key.unwrap_or(self.llm_api_key),
            llm_api_base_url: file.llm_api_base_url.unwrap_or(self.llm_api_base_url),
            llm_model_name: file.llm_model_name.unwrap_or(self.llm_model_name),
            llm_temperature: file.llm_temperature.unwrap_or(self.llm_temperature),
            search_base_url: file.search_base_url.unwrap_or(self.search_base_url),
            search_max_results: file.search_max_results.unwrap_or(self.search_max_results),
            request_timeout_secs: file.request_timeout_secs.unwrap_or(self.request_timeout_secs),
            row_delay_ms: file.row_delay_ms.unwrap_or(self.row_delay_ms),
            report_file: file.report_file.unwrap_or(self.report_file),
            sample_file: file.sample_file.unwrap_or(self.sample_file),
            output_log_file: file.output_log_file.unwrap_or(self.output_log_file),
            verbose_logging: file.verbose_logging.unwrap_or(self.verbose_logging),
        })
    }

    /// 用环境变量覆盖当前配置，无法解析的值保留原值
    pub fn overlay_env(self, var: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            llm_api_key: var("LLM_API_KEY").unwrap_or(self.llm_api_key),
            llm_api_base_url: var("LLM_API_BASE_URL").unwrap_or(self.llm_api_base_url),
            llm_model_name: var("LLM_MODEL_NAME").unwrap_or(self.llm_model_name),
            llm_temperature: var("LLM_TEMPERATURE").and_then(|v| v.parse().ok()).unwrap_or(self.llm_temperature),
            search_base_url: var("SEARCH_BASE_URL").unwrap_or(self.search_base_url),
            search_max_results: var("SEARCH_MAX_RESULTS").and_then(|v| v.parse().ok()).unwrap_or(self.search_max_results),
            request_timeout_secs: var("REQUEST_TIMEOUT_SECS").and_then(|v| v.parse().ok()).unwrap_or(self.request_timeout_secs),
            row_delay_ms: var("ROW_DELAY_MS").and_then(|v| v.parse().ok()).unwrap_or(self.row_delay_ms),
            report_file: var("REPORT_FILE").unwrap_or(self.report_file),
            sample_file: var("SAMPLE_FILE").unwrap_or(self.sample_file),
            output_log_file: var("OUTPUT_LOG_FILE").unwrap_or(self.output_log_file),
            verbose_logging: var("VERBOSE_LOGGING").and_then(|v| v.parse().ok()).unwrap_or(self.verbose_logging),
        }
    }

    /// 检查配置值
    pub fn validate(&self) -> AppResult<()> {
        if !(0.0..=2.0).contains(&self.llm_temperature) {
            return Err(invalid("llm_temperature", "必须在 0 到 2 之间"));
        }
        if self.search_max_results == 0 {
            return Err(invalid("search_max_results", "必须大于 0"));
        }
        if self.llm_api_base_url.trim().is_empty() {
            return Err(invalid("llm_api_base_url", "不能为空"));
        }
        if self.search_base_url.trim().is_empty() {
            return Err(invalid("search_base_url", "不能为空"));
        }
        Ok(())
    }
}

fn invalid(key: &str, reason: &str) -> crate::error::AppError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        reason: reason.to_string(),
    }
    .into()
}
