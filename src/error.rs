use thiserror::Error;

type BoxedSource = Box<dyn std::error::Error + Send + Sync>;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 输入文件解析错误
    #[error("输入文件错误: {0}")]
    Parse(#[from] ParseError),
    /// 外部调用错误（搜索 / LLM）
    #[error("外部调用错误: {0}")]
    ExternalCall(#[from] ExternalCallError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    /// 文件操作错误
    #[error("文件错误: {0}")]
    File(#[from] FileError),
}

/// 输入 CSV 解析错误
#[derive(Debug, Error)]
pub enum ParseError {
    /// 不是合法的 CSV
    #[error("无法解析 CSV: {source}")]
    InvalidCsv {
        #[source]
        source: csv::Error,
    },
    /// 缺少必需的列
    #[error("缺少必需的列: {}", .missing.join(", "))]
    MissingColumns { missing: Vec<String> },
    /// 某一行无法转换为题目记录（行号从 1 开始，不含表头）
    #[error("第 {row} 行数据无效: {source}")]
    InvalidRow {
        row: usize,
        #[source]
        source: csv::Error,
    },
}

/// 外部服务调用错误
#[derive(Debug, Error)]
pub enum ExternalCallError {
    /// 搜索请求失败
    #[error("搜索请求失败 (query: {query}): {source}")]
    Search {
        query: String,
        #[source]
        source: BoxedSource,
    },
    /// 搜索服务返回非成功状态码
    #[error("搜索服务返回错误状态 {status} (query: {query})")]
    SearchStatus { query: String, status: u16 },
    /// LLM API 调用失败
    #[error("LLM API调用失败 (模型: {model}): {source}")]
    Llm {
        model: String,
        #[source]
        source: BoxedSource,
    },
    /// LLM 返回内容为空
    #[error("LLM返回内容为空 (模型: {model})")]
    EmptyResponse { model: String },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 配置文件读取失败
    #[error("无法读取配置文件 {path}: {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 配置文件解析失败
    #[error("无法解析配置文件 {path}: {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    /// 配置值不合法
    #[error("配置项 {key} 的值不合法: {reason}")]
    InvalidValue { key: String, reason: String },
    /// HTML 选择器无法解析
    #[error("无法解析选择器 '{selector}': {message}")]
    InvalidSelector { selector: String, message: String },
    /// HTTP 客户端构建失败
    #[error("HTTP 客户端构建失败: {source}")]
    HttpClient {
        #[source]
        source: reqwest::Error,
    },
    /// 命令行参数错误
    #[error("{0}")]
    Usage(String),
}

/// 文件操作错误
#[derive(Debug, Error)]
pub enum FileError {
    /// 读取文件失败
    #[error("读取文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 写入文件失败
    #[error("写入文件失败 ({path}): {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 报告序列化失败
    #[error("CSV 序列化失败: {source}")]
    Serialize {
        #[source]
        source: BoxedSource,
    },
}

// ========== 便捷构造函数 ==========

impl ExternalCallError {
    /// 创建搜索请求失败错误
    pub fn search_failed(
        query: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        ExternalCallError::Search {
            query: query.into(),
            source: Box::new(source),
        }
    }

    /// 创建LLM API调用错误
    pub fn llm_failed(
        model: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        ExternalCallError::Llm {
            model: model.into(),
            source: Box::new(source),
        }
    }
}

impl FileError {
    /// 创建 CSV 序列化错误
    pub fn serialize(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        FileError::Serialize {
            source: Box::new(source),
        }
    }
}

impl AppError {
    /// 是否为外部调用失败（此时可能已有部分结果）
    pub fn is_external(&self) -> bool {
        matches!(self, AppError::ExternalCall(_))
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
