//! # Question Validation
//!
//! 用"大模型 + 实时网页搜索"校验选择题标准答案的工具
//!
//! ## 架构设计
//!
//! 整个程序是一条线性流水线：读取题目 → 搜索 → 调用模型 → 解析答案 → 判分 → 汇总报告。
//!
//! ### ① 外部服务层（Clients）
//! - `clients/` - 持有网络资源，只暴露能力
//! - `SearchClient` - DuckDuckGo 搜索，实现 `SearchProvider`
//! - `LlmClient` - OpenAI 兼容接口，实现 `ChatModel`
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，只处理单道题
//! - `AnswerGenerator` - 填充模板并调用模型
//! - `AnswerExtractor` - 从自由文本中提取 `ANSWER: X`
//! - `grade` - 判分
//! - `ReportBuilder` - 累积结果并序列化为 CSV
//!
//! ### ③ 流程层（Workflow）
//! - `QuestionFlow` - 单题流程编排（search → generate → extract → grade）
//!
//! ### ④ 编排层（Orchestration）
//! - `ValidationRun` - 单次运行的状态机与报告累积
//! - `App` - 命令入口、模板与报告下载
//!
//! ## 模块结构

pub mod clients;
pub mod config;
pub mod error;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use clients::{ChatModel, LlmClient, SearchClient, SearchProvider};
pub use config::Config;
pub use error::{AppError, AppResult};
pub use models::{AnswerLetter, ExtractedAnswer, GradeResult, GradeStatus, QuestionRecord, RunSummary};
pub use orchestrator::{App, Command, RunObserver, RunState, ValidationRun};
pub use services::{grade, AnswerExtractor, AnswerGenerator, ReportBuilder};
pub use workflow::{QuestionFlow, RowCtx, RowOutcome};
