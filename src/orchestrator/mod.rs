//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责一次运行的调度，是整个系统的"指挥中心"。
//!
//! ### `app` - 应用入口
//! - 解析命令、写出模板与报告
//! - 持有会话（`ValidationRun`），失败时落盘部分报告
//!
//! ### `validation_run` - 单次运行
//! - 状态机 Empty → Loading → Processing → Complete / Failed
//! - 按顺序遍历题目，委托 `QuestionFlow` 处理单题
//! - 累积报告、计算进度
//!
//! ### `observer` - 展示层接口
//! - 进度与每题详情回调
//!
//! ## 层次关系
//!
//! ```text
//! app (命令 / 文件)
//!     ↓
//! validation_run (处理 Vec<QuestionRecord>)
//!     ↓
//! workflow::QuestionFlow (处理单个 QuestionRecord)
//!     ↓
//! services (能力层：生成 / 提取 / 判分 / 报告)
//!     ↓
//! clients (外部服务：搜索 / LLM)
//! ```

pub mod app;
pub mod observer;
pub mod validation_run;

pub use app::{App, Command, USAGE};
pub use observer::{ConsoleObserver, NoopObserver, RunObserver};
pub use validation_run::{RunState, ValidationRun};
