//! 单次运行（会话上下文）- 编排层
//!
//! ## 状态机
//!
//! ```text
//! Empty → Loading → Processing{row}* → Complete
//!            ↓              ↓
//!          Failed         Failed
//! ```
//!
//! - 加载失败：没有任何报告行
//! - 外部调用失败：已完成的行保留在报告中，供调用方落盘
//! - 每次 `execute` 都会先 `reset`，对应"上传新文件即清空上次结果"

use tracing::{error, info};

use crate::error::AppResult;
use crate::models::{load_questions, RunSummary};
use crate::orchestrator::observer::RunObserver;
use crate::clients::{ChatModel, SearchProvider};
use crate::services::ReportBuilder;
use crate::workflow::{QuestionFlow, RowCtx};

/// 运行状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Empty,
    Loading,
    Processing { row: usize, total: usize },
    Complete,
    Failed,
}

/// 运行上下文：报告累积器 + 进度计数
#[derive(Debug)]
pub struct ValidationRun {
    state: RunState,
    report: ReportBuilder,
    processed: usize,
    total: usize,
}

impl ValidationRun {
    pub fn new() -> Self {
        Self {
            state: RunState::Empty,
            report: ReportBuilder::new(),
            processed: 0,
            total: 0,
        }
    }

    /// 丢弃上一次运行的全部状态
    pub fn reset(&mut self) {
        self.state = RunState::Empty;
        self.report.clear();
        self.processed = 0;
        self.total = 0;
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn report(&self) -> &ReportBuilder {
        &self.report
    }

    pub fn processed(&self) -> usize {
        self.processed
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn summary(&self) -> RunSummary {
        self.report.summary()
    }

    /// 当前进度，0..=1
    pub fn progress(&self) -> f64 {
        if self.total == 0 {
            if self.state == RunState::Complete {
                1.0
            } else {
                0.0
            }
        } else {
            self.processed as f64 / self.total as f64
        }
    }

    /// 解析输入并逐行处理
    ///
    /// 行严格按输入顺序依次处理，不并发；任意外部调用失败即终止本次运行。
    pub async fn execute<S, M, O>(
        &mut self,
        input: &[u8],
        flow: &QuestionFlow<S, M>,
        observer: &mut O,
    ) -> AppResult<RunSummary>
    where
        S: SearchProvider,
        M: ChatModel,
        O: RunObserver,
    {
        self.reset();
        self.state = RunState::Loading;

        let records = match load_questions(input) {
            Ok(records) => records,
            Err(e) => {
                error!("❌ 输入文件解析失败: {}", e);
                self.state = RunState::Failed;
                return Err(e);
            }
        };

        self.total = records.len();
        observer.on_loaded(self.total);
        observer.on_progress(self.progress());

        for (index, record) in records.iter().enumerate() {
            let ctx = RowCtx::new(index + 1, self.total, record.id);
            self.state = RunState::Processing {
                row: ctx.index,
                total: ctx.total,
            };
            observer.on_row_start(&ctx, record);

            let outcome = match flow.run(record, &ctx).await {
                Ok(outcome) => outcome,
                Err(e) => {
                    error!(
                        "{} ❌ 处理失败，终止本次运行 (已完成 {}/{}): {}",
                        ctx, self.processed, self.total, e
                    );
                    self.state = RunState::Failed;
                    return Err(e);
                }
            };

            observer.on_row_complete(&ctx, record, &outcome);
            self.report.append(outcome.result);
            self.processed += 1;
            observer.on_progress(self.progress());
        }

        self.state = RunState::Complete;
        if self.total == 0 {
            observer.on_progress(self.progress());
        }

        let summary = self.summary();
        info!("✓ 本次运行完成: {}", crate::utils::logging::format_summary(&summary));
        Ok(summary)
    }
}

impl Default for ValidationRun {
    fn default() -> Self {
        Self::new()
    }
}
