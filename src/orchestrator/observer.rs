//! 展示层接口
//!
//! 编排层通过 `RunObserver` 报告进度与每行详情；终端实现为 `ConsoleObserver`。

use tracing::info;

use crate::models::QuestionRecord;
use crate::workflow::{RowCtx, RowOutcome};

/// 运行过程回调，默认全部为空实现
pub trait RunObserver {
    /// 输入解析完成
    fn on_loaded(&mut self, _total: usize) {}

    /// 开始处理一行
    fn on_row_start(&mut self, _ctx: &RowCtx, _record: &QuestionRecord) {}

    /// 一行处理完成
    fn on_row_complete(&mut self, _ctx: &RowCtx, _record: &QuestionRecord, _outcome: &RowOutcome) {}

    /// 进度更新，取值 0..=1，单次运行内单调不减
    fn on_progress(&mut self, _fraction: f64) {}
}

/// 不做任何事的观察者
#[derive(Debug, Default)]
pub struct NoopObserver;

impl RunObserver for NoopObserver {}

/// 终端观察者：通过 tracing 输出进度条和每题详情
#[derive(Debug)]
pub struct ConsoleObserver {
    bar_width: usize,
}

impl ConsoleObserver {
    pub fn new() -> Self {
        Self { bar_width: 30 }
    }

    fn render_bar(&self, fraction: f64) -> String {
        let fraction = fraction.clamp(0.0, 1.0);
        let filled = (fraction * self.bar_width as f64).round() as usize;
        format!(
            "[{}{}] {:>3.0}%",
            "█".repeat(filled),
            "░".repeat(self.bar_width - filled),
            fraction * 100.0
        )
    }
}

/// 选项一行显示，如 `A) RAM, B) Hard Drive, ...`
fn format_options(record: &QuestionRecord) -> String {
    record
        .options()
        .iter()
        .map(|(letter, text)| format!("{}) {}", letter, text))
        .collect::<Vec<_>>()
        .join(", ")
}

/// 每题结果面板：AI 答案、正确答案、状态
fn result_panel(outcome: &RowOutcome) -> [String; 3] {
    [
        format!("💡 AI 答案: {}", outcome.result.extracted_answer),
        format!("📌 正确答案: {}", outcome.result.correct_answer),
        format!("📊 状态: {}", outcome.result.status),
    ]
}

impl Default for ConsoleObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl RunObserver for ConsoleObserver {
    fn on_loaded(&mut self, total: usize) {
        crate::utils::logging::log_questions_loaded(total);
    }

    fn on_row_start(&mut self, ctx: &RowCtx, record: &QuestionRecord) {
        info!("\n{}", "─".repeat(60));
        info!(
            "🔍 处理第 {}/{} 题 (ID {}): {}",
            ctx.index, ctx.total, record.id, record.description
        );
        info!("选项: {}", format_options(record));
    }

    fn on_row_complete(&mut self, _ctx: &RowCtx, _record: &QuestionRecord, outcome: &RowOutcome) {
        for line in result_panel(outcome) {
            info!("{}", line);
        }
    }

    fn on_progress(&mut self, fraction: f64) {
        info!("进度 {}", self.render_bar(fraction));
    }
}
