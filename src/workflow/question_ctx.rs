//! 行处理上下文
//!
//! 封装"我正在处理第几行、是哪道题"这一信息

use std::fmt::Display;

/// 行处理上下文
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowCtx {
    /// 行号（从1开始）
    pub index: usize,

    /// 本次运行的总行数
    pub total: usize,

    /// 题目ID
    pub question_id: i64,
}

impl RowCtx {
    pub fn new(index: usize, total: usize, question_id: i64) -> Self {
        Self {
            index,
            total,
            question_id,
        }
    }

    /// 本行完成后的进度
    pub fn progress_after(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            self.index as f64 / self.total as f64
        }
    }
}

impl Display for RowCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[题目 ID#{} 第{}/{}行]",
            self.question_id, self.index, self.total
        )
    }
}
