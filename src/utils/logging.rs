/// 日志工具模块
///
/// 提供日志初始化、格式化和输出的辅助函数
use anyhow::Result;
use std::fs::{self, OpenOptions};
use std::io::Write;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::models::RunSummary;

/// 初始化 tracing 订阅器
///
/// `RUST_LOG` 优先；否则默认 `info`，详细模式下为 `debug`。
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 初始化日志文件
///
/// # 参数
/// - `log_file_path`: 日志文件路径
pub fn init_log_file(log_file_path: &str) -> Result<()> {
    let log_header = format!(
        "{}\n题目校验日志 - {}\n{}\n\n",
        "=".repeat(60),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        "=".repeat(60)
    );
    fs::write(log_file_path, log_header)?;
    Ok(())
}

/// 向日志文件追加一次运行的结果
///
/// # 参数
/// - `log_file_path`: 日志文件路径
/// - `input`: 输入文件
/// - `outcome`: 结果描述
pub fn append_run_log(log_file_path: &str, input: &str, outcome: &str) -> Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file_path)?;

    writeln!(
        file,
        "[{}] {} | {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        input,
        outcome
    )?;
    Ok(())
}

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 题目校验系统启动");
    info!("🤖 模型: {} ({})", config.llm_model_name, config.llm_api_base_url);
    info!("🔍 每题搜索结果数: {}", config.search_max_results);
    info!("{}", "=".repeat(60));
}

/// 记录题目加载信息
///
/// # 参数
/// - `total`: 题目总数
pub fn log_questions_loaded(total: usize) {
    info!("✓ 找到 {} 道待校验的题目", total);
    info!("💡 将按输入顺序逐题处理\n");
}

/// 一行可读的统计文本
pub fn format_summary(summary: &RunSummary) -> String {
    format!(
        "正确 {}/{} ({:.1}%), 错误 {}, 无法识别 {}",
        summary.correct,
        summary.total,
        summary.accuracy() * 100.0,
        summary.incorrect,
        summary.unknown
    )
}

/// 打印最终统计信息
///
/// # 参数
/// - `summary`: 本次运行统计
/// - `report_path`: 报告文件路径
/// - `log_file_path`: 日志文件路径
pub fn print_final_stats(summary: &RunSummary, report_path: &str, log_file_path: &str) {
    info!("\n{}", "=".repeat(60));
    info!("📊 全部处理完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 正确: {}/{}", summary.correct, summary.total);
    info!("❌ 错误: {}", summary.incorrect);
    info!("❓ 无法识别答案: {}", summary.unknown);
    info!("🎯 正确率: {:.1}%", summary.accuracy() * 100.0);
    info!("{}", "=".repeat(60));
    info!("\n报告已保存至: {}", report_path);
    info!("日志已保存至: {}", log_file_path);
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
