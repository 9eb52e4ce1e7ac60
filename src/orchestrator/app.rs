//! 应用入口 - 编排层
//!
//! ## 职责
//!
//! 1. **命令解析**：`sample` / `validate` / `help`
//! 2. **下载动作**：写出示例模板与校验报告
//! 3. **会话管理**：持有唯一的 `ValidationRun`，每次校验前重置
//! 4. **失败落盘**：外部调用失败时把已完成的行写入报告，避免前面的结果丢失

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{error, info, warn};

use crate::clients::{ChatModel, SearchProvider};
use crate::config::Config;
use crate::error::{AppError, AppResult, FileError};
use crate::models::{read_input, RunSummary};
use crate::orchestrator::observer::{ConsoleObserver, RunObserver};
use crate::orchestrator::validation_run::ValidationRun;
use crate::services::sample_csv;
use crate::utils::logging;
use crate::workflow::QuestionFlow;

/// 命令行用法
pub const USAGE: &str = "\
用法:
  question-validator sample [OUT]              写出示例 CSV 模板
  question-validator validate <INPUT> [REPORT] 校验题目并写出报告
  question-validator help                      显示本帮助";

/// 命令
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Sample { output: Option<PathBuf> },
    Validate { input: PathBuf, report: Option<PathBuf> },
    Help,
}

impl Command {
    /// 解析参数（不含程序名）
    pub fn parse<I>(args: I) -> AppResult<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let mut args = args.into_iter();
        let command = match args.next().as_deref() {
            None | Some("help") | Some("-h") | Some("--help") => Command::Help,
            Some("sample") => Command::Sample {
                output: args.next().map(PathBuf::from),
            },
            Some("validate") => {
                let input = args
                    .next()
                    .map(PathBuf::from)
                    .ok_or_else(|| usage_error("validate 需要输入文件"))?;
                Command::Validate {
                    input,
                    report: args.next().map(PathBuf::from),
                }
            }
            Some(other) => return Err(usage_error(&format!("未知命令: {other}"))),
        };

        if let Some(extra) = args.next() {
            return Err(usage_error(&format!("多余的参数: {extra}")));
        }
        Ok(command)
    }
}

fn usage_error(message: &str) -> AppError {
    crate::error::ConfigError::Usage(format!("{message}\n\n{USAGE}")).into()
}

/// 应用主结构
pub struct App {
    config: Config,
    run: ValidationRun,
}

impl App {
    /// 初始化应用
    pub fn initialize(config: Config) -> Result<Self> {
        logging::init_log_file(&config.output_log_file)
            .with_context(|| format!("无法初始化日志文件: {}", config.output_log_file))?;

        logging::log_startup(&config);

        Ok(Self {
            config,
            run: ValidationRun::new(),
        })
    }

    pub fn validation_run(&self) -> &ValidationRun {
        &self.run
    }

    /// 执行命令
    pub async fn run(&mut self, command: Command) -> Result<()> {
        match command {
            Command::Help => {
                println!("{USAGE}");
            }
            Command::Sample { output } => {
                let path = output.unwrap_or_else(|| PathBuf::from(&self.config.sample_file));
                write_sample(&path).await?;
                info!("✓ 示例模板已保存至: {}", path.display());
            }
            Command::Validate { input, report } => {
                let report_path =
                    report.unwrap_or_else(|| PathBuf::from(&self.config.report_file));
                let flow = QuestionFlow::from_config(&self.config)?;
                self.validate_file(&input, &flow, &report_path).await?;
            }
        }
        Ok(())
    }

    /// 校验一个输入文件并写出报告
    pub async fn validate_file<S, M>(
        &mut self,
        input: &Path,
        flow: &QuestionFlow<S, M>,
        report_path: &Path,
    ) -> Result<RunSummary>
    where
        S: SearchProvider,
        M: ChatModel,
    {
        info!("\n📁 正在读取: {}", input.display());
        let bytes = read_input(input)
            .await
            .with_context(|| format!("无法读取输入文件: {}", input.display()))?;

        let mut observer = ConsoleObserver::new();
        let result = self
            .validate_bytes(&bytes, flow, report_path, &mut observer)
            .await;

        let input_name = input.display().to_string();
        match &result {
            Ok(summary) => {
                logging::print_final_stats(
                    summary,
                    &report_path.display().to_string(),
                    &self.config.output_log_file,
                );
                self.log_run(&input_name, &logging::format_summary(summary));
            }
            Err(e) => self.log_run(&input_name, &format!("失败: {e}")),
        }

        result.with_context(|| format!("校验失败: {}", input.display()))
    }

    /// 校验内存中的 CSV 并写出报告
    ///
    /// 外部调用失败时，已完成的行会先写入 `report_path` 再返回错误；
    /// 输入解析失败时不写报告。
    pub async fn validate_bytes<S, M, O>(
        &mut self,
        input: &[u8],
        flow: &QuestionFlow<S, M>,
        report_path: &Path,
        observer: &mut O,
    ) -> AppResult<RunSummary>
    where
        S: SearchProvider,
        M: ChatModel,
        O: RunObserver,
    {
        match self.run.execute(input, flow, observer).await {
            Ok(summary) => {
                write_report(&self.run, report_path).await?;
                Ok(summary)
            }
            Err(e) if e.is_external() => {
                warn!(
                    "⚠️ 运行中断，保存已完成的 {}/{} 行",
                    self.run.processed(),
                    self.run.total()
                );
                match write_report(&self.run, report_path).await {
                    Ok(()) => warn!("部分报告已保存至: {}", report_path.display()),
                    Err(flush_err) => error!("❌ 部分报告保存失败: {}", flush_err),
                }
                Err(e)
            }
            Err(e) => {
                if matches!(e, AppError::Parse(_)) {
                    warn!("💡 可运行 `question-validator sample` 获取输入模板");
                }
                Err(e)
            }
        }
    }

    fn log_run(&self, input: &str, outcome: &str) {
        if let Err(e) = logging::append_run_log(&self.config.output_log_file, input, outcome) {
            error!("写入日志文件失败: {}", e);
        }
    }
}

async fn write_report(run: &ValidationRun, path: &Path) -> AppResult<()> {
    let bytes = run.report().finalize()?;
    write_file(path, &bytes).await
}

async fn write_sample(path: &Path) -> AppResult<()> {
    let bytes = sample_csv()?;
    write_file(path, &bytes).await
}

async fn write_file(path: &Path, bytes: &[u8]) -> AppResult<()> {
    fs::write(path, bytes).await.map_err(|source| {
        FileError::WriteFailed {
            path: path.display().to_string(),
            source,
        }
        .into()
    })
}
