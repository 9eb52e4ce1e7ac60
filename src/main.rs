use anyhow::Result;
use question_validation::utils::logging;
use question_validation::{App, Command, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // 加载配置
    let config = Config::load()?;

    // 初始化日志
    logging::init(config.verbose_logging);

    // 解析命令并运行
    let command = Command::parse(std::env::args().skip(1))?;
    App::initialize(config)?.run(command).await?;

    Ok(())
}
