use anyhow::Result;
use document_analysis::utils::logging;
use document_analysis::{App, Config};
use std::path::PathBuf;

#[tokio::main]
async fn main() -> Result<()> {
    // 加载配置
    Config::check_env()?;
    let config = Config::load()?;

    // 初始化日志
    logging::init(config.verbose_logging);

    let paths: Vec<PathBuf> = std::env::args_os().skip(1).map(PathBuf::from).collect();

    // 初始化并运行应用
    let stats = App::initialize(config)?.run(paths).await?;

    if stats.failed > 0 {
        std::process::exit(1);
    }

    Ok(())
}
