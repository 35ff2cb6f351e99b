use anyhow::Result;
use cyberops_console::utils::logging;
use cyberops_console::{App, Config};
use std::path::PathBuf;

#[tokio::main]
async fn main() -> Result<()> {
    // 加载配置
    let config = Config::from_env();

    // 初始化日志
    logging::init(config.verbose_logging);

    // 命令行参数：文件模式下为待上传文件，表单模式下为表单 TOML
    let paths: Vec<PathBuf> = std::env::args().skip(1).map(PathBuf::from).collect();

    // 初始化并运行应用
    let mut app = App::initialize(config).await?;
    app.run(&paths).await?;

    Ok(())
}
