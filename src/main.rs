use anyhow::{Context, Result};
use wildrift_scraper::utils::logging;
use wildrift_scraper::{App, Config, Pipeline};

#[tokio::main]
async fn main() -> Result<()> {
    // 初始化日志
    logging::init();

    // 选择流水线，默认 champions
    let pipeline: Pipeline = std::env::args()
        .nth(1)
        .unwrap_or_default()
        .parse()
        .context("解析命令行参数失败")?;

    // 加载配置
    let config = Config::from_env().context("加载配置失败")?;

    // 初始化并运行应用
    let app = App::initialize(config, pipeline)
        .await
        .context("初始化应用失败")?;
    let result = app.run().await;
    app.shutdown().await;

    result.with_context(|| format!("流水线 {} 运行失败", pipeline))
}
