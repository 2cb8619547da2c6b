use std::path::Path;

use chromiumoxide::{Browser, BrowserConfig as CdpBrowserConfig};
use futures::StreamExt;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::config::BrowserConfig;
use crate::error::{AppResult, BrowserError};

/// 启动浏览器
///
/// 返回浏览器与后台事件处理任务；任务在浏览器关闭后结束。
pub async fn launch_browser(config: &BrowserConfig) -> AppResult<(Browser, JoinHandle<()>)> {
    info!(
        "🚀 启动浏览器 ({})...",
        if config.headless { "无头" } else { "有界面" }
    );

    let mut builder = CdpBrowserConfig::builder()
        .window_size(config.viewport_width, config.viewport_height)
        .args(vec!["--no-sandbox", "--disable-dev-shm-usage"]);
    builder = if config.headless {
        builder.new_headless_mode().arg("--disable-gpu")
    } else {
        builder.with_head()
    };
    if let Some(executable) = &config.executable {
        debug!("浏览器可执行文件: {}", executable);
        builder = builder.chrome_executable(Path::new(executable));
    }

    let cdp_config = builder.build().map_err(|message| {
        error!("配置浏览器失败: {}", message);
        BrowserError::ConfigurationFailed { message }
    })?;

    let (browser, mut handler) = Browser::launch(cdp_config).await.map_err(|e| {
        error!("启动浏览器失败: {}", e);
        BrowserError::LaunchFailed { source: Box::new(e) }
    })?;
    debug!("浏览器启动成功");

    // 在后台处理浏览器事件
    let handle = tokio::spawn(async move {
        while let Some(h) = handler.next().await {
            if h.is_err() {
                break;
            }
        }
    });

    Ok((browser, handle))
}
