use chromiumoxide::Browser;
use futures::StreamExt;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, error, info};

use crate::error::{AppResult, BrowserError};

/// 连接到已开启远程调试端口的浏览器
pub async fn connect_to_browser(port: u16) -> AppResult<(Browser, JoinHandle<()>)> {
    let browser_url = format!("http://localhost:{}", port);
    info!("正在连接到浏览器: {}", browser_url);

    let (browser, mut handler) = Browser::connect(&browser_url).await.map_err(|e| {
        error!("连接浏览器失败: {}", e);
        BrowserError::ConnectionFailed {
            port,
            source: Box::new(e),
        }
    })?;
    debug!("浏览器连接成功");

    // 在后台处理浏览器事件
    let handle = tokio::spawn(async move {
        while let Some(h) = handler.next().await {
            if h.is_err() {
                break;
            }
        }
    });

    // 添加短暂延迟以等待浏览器状态同步
    sleep(tokio::time::Duration::from_millis(300)).await;

    Ok((browser, handle))
}
