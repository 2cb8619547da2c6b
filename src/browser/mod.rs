//! 浏览器资源
//!
//! `BrowserSession` 是唯一持有 `Browser` 的地方，按需创建新页面。

pub mod connection;
pub mod headless;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::Browser;
use tokio::task::JoinHandle;
use tracing::{debug, error};

use crate::config::BrowserConfig;
use crate::error::{AppResult, BrowserError};
use crate::infrastructure::{CdpPage, PageController};
use crate::orchestrator::champion_processor::PageSource;

pub use connection::connect_to_browser;
pub use headless::launch_browser;

/// 浏览器会话
pub struct BrowserSession {
    browser: Arc<Browser>,
    handler: JoinHandle<()>,
    owned: bool,
    command_timeout: Duration,
}

impl BrowserSession {
    /// 配置了调试端口时连接已有浏览器，否则启动新的
    pub async fn open(config: &BrowserConfig) -> AppResult<Self> {
        let (browser, handler, owned) = match config.debug_port {
            Some(port) => {
                let (browser, handler) = connect_to_browser(port).await?;
                (browser, handler, false)
            }
            None => {
                let (browser, handler) = launch_browser(config).await?;
                (browser, handler, true)
            }
        };
        Ok(Self {
            browser: Arc::new(browser),
            handler,
            owned,
            command_timeout: config.command_timeout(),
        })
    }

    /// 创建空白页面
    pub async fn new_page(&self) -> AppResult<CdpPage> {
        let page = self.browser.new_page("about:blank").await.map_err(|e| {
            error!("创建页面失败: {}", e);
            BrowserError::PageCreationFailed { source: Box::new(e) }
        })?;
        Ok(CdpPage::new(page, self.command_timeout))
    }

    /// 关闭会话；连接来的浏览器只断开，不关闭
    pub async fn close(self) {
        if self.owned {
            match Arc::try_unwrap(self.browser) {
                Ok(mut browser) => {
                    if let Err(e) = browser.close().await {
                        debug!("关闭浏览器失败: {}", e);
                    }
                    let _ = browser.wait().await;
                }
                Err(_) => debug!("浏览器仍被引用，跳过关闭"),
            }
        }
        self.handler.abort();
    }
}

#[async_trait]
impl PageSource for BrowserSession {
    async fn open_page(&self) -> AppResult<Box<dyn PageController>> {
        Ok(Box::new(self.new_page().await?))
    }
}
