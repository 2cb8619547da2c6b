//! 基于 chromiumoxide 的页面控制器
//!
//! 持有唯一的 page 资源，把 `Script` 渲染成 JS 执行，把鼠标操作翻译成
//! CDP `Input.dispatchMouseEvent`。

use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::cdp::browser_protocol::input::{
    DispatchMouseEventParams, DispatchMouseEventType, MouseButton,
};
use chromiumoxide::Page;
use serde_json::Value as JsonValue;
use tracing::debug;

use crate::error::{AppError, AppResult};
use crate::infrastructure::page_controller::{PageController, Point, WaitUntil};
use crate::infrastructure::scripts::Script;

/// CDP 页面
///
/// 每条脚本与鼠标命令都限时 `command_timeout`。
pub struct CdpPage {
    page: Page,
    command_timeout: Duration,
}

impl CdpPage {
    pub fn new(page: Page, command_timeout: Duration) -> Self {
        Self {
            page,
            command_timeout,
        }
    }

    /// 执行 JS 代码并返回 JSON 结果（`undefined` 视为 `null`）
    async fn eval(&self, js_code: String) -> AppResult<JsonValue> {
        let result = tokio::time::timeout(self.command_timeout, self.page.evaluate(js_code))
            .await
            .map_err(|_| AppError::timeout("页面脚本", self.command_timeout))??;
        Ok(result.value().cloned().unwrap_or(JsonValue::Null))
    }

    async fn dispatch_mouse(&self, kind: DispatchMouseEventType, at: Point) -> AppResult<()> {
        let mut builder = DispatchMouseEventParams::builder()
            .r#type(kind.clone())
            .x(at.x)
            .y(at.y);
        if kind != DispatchMouseEventType::MouseMoved {
            builder = builder.button(MouseButton::Left).click_count(1);
        }
        let params = builder.build().map_err(AppError::input)?;
        tokio::time::timeout(self.command_timeout, self.page.execute(params))
            .await
            .map_err(|_| AppError::timeout("鼠标事件", self.command_timeout))?
            .map_err(|e| AppError::input(e.to_string()))?;
        Ok(())
    }
}

#[async_trait]
impl PageController for CdpPage {
    async fn navigate(&self, url: &str, wait_until: WaitUntil, timeout: Duration) -> AppResult<()> {
        debug!("导航到: {} ({:?})", url, wait_until);
        let navigation = async {
            self.page.goto(url).await?;
            if wait_until == WaitUntil::NetworkIdle {
                self.page.wait_for_navigation().await?;
            }
            Ok::<(), chromiumoxide::error::CdpError>(())
        };
        match tokio::time::timeout(timeout, navigation).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(AppError::navigation(url, e)),
            Err(_) => Err(AppError::navigation(url, format!("超过 {:?} 未完成", timeout))),
        }
    }

    async fn evaluate(&self, script: &Script) -> AppResult<JsonValue> {
        self.eval(script.source()).await
    }

    async fn mouse_move(&self, to: Point) -> AppResult<()> {
        self.dispatch_mouse(DispatchMouseEventType::MouseMoved, to).await
    }

    async fn mouse_down(&self, at: Point) -> AppResult<()> {
        self.dispatch_mouse(DispatchMouseEventType::MousePressed, at).await
    }

    async fn mouse_up(&self, at: Point) -> AppResult<()> {
        self.dispatch_mouse(DispatchMouseEventType::MouseReleased, at).await
    }

    async fn close(&self) -> AppResult<()> {
        self.page.clone().close().await?;
        Ok(())
    }
}
