//! 页面控制器 - 基础设施层
//!
//! 上层只通过这个 trait 与页面打交道：导航、执行脚本、鼠标输入。
//! 其余能力（计数、读属性、包围盒、等待）都是在 `evaluate` + `poll_until`
//! 之上提供的默认方法，真实浏览器与测试替身共用同一套实现。

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value as JsonValue;
use tracing::debug;

use crate::error::{AppError, AppResult};
use crate::infrastructure::scripts::Script;
use crate::infrastructure::wait::poll_until;

/// 同质集合中的第 n 个元素
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Target {
    pub selector: String,
    pub nth: usize,
}

impl Target {
    /// 选择器的第一个匹配
    pub fn new(selector: impl Into<String>) -> Self {
        Self::nth(selector, 0)
    }

    pub fn nth(selector: impl Into<String>, nth: usize) -> Self {
        Self {
            selector: selector.into(),
            nth,
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.selector, self.nth)
    }
}

/// 视口坐标（CSS 像素）
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// 从 `self` 到 `to` 的 `steps` 个等距中间点（含终点，不含起点）
    pub fn path_to(self, to: Point, steps: usize) -> Vec<Point> {
        let steps = steps.max(1);
        (1..=steps)
            .map(|i| {
                let t = i as f64 / steps as f64;
                Point::new(self.x + (to.x - self.x) * t, self.y + (to.y - self.y) * t)
            })
            .collect()
    }
}

/// 元素包围盒
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// 导航完成条件
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitUntil {
    DomContentLoaded,
    NetworkIdle,
}

/// 页面控制器
///
/// 同一页面上的操作必须顺序执行；需要并发时每个任务持有自己的页面。
#[async_trait]
pub trait PageController: Send + Sync {
    /// 导航到 URL，在 `timeout` 内达到 `wait_until` 条件
    async fn navigate(&self, url: &str, wait_until: WaitUntil, timeout: Duration) -> AppResult<()>;

    /// 执行页面内脚本，返回 JSON 值
    async fn evaluate(&self, script: &Script) -> AppResult<JsonValue>;

    async fn mouse_move(&self, to: Point) -> AppResult<()>;

    async fn mouse_down(&self, at: Point) -> AppResult<()>;

    async fn mouse_up(&self, at: Point) -> AppResult<()>;

    async fn close(&self) -> AppResult<()> {
        Ok(())
    }

    /// 关闭页面，失败只记日志
    async fn close_quietly(&self) {
        if let Err(e) = self.close().await {
            debug!("关闭页面失败: {}", e);
        }
    }

    /// 匹配选择器的元素数量
    async fn count(&self, selector: &str) -> AppResult<usize> {
        let value = self
            .evaluate(&Script::Count {
                selector: selector.to_string(),
            })
            .await?;
        Ok(value.as_u64().unwrap_or(0) as usize)
    }

    /// 读取元素属性，元素或属性不存在时返回 `None`
    async fn attribute(&self, target: &Target, name: &str) -> AppResult<Option<String>> {
        let value = self
            .evaluate(&Script::Attribute {
                target: target.clone(),
                name: name.to_string(),
            })
            .await?;
        Ok(value.as_str().map(str::to_string))
    }

    /// 元素包围盒，元素不存在或未渲染时返回 `None`
    async fn bounding_box(&self, target: &Target) -> AppResult<Option<BoundingBox>> {
        let value = self
            .evaluate(&Script::BoundingBox {
                target: target.clone(),
            })
            .await?;
        if value.is_null() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_value(value)?))
    }

    async fn scroll_into_view(&self, target: &Target) -> AppResult<bool> {
        let value = self
            .evaluate(&Script::ScrollIntoView {
                target: target.clone(),
            })
            .await?;
        Ok(is_truthy(&value))
    }

    /// 脚本点击，限时 `timeout`
    async fn force_click(&self, target: &Target, timeout: Duration) -> AppResult<bool> {
        let script = Script::ForceClick {
            target: target.clone(),
        };
        let value = tokio::time::timeout(timeout, self.evaluate(&script))
            .await
            .map_err(|_| AppError::timeout(format!("脚本点击 {}", target), timeout))??;
        Ok(is_truthy(&value))
    }

    /// 等待第 `nth` 个匹配元素出现在文档中
    async fn wait_for_selector(
        &self,
        target: &Target,
        timeout: Duration,
        interval: Duration,
    ) -> AppResult<()> {
        let this = self;
        let selector = target.selector.as_str();
        let nth = target.nth;
        poll_until(&format!("元素 {}", target), timeout, interval, move || async move {
            Ok(this.count(selector).await? > nth)
        })
        .await
    }

    /// 等待脚本返回真值
    async fn wait_for_function(
        &self,
        what: &str,
        script: &Script,
        timeout: Duration,
        interval: Duration,
    ) -> AppResult<()> {
        let this = self;
        poll_until(what, timeout, interval, move || async move {
            Ok(is_truthy(&this.evaluate(script).await?))
        })
        .await
    }
}

/// JS 真值语义
pub fn is_truthy(value: &JsonValue) -> bool {
    match value {
        JsonValue::Null => false,
        JsonValue::Bool(b) => *b,
        JsonValue::Number(n) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(false),
        JsonValue::String(s) => !s.is_empty(),
        JsonValue::Array(_) | JsonValue::Object(_) => true,
    }
}
