//! 可见性判定 - 服务层
//!
//! 只观察、不修改页面。每次调用都重新读取信号，不做缓存。

use std::time::Duration;

use serde::Deserialize;

use crate::config::Config;
use crate::error::AppResult;
use crate::infrastructure::page_controller::is_truthy;
use crate::infrastructure::{poll_until, ContentProbe, PageController, Script, Target};

/// 一次读取的可见性信号
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionSignals {
    pub display: String,
    pub visibility: String,
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub width: f64,
    pub height: f64,
    pub has_offset_parent: bool,
    /// 内联样式 `display: none`
    #[serde(default)]
    pub inline_hidden: bool,
}

impl RegionSignals {
    /// 区域是否打开
    ///
    /// display 不为 none、visibility 不为 hidden、渲染高度大于 0，
    /// 且有 offsetParent 或为 fixed 定位。
    pub fn is_open(&self) -> bool {
        self.display != "none"
            && self.visibility != "hidden"
            && !self.inline_hidden
            && self.height > 0.0
            && (self.has_offset_parent || self.position == "fixed")
    }

    /// 可以被鼠标操作：打开且宽度非零
    pub fn is_interactable(&self) -> bool {
        self.is_open() && self.width > 0.0
    }
}

/// 可见性判定器
pub struct VisibilityOracle {
    poll_interval: Duration,
}

impl VisibilityOracle {
    pub fn new(config: &Config) -> Self {
        Self {
            poll_interval: config.timeouts.poll_interval(),
        }
    }

    /// 读取信号，元素不存在时返回 `None`
    pub async fn signals(
        &self,
        page: &dyn PageController,
        target: &Target,
    ) -> AppResult<Option<RegionSignals>> {
        let value = page
            .evaluate(&Script::RegionSignals {
                target: target.clone(),
            })
            .await?;
        if value.is_null() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_value(value)?))
    }

    /// 区域是否可见；元素不存在视为不可见
    pub async fn is_ready(&self, page: &dyn PageController, target: &Target) -> AppResult<bool> {
        Ok(self
            .signals(page, target)
            .await?
            .map(|s| s.is_open())
            .unwrap_or(false))
    }

    /// 区域内容是否已填充
    ///
    /// `probe` 是返回布尔值的脚本，通常是 `Script::ContentReady`。
    pub async fn content_ready(&self, page: &dyn PageController, probe: &Script) -> AppResult<bool> {
        let value = page.evaluate(probe).await?;
        Ok(is_truthy(&value))
    }

    pub async fn wait_until_ready(
        &self,
        page: &dyn PageController,
        target: &Target,
        timeout: Duration,
    ) -> AppResult<()> {
        poll_until(
            &format!("区域可见 {}", target),
            timeout,
            self.poll_interval,
            move || self.is_ready(page, target),
        )
        .await
    }

    pub async fn wait_until_content_ready(
        &self,
        page: &dyn PageController,
        probe: &Script,
        timeout: Duration,
    ) -> AppResult<()> {
        page.wait_for_function(
            &format!("内容就绪 {}", probe_label(probe)),
            probe,
            timeout,
            self.poll_interval,
        )
        .await
    }
}

fn probe_label(probe: &Script) -> String {
    match probe {
        Script::ContentReady(ContentProbe { region, .. }) => region.clone(),
        Script::TextEquals { selector, expected } => format!("{} = {}", selector, expected),
        other => format!("{:?}", other),
    }
}
