//! 横幅关闭
//!
//! Cookie 同意框、推广弹层会挡住鼠标事件。尽力点掉，失败不影响流程。

use std::time::Duration;

use tracing::debug;

use crate::infrastructure::{PageController, Script};
use crate::selectors::banners::{BUTTON_TEXTS, DISMISS};

/// 点击可见的同意/关闭按钮，返回点击次数
pub async fn dismiss_banners(page: &dyn PageController, timeout: Duration) -> usize {
    let script = Script::DismissBanners {
        texts: BUTTON_TEXTS.iter().map(|s| s.to_string()).collect(),
        selectors: DISMISS.iter().map(|s| s.to_string()).collect(),
    };
    match tokio::time::timeout(timeout, page.evaluate(&script)).await {
        Ok(Ok(value)) => {
            let clicked = value.as_u64().unwrap_or(0) as usize;
            if clicked > 0 {
                debug!("关闭了 {} 个横幅", clicked);
            }
            clicked
        }
        Ok(Err(e)) => {
            debug!("关闭横幅失败: {}", e);
            0
        }
        Err(_) => {
            debug!("关闭横幅超时");
            0
        }
    }
}
