//! 有界轮询原语
//!
//! 所有"等到某个条件成立"的逻辑都走这里：条件、超时、轮询间隔。
//! 只依赖 sleep 与单调时钟，超时是唯一的取消方式。

use std::future::Future;
use std::time::Duration;

use tokio::time::{sleep, Instant};
use tracing::trace;

use crate::error::{AppError, AppResult};

/// 反复检查 `predicate`，直到返回 `true` 或超时
///
/// 条件本身报错时视为"尚未就绪"继续轮询（页面可能正在重绘）。
/// 单次检查也受剩余时间约束，卡住的检查不会拖过截止时间。
/// 即使 `timeout` 为零也至少检查一次。
///
/// # 参数
/// - `what`: 等待对象的描述，用于超时错误信息
/// - `timeout`: 最长等待时间
/// - `interval`: 两次检查之间的间隔
pub async fn poll_until<F, Fut>(
    what: &str,
    timeout: Duration,
    interval: Duration,
    mut predicate: F,
) -> AppResult<()>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = AppResult<bool>>,
{
    let deadline = Instant::now() + timeout;

    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        match tokio::time::timeout(remaining, predicate()).await {
            Ok(Ok(true)) => return Ok(()),
            Ok(Ok(false)) => {}
            Ok(Err(e)) => trace!("等待 {} 时检查失败: {}", what, e),
            Err(_) => trace!("等待 {} 时检查未在剩余时间内返回", what),
        }

        let now = Instant::now();
        if now >= deadline {
            return Err(AppError::timeout(what, timeout));
        }
        sleep(interval.min(deadline - now)).await;
    }
}
