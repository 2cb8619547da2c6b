//! 交互驱动 - 服务层
//!
//! 用真实鼠标事件模拟"人"的操作：定位、确认可见、滚动、分步移动、悬停、
//! 按下、保持、松开。任何鼠标步骤出错都退回到脚本点击。

use std::sync::Mutex;

use tokio::time::sleep;
use tracing::{debug, warn};

use crate::config::{Config, Timeouts};
use crate::error::{AppError, AppResult, PageError};
use crate::infrastructure::{PageController, Point, Target};
use crate::services::visibility::VisibilityOracle;

/// 物理点击的状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionState {
    Idle,
    /// 元素已出现在文档中
    Located,
    /// 通过可见性检查
    Visible,
    /// 鼠标已移到中心并停留
    Moved,
    Pressed,
    Released,
    Failed,
    /// 已执行兜底脚本点击
    FallbackClick,
}

/// 交互驱动
///
/// 记录鼠标当前位置，移动总是从上一次的位置出发。一个驱动只服务一个页面。
pub struct InteractionDriver {
    oracle: VisibilityOracle,
    timeouts: Timeouts,
    pointer_steps: usize,
    pointer: Mutex<Point>,
    last_trace: Mutex<Vec<InteractionState>>,
}

impl InteractionDriver {
    pub fn new(config: &Config) -> Self {
        Self {
            oracle: VisibilityOracle::new(config),
            timeouts: config.timeouts.clone(),
            pointer_steps: config.scraping.pointer_steps,
            pointer: Mutex::new(Point::ORIGIN),
            last_trace: Mutex::new(vec![InteractionState::Idle]),
        }
    }

    /// 物理点击目标
    ///
    /// 元素不存在、不可见或没有包围盒时返回 `false`；
    /// 鼠标步骤出错时执行脚本点击并返回 `true`。
    pub async fn trigger(&self, page: &dyn PageController, target: &Target) -> bool {
        let mut trace = vec![InteractionState::Idle];
        let clicked = self.drive(page, target, &mut trace).await;
        debug!("交互 {} 状态序列: {:?}", target, trace);
        *self.last_trace.lock().unwrap_or_else(|e| e.into_inner()) = trace;
        clicked
    }

    /// 最近一次 `trigger` 经过的状态
    pub fn last_trace(&self) -> Vec<InteractionState> {
        self.last_trace
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// 悬停：滚动到视口、短暂停顿、分步移动到中心
    pub async fn hover(&self, page: &dyn PageController, target: &Target) -> AppResult<()> {
        page.scroll_into_view(target).await?;
        sleep(self.timeouts.settle()).await;
        let bbox = page.bounding_box(target).await?.ok_or_else(|| {
            AppError::Page(PageError::ElementNotFound {
                selector: target.selector.clone(),
                nth: target.nth,
            })
        })?;
        self.move_pointer(page, bbox.center()).await
    }

    /// 把鼠标移回左上角
    pub async fn reset_pointer(&self, page: &dyn PageController) -> AppResult<()> {
        page.mouse_move(Point::ORIGIN).await?;
        self.set_pointer(Point::ORIGIN);
        Ok(())
    }

    /// 当前记录的鼠标位置
    pub fn pointer(&self) -> Point {
        *self.pointer.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn set_pointer(&self, at: Point) {
        *self.pointer.lock().unwrap_or_else(|e| e.into_inner()) = at;
    }

    async fn drive(
        &self,
        page: &dyn PageController,
        target: &Target,
        trace: &mut Vec<InteractionState>,
    ) -> bool {
        if let Err(e) = page
            .wait_for_selector(
                target,
                self.timeouts.element_attached(),
                self.timeouts.poll_interval(),
            )
            .await
        {
            debug!("元素未出现 {}: {}", target, e);
            trace.push(InteractionState::Failed);
            return false;
        }
        trace.push(InteractionState::Located);

        match self.oracle.signals(page, target).await {
            Ok(Some(signals)) if signals.is_interactable() => {}
            Ok(_) => {
                debug!("元素不可见 {}", target);
                trace.push(InteractionState::Failed);
                return false;
            }
            Err(e) => {
                debug!("读取可见性失败 {}: {}", target, e);
                trace.push(InteractionState::Failed);
                return false;
            }
        }
        trace.push(InteractionState::Visible);

        if let Err(e) = page.scroll_into_view(target).await {
            debug!("滚动到视口失败 {}: {}", target, e);
        }

        let center = match page.bounding_box(target).await {
            Ok(Some(bbox)) => bbox.center(),
            Ok(None) => {
                debug!("元素没有包围盒 {}", target);
                trace.push(InteractionState::Failed);
                return false;
            }
            Err(e) => {
                debug!("读取包围盒失败 {}: {}", target, e);
                trace.push(InteractionState::Failed);
                return false;
            }
        };

        match self.press_at(page, center, trace).await {
            Ok(()) => true,
            Err(e) => {
                warn!("⚠️ 物理点击 {} 失败，改用脚本点击: {}", target, e);
                trace.push(InteractionState::Failed);
                if let Err(e) = page
                    .force_click(target, self.timeouts.fallback_click())
                    .await
                {
                    debug!("脚本点击也失败 {}: {}", target, e);
                }
                trace.push(InteractionState::FallbackClick);
                true
            }
        }
    }

    async fn press_at(
        &self,
        page: &dyn PageController,
        center: Point,
        trace: &mut Vec<InteractionState>,
    ) -> AppResult<()> {
        self.move_pointer(page, center).await?;
        sleep(self.timeouts.hover_dwell()).await;
        trace.push(InteractionState::Moved);

        page.mouse_down(center).await?;
        trace.push(InteractionState::Pressed);
        sleep(self.timeouts.press_hold()).await;

        page.mouse_up(center).await?;
        trace.push(InteractionState::Released);
        Ok(())
    }

    async fn move_pointer(&self, page: &dyn PageController, to: Point) -> AppResult<()> {
        for step in self.pointer().path_to(to, self.pointer_steps) {
            page.mouse_move(step).await?;
            self.set_pointer(step);
        }
        Ok(())
    }
}
