//! 字段提取策略
//!
//! 引擎只管重试、等待、校验；"怎么激活、等什么、读什么"由策略决定。

pub mod level_stats;
pub mod tooltip;

use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Map, Value as JsonValue};

use crate::config::Timeouts;
use crate::error::AppResult;
use crate::infrastructure::{PageController, Script, Target};
use crate::models::WorkUnit;
use crate::services::InteractionDriver;

pub use level_stats::LevelStatsExtractor;
pub use tooltip::{TooltipExtractor, TooltipSnapshot};

/// 内容类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Item,
    Rune,
    ChampionLevel,
}

impl ContentKind {
    /// 日志与文件名中使用的名字
    pub fn label(&self) -> &'static str {
        match self {
            ContentKind::Item => "item",
            ContentKind::Rune => "rune",
            ContentKind::ChampionLevel => "level",
        }
    }
}

/// 字段提取策略
#[async_trait]
pub trait FieldExtractor: Send + Sync {
    fn kind(&self) -> ContentKind;

    /// 激活后应当可见的区域
    fn region(&self, unit: &WorkUnit) -> Target;

    /// 激活单元（悬停、设置滑块）
    async fn activate(
        &self,
        page: &dyn PageController,
        driver: &InteractionDriver,
        unit: &WorkUnit,
    ) -> AppResult<()>;

    /// 激活后的稳定停顿
    fn stabilize_delay(&self, timeouts: &Timeouts) -> Duration {
        timeouts.hover_stabilize()
    }

    /// 等待内容就绪的上限
    fn content_timeout(&self, timeouts: &Timeouts) -> Duration {
        timeouts.content_ready()
    }

    /// 内容就绪探针，返回布尔值的脚本
    fn content_probe(&self, unit: &WorkUnit) -> Script;

    /// 一次快照读取全部字段
    async fn read(&self, page: &dyn PageController, unit: &WorkUnit)
        -> AppResult<Map<String, JsonValue>>;

    /// 必须存在且非空的字段
    fn required_fields(&self) -> &'static [&'static str];
}
