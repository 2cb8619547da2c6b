//! 英雄等级属性提取
//!
//! 激活 = 设置 `#range` 并派发 input/change；`#stat-level` 显示目标等级即视为就绪。

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Map, Value as JsonValue};
use tokio::time::sleep;

use crate::config::{Config, Timeouts};
use crate::error::{AppError, AppResult, PageError};
use crate::extractors::{ContentKind, FieldExtractor};
use crate::infrastructure::page_controller::is_truthy;
use crate::infrastructure::{PageController, Script, Target};
use crate::models::{LevelStats, WorkUnit};
use crate::selectors::champion::{LEVEL_LABEL, LEVEL_RANGE, STATS_SECTION, STAT_BLOCKS};
use crate::services::InteractionDriver;

pub struct LevelStatsExtractor {
    debounce: Duration,
}

impl LevelStatsExtractor {
    pub fn new(config: &Config) -> Self {
        Self {
            debounce: config.timeouts.level_debounce(),
        }
    }

    fn level_of(unit: &WorkUnit) -> AppResult<u32> {
        unit.level_number()
            .ok_or_else(|| AppError::Other(format!("单元 {} 不是等级单元", unit.id())))
    }
}

#[async_trait]
impl FieldExtractor for LevelStatsExtractor {
    fn kind(&self) -> ContentKind {
        ContentKind::ChampionLevel
    }

    fn region(&self, _unit: &WorkUnit) -> Target {
        Target::new(STATS_SECTION)
    }

    async fn activate(
        &self,
        page: &dyn PageController,
        _driver: &InteractionDriver,
        unit: &WorkUnit,
    ) -> AppResult<()> {
        let level = Self::level_of(unit)?;
        let applied = page
            .evaluate(&Script::SetRangeValue {
                selector: LEVEL_RANGE.to_string(),
                value: level,
            })
            .await?;
        if !is_truthy(&applied) {
            return Err(AppError::Page(PageError::ElementNotFound {
                selector: LEVEL_RANGE.to_string(),
                nth: 0,
            }));
        }
        Ok(())
    }

    fn stabilize_delay(&self, _timeouts: &Timeouts) -> Duration {
        Duration::ZERO
    }

    fn content_timeout(&self, timeouts: &Timeouts) -> Duration {
        timeouts.level_confirm()
    }

    fn content_probe(&self, unit: &WorkUnit) -> Script {
        Script::TextEquals {
            selector: LEVEL_LABEL.to_string(),
            expected: unit.level_number().unwrap_or_default().to_string(),
        }
    }

    async fn read(
        &self,
        page: &dyn PageController,
        unit: &WorkUnit,
    ) -> AppResult<Map<String, JsonValue>> {
        let level = Self::level_of(unit)?;
        sleep(self.debounce).await;

        let value = page
            .evaluate(&Script::StatBlocks {
                blocks: STAT_BLOCKS.to_string(),
            })
            .await?;
        let raw: BTreeMap<String, String> = serde_json::from_value(value)?;
        let stats = LevelStats::from_raw(level, raw);

        match serde_json::to_value(stats)? {
            JsonValue::Object(fields) => Ok(fields),
            _ => Ok(Map::new()),
        }
    }

    fn required_fields(&self) -> &'static [&'static str] {
        &["stats"]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probe_expects_level_label() {
        let extractor = LevelStatsExtractor::new(&Config::default());
        let probe = extractor.content_probe(&WorkUnit::level(6, 7));
        assert_eq!(
            probe,
            Script::TextEquals {
                selector: "#stat-level".to_string(),
                expected: "7".to_string(),
            }
        );
    }

    #[test]
    fn stabilize_is_skipped() {
        let extractor = LevelStatsExtractor::new(&Config::default());
        assert_eq!(extractor.stabilize_delay(&Timeouts::default()), Duration::ZERO);
    }
}
