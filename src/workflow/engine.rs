//! 提取引擎 - 流程层
//!
//! 定义"一个单元"的完整提取流程：
//! 激活 → 稳定停顿 → 等区域可见 → 等内容就绪 → 一次快照读取 → 校验必需字段。
//! 任一步失败就复位鼠标、退避、整轮重来，最多 `retries.extraction` 次。
//!
//! 不持有任何资源（page），由调用方传入。

use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, warn};

use crate::config::{Config, Timeouts};
use crate::error::{AppError, AppResult};
use crate::extractors::FieldExtractor;
use crate::infrastructure::PageController;
use crate::models::record::is_present;
use crate::models::{ExtractionRecord, UnitOutcome, WorkUnit};
use crate::services::{InteractionDriver, VisibilityOracle};

/// 提取引擎
pub struct ExtractionEngine {
    oracle: VisibilityOracle,
    timeouts: Timeouts,
    retries: usize,
}

impl ExtractionEngine {
    pub fn new(config: &Config) -> Self {
        Self {
            oracle: VisibilityOracle::new(config),
            timeouts: config.timeouts.clone(),
            retries: config.retries.extraction.max(1),
        }
    }

    /// 提取一个单元
    ///
    /// 总是返回结果：成功记录，或者用尽重试后的失败标识。
    pub async fn extract(
        &self,
        page: &dyn PageController,
        driver: &InteractionDriver,
        unit: &WorkUnit,
        extractor: &dyn FieldExtractor,
    ) -> UnitOutcome {
        let label = extractor.kind().label();

        for attempt in 1..=self.retries {
            match self.attempt(page, driver, unit, extractor).await {
                Ok(record) => {
                    debug!("[{} {}] 第 {} 次尝试成功", label, unit.id(), attempt);
                    return UnitOutcome::Success(record);
                }
                Err(e) => {
                    warn!(
                        "⚠️ [{} {}] 第 {}/{} 次尝试失败: {}",
                        label,
                        unit.id(),
                        attempt,
                        self.retries,
                        e
                    );
                    if let Err(e) = driver.reset_pointer(page).await {
                        debug!("复位鼠标失败: {}", e);
                    }
                    if attempt < self.retries {
                        sleep(self.timeouts.retry_backoff()).await;
                    }
                }
            }
        }

        UnitOutcome::Failed(unit.id())
    }

    async fn attempt(
        &self,
        page: &dyn PageController,
        driver: &InteractionDriver,
        unit: &WorkUnit,
        extractor: &dyn FieldExtractor,
    ) -> AppResult<ExtractionRecord> {
        extractor.activate(page, driver, unit).await?;

        let stabilize = extractor.stabilize_delay(&self.timeouts);
        if stabilize > Duration::ZERO {
            sleep(stabilize).await;
        }

        self.oracle
            .wait_until_ready(page, &extractor.region(unit), self.timeouts.region_visible())
            .await?;
        self.oracle
            .wait_until_content_ready(
                page,
                &extractor.content_probe(unit),
                extractor.content_timeout(&self.timeouts),
            )
            .await?;

        let fields = extractor.read(page, unit).await?;

        let mut record = ExtractionRecord::new(unit.id());
        record.fields = unit.metadata();
        record.fields.extend(fields);

        for field in extractor.required_fields() {
            if !record.get(field).map(is_present).unwrap_or(false) {
                return Err(AppError::missing_field(*field));
            }
        }

        Ok(record)
    }
}
