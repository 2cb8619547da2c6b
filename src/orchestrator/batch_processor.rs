//! 批处理编排器 - 编排层
//!
//! ## 职责
//!
//! 1. **顺序处理**：严格按输入顺序逐个提取单元
//! 2. **节流**：每个单元之后复位鼠标并停顿
//! 3. **检查点**：每 K 个单元以及最后一个单元之后，整体覆盖部分检查点
//! 4. **兜底**：单元内的意外（panic）被捕获并记为失败，继续下一个
//! 5. **汇总**：结束时一次性列出所有失败标识

use std::panic::AssertUnwindSafe;
use std::time::Duration;

use futures::FutureExt;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::extractors::FieldExtractor;
use crate::infrastructure::PageController;
use crate::models::{ExtractionRecord, UnitId, UnitOutcome, WorkUnit};
use crate::services::{CheckpointSink, InteractionDriver};
use crate::utils::logging::truncate_text;
use crate::workflow::ExtractionEngine;

/// 一次批处理运行中的累积状态
#[derive(Debug, Default)]
pub struct BatchState {
    pub results: Vec<ExtractionRecord>,
    pub failed: Vec<UnitId>,
    processed: usize,
}

impl BatchState {
    fn record(&mut self, outcome: UnitOutcome) {
        match outcome {
            UnitOutcome::Success(record) => self.results.push(record),
            UnitOutcome::Failed(id) => self.failed.push(id),
        }
        self.processed += 1;
    }

    pub fn processed(&self) -> usize {
        self.processed
    }
}

/// 批处理结果
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub results: Vec<ExtractionRecord>,
    pub failed: Vec<UnitId>,
}

impl From<BatchState> for BatchOutcome {
    fn from(state: BatchState) -> Self {
        Self {
            results: state.results,
            failed: state.failed,
        }
    }
}

/// 批处理编排器
pub struct BatchOrchestrator {
    engine: ExtractionEngine,
    batch_size: usize,
    between_actions: Duration,
}

impl BatchOrchestrator {
    pub fn new(config: &Config) -> Self {
        Self {
            engine: ExtractionEngine::new(config),
            batch_size: config.scraping.batch_size.max(1),
            between_actions: config.timeouts.between_actions(),
        }
    }

    /// 是否在处理完第 `processed` 个单元后写检查点
    pub fn is_checkpoint(&self, processed: usize, total: usize) -> bool {
        processed % self.batch_size == 0 || processed == total
    }

    /// 顺序处理全部单元
    ///
    /// # 参数
    /// - `page`: 单元所在页面
    /// - `driver`: 该页面的交互驱动
    /// - `units`: 按顺序处理的单元
    /// - `extractor`: 字段提取策略
    /// - `sink`: 部分检查点的接收方
    pub async fn run_batch(
        &self,
        page: &dyn PageController,
        driver: &InteractionDriver,
        units: &[WorkUnit],
        extractor: &dyn FieldExtractor,
        sink: &dyn CheckpointSink<ExtractionRecord>,
    ) -> BatchOutcome {
        let total = units.len();
        let label = extractor.kind().label();
        let mut state = BatchState::default();

        info!("📋 共 {} 个 {} 待处理", total, label);

        for (i, unit) in units.iter().enumerate() {
            let outcome = AssertUnwindSafe(self.engine.extract(page, driver, unit, extractor))
                .catch_unwind()
                .await
                .unwrap_or_else(|_| {
                    error!("❌ [{} {}/{}] 处理时发生意外错误", label, i + 1, total);
                    UnitOutcome::Failed(unit.id())
                });

            match &outcome {
                UnitOutcome::Success(record) => info!(
                    "✓ [{} {}/{}] {}",
                    label,
                    i + 1,
                    total,
                    truncate_text(record.text("name").unwrap_or(""), 40)
                ),
                UnitOutcome::Failed(id) => warn!("❌ [{} {}/{}] 失败: {}", label, i + 1, total, id),
            }
            state.record(outcome);

            if self.is_checkpoint(state.processed(), total) {
                if let Err(e) = sink.save_partial(&state.results).await {
                    error!("保存进度失败: {}", e);
                }
            }

            if let Err(e) = driver.reset_pointer(page).await {
                debug!("复位鼠标失败: {}", e);
            }
            sleep(self.between_actions).await;
        }

        if !state.failed.is_empty() {
            let ids: Vec<String> = state.failed.iter().map(|id| id.to_string()).collect();
            warn!("⚠️ {} 个 {} 失败: [{}]", ids.len(), label, ids.join(", "));
        }

        state.into()
    }
}
