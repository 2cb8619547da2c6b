//! 列表页 tooltip 流水线（装备、符文）
//!
//! 导航 → 关横幅 → 等触发元素 → 枚举单元 → 批处理 → 写最终文件

use tracing::{info, warn};

use crate::config::Config;
use crate::error::AppResult;
use crate::extractors::{FieldExtractor, TooltipExtractor};
use crate::infrastructure::{PageController, Target, WaitUntil};
use crate::models::WorkUnit;
use crate::orchestrator::batch_processor::{BatchOrchestrator, BatchOutcome};
use crate::selectors::TIER_LIST_TRIGGERS;
use crate::services::{dismiss_banners, CheckpointSink, InteractionDriver, JsonCheckpointWriter};
use crate::utils::helpers::parse_json_from_class;

/// 枚举列表页上的全部触发元素
///
/// 每个元素的 class JSON、`data-sort`、`data-id` 只在这里读一次。
/// 单个元素读取失败时仍保留该单元（没有元数据）。
pub async fn enumerate_units(page: &dyn PageController, selector: &str) -> AppResult<Vec<WorkUnit>> {
    let total = page.count(selector).await?;
    let mut units = Vec::with_capacity(total);

    for i in 0..total {
        let target = Target::nth(selector, i);
        let mut unit = WorkUnit::element(i, target.clone());

        match read_unit_metadata(page, &target, &mut unit).await {
            Ok(()) => {}
            Err(e) => warn!("读取第 {} 个元素的属性失败: {}", i + 1, e),
        }
        units.push(unit);
    }

    Ok(units)
}

async fn read_unit_metadata(
    page: &dyn PageController,
    target: &Target,
    unit: &mut WorkUnit,
) -> AppResult<()> {
    let class = page.attribute(target, "class").await?;
    if let Some(data) = class.as_deref().and_then(parse_json_from_class) {
        unit.parsed_id = data.get("i").cloned();
        unit.code = data.get("t").cloned();
    }
    unit.data_sort = page.attribute(target, "data-sort").await?;
    unit.data_id = page.attribute(target, "data-id").await?;
    Ok(())
}

/// 抓取一个列表页的全部 tooltip
///
/// 入口页打不开或触发元素始终不出现时返回错误；单元失败只记入结果。
pub async fn scrape_tooltips(
    page: &dyn PageController,
    config: &Config,
    list_url: &str,
    extractor: &TooltipExtractor,
) -> AppResult<BatchOutcome> {
    let timeouts = &config.timeouts;
    let label = extractor.kind().label();

    info!("🌐 打开 {} 列表: {}", label, list_url);
    page.navigate(list_url, WaitUntil::DomContentLoaded, timeouts.navigation())
        .await?;
    dismiss_banners(page, timeouts.banner_click()).await;
    page.wait_for_selector(
        &Target::new(TIER_LIST_TRIGGERS),
        timeouts.list_ready(),
        timeouts.poll_interval(),
    )
    .await?;

    let units = enumerate_units(page, TIER_LIST_TRIGGERS).await?;
    info!("✓ 找到 {} 个 {}", units.len(), label);

    let writer = JsonCheckpointWriter::new(&config.output.directory, &format!("{}s_data", label));
    let driver = InteractionDriver::new(config);
    let orchestrator = BatchOrchestrator::new(config);

    let outcome = orchestrator
        .run_batch(page, &driver, &units, extractor, &writer)
        .await;
    writer.save_final(outcome.results.as_slice()).await?;

    Ok(outcome)
}
