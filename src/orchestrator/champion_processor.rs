//! 英雄详情流水线
//!
//! ## 职责
//!
//! - `ensure_stats_open`：物理点击"显示属性"，多次尝试，最后强制显示
//! - `scrape_champion`：一个英雄页面的完整抓取（资料快照 + 逐级属性）
//! - `run_champion_batch`：按 guides.txt 逐个英雄抓取，有界并发，协调任务单写检查点
//!
//! 每个英雄使用独立页面；页面上的操作顺序执行。

use std::collections::{BTreeMap, HashMap};
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use futures::FutureExt;
use serde_json::Value as JsonValue;
use tokio::sync::Semaphore;
use tokio::task::{Id as TaskId, JoinError, JoinSet};
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::extractors::LevelStatsExtractor;
use crate::infrastructure::{poll_until, PageController, Script, Target, WaitUntil};
use crate::models::{ChampionProfile, ChampionRecord, LevelStats, UnitOutcome, WorkUnit};
use crate::selectors::champion::{LEVEL_RANGE, SHOW_STATS, STATS_SECTION};
use crate::services::{dismiss_banners, CheckpointSink, InteractionDriver, VisibilityOracle};
use crate::utils::helpers::slug_from_url;
use crate::workflow::ExtractionEngine;

/// 为每个任务提供新页面
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn open_page(&self) -> AppResult<Box<dyn PageController>>;
}

/// 确保属性面板已打开
///
/// 已经打开时直接返回；否则物理点击按钮，直到 `#range` 出现或面板可见，
/// 全部尝试失败后强制显示面板。
pub async fn ensure_stats_open(
    page: &dyn PageController,
    driver: &InteractionDriver,
    config: &Config,
) -> AppResult<()> {
    let timeouts = &config.timeouts;
    let oracle = VisibilityOracle::new(config);
    let section = Target::new(STATS_SECTION);
    let range = Target::new(LEVEL_RANGE);

    if let Err(e) = page
        .wait_for_selector(&section, timeouts.stats_section_attached(), timeouts.poll_interval())
        .await
    {
        debug!("属性面板未出现: {}", e);
    }
    if oracle.is_ready(page, &section).await.unwrap_or(false) {
        return Ok(());
    }

    sleep(timeouts.before_first_click()).await;

    let attempts = config.retries.stats_panel_open.max(1);
    let oracle_ref = &oracle;
    let section_ref = &section;
    for attempt in 1..=attempts {
        driver.trigger(page, &Target::new(SHOW_STATS)).await;

        let opened = poll_until(
            "属性面板打开",
            timeouts.stats_panel_open(),
            timeouts.poll_interval(),
            move || async move {
                Ok(page.count(LEVEL_RANGE).await? > 0 || oracle_ref.is_ready(page, section_ref).await?)
            },
        )
        .await;
        if opened.is_ok() {
            debug!("第 {} 次点击后属性面板已打开", attempt);
            sleep(timeouts.after_open()).await;
            return Ok(());
        }

        driver.reset_pointer(page).await?;
        sleep(timeouts.between_open_attempts()).await;
    }

    if !oracle.is_ready(page, &section).await.unwrap_or(false) {
        warn!("⚠️ {} 次点击后属性面板仍未打开，强制显示", attempts);
        page.evaluate(&Script::ForceDisplay {
            selector: STATS_SECTION.to_string(),
        })
        .await?;
        if let Err(e) = page
            .wait_for_selector(&range, timeouts.stats_panel_open(), timeouts.poll_interval())
            .await
        {
            debug!("强制显示后仍没有等级滑块: {}", e);
        }
    }

    sleep(timeouts.after_open()).await;
    Ok(())
}

/// 抓取一个英雄页面
pub async fn scrape_champion(
    page: &dyn PageController,
    config: &Config,
    url: &str,
) -> AppResult<ChampionRecord> {
    let timeouts = &config.timeouts;
    let driver = InteractionDriver::new(config);

    page.navigate(url, WaitUntil::DomContentLoaded, timeouts.navigation())
        .await?;
    dismiss_banners(page, timeouts.banner_click()).await;
    ensure_stats_open(page, &driver, config).await?;

    let profile: ChampionProfile = match page.evaluate(&Script::ChampionProfile).await? {
        JsonValue::Null => ChampionProfile::default(),
        value => serde_json::from_value(value)?,
    };

    let engine = ExtractionEngine::new(config);
    let extractor = LevelStatsExtractor::new(config);
    let mut stats_by_level = Vec::new();
    let mut failed_levels = Vec::new();

    for (index, level) in (1..=config.scraping.max_level).enumerate() {
        let unit = WorkUnit::level(index, level);
        match engine.extract(page, &driver, &unit, &extractor).await {
            UnitOutcome::Success(record) => {
                let stats: LevelStats = serde_json::from_value(JsonValue::Object(record.fields))?;
                stats_by_level.push(stats);
            }
            UnitOutcome::Failed(_) => failed_levels.push(level),
        }
    }

    if !failed_levels.is_empty() {
        warn!("⚠️ {} 的等级 {:?} 读取失败", slug_from_url(url), failed_levels);
    }

    Ok(ChampionRecord {
        champion: slug_from_url(url),
        source: url.to_string(),
        scraped_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        stats_by_level,
        profile,
        failed_levels,
    })
}

/// 英雄批处理结果
#[derive(Debug, Default)]
pub struct ChampionBatchOutcome {
    /// 按输入顺序排列
    pub results: Vec<ChampionRecord>,
    pub failed: Vec<String>,
    pub elapsed: Duration,
}

impl ChampionBatchOutcome {
    /// 平均每个英雄耗时（秒）
    pub fn average_secs(&self) -> f64 {
        if self.results.is_empty() {
            0.0
        } else {
            self.elapsed.as_secs_f64() / self.results.len() as f64
        }
    }
}

type TaskOutput = (usize, String, AppResult<ChampionRecord>, Duration);

/// 按列表逐个抓取英雄
///
/// 最多 `scraping.max_concurrent_pages` 个页面同时工作。只有本函数（协调任务）
/// 汇总结果并写检查点。
pub async fn run_champion_batch(
    source: Arc<dyn PageSource>,
    config: Arc<Config>,
    urls: &[String],
    sink: &dyn CheckpointSink<ChampionRecord>,
) -> ChampionBatchOutcome {
    let started = Instant::now();
    let total = urls.len();
    let batch_size = config.scraping.batch_size.max(1);
    let semaphore = Arc::new(Semaphore::new(config.scraping.max_concurrent_pages.max(1)));
    let mut tasks: JoinSet<TaskOutput> = JoinSet::new();
    let mut pending: HashMap<TaskId, (usize, String)> = HashMap::new();

    for (index, url) in urls.iter().cloned().enumerate() {
        let semaphore = semaphore.clone();
        let source = source.clone();
        let config = config.clone();
        let key = (index, url.clone());

        let handle = tasks.spawn(async move {
            let _permit = semaphore.acquire_owned().await;
            let start = Instant::now();
            info!("[英雄 {}/{}] 🔍 {}", index + 1, total, slug_from_url(&url));

            let result = AssertUnwindSafe(scrape_with_new_page(source.as_ref(), &config, &url))
                .catch_unwind()
                .await
                .unwrap_or_else(|_| Err(AppError::Other("抓取任务意外中止".to_string())));
            (index, url, result, start.elapsed())
        });
        pending.insert(handle.id(), key);
    }

    let mut completed: BTreeMap<usize, ChampionRecord> = BTreeMap::new();
    let mut failed: BTreeMap<usize, String> = BTreeMap::new();
    let mut finished = 0usize;

    while let Some(joined) = tasks.join_next_with_id().await {
        let Some((index, url, result, took)) = settle(joined, &mut pending) else {
            continue;
        };
        finished += 1;

        match result {
            Ok(record) => {
                info!(
                    "[英雄 {}/{}] ✅ {} 完成 - {:.1}s",
                    index + 1,
                    total,
                    record.champion,
                    took.as_secs_f64()
                );
                completed.insert(index, record);
            }
            Err(e) => {
                error!("[英雄 {}/{}] ❌ {}: {}", index + 1, total, slug_from_url(&url), e);
                failed.insert(index, url);
            }
        }

        if finished % batch_size == 0 || finished == total {
            let snapshot: Vec<ChampionRecord> = completed.values().cloned().collect();
            if let Err(e) = sink.save_partial(&snapshot).await {
                error!("保存进度失败: {}", e);
            }
        }
    }

    let outcome = ChampionBatchOutcome {
        results: completed.into_values().collect(),
        failed: failed.into_values().collect(),
        elapsed: started.elapsed(),
    };
    if !outcome.failed.is_empty() {
        warn!("⚠️ {} 个英雄失败: {:?}", outcome.failed.len(), outcome.failed);
    }
    outcome
}

/// 把任务结果映射回它的英雄
///
/// 任务本身失败（被取消或逃出 `catch_unwind` 的 panic）时，仍记为该英雄失败。
fn settle(
    joined: Result<(TaskId, TaskOutput), JoinError>,
    pending: &mut HashMap<TaskId, (usize, String)>,
) -> Option<TaskOutput> {
    match joined {
        Ok((id, output)) => {
            pending.remove(&id);
            Some(output)
        }
        Err(e) => {
            let Some((index, url)) = pending.remove(&e.id()) else {
                error!("英雄任务执行失败（未知任务）: {}", e);
                return None;
            };
            error!("英雄任务执行失败: {}", e);
            let reason = AppError::Other(format!("抓取任务意外中止: {}", e));
            Some((index, url, Err(reason), Duration::ZERO))
        }
    }
}

async fn scrape_with_new_page(
    source: &dyn PageSource,
    config: &Config,
    url: &str,
) -> AppResult<ChampionRecord> {
    let page = source.open_page().await?;
    let result = scrape_champion(page.as_ref(), config, url).await;
    page.close_quietly().await;
    result
}
