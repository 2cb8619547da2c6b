mod support;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value as JsonValue};
use support::{bbox, fast_config, visible_signals, FakePage};
use wildrift_scraper::config::Config;
use wildrift_scraper::error::AppResult;
use wildrift_scraper::extractors::TooltipExtractor;
use wildrift_scraper::infrastructure::{Script, Target};
use wildrift_scraper::models::{ExtractionRecord, UnitId, WorkUnit};
use wildrift_scraper::orchestrator::BatchOrchestrator;
use wildrift_scraper::services::{CheckpointSink, InteractionDriver, JsonCheckpointWriter};

/// 记录每次部分检查点的内容
#[derive(Default)]
struct RecordingSink {
    partials: Mutex<Vec<Vec<UnitId>>>,
}

impl RecordingSink {
    fn partial_sizes(&self) -> Vec<usize> {
        self.partials.lock().unwrap().iter().map(Vec::len).collect()
    }
}

#[async_trait]
impl CheckpointSink<ExtractionRecord> for RecordingSink {
    async fn save_partial(&self, records: &[ExtractionRecord]) -> AppResult<()> {
        let ids = records.iter().map(|r| r.unit.clone()).collect();
        self.partials.lock().unwrap().push(ids);
        Ok(())
    }

    async fn save_final(&self, _records: &[ExtractionRecord]) -> AppResult<()> {
        Ok(())
    }
}

/// 每个触发元素都能悬停出 tooltip，`broken` 中的下标没有包围盒
fn list_page(broken: &'static [usize]) -> FakePage {
    let reads = Arc::new(AtomicUsize::new(0));
    FakePage::new(move |_, script| {
        Ok(match script {
            Script::ScrollIntoView { .. } => json!(true),
            Script::BoundingBox { target } if broken.contains(&target.nth) => JsonValue::Null,
            Script::BoundingBox { target } => bbox(40.0 * target.nth as f64, 100.0, 32.0, 32.0),
            Script::RegionSignals { .. } => visible_signals(),
            Script::ContentReady(_) => json!(true),
            Script::TooltipSnapshot(_) => {
                let n = reads.fetch_add(1, Ordering::SeqCst);
                json!({ "name": format!("Item {}", n), "stats": [] })
            }
            _ => JsonValue::Null,
        })
    })
}

fn units(n: usize) -> Vec<WorkUnit> {
    (0..n)
        .map(|i| WorkUnit::element(i, Target::nth(".ico-holder", i)))
        .collect()
}

fn config_with_batch(batch_size: usize) -> Config {
    let mut config = fast_config();
    config.scraping.batch_size = batch_size;
    config
}

#[tokio::test]
async fn checkpoints_every_k_units_and_at_end() {
    let config = config_with_batch(3);
    let page = list_page(&[]);
    let driver = InteractionDriver::new(&config);
    let sink = RecordingSink::default();

    let outcome = BatchOrchestrator::new(&config)
        .run_batch(&page, &driver, &units(7), &TooltipExtractor::items(), &sink)
        .await;

    assert_eq!(outcome.results.len(), 7);
    assert!(outcome.failed.is_empty());
    assert_eq!(sink.partial_sizes(), vec![3, 6, 7]);
}

#[tokio::test]
async fn batch_of_one_checkpoints_after_every_unit() {
    let config = config_with_batch(1);
    let page = list_page(&[]);
    let driver = InteractionDriver::new(&config);
    let sink = RecordingSink::default();

    BatchOrchestrator::new(&config)
        .run_batch(&page, &driver, &units(4), &TooltipExtractor::items(), &sink)
        .await;

    assert_eq!(sink.partial_sizes(), vec![1, 2, 3, 4]);
}

#[tokio::test]
async fn failed_unit_does_not_stop_the_batch() {
    let config = config_with_batch(3);
    let page = list_page(&[4]);
    let driver = InteractionDriver::new(&config);
    let sink = RecordingSink::default();

    let outcome = BatchOrchestrator::new(&config)
        .run_batch(&page, &driver, &units(7), &TooltipExtractor::items(), &sink)
        .await;

    assert_eq!(outcome.failed, vec![UnitId::Index(4)]);
    let ids: Vec<UnitId> = outcome.results.iter().map(|r| r.unit.clone()).collect();
    assert_eq!(
        ids,
        [0, 1, 2, 3, 5, 6].into_iter().map(UnitId::Index).collect::<Vec<_>>()
    );
    assert_eq!(sink.partial_sizes(), vec![3, 5, 6]);

    // 最后一次检查点就是全部成功结果
    let last = sink.partials.lock().unwrap().last().cloned().unwrap();
    assert_eq!(last, ids);
}

#[tokio::test]
async fn empty_input_writes_nothing() {
    let config = config_with_batch(3);
    let page = list_page(&[]);
    let driver = InteractionDriver::new(&config);
    let sink = RecordingSink::default();

    let outcome = BatchOrchestrator::new(&config)
        .run_batch(&page, &driver, &[], &TooltipExtractor::items(), &sink)
        .await;

    assert!(outcome.results.is_empty());
    assert!(sink.partial_sizes().is_empty());
}

#[tokio::test]
async fn json_partial_file_holds_all_results() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_with_batch(2);
    let page = list_page(&[]);
    let driver = InteractionDriver::new(&config);
    let writer = JsonCheckpointWriter::new(dir.path(), "items_data");

    let outcome = BatchOrchestrator::new(&config)
        .run_batch(&page, &driver, &units(5), &TooltipExtractor::items(), &writer)
        .await;
    writer.save_final(outcome.results.as_slice()).await.unwrap();

    let partial: Vec<JsonValue> =
        serde_json::from_str(&std::fs::read_to_string(writer.partial_path()).unwrap()).unwrap();
    let final_: Vec<JsonValue> =
        serde_json::from_str(&std::fs::read_to_string(writer.final_path()).unwrap()).unwrap();
    assert_eq!(partial.len(), 5);
    assert_eq!(partial, final_);
    assert_eq!(partial[0]["name"], json!("Item 0"));
    assert!(!dir.path().join("items_data_partial.json.tmp").exists());
}
