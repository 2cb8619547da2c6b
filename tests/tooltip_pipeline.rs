mod support;

use serde_json::{json, Value as JsonValue};
use support::{bbox, fast_config, visible_signals, FakePage};
use wildrift_scraper::extractors::TooltipExtractor;
use wildrift_scraper::infrastructure::{Script, Target};
use wildrift_scraper::models::UnitId;
use wildrift_scraper::orchestrator::{enumerate_units, scrape_tooltips};
use wildrift_scraper::selectors::TIER_LIST_TRIGGERS;

const LIST_URL: &str = "https://site.test/item-list";

/// 三个装备图标；第二个的 class 里没有 JSON
fn item_list_page() -> FakePage {
    FakePage::new(|_, script| {
        Ok(match script {
            Script::DismissBanners { .. } => json!(1),
            Script::Count { selector } if selector == TIER_LIST_TRIGGERS => json!(3),
            Script::Count { .. } => json!(1),
            Script::Attribute { target, name } => match (name.as_str(), target.nth) {
                ("class", 1) => json!("ico-holder ajax-tooltip"),
                ("class", n) => json!(format!("ico-holder ajax-tooltip {{'t':'item','i':'{}'}}", 3000 + n)),
                ("data-sort", n) => json!(n.to_string()),
                ("data-id", _) => JsonValue::Null,
                _ => JsonValue::Null,
            },
            Script::ScrollIntoView { .. } => json!(true),
            Script::BoundingBox { target } => bbox(50.0 * target.nth as f64, 200.0, 32.0, 32.0),
            Script::RegionSignals { .. } => visible_signals(),
            Script::ContentReady(_) => json!(true),
            Script::TooltipSnapshot(_) => json!({
                "image": "/img/item.png",
                "name": "Doran's Blade",
                "cost": "450 gold",
                "stats": ["+8 Attack Damage"],
                "uniques": null,
                "kindClass": "tt"
            }),
            _ => JsonValue::Null,
        })
    })
}

#[tokio::test]
async fn enumeration_reads_class_json_once_per_unit() {
    let page = item_list_page();

    let units = enumerate_units(&page, TIER_LIST_TRIGGERS).await.unwrap();

    assert_eq!(units.len(), 3);
    assert_eq!(units[0].id(), UnitId::Parsed(json!("3000")));
    assert_eq!(units[0].code, Some(json!("item")));
    assert_eq!(units[1].id(), UnitId::Index(1));
    assert_eq!(units[2].data_sort.as_deref(), Some("2"));
    assert_eq!(units[2].data_id, None);
    assert_eq!(units[2].target(), Some(&Target::nth(TIER_LIST_TRIGGERS, 2)));
}

#[tokio::test]
async fn pipeline_writes_partial_and_final_files() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = fast_config();
    config.output.directory = dir.path().display().to_string();
    let page = item_list_page();

    let outcome = scrape_tooltips(&page, &config, LIST_URL, &TooltipExtractor::items())
        .await
        .unwrap();

    assert_eq!(page.navigations(), vec![LIST_URL]);
    assert_eq!(outcome.results.len(), 3);
    assert!(outcome.failed.is_empty());

    let written: Vec<JsonValue> = serde_json::from_str(
        &std::fs::read_to_string(dir.path().join("items_data.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(written.len(), 3);
    assert_eq!(written[0]["id"], json!("3000"));
    assert_eq!(written[0]["cost"], json!(450));
    assert_eq!(written[1]["sort"], json!("1"));
    assert!(dir.path().join("items_data_partial.json").exists());
}

#[tokio::test]
async fn missing_list_is_an_error() {
    let mut config = fast_config();
    config.output.directory = tempfile::tempdir().unwrap().path().display().to_string();
    let page = FakePage::new(|_, script| {
        Ok(match script {
            Script::Count { .. } => json!(0),
            _ => JsonValue::Null,
        })
    });

    let result = scrape_tooltips(&page, &config, LIST_URL, &TooltipExtractor::items()).await;

    assert!(result.is_err());
}
