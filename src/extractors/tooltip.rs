//! 悬停 tooltip 提取（装备、符文）

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Map, Value as JsonValue};

use crate::error::{AppError, AppResult, ExtractionError};
use crate::extractors::{ContentKind, FieldExtractor};
use crate::infrastructure::{ContentProbe, PageController, Script, Target};
use crate::models::{parse_digits, WorkUnit};
use crate::selectors::{TooltipSelectors, RUNE_KIND_CLASS};
use crate::services::InteractionDriver;

/// 页面返回的 tooltip 快照
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TooltipSnapshot {
    pub image: Option<String>,
    pub name: Option<String>,
    pub cost: Option<String>,
    pub stats: Vec<String>,
    pub uniques: Option<String>,
    pub kind_class: Option<String>,
}

/// tooltip 提取策略
pub struct TooltipExtractor {
    kind: ContentKind,
    selectors: TooltipSelectors,
}

impl TooltipExtractor {
    pub fn items() -> Self {
        Self {
            kind: ContentKind::Item,
            selectors: TooltipSelectors::default(),
        }
    }

    pub fn runes() -> Self {
        Self {
            kind: ContentKind::Rune,
            selectors: TooltipSelectors::default(),
        }
    }

    /// 快照 -> 输出字段
    pub fn fields_from_snapshot(&self, snapshot: TooltipSnapshot) -> Map<String, JsonValue> {
        let mut fields = Map::new();
        if let Some(image) = snapshot.image {
            fields.insert("image".to_string(), JsonValue::String(image));
        }
        if let Some(name) = snapshot.name {
            fields.insert("name".to_string(), JsonValue::String(name));
        }

        match self.kind {
            ContentKind::Item => {
                if let Some(cost) = snapshot.cost {
                    fields.insert("cost".to_string(), parse_digits(&cost).into_json());
                }
                fields.insert("stats".to_string(), JsonValue::from(snapshot.stats));
                if let Some(uniques) = snapshot.uniques {
                    fields.insert("uniques".to_string(), JsonValue::String(uniques));
                }
            }
            _ => {
                if let Some(description) = snapshot.uniques {
                    fields.insert("description".to_string(), JsonValue::String(description));
                }
                if let Some(class) = snapshot.kind_class {
                    let kind = if class.split_whitespace().any(|c| c == RUNE_KIND_CLASS) {
                        "rune"
                    } else {
                        "unknown"
                    };
                    fields.insert("type".to_string(), JsonValue::String(kind.to_string()));
                }
            }
        }
        fields
    }
}

#[async_trait]
impl FieldExtractor for TooltipExtractor {
    fn kind(&self) -> ContentKind {
        self.kind
    }

    fn region(&self, _unit: &WorkUnit) -> Target {
        Target::new(self.selectors.container.clone())
    }

    async fn activate(
        &self,
        page: &dyn PageController,
        driver: &InteractionDriver,
        unit: &WorkUnit,
    ) -> AppResult<()> {
        let target = unit
            .target()
            .ok_or_else(|| AppError::Other(format!("单元 {} 不是元素单元", unit.id())))?;
        driver.hover(page, target).await
    }

    fn content_probe(&self, _unit: &WorkUnit) -> Script {
        let any_of = match self.kind {
            ContentKind::Item => vec![self.selectors.stats.clone(), self.selectors.uniques.clone()],
            _ => Vec::new(),
        };
        Script::ContentReady(ContentProbe {
            region: self.selectors.container.clone(),
            title: self.selectors.title.clone(),
            any_of,
        })
    }

    async fn read(
        &self,
        page: &dyn PageController,
        _unit: &WorkUnit,
    ) -> AppResult<Map<String, JsonValue>> {
        let value = page
            .evaluate(&Script::TooltipSnapshot(self.selectors.clone()))
            .await?;
        if value.is_null() {
            return Err(AppError::Extraction(ExtractionError::MalformedSnapshot {
                message: format!("{} 不存在", self.selectors.container),
            }));
        }
        let snapshot: TooltipSnapshot = serde_json::from_value(value).map_err(|e| {
            AppError::Extraction(ExtractionError::MalformedSnapshot {
                message: e.to_string(),
            })
        })?;
        Ok(self.fields_from_snapshot(snapshot))
    }

    fn required_fields(&self) -> &'static [&'static str] {
        &["name"]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn snapshot() -> TooltipSnapshot {
        TooltipSnapshot {
            image: Some("/img/ie.png".to_string()),
            name: Some("Infinity Edge".to_string()),
            cost: Some("3,400".to_string()),
            stats: vec!["+60 Attack Damage".to_string()],
            uniques: Some("<b>UNIQUE</b>".to_string()),
            kind_class: Some("tt tt--item".to_string()),
        }
    }

    #[test]
    fn item_fields() {
        let fields = TooltipExtractor::items().fields_from_snapshot(snapshot());
        assert_eq!(fields["cost"], json!(3400));
        assert_eq!(fields["stats"], json!(["+60 Attack Damage"]));
        assert_eq!(fields["uniques"], json!("<b>UNIQUE</b>"));
        assert!(fields.get("type").is_none());
    }

    #[test]
    fn rune_fields() {
        let mut snap = snapshot();
        snap.kind_class = Some("tt tt--rune".to_string());
        let fields = TooltipExtractor::runes().fields_from_snapshot(snap);
        assert_eq!(fields["description"], json!("<b>UNIQUE</b>"));
        assert_eq!(fields["type"], json!("rune"));
        assert!(fields.get("cost").is_none());
        assert!(fields.get("stats").is_none());
    }

    #[test]
    fn unknown_rune_class() {
        let mut snap = snapshot();
        snap.kind_class = Some("tt".to_string());
        let fields = TooltipExtractor::runes().fields_from_snapshot(snap);
        assert_eq!(fields["type"], json!("unknown"));
    }

    #[test]
    fn rune_probe_needs_title_only() {
        let unit = WorkUnit::element(0, Target::new(".x"));
        match TooltipExtractor::runes().content_probe(&unit) {
            Script::ContentReady(probe) => assert!(probe.any_of.is_empty()),
            other => panic!("unexpected probe {:?}", other),
        }
        match TooltipExtractor::items().content_probe(&unit) {
            Script::ContentReady(probe) => assert_eq!(probe.any_of.len(), 2),
            other => panic!("unexpected probe {:?}", other),
        }
    }
}
