//! 提取结果

use serde::Serialize;
use serde_json::{Map, Value as JsonValue};

use crate::models::unit::UnitId;

/// 一次成功提取的结果
///
/// 每次尝试都从空记录开始；尝试失败时整条丢弃。序列化时只输出字段。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractionRecord {
    #[serde(skip)]
    pub unit: UnitId,
    #[serde(flatten)]
    pub fields: Map<String, JsonValue>,
}

impl ExtractionRecord {
    pub fn new(unit: UnitId) -> Self {
        Self {
            unit,
            fields: Map::new(),
        }
    }

    pub fn get(&self, field: &str) -> Option<&JsonValue> {
        self.fields.get(field)
    }

    /// 字段的字符串值（用于日志）
    pub fn text(&self, field: &str) -> Option<&str> {
        self.fields.get(field).and_then(JsonValue::as_str)
    }
}

/// 单元的最终结果：恰好是二者之一
#[derive(Debug, Clone, PartialEq)]
pub enum UnitOutcome {
    Success(ExtractionRecord),
    Failed(UnitId),
}

impl UnitOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, UnitOutcome::Success(_))
    }
}

/// 值是否"非空"：null、空串、空数组、空对象都算空
pub fn is_present(value: &JsonValue) -> bool {
    match value {
        JsonValue::Null => false,
        JsonValue::String(s) => !s.trim().is_empty(),
        JsonValue::Array(a) => !a.is_empty(),
        JsonValue::Object(o) => !o.is_empty(),
        JsonValue::Bool(_) | JsonValue::Number(_) => true,
    }
}
