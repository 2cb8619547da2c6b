//! 工作单元
//!
//! 一个单元要么是同质集合中的第 n 个元素（tooltip 触发器），
//! 要么是一个英雄等级。枚举之后不再修改。

use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value as JsonValue};

use crate::infrastructure::Target;

/// 单元标识：解析出的 id，没有时退回位置下标
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum UnitId {
    Parsed(JsonValue),
    Index(usize),
    Level(u32),
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnitId::Parsed(JsonValue::String(s)) => write!(f, "{}", s),
            UnitId::Parsed(v) => write!(f, "{}", v),
            UnitId::Index(i) => write!(f, "#{}", i),
            UnitId::Level(l) => write!(f, "Lv{}", l),
        }
    }
}

/// 单元地址
#[derive(Debug, Clone, PartialEq)]
pub enum UnitAddress {
    Element(Target),
    Level(u32),
}

/// 工作单元
#[derive(Debug, Clone, PartialEq)]
pub struct WorkUnit {
    /// 在输入序列中的位置（从 0 开始）
    pub index: usize,
    pub address: UnitAddress,
    /// class 中 JSON 的 `i`
    pub parsed_id: Option<JsonValue>,
    /// class 中 JSON 的 `t`
    pub code: Option<JsonValue>,
    pub data_sort: Option<String>,
    pub data_id: Option<String>,
}

impl WorkUnit {
    pub fn element(index: usize, target: Target) -> Self {
        Self {
            index,
            address: UnitAddress::Element(target),
            parsed_id: None,
            code: None,
            data_sort: None,
            data_id: None,
        }
    }

    pub fn level(index: usize, level: u32) -> Self {
        Self {
            index,
            address: UnitAddress::Level(level),
            parsed_id: None,
            code: None,
            data_sort: None,
            data_id: None,
        }
    }

    /// 失败列表中使用的标识
    pub fn id(&self) -> UnitId {
        match (&self.address, &self.parsed_id) {
            (UnitAddress::Level(level), _) => UnitId::Level(*level),
            (_, Some(id)) if !id.is_null() => UnitId::Parsed(id.clone()),
            _ => UnitId::Index(self.index),
        }
    }

    pub fn target(&self) -> Option<&Target> {
        match &self.address {
            UnitAddress::Element(target) => Some(target),
            UnitAddress::Level(_) => None,
        }
    }

    pub fn level_number(&self) -> Option<u32> {
        match self.address {
            UnitAddress::Level(level) => Some(level),
            UnitAddress::Element(_) => None,
        }
    }

    /// 枚举时读到的元数据，作为每条记录的开头字段
    pub fn metadata(&self) -> Map<String, JsonValue> {
        let mut fields = Map::new();
        if let Some(id) = &self.parsed_id {
            fields.insert("id".to_string(), id.clone());
        }
        if let Some(code) = &self.code {
            fields.insert("code".to_string(), code.clone());
        }
        if let UnitAddress::Element(_) = self.address {
            fields.insert("sort".to_string(), opt_string(&self.data_sort));
            fields.insert("data_id".to_string(), opt_string(&self.data_id));
        }
        if let UnitAddress::Level(level) = self.address {
            fields.insert("level".to_string(), JsonValue::from(level));
        }
        fields
    }
}

fn opt_string(value: &Option<String>) -> JsonValue {
    value
        .as_ref()
        .map(|s| JsonValue::String(s.clone()))
        .unwrap_or(JsonValue::Null)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn id_prefers_parsed_identifier() {
        let mut unit = WorkUnit::element(4, Target::nth(".ico-holder", 4));
        assert_eq!(unit.id(), UnitId::Index(4));
        unit.parsed_id = Some(json!(1023));
        assert_eq!(unit.id(), UnitId::Parsed(json!(1023)));
    }

    #[test]
    fn level_units_are_identified_by_level() {
        let unit = WorkUnit::level(0, 1);
        assert_eq!(unit.id(), UnitId::Level(1));
        assert_eq!(unit.metadata().get("level"), Some(&json!(1)));
    }

    #[test]
    fn element_metadata_keeps_null_attributes() {
        let mut unit = WorkUnit::element(0, Target::new(".x"));
        unit.code = Some(json!("item"));
        unit.data_sort = Some("12".to_string());
        let meta = unit.metadata();
        assert_eq!(meta.get("code"), Some(&json!("item")));
        assert_eq!(meta.get("sort"), Some(&json!("12")));
        assert_eq!(meta.get("data_id"), Some(&JsonValue::Null));
    }
}
