//! 数值归一化
//!
//! 页面上的数值都是文本（"1,234"、"2.5 (+0.1)"、"N/A"）。能解析就转成数字，
//! 不能解析就保留去空白后的原文，永远不产生 null。

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// 数字或原文
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumberOrText {
    Integer(i64),
    Number(f64),
    Text(String),
}

impl NumberOrText {
    fn from_f64(value: f64, original: &str) -> Self {
        if !value.is_finite() {
            return NumberOrText::Text(original.to_string());
        }
        if value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
            NumberOrText::Integer(value as i64)
        } else {
            NumberOrText::Number(value)
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            NumberOrText::Integer(n) => Some(*n as f64),
            NumberOrText::Number(n) => Some(*n),
            NumberOrText::Text(_) => None,
        }
    }

    pub fn into_json(self) -> JsonValue {
        match self {
            NumberOrText::Integer(n) => JsonValue::from(n),
            NumberOrText::Number(n) => JsonValue::from(n),
            NumberOrText::Text(s) => JsonValue::String(s),
        }
    }
}

static FLOAT_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?")
        .expect("hardcoded regex pattern is valid")
});

/// 去掉千分位后取最长的浮点前缀（同 `parseFloat`）
///
/// `"1,234"` -> 1234，`"2.5 (+0.1)"` -> 2.5，`"N/A"` -> `"N/A"`
pub fn parse_number_text(text: &str) -> NumberOrText {
    let trimmed = text.trim();
    let cleaned = trimmed.replace(',', "");
    FLOAT_PREFIX
        .find(&cleaned)
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .map(|n| NumberOrText::from_f64(n, trimmed))
        .unwrap_or_else(|| NumberOrText::Text(trimmed.to_string()))
}

/// 去掉所有非数字字符后解析整数（价格规则）
///
/// `"3,100 gold"` -> 3100，`"Free"` -> `"Free"`
pub fn parse_digits(text: &str) -> NumberOrText {
    let trimmed = text.trim();
    let digits: String = trimmed.chars().filter(|c| c.is_ascii_digit()).collect();
    digits
        .parse::<i64>()
        .map(NumberOrText::Integer)
        .unwrap_or_else(|_| NumberOrText::Text(trimmed.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thousands_separator_is_stripped() {
        assert_eq!(parse_number_text("1,234"), NumberOrText::Integer(1234));
    }

    #[test]
    fn unparseable_text_is_kept() {
        assert_eq!(parse_number_text(" N/A "), NumberOrText::Text("N/A".to_string()));
        assert_eq!(parse_number_text(""), NumberOrText::Text(String::new()));
    }

    #[test]
    fn leading_prefix_wins() {
        assert_eq!(parse_number_text("2.5 (+0.1)"), NumberOrText::Number(2.5));
        assert_eq!(parse_number_text("0.625"), NumberOrText::Number(0.625));
        assert_eq!(parse_number_text("-3"), NumberOrText::Integer(-3));
        assert_eq!(parse_number_text(".5%"), NumberOrText::Number(0.5));
    }

    #[test]
    fn exponent_needs_digits() {
        assert_eq!(parse_number_text("12e"), NumberOrText::Integer(12));
        assert_eq!(parse_number_text("1e3"), NumberOrText::Integer(1000));
    }

    #[test]
    fn digits_rule_for_cost() {
        assert_eq!(parse_digits("3,100"), NumberOrText::Integer(3100));
        assert_eq!(parse_digits("Cost: 450 gold"), NumberOrText::Integer(450));
        assert_eq!(parse_digits(" Free "), NumberOrText::Text("Free".to_string()));
    }

    #[test]
    fn serializes_untagged() {
        let json = serde_json::to_string(&vec![
            NumberOrText::Integer(1),
            NumberOrText::Number(0.5),
            NumberOrText::Text("x".to_string()),
        ])
        .unwrap();
        assert_eq!(json, r#"[1,0.5,"x"]"#);
    }
}
