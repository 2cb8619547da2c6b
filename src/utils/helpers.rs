//! 小工具函数

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value as JsonValue;
use url::Url;

static CLASS_JSON: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{.*?\}").expect("hardcoded regex pattern is valid"));

/// 从 class 属性中取出内嵌的 JSON 对象（允许单引号）
///
/// `"ico-holder ajax-tooltip {t:'item',i:'1001'}"` 这类写法里 key 没有引号时返回 `None`。
pub fn parse_json_from_class(class_name: &str) -> Option<JsonValue> {
    let found = CLASS_JSON.find(class_name)?;
    let normalized = found.as_str().replace('\'', "\"");
    serde_json::from_str(&normalized).ok()
}

/// URL 路径最后一段，解析失败时为 `"unknown"`
pub fn slug_from_url(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|u| {
            u.path_segments()
                .and_then(|segments| segments.filter(|s| !s.is_empty()).last().map(str::to_string))
        })
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn class_json_with_single_quotes() {
        let data = parse_json_from_class("ico-holder ajax-tooltip {'t':'item','i':'1001'}").unwrap();
        assert_eq!(data["i"], json!("1001"));
        assert_eq!(data["t"], json!("item"));
    }

    #[test]
    fn class_without_json() {
        assert!(parse_json_from_class("ico-holder ajax-tooltip").is_none());
        assert!(parse_json_from_class("x {not json}").is_none());
        assert!(parse_json_from_class("").is_none());
    }

    #[test]
    fn slug_is_last_path_segment() {
        assert_eq!(slug_from_url("https://www.wildriftfire.com/guide/yasuo"), "yasuo");
        assert_eq!(slug_from_url("https://www.wildriftfire.com/guide/yasuo/"), "yasuo");
        assert_eq!(slug_from_url("https://www.wildriftfire.com/"), "unknown");
        assert_eq!(slug_from_url("not a url"), "unknown");
    }
}
