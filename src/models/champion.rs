//! 英雄数据模型

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::value::NumberOrText;

/// 技能
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Ability {
    pub key: Option<String>,
    pub name: Option<String>,
    pub cooldown: Vec<String>,
    pub cost: Vec<String>,
    pub icon: Option<String>,
    pub description_html: Option<String>,
    pub description_text: Option<String>,
}

/// 带图标的条目（装备、召唤师技能、符文）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IconEntry {
    pub name: String,
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_enchant: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_keystone: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GuideBuild {
    pub guide_id: Option<String>,
    pub is_active: bool,
    pub starting: Vec<IconEntry>,
    pub core: Vec<IconEntry>,
    pub boots: Vec<IconEntry>,
    #[serde(rename = "final")]
    pub final_items: Vec<IconEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RunesAndSpells {
    pub guide_id: Option<String>,
    pub is_active: bool,
    pub summoner_spells: Vec<IconEntry>,
    pub runes: Vec<IconEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Situation {
    pub situation: String,
    pub items: Vec<IconEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SituationalItems {
    pub guide_id: Option<String>,
    pub is_active: bool,
    pub situations: Vec<Situation>,
}

/// 某个技能在哪些等级加点
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillRow {
    pub name: String,
    pub levels: Vec<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuickOrderEntry {
    pub image: Option<String>,
    pub alt: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SkillOrder {
    pub guide_id: Option<String>,
    pub is_active: bool,
    pub abilities: Vec<SkillRow>,
    pub quick_order: Vec<QuickOrderEntry>,
}

/// 页面一次快照得到的英雄资料
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChampionProfile {
    pub abilities: Vec<Ability>,
    pub builds: Vec<GuideBuild>,
    pub runes_and_spells: Vec<RunesAndSpells>,
    pub situational_items: Vec<SituationalItems>,
    pub skill_orders: Vec<SkillOrder>,
}

/// 某一等级的属性：解析后的值与原文
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LevelStats {
    pub level: u32,
    pub stats: BTreeMap<String, NumberOrText>,
    pub raw: BTreeMap<String, String>,
}

impl LevelStats {
    /// 由 `{标签: 原文}` 构造，两种形式都保留
    pub fn from_raw(level: u32, raw: BTreeMap<String, String>) -> Self {
        let stats = raw
            .iter()
            .map(|(label, text)| (label.clone(), crate::models::value::parse_number_text(text)))
            .collect();
        Self { level, stats, raw }
    }
}

/// 一个英雄的完整记录
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChampionRecord {
    /// URL 最后一段
    pub champion: String,
    pub source: String,
    /// RFC 3339
    pub scraped_at: String,
    pub stats_by_level: Vec<LevelStats>,
    #[serde(flatten)]
    pub profile: ChampionProfile,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failed_levels: Vec<u32>,
}
