//! 站点选择器
//!
//! 页面结构相关的常量都集中在这里，其他模块只引用名字。

/// tooltip 区域内各字段的选择器
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TooltipSelectors {
    pub container: String,
    pub image: String,
    pub title: String,
    pub cost: String,
    pub stats: String,
    pub uniques: String,
    /// 带类型 class 的节点（`tt--rune`）
    pub kind_node: String,
}

impl Default for TooltipSelectors {
    fn default() -> Self {
        Self {
            container: TOOLTIP.to_string(),
            image: ".tt__image img".to_string(),
            title: ".tt__info__title span".to_string(),
            cost: ".tt__info__cost span".to_string(),
            stats: ".tt__info__stats span".to_string(),
            uniques: ".tt__info__uniques span".to_string(),
            kind_node: ".tt".to_string(),
        }
    }
}

/// 悬停后出现的 tooltip 区域
pub const TOOLTIP: &str = "#tooltip";

/// 列表页上的 tooltip 触发元素
pub const TIER_LIST_TRIGGERS: &str = ".wf-tier-list__tiers .ico-holder.ajax-tooltip";

/// 符文 tooltip 的类型 class
pub const RUNE_KIND_CLASS: &str = "tt--rune";

pub mod champion {
    /// 统计面板
    pub const STATS_SECTION: &str = ".wf-champion__about__stats";
    /// 打开统计面板的按钮
    pub const SHOW_STATS: &str = ".show-champ-stats";
    /// 等级滑块
    pub const LEVEL_RANGE: &str = "#range";
    /// 当前等级显示
    pub const LEVEL_LABEL: &str = "#stat-level";
    /// 统计区块
    pub const STAT_BLOCKS: &str = ".statsBlock.champion .statsBlock__block";
}

pub mod banners {
    /// 按钮文本包含这些字样时点击
    pub const BUTTON_TEXTS: [&str; 2] = ["Accept", "I agree"];
    pub const DISMISS: [&str; 1] = ["[aria-label=\"dismiss\"]"];
}
