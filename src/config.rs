//! 程序配置
//!
//! 所有超时、重试次数、批大小、爬取上限都集中在一个不可变的 `Config` 中，
//! 构造组件时传入。默认值来自编译期常量，可由 TOML 文件覆盖；
//! 运行时只读取 `HEADLESS` 与 `BROWSER_DEBUG_PORT` 两个环境变量。

use std::path::Path;
use std::time::Duration;

use regex::Regex;
use serde::Deserialize;

use crate::error::{AppError, AppResult, ConfigError};

/// 程序配置文件
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub timeouts: Timeouts,
    pub retries: Retries,
    pub scraping: ScrapingConfig,
    pub crawler: CrawlerConfig,
    pub browser: BrowserConfig,
    pub output: OutputConfig,
}

/// 各类等待与停顿（毫秒）
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Timeouts {
    pub navigation_ms: u64,
    /// 悬停后让 tooltip 稳定的停顿
    pub hover_stabilize_ms: u64,
    /// 等待区域可见
    pub region_visible_ms: u64,
    /// 等待内容填充
    pub content_ready_ms: u64,
    /// 单元之间的节流停顿
    pub between_actions_ms: u64,
    /// 重试前的退避
    pub retry_backoff_ms: u64,
    /// 滚动到视口后的短停顿
    pub settle_ms: u64,
    /// 轮询间隔
    pub poll_interval_ms: u64,
    /// 等待元素出现（交互驱动第 1 步）
    pub element_attached_ms: u64,
    /// 鼠标停留在目标上的时间
    pub hover_dwell_ms: u64,
    /// 按下与松开之间的时间
    pub press_hold_ms: u64,
    /// 兜底脚本点击的超时
    pub fallback_click_ms: u64,
    /// 第一次点击前等待页面绑定事件
    pub before_first_click_ms: u64,
    /// 点击后等待统计面板打开
    pub stats_panel_open_ms: u64,
    /// 两次打开尝试之间的停顿
    pub between_open_attempts_ms: u64,
    /// 面板打开后的额外等待
    pub after_open_ms: u64,
    /// 等待统计面板区块出现
    pub stats_section_attached_ms: u64,
    /// 等待 `#stat-level` 与目标等级一致
    pub level_confirm_ms: u64,
    /// 设置等级后的去抖停顿
    pub level_debounce_ms: u64,
    /// 等待列表页触发元素出现
    pub list_ready_ms: u64,
    /// 横幅按钮的可见性检查与点击
    pub banner_click_ms: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            navigation_ms: 20_000,
            hover_stabilize_ms: 800,
            region_visible_ms: 3_500,
            content_ready_ms: 3_500,
            between_actions_ms: 300,
            retry_backoff_ms: 800,
            settle_ms: 300,
            poll_interval_ms: 100,
            element_attached_ms: 5_000,
            hover_dwell_ms: 700,
            press_hold_ms: 140,
            fallback_click_ms: 1_500,
            before_first_click_ms: 500,
            stats_panel_open_ms: 5_500,
            between_open_attempts_ms: 650,
            after_open_ms: 3_000,
            stats_section_attached_ms: 15_000,
            level_confirm_ms: 7_000,
            level_debounce_ms: 200,
            list_ready_ms: 30_000,
            banner_click_ms: 1_500,
        }
    }
}

impl Timeouts {
    pub fn navigation(&self) -> Duration {
        Duration::from_millis(self.navigation_ms)
    }
    pub fn hover_stabilize(&self) -> Duration {
        Duration::from_millis(self.hover_stabilize_ms)
    }
    pub fn region_visible(&self) -> Duration {
        Duration::from_millis(self.region_visible_ms)
    }
    pub fn content_ready(&self) -> Duration {
        Duration::from_millis(self.content_ready_ms)
    }
    pub fn between_actions(&self) -> Duration {
        Duration::from_millis(self.between_actions_ms)
    }
    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }
    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }
    pub fn element_attached(&self) -> Duration {
        Duration::from_millis(self.element_attached_ms)
    }
    pub fn hover_dwell(&self) -> Duration {
        Duration::from_millis(self.hover_dwell_ms)
    }
    pub fn press_hold(&self) -> Duration {
        Duration::from_millis(self.press_hold_ms)
    }
    pub fn fallback_click(&self) -> Duration {
        Duration::from_millis(self.fallback_click_ms)
    }
    pub fn before_first_click(&self) -> Duration {
        Duration::from_millis(self.before_first_click_ms)
    }
    pub fn stats_panel_open(&self) -> Duration {
        Duration::from_millis(self.stats_panel_open_ms)
    }
    pub fn between_open_attempts(&self) -> Duration {
        Duration::from_millis(self.between_open_attempts_ms)
    }
    pub fn after_open(&self) -> Duration {
        Duration::from_millis(self.after_open_ms)
    }
    pub fn stats_section_attached(&self) -> Duration {
        Duration::from_millis(self.stats_section_attached_ms)
    }
    pub fn level_confirm(&self) -> Duration {
        Duration::from_millis(self.level_confirm_ms)
    }
    pub fn level_debounce(&self) -> Duration {
        Duration::from_millis(self.level_debounce_ms)
    }
    pub fn list_ready(&self) -> Duration {
        Duration::from_millis(self.list_ready_ms)
    }
    pub fn banner_click(&self) -> Duration {
        Duration::from_millis(self.banner_click_ms)
    }
}

/// 重试次数
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Retries {
    /// 每个单元的提取尝试次数
    pub extraction: usize,
    /// 打开统计面板的点击尝试次数
    pub stats_panel_open: usize,
}

impl Default for Retries {
    fn default() -> Self {
        Self {
            extraction: 5,
            stats_panel_open: 7,
        }
    }
}

/// 批处理配置
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ScrapingConfig {
    /// 每处理多少个单元写一次部分检查点
    pub batch_size: usize,
    /// 英雄流水线同时打开的页面数
    pub max_concurrent_pages: usize,
    /// 鼠标从当前位置移动到目标中心的步数
    pub pointer_steps: usize,
    /// 英雄等级上限（滑块取值 1..=max_level）
    pub max_level: u32,
    pub item_list_url: String,
    pub rune_list_url: String,
}

impl Default for ScrapingConfig {
    fn default() -> Self {
        Self {
            batch_size: 10,
            max_concurrent_pages: 1,
            pointer_steps: 16,
            max_level: 15,
            item_list_url: "https://www.wildriftfire.com/item-list".to_string(),
            rune_list_url: "https://www.wildriftfire.com/rune-list".to_string(),
        }
    }
}

/// 链接爬虫配置
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    pub start_url: String,
    pub max_depth: usize,
    pub max_pages: usize,
    pub between_visits_ms: u64,
    /// 命中即收入结果集的路径片段
    pub target_pattern: String,
    /// 不入队的静态资源扩展名
    pub disallowed_extensions: String,
    /// 外站链接匹配路径片段时是否也收入结果集
    pub include_external_matches: bool,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            start_url: "https://www.wildriftfire.com/".to_string(),
            max_depth: 2,
            max_pages: 200,
            between_visits_ms: 350,
            target_pattern: "/guide/".to_string(),
            disallowed_extensions: r"(?i)\.(png|jpe?g|webp|gif|svg|ico|css|js|json|xml|mp4|webm)$"
                .to_string(),
            include_external_matches: false,
        }
    }
}

impl CrawlerConfig {
    pub fn between_visits(&self) -> Duration {
        Duration::from_millis(self.between_visits_ms)
    }
}

/// 浏览器配置
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    pub headless: bool,
    pub viewport_width: u32,
    pub viewport_height: u32,
    /// 设置后连接已有浏览器而不是启动新的
    pub debug_port: Option<u16>,
    pub executable: Option<String>,
    /// 单条页面脚本或鼠标命令的超时
    pub command_timeout_ms: u64,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: false,
            viewport_width: 1280,
            viewport_height: 900,
            debug_port: None,
            executable: None,
            command_timeout_ms: 10_000,
        }
    }
}

impl BrowserConfig {
    pub fn command_timeout(&self) -> Duration {
        Duration::from_millis(self.command_timeout_ms)
    }
}

/// 输出文件配置
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub directory: String,
    pub guides_txt: String,
    pub guides_json: String,
    pub run_log: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: ".".to_string(),
            guides_txt: "guides.txt".to_string(),
            guides_json: "guides.json".to_string(),
            run_log: "scrape_log.txt".to_string(),
        }
    }
}

impl Config {
    /// 从环境加载：先读 `SCRAPER_CONFIG` 指向的 TOML，再应用环境变量
    pub fn from_env() -> AppResult<Self> {
        let mut config = match std::env::var("SCRAPER_CONFIG") {
            Ok(path) if !path.trim().is_empty() => Self::from_toml_file(Path::new(path.trim()))?,
            _ => Self::default(),
        };

        if let Ok(value) = std::env::var("HEADLESS") {
            config.browser.headless = parse_flag(&value);
        }
        if let Some(port) = std::env::var("BROWSER_DEBUG_PORT")
            .ok()
            .and_then(|v| v.trim().parse().ok())
        {
            config.browser.debug_port = Some(port);
        }

        config.validate()?;
        Ok(config)
    }

    /// 读取 TOML 配置文件，缺省项使用默认值
    pub fn from_toml_file(path: &Path) -> AppResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::file_read_failed(path.display().to_string(), e))?;
        Self::from_toml_str(&content).map_err(|e| match e {
            AppError::Config(ConfigError::TomlParseFailed { source, .. }) => {
                AppError::Config(ConfigError::TomlParseFailed {
                    path: path.display().to_string(),
                    source,
                })
            }
            other => other,
        })
    }

    pub fn from_toml_str(content: &str) -> AppResult<Self> {
        toml::from_str(content).map_err(|source| {
            AppError::Config(ConfigError::TomlParseFailed {
                path: String::new(),
                source,
            })
        })
    }

    /// 校验配置取值
    pub fn validate(&self) -> AppResult<()> {
        if self.retries.extraction == 0 {
            return Err(AppError::invalid_config("retries.extraction", "必须大于 0"));
        }
        if self.scraping.batch_size == 0 {
            return Err(AppError::invalid_config("scraping.batch_size", "必须大于 0"));
        }
        if self.scraping.max_concurrent_pages == 0 {
            return Err(AppError::invalid_config(
                "scraping.max_concurrent_pages",
                "必须大于 0",
            ));
        }
        if self.browser.command_timeout_ms == 0 {
            return Err(AppError::invalid_config("browser.command_timeout_ms", "必须大于 0"));
        }
        if self.crawler.max_pages == 0 {
            return Err(AppError::invalid_config("crawler.max_pages", "必须大于 0"));
        }
        if let Err(e) = Regex::new(&self.crawler.disallowed_extensions) {
            return Err(AppError::invalid_config(
                "crawler.disallowed_extensions",
                e.to_string(),
            ));
        }
        Ok(())
    }

    /// 输出目录下的文件路径
    pub fn output_path(&self, file_name: &str) -> std::path::PathBuf {
        Path::new(&self.output.directory).join(file_name)
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes")
}
