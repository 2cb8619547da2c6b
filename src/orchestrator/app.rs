//! 应用入口 - 编排层
//!
//! ## 职责
//!
//! 1. **应用初始化**：写运行日志抬头、启动或连接浏览器
//! 2. **流水线分派**：crawl / items / runes / champions
//! 3. **资源管理**：唯一持有 `BrowserSession`，结束时关闭
//! 4. **全局统计**：输出每条流水线的结果汇总

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use tracing::{info, warn};

use crate::browser::BrowserSession;
use crate::config::Config;
use crate::crawler::{write_link_artifacts, LinkCrawler};
use crate::error::{AppError, AppResult};
use crate::extractors::TooltipExtractor;
use crate::infrastructure::PageController;
use crate::models::load_link_list;
use crate::orchestrator::champion_processor::{run_champion_batch, PageSource};
use crate::orchestrator::tooltip_processor::scrape_tooltips;
use crate::services::{CheckpointSink, JsonCheckpointWriter};
use crate::utils::logging::{init_log_file, log_pipeline_start, log_startup, print_final_stats};

/// 流水线
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Pipeline {
    /// 爬取攻略链接，写 guides.txt / guides.json
    Crawl,
    Items,
    Runes,
    /// 按 guides.txt 抓取英雄详情
    #[default]
    Champions,
}

impl Pipeline {
    pub fn name(&self) -> &'static str {
        match self {
            Pipeline::Crawl => "crawl",
            Pipeline::Items => "items",
            Pipeline::Runes => "runes",
            Pipeline::Champions => "champions",
        }
    }
}

impl fmt::Display for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Pipeline {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "crawl" | "guides" => Ok(Pipeline::Crawl),
            "items" => Ok(Pipeline::Items),
            "runes" => Ok(Pipeline::Runes),
            "champions" | "" => Ok(Pipeline::Champions),
            other => Err(AppError::Other(format!(
                "未知的流水线 '{}'，可选: crawl / items / runes / champions",
                other
            ))),
        }
    }
}

/// 应用主结构
pub struct App {
    config: Arc<Config>,
    pipeline: Pipeline,
    session: Arc<BrowserSession>,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config, pipeline: Pipeline) -> AppResult<Self> {
        init_log_file(&config.output_path(&config.output.run_log), pipeline.name())?;
        log_startup(&config, pipeline.name());

        let session = BrowserSession::open(&config.browser).await?;

        Ok(Self {
            config: Arc::new(config),
            pipeline,
            session: Arc::new(session),
        })
    }

    /// 运行选定的流水线
    pub async fn run(&self) -> AppResult<()> {
        match self.pipeline {
            Pipeline::Crawl => self.run_crawl().await,
            Pipeline::Items => {
                self.run_tooltips(TooltipExtractor::items(), &self.config.scraping.item_list_url)
                    .await
            }
            Pipeline::Runes => {
                self.run_tooltips(TooltipExtractor::runes(), &self.config.scraping.rune_list_url)
                    .await
            }
            Pipeline::Champions => self.run_champions().await,
        }
    }

    /// 关闭浏览器
    pub async fn shutdown(self) {
        match Arc::try_unwrap(self.session) {
            Ok(session) => session.close().await,
            Err(_) => warn!("⚠️ 浏览器会话仍被占用，跳过关闭"),
        }
    }

    async fn run_crawl(&self) -> AppResult<()> {
        let config = self.config.as_ref();
        let page = self.session.new_page().await?;

        let report = LinkCrawler::new(config)
            .crawl(&page, &config.crawler.start_url)
            .await;
        page.close_quietly().await;
        let report = report?;

        write_link_artifacts(config, &report.found).await?;
        info!("✅ 访问 {} 个页面", report.pages_visited);
        info!("🔗 找到 {} 个攻略链接", report.found.len());
        Ok(())
    }

    async fn run_tooltips(&self, extractor: TooltipExtractor, list_url: &str) -> AppResult<()> {
        let config = self.config.as_ref();
        let page = self.session.new_page().await?;

        let outcome = scrape_tooltips(&page, config, list_url, &extractor).await;
        page.close_quietly().await;
        let outcome = outcome?;

        let total = outcome.results.len() + outcome.failed.len();
        let output = config.output_path(&format!("{}_data.json", self.pipeline.name()));
        print_final_stats(outcome.results.len(), outcome.failed.len(), total, &output);
        Ok(())
    }

    async fn run_champions(&self) -> AppResult<()> {
        let config = self.config.clone();
        let urls = load_link_list(&config.output_path(&config.output.guides_txt)).await?;
        if urls.is_empty() {
            warn!("⚠️ 没有找到待处理的链接，程序结束");
            return Ok(());
        }

        log_pipeline_start(self.pipeline.name(), urls.len());
        let writer = JsonCheckpointWriter::new(&config.output.directory, "all_champions");
        let source: Arc<dyn PageSource> = self.session.clone();
        let outcome = run_champion_batch(source, config.clone(), &urls, &writer).await;
        writer.save_final(outcome.results.as_slice()).await?;

        info!(
            "⏱️ 共 {}/{} 个英雄，用时 {:.1}s，平均 {:.1}s/个",
            outcome.results.len(),
            urls.len(),
            outcome.elapsed.as_secs_f64(),
            outcome.average_secs()
        );
        print_final_stats(outcome.results.len(), outcome.failed.len(), urls.len(), writer.final_path());
        Ok(())
    }
}
