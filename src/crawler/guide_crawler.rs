//! 攻略链接爬虫
//!
//! 从起始页出发广度优先遍历站内页面，收集路径中包含目标片段的链接。

use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, info, warn};
use url::Url;

use crate::config::{Config, CrawlerConfig};
use crate::error::AppResult;
use crate::crawler::link_graph::LinkGraph;
use crate::infrastructure::{PageController, Script, WaitUntil};
use crate::services::{write_json_atomic, write_text_atomic};

/// 爬取结果
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CrawlReport {
    /// 成功导航的页面数
    pub pages_visited: usize,
    /// 出队过的 URL（含导航失败的），有序
    pub visited: Vec<String>,
    /// 命中的链接，有序
    pub found: Vec<String>,
}

/// 链接爬虫
pub struct LinkCrawler {
    config: CrawlerConfig,
    navigation_timeout: Duration,
}

impl LinkCrawler {
    pub fn new(config: &Config) -> Self {
        Self {
            config: config.crawler.clone(),
            navigation_timeout: config.timeouts.navigation(),
        }
    }

    /// 从 `start_url` 开始爬取
    ///
    /// 队列为空或成功访问 `max_pages` 个页面后停止。单个页面导航失败只记录日志。
    pub async fn crawl(&self, page: &dyn PageController, start_url: &str) -> AppResult<CrawlReport> {
        let start = Url::parse(start_url)?;
        let mut graph = LinkGraph::new(start, &self.config)?;
        let mut pages_visited = 0usize;

        info!(
            "🕸️ 开始爬取 {} (最大深度 {}, 最多 {} 页)",
            start_url, self.config.max_depth, self.config.max_pages
        );

        while pages_visited < self.config.max_pages {
            let Some((url, depth)) = graph.next_unvisited() else {
                break;
            };

            if let Err(e) = page
                .navigate(url.as_str(), WaitUntil::NetworkIdle, self.navigation_timeout)
                .await
            {
                warn!("⚠️ 访问 {} 失败: {}", url, e);
                continue;
            }
            pages_visited += 1;

            if let Err(e) = page.evaluate(&Script::AutoScroll).await {
                debug!("滚动 {} 失败: {}", url, e);
            }

            let hrefs: Vec<String> = match page.evaluate(&Script::CollectLinks).await {
                Ok(value) => serde_json::from_value(value).unwrap_or_default(),
                Err(e) => {
                    warn!("⚠️ 读取 {} 的链接失败: {}", url, e);
                    Vec::new()
                }
            };

            let added = graph.absorb(&url, depth, &hrefs);
            info!(
                "🔗 [{}/{}] 深度 {} {} | 链接 {} | 新入队 {} | 已找到 {}",
                pages_visited,
                self.config.max_pages,
                depth,
                url,
                hrefs.len(),
                added,
                graph.found().len()
            );

            sleep(self.config.between_visits()).await;
        }

        Ok(CrawlReport {
            pages_visited,
            visited: graph.visited(),
            found: graph.found(),
        })
    }
}

/// 写出 guides.txt（每行一个，末尾换行）与 guides.json
pub async fn write_link_artifacts(config: &Config, found: &[String]) -> AppResult<()> {
    let txt_path = config.output_path(&config.output.guides_txt);
    let json_path = config.output_path(&config.output.guides_json);

    write_text_atomic(&txt_path, &format!("{}\n", found.join("\n"))).await?;
    write_json_atomic(&json_path, found).await?;

    info!("📄 已保存:\n- {}\n- {}", txt_path.display(), json_path.display());
    Ok(())
}
