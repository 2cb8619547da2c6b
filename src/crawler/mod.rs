//! 站内链接爬虫
//!
//! `link_graph` 是纯状态（去重、深度、同源过滤），`guide_crawler` 负责驱动页面。

pub mod guide_crawler;
pub mod link_graph;

pub use guide_crawler::{write_link_artifacts, CrawlReport, LinkCrawler};
pub use link_graph::LinkGraph;
