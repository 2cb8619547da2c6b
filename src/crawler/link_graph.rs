//! 链接图：广度优先爬取的纯状态
//!
//! 不接触页面，只负责解析、去重、同源与深度过滤。

use std::collections::{BTreeSet, HashSet, VecDeque};

use regex::Regex;
use url::{Origin, Url};

use crate::config::CrawlerConfig;
use crate::error::{AppError, AppResult};

/// 广度优先爬取的状态
///
/// 一个 URL 最多进入 `visited` 一次，最多进入 `frontier` 一次。
#[derive(Debug)]
pub struct LinkGraph {
    origin: Origin,
    max_depth: usize,
    target_pattern: String,
    disallowed: Regex,
    include_external_matches: bool,
    visited: BTreeSet<String>,
    discovered: HashSet<String>,
    frontier: VecDeque<(Url, usize)>,
    found: BTreeSet<String>,
}

impl LinkGraph {
    /// 以起始 URL（深度 0）初始化
    pub fn new(start: Url, config: &CrawlerConfig) -> AppResult<Self> {
        let disallowed = Regex::new(&config.disallowed_extensions)
            .map_err(|e| AppError::invalid_config("crawler.disallowed_extensions", e.to_string()))?;

        let mut start = start;
        start.set_fragment(None);

        let mut discovered = HashSet::new();
        discovered.insert(start.to_string());
        let mut frontier = VecDeque::new();
        frontier.push_back((start.clone(), 0));

        Ok(Self {
            origin: start.origin(),
            max_depth: config.max_depth,
            target_pattern: config.target_pattern.clone(),
            disallowed,
            include_external_matches: config.include_external_matches,
            visited: BTreeSet::new(),
            discovered,
            frontier,
            found: BTreeSet::new(),
        })
    }

    /// 取出下一个未访问的 URL 并标记为已访问
    pub fn next_unvisited(&mut self) -> Option<(Url, usize)> {
        while let Some((url, depth)) = self.frontier.pop_front() {
            if self.visited.insert(url.to_string()) {
                return Some((url, depth));
            }
        }
        None
    }

    /// 吸收一个页面上的全部 href，返回新入队的数量
    ///
    /// # 参数
    /// - `base`: 解析相对链接的基准（所在页面）
    /// - `depth`: 所在页面的深度
    /// - `hrefs`: 页面上 `a[href]` 的原始值
    pub fn absorb(&mut self, base: &Url, depth: usize, hrefs: &[String]) -> usize {
        let mut enqueued = 0;

        for href in hrefs {
            let Ok(mut url) = base.join(href) else {
                continue;
            };
            url.set_fragment(None);
            let key = url.to_string();
            let is_target = key.contains(&self.target_pattern);

            if url.origin() != self.origin {
                if is_target && self.include_external_matches {
                    self.found.insert(key);
                }
                continue;
            }

            if is_target {
                self.found.insert(key.clone());
            }

            if depth < self.max_depth
                && !self.discovered.contains(&key)
                && !self.disallowed.is_match(&key)
            {
                self.discovered.insert(key);
                self.frontier.push_back((url, depth + 1));
                enqueued += 1;
            }
        }

        enqueued
    }

    pub fn is_exhausted(&self) -> bool {
        self.frontier.is_empty()
    }

    pub fn frontier_len(&self) -> usize {
        self.frontier.len()
    }

    pub fn is_visited(&self, url: &str) -> bool {
        self.visited.contains(url)
    }

    /// 已访问的 URL（有序）
    pub fn visited(&self) -> Vec<String> {
        self.visited.iter().cloned().collect()
    }

    /// 命中目标片段的 URL（有序）
    pub fn found(&self) -> Vec<String> {
        self.found.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph(max_depth: usize) -> LinkGraph {
        let config = CrawlerConfig {
            max_depth,
            ..CrawlerConfig::default()
        };
        LinkGraph::new(Url::parse("https://site.test/").unwrap(), &config).unwrap()
    }

    fn hrefs(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn start_is_first_and_visited_once() {
        let mut g = graph(2);
        let (url, depth) = g.next_unvisited().unwrap();
        assert_eq!(url.as_str(), "https://site.test/");
        assert_eq!(depth, 0);
        // 指回起点的链接不会再入队
        assert_eq!(g.absorb(&url, 0, &hrefs(&["/", "#top"])), 0);
        assert!(g.next_unvisited().is_none());
    }

    #[test]
    fn relative_links_resolve_and_drop_fragment() {
        let mut g = graph(2);
        let (base, _) = g.next_unvisited().unwrap();
        g.absorb(&base, 0, &hrefs(&["guide/yasuo#build", "/guide/yasuo"]));
        assert_eq!(g.found(), vec!["https://site.test/guide/yasuo"]);
        assert_eq!(g.frontier_len(), 1);
    }

    #[test]
    fn static_assets_are_found_but_not_enqueued() {
        let mut g = graph(2);
        let (base, _) = g.next_unvisited().unwrap();
        let added = g.absorb(&base, 0, &hrefs(&["/img/logo.PNG", "/app.js", "/style.css", "/tier-list"]));
        assert_eq!(added, 1);
    }

    #[test]
    fn depth_limit_stops_enqueueing() {
        let mut g = graph(1);
        let (base, _) = g.next_unvisited().unwrap();
        assert_eq!(g.absorb(&base, 0, &hrefs(&["/b"])), 1);
        let (b, depth) = g.next_unvisited().unwrap();
        assert_eq!(depth, 1);
        assert_eq!(g.absorb(&b, 1, &hrefs(&["/c", "/guide/c"])), 0);
        assert_eq!(g.found(), vec!["https://site.test/guide/c"]);
        assert!(g.is_exhausted());
    }

    #[test]
    fn external_links_are_ignored_by_default() {
        let mut g = graph(2);
        let (base, _) = g.next_unvisited().unwrap();
        let added = g.absorb(&base, 0, &hrefs(&["https://other.test/guide/x", "mailto:a@b.c"]));
        assert_eq!(added, 0);
        assert!(g.found().is_empty());
    }

    #[test]
    fn external_matches_can_be_included() {
        let config = CrawlerConfig {
            include_external_matches: true,
            ..CrawlerConfig::default()
        };
        let mut g = LinkGraph::new(Url::parse("https://site.test/").unwrap(), &config).unwrap();
        let (base, _) = g.next_unvisited().unwrap();
        let added = g.absorb(&base, 0, &hrefs(&["https://other.test/guide/x"]));
        assert_eq!(added, 0);
        assert_eq!(g.found(), vec!["https://other.test/guide/x"]);
    }

    #[test]
    fn relative_links_resolve_against_page() {
        let mut g = graph(2);
        let (base, depth) = g.next_unvisited().unwrap();
        let page = base.join("champions/").unwrap();
        g.absorb(&base, depth, &hrefs(&["champions/"]));
        let (url, depth) = g.next_unvisited().unwrap();
        assert_eq!(url, page);
        assert_eq!(depth, 1);

        g.absorb(&url, depth, &hrefs(&["../guide/ahri", "ahri"]));
        assert!(g.found().contains(&"https://site.test/guide/ahri".to_string()));
        assert!(g.is_visited("https://site.test/champions/"));
    }

    #[test]
    fn duplicates_and_fragments_enqueue_once() {
        let mut g = graph(2);
        let (base, depth) = g.next_unvisited().unwrap();
        let added = g.absorb(&base, depth, &hrefs(&["/a", "/a#top", "/a", "/"]));
        assert_eq!(added, 1);
        assert_eq!(g.frontier_len(), 1);
    }

    #[test]
    fn depth_bound_stops_enqueue_but_still_records_targets() {
        let mut g = graph(0);
        let (base, depth) = g.next_unvisited().unwrap();
        let added = g.absorb(&base, depth, &hrefs(&["/a", "/guide/zed"]));
        assert_eq!(added, 0);
        assert!(g.is_exhausted());
        assert_eq!(g.found(), vec!["https://site.test/guide/zed".to_string()]);
    }

    #[test]
    fn invalid_hrefs_are_skipped() {
        let mut g = graph(2);
        let (base, depth) = g.next_unvisited().unwrap();
        let added = g.absorb(&base, depth, &hrefs(&["http://[::1", "/ok"]));
        assert_eq!(added, 1);
    }
}
