//! 集成测试共用的页面替身
//!
//! `FakePage` 按 `Script` 变体返回预设值，并记录导航、脚本与鼠标事件。

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value as JsonValue};
use wildrift_scraper::config::Config;
use wildrift_scraper::error::{AppError, AppResult};
use wildrift_scraper::infrastructure::{PageController, Point, Script, WaitUntil};
use wildrift_scraper::orchestrator::PageSource;

/// 脚本处理函数：当前 URL + 脚本 -> 返回值
pub type Handler = dyn Fn(&str, &Script) -> AppResult<JsonValue> + Send + Sync;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MouseEvent {
    Move(Point),
    Down(Point),
    Up(Point),
}

pub struct FakePage {
    handler: Box<Handler>,
    stalls: Option<Box<dyn Fn(&Script) -> bool + Send + Sync>>,
    current_url: Mutex<String>,
    failing_urls: Vec<String>,
    fail_mouse_down: AtomicBool,
    fail_close: bool,
    pub navigations: Mutex<Vec<String>>,
    pub scripts: Mutex<Vec<Script>>,
    pub mouse: Mutex<Vec<MouseEvent>>,
    pub closed: AtomicBool,
}

impl FakePage {
    pub fn new(handler: impl Fn(&str, &Script) -> AppResult<JsonValue> + Send + Sync + 'static) -> Self {
        Self {
            handler: Box::new(handler),
            stalls: None,
            current_url: Mutex::new("about:blank".to_string()),
            failing_urls: Vec::new(),
            fail_mouse_down: AtomicBool::new(false),
            fail_close: false,
            navigations: Mutex::new(Vec::new()),
            scripts: Mutex::new(Vec::new()),
            mouse: Mutex::new(Vec::new()),
            closed: AtomicBool::new(false),
        }
    }

    /// 导航到这些 URL 时返回错误
    pub fn failing_navigation(mut self, urls: &[&str]) -> Self {
        self.failing_urls = urls.iter().map(|u| u.to_string()).collect();
        self
    }

    /// 满足条件的脚本永远不返回
    pub fn stalling_on(mut self, pred: impl Fn(&Script) -> bool + Send + Sync + 'static) -> Self {
        self.stalls = Some(Box::new(pred));
        self
    }

    /// 关闭页面时返回错误
    pub fn failing_close(mut self) -> Self {
        self.fail_close = true;
        self
    }

    pub fn fail_mouse_down(&self, fail: bool) {
        self.fail_mouse_down.store(fail, Ordering::SeqCst);
    }

    pub fn navigations(&self) -> Vec<String> {
        self.navigations.lock().unwrap().clone()
    }

    pub fn mouse_events(&self) -> Vec<MouseEvent> {
        self.mouse.lock().unwrap().clone()
    }

    /// 满足条件的脚本被执行的次数
    pub fn script_count(&self, pred: impl Fn(&Script) -> bool) -> usize {
        self.scripts.lock().unwrap().iter().filter(|s| pred(s)).count()
    }
}

#[async_trait]
impl PageController for FakePage {
    async fn navigate(&self, url: &str, _wait_until: WaitUntil, _timeout: Duration) -> AppResult<()> {
        self.navigations.lock().unwrap().push(url.to_string());
        if self.failing_urls.iter().any(|u| u == url) {
            return Err(AppError::navigation(url, "connection refused"));
        }
        *self.current_url.lock().unwrap() = url.to_string();
        Ok(())
    }

    async fn evaluate(&self, script: &Script) -> AppResult<JsonValue> {
        self.scripts.lock().unwrap().push(script.clone());
        if self.stalls.as_ref().is_some_and(|stalls| stalls(script)) {
            return std::future::pending().await;
        }
        let url = self.current_url.lock().unwrap().clone();
        (self.handler)(&url, script)
    }

    async fn mouse_move(&self, to: Point) -> AppResult<()> {
        self.mouse.lock().unwrap().push(MouseEvent::Move(to));
        Ok(())
    }

    async fn mouse_down(&self, at: Point) -> AppResult<()> {
        if self.fail_mouse_down.load(Ordering::SeqCst) {
            return Err(AppError::input("mouse pressed rejected"));
        }
        self.mouse.lock().unwrap().push(MouseEvent::Down(at));
        Ok(())
    }

    async fn mouse_up(&self, at: Point) -> AppResult<()> {
        self.mouse.lock().unwrap().push(MouseEvent::Up(at));
        Ok(())
    }

    async fn close(&self) -> AppResult<()> {
        self.closed.store(true, Ordering::SeqCst);
        if self.fail_close {
            return Err(AppError::Other("target closed".to_string()));
        }
        Ok(())
    }
}

/// 打开、可交互的区域信号
pub fn visible_signals() -> JsonValue {
    json!({
        "display": "block",
        "visibility": "visible",
        "position": "absolute",
        "width": 200,
        "height": 120,
        "hasOffsetParent": true,
        "inlineHidden": false
    })
}

pub fn hidden_signals() -> JsonValue {
    json!({
        "display": "none",
        "visibility": "visible",
        "position": "static",
        "width": 0,
        "height": 0,
        "hasOffsetParent": false,
        "inlineHidden": true
    })
}

pub fn bbox(x: f64, y: f64, width: f64, height: f64) -> JsonValue {
    json!({ "x": x, "y": y, "width": width, "height": height })
}

/// 所有等待都压到毫秒级的配置
pub fn fast_config() -> Config {
    let mut config = Config::default();
    let t = &mut config.timeouts;
    t.navigation_ms = 50;
    t.hover_stabilize_ms = 1;
    t.region_visible_ms = 20;
    t.content_ready_ms = 20;
    t.between_actions_ms = 0;
    t.retry_backoff_ms = 1;
    t.settle_ms = 0;
    t.poll_interval_ms = 1;
    t.element_attached_ms = 20;
    t.hover_dwell_ms = 0;
    t.press_hold_ms = 0;
    t.fallback_click_ms = 20;
    t.before_first_click_ms = 0;
    t.stats_panel_open_ms = 10;
    t.between_open_attempts_ms = 0;
    t.after_open_ms = 0;
    t.stats_section_attached_ms = 10;
    t.level_confirm_ms = 20;
    t.level_debounce_ms = 0;
    t.list_ready_ms = 20;
    t.banner_click_ms = 10;
    config.retries.extraction = 3;
    config.retries.stats_panel_open = 2;
    config.scraping.pointer_steps = 4;
    config.crawler.between_visits_ms = 0;
    config
}

/// 每次 `open_page` 都用同一个处理函数构造新的 `FakePage`
pub struct FakePageSource {
    handler: Arc<Handler>,
    fail_close: bool,
    pub opened: Mutex<usize>,
}

impl FakePageSource {
    pub fn new(handler: impl Fn(&str, &Script) -> AppResult<JsonValue> + Send + Sync + 'static) -> Self {
        Self {
            handler: Arc::new(handler),
            fail_close: false,
            opened: Mutex::new(0),
        }
    }

    /// 打开的页面在关闭时都返回错误
    pub fn failing_close(mut self) -> Self {
        self.fail_close = true;
        self
    }

    pub fn opened(&self) -> usize {
        *self.opened.lock().unwrap()
    }
}

#[async_trait]
impl PageSource for FakePageSource {
    async fn open_page(&self) -> AppResult<Box<dyn PageController>> {
        *self.opened.lock().unwrap() += 1;
        let handler = self.handler.clone();
        let page = FakePage::new(move |url, script| handler(url, script));
        Ok(Box::new(if self.fail_close { page.failing_close() } else { page }))
    }
}
