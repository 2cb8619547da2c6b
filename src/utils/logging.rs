//! 日志工具模块
//!
//! 提供日志初始化和格式化输出的辅助函数

use std::path::Path;

use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::error::{AppError, AppResult};

/// 初始化日志输出，级别取自 `RUST_LOG`，默认 `info`
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 初始化运行日志文件（写入带时间戳的抬头）
///
/// # 参数
/// - `path`: 日志文件路径
/// - `pipeline`: 流水线名称
pub fn init_log_file(path: &Path, pipeline: &str) -> AppResult<()> {
    let log_header = format!(
        "{}\n{} 抓取日志 - {}\n{}\n\n",
        "=".repeat(60),
        pipeline,
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        "=".repeat(60)
    );
    std::fs::write(path, log_header)
        .map_err(|e| AppError::file_write_failed(path.display().to_string(), e))
}

/// 记录程序启动信息
pub fn log_startup(config: &Config, pipeline: &str) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - {}", pipeline);
    info!(
        "🖥️ 浏览器: {}",
        match config.browser.debug_port {
            Some(port) => format!("连接端口 {}", port),
            None if config.browser.headless => "无头模式".to_string(),
            None => "有界面模式".to_string(),
        }
    );
    info!(
        "🔁 重试 {} 次 | 每 {} 个保存一次 | 并发页面 {}",
        config.retries.extraction, config.scraping.batch_size, config.scraping.max_concurrent_pages
    );
    info!("{}", "=".repeat(60));
}

/// 记录流水线开始
///
/// # 参数
/// - `name`: 流水线名称
/// - `total`: 待处理数量
pub fn log_pipeline_start(name: &str, total: usize) {
    info!("\n{}", "─".repeat(60));
    info!("📦 开始 {} - 共 {} 个", name, total);
    info!("{}", "─".repeat(60));
}

/// 打印最终统计信息
///
/// # 参数
/// - `success`: 成功数量
/// - `failed`: 失败数量
/// - `total`: 总数
/// - `output`: 结果文件路径
pub fn print_final_stats(success: usize, failed: usize, total: usize, output: &Path) {
    info!("\n{}", "=".repeat(60));
    info!("📊 全部处理完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 成功: {}/{}", success, total);
    info!("❌ 失败: {}", failed);
    info!("{}", "=".repeat(60));
    info!("\n结果已保存至: {}", output.display());
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
