//! 编排层（Orchestration Layer）
//!
//! ## 模块划分
//!
//! ### `app` - 应用入口
//! - 管理浏览器资源与流水线分派
//!
//! ### `batch_processor` - 批处理编排器
//! - 顺序处理单元、节流、定期写检查点
//!
//! ### `tooltip_processor` - 列表页 tooltip 流水线
//! - 枚举触发元素，交给批处理编排器
//!
//! ### `champion_processor` - 英雄详情流水线
//! - 打开属性面板、逐级读取属性、有界并发处理多个英雄
//!
//! ## 层次关系
//!
//! ```text
//! app (选择流水线)
//!     ↓
//! tooltip_processor / champion_processor / crawler
//!     ↓
//! batch_processor (处理 Vec<WorkUnit>)
//!     ↓
//! workflow::ExtractionEngine (处理单个 WorkUnit)
//!     ↓
//! services (能力层：可见性 / 交互 / 检查点)
//!     ↓
//! infrastructure (基础设施：PageController)
//! ```

pub mod app;
pub mod batch_processor;
pub mod champion_processor;
pub mod tooltip_processor;

// 重新导出主要类型
pub use app::{App, Pipeline};
pub use batch_processor::{BatchOrchestrator, BatchOutcome, BatchState};
pub use champion_processor::{ensure_stats_open, run_champion_batch, scrape_champion, PageSource};
pub use tooltip_processor::{enumerate_units, scrape_tooltips};
