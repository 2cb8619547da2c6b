//! # Wild Rift Scraper
//!
//! 从客户端渲染、时常不稳定的游戏资料页面中抓取结构化数据：
//! 英雄属性与技能、装备与符文 tooltip、攻略链接。
//!
//! ## 架构设计
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 页面控制器 trait、CDP 实现、页面脚本、有界轮询
//!
//! ### ② 业务能力层（Services）
//! - `VisibilityOracle` - 区域是否可见、内容是否就绪
//! - `InteractionDriver` - 物理鼠标点击与悬停
//! - `JsonCheckpointWriter` - 整体覆盖的 JSON 检查点
//!
//! ### ③ 流程层（Workflow）
//! - `ExtractionEngine` - 一个单元的有界重试提取
//! - `extractors/` - 装备、符文、英雄等级的提取策略
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/` - 批处理、tooltip / 英雄流水线、应用入口
//! - `crawler/` - 广度优先的站内链接爬虫
//!
//! ## 模块结构

pub mod browser;
pub mod config;
pub mod crawler;
pub mod error;
pub mod extractors;
pub mod infrastructure;
pub mod models;
pub mod orchestrator;
pub mod selectors;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult};
pub use infrastructure::{PageController, Script, Target};
pub use orchestrator::{App, Pipeline};
