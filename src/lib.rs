//! zsite - 终端里的 AI 建站器
//!
//! 模块结构:
//! - models: 数据模型(文件仓库、目录树、聊天、会话、模板)
//! - services: 服务层(配置、模型端点、脚手架、生成后端)
//! - runtime: 后台任务(tokio Worker + 消息通道)
//! - syntax: tree-sitter 逐行高亮
//! - core / views / app / tui: 终端界面,走 `tui` 特性开关

pub mod logging;
pub mod models;
pub mod runtime;
pub mod services;
pub mod syntax;

#[cfg(feature = "tui")]
pub mod app;
#[cfg(feature = "tui")]
pub mod core;
#[cfg(feature = "tui")]
pub mod tui;
#[cfg(feature = "tui")]
pub mod views;
