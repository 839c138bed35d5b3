//! 核心框架模块
//!
//! 提供界面层的核心抽象:
//! - Event: 统一输入事件定义
//! - View: 事件处理结果与页面路由
//! - TextWindow: 单行文本横向滚动窗口

pub mod event;
pub mod text_window;
pub mod view;

pub use event::InputEvent;
pub use view::{EventResult, Route};
