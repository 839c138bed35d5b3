//! 应用层:工作台(页面路由 + 消息泵)与主题。

pub mod theme;
pub mod workbench;

pub use theme::UiTheme;
pub use workbench::Workbench;
