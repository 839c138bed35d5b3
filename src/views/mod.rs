//! 视图层模块
//!
//! 三个页面加公用输入组件:
//! - HomeView: 首页(想法输入 + 精选项目)
//! - TemplatesView: 模板画廊(搜索 + 分类)
//! - WorkspaceView: 工作台(聊天 / 预览 / 代码)
//! - PromptInput: 单行输入框

pub mod home;
pub mod input;
pub mod templates;
pub mod workspace;

pub use home::HomeView;
pub use input::{InputAction, PromptInput};
pub use templates::TemplatesView;
pub use workspace::{ChatPanel, CodePanel, PanelTab, PreviewPanel, WorkspaceView};
