//! 数据模型层

pub mod chat;
pub mod project;
pub mod session;
pub mod store;
pub mod template;
pub mod tree;

pub use chat::{format_clock, now_ms, ChatLog, ChatMessage, Role};
pub use project::Project;
pub use session::{GenerationOutcome, SessionState, SubmitError, WorkspaceSession};
pub use store::{FileEntry, FileStore};
pub use template::{filter_templates, Template, CATEGORIES, TEMPLATES};
pub use tree::{
    flatten_tree, project_tree, NodeId, NodeKind, PathError, SiteTree, TreeRow, TreeViewState,
};
