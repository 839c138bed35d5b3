//! 工作台会话:一个项目的聊天、文件、树与生成状态机。
//!
//! 状态机只有 Idle / Generating 两档。同一时刻至多一次生成在途,
//! 其间的提交被拒绝;无论成败,结束后都回到 Idle。

use std::fmt;

use super::chat::{ChatLog, ChatMessage, Role};
use super::project::Project;
use super::store::FileStore;
use super::tree::{flatten_tree, project_tree, PathError, SiteTree, TreeRow, TreeViewState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Generating,
}

/// 提交被拒绝的原因。空输入静默忽略,生成中则是明确的忙碌拒绝。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitError {
    Empty,
    Busy,
}

impl fmt::Display for SubmitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmitError::Empty => write!(f, "prompt is empty"),
            SubmitError::Busy => write!(f, "a generation is already running"),
        }
    }
}

impl std::error::Error for SubmitError {}

/// 一次生成的完整产物:回复文案、文件集、预览地址。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationOutcome {
    pub message: String,
    pub files: Vec<(String, String)>,
    pub preview_ref: String,
}

#[derive(Debug)]
pub struct WorkspaceSession {
    project: Project,
    chat: ChatLog,
    files: FileStore,
    tree: SiteTree,
    view: TreeViewState,
    state: SessionState,
    preview_ref: Option<String>,
}

impl WorkspaceSession {
    pub fn new(project: Project) -> Self {
        Self {
            project,
            chat: ChatLog::new(),
            files: FileStore::new(),
            tree: SiteTree::new(),
            view: TreeViewState::new(),
            state: SessionState::Idle,
            preview_ref: None,
        }
    }

    /// 校验并记录一次提交。成功时追加用户消息、进入 Generating,
    /// 返回去掉首尾空白的提示词,由调用方拿去发起后台生成。
    pub fn begin_submit(&mut self, text: &str) -> Result<String, SubmitError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(SubmitError::Empty);
        }
        if self.state == SessionState::Generating {
            return Err(SubmitError::Busy);
        }
        self.chat
            .push(Role::User, trimmed, Some(self.project.id.as_str()));
        self.state = SessionState::Generating;
        Ok(trimmed.to_string())
    }

    /// 生成完成:追加助手消息,整体替换文件集并重建树,记下预览地址。
    /// 路径投影失败时保留旧的文件与树,但消息照常追加,状态照常回 Idle。
    pub fn apply_outcome(&mut self, outcome: GenerationOutcome) -> Result<(), PathError> {
        self.state = SessionState::Idle;
        self.chat.push(
            Role::Assistant,
            outcome.message,
            Some(self.project.id.as_str()),
        );

        let files: FileStore = outcome.files.into_iter().collect();
        let tree = project_tree(&files)?;
        self.files = files;
        self.tree = tree;
        self.preview_ref = Some(outcome.preview_ref);
        if self.tree.node_by_path("src").is_some() {
            self.view.expand("src");
        }
        Ok(())
    }

    /// 生成失败只恢复可提交状态,内容一概不动。
    pub fn fail_generation(&mut self) {
        self.state = SessionState::Idle;
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_generating(&self) -> bool {
        self.state == SessionState::Generating
    }

    pub fn project(&self) -> &Project {
        &self.project
    }

    pub fn messages(&self) -> &[ChatMessage] {
        self.chat.messages()
    }

    pub fn chat_is_empty(&self) -> bool {
        self.chat.is_empty()
    }

    pub fn files(&self) -> &FileStore {
        &self.files
    }

    pub fn tree(&self) -> &SiteTree {
        &self.tree
    }

    pub fn view(&self) -> &TreeViewState {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut TreeViewState {
        &mut self.view
    }

    pub fn preview_ref(&self) -> Option<&str> {
        self.preview_ref.as_deref()
    }

    pub fn visible_rows(&self) -> Vec<TreeRow> {
        flatten_tree(&self.tree, &self.view)
    }

    pub fn selected_file(&self) -> Option<(&str, &str)> {
        let path = self.view.selected()?;
        let content = self.files.get(path)?;
        Some((path, content))
    }
}
