//! 异步消息定义

use compact_str::CompactString;

use crate::models::{GenerationOutcome, Project};

#[derive(Debug)]
pub enum AppMessage {
    /// 新项目就绪,可以进工作台了。
    ProjectReady { project: Project },
    /// 一次生成成功结束。
    GenerationFinished {
        project_id: CompactString,
        outcome: GenerationOutcome,
    },
    /// 一次生成失败。错误已经是展示用的文本。
    GenerationFailed {
        project_id: CompactString,
        error: String,
    },
    /// 预览刷新动画走完。
    PreviewRefreshed,
}
