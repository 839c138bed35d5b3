//! 项目:一次建站请求的身份与初始提示词。

use compact_str::{format_compact, CompactString};

use super::chat::now_ms;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    pub id: CompactString,
    pub prompt: String,
    pub created_at_ms: u64,
}

impl Project {
    /// 用创建时刻的毫秒时间戳发号,形如 `project-1700000000000`。
    pub fn new(prompt: impl Into<String>) -> Self {
        let created_at_ms = now_ms();
        Self {
            id: format_compact!("project-{created_at_ms}"),
            prompt: prompt.into(),
            created_at_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_carries_creation_time() {
        let project = Project::new("A portfolio website");
        assert!(project.id.starts_with("project-"));
        let suffix = &project.id["project-".len()..];
        assert_eq!(suffix, project.created_at_ms.to_string());
        assert_eq!(project.prompt, "A portfolio website");
    }
}
