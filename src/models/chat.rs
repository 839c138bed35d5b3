//! 会话消息:按序号发号的不可变追加日志。

use compact_str::{format_compact, CompactString};
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub id: CompactString,
    pub role: Role,
    pub content: String,
    pub timestamp_ms: u64,
    pub project_id: Option<CompactString>,
}

/// 追加式的消息日志。id 由日志内部单调发号,同一毫秒内也不会撞。
#[derive(Debug, Default)]
pub struct ChatLog {
    messages: Vec<ChatMessage>,
    next_seq: u64,
}

impl ChatLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(
        &mut self,
        role: Role,
        content: impl Into<String>,
        project_id: Option<&str>,
    ) -> &ChatMessage {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.messages.push(ChatMessage {
            id: format_compact!("msg-{seq}"),
            role,
            content: content.into(),
            timestamp_ms: now_ms(),
            project_id: project_id.map(CompactString::from),
        });
        // 刚刚 push 进去,末尾一定有。
        &self.messages[self.messages.len() - 1]
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }
}

/// UNIX 毫秒时间戳。时钟异常时退化为 0,不会 panic。
pub fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// 把毫秒时间戳格式化成 HH:MM:SS(UTC),给消息行用。
pub fn format_clock(timestamp_ms: u64) -> String {
    let secs_of_day = (timestamp_ms / 1000) % 86_400;
    let hours = secs_of_day / 3600;
    let minutes = (secs_of_day % 3600) / 60;
    let seconds = secs_of_day % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_appends_in_order() {
        let mut log = ChatLog::new();
        log.push(Role::User, "build me a site", Some("project-1"));
        log.push(Role::Assistant, "done", Some("project-1"));

        assert_eq!(log.len(), 2);
        assert_eq!(log.messages()[0].role, Role::User);
        assert_eq!(log.messages()[1].role, Role::Assistant);
        assert_eq!(log.last().map(|m| m.content.as_str()), Some("done"));
    }

    #[test]
    fn ids_are_unique_even_in_same_millisecond() {
        let mut log = ChatLog::new();
        for _ in 0..64 {
            log.push(Role::User, "x", None);
        }
        let mut ids: Vec<&str> = log.messages().iter().map(|m| m.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 64);
        assert_eq!(log.messages()[0].id, "msg-0");
        assert_eq!(log.messages()[63].id, "msg-63");
    }

    #[test]
    fn project_id_is_carried() {
        let mut log = ChatLog::new();
        let message = log.push(Role::User, "hello", Some("project-42"));
        assert_eq!(message.project_id.as_deref(), Some("project-42"));

        let mut log = ChatLog::new();
        let message = log.push(Role::User, "hello", None);
        assert!(message.project_id.is_none());
    }

    #[test]
    fn clock_formatting() {
        assert_eq!(format_clock(0), "00:00:00");
        // 2024-01-01 12:34:56 UTC
        assert_eq!(format_clock(1_704_112_496_000), "12:34:56");
        assert_eq!(format_clock(86_399_999), "23:59:59");
    }
}
