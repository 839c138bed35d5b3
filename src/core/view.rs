//! 视图层公用类型:事件处理结果与页面路由。

/// 视图消化不了的意图往上抛,由工作台统一处理。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventResult {
    Consumed,
    Ignored,
    Quit,
    /// 切换页面。
    Navigate(Route),
    /// 首页提交了想法,要求建项目并进入工作台。
    StartProject(String),
    /// 模板页选中了模板,带着开场提示词直接进工作台。
    OpenWorkspace(String),
    /// 工作台聊天框提交了新需求。
    SubmitPrompt(String),
    /// 请求把某个生成文件的内容发到系统剪贴板。
    CopyFile(String),
    /// 请求刷新预览。
    RefreshPreview,
}

impl EventResult {
    pub fn is_consumed(&self) -> bool {
        matches!(self, EventResult::Consumed)
    }

    pub fn is_ignored(&self) -> bool {
        matches!(self, EventResult::Ignored)
    }

    pub fn is_quit(&self) -> bool {
        matches!(self, EventResult::Quit)
    }
}

/// 应用的三个页面。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Home,
    Templates,
    Workspace,
}

impl Default for Route {
    fn default() -> Self {
        Route::Home
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_result() {
        assert!(EventResult::Consumed.is_consumed());
        assert!(EventResult::Ignored.is_ignored());
        assert!(EventResult::Quit.is_quit());
        assert!(!EventResult::Navigate(Route::Home).is_consumed());
    }

    #[test]
    fn test_route_default() {
        assert_eq!(Route::default(), Route::Home);
    }
}
