//! 工作台页:左聊天,右预览/代码双签页。
//!
//! 会话状态(消息、文件、树、生成状态机)都在 [`WorkspaceSession`] 里,
//! 这里只负责输入分发与布局;Tab 在聊天和右侧面板之间切焦点。

mod chat;
mod code;
mod preview;

pub use chat::ChatPanel;
pub use code::CodePanel;
pub use preview::{PreviewPanel, ViewportMode};

use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::theme::UiTheme;
use crate::core::event::InputEvent;
use crate::core::view::{EventResult, Route};
use crate::models::{GenerationOutcome, PathError, SubmitError, WorkspaceSession};

use super::input::InputAction;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Chat,
    Panel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelTab {
    Preview,
    Code,
}

pub struct WorkspaceView {
    session: WorkspaceSession,
    chat: ChatPanel,
    preview: PreviewPanel,
    code: CodePanel,
    focus: Focus,
    tab: PanelTab,
    panel_area: Option<Rect>,
}

impl WorkspaceView {
    pub fn new(session: WorkspaceSession) -> Self {
        Self {
            session,
            chat: ChatPanel::new(),
            preview: PreviewPanel::new(),
            code: CodePanel::new(),
            focus: Focus::Chat,
            tab: PanelTab::Preview,
            panel_area: None,
        }
    }

    pub fn session(&self) -> &WorkspaceSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut WorkspaceSession {
        &mut self.session
    }

    pub fn tab(&self) -> PanelTab {
        self.tab
    }

    /// 生成成功:提交给会话,并让代码面板丢掉旧缓存。
    pub fn apply_generation(&mut self, outcome: GenerationOutcome) -> Result<(), PathError> {
        let result = self.session.apply_outcome(outcome);
        self.code.invalidate();
        result
    }

    pub fn fail_generation(&mut self) {
        self.session.fail_generation();
    }

    pub fn finish_preview_refresh(&mut self) {
        self.preview.finish_refresh();
    }

    pub fn handle_input(&mut self, event: &InputEvent) -> EventResult {
        match event {
            InputEvent::Key(key) => self.handle_key(key),
            InputEvent::Mouse(mouse) => self.handle_mouse(mouse),
            InputEvent::Paste(text) => self.handle_paste(text),
            _ => EventResult::Ignored,
        }
    }

    fn handle_paste(&mut self, text: &str) -> EventResult {
        // 粘贴只进聊天输入,和按键一样在生成中被禁用。
        if self.focus != Focus::Chat || self.session.is_generating() {
            return EventResult::Ignored;
        }
        self.chat.paste(text);
        EventResult::Consumed
    }

    fn handle_key(&mut self, key: &KeyEvent) -> EventResult {
        match key.code {
            KeyCode::Esc => return EventResult::Navigate(Route::Home),
            KeyCode::Tab => {
                self.focus = match self.focus {
                    Focus::Chat => Focus::Panel,
                    Focus::Panel => Focus::Chat,
                };
                return EventResult::Consumed;
            }
            _ => {}
        }

        match self.focus {
            Focus::Chat => self.handle_chat_key(key),
            Focus::Panel => self.handle_panel_key(key),
        }
    }

    fn handle_chat_key(&mut self, key: &KeyEvent) -> EventResult {
        // 生成中输入禁用;忙碌拒绝在会话层还有一道。
        if self.session.is_generating() {
            return EventResult::Ignored;
        }
        match self.chat.handle_key(key) {
            InputAction::Submitted(text) => EventResult::SubmitPrompt(text),
            InputAction::Edited => EventResult::Consumed,
            InputAction::Ignored => EventResult::Ignored,
        }
    }

    fn handle_panel_key(&mut self, key: &KeyEvent) -> EventResult {
        match key.code {
            KeyCode::Char('p') if self.tab != PanelTab::Preview => {
                self.tab = PanelTab::Preview;
                return EventResult::Consumed;
            }
            KeyCode::Char('c') if self.tab != PanelTab::Code => {
                self.tab = PanelTab::Code;
                return EventResult::Consumed;
            }
            _ => {}
        }
        match self.tab {
            PanelTab::Preview => self.preview.handle_key(key),
            PanelTab::Code => self.code.handle_key(key, &mut self.session),
        }
    }

    fn handle_mouse(&mut self, mouse: &MouseEvent) -> EventResult {
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if self.chat.contains(mouse.column, mouse.row) {
                    self.focus = Focus::Chat;
                } else if self.panel_contains(mouse.column, mouse.row) {
                    self.focus = Focus::Panel;
                    if self.tab == PanelTab::Code
                        && self.code.tree_contains(mouse.column, mouse.row)
                    {
                        self.code.click_tree(mouse.row, &mut self.session);
                    }
                }
                EventResult::Consumed
            }
            MouseEventKind::ScrollUp => {
                if self.chat.contains(mouse.column, mouse.row) {
                    self.chat.scroll_up();
                } else if self.tab == PanelTab::Code
                    && self.code.viewer_contains(mouse.column, mouse.row)
                {
                    self.code.scroll_viewer_up(3);
                }
                EventResult::Consumed
            }
            MouseEventKind::ScrollDown => {
                if self.chat.contains(mouse.column, mouse.row) {
                    self.chat.scroll_down();
                } else if self.tab == PanelTab::Code
                    && self.code.viewer_contains(mouse.column, mouse.row)
                {
                    self.code.scroll_viewer_down(&self.session, 3);
                }
                EventResult::Consumed
            }
            _ => EventResult::Ignored,
        }
    }

    fn panel_contains(&self, x: u16, y: u16) -> bool {
        self.panel_area.is_some_and(|area| {
            x >= area.x && x < area.x + area.width && y >= area.y && y < area.y + area.height
        })
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect, theme: &UiTheme, spinner: &str) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(42), Constraint::Percentage(58)])
            .split(area);

        self.chat.render(
            frame,
            chunks[0],
            theme,
            &self.session,
            self.focus == Focus::Chat,
            spinner,
        );

        self.panel_area = Some(chunks[1]);
        let panel_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(0)])
            .split(chunks[1]);

        self.render_tabs(frame, panel_chunks[0], theme);
        let focused = self.focus == Focus::Panel;
        match self.tab {
            PanelTab::Preview => self.preview.render(
                frame,
                panel_chunks[1],
                theme,
                &self.session,
                focused,
                spinner,
            ),
            PanelTab::Code => {
                self.code
                    .render(frame, panel_chunks[1], theme, &self.session, focused)
            }
        }
    }

    fn render_tabs(&self, frame: &mut Frame, area: Rect, theme: &UiTheme) {
        let mut spans = Vec::new();
        for (tab, label) in [(PanelTab::Preview, " Preview "), (PanelTab::Code, " Code ")] {
            let style = if tab == self.tab {
                Style::default()
                    .fg(theme.tab_active_fg)
                    .bg(theme.tab_active_bg)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme.tab_inactive_fg)
            };
            spans.push(Span::styled(label, style));
            spans.push(Span::raw(" "));
        }
        spans.push(Span::styled(
            format!(" {} files", self.session.files().len()),
            Style::default().fg(theme.muted_fg),
        ));
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    pub fn cursor_position(&self) -> Option<(u16, u16)> {
        if self.focus == Focus::Chat && !self.session.is_generating() {
            return self.chat.cursor_position();
        }
        None
    }
}

/// 提交结果统一在这里打日志;忙碌和空输入都不是错误,只是拒绝。
pub fn log_rejected_submit(err: SubmitError) {
    match err {
        SubmitError::Empty => tracing::debug!("ignoring empty prompt submission"),
        SubmitError::Busy => {
            tracing::debug!("submission rejected, a generation is already running")
        }
    }
}
