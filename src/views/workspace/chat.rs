//! 聊天面板:消息气泡、生成中指示、底部输入框。
//!
//! 自己做折行,滚动量才能算得准;默认贴着底部显示最新消息。

use crossterm::event::KeyEvent;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::app::theme::UiTheme;
use crate::models::{format_clock, ChatMessage, Role, WorkspaceSession};

use super::super::input::{InputAction, PromptInput};

pub struct ChatPanel {
    input: PromptInput,
    /// 距底部的行数,0 表示跟随最新消息。
    scroll_from_bottom: usize,
    area: Option<Rect>,
}

impl ChatPanel {
    pub fn new() -> Self {
        Self {
            input: PromptInput::new("Ask for changes or describe a new feature..."),
            scroll_from_bottom: 0,
            area: None,
        }
    }

    pub fn handle_key(&mut self, key: &KeyEvent) -> InputAction {
        let action = self.input.handle_key(key);
        if action != InputAction::Ignored {
            // 一旦编辑就跳回底部,保证输入和回应都看得见。
            self.scroll_from_bottom = 0;
        }
        action
    }

    pub fn paste(&mut self, text: &str) {
        self.input.paste(text);
        self.scroll_from_bottom = 0;
    }

    pub fn scroll_up(&mut self) {
        self.scroll_from_bottom = self.scroll_from_bottom.saturating_add(3);
    }

    pub fn scroll_down(&mut self) {
        self.scroll_from_bottom = self.scroll_from_bottom.saturating_sub(3);
    }

    pub fn contains(&self, x: u16, y: u16) -> bool {
        self.area.is_some_and(|area| {
            x >= area.x && x < area.x + area.width && y >= area.y && y < area.y + area.height
        })
    }

    pub fn render(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        theme: &UiTheme,
        session: &WorkspaceSession,
        focused: bool,
        spinner: &str,
    ) {
        self.area = Some(area);
        let border = if focused {
            theme.focus_border
        } else {
            theme.inactive_border
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
            .title(" Chat ");
        let inner = block.inner(area);
        frame.render_widget(block, area);
        if inner.height < 4 {
            return;
        }

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(3)])
            .split(inner);

        self.render_messages(frame, chunks[0], theme, session, spinner);
        self.render_input(frame, chunks[1], theme, session, focused);
    }

    fn render_messages(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        theme: &UiTheme,
        session: &WorkspaceSession,
        spinner: &str,
    ) {
        let width = area.width.max(1) as usize;
        let mut lines: Vec<Line> = Vec::new();

        if session.chat_is_empty() && !session.is_generating() {
            lines.push(Line::from(Span::styled(
                "Describe what you want and press Enter.",
                Style::default().fg(theme.muted_fg),
            )));
        }

        for message in session.messages() {
            push_message_lines(&mut lines, message, width, theme);
        }

        if session.is_generating() {
            lines.push(Line::from(Span::styled(
                format!("{spinner} Generating your website..."),
                Style::default().fg(theme.accent_fg),
            )));
        }

        let viewport = area.height as usize;
        let max_from_bottom = lines.len().saturating_sub(viewport);
        if self.scroll_from_bottom > max_from_bottom {
            self.scroll_from_bottom = max_from_bottom;
        }
        let top = max_from_bottom - self.scroll_from_bottom;
        let visible: Vec<Line> = lines.into_iter().skip(top).take(viewport).collect();
        frame.render_widget(Paragraph::new(visible), area);
    }

    fn render_input(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        theme: &UiTheme,
        session: &WorkspaceSession,
        focused: bool,
    ) {
        let generating = session.is_generating();
        let border = if generating {
            theme.inactive_border
        } else if focused {
            theme.focus_border
        } else {
            theme.inactive_border
        };
        let title = if generating { " Waiting... " } else { " Prompt " };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
            .title(title);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        self.input.render(frame, inner, theme, focused && !generating);
    }

    pub fn cursor_position(&self) -> Option<(u16, u16)> {
        self.input.cursor_position()
    }
}

impl Default for ChatPanel {
    fn default() -> Self {
        Self::new()
    }
}

fn push_message_lines(lines: &mut Vec<Line>, message: &ChatMessage, width: usize, theme: &UiTheme) {
    let (label, color) = match message.role {
        Role::User => ("You", theme.user_fg),
        Role::Assistant => ("AI", theme.assistant_fg),
    };
    lines.push(Line::from(vec![
        Span::styled(
            label,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("  {}", format_clock(message.timestamp_ms)),
            Style::default().fg(theme.muted_fg),
        ),
    ]));
    for wrapped in wrap_text(&message.content, width) {
        lines.push(Line::from(Span::styled(
            wrapped,
            Style::default().fg(theme.fg),
        )));
    }
    lines.push(Line::from(""));
}

/// 按显示宽度贪心折行。优先在空格断,整个词放不下时按字符硬切。
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut out = Vec::new();

    for raw_line in text.lines() {
        if raw_line.is_empty() {
            out.push(String::new());
            continue;
        }
        let mut current = String::new();
        let mut current_width = 0usize;
        for word in raw_line.split(' ') {
            let word_width = UnicodeWidthStr::width(word);
            let sep = usize::from(!current.is_empty());
            if current_width + sep + word_width <= width {
                if sep == 1 {
                    current.push(' ');
                }
                current.push_str(word);
                current_width += sep + word_width;
                continue;
            }
            if !current.is_empty() {
                out.push(std::mem::take(&mut current));
                current_width = 0;
            }
            if word_width <= width {
                current.push_str(word);
                current_width = word_width;
            } else {
                // 超长词:按字符切成整行。
                for ch in word.chars() {
                    let w = UnicodeWidthChar::width(ch).unwrap_or(0);
                    if current_width + w > width && !current.is_empty() {
                        out.push(std::mem::take(&mut current));
                        current_width = 0;
                    }
                    current.push(ch);
                    current_width += w;
                }
            }
        }
        out.push(current);
    }

    if out.is_empty() {
        out.push(String::new());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_stays_on_one_line() {
        assert_eq!(wrap_text("hello world", 20), vec!["hello world"]);
    }

    #[test]
    fn wraps_at_word_boundaries() {
        assert_eq!(
            wrap_text("the quick brown fox", 10),
            vec!["the quick", "brown fox"]
        );
    }

    #[test]
    fn hard_splits_overlong_words() {
        assert_eq!(wrap_text("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn keeps_explicit_newlines() {
        assert_eq!(wrap_text("one\n\ntwo", 10), vec!["one", "", "two"]);
    }

    #[test]
    fn wide_chars_count_double() {
        // 每个汉字占两列,宽度 4 一行放两个。
        assert_eq!(wrap_text("你好世界", 4), vec!["你好", "世界"]);
        assert_eq!(wrap_text("你好 世界", 4), vec!["你好", "世界"]);
    }

    #[test]
    fn empty_text_yields_single_empty_line() {
        assert_eq!(wrap_text("", 8), vec![""]);
    }
}
