//! 单行提示词输入框
//!
//! 首页、模板搜索和聊天面板共用的输入组件。光标是字节偏移,
//! 移动和删除按字素簇进行,渲染时用 text_window 做横向滚动。

use crate::app::theme::UiTheme;
use crate::core::text_window;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::Span;
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// 一次按键处理的结果。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputAction {
    Edited,
    Submitted(String),
    Ignored,
}

pub struct PromptInput {
    text: String,
    cursor: usize,
    placeholder: &'static str,
    area: Option<Rect>,
}

impl PromptInput {
    pub fn new(placeholder: &'static str) -> Self {
        Self {
            text: String::new(),
            cursor: 0,
            placeholder,
            area: None,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.cursor = self.text.len();
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    pub fn insert_char(&mut self, ch: char) {
        self.text.insert(self.cursor, ch);
        self.cursor += ch.len_utf8();
    }

    pub fn insert_str(&mut self, s: &str) {
        self.text.insert_str(self.cursor, s);
        self.cursor += s.len();
    }

    /// 粘贴进单行输入:换行等控制字符压成空格。
    pub fn paste(&mut self, text: &str) {
        let flat: String = text
            .chars()
            .map(|c| if c.is_control() { ' ' } else { c })
            .collect();
        self.insert_str(&flat);
    }

    fn prev_boundary(&self) -> usize {
        self.text[..self.cursor]
            .grapheme_indices(true)
            .last()
            .map(|(idx, _)| idx)
            .unwrap_or(0)
    }

    fn next_boundary(&self) -> usize {
        self.text[self.cursor..]
            .graphemes(true)
            .next()
            .map(|g| self.cursor + g.len())
            .unwrap_or(self.text.len())
    }

    pub fn delete_backward(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let start = self.prev_boundary();
        self.text.replace_range(start..self.cursor, "");
        self.cursor = start;
    }

    pub fn delete_forward(&mut self) {
        if self.cursor >= self.text.len() {
            return;
        }
        let end = self.next_boundary();
        self.text.replace_range(self.cursor..end, "");
    }

    pub fn move_left(&mut self) {
        self.cursor = self.prev_boundary();
    }

    pub fn move_right(&mut self) {
        self.cursor = self.next_boundary();
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.text.len();
    }

    /// 处理一次按键。Enter 提交去除首尾空白后的文本并清空输入,
    /// 空白内容的 Enter 不产生提交。
    pub fn handle_key(&mut self, key: &KeyEvent) -> InputAction {
        match (key.code, key.modifiers) {
            (KeyCode::Enter, _) => {
                if self.is_blank() {
                    return InputAction::Ignored;
                }
                let submitted = self.text.trim().to_string();
                self.clear();
                InputAction::Submitted(submitted)
            }
            (KeyCode::Backspace, _) => {
                self.delete_backward();
                InputAction::Edited
            }
            (KeyCode::Delete, _) => {
                self.delete_forward();
                InputAction::Edited
            }
            (KeyCode::Left, KeyModifiers::NONE) => {
                self.move_left();
                InputAction::Edited
            }
            (KeyCode::Right, KeyModifiers::NONE) => {
                self.move_right();
                InputAction::Edited
            }
            (KeyCode::Home, KeyModifiers::NONE) => {
                self.move_home();
                InputAction::Edited
            }
            (KeyCode::End, KeyModifiers::NONE) => {
                self.move_end();
                InputAction::Edited
            }
            (KeyCode::Char('u'), KeyModifiers::CONTROL) => {
                self.clear();
                InputAction::Edited
            }
            (KeyCode::Char(c), mods) if mods.is_empty() || mods == KeyModifiers::SHIFT => {
                self.insert_char(c);
                InputAction::Edited
            }
            _ => InputAction::Ignored,
        }
    }

    /// 当前窗口内可见的文本片段,以及光标相对窗口起点的显示列。
    pub fn view(&self, width: u16) -> (&str, u16) {
        let (start, end) = text_window::window(&self.text, self.cursor, width as usize);
        let visible = &self.text[start..end];
        let cols = UnicodeWidthStr::width(&self.text[start..self.cursor]);
        (visible, cols.min(u16::MAX as usize) as u16)
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect, theme: &UiTheme, focused: bool) {
        self.area = Some(area);
        if area.width == 0 || area.height == 0 {
            return;
        }

        if self.text.is_empty() {
            frame.render_widget(
                Paragraph::new(Span::styled(
                    self.placeholder,
                    Style::default().fg(theme.muted_fg),
                )),
                area,
            );
            return;
        }

        let (visible, _) = self.view(area.width);
        let style = if focused {
            Style::default().fg(theme.fg)
        } else {
            Style::default().fg(theme.muted_fg)
        };
        frame.render_widget(
            Paragraph::new(Span::styled(visible.to_string(), style)),
            area,
        );
    }

    pub fn cursor_position(&self) -> Option<(u16, u16)> {
        let area = self.area?;
        if area.width == 0 || area.height == 0 {
            return None;
        }
        let (_, cols) = self.view(area.width);
        let x = area.x.saturating_add(cols.min(area.width.saturating_sub(1)));
        Some((x, area.y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventKind;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            state: crossterm::event::KeyEventState::NONE,
        }
    }

    #[test]
    fn test_typing_and_submit() {
        let mut input = PromptInput::new("...");
        for c in "a blog".chars() {
            assert_eq!(
                input.handle_key(&key(KeyCode::Char(c), KeyModifiers::NONE)),
                InputAction::Edited
            );
        }
        assert_eq!(input.text(), "a blog");

        let action = input.handle_key(&key(KeyCode::Enter, KeyModifiers::NONE));
        assert_eq!(action, InputAction::Submitted("a blog".to_string()));
        assert!(input.text().is_empty());
    }

    #[test]
    fn test_blank_submit_is_ignored() {
        let mut input = PromptInput::new("...");
        input.set_text("   ");
        assert_eq!(
            input.handle_key(&key(KeyCode::Enter, KeyModifiers::NONE)),
            InputAction::Ignored
        );
        assert_eq!(input.text(), "   ");
    }

    #[test]
    fn test_grapheme_deletion() {
        let mut input = PromptInput::new("...");
        input.set_text("ae\u{301}z");
        input.delete_backward();
        assert_eq!(input.text(), "ae\u{301}");
        input.delete_backward();
        assert_eq!(input.text(), "a");
    }

    #[test]
    fn test_cursor_movement_over_wide_chars() {
        let mut input = PromptInput::new("...");
        input.set_text("你好");
        input.move_left();
        input.insert_char('x');
        assert_eq!(input.text(), "你x好");
        input.move_home();
        input.move_right();
        input.insert_char('y');
        assert_eq!(input.text(), "你yx好");
    }

    #[test]
    fn test_paste_flattens_control_characters() {
        let mut input = PromptInput::new("...");
        input.set_text("a site");
        input.move_home();
        input.move_right();
        input.paste(" multi\nline\tpaste");
        assert_eq!(input.text(), "a multi line paste site");
    }

    #[test]
    fn test_ctrl_u_clears() {
        let mut input = PromptInput::new("...");
        input.set_text("hello");
        input.handle_key(&key(KeyCode::Char('u'), KeyModifiers::CONTROL));
        assert!(input.text().is_empty());
    }

    #[test]
    fn test_view_windows_long_text() {
        let mut input = PromptInput::new("...");
        input.set_text("abcdefghij");
        let (visible, cols) = input.view(5);
        assert_eq!(visible, "fghij");
        assert_eq!(cols, 5);

        input.move_home();
        let (visible, cols) = input.view(5);
        assert_eq!(visible, "abcde");
        assert_eq!(cols, 0);
    }
}
