//! 模板画廊:静态目录加搜索与分类过滤。
//!
//! 打字即搜索,←/→ 换分类,↑/↓ 选模板,回车直接带着开场提示词进工作台。

use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::app::theme::UiTheme;
use crate::core::event::InputEvent;
use crate::core::view::{EventResult, Route};
use crate::models::{filter_templates, Template, CATEGORIES};

use super::input::{InputAction, PromptInput};

pub struct TemplatesView {
    search: PromptInput,
    category_idx: usize,
    selected: usize,
    scroll: usize,
}

impl TemplatesView {
    pub fn new() -> Self {
        Self {
            search: PromptInput::new("Search templates..."),
            category_idx: 0,
            selected: 0,
            scroll: 0,
        }
    }

    pub fn category(&self) -> &'static str {
        CATEGORIES[self.category_idx].0
    }

    pub fn filtered(&self) -> Vec<&'static Template> {
        filter_templates(self.search.text(), self.category())
    }

    fn clamp_selection(&mut self) {
        let count = self.filtered().len();
        if count == 0 {
            self.selected = 0;
        } else if self.selected >= count {
            self.selected = count - 1;
        }
    }

    pub fn handle_input(&mut self, event: &InputEvent) -> EventResult {
        let key = match event {
            InputEvent::Key(key) => key,
            InputEvent::Paste(text) => {
                // 粘贴进搜索框跟打字一个待遇:过滤结果变了,选中回到头。
                self.search.paste(text);
                self.selected = 0;
                self.scroll = 0;
                return EventResult::Consumed;
            }
            _ => return EventResult::Ignored,
        };

        match (key.code, key.modifiers) {
            (KeyCode::Esc, _) => return EventResult::Navigate(Route::Home),
            (KeyCode::Left, KeyModifiers::NONE) => {
                self.category_idx = if self.category_idx == 0 {
                    CATEGORIES.len() - 1
                } else {
                    self.category_idx - 1
                };
                self.selected = 0;
                return EventResult::Consumed;
            }
            (KeyCode::Right, KeyModifiers::NONE) => {
                self.category_idx = (self.category_idx + 1) % CATEGORIES.len();
                self.selected = 0;
                return EventResult::Consumed;
            }
            (KeyCode::Up, KeyModifiers::NONE) => {
                self.selected = self.selected.saturating_sub(1);
                return EventResult::Consumed;
            }
            (KeyCode::Down, KeyModifiers::NONE) => {
                self.selected += 1;
                self.clamp_selection();
                return EventResult::Consumed;
            }
            (KeyCode::Enter, _) => {
                let matches = self.filtered();
                let Some(template) = matches.get(self.selected) else {
                    return EventResult::Consumed;
                };
                return EventResult::OpenWorkspace(template.workspace_prompt());
            }
            _ => {}
        }

        match self.search.handle_key(key) {
            InputAction::Edited => {
                self.selected = 0;
                self.scroll = 0;
                EventResult::Consumed
            }
            // Enter 已经在上面拦下,这里不会出现 Submitted。
            InputAction::Submitted(_) => EventResult::Consumed,
            InputAction::Ignored => EventResult::Ignored,
        }
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect, theme: &UiTheme) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // 搜索框
                Constraint::Length(1), // 分类条
                Constraint::Min(0),    // 列表
            ])
            .split(area);

        self.render_search(frame, chunks[0], theme);
        self.render_categories(frame, chunks[1], theme);
        self.render_list(frame, chunks[2], theme);
    }

    fn render_search(&mut self, frame: &mut Frame, area: Rect, theme: &UiTheme) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.focus_border))
            .title(" Search ");
        let inner = block.inner(area);
        frame.render_widget(block, area);
        self.search.render(frame, inner, theme, true);
    }

    fn render_categories(&self, frame: &mut Frame, area: Rect, theme: &UiTheme) {
        let mut spans = Vec::new();
        for (idx, (_, label)) in CATEGORIES.iter().enumerate() {
            let style = if idx == self.category_idx {
                Style::default()
                    .fg(theme.tab_active_fg)
                    .bg(theme.tab_active_bg)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme.tab_inactive_fg)
            };
            spans.push(Span::styled(format!(" {label} "), style));
            spans.push(Span::raw(" "));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn render_list(&mut self, frame: &mut Frame, area: Rect, theme: &UiTheme) {
        let matches = self.filtered();
        let block = Block::default()
            .borders(Borders::TOP)
            .border_style(Style::default().fg(theme.inactive_border))
            .title(Span::styled(
                format!(" {} templates ", matches.len()),
                Style::default().fg(theme.header_fg),
            ));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if matches.is_empty() {
            frame.render_widget(
                Paragraph::new(Span::styled(
                    "No templates match your search.",
                    Style::default().fg(theme.muted_fg),
                )),
                inner,
            );
            return;
        }

        // 每个模板占两行,保证选中项在窗口内。
        let rows_per_item = 2usize;
        let visible_items = (inner.height as usize / rows_per_item).max(1);
        if self.selected < self.scroll {
            self.scroll = self.selected;
        } else if self.selected >= self.scroll + visible_items {
            self.scroll = self.selected + 1 - visible_items;
        }

        let mut lines = Vec::new();
        for (idx, template) in matches
            .iter()
            .enumerate()
            .skip(self.scroll)
            .take(visible_items)
        {
            let is_selected = idx == self.selected;
            let marker = if is_selected { "› " } else { "  " };
            let title_style = if is_selected {
                Style::default()
                    .fg(theme.selected_fg)
                    .bg(theme.selected_bg)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme.fg)
            };
            lines.push(Line::from(vec![
                Span::styled(marker, Style::default().fg(theme.accent_fg)),
                Span::styled(template.name, title_style),
                Span::styled(
                    format!("  ({})", template.category),
                    Style::default().fg(theme.muted_fg),
                ),
            ]));
            lines.push(Line::from(vec![
                Span::raw("    "),
                Span::styled(template.description, Style::default().fg(theme.muted_fg)),
                Span::styled(
                    format!("  #{}", template.tags.join(" #")),
                    Style::default().fg(theme.accent_fg),
                ),
            ]));
        }
        frame.render_widget(Paragraph::new(lines), inner);
    }

    pub fn cursor_position(&self) -> Option<(u16, u16)> {
        self.search.cursor_position()
    }
}

impl Default for TemplatesView {
    fn default() -> Self {
        Self::new()
    }
}
