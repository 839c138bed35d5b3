//! 代码面板:左边生成文件树,右边只读查看器。
//!
//! 树的游标和选中是两回事:游标跟着 ↑/↓ 走,回车才展开文件夹
//! 或选中文件。查看器带行号和 tree-sitter 高亮,y 把当前文件
//! 拷进系统剪贴板(OSC52)。

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;
use ropey::Rope;

use crate::app::theme::UiTheme;
use crate::core::view::EventResult;
use crate::models::{TreeRow, WorkspaceSession};
use crate::syntax::{highlight_lines, HighlightSpan, Language};

const TREE_WIDTH: u16 = 32;

struct HighlightCache {
    path: String,
    content_len: usize,
    rope: Rope,
    lines: Vec<Vec<HighlightSpan>>,
}

pub struct CodePanel {
    cursor: usize,
    tree_scroll: usize,
    viewer_scroll: usize,
    viewer_height: usize,
    cache: Option<HighlightCache>,
    tree_area: Option<Rect>,
    viewer_area: Option<Rect>,
}

impl CodePanel {
    pub fn new() -> Self {
        Self {
            cursor: 0,
            tree_scroll: 0,
            viewer_scroll: 0,
            viewer_height: 0,
            cache: None,
            tree_area: None,
            viewer_area: None,
        }
    }

    /// 文件集整体替换之后调用,丢掉旧高亮。
    pub fn invalidate(&mut self) {
        self.cache = None;
        self.viewer_scroll = 0;
    }

    pub fn handle_key(&mut self, key: &KeyEvent, session: &mut WorkspaceSession) -> EventResult {
        let rows = session.visible_rows();
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.cursor = self.cursor.saturating_sub(1);
                EventResult::Consumed
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.cursor + 1 < rows.len() {
                    self.cursor += 1;
                }
                EventResult::Consumed
            }
            KeyCode::Enter => {
                self.activate_row(session, &rows);
                EventResult::Consumed
            }
            KeyCode::PageUp => {
                self.viewer_scroll = self
                    .viewer_scroll
                    .saturating_sub(self.viewer_height.max(1));
                EventResult::Consumed
            }
            KeyCode::PageDown => {
                self.scroll_viewer_down(session, self.viewer_height.max(1));
                EventResult::Consumed
            }
            KeyCode::Char('y') => match session.selected_file() {
                Some((path, _)) => EventResult::CopyFile(path.to_string()),
                None => EventResult::Consumed,
            },
            _ => EventResult::Ignored,
        }
    }

    fn activate_row(&mut self, session: &mut WorkspaceSession, rows: &[TreeRow]) {
        let Some(row) = rows.get(self.cursor) else {
            return;
        };
        if row.is_folder {
            session.view_mut().toggle(&row.path);
        } else {
            let changed = session.view().selected() != Some(row.path.as_str());
            session.view_mut().select(row.path.clone());
            if changed {
                self.viewer_scroll = 0;
            }
        }
    }

    pub fn scroll_viewer_up(&mut self, lines: usize) {
        self.viewer_scroll = self.viewer_scroll.saturating_sub(lines);
    }

    pub fn scroll_viewer_down(&mut self, session: &WorkspaceSession, lines: usize) {
        let total = session
            .selected_file()
            .map(|(_, content)| content.lines().count())
            .unwrap_or(0);
        let max = total.saturating_sub(self.viewer_height.max(1));
        self.viewer_scroll = (self.viewer_scroll + lines).min(max);
    }

    pub fn tree_contains(&self, x: u16, y: u16) -> bool {
        rect_contains(self.tree_area, x, y)
    }

    pub fn viewer_contains(&self, x: u16, y: u16) -> bool {
        rect_contains(self.viewer_area, x, y)
    }

    /// 鼠标点在树上:把游标挪过去并触发一次回车语义。
    pub fn click_tree(&mut self, y: u16, session: &mut WorkspaceSession) {
        let Some(area) = self.tree_area else { return };
        if y < area.y {
            return;
        }
        let idx = self.tree_scroll + (y - area.y) as usize;
        let rows = session.visible_rows();
        if idx < rows.len() {
            self.cursor = idx;
            self.activate_row(session, &rows);
        }
    }

    pub fn render(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        theme: &UiTheme,
        session: &WorkspaceSession,
        focused: bool,
    ) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(TREE_WIDTH), Constraint::Min(0)])
            .split(area);

        self.render_tree(frame, chunks[0], theme, session, focused);
        self.render_viewer(frame, chunks[1], theme, session);
    }

    fn render_tree(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        theme: &UiTheme,
        session: &WorkspaceSession,
        focused: bool,
    ) {
        let border = if focused {
            theme.focus_border
        } else {
            theme.inactive_border
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
            .title(" Files ");
        let inner = block.inner(area);
        frame.render_widget(block, area);
        self.tree_area = Some(inner);

        let rows = session.visible_rows();
        if rows.is_empty() {
            frame.render_widget(
                Paragraph::new(Span::styled(
                    "No files generated yet.",
                    Style::default().fg(theme.muted_fg),
                )),
                inner,
            );
            return;
        }

        if self.cursor >= rows.len() {
            self.cursor = rows.len() - 1;
        }
        let viewport = inner.height as usize;
        if viewport == 0 {
            return;
        }
        if self.cursor < self.tree_scroll {
            self.tree_scroll = self.cursor;
        } else if self.cursor >= self.tree_scroll + viewport {
            self.tree_scroll = self.cursor + 1 - viewport;
        }

        let selected_path = session.view().selected();
        let mut lines = Vec::new();
        for (idx, row) in rows
            .iter()
            .enumerate()
            .skip(self.tree_scroll)
            .take(viewport)
        {
            lines.push(self.tree_row_line(row, idx, selected_path, theme));
        }
        frame.render_widget(Paragraph::new(lines), inner);
    }

    fn tree_row_line(
        &self,
        row: &TreeRow,
        idx: usize,
        selected_path: Option<&str>,
        theme: &UiTheme,
    ) -> Line<'static> {
        let indent = "  ".repeat(row.depth as usize);
        let icon = if row.is_folder {
            if row.is_expanded {
                "▾ "
            } else {
                "▸ "
            }
        } else {
            "· "
        };

        let mut style = if row.is_folder {
            Style::default().fg(theme.folder_fg)
        } else {
            Style::default().fg(theme.fg)
        };
        if selected_path == Some(row.path.as_str()) {
            style = style.add_modifier(Modifier::BOLD).fg(theme.accent_fg);
        }
        if idx == self.cursor {
            style = style.bg(theme.selected_bg).fg(theme.selected_fg);
        }

        Line::from(Span::styled(
            format!("{indent}{icon}{}", row.name),
            style,
        ))
    }

    fn render_viewer(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        theme: &UiTheme,
        session: &WorkspaceSession,
    ) {
        let title = session
            .selected_file()
            .map(|(path, _)| format!(" {path} "))
            .unwrap_or_else(|| " Code ".to_string());
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.inactive_border))
            .title(title);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        self.viewer_area = Some(inner);
        self.viewer_height = inner.height as usize;

        let Some((path, content)) = session.selected_file() else {
            frame.render_widget(
                Paragraph::new(Span::styled(
                    "Select a file to view its source.",
                    Style::default().fg(theme.muted_fg),
                )),
                inner,
            );
            return;
        };

        self.ensure_cache(path, content);
        let Some(cache) = &self.cache else { return };

        let total_lines = cache.rope.len_lines();
        let max_scroll = total_lines.saturating_sub(self.viewer_height.max(1));
        if self.viewer_scroll > max_scroll {
            self.viewer_scroll = max_scroll;
        }
        let gutter = total_lines.to_string().len().max(2);

        let mut lines = Vec::new();
        let end = (self.viewer_scroll + self.viewer_height).min(total_lines);
        for line_idx in self.viewer_scroll..end {
            let text = cache.rope.line(line_idx).to_string();
            let text = text.trim_end_matches(['\n', '\r']);
            let spans = cache.lines.get(line_idx).map_or(&[][..], Vec::as_slice);
            lines.push(viewer_line(
                line_idx + 1,
                gutter,
                text,
                spans,
                theme,
            ));
        }
        frame.render_widget(Paragraph::new(lines), inner);
    }

    fn ensure_cache(&mut self, path: &str, content: &str) {
        let fresh = self
            .cache
            .as_ref()
            .is_some_and(|cache| cache.path == path && cache.content_len == content.len());
        if fresh {
            return;
        }
        let rope = Rope::from_str(content);
        let lines = match Language::from_path(path) {
            Some(language) => highlight_lines(language, &rope),
            None => vec![Vec::new(); rope.len_lines().max(1)],
        };
        self.cache = Some(HighlightCache {
            path: path.to_string(),
            content_len: content.len(),
            rope,
            lines,
        });
    }
}

impl Default for CodePanel {
    fn default() -> Self {
        Self::new()
    }
}

fn rect_contains(area: Option<Rect>, x: u16, y: u16) -> bool {
    area.is_some_and(|area| {
        x >= area.x && x < area.x + area.width && y >= area.y && y < area.y + area.height
    })
}

/// 一行源码:行号加按高亮区间拆开的片段。区间外的字节用默认前景。
fn viewer_line(
    number: usize,
    gutter: usize,
    text: &str,
    spans: &[HighlightSpan],
    theme: &UiTheme,
) -> Line<'static> {
    let mut parts = vec![Span::styled(
        format!("{number:>gutter$} "),
        Style::default().fg(theme.line_number_fg),
    )];

    let default_style = Style::default().fg(theme.fg);
    let mut pos = 0usize;
    for span in spans {
        let start = clamp_boundary(text, span.start);
        let end = clamp_boundary(text, span.end);
        if start >= end || start < pos {
            continue;
        }
        if pos < start {
            parts.push(Span::styled(text[pos..start].to_string(), default_style));
        }
        parts.push(Span::styled(
            text[start..end].to_string(),
            Style::default().fg(theme.syntax_color(span.kind)),
        ));
        pos = end;
    }
    if pos < text.len() {
        parts.push(Span::styled(text[pos..].to_string(), default_style));
    }
    Line::from(parts)
}

/// 裁到行尾并退到字符边界。高亮区间可能盖住被去掉的行尾换行。
fn clamp_boundary(text: &str, idx: usize) -> usize {
    let mut idx = idx.min(text.len());
    while idx > 0 && !text.is_char_boundary(idx) {
        idx -= 1;
    }
    idx
}
