//! 预览面板:占位的"浏览器"外框。
//!
//! 真渲染不在范围内,这里展示预览地址、视口模式和刷新动画;
//! 部署/下载还没做,按下去只给一条提示。

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::app::theme::UiTheme;
use crate::core::view::EventResult;
use crate::models::WorkspaceSession;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewportMode {
    Desktop,
    Tablet,
    Mobile,
}

impl ViewportMode {
    fn label(self) -> &'static str {
        match self {
            ViewportMode::Desktop => "Desktop",
            ViewportMode::Tablet => "Tablet",
            ViewportMode::Mobile => "Mobile",
        }
    }

    /// 框宽占可用宽度的百分比。
    fn width_percent(self) -> u16 {
        match self {
            ViewportMode::Desktop => 100,
            ViewportMode::Tablet => 62,
            ViewportMode::Mobile => 34,
        }
    }
}

const NOTICE_TICKS: u8 = 30;

pub struct PreviewPanel {
    mode: ViewportMode,
    refreshing: bool,
    notice: Option<String>,
    notice_ticks: u8,
}

impl PreviewPanel {
    pub fn new() -> Self {
        Self {
            mode: ViewportMode::Desktop,
            refreshing: false,
            notice: None,
            notice_ticks: 0,
        }
    }

    pub fn mode(&self) -> ViewportMode {
        self.mode
    }

    pub fn is_refreshing(&self) -> bool {
        self.refreshing
    }

    pub fn finish_refresh(&mut self) {
        self.refreshing = false;
    }

    fn set_notice(&mut self, text: impl Into<String>) {
        self.notice = Some(text.into());
        self.notice_ticks = NOTICE_TICKS;
    }

    pub fn handle_key(&mut self, key: &KeyEvent) -> EventResult {
        match key.code {
            KeyCode::Char('d') => {
                self.mode = ViewportMode::Desktop;
                EventResult::Consumed
            }
            KeyCode::Char('t') => {
                self.mode = ViewportMode::Tablet;
                EventResult::Consumed
            }
            KeyCode::Char('m') => {
                self.mode = ViewportMode::Mobile;
                EventResult::Consumed
            }
            KeyCode::Char('r') => {
                if self.refreshing {
                    return EventResult::Consumed;
                }
                self.refreshing = true;
                EventResult::RefreshPreview
            }
            KeyCode::Char('x') => {
                self.set_notice("Deploy is coming soon");
                EventResult::Consumed
            }
            KeyCode::Char('s') => {
                self.set_notice("Download is coming soon");
                EventResult::Consumed
            }
            _ => EventResult::Ignored,
        }
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
        let border = if focused {
            theme.focus_border
        } else {
            theme.inactive_border
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
            .title(" Preview ");
        let inner = block.inner(area);
        frame.render_widget(block, area);
        if inner.height < 3 {
            return;
        }

        let Some(preview_ref) = session.preview_ref() else {
            frame.render_widget(
                Paragraph::new(Span::styled(
                    "Submit a prompt to generate a preview.",
                    Style::default().fg(theme.muted_fg),
                ))
                .alignment(Alignment::Center),
                inner,
            );
            return;
        };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // 地址栏
                Constraint::Length(1), // 视口切换
                Constraint::Min(0),    // 页面框
                Constraint::Length(1), // 提示行
            ])
            .split(inner);

        self.render_address_bar(frame, chunks[0], theme, preview_ref, spinner);
        self.render_mode_tabs(frame, chunks[1], theme);
        self.render_frame(frame, chunks[2], theme, preview_ref, spinner);
        self.render_notice(frame, chunks[3], theme);
    }

    fn render_address_bar(
        &self,
        frame: &mut Frame,
        area: Rect,
        theme: &UiTheme,
        preview_ref: &str,
        spinner: &str,
    ) {
        let status = if self.refreshing { spinner } else { "⟳" };
        let line = Line::from(vec![
            Span::styled(format!(" {status} "), Style::default().fg(theme.accent_fg)),
            Span::styled(preview_ref.to_string(), Style::default().fg(theme.fg)),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }

    fn render_mode_tabs(&self, frame: &mut Frame, area: Rect, theme: &UiTheme) {
        let mut spans = Vec::new();
        for mode in [
            ViewportMode::Desktop,
            ViewportMode::Tablet,
            ViewportMode::Mobile,
        ] {
            let style = if mode == self.mode {
                Style::default()
                    .fg(theme.tab_active_fg)
                    .bg(theme.tab_active_bg)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme.tab_inactive_fg)
            };
            spans.push(Span::styled(format!(" {} ", mode.label()), style));
            spans.push(Span::raw(" "));
        }
        spans.push(Span::styled(
            " d/t/m switch · r refresh · x deploy · s download",
            Style::default().fg(theme.muted_fg),
        ));
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn render_frame(
        &self,
        frame: &mut Frame,
        area: Rect,
        theme: &UiTheme,
        preview_ref: &str,
        spinner: &str,
    ) {
        let percent = self.mode.width_percent();
        let frame_area = if percent >= 100 {
            area
        } else {
            let side = (100 - percent) / 2;
            let chunks = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([
                    Constraint::Percentage(side),
                    Constraint::Percentage(percent),
                    Constraint::Percentage(side),
                ])
                .split(area);
            chunks[1]
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.inactive_border));
        let inner = block.inner(frame_area);
        frame.render_widget(block, frame_area);

        let body = if self.refreshing {
            vec![
                Line::from(""),
                Line::from(Span::styled(
                    format!("{spinner} Refreshing..."),
                    Style::default().fg(theme.accent_fg),
                )),
            ]
        } else {
            vec![
                Line::from(""),
                Line::from(Span::styled(
                    "Placeholder preview",
                    Style::default()
                        .fg(theme.fg)
                        .add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(
                    "zsite does not render pages; this frame points at",
                    Style::default().fg(theme.muted_fg),
                )),
                Line::from(Span::styled(
                    preview_ref.to_string(),
                    Style::default().fg(theme.accent_fg),
                )),
            ]
        };
        frame.render_widget(
            Paragraph::new(body).alignment(Alignment::Center),
            inner,
        );
    }

    fn render_notice(&mut self, frame: &mut Frame, area: Rect, theme: &UiTheme) {
        if let Some(notice) = &self.notice {
            frame.render_widget(
                Paragraph::new(Span::styled(
                    format!(" {notice}"),
                    Style::default().fg(theme.warning_fg),
                )),
                area,
            );
            self.notice_ticks = self.notice_ticks.saturating_sub(1);
            if self.notice_ticks == 0 {
                self.notice = None;
            }
        }
    }
}

impl Default for PreviewPanel {
    fn default() -> Self {
        Self::new()
    }
}
