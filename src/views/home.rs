//! 首页:一句话描述想要的网站,回车开建。
//!
//! 下方带四条示例提示词(Alt+数字快速填入)和一组精选项目展示。
//! 提交后进入"创建中"状态,输入禁用,等工作台那边项目就绪。

use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::app::theme::UiTheme;
use crate::core::event::InputEvent;
use crate::core::view::{EventResult, Route};

use super::input::{InputAction, PromptInput};

pub const EXAMPLE_PROMPTS: &[&str] = &[
    "A portfolio website for a photographer",
    "An online store for handmade jewelry",
    "A landing page for a productivity app",
    "A blog about sustainable living",
];

struct FeaturedProject {
    title: &'static str,
    description: &'static str,
    tags: &'static [&'static str],
    likes: u32,
    views: u32,
}

const FEATURED: &[FeaturedProject] = &[
    FeaturedProject {
        title: "Artisan Coffee Roasters",
        description: "E-commerce site with subscription checkout",
        tags: &["ecommerce", "subscriptions"],
        likes: 234,
        views: 1520,
    },
    FeaturedProject {
        title: "Studio Lumen",
        description: "Photography portfolio with fullscreen galleries",
        tags: &["portfolio", "gallery"],
        likes: 189,
        views: 980,
    },
    FeaturedProject {
        title: "TrailHead Fitness",
        description: "Gym site with class schedules and trainer bios",
        tags: &["fitness", "booking"],
        likes: 156,
        views: 1240,
    },
    FeaturedProject {
        title: "Paper & Ink",
        description: "Magazine-style blog with article previews",
        tags: &["blog", "magazine"],
        likes: 142,
        views: 860,
    },
];

pub struct HomeView {
    input: PromptInput,
    creating: bool,
}

impl HomeView {
    pub fn new() -> Self {
        Self {
            input: PromptInput::new("Describe the website you want to build..."),
            creating: false,
        }
    }

    pub fn is_creating(&self) -> bool {
        self.creating
    }

    /// 项目就绪、已经跳去工作台之后,回到初始状态。
    pub fn reset(&mut self) {
        self.creating = false;
        self.input.clear();
    }

    pub fn handle_input(&mut self, event: &InputEvent) -> EventResult {
        let key = match event {
            InputEvent::Key(key) => key,
            InputEvent::Paste(text) => {
                if self.creating {
                    return EventResult::Ignored;
                }
                self.input.paste(text);
                return EventResult::Consumed;
            }
            _ => return EventResult::Ignored,
        };

        if key.code == KeyCode::Char('t') && key.modifiers == KeyModifiers::CONTROL {
            return EventResult::Navigate(Route::Templates);
        }

        // 创建中禁用一切编辑,避免重复开工。
        if self.creating {
            return EventResult::Ignored;
        }

        if key.modifiers == KeyModifiers::ALT {
            if let KeyCode::Char(digit @ '1'..='4') = key.code {
                let idx = (digit as u8 - b'1') as usize;
                if let Some(prompt) = EXAMPLE_PROMPTS.get(idx) {
                    self.input.set_text(*prompt);
                }
                return EventResult::Consumed;
            }
        }

        match self.input.handle_key(key) {
            InputAction::Submitted(text) => {
                self.creating = true;
                EventResult::StartProject(text)
            }
            InputAction::Edited => EventResult::Consumed,
            InputAction::Ignored => EventResult::Ignored,
        }
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect, theme: &UiTheme, spinner: &str) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),                        // hero
                Constraint::Length(3),                        // 输入框
                Constraint::Length(2 + EXAMPLE_PROMPTS.len() as u16), // 示例
                Constraint::Min(0),                           // 精选项目
            ])
            .split(area);

        self.render_hero(frame, chunks[0], theme);
        self.render_prompt(frame, chunks[1], theme, spinner);
        self.render_examples(frame, chunks[2], theme);
        self.render_featured(frame, chunks[3], theme);
    }

    fn render_hero(&self, frame: &mut Frame, area: Rect, theme: &UiTheme) {
        let lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                "Build websites with AI",
                Style::default()
                    .fg(theme.header_fg)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                "Describe your idea in plain language and watch it come to life.",
                Style::default().fg(theme.muted_fg),
            )),
        ];
        frame.render_widget(Paragraph::new(lines).centered(), area);
    }

    fn render_prompt(&mut self, frame: &mut Frame, area: Rect, theme: &UiTheme, spinner: &str) {
        let (title, border) = if self.creating {
            (
                format!(" {spinner} Creating your project... "),
                theme.inactive_border,
            )
        } else {
            (" Your idea ".to_string(), theme.focus_border)
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
            .title(title);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        self.input.render(frame, inner, theme, !self.creating);
    }

    fn render_examples(&self, frame: &mut Frame, area: Rect, theme: &UiTheme) {
        let mut lines = vec![Line::from(Span::styled(
            "Try one of these (Alt+1..4):",
            Style::default().fg(theme.muted_fg),
        ))];
        for (idx, prompt) in EXAMPLE_PROMPTS.iter().enumerate() {
            lines.push(Line::from(vec![
                Span::styled(
                    format!("  {}. ", idx + 1),
                    Style::default().fg(theme.accent_fg),
                ),
                Span::styled(*prompt, Style::default().fg(theme.fg)),
            ]));
        }
        frame.render_widget(Paragraph::new(lines), area);
    }

    fn render_featured(&self, frame: &mut Frame, area: Rect, theme: &UiTheme) {
        let block = Block::default()
            .borders(Borders::TOP)
            .border_style(Style::default().fg(theme.inactive_border))
            .title(Span::styled(
                " Featured projects ",
                Style::default().fg(theme.header_fg),
            ));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let mut lines = Vec::new();
        for project in FEATURED {
            lines.push(Line::from(vec![
                Span::styled(
                    project.title,
                    Style::default()
                        .fg(theme.fg)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!("  ♥ {}  ◉ {}", project.likes, project.views),
                    Style::default().fg(theme.muted_fg),
                ),
            ]));
            lines.push(Line::from(vec![
                Span::styled("  ", Style::default()),
                Span::styled(project.description, Style::default().fg(theme.muted_fg)),
                Span::styled(
                    format!("  [{}]", project.tags.join(", ")),
                    Style::default().fg(theme.accent_fg),
                ),
            ]));
        }
        frame.render_widget(Paragraph::new(lines), inner);
    }

    pub fn cursor_position(&self) -> Option<(u16, u16)> {
        if self.creating {
            return None;
        }
        self.input.cursor_position()
    }
}

impl Default for HomeView {
    fn default() -> Self {
        Self::new()
    }
}
