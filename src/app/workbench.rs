//! 工作台:统一管理页面路由、输入分发与后台消息。
//!
//! 职责:
//! - 三个页面(首页 / 模板 / 工作台)之间的切换,路由状态只在内存里
//! - 把视图抛上来的意图(建项目、提交需求、拷贝文件)落到会话与后台
//! - 每帧把 Worker 送回来的消息灌进当前工作台会话

use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::core::event::InputEvent;
use crate::core::view::{EventResult, Route};
use crate::models::Project;
use crate::runtime::{AppMessage, Worker};
use crate::services::{backend_from_config, AiService, AppConfig, GenerationBackend, GenerationRequest};
use crate::tui::osc52;
use crate::views::{HomeView, TemplatesView, WorkspaceView};

use super::theme::UiTheme;

const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
const NOTICE_TTL: Duration = Duration::from_secs(3);

pub struct Workbench {
    theme: UiTheme,
    config: AppConfig,
    service: AiService,
    backend: Arc<dyn GenerationBackend>,
    worker: Worker,
    rx: Receiver<AppMessage>,
    route: Route,
    home: HomeView,
    templates: TemplatesView,
    workspace: Option<WorkspaceView>,
    notice: Option<(String, Instant)>,
    frame: usize,
}

impl Workbench {
    pub fn new(config: AppConfig) -> std::io::Result<Self> {
        let (tx, rx) = mpsc::channel();
        let worker = Worker::new(tx)?;
        let mut theme = UiTheme::default();
        theme.adapt_to_terminal_capabilities();
        Ok(Self {
            theme,
            service: AiService::new(&config),
            backend: backend_from_config(&config),
            config,
            worker,
            rx,
            route: Route::default(),
            home: HomeView::new(),
            templates: TemplatesView::new(),
            workspace: None,
            notice: None,
            frame: 0,
        })
    }

    pub fn route(&self) -> Route {
        self.route
    }

    pub fn workspace(&self) -> Option<&WorkspaceView> {
        self.workspace.as_ref()
    }

    fn set_notice(&mut self, text: impl Into<String>) {
        self.notice = Some((text.into(), Instant::now()));
    }

    /// 处理一个输入事件。返回 true 表示应当退出。
    pub fn handle_input(&mut self, event: &InputEvent) -> bool {
        if let InputEvent::Key(key) = event {
            if let Some(result) = self.handle_global_key(key) {
                return self.apply_result(result);
            }
        }

        let result = match self.route {
            Route::Home => self.home.handle_input(event),
            Route::Templates => self.templates.handle_input(event),
            Route::Workspace => match &mut self.workspace {
                Some(workspace) => workspace.handle_input(event),
                None => EventResult::Navigate(Route::Home),
            },
        };
        self.apply_result(result)
    }

    fn handle_global_key(&mut self, key: &KeyEvent) -> Option<EventResult> {
        match (key.code, key.modifiers) {
            (KeyCode::Char('q'), KeyModifiers::CONTROL) => Some(EventResult::Quit),
            (KeyCode::Char('h'), KeyModifiers::CONTROL) => {
                Some(EventResult::Navigate(Route::Home))
            }
            (KeyCode::Char('t'), KeyModifiers::CONTROL) => {
                Some(EventResult::Navigate(Route::Templates))
            }
            (KeyCode::Char('e'), KeyModifiers::CONTROL) => {
                Some(EventResult::Navigate(Route::Workspace))
            }
            _ => None,
        }
    }

    fn apply_result(&mut self, result: EventResult) -> bool {
        match result {
            EventResult::Quit => return true,
            EventResult::Navigate(route) => self.navigate(route),
            EventResult::StartProject(prompt) => self.start_project(prompt),
            EventResult::OpenWorkspace(prompt) => self.open_project(Project::new(prompt)),
            EventResult::SubmitPrompt(text) => self.submit_prompt(&text),
            EventResult::CopyFile(path) => self.copy_file(&path),
            EventResult::RefreshPreview => {
                self.worker
                    .refresh_preview(Duration::from_millis(self.config.refresh_delay_ms));
            }
            EventResult::Consumed | EventResult::Ignored => {}
        }
        false
    }

    fn navigate(&mut self, route: Route) {
        if route == Route::Workspace && self.workspace.is_none() {
            self.set_notice("No active project yet, start one from the home screen");
            return;
        }
        self.route = route;
    }

    /// 首页流程:先丢一个只进日志的提示词分析,再走建项目延迟。
    fn start_project(&mut self, prompt: String) {
        self.worker.analyze_prompt(self.service.clone(), prompt.clone());
        self.worker
            .create_project(prompt, Duration::from_millis(self.config.create_delay_ms));
    }

    /// 项目就绪(或模板直开):建会话、进工作台、自动提交初始需求。
    fn open_project(&mut self, project: Project) {
        let mut workspace = WorkspaceView::new(crate::models::WorkspaceSession::new(project));
        let initial = workspace.session().project().prompt.clone();
        self.submit_to(&mut workspace, &initial);
        self.workspace = Some(workspace);
        self.route = Route::Workspace;
    }

    fn submit_prompt(&mut self, text: &str) {
        let Some(mut workspace) = self.workspace.take() else {
            return;
        };
        self.submit_to(&mut workspace, text);
        self.workspace = Some(workspace);
    }

    fn submit_to(&mut self, workspace: &mut WorkspaceView, text: &str) {
        match workspace.session_mut().begin_submit(text) {
            Ok(prompt) => {
                let project_id = workspace.session().project().id.clone();
                self.worker.generate(
                    self.backend.clone(),
                    GenerationRequest { prompt, project_id },
                );
            }
            Err(err) => crate::views::workspace::log_rejected_submit(err),
        }
    }

    fn copy_file(&mut self, path: &str) {
        let Some(workspace) = &self.workspace else {
            return;
        };
        let Some(content) = workspace.session().files().get(path) else {
            return;
        };
        match osc52::copy_to_clipboard(content) {
            Ok(()) => self.set_notice(format!("Copied {path} to clipboard")),
            Err(err) => {
                tracing::warn!(path, error = %err, "clipboard copy failed");
                self.set_notice(format!("Copy failed: {err}"));
            }
        }
    }

    /// 把后台消息一口气排干。每帧调用一次。
    pub fn pump_messages(&mut self) {
        while let Ok(message) = self.rx.try_recv() {
            self.handle_message(message);
        }
    }

    fn handle_message(&mut self, message: AppMessage) {
        match message {
            AppMessage::ProjectReady { project } => {
                self.home.reset();
                self.open_project(project);
            }
            AppMessage::GenerationFinished {
                project_id,
                outcome,
            } => {
                let Some(workspace) = &mut self.workspace else {
                    tracing::debug!(%project_id, "dropping result, workspace is gone");
                    return;
                };
                if workspace.session().project().id != project_id {
                    tracing::debug!(%project_id, "dropping result for a stale project");
                    return;
                }
                if let Err(err) = workspace.apply_generation(outcome) {
                    tracing::error!(%project_id, error = %err, "generated bundle had bad paths");
                    self.set_notice("Generation produced invalid file paths, kept previous files");
                }
            }
            AppMessage::GenerationFailed { project_id, error } => {
                if let Some(workspace) = &mut self.workspace {
                    if workspace.session().project().id == project_id {
                        workspace.fail_generation();
                    }
                }
                self.set_notice(format!("Generation failed: {error}"));
            }
            AppMessage::PreviewRefreshed => {
                if let Some(workspace) = &mut self.workspace {
                    workspace.finish_preview_refresh();
                }
            }
        }
    }

    fn spinner(&self) -> &'static str {
        SPINNER_FRAMES[(self.frame / 2) % SPINNER_FRAMES.len()]
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect) {
        self.frame = self.frame.wrapping_add(1);
        if let Some((_, since)) = &self.notice {
            if since.elapsed() > NOTICE_TTL {
                self.notice = None;
            }
        }

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(area);

        self.render_header(frame, chunks[0]);
        let spinner = self.spinner();
        match self.route {
            Route::Home => self.home.render(frame, chunks[1], &self.theme, spinner),
            Route::Templates => self.templates.render(frame, chunks[1], &self.theme),
            Route::Workspace => {
                if let Some(workspace) = &mut self.workspace {
                    workspace.render(frame, chunks[1], &self.theme, spinner);
                }
            }
        }
        self.render_status(frame, chunks[2]);

        if let Some((x, y)) = self.cursor_position() {
            frame.set_cursor_position((x, y));
        }
    }

    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let mut spans = vec![
            Span::styled(
                " zsite ",
                Style::default()
                    .fg(self.theme.header_fg)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled("· AI website builder  ", Style::default().fg(self.theme.muted_fg)),
        ];
        for (route, label) in [
            (Route::Home, "[Home]"),
            (Route::Templates, "[Templates]"),
            (Route::Workspace, "[Workspace]"),
        ] {
            let style = if route == self.route {
                Style::default()
                    .fg(self.theme.accent_fg)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(self.theme.muted_fg)
            };
            spans.push(Span::styled(format!("{label} "), style));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn render_status(&self, frame: &mut Frame, area: Rect) {
        let text = if let Some((notice, _)) = &self.notice {
            notice.clone()
        } else {
            match self.route {
                Route::Home => {
                    "Enter start · Alt+1..4 examples · Ctrl+T templates · Ctrl+Q quit".to_string()
                }
                Route::Templates => {
                    "type to search · ←/→ category · ↑/↓ select · Enter open · Esc home"
                        .to_string()
                }
                Route::Workspace => {
                    "Tab focus · p/c panel · y copy file · Esc home · Ctrl+Q quit".to_string()
                }
            }
        };
        frame.render_widget(
            Paragraph::new(Span::styled(
                format!(" {text}"),
                Style::default().fg(self.theme.muted_fg),
            )),
            area,
        );
    }

    fn cursor_position(&self) -> Option<(u16, u16)> {
        match self.route {
            Route::Home => self.home.cursor_position(),
            Route::Templates => self.templates.cursor_position(),
            Route::Workspace => self
                .workspace
                .as_ref()
                .and_then(|workspace| workspace.cursor_position()),
        }
    }
}
