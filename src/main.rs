//! zsite 主程序:终端生命周期 + 事件循环。

use std::io;
use std::time::Duration;

use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use zsite::app::Workbench;
use zsite::core::event::InputEvent;
use zsite::services::config::{ensure_settings_file, AppConfig};
use zsite::tui::terminal_guard::{watch_termination_signals, ShutdownSignal, TerminalSession};

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn main() -> io::Result<()> {
    let mut args = std::env::args().skip(1);
    if let Some(arg) = args.next() {
        match arg.as_str() {
            "--version" | "-V" => {
                println!("zsite {VERSION}");
                return Ok(());
            }
            "--help" | "-h" => {
                println!("zsite {VERSION} - AI website builder in your terminal");
                println!();
                println!("USAGE: zsite");
                println!();
                println!("Settings live in ~/.zsite/setting.json, logs in ~/.zsite/logs.");
                return Ok(());
            }
            other => {
                eprintln!("unknown argument: {other}");
                std::process::exit(2);
            }
        }
    }

    let _logging = zsite::logging::init();

    if let Err(err) = ensure_settings_file() {
        tracing::warn!(error = %err, "could not create the settings file");
    }
    let config = AppConfig::load();
    tracing::info!(backend = config.backend.as_str(), "starting zsite {VERSION}");

    let mut workbench = Workbench::new(config)?;

    let session = TerminalSession::enter()?;
    let shutdown = watch_termination_signals(session.restore_handle())?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let exit_code = run(&mut terminal, &mut workbench, &shutdown)?;

    drop(terminal);
    session.restore_handle().restore()?;
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
    Ok(())
}

fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    workbench: &mut Workbench,
    shutdown: &ShutdownSignal,
) -> io::Result<i32> {
    loop {
        if let Some(code) = shutdown.requested() {
            tracing::info!(code, "shutting down on signal");
            return Ok(code);
        }

        workbench.pump_messages();
        terminal.draw(|frame| workbench.render(frame, frame.area()))?;

        // 100ms 的轮询间隔兼做生成动画的帧节拍。
        if crossterm::event::poll(Duration::from_millis(100))? {
            let event: InputEvent = crossterm::event::read()?.into();
            if workbench.handle_input(&event) {
                tracing::info!("quit requested");
                return Ok(0);
            }
        }
    }
}
