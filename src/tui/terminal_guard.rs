//! 终端进出与信号兜底。
//!
//! 进入时开 raw 模式、备用屏、鼠标捕获和括号粘贴,光标换成竖线;
//! 恢复收敛到一个幂等句柄,正常退出、Drop 和信号线程共用同一份。

use std::io;
use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};
use std::sync::Arc;

type RestoreFn = dyn Fn() -> io::Result<()> + Send + Sync;

fn enter_tui() -> io::Result<()> {
    use crossterm::{
        cursor,
        event::{EnableBracketedPaste, EnableMouseCapture},
        execute,
        terminal::{enable_raw_mode, EnterAlternateScreen},
    };

    enable_raw_mode()?;
    execute!(
        io::stdout(),
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableBracketedPaste,
        cursor::SetCursorStyle::BlinkingBar
    )?;
    Ok(())
}

fn leave_tui() -> io::Result<()> {
    use crossterm::{
        cursor,
        event::{DisableBracketedPaste, DisableMouseCapture},
        execute,
        terminal::{disable_raw_mode, LeaveAlternateScreen},
    };

    // 尽力恢复:某一步失败也把剩下的走完,报告第一个错误。
    let mut first_err: Option<io::Error> = None;
    if let Err(err) = disable_raw_mode() {
        first_err.get_or_insert(err);
    }
    if let Err(err) = execute!(
        io::stdout(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        DisableBracketedPaste,
        cursor::SetCursorStyle::DefaultUserShape,
        cursor::Show
    ) {
        first_err.get_or_insert(err);
    }
    match first_err {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

/// 幂等恢复句柄。可以克隆给信号线程,谁先调用谁执行,其余变空操作。
#[derive(Clone)]
pub struct RestoreHandle {
    done: Arc<AtomicBool>,
    restore: Arc<RestoreFn>,
}

impl RestoreHandle {
    fn wrap(restore: Arc<RestoreFn>) -> Self {
        Self {
            done: Arc::new(AtomicBool::new(false)),
            restore,
        }
    }

    pub fn restore(&self) -> io::Result<()> {
        if self.done.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        (self.restore)()
    }
}

/// 占住终端的会话对象。Drop 时恢复;提前手动恢复后 Drop 变空操作。
pub struct TerminalSession {
    handle: RestoreHandle,
}

impl TerminalSession {
    pub fn enter() -> io::Result<Self> {
        enter_tui()?;
        Ok(Self {
            handle: RestoreHandle::wrap(Arc::new(leave_tui)),
        })
    }

    pub fn restore_handle(&self) -> RestoreHandle {
        self.handle.clone()
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = self.handle.restore();
    }
}

/// 信号线程置位的退出码,主循环每帧看一眼。0 表示没收到信号。
pub struct ShutdownSignal {
    code: Arc<AtomicI32>,
}

impl ShutdownSignal {
    pub fn requested(&self) -> Option<i32> {
        match self.code.load(Ordering::SeqCst) {
            0 => None,
            code => Some(code),
        }
    }
}

/// 监视 SIGINT/SIGTERM。收到信号先置位退出码让主循环体面收场,
/// 两秒没退就在信号线程里恢复终端并硬退。
#[cfg(unix)]
pub fn watch_termination_signals(restore: RestoreHandle) -> io::Result<ShutdownSignal> {
    use signal_hook::consts::signal::{SIGINT, SIGTERM};
    use signal_hook::iterator::Signals;
    use std::time::Duration;

    let code = Arc::new(AtomicI32::new(0));
    let seen = Arc::clone(&code);
    let mut signals = Signals::new([SIGINT, SIGTERM])?;
    std::thread::spawn(move || {
        for sig in signals.forever() {
            let exit_code = match sig {
                SIGINT => 130,
                SIGTERM => 143,
                _ => continue,
            };
            seen.store(exit_code, Ordering::SeqCst);

            std::thread::sleep(Duration::from_secs(2));
            let _ = restore.restore();
            std::process::exit(exit_code);
        }
    });
    Ok(ShutdownSignal { code })
}

#[cfg(not(unix))]
pub fn watch_termination_signals(_restore: RestoreHandle) -> io::Result<ShutdownSignal> {
    Ok(ShutdownSignal {
        code: Arc::new(AtomicI32::new(0)),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/tui/terminal_guard.rs"]
mod tests;
