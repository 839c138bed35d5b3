use super::*;
use std::io;
use std::sync::atomic::{AtomicI32, AtomicUsize, Ordering};
use std::sync::Arc;

fn counting_handle() -> (RestoreHandle, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&calls);
    let handle = RestoreHandle::wrap(Arc::new(move || {
        seen.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }));
    (handle, calls)
}

#[test]
fn restore_runs_once_across_clones() {
    let (handle, calls) = counting_handle();
    let twin = handle.clone();
    handle.restore().unwrap();
    twin.restore().unwrap();
    handle.restore().unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn drop_restores_when_nobody_did() {
    let (handle, calls) = counting_handle();
    drop(TerminalSession { handle });
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn drop_is_a_noop_after_manual_restore() {
    let (handle, calls) = counting_handle();
    let session = TerminalSession {
        handle: handle.clone(),
    };
    handle.restore().unwrap();
    drop(session);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn restore_error_is_reported_only_once() {
    let handle = RestoreHandle::wrap(Arc::new(|| {
        Err(io::Error::new(io::ErrorKind::Other, "tty gone"))
    }));
    assert!(handle.restore().is_err());
    // 第一次已经标记完成,后续调用不重试也不再报错。
    assert!(handle.restore().is_ok());
}

#[test]
fn shutdown_signal_reports_stored_code() {
    let code = Arc::new(AtomicI32::new(0));
    let signal = ShutdownSignal {
        code: Arc::clone(&code),
    };
    assert_eq!(signal.requested(), None);
    code.store(143, Ordering::SeqCst);
    assert_eq!(signal.requested(), Some(143));
    code.store(130, Ordering::SeqCst);
    assert_eq!(signal.requested(), Some(130));
}
