//! 端到端生成流程:会话 + 后台工作器 + 模拟后端,不碰终端。

use std::sync::mpsc;
use std::sync::Arc;
use std::time::Duration;

use zsite::models::{Project, Role, SessionState, SubmitError, WorkspaceSession};
use zsite::runtime::{AppMessage, Worker};
use zsite::services::{GenerationRequest, SimulatedBackend};

const WAIT: Duration = Duration::from_secs(5);

struct Harness {
    session: WorkspaceSession,
    worker: Worker,
    rx: mpsc::Receiver<AppMessage>,
    backend: Arc<SimulatedBackend>,
}

impl Harness {
    fn new(prompt: &str) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            session: WorkspaceSession::new(Project::new(prompt)),
            worker: Worker::new(tx).expect("worker"),
            rx,
            backend: Arc::new(SimulatedBackend::new(Duration::ZERO)),
        }
    }

    /// 提交一条需求并等生成结束,跟 Workbench 的派发逻辑同一条路。
    fn submit_and_wait(&mut self, text: &str) -> Result<(), SubmitError> {
        let prompt = self.session.begin_submit(text)?;
        self.worker.generate(
            self.backend.clone(),
            GenerationRequest {
                prompt,
                project_id: self.session.project().id.clone(),
            },
        );

        match self.rx.recv_timeout(WAIT).expect("worker reply") {
            AppMessage::GenerationFinished {
                project_id,
                outcome,
            } => {
                assert_eq!(project_id, self.session.project().id);
                self.session.apply_outcome(outcome).expect("valid paths");
            }
            AppMessage::GenerationFailed { error, .. } => {
                panic!("simulated backend should not fail: {error}")
            }
            other => panic!("unexpected message: {other:?}"),
        }
        Ok(())
    }
}

#[test]
fn first_prompt_produces_a_full_site() {
    let mut harness = Harness::new("A bakery website with a menu page");
    harness
        .submit_and_wait("A bakery website with a menu page")
        .unwrap();

    let session = &harness.session;
    assert_eq!(session.state(), SessionState::Idle);

    // 一问一答。
    assert_eq!(session.messages().len(), 2);
    assert_eq!(session.messages()[0].role, Role::User);
    assert_eq!(session.messages()[1].role, Role::Assistant);
    assert!(!session.messages()[1].content.is_empty());

    // 脚手架至少有 package.json 和入口组件。
    assert!(session.files().contains("package.json"));
    assert!(session.files().contains("src/App.js"));

    // 预览地址带上项目 id。
    let preview = session.preview_ref().expect("preview ref");
    assert!(preview.contains(session.project().id.as_str()));

    // src 默认展开,入口组件直接可见。
    assert!(session
        .visible_rows()
        .iter()
        .any(|row| row.path == "src/App.js"));
}

#[test]
fn follow_up_prompt_replaces_files_and_keeps_chat() {
    let mut harness = Harness::new("A blog");
    harness.submit_and_wait("A blog").unwrap();
    let first_count = harness.session.files().len();

    harness.submit_and_wait("add a dark theme").unwrap();

    let session = &harness.session;
    assert_eq!(session.messages().len(), 4);
    assert_eq!(session.messages()[2].content, "add a dark theme");
    // 文件集整体替换,不是叠加。
    assert_eq!(session.files().len(), first_count);
}

#[test]
fn busy_session_rejects_a_second_submission() {
    let mut harness = Harness::new("A portfolio");
    harness.session.begin_submit("A portfolio").unwrap();
    assert_eq!(
        harness.session.begin_submit("another"),
        Err(SubmitError::Busy)
    );
    // 忙碌拒绝后原来的生成照常收尾。
    harness.worker.generate(
        harness.backend.clone(),
        GenerationRequest {
            prompt: "A portfolio".to_string(),
            project_id: harness.session.project().id.clone(),
        },
    );
    match harness.rx.recv_timeout(WAIT).expect("worker reply") {
        AppMessage::GenerationFinished { outcome, .. } => {
            harness.session.apply_outcome(outcome).unwrap();
        }
        other => panic!("unexpected message: {other:?}"),
    }
    assert!(!harness.session.is_generating());
}

#[test]
fn empty_prompt_never_reaches_the_worker() {
    let mut harness = Harness::new("A shop");
    assert_eq!(
        harness.submit_and_wait("   "),
        Err(SubmitError::Empty)
    );
    assert!(harness.session.chat_is_empty());
    assert!(matches!(
        harness.rx.recv_timeout(Duration::from_millis(200)),
        Err(mpsc::RecvTimeoutError::Timeout)
    ));
}
