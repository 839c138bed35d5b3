//! 后台工作器:持有 tokio 运行时,任务完成后经 mpsc 通知 UI 线程。

use std::io;
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::time::Duration;

use crate::models::Project;
use crate::services::ai::AiService;
use crate::services::generation::{GenerationBackend, GenerationRequest};

use super::message::AppMessage;

pub struct Worker {
    runtime: tokio::runtime::Runtime,
    tx: Sender<AppMessage>,
}

impl Worker {
    pub fn new(tx: Sender<AppMessage>) -> io::Result<Self> {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                tracing::error!("fallback to current thread runtime: {err}");
                tokio::runtime::Builder::new_current_thread()
                    .enable_all()
                    .build()?
            }
        };
        Ok(Self { runtime, tx })
    }

    /// 建项目。停顿 delay 之后回 ProjectReady。
    pub fn create_project(&self, prompt: String, delay: Duration) {
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            let _ = tx.send(AppMessage::ProjectReady {
                project: Project::new(prompt),
            });
        });
    }

    /// 顺手做一次提示词分析。结果只进日志,不影响任何流程。
    pub fn analyze_prompt(&self, service: AiService, prompt: String) {
        self.runtime.spawn(async move {
            let probe = format!("Analyze this website idea: {prompt}");
            match service.generate_text(&probe).await {
                Ok(text) => tracing::debug!(chars = text.len(), "prompt analysis available"),
                Err(err) => tracing::debug!(error = %err, "prompt analysis skipped"),
            }
        });
    }

    /// 发起一次生成,结束时回 GenerationFinished 或 GenerationFailed。
    pub fn generate(&self, backend: Arc<dyn GenerationBackend>, request: GenerationRequest) {
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            match backend.submit(&request).await {
                Ok(outcome) => {
                    let _ = tx.send(AppMessage::GenerationFinished {
                        project_id: request.project_id.clone(),
                        outcome,
                    });
                }
                Err(err) => {
                    tracing::warn!(project_id = %request.project_id, error = %err, "generation failed");
                    let _ = tx.send(AppMessage::GenerationFailed {
                        project_id: request.project_id.clone(),
                        error: err.to_string(),
                    });
                }
            }
        });
    }

    /// 预览刷新只是个定时器,走完回 PreviewRefreshed。
    pub fn refresh_preview(&self, delay: Duration) {
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            let _ = tx.send(AppMessage::PreviewRefreshed);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::generation::SimulatedBackend;
    use compact_str::CompactString;
    use std::sync::mpsc;

    const WAIT: Duration = Duration::from_secs(5);

    #[test]
    fn create_project_reports_back() {
        let (tx, rx) = mpsc::channel();
        let worker = Worker::new(tx).unwrap();
        worker.create_project("A bakery website".to_string(), Duration::ZERO);

        match rx.recv_timeout(WAIT).unwrap() {
            AppMessage::ProjectReady { project } => {
                assert_eq!(project.prompt, "A bakery website");
                assert!(project.id.starts_with("project-"));
            }
            _ => panic!("expected ProjectReady"),
        }
    }

    #[test]
    fn generate_reports_outcome() {
        let (tx, rx) = mpsc::channel();
        let worker = Worker::new(tx).unwrap();
        let backend = Arc::new(SimulatedBackend::new(Duration::ZERO));
        worker.generate(
            backend,
            GenerationRequest {
                prompt: "A blog".to_string(),
                project_id: CompactString::from("project-5"),
            },
        );

        match rx.recv_timeout(WAIT).unwrap() {
            AppMessage::GenerationFinished {
                project_id,
                outcome,
            } => {
                assert_eq!(project_id, "project-5");
                assert!(!outcome.files.is_empty());
            }
            _ => panic!("expected GenerationFinished"),
        }
    }

    #[test]
    fn refresh_preview_reports_back() {
        let (tx, rx) = mpsc::channel();
        let worker = Worker::new(tx).unwrap();
        worker.refresh_preview(Duration::ZERO);
        assert!(matches!(
            rx.recv_timeout(WAIT).unwrap(),
            AppMessage::PreviewRefreshed
        ));
    }
}
