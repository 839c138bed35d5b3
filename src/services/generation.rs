//! 生成后端:模拟实现与真模型实现共用同一个接口。

use async_trait::async_trait;
use compact_str::CompactString;
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;

use crate::models::GenerationOutcome;

use super::ai::{AiError, AiService};
use super::config::{AppConfig, BackendKind};
use super::scaffold;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub prompt: String,
    pub project_id: CompactString,
}

/// 一次生成调用。实现方负责产出完整的 outcome 或一个错误,
/// 不需要关心会话状态,也不会被取消。
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    async fn submit(&self, request: &GenerationRequest) -> Result<GenerationOutcome, AiError>;
}

fn preview_url(project_id: &str) -> String {
    format!("https://example.com/preview/{project_id}")
}

/// 不出网的模拟后端:停顿一下,随机挑一条回复,配上示例站。
pub struct SimulatedBackend {
    think_delay: Duration,
}

impl SimulatedBackend {
    pub fn new(think_delay: Duration) -> Self {
        Self { think_delay }
    }
}

fn canned_reply(prompt: &str) -> String {
    match rand::rng().random_range(0..3u8) {
        0 => format!(
            "I've created a modern website based on your request: \"{prompt}\". The design \
             features a clean, responsive layout with a dark theme and modern typography. \
             I've included all the essential pages and components you'll need."
        ),
        1 => "Great idea! I've built a professional website that captures your vision. The site \
              includes a responsive design, optimized performance, and modern UI components. You \
              can see the live preview on the right and explore the full source code."
            .to_string(),
        _ => "Perfect! I've generated a complete website with modern React architecture. The \
              design is fully responsive and includes all the features you requested. Feel free \
              to ask me to modify any aspect of the design or functionality."
            .to_string(),
    }
}

#[async_trait]
impl GenerationBackend for SimulatedBackend {
    async fn submit(&self, request: &GenerationRequest) -> Result<GenerationOutcome, AiError> {
        if !self.think_delay.is_zero() {
            tokio::time::sleep(self.think_delay).await;
        }
        Ok(GenerationOutcome {
            message: canned_reply(&request.prompt),
            files: scaffold::sample_site(&request.prompt),
            preview_ref: preview_url(&request.project_id),
        })
    }
}

/// 走真模型的后端。use_local 决定先试回环端点还是直连托管端点。
pub struct LlmBackend {
    service: AiService,
    use_local: bool,
}

impl LlmBackend {
    pub fn new(service: AiService, use_local: bool) -> Self {
        Self { service, use_local }
    }
}

#[async_trait]
impl GenerationBackend for LlmBackend {
    async fn submit(&self, request: &GenerationRequest) -> Result<GenerationOutcome, AiError> {
        let bundle = self
            .service
            .generate_website(&request.prompt, self.use_local)
            .await?;
        Ok(GenerationOutcome {
            message: bundle.message,
            files: bundle.files,
            preview_ref: preview_url(&request.project_id),
        })
    }
}

pub fn backend_from_config(config: &AppConfig) -> Arc<dyn GenerationBackend> {
    match config.backend {
        BackendKind::Simulated => Arc::new(SimulatedBackend::new(Duration::from_millis(
            config.think_delay_ms,
        ))),
        BackendKind::Llm => Arc::new(LlmBackend::new(AiService::new(config), false)),
        BackendKind::Local => Arc::new(LlmBackend::new(AiService::new(config), true)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block_on<F: std::future::Future>(future: F) -> F::Output {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap()
            .block_on(future)
    }

    fn request() -> GenerationRequest {
        GenerationRequest {
            prompt: "A portfolio website".to_string(),
            project_id: CompactString::from("project-99"),
        }
    }

    #[test]
    fn simulated_backend_produces_a_full_outcome() {
        let backend = SimulatedBackend::new(Duration::ZERO);
        let outcome = block_on(backend.submit(&request())).unwrap();

        assert!(!outcome.message.is_empty());
        assert_eq!(outcome.preview_ref, "https://example.com/preview/project-99");
        let paths: Vec<&str> = outcome.files.iter().map(|(p, _)| p.as_str()).collect();
        assert!(paths.contains(&"package.json"));
        assert!(paths.contains(&"src/App.js"));
        assert!(paths.contains(&"public/index.html"));
    }

    #[test]
    fn canned_replies_stay_in_the_fixed_set() {
        for _ in 0..32 {
            let reply = canned_reply("A bakery");
            let known = reply.starts_with("I've created a modern website")
                || reply.starts_with("Great idea!")
                || reply.starts_with("Perfect!");
            assert!(known, "unexpected reply: {reply}");
        }
    }

    #[test]
    fn llm_backend_without_key_reports_configuration_error() {
        let backend = LlmBackend::new(AiService::new(&AppConfig::default()), false);
        let err = block_on(backend.submit(&request())).unwrap_err();
        assert!(matches!(err, AiError::Configuration(_)));
    }

    #[test]
    fn backend_selection_follows_config() {
        let mut config = AppConfig::default();
        config.think_delay_ms = 0;
        let backend = backend_from_config(&config);
        let outcome = block_on(backend.submit(&request())).unwrap();
        assert!(!outcome.files.is_empty());
    }
}
