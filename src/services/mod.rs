//! 服务层模块
//!
//! 提供应用级服务:
//! - config: 配置文件与环境变量
//! - ai: 模型端点客户端
//! - scaffold: 内置站点模板
//! - generation: 生成后端(模拟 / 真模型)

pub mod ai;
pub mod config;
pub mod generation;
pub mod scaffold;

pub use ai::{AiError, AiService, WebsiteBundle};
pub use config::{AppConfig, BackendKind};
pub use generation::{
    backend_from_config, GenerationBackend, GenerationRequest, LlmBackend, SimulatedBackend,
};
pub use scaffold::{extract_site_name, fallback_site, sample_site};
