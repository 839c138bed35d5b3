//! 配置服务:`~/.zsite/setting.json` 打底,环境变量覆盖
//!
//! 文件缺失或损坏时静默落回默认值,不打断启动。

use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};

pub const DEFAULT_API_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
pub const DEFAULT_LOCAL_LLM_URL: &str = "http://127.0.0.1:1234/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "llama-3.1-70b-versatile";

const SETTINGS_DIR: &str = ".zsite";
const SETTINGS_FILE: &str = "setting.json";
const LOG_DIR: &str = "logs";

/// 生成走哪条路:本地模拟、托管模型、回环端点(失败自动退回托管)。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    Simulated,
    Llm,
    Local,
}

impl BackendKind {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "simulated" | "sim" => Some(Self::Simulated),
            "llm" | "hosted" => Some(Self::Llm),
            "local" => Some(Self::Local),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Simulated => "simulated",
            Self::Llm => "llm",
            Self::Local => "local",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api_key: Option<String>,
    pub api_url: String,
    pub local_llm_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub backend: BackendKind,
    /// 模拟后端在回复前停顿的毫秒数,营造思考感。
    pub think_delay_ms: u64,
    /// 首页点开始之后到项目就绪的毫秒数。
    pub create_delay_ms: u64,
    /// 预览刷新动画的毫秒数。
    pub refresh_delay_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_url: DEFAULT_API_URL.to_string(),
            local_llm_url: DEFAULT_LOCAL_LLM_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: 4000,
            temperature: 0.7,
            backend: BackendKind::Simulated,
            think_delay_ms: 2000,
            create_delay_ms: 2000,
            refresh_delay_ms: 1000,
        }
    }
}

impl AppConfig {
    pub fn load() -> Self {
        let mut config = load_settings().unwrap_or_default();
        apply_env_overrides(&mut config, |key| std::env::var(key).ok());
        config
    }
}

fn get_home_dir() -> Option<PathBuf> {
    #[cfg(unix)]
    {
        return std::env::var("HOME").ok().map(PathBuf::from);
    }
    #[cfg(windows)]
    {
        return std::env::var("USERPROFILE").ok().map(PathBuf::from);
    }
    #[cfg(not(any(unix, windows)))]
    {
        None
    }
}

pub fn get_settings_path() -> Option<PathBuf> {
    get_home_dir().map(|home| home.join(SETTINGS_DIR).join(SETTINGS_FILE))
}

/// 确保配置文件存在;第一次运行时写一份带默认值的模板。
pub fn ensure_settings_file() -> io::Result<()> {
    let Some(path) = get_settings_path() else {
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            "home directory not found",
        ));
    };
    if path.exists() {
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let rendered = serde_json::to_string_pretty(&AppConfig::default())
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    std::fs::write(&path, rendered)
}

pub fn load_settings() -> Option<AppConfig> {
    let path = get_settings_path()?;
    read_config_file(&path)
}

fn read_config_file(path: &Path) -> Option<AppConfig> {
    let data = std::fs::read_to_string(path).ok()?;
    match serde_json::from_str(&data) {
        Ok(config) => Some(config),
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "ignoring malformed settings file");
            None
        }
    }
}

/// 日志目录 `~/.zsite/logs`,不存在就建。
pub fn ensure_log_dir() -> io::Result<PathBuf> {
    let Some(home) = get_home_dir() else {
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            "home directory not found",
        ));
    };
    let dir = home.join(SETTINGS_DIR).join(LOG_DIR);
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// 环境变量覆盖。lookup 可注入,测试不用动真实环境。
pub fn apply_env_overrides<F>(config: &mut AppConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(value) = lookup("ZSITE_API_KEY") {
        if !value.is_empty() {
            config.api_key = Some(value);
        }
    }
    if let Some(value) = lookup("ZSITE_API_URL") {
        if !value.is_empty() {
            config.api_url = value;
        }
    }
    if let Some(value) = lookup("ZSITE_LOCAL_LLM_URL") {
        if !value.is_empty() {
            config.local_llm_url = value;
        }
    }
    if let Some(value) = lookup("ZSITE_MODEL") {
        if !value.is_empty() {
            config.model = value;
        }
    }
    if let Some(value) = lookup("ZSITE_BACKEND") {
        match BackendKind::parse(&value) {
            Some(kind) => config.backend = kind,
            None => {
                tracing::warn!(value, "unknown ZSITE_BACKEND value, keeping configured backend")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let config = AppConfig::default();
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.local_llm_url, DEFAULT_LOCAL_LLM_URL);
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.max_tokens, 4000);
        assert_eq!(config.backend, BackendKind::Simulated);
        assert!(config.api_key.is_none());
        assert_eq!(config.think_delay_ms, 2000);
        assert_eq!(config.create_delay_ms, 2000);
        assert_eq!(config.refresh_delay_ms, 1000);
    }

    #[test]
    fn backend_kind_parsing() {
        assert_eq!(
            BackendKind::parse("simulated"),
            Some(BackendKind::Simulated)
        );
        assert_eq!(BackendKind::parse(" SIM "), Some(BackendKind::Simulated));
        assert_eq!(BackendKind::parse("llm"), Some(BackendKind::Llm));
        assert_eq!(BackendKind::parse("hosted"), Some(BackendKind::Llm));
        assert_eq!(BackendKind::parse("local"), Some(BackendKind::Local));
        assert_eq!(BackendKind::parse("cloud"), None);
    }

    #[test]
    fn env_overrides_take_precedence() {
        let mut config = AppConfig::default();
        apply_env_overrides(&mut config, |key| match key {
            "ZSITE_API_KEY" => Some("gsk_test".to_string()),
            "ZSITE_MODEL" => Some("llama-3.3-70b".to_string()),
            "ZSITE_BACKEND" => Some("local".to_string()),
            _ => None,
        });
        assert_eq!(config.api_key.as_deref(), Some("gsk_test"));
        assert_eq!(config.model, "llama-3.3-70b");
        assert_eq!(config.backend, BackendKind::Local);
        // 没覆盖的字段保持原样。
        assert_eq!(config.api_url, DEFAULT_API_URL);
    }

    #[test]
    fn empty_env_values_are_ignored() {
        let mut config = AppConfig::default();
        apply_env_overrides(&mut config, |key| match key {
            "ZSITE_API_KEY" => Some(String::new()),
            "ZSITE_BACKEND" => Some("bogus".to_string()),
            _ => None,
        });
        assert!(config.api_key.is_none());
        assert_eq!(config.backend, BackendKind::Simulated);
    }

    #[test]
    fn settings_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("setting.json");

        let config = AppConfig {
            api_key: Some("gsk_abc".to_string()),
            backend: BackendKind::Llm,
            ..AppConfig::default()
        };
        std::fs::write(&path, serde_json::to_string_pretty(&config).unwrap()).unwrap();

        let loaded = read_config_file(&path).unwrap();
        assert_eq!(loaded.api_key.as_deref(), Some("gsk_abc"));
        assert_eq!(loaded.backend, BackendKind::Llm);
    }

    #[test]
    fn partial_settings_fill_from_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("setting.json");
        std::fs::write(&path, r#"{"backend":"local"}"#).unwrap();

        let loaded = read_config_file(&path).unwrap();
        assert_eq!(loaded.backend, BackendKind::Local);
        assert_eq!(loaded.model, DEFAULT_MODEL);
    }

    #[test]
    fn malformed_settings_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("setting.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(read_config_file(&path).is_none());
    }
}
