//! AI 文本服务:OpenAI 风格的 chat completions 客户端。
//!
//! 托管端点需要 API key;回环端点失败时自动退回托管端点。
//! 建站请求期望模型回 JSON,解析不动时用脚手架兜底,不报错。

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use super::config::AppConfig;
use super::scaffold;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug)]
pub enum AiError {
    /// 缺 key 之类的配置问题,发请求之前就能发现。
    Configuration(String),
    /// 网络失败或非 2xx 状态。
    Transport(String),
    /// 响应体不是合法的 chat completion。
    Parse(String),
}

impl fmt::Display for AiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AiError::Configuration(msg) => write!(f, "configuration error: {msg}"),
            AiError::Transport(msg) => write!(f, "transport error: {msg}"),
            AiError::Parse(msg) => write!(f, "parse error: {msg}"),
        }
    }
}

impl std::error::Error for AiError {}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<RequestMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct RequestMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

/// 建站请求期望模型回的 JSON 形状。
#[derive(Debug, Deserialize)]
struct WebsitePayload {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    files: BTreeMap<String, String>,
}

/// 一次建站调用的产物:给用户看的文案加文件集。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebsiteBundle {
    pub message: String,
    pub files: Vec<(String, String)>,
}

#[derive(Debug, Clone)]
pub struct AiService {
    client: reqwest::Client,
    api_key: Option<String>,
    api_url: String,
    local_llm_url: String,
    model: String,
    max_tokens: u32,
    temperature: f32,
}

impl AiService {
    pub fn new(config: &AppConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self {
            client,
            api_key: config.api_key.clone(),
            api_url: config.api_url.clone(),
            local_llm_url: config.local_llm_url.clone(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        }
    }

    /// 托管端点单轮补全,返回首个 choice 的文本。
    pub async fn generate_text(&self, prompt: &str) -> Result<String, AiError> {
        self.call_hosted(prompt).await
    }

    /// 先试回环端点,失败再退回托管端点。
    pub async fn generate_text_local(&self, prompt: &str) -> Result<String, AiError> {
        match self
            .call_endpoint(&self.local_llm_url, None, "local-model", prompt)
            .await
        {
            Ok(content) => Ok(content),
            Err(err) => {
                tracing::warn!(error = %err, "local endpoint failed, falling back to hosted");
                self.call_hosted(prompt).await
            }
        }
    }

    async fn call_hosted(&self, prompt: &str) -> Result<String, AiError> {
        let Some(key) = self.api_key.as_deref().filter(|key| !key.is_empty()) else {
            return Err(AiError::Configuration(
                "API key not configured, set ZSITE_API_KEY or api_key in setting.json".to_string(),
            ));
        };
        self.call_endpoint(&self.api_url, Some(key), &self.model, prompt)
            .await
    }

    async fn call_endpoint(
        &self,
        url: &str,
        bearer: Option<&str>,
        model: &str,
        prompt: &str,
    ) -> Result<String, AiError> {
        let body = ChatCompletionRequest {
            model,
            messages: vec![RequestMessage {
                role: "user",
                content: prompt,
            }],
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };
        let mut request = self.client.post(url).json(&body);
        if let Some(token) = bearer {
            request = request.bearer_auth(token);
        }
        let response = request
            .send()
            .await
            .map_err(|e| AiError::Transport(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(AiError::Transport(format!(
                "chat completion request failed: {status}"
            )));
        }
        let parsed: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| AiError::Parse(e.to_string()))?;
        Ok(parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default())
    }

    /// 生成整站。模型回复解析失败或没给文件时,落回脚手架兜底站。
    pub async fn generate_website(
        &self,
        prompt: &str,
        use_local: bool,
    ) -> Result<WebsiteBundle, AiError> {
        let request_text = website_request_prompt(prompt);
        let content = if use_local {
            self.generate_text_local(&request_text).await?
        } else {
            self.generate_text(&request_text).await?
        };
        Ok(parse_website_reply(&content, prompt))
    }
}

fn website_request_prompt(prompt: &str) -> String {
    format!(
        "You are an expert web developer. Generate a complete, modern React website \
         based on the user's description.\n\n\
         Requirements:\n\
         - Use modern React with TypeScript\n\
         - Use Tailwind CSS for styling\n\
         - Create responsive, mobile-first design\n\
         - Include proper file structure\n\
         - Generate clean, production-ready code\n\n\
         User Request: {prompt}\n\n\
         Return only a JSON object with the following structure:\n\
         {{\n\
         \x20 \"message\": \"one paragraph describing what you built\",\n\
         \x20 \"files\": {{\n\
         \x20   \"src/App.tsx\": \"App component code\",\n\
         \x20   \"package.json\": \"package.json content\"\n\
         \x20 }}\n\
         }}"
    )
}

fn parse_website_reply(content: &str, prompt: &str) -> WebsiteBundle {
    match serde_json::from_str::<WebsitePayload>(content) {
        Ok(payload) if !payload.files.is_empty() => WebsiteBundle {
            message: payload.message.unwrap_or_else(|| {
                format!("I've generated a website based on your request: \"{prompt}\".")
            }),
            files: payload.files.into_iter().collect(),
        },
        Ok(_) => {
            tracing::warn!("model reply had no files, using fallback site");
            fallback_bundle(prompt)
        }
        Err(err) => {
            tracing::warn!(error = %err, "model reply was not valid JSON, using fallback site");
            fallback_bundle(prompt)
        }
    }
}

fn fallback_bundle(prompt: &str) -> WebsiteBundle {
    let site_name = scaffold::extract_site_name(prompt);
    WebsiteBundle {
        message: format!(
            "I've created {site_name} from your description. The layout is a starting \
             point, ask me to refine any part of it."
        ),
        files: scaffold::fallback_site(prompt),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_body_serializes_in_wire_shape() {
        let body = ChatCompletionRequest {
            model: "llama-3.1-70b-versatile",
            messages: vec![RequestMessage {
                role: "user",
                content: "hello",
            }],
            max_tokens: 4000,
            temperature: 0.7,
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["model"], "llama-3.1-70b-versatile");
        assert_eq!(value["messages"][0]["role"], "user");
        assert_eq!(value["messages"][0]["content"], "hello");
        assert_eq!(value["max_tokens"], 4000);
    }

    #[test]
    fn response_content_is_extracted() {
        let raw = r#"{"choices":[{"message":{"role":"assistant","content":"hi there"}}]}"#;
        let parsed: ChatCompletionResponse = serde_json::from_str(raw).unwrap();
        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content);
        assert_eq!(content.as_deref(), Some("hi there"));
    }

    #[test]
    fn valid_website_reply_is_used_as_is() {
        let reply = r#"{"message":"built it","files":{"src/App.tsx":"code","package.json":"{}"}}"#;
        let bundle = parse_website_reply(reply, "a blog");
        assert_eq!(bundle.message, "built it");
        assert_eq!(bundle.files.len(), 2);
        assert!(bundle.files.iter().any(|(p, _)| p == "src/App.tsx"));
    }

    #[test]
    fn missing_message_gets_a_default() {
        let reply = r#"{"files":{"index.html":"<html></html>"}}"#;
        let bundle = parse_website_reply(reply, "a blog");
        assert!(bundle.message.contains("a blog"));
        assert_eq!(bundle.files.len(), 1);
    }

    #[test]
    fn invalid_json_falls_back_to_scaffold() {
        let bundle = parse_website_reply("Sure! Here is your website...", "a coffee shop site");
        assert!(!bundle.files.is_empty());
        assert!(bundle.files.iter().any(|(p, _)| p == "package.json"));
        // 兜底文案里带着提取出来的站名。
        assert!(bundle.message.contains("Coffee Shop"));
    }

    #[test]
    fn empty_files_object_falls_back_to_scaffold() {
        let bundle = parse_website_reply(r#"{"message":"hm","files":{}}"#, "a coffee shop site");
        assert!(!bundle.files.is_empty());
    }

    #[test]
    fn hosted_call_without_key_is_a_configuration_error() {
        let service = AiService::new(&AppConfig::default());
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        let err = runtime.block_on(service.generate_text("hi")).unwrap_err();
        assert!(matches!(err, AiError::Configuration(_)));
    }

    #[test]
    fn website_request_prompt_embeds_user_request() {
        let prompt = website_request_prompt("a bakery");
        assert!(prompt.contains("User Request: a bakery"));
        assert!(prompt.contains("\"files\""));
    }
}
