use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::AiError;
use crate::settings::AiSettings;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ChatTurn {
    pub role: String,
    pub content: String,
}

/// Body of an OpenAI-compatible `chat/completions` call
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatTurn>,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl ChatRequest {
    pub fn new(model: impl Into<String>, system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            messages: vec![
                ChatTurn {
                    role: "system".to_string(),
                    content: system.into(),
                },
                ChatTurn {
                    role: "user".to_string(),
                    content: user.into(),
                },
            ],
            temperature: 0.4,
            max_tokens: 450,
        }
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.temperature = t;
        self
    }

    pub fn max_tokens(mut self, n: u32) -> Self {
        self.max_tokens = n;
        self
    }

    pub fn system_prompt(&self) -> &str {
        self.turn("system")
    }

    pub fn user_prompt(&self) -> &str {
        self.turn("user")
    }

    fn turn(&self, role: &str) -> &str {
        self.messages
            .iter()
            .find(|m| m.role == role)
            .map(|m| m.content.as_str())
            .unwrap_or("")
    }
}

/// Sends one completion request and returns the raw reply text.
///
/// Implementations report failures as classified `AiError`s; retrying is
/// the caller's job.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn complete(&self, request: &ChatRequest) -> Result<String, AiError>;
}

/// reqwest client for OpenAI-compatible endpoints (Groq by default)
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpTransport {
    pub fn new(settings: &AiSettings, api_key: &str) -> Result<Self, AiError> {
        let mut headers = HeaderMap::new();
        let bearer = HeaderValue::from_str(&format!("Bearer {api_key}"))
            .map_err(|_| AiError::Auth("API key contains invalid characters".to_string()))?;
        headers.insert(AUTHORIZATION, bearer);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Ok(v) = HeaderValue::from_str(&settings.app_url) {
            headers.insert(HeaderName::from_static("http-referer"), v);
        }
        if let Ok(v) = HeaderValue::from_str(&settings.app_title) {
            headers.insert(HeaderName::from_static("x-title"), v);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(settings.timeout_secs.max(1)))
            .build()
            .map_err(|e| AiError::Unknown(format!("build http client: {e}")))?;

        Ok(Self {
            client,
            endpoint: format!("{}/chat/completions", settings.base_url.trim_end_matches('/')),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[derive(Deserialize)]
struct Resp {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: MsgOut,
}

#[derive(Deserialize)]
struct MsgOut {
    content: Option<String>,
}

#[async_trait]
impl ChatTransport for HttpTransport {
    async fn complete(&self, request: &ChatRequest) -> Result<String, AiError> {
        let resp = self.client.post(&self.endpoint).json(request).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let txt = resp.text().await.unwrap_or_default();
            return Err(AiError::from_status(status.as_u16(), txt));
        }

        let out: Resp = resp
            .json()
            .await
            .map_err(|e| AiError::MalformedResponse(format!("parse completion: {e}")))?;
        out.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| AiError::MalformedResponse("no content in completion".to_string()))
    }
}
