use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::retry::RetryPolicy;

pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";

/// Endpoint and call-shaping settings for the AI client
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AiSettings {
    pub base_url: String,
    pub model: String,
    /// Sent as `HTTP-Referer`
    pub app_url: String,
    /// Sent as `X-Title`
    pub app_title: String,
    pub max_attempts: u32,
    pub base_delay_ms: u64,
    /// Per-attempt timeout
    pub timeout_secs: u64,
}

impl Default for AiSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            app_url: "http://localhost:3000".to_string(),
            app_title: "MeroBudget".to_string(),
            max_attempts: 3,
            base_delay_ms: 1000,
            timeout_secs: 30,
        }
    }
}

impl AiSettings {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts.max(1),
            base_delay: Duration::from_millis(self.base_delay_ms),
            attempt_timeout: Duration::from_secs(self.timeout_secs.max(1)),
        }
    }
}
