use thiserror::Error;

/// Failure classes for a chat-completion call.
///
/// None of these escape the `Advisor` methods; they pick the retry
/// behaviour and the wording of the fallback shown to the user.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AiError {
    #[error("authentication failed: {0}")]
    Auth(String),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("rate limited: {0}")]
    RateLimited(String),

    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("request timed out")]
    Timeout,

    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("unexpected error: {0}")]
    Unknown(String),
}

impl AiError {
    /// Classify a non-2xx HTTP status.
    pub fn from_status(status: u16, body: impl Into<String>) -> Self {
        let body = body.into();
        let detail = if body.is_empty() {
            format!("HTTP {status}")
        } else {
            format!("HTTP {status}: {body}")
        };
        match status {
            401 | 403 => AiError::Auth(detail),
            400 | 404 | 422 => AiError::BadRequest(detail),
            429 => AiError::RateLimited(detail),
            500 | 502 | 503 | 504 => AiError::ServiceUnavailable(detail),
            _ => AiError::Unknown(detail),
        }
    }

    /// Transient failures worth another attempt after backoff.
    pub fn is_retriable(&self) -> bool {
        matches!(
            self,
            AiError::RateLimited(_)
                | AiError::ServiceUnavailable(_)
                | AiError::Network(_)
                | AiError::Timeout
        )
    }

    /// Short label for logs.
    pub fn class(&self) -> &'static str {
        match self {
            AiError::Auth(_) => "auth",
            AiError::BadRequest(_) => "bad-request",
            AiError::RateLimited(_) => "rate-limited",
            AiError::ServiceUnavailable(_) => "service-unavailable",
            AiError::Network(_) => "network",
            AiError::Timeout => "timeout",
            AiError::MalformedResponse(_) => "malformed-response",
            AiError::Unknown(_) => "unknown",
        }
    }

    /// Sentence shown to the user in place of the AI result.
    pub fn user_message(&self) -> &'static str {
        match self {
            AiError::RateLimited(_) => "Rate limit reached. Please wait a moment and try again.",
            AiError::Auth(_) => "API key issue. Please check your API key configuration.",
            AiError::ServiceUnavailable(_) => {
                "AI service temporarily unavailable. Please try again later."
            }
            AiError::Network(_) | AiError::Timeout => {
                "Network connection issue. Please check your internet connection."
            }
            AiError::MalformedResponse(_) => "The AI returned an unreadable answer.",
            AiError::BadRequest(_) | AiError::Unknown(_) => {
                "Temporary AI service issue. Please try again."
            }
        }
    }
}

impl From<reqwest::Error> for AiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            AiError::Timeout
        } else if let Some(status) = e.status() {
            AiError::from_status(status.as_u16(), String::new())
        } else if e.is_connect() || e.is_request() {
            AiError::Network(e.to_string())
        } else if e.is_decode() || e.is_body() {
            AiError::MalformedResponse(e.to_string())
        } else {
            AiError::Unknown(e.to_string())
        }
    }
}
