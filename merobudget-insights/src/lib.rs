//! merobudget-insights: AI insights, category classification and Q&A over
//! an OpenAI-compatible chat-completion API, with retry and static fallbacks

pub mod advisor;
pub mod error;
pub mod extract;
pub mod prompts;
pub mod retry;
pub mod settings;
pub mod transport;

pub use advisor::{Advisor, ANSWER_APOLOGY, NOT_CONFIGURED_ANSWER};
pub use error::AiError;
pub use prompts::Locale;
pub use retry::{with_retry, RetryPolicy};
pub use settings::AiSettings;
pub use transport::{ChatRequest, ChatTransport, ChatTurn, HttpTransport};
