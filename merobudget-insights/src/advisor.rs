//! The three AI entry points: insights, category classification, Q&A.
//!
//! Every method returns a usable value. Failures are logged and replaced by
//! static fallbacks; nothing is retried for the classifier.

use merobudget_core::{
    failure_insights, fallback_insights, CategoryLabel, CurrencyFormat, FinancialSummary, Insight,
    Transaction, TransactionKind,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::error::AiError;
use crate::extract::{insights_from_reply, parse_label};
use crate::prompts::{self, Locale};
use crate::retry::{with_retry, RetryPolicy};
use crate::settings::AiSettings;
use crate::transport::{ChatRequest, ChatTransport, HttpTransport};

pub const NOT_CONFIGURED_ANSWER: &str =
    "API key not configured. Set GROQ_API_KEY (or run `merobudget auth paste-api-key`) to enable AI-powered answers.";

pub const ANSWER_APOLOGY: &str =
    "Your financial data is still being tracked and you can try asking again in a moment.";

/// Entry point for AI features. Holds the transport and call settings;
/// carries no per-request state, so one instance can serve many calls.
#[derive(Clone)]
pub struct Advisor {
    transport: Option<Arc<dyn ChatTransport>>,
    model: String,
    retry: RetryPolicy,
    currency: CurrencyFormat,
    locale: Locale,
}

impl Advisor {
    pub fn new(transport: Arc<dyn ChatTransport>, settings: &AiSettings) -> Self {
        Self {
            transport: Some(transport),
            ..Self::unconfigured(settings)
        }
    }

    /// An advisor with no credential: every call returns its fallback without I/O.
    pub fn unconfigured(settings: &AiSettings) -> Self {
        Self {
            transport: None,
            model: settings.model.clone(),
            retry: settings.retry_policy(),
            currency: CurrencyFormat::default(),
            locale: Locale::default(),
        }
    }

    /// Build the HTTP transport when a non-empty API key is present.
    pub fn from_settings(settings: &AiSettings, api_key: Option<&str>) -> Result<Self, AiError> {
        match api_key.map(str::trim).filter(|k| !k.is_empty()) {
            Some(key) => {
                let transport = HttpTransport::new(settings, key)?;
                Ok(Self::new(Arc::new(transport), settings))
            }
            None => {
                warn!("no API key configured; AI features will use fallbacks");
                Ok(Self::unconfigured(settings))
            }
        }
    }

    pub fn with_currency(mut self, currency: CurrencyFormat) -> Self {
        self.currency = currency;
        self
    }

    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn is_configured(&self) -> bool {
        self.transport.is_some()
    }

    pub fn currency(&self) -> &CurrencyFormat {
        &self.currency
    }

    /// Three insights about `txns`, most relevant first. Never empty.
    pub async fn generate_insights(&self, txns: &[Transaction]) -> Vec<Insight> {
        info!(records = txns.len(), "generating insights");

        let Some(transport) = &self.transport else {
            warn!("no API key; returning default insights");
            return fallback_insights();
        };
        if txns.is_empty() {
            info!("no transactions; returning default insights");
            return fallback_insights();
        }

        match self.request_insights(transport.as_ref(), txns).await {
            Ok(insights) => {
                info!(count = insights.len(), "insights generated");
                insights
            }
            Err(e) => {
                warn!(class = e.class(), error = %e, "insight generation failed; using fallback");
                failure_insights(e.user_message())
            }
        }
    }

    async fn request_insights(
        &self,
        transport: &dyn ChatTransport,
        txns: &[Transaction],
    ) -> Result<Vec<Insight>, AiError> {
        let summary = FinancialSummary::from_transactions(txns);
        info!(
            income = %self.currency.format(summary.total_income()),
            expenses = %self.currency.format(summary.total_expenses()),
            balance = %self.currency.format(summary.net_balance()),
            "financial summary"
        );

        let request = ChatRequest::new(
            &self.model,
            prompts::insight_system(&self.locale, &self.currency),
            prompts::insight_prompt(&summary, txns, &self.locale, &self.currency),
        )
        .temperature(0.6)
        .max_tokens(800);

        let reply = with_retry(&self.retry, "insights", |_| transport.complete(&request)).await?;
        debug!(reply = %truncate(&reply, 200), "insight reply");
        insights_from_reply(&reply)
    }

    /// Map a free-text description onto the closed label set.
    pub async fn classify(&self, description: &str) -> CategoryLabel {
        self.classify_inner(description, None).await
    }

    /// Like `classify`, but the model is told the kind and only that kind's labels are accepted.
    pub async fn classify_for(&self, description: &str, kind: TransactionKind) -> CategoryLabel {
        self.classify_inner(description, Some(kind)).await
    }

    async fn classify_inner(&self, description: &str, kind: Option<TransactionKind>) -> CategoryLabel {
        let Some(transport) = &self.transport else {
            debug!("no API key; classifying as Other");
            return CategoryLabel::Other;
        };
        if description.trim().is_empty() {
            return CategoryLabel::Other;
        }

        let request = ChatRequest::new(
            &self.model,
            prompts::classify_system(&self.locale, kind),
            prompts::classify_prompt(description),
        )
        .temperature(0.1)
        .max_tokens(20);

        let policy = self.retry.single_attempt();
        match with_retry(&policy, "classify", |_| transport.complete(&request)).await {
            Ok(reply) => {
                let label = parse_label(&reply, kind);
                debug!(reply = %truncate(&reply, 40), %label, "classified");
                label
            }
            Err(e) => {
                warn!(class = e.class(), error = %e, "classification failed; using Other");
                CategoryLabel::Other
            }
        }
    }

    /// Answer a question about `context` in a few sentences.
    pub async fn answer(&self, question: &str, context: &[Transaction]) -> String {
        let Some(transport) = &self.transport else {
            return NOT_CONFIGURED_ANSWER.to_string();
        };

        match self.request_answer(transport.as_ref(), question, context).await {
            Ok(text) => text,
            Err(e) => {
                warn!(class = e.class(), error = %e, "answer failed; using apology");
                format!("{} {}", e.user_message(), ANSWER_APOLOGY)
            }
        }
    }

    async fn request_answer(
        &self,
        transport: &dyn ChatTransport,
        question: &str,
        context: &[Transaction],
    ) -> Result<String, AiError> {
        let summary = FinancialSummary::from_transactions(context);
        let request = ChatRequest::new(
            &self.model,
            prompts::answer_system(&self.locale, &self.currency),
            prompts::answer_prompt(question, &summary, context, &self.locale, &self.currency),
        )
        .temperature(0.7)
        .max_tokens(250);

        let reply = with_retry(&self.retry, "answer", |_| transport.complete(&request)).await?;
        let text = reply.trim();
        if text.is_empty() {
            return Err(AiError::MalformedResponse("empty answer".to_string()));
        }
        Ok(text.to_string())
    }
}

fn truncate(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
