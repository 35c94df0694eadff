use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use merobudget_core::{fallback_insights, CategoryLabel, InsightKind, Transaction, TransactionKind};
use merobudget_insights::{
    AiError, AiSettings, Advisor, ChatRequest, ChatTransport, ANSWER_APOLOGY,
};
use std::collections::{HashSet, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;

/// Replays scripted replies in order and records every call.
/// Once the script runs out, the last entry repeats.
struct ScriptedTransport {
    script: Mutex<VecDeque<Result<String, AiError>>>,
    last: Mutex<Option<Result<String, AiError>>>,
    calls: Mutex<Vec<(Instant, ChatRequest)>>,
}

impl ScriptedTransport {
    fn new(script: Vec<Result<String, AiError>>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
            last: Mutex::new(None),
            calls: Mutex::new(Vec::new()),
        })
    }

    fn always(reply: Result<String, AiError>) -> Arc<Self> {
        Self::new(vec![reply])
    }

    fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn call_times(&self) -> Vec<Instant> {
        self.calls.lock().unwrap().iter().map(|(t, _)| *t).collect()
    }

    fn request(&self, idx: usize) -> ChatRequest {
        self.calls.lock().unwrap()[idx].1.clone()
    }
}

#[async_trait]
impl ChatTransport for ScriptedTransport {
    async fn complete(&self, request: &ChatRequest) -> Result<String, AiError> {
        self.calls.lock().unwrap().push((Instant::now(), request.clone()));
        let next = self.script.lock().unwrap().pop_front();
        let mut last = self.last.lock().unwrap();
        if let Some(r) = next {
            *last = Some(r);
        }
        last.clone()
            .unwrap_or_else(|| Err(AiError::Unknown("empty script".to_string())))
    }
}

fn advisor(transport: Arc<ScriptedTransport>) -> Advisor {
    Advisor::new(transport, &AiSettings::default())
}

fn sample_txns() -> Vec<Transaction> {
    let d = |day| Utc.with_ymd_and_hms(2026, 8, day, 10, 0, 0).unwrap();
    vec![
        Transaction::new("1", 65_000.0, "Salary", TransactionKind::Income, "August salary", d(1)),
        Transaction::new("2", 18_000.0, "Bills", TransactionKind::Expense, "Flat rent", d(2)),
        Transaction::new("3", 9_500.0, "Food", TransactionKind::Expense, "Groceries at Bhatbhateni", d(5)),
        Transaction::new("4", 1_200.0, "Transportation", TransactionKind::Expense, "Pathao rides", d(7)),
    ]
}

const THREE_INSIGHTS: &str = r#"[
  {"type": "warning", "title": "Rent is heavy", "message": "Rent is रू 18,000, 28% of income.", "action": "Look for shared housing", "confidence": 0.9},
  {"type": "success", "title": "Positive balance", "message": "You kept रू 36,300.", "confidence": 0.85},
  {"type": "tip", "title": "Groceries", "message": "Buy staples in bulk.", "action": "Plan weekly shopping", "confidence": 0.7}
]"#;

#[tokio::test]
async fn test_empty_input_returns_fallback_without_io() {
    let t = ScriptedTransport::always(Ok(THREE_INSIGHTS.to_string()));
    let out = advisor(t.clone()).generate_insights(&[]).await;
    assert_eq!(out, fallback_insights());
    assert_eq!(t.call_count(), 0);
}

#[tokio::test]
async fn test_well_formed_reply_yields_three_insights() {
    let t = ScriptedTransport::always(Ok(THREE_INSIGHTS.to_string()));
    let out = advisor(t.clone()).generate_insights(&sample_txns()).await;

    assert_eq!(t.call_count(), 1);
    assert_eq!(out.len(), 3);
    assert_eq!(out[0].kind, InsightKind::Warning);
    assert_eq!(out[0].title, "Rent is heavy");
    assert_eq!(out[1].action, None);

    let ids: HashSet<_> = out.iter().map(|i| i.id.clone()).collect();
    assert_eq!(ids.len(), 3, "ids must be unique");
    for i in &out {
        assert!(i.id.starts_with("ai-"));
        assert!((0.0..=1.0).contains(&i.confidence));
    }
}

#[tokio::test]
async fn test_insight_request_shape() {
    let t = ScriptedTransport::always(Ok(THREE_INSIGHTS.to_string()));
    advisor(t.clone()).generate_insights(&sample_txns()).await;

    let req = t.request(0);
    assert_eq!(req.model, AiSettings::default().model);
    assert_eq!(req.max_tokens, 800);
    assert!((req.temperature - 0.6).abs() < 1e-6);
    assert!(req.system_prompt().contains("JSON array"));
    assert!(req.user_prompt().contains("TOTALS: Income रू 65,000, Expenses रू 28,700, Balance रू 36,300"));
    assert!(req.user_prompt().contains("Groceries at Bhatbhateni"));
}

#[tokio::test]
async fn test_reply_wrapped_in_prose_and_fence() {
    let wrapped = format!(
        "Sure! Based on your data, here is my analysis:\n\n```json\n{THREE_INSIGHTS}\n```\n\nLet me know if you need more."
    );
    let t = ScriptedTransport::always(Ok(wrapped));
    let out = advisor(t).generate_insights(&sample_txns()).await;
    assert_eq!(out.len(), 3);
    assert_eq!(out[2].title, "Groceries");
}

#[tokio::test]
async fn test_missing_fields_are_coerced() {
    let t = ScriptedTransport::always(Ok(r#"[{"message": "Only a message"}, {"type": "tip", "confidence": 7}]"#.to_string()));
    let out = advisor(t).generate_insights(&sample_txns()).await;
    assert_eq!(out.len(), 2);
    assert_eq!(out[0].kind, InsightKind::Info);
    assert_eq!(out[0].title, "Budget Insight");
    assert_eq!(out[0].confidence, 0.8);
    assert_eq!(out[1].message, "Financial analysis complete");
    assert_eq!(out[1].confidence, 1.0);
}

#[tokio::test(start_paused = true)]
async fn test_auth_error_is_not_retried() {
    let t = ScriptedTransport::always(Err(AiError::from_status(401, "invalid api key")));
    let out = advisor(t.clone()).generate_insights(&sample_txns()).await;

    assert_eq!(t.call_count(), 1);
    assert_eq!(out.len(), 3);
    assert_eq!(out[0].id, "error-1");
    assert_eq!(out[0].kind, InsightKind::Warning);
    assert!(out[0].message.contains("API key"));
    assert_eq!(&out[1..], &fallback_insights()[1..]);
}

#[tokio::test(start_paused = true)]
async fn test_transient_failures_then_success() {
    let t = ScriptedTransport::new(vec![
        Err(AiError::from_status(503, "")),
        Err(AiError::RateLimited("slow down".to_string())),
        Ok(THREE_INSIGHTS.to_string()),
    ]);
    let out = advisor(t.clone()).generate_insights(&sample_txns()).await;

    assert_eq!(t.call_count(), 3);
    assert_eq!(out.len(), 3);
    assert_eq!(out[0].title, "Rent is heavy");

    let times = t.call_times();
    let first_gap = times[1] - times[0];
    let second_gap = times[2] - times[1];
    assert!(first_gap >= Duration::from_secs(1), "first backoff was {first_gap:?}");
    assert!(second_gap > first_gap, "backoff should grow: {first_gap:?} then {second_gap:?}");
}

#[tokio::test(start_paused = true)]
async fn test_persistent_outage_exhausts_attempts() {
    let t = ScriptedTransport::always(Err(AiError::Network("connection refused".to_string())));
    let out = advisor(t.clone()).generate_insights(&sample_txns()).await;
    assert_eq!(t.call_count(), 3);
    assert_eq!(out[0].id, "error-1");
    assert!(out[0].message.contains("Network"));
}

#[tokio::test(start_paused = true)]
async fn test_malformed_reply_falls_back_without_retry() {
    let t = ScriptedTransport::always(Ok("I think you are doing great!".to_string()));
    let out = advisor(t.clone()).generate_insights(&sample_txns()).await;
    assert_eq!(t.call_count(), 1);
    assert_eq!(out.len(), 3);
    assert_eq!(out[0].id, "error-1");
}

#[tokio::test]
async fn test_classify_always_returns_known_label() {
    let replies = [
        Ok(String::new()),
        Ok("asdf qwerty".to_string()),
        Ok("Groceries".to_string()),
        Ok("Cryptocurrency".to_string()),
        Err(AiError::Network("down".to_string())),
        Ok("Food".to_string()),
        Ok("\"Transportation\".".to_string()),
    ];
    let expected = [
        CategoryLabel::Other,
        CategoryLabel::Other,
        CategoryLabel::Other,
        CategoryLabel::Other,
        CategoryLabel::Other,
        CategoryLabel::Food,
        CategoryLabel::Transportation,
    ];

    for (reply, want) in replies.into_iter().zip(expected) {
        let t = ScriptedTransport::always(reply);
        let got = advisor(t.clone()).classify("Dal bhat at Thamel").await;
        assert!(CategoryLabel::ALL.contains(&got));
        assert_eq!(got, want);
        assert_eq!(t.call_count(), 1, "classifier must not retry");
    }
}

#[tokio::test]
async fn test_classify_request_shape() {
    let t = ScriptedTransport::always(Ok("Bills".to_string()));
    let got = advisor(t.clone()).classify("NEA electricity bill").await;
    assert_eq!(got, CategoryLabel::Bills);

    let req = t.request(0);
    assert_eq!(req.max_tokens, 20);
    assert!((req.temperature - 0.1).abs() < 1e-6);
    assert!(req.user_prompt().contains("NEA electricity bill"));
    assert!(req.system_prompt().contains("Respond with only the category name"));
}

#[tokio::test]
async fn test_classify_blank_description_skips_io() {
    let t = ScriptedTransport::always(Ok("Food".to_string()));
    assert_eq!(advisor(t.clone()).classify("   ").await, CategoryLabel::Other);
    assert_eq!(t.call_count(), 0);
}

#[tokio::test]
async fn test_classify_for_rejects_other_vocabulary() {
    let t = ScriptedTransport::always(Ok("Salary".to_string()));
    let a = advisor(t.clone());
    assert_eq!(a.classify_for("Monthly pay", TransactionKind::Expense).await, CategoryLabel::Other);
    assert_eq!(a.classify_for("Monthly pay", TransactionKind::Income).await, CategoryLabel::Salary);
    assert!(t.request(0).system_prompt().contains("EXPENSE"));
}

#[tokio::test]
async fn test_answer_returns_trimmed_text() {
    let t = ScriptedTransport::always(Ok("\n  You spent रू 28,700 this month. Rent is the largest share.  \n".to_string()));
    let out = advisor(t.clone()).answer("Where does my money go?", &sample_txns()).await;
    assert_eq!(out, "You spent रू 28,700 this month. Rent is the largest share.");

    let req = t.request(0);
    assert_eq!(req.max_tokens, 250);
    assert!(req.user_prompt().contains("Where does my money go?"));
    assert!(req.user_prompt().contains("Net Balance: रू 36,300"));
}

#[tokio::test(start_paused = true)]
async fn test_answer_failure_returns_apology() {
    let t = ScriptedTransport::always(Err(AiError::from_status(500, "boom")));
    let out = advisor(t.clone()).answer("Can I afford a bike?", &sample_txns()).await;
    assert!(out.ends_with(ANSWER_APOLOGY));
    assert!(out.starts_with("AI service temporarily unavailable."));
    assert_eq!(t.call_count(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_answer_empty_reply_is_apology() {
    let t = ScriptedTransport::always(Ok("   ".to_string()));
    let out = advisor(t).answer("Anything?", &sample_txns()).await;
    assert!(out.ends_with(ANSWER_APOLOGY));
}
