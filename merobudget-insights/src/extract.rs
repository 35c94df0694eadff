//! Turning free-form model replies into typed values.
//!
//! Models wrap JSON in prose or markdown fences and invent fields, so every
//! reply goes through here before it reaches the caller.

use merobudget_core::insight::clamp_confidence;
use merobudget_core::{CategoryLabel, Insight, InsightKind, TransactionKind};
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;
use uuid::Uuid;

use crate::error::AiError;

pub const DEFAULT_TITLE: &str = "Budget Insight";
pub const DEFAULT_MESSAGE: &str = "Financial analysis complete";
pub const DEFAULT_CONFIDENCE: f64 = 0.8;

static FENCE_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^```[A-Za-z]*\s*").expect("static regex"));
static FENCE_CLOSE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s*```$").expect("static regex"));

/// Strip a surrounding code fence and keep the span from the first `[` to the last `]`.
pub fn isolate_json_array(raw: &str) -> &str {
    let trimmed = raw.trim();
    let start = FENCE_OPEN.find(trimmed).map(|m| m.end()).unwrap_or(0);
    let end = FENCE_CLOSE.find(trimmed).map(|m| m.start()).unwrap_or(trimmed.len());
    let body = if start <= end { &trimmed[start..end] } else { trimmed };

    match (body.find('['), body.rfind(']')) {
        (Some(open), Some(close)) if open < close => &body[open..=close],
        _ => body,
    }
}

/// Parse a reply into a non-empty JSON array.
pub fn parse_json_array(raw: &str) -> Result<Vec<Value>, AiError> {
    let candidate = isolate_json_array(raw);
    let value: Value = serde_json::from_str(candidate)
        .map_err(|e| AiError::MalformedResponse(format!("invalid JSON: {e}")))?;
    match value {
        Value::Array(items) if !items.is_empty() => Ok(items),
        Value::Array(_) => Err(AiError::MalformedResponse("empty insight array".to_string())),
        other => Err(AiError::MalformedResponse(format!(
            "expected a JSON array, got {}",
            json_kind(&other)
        ))),
    }
}

/// Parse the insight reply and coerce each element.
pub fn insights_from_reply(raw: &str) -> Result<Vec<Insight>, AiError> {
    Ok(parse_json_array(raw)?.iter().map(coerce_insight).collect())
}

/// Build an `Insight` from whatever the model sent, filling gaps with defaults.
pub fn coerce_insight(v: &Value) -> Insight {
    let text = |key: &str| {
        v.get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
    };

    let kind = text("type").and_then(InsightKind::parse).unwrap_or(InsightKind::Info);
    let confidence = v
        .get("confidence")
        .and_then(|c| c.as_f64().or_else(|| c.as_str().and_then(|s| s.trim().parse().ok())))
        .filter(|c| c.is_finite())
        .map(clamp_confidence)
        .unwrap_or(DEFAULT_CONFIDENCE);

    Insight {
        id: format!("ai-{}", Uuid::new_v4()),
        kind,
        title: text("title").unwrap_or(DEFAULT_TITLE).to_string(),
        message: text("message").unwrap_or(DEFAULT_MESSAGE).to_string(),
        action: text("action").map(str::to_string),
        confidence,
    }
}

/// Map a classifier reply onto the closed label set. Anything else is `Other`.
///
/// With `kind`, labels from the other side of the ledger are rejected too.
pub fn parse_label(reply: &str, kind: Option<TransactionKind>) -> CategoryLabel {
    let cleaned = reply
        .trim()
        .trim_matches(|c: char| matches!(c, '"' | '\'' | '`' | '.' | '*'))
        .trim();
    match CategoryLabel::from_label(cleaned) {
        Some(label) if kind.is_none_or(|k| label.belongs_to(k)) => label,
        _ => CategoryLabel::Other,
    }
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
