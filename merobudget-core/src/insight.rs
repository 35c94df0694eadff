//! Insight values handed to the UI, and the static fallback table.

use serde::{Deserialize, Serialize};

/// Severity / flavour of an insight
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum InsightKind {
    Warning,
    Info,
    Success,
    Tip,
}

impl InsightKind {
    /// Lenient parse of a model-supplied kind; `None` for anything unrecognised.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "warning" => Some(InsightKind::Warning),
            "info" => Some(InsightKind::Info),
            "success" => Some(InsightKind::Success),
            "tip" => Some(InsightKind::Tip),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            InsightKind::Warning => "warning",
            InsightKind::Info => "info",
            InsightKind::Success => "success",
            InsightKind::Tip => "tip",
        }
    }
}

/// A short observation about the user's finances
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Insight {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: InsightKind,
    pub title: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    /// Always within [0, 1]
    pub confidence: f64,
}

impl Insight {
    pub fn new(
        id: impl Into<String>,
        kind: InsightKind,
        title: impl Into<String>,
        message: impl Into<String>,
        action: Option<&str>,
        confidence: f64,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            title: title.into(),
            message: message.into(),
            action: action.map(str::to_string),
            confidence: clamp_confidence(confidence),
        }
    }
}

/// Clamp into [0, 1]; NaN becomes 0.
pub fn clamp_confidence(c: f64) -> f64 {
    if c.is_nan() { 0.0 } else { c.clamp(0.0, 1.0) }
}

/// The fixed insights shown whenever the model can't produce usable output.
///
/// Order: tracking is active, general savings tip, category tip.
pub fn fallback_insights() -> Vec<Insight> {
    vec![
        Insight::new(
            "default-1",
            InsightKind::Info,
            "Budget Tracking Active",
            "MeroBudget is ready to analyze your finances. Add some income and expenses in रू to get personalized insights.",
            Some("Add first transaction"),
            0.9,
        ),
        Insight::new(
            "default-2",
            InsightKind::Tip,
            "Budgeting Tips",
            "Aim to save 20% of income. With average expenses of रू 25,000-40,000/month, even रू 500 daily savings adds up to रू 15,000 monthly.",
            Some("Start saving challenge"),
            0.85,
        ),
        Insight::new(
            "default-3",
            InsightKind::Success,
            "Smart Category Management",
            "Track categories like Food (रू 8,000-15,000), Transport (रू 2,000-5,000), and Bills (रू 3,000-8,000) for better budget control.",
            Some("Set category budgets"),
            0.8,
        ),
    ]
}

/// Fallback set led by a warning that says why the AI result is missing.
///
/// The warning replaces the first static entry, so the length stays 3.
pub fn failure_insights(reason: &str) -> Vec<Insight> {
    let mut out = vec![Insight::new(
        "error-1",
        InsightKind::Warning,
        "AI Analysis Unavailable",
        format!("{reason} Your financial data is safe and tracking continues."),
        Some("Retry later"),
        0.9,
    )];
    out.extend(fallback_insights().into_iter().skip(1));
    out
}
