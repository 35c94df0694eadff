//! Monthly budget progress for the current calendar month.

use anyhow::{bail, Result};
use chrono::NaiveDate;
use chrono_tz::Tz;
use serde::Serialize;

use crate::finance::Transaction;
use crate::time::same_month;

/// Progress band, used to pick the bar colour in the UI
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum BudgetLevel {
    /// up to 50%
    OnTrack,
    /// up to 75%
    Caution,
    /// up to 100%
    Warning,
    Over,
}

impl BudgetLevel {
    pub fn from_percentage(pct: f64) -> Self {
        if pct <= 50.0 {
            BudgetLevel::OnTrack
        } else if pct <= 75.0 {
            BudgetLevel::Caution
        } else if pct <= 100.0 {
            BudgetLevel::Warning
        } else {
            BudgetLevel::Over
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct BudgetStatus {
    pub monthly_budget: f64,
    pub month_income: f64,
    pub month_expenses: f64,
    /// Expenses as a share of the budget (0 when no budget is set)
    pub percentage: f64,
    /// Negative once over budget
    pub remaining: f64,
    pub over_budget: bool,
    pub level: BudgetLevel,
}

impl BudgetStatus {
    pub fn compute(txns: &[Transaction], monthly_budget: f64, today: NaiveDate, tz: Tz) -> Self {
        let mut month_income = 0.0;
        let mut month_expenses = 0.0;
        for t in txns.iter().filter(|t| same_month(t.date, today, tz)) {
            if t.is_expense() {
                month_expenses += t.amount;
            } else {
                month_income += t.amount;
            }
        }

        let percentage = if monthly_budget > 0.0 {
            month_expenses / monthly_budget * 100.0
        } else {
            0.0
        };

        Self {
            monthly_budget,
            month_income,
            month_expenses,
            percentage,
            remaining: monthly_budget - month_expenses,
            over_budget: month_expenses > monthly_budget,
            level: BudgetLevel::from_percentage(percentage),
        }
    }

    /// Width of the progress bar, capped at 100.
    pub fn bar_percentage(&self) -> f64 {
        self.percentage.min(100.0)
    }
}

/// Accept a budget only when it is a finite, positive amount.
pub fn validate_budget(amount: f64) -> Result<f64> {
    if !amount.is_finite() || amount <= 0.0 {
        bail!("monthly budget must be a positive amount, got {amount}");
    }
    Ok(amount)
}
