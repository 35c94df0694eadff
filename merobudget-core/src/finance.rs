//! Transaction records and the derived financial summary

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Whether money came in or went out
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum TransactionKind {
    #[serde(rename = "income")]
    Income,
    #[serde(rename = "expense")]
    Expense,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        }
    }

    /// Parse the stored `type` column. Anything other than income/expense is rejected.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "income" => Some(TransactionKind::Income),
            "expense" => Some(TransactionKind::Expense),
            _ => None,
        }
    }
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single recorded income or expense entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    /// Unique identifier assigned by the record store
    pub id: String,
    /// Non-negative amount; direction comes from `kind`
    pub amount: f64,
    /// Free-form category label (usually one of `CategoryLabel`)
    pub category: String,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub description: String,
    pub date: DateTime<Utc>,
}

impl Transaction {
    pub fn new(
        id: impl Into<String>,
        amount: f64,
        category: impl Into<String>,
        kind: TransactionKind,
        description: impl Into<String>,
        date: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            amount,
            category: category.into(),
            kind,
            description: description.into(),
            date,
        }
    }

    pub fn is_expense(&self) -> bool {
        self.kind == TransactionKind::Expense
    }

    pub fn is_income(&self) -> bool {
        self.kind == TransactionKind::Income
    }
}

/// Income, expense and balance totals over a set of transactions.
///
/// Fields are private so `net_balance` always equals
/// `total_income - total_expenses`.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Default)]
pub struct FinancialSummary {
    total_income: f64,
    total_expenses: f64,
    net_balance: f64,
}

impl FinancialSummary {
    pub fn from_transactions(txns: &[Transaction]) -> Self {
        let mut total_income = 0.0;
        let mut total_expenses = 0.0;
        for t in txns {
            match t.kind {
                TransactionKind::Income => total_income += t.amount,
                TransactionKind::Expense => total_expenses += t.amount,
            }
        }
        Self {
            total_income,
            total_expenses,
            net_balance: total_income - total_expenses,
        }
    }

    pub fn total_income(&self) -> f64 {
        self.total_income
    }

    pub fn total_expenses(&self) -> f64 {
        self.total_expenses
    }

    pub fn net_balance(&self) -> f64 {
        self.net_balance
    }
}
