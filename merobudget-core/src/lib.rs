//! merobudget-core: transaction types, summaries, formatting and budget math

pub mod budget;
pub mod category;
pub mod currency;
pub mod finance;
pub mod insight;
pub mod stats;
pub mod time;

pub use budget::{validate_budget, BudgetLevel, BudgetStatus};
pub use category::CategoryLabel;
pub use currency::{CurrencyFormat, Grouping};
pub use finance::{FinancialSummary, Transaction, TransactionKind};
pub use insight::{failure_insights, fallback_insights, Insight, InsightKind};
pub use stats::{
    best_worst_expense, category_breakdown, daily_totals, income_stats, recent, spending_record,
    CategoryShare, DailyTotals, ExpenseExtremes, IncomeStats, SpendingRecord, RECENT_LIMIT,
};
