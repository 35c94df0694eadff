//! Aggregations behind the dashboard cards and charts.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashMap;
use std::collections::HashSet;

use crate::finance::Transaction;

/// Default page size for the record history list
pub const RECENT_LIMIT: usize = 20;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Default)]
pub struct IncomeStats {
    pub total: f64,
    pub average: f64,
    pub count: usize,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Default)]
pub struct ExpenseExtremes {
    pub highest: f64,
    pub lowest: f64,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct SpendingRecord {
    pub total_expenses: f64,
    /// Distinct days with a non-zero expense; never below 1
    pub days_with_records: usize,
}

impl SpendingRecord {
    pub fn daily_average(&self) -> f64 {
        self.total_expenses / self.days_with_records as f64
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CategoryShare {
    pub name: String,
    pub value: f64,
    /// Share of total expenses, 0-100
    pub percentage: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DailyTotals {
    pub date: NaiveDate,
    pub total_income: f64,
    pub total_expense: f64,
    pub categories: Vec<String>,
}

pub fn income_stats(txns: &[Transaction]) -> IncomeStats {
    let amounts: Vec<f64> = txns.iter().filter(|t| t.is_income()).map(|t| t.amount).collect();
    if amounts.is_empty() {
        return IncomeStats::default();
    }
    let total: f64 = amounts.iter().sum();
    IncomeStats {
        total,
        average: total / amounts.len() as f64,
        count: amounts.len(),
    }
}

/// Largest and smallest single expense. Income is ignored.
pub fn best_worst_expense(txns: &[Transaction]) -> ExpenseExtremes {
    let mut it = txns.iter().filter(|t| t.is_expense()).map(|t| t.amount);
    let Some(first) = it.next() else {
        return ExpenseExtremes::default();
    };
    let (highest, lowest) = it.fold((first, first), |(hi, lo), a| (hi.max(a), lo.min(a)));
    ExpenseExtremes { highest, lowest }
}

pub fn spending_record(txns: &[Transaction]) -> SpendingRecord {
    let expenses = txns.iter().filter(|t| t.is_expense());
    let total_expenses: f64 = expenses.clone().map(|t| t.amount).sum();
    let days: HashSet<NaiveDate> = expenses
        .filter(|t| t.amount > 0.0)
        .map(|t| t.date.date_naive())
        .collect();
    SpendingRecord {
        total_expenses,
        days_with_records: days.len().max(1),
    }
}

/// Expense totals per category, largest first.
pub fn category_breakdown(txns: &[Transaction]) -> Vec<CategoryShare> {
    let mut totals: HashMap<String, f64> = HashMap::new();
    let mut total = 0.0;
    for t in txns.iter().filter(|t| t.is_expense()) {
        let name = if t.category.trim().is_empty() {
            "Other".to_string()
        } else {
            t.category.clone()
        };
        *totals.entry(name).or_insert(0.0) += t.amount;
        total += t.amount;
    }

    let mut shares: Vec<CategoryShare> = totals
        .into_iter()
        .map(|(name, value)| CategoryShare {
            percentage: if total > 0.0 { value / total * 100.0 } else { 0.0 },
            name,
            value,
        })
        .collect();
    // Name as tie-breaker keeps output stable across HashMap orderings.
    shares.sort_by(|a, b| b.value.total_cmp(&a.value).then_with(|| a.name.cmp(&b.name)));
    shares
}

/// Income/expense per UTC calendar day, oldest first.
pub fn daily_totals(txns: &[Transaction]) -> Vec<DailyTotals> {
    let mut by_day: HashMap<NaiveDate, DailyTotals> = HashMap::new();
    let mut ordered: Vec<&Transaction> = txns.iter().collect();
    ordered.sort_by_key(|t| t.date);

    for t in ordered {
        let day = t.date.date_naive();
        let entry = by_day.entry(day).or_insert_with(|| DailyTotals {
            date: day,
            total_income: 0.0,
            total_expense: 0.0,
            categories: Vec::new(),
        });
        if t.is_expense() {
            entry.total_expense += t.amount;
        } else {
            entry.total_income += t.amount;
        }
        if !entry.categories.contains(&t.category) {
            entry.categories.push(t.category.clone());
        }
    }

    let mut out: Vec<DailyTotals> = by_day.into_values().collect();
    out.sort_by_key(|d| d.date);
    out
}

/// Newest first, at most `limit` records.
pub fn recent(txns: &[Transaction], limit: usize) -> Vec<Transaction> {
    let mut sorted = txns.to_vec();
    sorted.sort_by(|a, b| b.date.cmp(&a.date));
    sorted.truncate(limit);
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::finance::TransactionKind;
    use chrono::{TimeZone, Utc};

    fn tx(id: &str, amount: f64, cat: &str, kind: TransactionKind, day: u32, hour: u32) -> Transaction {
        Transaction::new(
            id,
            amount,
            cat,
            kind,
            format!("txn {id}"),
            Utc.with_ymd_and_hms(2026, 4, day, hour, 0, 0).unwrap(),
        )
    }

    fn fixture() -> Vec<Transaction> {
        use TransactionKind::*;
        vec![
            tx("1", 60_000.0, "Salary", Income, 1, 9),
            tx("2", 15_000.0, "Bills", Expense, 1, 10),
            tx("3", 400.0, "Food", Expense, 2, 12),
            tx("4", 600.0, "Food", Expense, 2, 19),
            tx("5", 20_000.0, "Freelance", Income, 3, 8),
            tx("6", 0.0, "Transportation", Expense, 4, 8),
            tx("7", 1_000.0, "", Expense, 5, 8),
        ]
    }

    #[test]
    fn test_income_stats() {
        let s = income_stats(&fixture());
        assert_eq!(s.total, 80_000.0);
        assert_eq!(s.count, 2);
        assert_eq!(s.average, 40_000.0);
        assert_eq!(income_stats(&[]), IncomeStats::default());
    }

    #[test]
    fn test_best_worst_ignores_income() {
        let e = best_worst_expense(&fixture());
        assert_eq!(e.highest, 15_000.0);
        assert_eq!(e.lowest, 0.0);
        let only_income = vec![tx("1", 5.0, "Gift", TransactionKind::Income, 1, 1)];
        assert_eq!(best_worst_expense(&only_income), ExpenseExtremes::default());
    }

    #[test]
    fn test_spending_record_counts_unique_days() {
        let r = spending_record(&fixture());
        assert_eq!(r.total_expenses, 17_000.0);
        // Days 1, 2 and 5; day 4 only has a zero expense.
        assert_eq!(r.days_with_records, 3);
        assert!((r.daily_average() - 17_000.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_spending_record_never_zero_days() {
        let r = spending_record(&[]);
        assert_eq!(r.days_with_records, 1);
        assert_eq!(r.daily_average(), 0.0);
    }

    #[test]
    fn test_category_breakdown() {
        let shares = category_breakdown(&fixture());
        let names: Vec<_> = shares.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["Bills", "Food", "Other", "Transportation"]);
        assert_eq!(shares[1].value, 1_000.0);
        let pct: f64 = shares.iter().map(|s| s.percentage).sum();
        assert!((pct - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_daily_totals() {
        let days = daily_totals(&fixture());
        assert_eq!(days.len(), 5);
        assert_eq!(days[0].date, NaiveDate::from_ymd_opt(2026, 4, 1).unwrap());
        assert_eq!(days[0].total_income, 60_000.0);
        assert_eq!(days[0].total_expense, 15_000.0);
        assert_eq!(days[0].categories, vec!["Salary".to_string(), "Bills".to_string()]);
        assert_eq!(days[1].total_expense, 1_000.0);
        assert_eq!(days[1].categories, vec!["Food".to_string()]);
    }

    #[test]
    fn test_recent_newest_first() {
        let r = recent(&fixture(), 3);
        let ids: Vec<_> = r.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["7", "6", "5"]);
    }
}
