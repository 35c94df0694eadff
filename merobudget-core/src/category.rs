//! Closed set of category labels the classifier may return.

use serde::{Deserialize, Serialize};

use crate::finance::TransactionKind;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum CategoryLabel {
    // Expense side
    Food,
    Transportation,
    Entertainment,
    Shopping,
    Bills,
    Healthcare,
    Education,
    // Income side
    Salary,
    Freelance,
    Business,
    Investment,
    Gift,
    Remittance,
    // Shared
    Other,
}

const EXPENSE_LABELS: [CategoryLabel; 8] = [
    CategoryLabel::Food,
    CategoryLabel::Transportation,
    CategoryLabel::Entertainment,
    CategoryLabel::Shopping,
    CategoryLabel::Bills,
    CategoryLabel::Healthcare,
    CategoryLabel::Education,
    CategoryLabel::Other,
];

const INCOME_LABELS: [CategoryLabel; 7] = [
    CategoryLabel::Salary,
    CategoryLabel::Freelance,
    CategoryLabel::Business,
    CategoryLabel::Investment,
    CategoryLabel::Gift,
    CategoryLabel::Remittance,
    CategoryLabel::Other,
];

impl CategoryLabel {
    pub const ALL: [CategoryLabel; 14] = [
        CategoryLabel::Food,
        CategoryLabel::Transportation,
        CategoryLabel::Entertainment,
        CategoryLabel::Shopping,
        CategoryLabel::Bills,
        CategoryLabel::Healthcare,
        CategoryLabel::Education,
        CategoryLabel::Salary,
        CategoryLabel::Freelance,
        CategoryLabel::Business,
        CategoryLabel::Investment,
        CategoryLabel::Gift,
        CategoryLabel::Remittance,
        CategoryLabel::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryLabel::Food => "Food",
            CategoryLabel::Transportation => "Transportation",
            CategoryLabel::Entertainment => "Entertainment",
            CategoryLabel::Shopping => "Shopping",
            CategoryLabel::Bills => "Bills",
            CategoryLabel::Healthcare => "Healthcare",
            CategoryLabel::Education => "Education",
            CategoryLabel::Salary => "Salary",
            CategoryLabel::Freelance => "Freelance",
            CategoryLabel::Business => "Business",
            CategoryLabel::Investment => "Investment",
            CategoryLabel::Gift => "Gift",
            CategoryLabel::Remittance => "Remittance",
            CategoryLabel::Other => "Other",
        }
    }

    /// Labels valid for one side of the ledger. Both include `Other`.
    pub fn vocabulary(kind: TransactionKind) -> &'static [CategoryLabel] {
        match kind {
            TransactionKind::Expense => &EXPENSE_LABELS,
            TransactionKind::Income => &INCOME_LABELS,
        }
    }

    /// Case-insensitive exact match against the full label set.
    pub fn from_label(s: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
    }

    pub fn belongs_to(&self, kind: TransactionKind) -> bool {
        Self::vocabulary(kind).contains(self)
    }
}

impl std::fmt::Display for CategoryLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
