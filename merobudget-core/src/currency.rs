//! Currency formatting for prompts and CLI output.
//!
//! Defaults to Nepali Rupees (`रू 12,500`) but every part of the format is
//! configurable so the same code serves other locales.

use serde::{Deserialize, Serialize};

/// Digit grouping style for the integer part
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Grouping {
    /// 1,234,567
    #[default]
    Western,
    /// 12,34,567 (lakh / crore)
    Indian,
    /// 1234567
    None,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CurrencyFormat {
    pub symbol: String,
    /// Placed between the symbol and the number
    pub separator: String,
    pub grouping: Grouping,
    pub min_fraction_digits: usize,
    pub max_fraction_digits: usize,
}

impl Default for CurrencyFormat {
    fn default() -> Self {
        Self::npr()
    }
}

impl CurrencyFormat {
    pub fn npr() -> Self {
        Self {
            symbol: "रू".to_string(),
            separator: " ".to_string(),
            grouping: Grouping::Western,
            min_fraction_digits: 0,
            max_fraction_digits: 2,
        }
    }

    /// Format with the currency symbol, e.g. `रू 1,250.5`.
    pub fn format(&self, amount: f64) -> String {
        format!("{}{}{}", self.symbol, self.separator, self.format_number(amount))
    }

    /// Format just the number, e.g. `-1,250.5`.
    pub fn format_number(&self, amount: f64) -> String {
        if !amount.is_finite() {
            return amount.to_string();
        }
        let max = self.max_fraction_digits;
        let min = self.min_fraction_digits.min(max);

        let fixed = format!("{:.*}", max, amount.abs());
        let (int_part, frac_part) = match fixed.split_once('.') {
            Some((i, f)) => (i, f),
            None => (fixed.as_str(), ""),
        };

        let mut frac = frac_part.to_string();
        while frac.len() > min && frac.ends_with('0') {
            frac.pop();
        }

        let is_zero = int_part.chars().all(|c| c == '0') && frac.chars().all(|c| c == '0');
        let mut out = String::new();
        if amount < 0.0 && !is_zero {
            out.push('-');
        }
        out.push_str(&group_digits(int_part, self.grouping));
        if !frac.is_empty() {
            out.push('.');
            out.push_str(&frac);
        }
        out
    }
}

fn group_digits(digits: &str, grouping: Grouping) -> String {
    let bytes = digits.as_bytes();
    let n = bytes.len();
    // Positions (counted from the right) after which a comma is inserted.
    let needs_comma = |from_right: usize| -> bool {
        match grouping {
            Grouping::None => false,
            Grouping::Western => from_right % 3 == 0,
            Grouping::Indian => from_right == 3 || (from_right > 3 && (from_right - 3) % 2 == 0),
        }
    };

    let mut out = String::with_capacity(n + n / 2);
    for (i, b) in bytes.iter().enumerate() {
        let from_right = n - i;
        if i > 0 && needs_comma(from_right) {
            out.push(',');
        }
        out.push(*b as char);
    }
    out
}
