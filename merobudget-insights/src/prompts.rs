//! Prompt text for the three AI calls.

use merobudget_core::{CategoryLabel, CurrencyFormat, FinancialSummary, Transaction, TransactionKind};
use serde::{Deserialize, Serialize};

/// How many transactions the insight prompt includes
pub const INSIGHT_SAMPLE: usize = 10;

/// Regional framing added to prompts
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Locale {
    pub region: String,
    /// Facts about local cost of living handed to the model
    pub notes: Vec<String>,
}

impl Default for Locale {
    fn default() -> Self {
        Self {
            region: "Nepal".to_string(),
            notes: vec![
                "Average monthly salary ranges from रू 15,000 to रू 100,000+".to_string(),
                "Basic living expenses: Food रू 8,000-15,000/month, Rent रू 5,000-25,000/month".to_string(),
                "Transportation: Bus fare रू 15-50, Taxi रू 100-500 per trip".to_string(),
                "Remittance from family abroad is a common income source".to_string(),
            ],
        }
    }
}

#[derive(Serialize)]
struct PromptRecord<'a> {
    amount: f64,
    #[serde(rename = "amountFormatted")]
    amount_formatted: String,
    category: &'a str,
    #[serde(rename = "type")]
    kind: TransactionKind,
    description: &'a str,
    date: String,
}

fn records_json(txns: &[Transaction], fmt: &CurrencyFormat) -> String {
    let rows: Vec<PromptRecord<'_>> = txns
        .iter()
        .map(|t| PromptRecord {
            amount: t.amount,
            amount_formatted: fmt.format(t.amount),
            category: &t.category,
            kind: t.kind,
            description: &t.description,
            date: t.date.to_rfc3339(),
        })
        .collect();
    serde_json::to_string_pretty(&rows).unwrap_or_else(|_| "[]".to_string())
}

fn context_block(locale: &Locale, fmt: &CurrencyFormat) -> String {
    let mut s = format!(
        "IMPORTANT CONTEXT:\n\
- All financial data is in the local currency ({sym})\n\
- User is located in {region}\n\
- Provide all amounts in the format {example}\n\
- Consider {region}'s financial context, cost of living, and cultural spending patterns\n",
        sym = fmt.symbol,
        region = locale.region,
        example = fmt.format(5000.0),
    );
    for note in &locale.notes {
        s.push_str("- ");
        s.push_str(note);
        s.push('\n');
    }
    s
}

pub fn insight_system(locale: &Locale, fmt: &CurrencyFormat) -> String {
    format!(
        "You are a {} financial advisor. Respond only with a valid JSON array of budget insights using {} amounts. Keep advice practical for the local economy.",
        locale.region, fmt.symbol
    )
}

pub fn insight_prompt(
    summary: &FinancialSummary,
    txns: &[Transaction],
    locale: &Locale,
    fmt: &CurrencyFormat,
) -> String {
    let sample = &txns[..txns.len().min(INSIGHT_SAMPLE)];
    format!(
        r#"Analyze this {region} financial data and provide exactly 3 insights as a JSON array:

TOTALS: Income {income}, Expenses {expenses}, Balance {balance}

DATA: {data}

Return JSON array format:
[
  {{
    "type": "warning",
    "title": "Short title",
    "message": "Message with {example} style amounts and local context",
    "action": "What to do next",
    "confidence": 0.85
  }}
]

Use types: warning, info, success, tip. Always include amounts like {example}. Focus on the local cost of living."#,
        region = locale.region,
        income = fmt.format(summary.total_income()),
        expenses = fmt.format(summary.total_expenses()),
        balance = fmt.format(summary.net_balance()),
        data = records_json(sample, fmt),
        example = fmt.format(5000.0),
    )
}

pub fn classify_system(locale: &Locale, kind: Option<TransactionKind>) -> String {
    let list = |k: TransactionKind| {
        CategoryLabel::vocabulary(k)
            .iter()
            .map(CategoryLabel::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    };

    let vocab = match kind {
        Some(TransactionKind::Expense) => {
            format!("This is an EXPENSE. Categorize into: {}", list(TransactionKind::Expense))
        }
        Some(TransactionKind::Income) => {
            format!("This is INCOME. Categorize into: {}", list(TransactionKind::Income))
        }
        None => format!(
            "For EXPENSES, categorize into: {}\nFor INCOME, categorize into: {}",
            list(TransactionKind::Expense),
            list(TransactionKind::Income)
        ),
    };

    format!(
        "You are a financial categorization AI for {region} transactions.\n\n\
{vocab}\n\n\
Hints:\n\
- Food: meals, restaurants, groceries from local shops\n\
- Transportation: local bus, taxi, micro, bike fuel\n\
- Bills: electricity, water, internet, mobile recharge\n\
- Entertainment: cinema, festivals, games\n\
- Healthcare: hospital, pharmacy, checkups\n\
- Education: school fees, books, courses\n\
- Remittance: money sent from family abroad\n\n\
Respond with only the category name.",
        region = locale.region,
    )
}

pub fn classify_prompt(description: &str) -> String {
    format!("Categorize this financial record: \"{}\"", description.trim())
}

pub fn answer_system(locale: &Locale, fmt: &CurrencyFormat) -> String {
    format!(
        "You are a helpful financial advisor AI specializing in {region}. You understand the local economy, cost of living, and cultural context. Always give specific, actionable answers with amounts formatted like {example}.",
        region = locale.region,
        example = fmt.format(5000.0),
    )
}

pub fn answer_prompt(
    question: &str,
    summary: &FinancialSummary,
    txns: &[Transaction],
    locale: &Locale,
    fmt: &CurrencyFormat,
) -> String {
    format!(
        r#"{context}
Based on the following financial data, provide a detailed answer to: "{question}"

FINANCIAL SUMMARY:
- Total Income: {income}
- Total Expenses: {expenses}
- Net Balance: {balance}

DETAILED DATA:
{data}

Provide an answer that:
1. Addresses the question directly with local context
2. Uses specific amounts from the data
3. Offers actionable advice
4. Keeps the response concise (2-4 sentences)
5. Always formats amounts like {example}

Return only the answer text, no additional formatting."#,
        context = context_block(locale, fmt),
        question = question.trim(),
        income = fmt.format(summary.total_income()),
        expenses = fmt.format(summary.total_expenses()),
        balance = fmt.format(summary.net_balance()),
        data = records_json(txns, fmt),
        example = fmt.format(5000.0),
    )
}
