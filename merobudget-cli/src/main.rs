use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Args, Parser, Subcommand, ValueEnum};
use merobudget_core::{
    best_worst_expense, category_breakdown, income_stats, recent, spending_record,
    time::local_date, validate_budget, BudgetLevel, BudgetStatus, CurrencyFormat,
    FinancialSummary, Insight, Transaction, TransactionKind, RECENT_LIMIT,
};
use merobudget_insights::Advisor;
use merobudget_records::{CsvRecordStore, RecordStore};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod auth;
mod config;
mod state;

use config::Config;

#[derive(Parser, Debug)]
#[command(name = "merobudget", version, about = "Personal budget tracker with AI insights")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

/// Where records come from and whose they are
#[derive(Args, Debug)]
struct Source {
    /// Records CSV (columns: id,user_id,amount,category,type,description,date)
    #[arg(long, default_value = "records.csv")]
    csv: PathBuf,

    /// Owner of the records to load
    #[arg(long, default_value = "me")]
    user: String,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Income, expenses and balance over all records
    Summary {
        #[command(flatten)]
        source: Source,
    },

    /// Income stats, expense extremes, daily average and category breakdown
    Stats {
        #[command(flatten)]
        source: Source,
    },

    /// Most recent records, newest first
    Recent {
        #[command(flatten)]
        source: Source,

        #[arg(long, default_value_t = RECENT_LIMIT)]
        limit: usize,
    },

    /// Monthly budget commands
    Budget {
        #[command(subcommand)]
        command: BudgetCommand,
    },

    /// Ask the model for three insights about your records
    Insights {
        #[command(flatten)]
        source: Source,

        /// Print the insights as JSON
        #[arg(long)]
        json: bool,
    },

    /// Suggest a category label for a transaction description
    Classify {
        description: String,

        /// Restrict the suggestion to this transaction type's categories
        #[arg(long, value_enum)]
        kind: Option<KindArg>,
    },

    /// Ask a free-form question about your finances
    Ask {
        question: String,

        #[command(flatten)]
        source: Source,
    },

    /// Config file commands
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },

    /// Store credentials
    Auth {
        #[command(subcommand)]
        command: AuthCommand,
    },
}

#[derive(Subcommand, Debug)]
enum BudgetCommand {
    /// Set the monthly budget
    Set { amount: f64 },

    /// This month's spending against the budget
    Show {
        #[command(flatten)]
        source: Source,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write a default ~/.merobudget/config.toml
    Init,
    /// Print the effective configuration
    Show,
}

#[derive(Subcommand, Debug)]
enum AuthCommand {
    /// Paste an API key and store it in ~/.merobudget/auth.json
    PasteApiKey,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum KindArg {
    Income,
    Expense,
}

impl From<KindArg> for TransactionKind {
    fn from(k: KindArg) -> Self {
        match k {
            KindArg::Income => TransactionKind::Income,
            KindArg::Expense => TransactionKind::Expense,
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,merobudget=info,merobudget_insights=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let cfg = config::load_config()?;

    match cli.command {
        Command::Summary { source } => {
            let txns = load_records(&source)?;
            print_summary(&FinancialSummary::from_transactions(&txns), &cfg.currency);
        }

        Command::Stats { source } => {
            let txns = load_records(&source)?;
            print_stats(&txns, &cfg.currency);
        }

        Command::Recent { source, limit } => {
            let txns = load_records(&source)?;
            let tz = cfg.locale.tz()?;
            for t in recent(&txns, limit) {
                let sign = if t.is_expense() { "-" } else { "+" };
                println!(
                    "{}  {}{:<14} {:<16} {}",
                    local_date(t.date, tz),
                    sign,
                    cfg.currency.format(t.amount),
                    t.category,
                    t.description
                );
            }
        }

        Command::Budget { command } => match command {
            BudgetCommand::Set { amount } => {
                let amount = validate_budget(amount)?;
                state::write_budget(amount)?;
                println!("Monthly budget set to {}", cfg.currency.format(amount));
            }
            BudgetCommand::Show { source } => {
                let txns = load_records(&source)?;
                let budget = state::read_budget()?.map(|b| b.monthly_budget).unwrap_or(0.0);
                let tz = cfg.locale.tz()?;
                let today = local_date(Utc::now(), tz);
                print_budget(&BudgetStatus::compute(&txns, budget, today, tz), &cfg.currency);
            }
        },

        Command::Insights { source, json } => {
            let txns = load_records(&source)?;
            let insights = build_advisor(&cfg)?.generate_insights(&txns).await;
            if json {
                println!("{}", serde_json::to_string_pretty(&insights)?);
            } else {
                print_insights(&insights);
            }
        }

        Command::Classify { description, kind } => {
            let advisor = build_advisor(&cfg)?;
            let label = match kind {
                Some(k) => advisor.classify_for(&description, k.into()).await,
                None => advisor.classify(&description).await,
            };
            println!("{label}");
        }

        Command::Ask { question, source } => {
            let txns = load_records(&source)?;
            let reply = build_advisor(&cfg)?.answer(&question, &txns).await;
            println!("{reply}");
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
            ConfigCommand::Show => {
                println!("# {}", config::config_path()?.display());
                print!("{}", toml::to_string_pretty(&cfg)?);
            }
        },

        Command::Auth { command } => match command {
            AuthCommand::PasteApiKey => auth::paste_api_key()?,
        },
    }

    Ok(())
}

fn load_records(source: &Source) -> Result<Vec<Transaction>> {
    let store = CsvRecordStore::open(&source.csv)
        .context("loading records (pass --csv <path>)")?;
    let txns = store
        .records(&source.user)
        .with_context(|| format!("records for user {:?}", source.user))?;
    tracing::debug!(count = txns.len(), user = %source.user, "loaded records");
    Ok(txns)
}

fn build_advisor(cfg: &Config) -> Result<Advisor> {
    let key = auth::resolve_api_key()?;
    let advisor = Advisor::from_settings(&cfg.ai, key.as_deref())?
        .with_currency(cfg.currency.clone())
        .with_locale(cfg.locale.prompt_locale());
    Ok(advisor)
}

fn print_summary(s: &FinancialSummary, fmt: &CurrencyFormat) {
    println!("Income:   {}", fmt.format(s.total_income()));
    println!("Expenses: {}", fmt.format(s.total_expenses()));
    println!("Balance:  {}", fmt.format(s.net_balance()));
}

fn print_stats(txns: &[Transaction], fmt: &CurrencyFormat) {
    let income = income_stats(txns);
    let extremes = best_worst_expense(txns);
    let spending = spending_record(txns);

    println!(
        "Income: {} over {} records (avg {})",
        fmt.format(income.total),
        income.count,
        fmt.format(income.average)
    );
    println!(
        "Expenses: highest {}, lowest {}",
        fmt.format(extremes.highest),
        fmt.format(extremes.lowest)
    );
    println!(
        "Daily average: {} over {} day(s)",
        fmt.format(spending.daily_average()),
        spending.days_with_records
    );

    let shares = category_breakdown(txns);
    if !shares.is_empty() {
        println!("\nBy category:");
        for c in &shares {
            println!("  {:<16} {:>14} {:>5.1}%", c.name, fmt.format(c.value), c.percentage);
        }
    }
}

fn print_budget(status: &BudgetStatus, fmt: &CurrencyFormat) {
    if status.monthly_budget <= 0.0 {
        println!("No monthly budget set (merobudget budget set <amount>)");
        println!("Spent this month: {}", fmt.format(status.month_expenses));
        return;
    }

    const WIDTH: usize = 30;
    let filled = (status.bar_percentage() / 100.0 * WIDTH as f64).round() as usize;
    println!(
        "[{}{}] {:.1}%",
        "#".repeat(filled),
        "-".repeat(WIDTH - filled),
        status.percentage
    );
    println!(
        "Spent {} of {}",
        fmt.format(status.month_expenses),
        fmt.format(status.monthly_budget)
    );

    if status.over_budget {
        println!("Over budget by {}", fmt.format(-status.remaining));
    } else {
        println!("Remaining: {}", fmt.format(status.remaining));
    }

    let note = match status.level {
        BudgetLevel::OnTrack => "On track",
        BudgetLevel::Caution => "Keep an eye on spending",
        BudgetLevel::Warning => "Close to the limit",
        BudgetLevel::Over => "Budget exceeded",
    };
    println!("{note}");
}

fn print_insights(insights: &[Insight]) {
    for i in insights {
        println!(
            "[{}] {} ({:.0}%)",
            i.kind.as_str(),
            i.title,
            i.confidence * 100.0
        );
        println!("    {}", i.message);
        if let Some(action) = &i.action {
            println!("    -> {action}");
        }
    }
}
