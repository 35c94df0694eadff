use anyhow::{Context, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// `$MEROBUDGET_HOME`, else `~/.merobudget`.
pub fn merobudget_home() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("MEROBUDGET_HOME") {
        if !dir.trim().is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".merobudget"))
}

pub fn ensure_merobudget_home() -> Result<PathBuf> {
    let dir = merobudget_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BudgetState {
    pub monthly_budget: f64,
    pub updated_at_utc: String,
}

pub fn budget_path() -> Result<PathBuf> {
    Ok(ensure_merobudget_home()?.join("budget.json"))
}

/// `None` until a budget has been set.
pub fn read_budget() -> Result<Option<BudgetState>> {
    let p = budget_path()?;
    if !p.exists() {
        return Ok(None);
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    let state = serde_json::from_str(&s).with_context(|| format!("parse {}", p.display()))?;
    Ok(Some(state))
}

pub fn write_budget(monthly_budget: f64) -> Result<BudgetState> {
    let state = BudgetState {
        monthly_budget,
        updated_at_utc: Utc::now().to_rfc3339(),
    };
    let p = budget_path()?;
    let json = serde_json::to_string_pretty(&state)?;
    fs::write(&p, json).with_context(|| format!("write {}", p.display()))?;
    Ok(state)
}
