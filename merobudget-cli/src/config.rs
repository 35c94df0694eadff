use anyhow::{Context, Result};
use chrono_tz::Tz;
use merobudget_core::time::{parse_timezone, DEFAULT_TIMEZONE};
use merobudget_core::CurrencyFormat;
use merobudget_insights::{AiSettings, Locale};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::state::ensure_merobudget_home;

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub ai: AiSettings,
    pub currency: CurrencyFormat,
    pub locale: LocaleSection,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LocaleSection {
    /// IANA zone deciding which calendar month "this month" is
    pub timezone: String,
    pub region: String,
    pub notes: Vec<String>,
}

impl Default for LocaleSection {
    fn default() -> Self {
        let l = Locale::default();
        Self {
            timezone: DEFAULT_TIMEZONE.to_string(),
            region: l.region,
            notes: l.notes,
        }
    }
}

impl LocaleSection {
    pub fn tz(&self) -> Result<Tz> {
        parse_timezone(&self.timezone)
    }

    pub fn prompt_locale(&self) -> Locale {
        Locale {
            region: self.region.clone(),
            notes: self.notes.clone(),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(ensure_merobudget_home()?.join("config.toml"))
}

pub fn load_config() -> Result<Config> {
    let p = config_path()?;
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    parse_config(&s).with_context(|| format!("parse {}", p.display()))
}

pub fn parse_config(s: &str) -> Result<Config> {
    let cfg: Config = toml::from_str(s)?;
    cfg.locale.tz()?;
    Ok(cfg)
}

pub fn save_config(cfg: &Config) -> Result<()> {
    let p = config_path()?;
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(&p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

pub fn init_config() -> Result<()> {
    let p = config_path()?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    save_config(&Config::default())?;
    println!("Wrote {}", p.display());
    Ok(())
}
