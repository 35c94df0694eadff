//! Time utilities: which calendar month a timestamp falls in, per timezone.

use anyhow::Result;
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use chrono_tz::Tz;

pub const DEFAULT_TIMEZONE: &str = "Asia/Kathmandu";

pub fn parse_timezone(tz: &str) -> Result<Tz> {
    tz.parse()
        .map_err(|_| anyhow::anyhow!("invalid timezone: {tz}"))
}

/// Local calendar date of a UTC instant in `tz`.
pub fn local_date(dt: DateTime<Utc>, tz: Tz) -> NaiveDate {
    dt.with_timezone(&tz).date_naive()
}

/// True when `dt` falls in the same local year and month as `today`.
pub fn same_month(dt: DateTime<Utc>, today: NaiveDate, tz: Tz) -> bool {
    let d = local_date(dt, tz);
    d.year() == today.year() && d.month() == today.month()
}
