//! CSV-backed record store.
//!
//! Expected header:
//! id,amount,category,type,description,date,user_id
//!
//! `date` is RFC 3339 (`2026-05-03T10:15:00Z`) or a bare `YYYY-MM-DD`,
//! which is read as midnight UTC.

use chrono::{DateTime, NaiveDate, Utc};
use merobudget_core::{Transaction, TransactionKind};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::store::{MemoryStore, RecordStore};
use crate::{RecordError, StoredRecord};

#[derive(Debug, Deserialize)]
struct CsvRow {
    id: String,
    amount: String,
    #[serde(default)]
    category: String,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    description: String,
    date: String,
    user_id: String,
}

/// Reads the whole file once; queries then run against memory.
#[derive(Debug, Clone)]
pub struct CsvRecordStore {
    path: PathBuf,
    inner: MemoryStore,
}

impl CsvRecordStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, RecordError> {
        let path = path.as_ref().to_path_buf();
        let file = std::fs::File::open(&path).map_err(|source| RecordError::Open {
            path: path.clone(),
            source,
        })?;
        let records = parse_records(file)?;
        tracing::debug!(path = %path.display(), count = records.len(), "loaded records");
        Ok(Self {
            path,
            inner: MemoryStore::new(records),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl RecordStore for CsvRecordStore {
    fn records(&self, user_id: &str) -> Result<Vec<Transaction>, RecordError> {
        self.inner.records(user_id)
    }

    fn records_of_kind(
        &self,
        user_id: &str,
        kind: TransactionKind,
    ) -> Result<Vec<Transaction>, RecordError> {
        self.inner.records_of_kind(user_id, kind)
    }
}

/// Parse CSV rows into stored records, skipping rows that don't validate.
pub fn parse_records(reader: impl std::io::Read) -> Result<Vec<StoredRecord>, RecordError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let mut out = Vec::new();
    for (idx, result) in rdr.deserialize::<CsvRow>().enumerate() {
        // Header is line 1.
        let line = idx + 2;
        let row = match result {
            Ok(r) => r,
            Err(e) => {
                if e.is_io_error() {
                    return Err(RecordError::Csv(e));
                }
                tracing::warn!(line, error = %e, "skipping malformed row");
                continue;
            }
        };
        match row_to_record(row) {
            Ok(rec) => out.push(rec),
            Err(reason) => tracing::warn!(line, %reason, "skipping invalid record"),
        }
    }
    Ok(out)
}

fn row_to_record(row: CsvRow) -> Result<StoredRecord, String> {
    let amount: f64 = row
        .amount
        .parse()
        .map_err(|_| format!("amount is not a number: {:?}", row.amount))?;
    if !amount.is_finite() || amount < 0.0 {
        return Err(format!("amount must be non-negative, got {amount}"));
    }
    let kind = TransactionKind::parse(&row.kind)
        .ok_or_else(|| format!("unknown type: {:?}", row.kind))?;
    let date = parse_date(&row.date).ok_or_else(|| format!("unparseable date: {:?}", row.date))?;
    if row.user_id.is_empty() {
        return Err("missing user_id".to_string());
    }

    Ok(StoredRecord {
        user_id: row.user_id,
        transaction: Transaction::new(row.id, amount, row.category, kind, row.description, date),
    })
}

pub fn parse_date(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|ndt| ndt.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const SAMPLE: &str = "\
id,amount,category,type,description,date,user_id
r1,55000,Salary,income,March salary,2026-03-01T04:00:00Z,u1
r2,1200,Food,expense,Momo and tea,2026-03-02,u1
r3,abc,Food,expense,Bad amount,2026-03-02,u1
r4,-5,Food,expense,Negative,2026-03-02,u1
r5,100,Food,transfer,Unknown type,2026-03-02,u1
r6,100,Food,expense,Bad date,03/02/2026,u1
r7,300,Transportation,expense,Micro bus,2026-03-03,u2
";

    #[test]
    fn test_parse_skips_invalid_rows() {
        let recs = parse_records(SAMPLE.as_bytes()).unwrap();
        let ids: Vec<_> = recs.iter().map(|r| r.transaction.id.as_str()).collect();
        assert_eq!(ids, ["r1", "r2", "r7"]);
    }

    #[test]
    fn test_parse_fields() {
        let recs = parse_records(SAMPLE.as_bytes()).unwrap();
        let r2 = &recs[1];
        assert_eq!(r2.user_id, "u1");
        assert_eq!(r2.transaction.amount, 1200.0);
        assert_eq!(r2.transaction.kind, TransactionKind::Expense);
        assert_eq!(r2.transaction.description, "Momo and tea");
        assert_eq!(r2.transaction.date, Utc.with_ymd_and_hms(2026, 3, 2, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_date_formats() {
        assert_eq!(
            parse_date("2026-03-01T10:15:00+05:45"),
            Some(Utc.with_ymd_and_hms(2026, 3, 1, 4, 30, 0).unwrap())
        );
        assert!(parse_date("2026-13-01").is_none());
        assert!(parse_date("").is_none());
    }
}
