//! merobudget-records: record store adapter (in-memory and CSV-backed)

pub mod csv_store;
pub mod store;

use merobudget_core::Transaction;
use std::path::PathBuf;

pub use csv_store::{parse_records, CsvRecordStore};
pub use store::{MemoryStore, RecordStore};

/// A transaction as persisted, tagged with its owner
#[derive(Debug, Clone, PartialEq)]
pub struct StoredRecord {
    pub user_id: String,
    pub transaction: Transaction,
}

#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("User not found")]
    UserNotFound,

    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}
