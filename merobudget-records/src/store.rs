use merobudget_core::{Transaction, TransactionKind};

use crate::{RecordError, StoredRecord};

/// Read-only access to a user's transactions.
///
/// Queries are equality filters only; ordering and aggregation happen in
/// `merobudget_core::stats`.
pub trait RecordStore {
    fn records(&self, user_id: &str) -> Result<Vec<Transaction>, RecordError>;

    fn records_of_kind(
        &self,
        user_id: &str,
        kind: TransactionKind,
    ) -> Result<Vec<Transaction>, RecordError> {
        Ok(self
            .records(user_id)?
            .into_iter()
            .filter(|t| t.kind == kind)
            .collect())
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    rows: Vec<StoredRecord>,
}

impl MemoryStore {
    pub fn new(rows: Vec<StoredRecord>) -> Self {
        Self { rows }
    }

    pub fn insert(&mut self, user_id: impl Into<String>, transaction: Transaction) {
        self.rows.push(StoredRecord {
            user_id: user_id.into(),
            transaction,
        });
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl RecordStore for MemoryStore {
    fn records(&self, user_id: &str) -> Result<Vec<Transaction>, RecordError> {
        if user_id.is_empty() {
            return Err(RecordError::UserNotFound);
        }
        Ok(self
            .rows
            .iter()
            .filter(|r| r.user_id == user_id)
            .map(|r| r.transaction.clone())
            .collect())
    }
}
