//! In-memory user store

use parking_lot::Mutex;

use super::{UserRecord, UserStore};
use crate::error::StoreError;

/// Vector-backed store with the same semantics as the file store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<Vec<UserRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<UserRecord>) -> Self {
        Self {
            records: Mutex::new(records),
        }
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }
}

impl UserStore for MemoryStore {
    fn all(&self) -> Result<Vec<UserRecord>, StoreError> {
        Ok(self.records.lock().clone())
    }

    fn append(&self, record: UserRecord) -> Result<(), StoreError> {
        let mut records = self.records.lock();
        if records.iter().any(|user| user.username == record.username) {
            return Err(StoreError::DuplicateUsername(record.username));
        }
        records.push(record);
        Ok(())
    }
}
