//! User store
//!
//! A mapping from username to user record, read and written as a whole.
//! `JsonFileStore` is the production backend; `MemoryStore` backs tests.

pub mod file;
pub mod memory;
pub mod record;

pub use file::JsonFileStore;
pub use memory::MemoryStore;
pub use record::UserRecord;

use crate::error::StoreError;

/// Whole-document user store.
///
/// Every call loads the full document; no state is cached between calls.
pub trait UserStore: Send + Sync {
    /// Every record, in stored order.
    fn all(&self) -> Result<Vec<UserRecord>, StoreError>;

    /// Appends `record` and persists the whole document.
    ///
    /// Implementations re-check uniqueness while holding their write lock
    /// and fail with [`StoreError::DuplicateUsername`] if the name is taken.
    fn append(&self, record: UserRecord) -> Result<(), StoreError>;

    /// True iff any record has exactly this username.
    fn exists(&self, username: &str) -> Result<bool, StoreError> {
        Ok(self.all()?.iter().any(|user| user.username == username))
    }

    /// First record with exactly this username.
    fn find(&self, username: &str) -> Result<Option<UserRecord>, StoreError> {
        Ok(self
            .all()?
            .into_iter()
            .find(|user| user.username == username))
    }
}
