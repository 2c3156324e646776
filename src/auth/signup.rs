//! Signup
//!
//! Each check either produces the attempt's outcome and returns, or lets the
//! attempt continue to the next check. Nothing runs after an outcome is
//! decided.

use log::info;
use serde::Deserialize;

use super::credentials::PasswordHasher;
use super::results::SignupOutcome;
use crate::error::StoreError;
use crate::storage::{UserRecord, UserStore};

/// Submitted signup form
#[derive(Debug, Clone, Deserialize)]
pub struct SignupRequest {
    pub username: String,
    pub password: String,
    pub confirm_password: String,
}

/// Runs one signup attempt.
///
/// Only store I/O failures are returned as errors; every user-facing
/// rejection is an `Ok` outcome.
pub fn signup(
    store: &dyn UserStore,
    hasher: &PasswordHasher,
    request: &SignupRequest,
) -> Result<SignupOutcome, StoreError> {
    let username = request.username.as_str();

    if request.password != request.confirm_password {
        info!("Signup rejected for {:?}: passwords do not match", username);
        return Ok(SignupOutcome::PasswordMismatch {
            username: username.to_string(),
        });
    }

    if store.exists(username)? {
        info!("Signup rejected for {:?}: user exists", username);
        return Ok(SignupOutcome::UserExists);
    }

    let record = UserRecord::new(username, hasher.digest(&request.password));
    match store.append(record) {
        Ok(()) => {
            info!("Signed up new user {:?}", username);
            Ok(SignupOutcome::Created)
        }
        // Lost a race with a concurrent signup for the same name.
        Err(StoreError::DuplicateUsername(_)) => {
            info!("Signup rejected for {:?}: user exists", username);
            Ok(SignupOutcome::UserExists)
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::credentials::verify_password;
    use crate::storage::MemoryStore;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn request(username: &str, password: &str, confirm: &str) -> SignupRequest {
        SignupRequest {
            username: username.to_string(),
            password: password.to_string(),
            confirm_password: confirm.to_string(),
        }
    }

    fn alice_store() -> MemoryStore {
        MemoryStore::with_records(vec![UserRecord::new("alice", "secret")])
    }

    /// Counts store calls so tests can prove later steps never ran.
    struct CountingStore {
        inner: MemoryStore,
        reads: AtomicUsize,
        appends: AtomicUsize,
    }

    impl CountingStore {
        fn new(inner: MemoryStore) -> Self {
            Self {
                inner,
                reads: AtomicUsize::new(0),
                appends: AtomicUsize::new(0),
            }
        }
    }

    impl UserStore for CountingStore {
        fn all(&self) -> Result<Vec<UserRecord>, StoreError> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            self.inner.all()
        }

        fn append(&self, record: UserRecord) -> Result<(), StoreError> {
            self.appends.fetch_add(1, Ordering::SeqCst);
            self.inner.append(record)
        }
    }

    /// Store whose existence check races ahead of another writer.
    struct RacingStore(MemoryStore);

    impl UserStore for RacingStore {
        fn all(&self) -> Result<Vec<UserRecord>, StoreError> {
            Ok(Vec::new())
        }

        fn append(&self, record: UserRecord) -> Result<(), StoreError> {
            self.0.append(record)
        }
    }

    #[test]
    fn test_password_mismatch_short_circuits() {
        let store = CountingStore::new(alice_store());

        let outcome = signup(&store, &PasswordHasher::new(2), &request("carol", "a", "b")).unwrap();

        assert_eq!(
            outcome,
            SignupOutcome::PasswordMismatch {
                username: "carol".to_string()
            }
        );
        assert_eq!(outcome.message(), Some("Passwords do not match!"));
        assert_eq!(store.reads.load(Ordering::SeqCst), 0);
        assert_eq!(store.appends.load(Ordering::SeqCst), 0);
        assert_eq!(store.inner.len(), 1);
    }

    #[test]
    fn test_existing_user_short_circuits() {
        let store = CountingStore::new(alice_store());

        let outcome = signup(&store, &PasswordHasher::new(2), &request("alice", "pw", "pw")).unwrap();

        assert_eq!(outcome, SignupOutcome::UserExists);
        assert_eq!(outcome.message(), Some("User already exists!"));
        assert_eq!(store.appends.load(Ordering::SeqCst), 0);
        assert_eq!(store.inner.len(), 1);
    }

    #[test]
    fn test_new_user_is_stored_hashed() {
        let store = alice_store();

        let outcome = signup(&store, &PasswordHasher::new(2), &request("carol", "pw", "pw")).unwrap();

        assert_eq!(outcome, SignupOutcome::Created);
        assert_eq!(outcome.message(), None);
        assert_eq!(store.len(), 2);
        let carol = store.find("carol").unwrap().unwrap();
        assert_ne!(carol.password, "pw");
        assert!(verify_password("pw", &carol.password));
    }

    #[test]
    fn test_usernames_are_not_restricted() {
        let store = MemoryStore::new();
        let long_name = "a".repeat(65);

        let outcome = signup(&store, &PasswordHasher::new(2), &request(&long_name, "pw", "pw")).unwrap();

        assert_eq!(outcome, SignupOutcome::Created);
        assert!(store.find(&long_name).unwrap().is_some());
    }

    #[test]
    fn test_blank_username_still_reports_mismatch() {
        let store = CountingStore::new(MemoryStore::new());

        let outcome = signup(&store, &PasswordHasher::new(2), &request("", "a", "b")).unwrap();

        assert_eq!(outcome.message(), Some("Passwords do not match!"));
        assert_eq!(store.reads.load(Ordering::SeqCst), 0);
        assert!(store.inner.is_empty());
    }

    #[test]
    fn test_sequential_signups_stay_unique() {
        let store = MemoryStore::new();
        let hasher = PasswordHasher::new(2);

        assert_eq!(
            signup(&store, &hasher, &request("erin", "pw", "pw")).unwrap(),
            SignupOutcome::Created
        );
        assert_eq!(
            signup(&store, &hasher, &request("erin", "other", "other")).unwrap(),
            SignupOutcome::UserExists
        );
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_lost_race_reports_user_exists() {
        let store = RacingStore(alice_store());

        let outcome = signup(&store, &PasswordHasher::new(2), &request("alice", "pw", "pw")).unwrap();

        assert_eq!(outcome, SignupOutcome::UserExists);
        assert_eq!(store.0.len(), 1);
    }
}
