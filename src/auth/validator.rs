//! Credential verifier
//!
//! Looks a username up in the user store and checks the submitted password
//! against the stored digest.

use log::info;

use super::credentials::{PasswordHasher, verify_password};
use super::results::{Rejection, Verdict};
use crate::error::StoreError;
use crate::storage::UserStore;

/// Verifies `username`/`password` against the store.
///
/// Store failures propagate; they are never reported as an unknown user.
pub fn verify(
    store: &dyn UserStore,
    hasher: &PasswordHasher,
    username: &str,
    password: &str,
) -> Result<Verdict, StoreError> {
    let Some(record) = store.find(username)? else {
        hasher.dummy_verify(password);
        info!("Login rejected for {:?}: unknown user", username);
        return Ok(Verdict::Rejected(Rejection::UserNotFound));
    };

    if !verify_password(password, &record.password) {
        info!("Login rejected for {:?}: incorrect password", username);
        return Ok(Verdict::Rejected(Rejection::IncorrectPassword));
    }

    Ok(Verdict::Accepted(record))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStore, UserRecord};

    fn hasher() -> PasswordHasher {
        PasswordHasher::new(4)
    }

    #[test]
    fn test_scenario_plaintext_store() {
        let store = MemoryStore::with_records(vec![UserRecord::new("alice", "secret")]);

        assert_eq!(
            verify(&store, &hasher(), "alice", "secret").unwrap(),
            Verdict::Accepted(UserRecord::new("alice", "secret"))
        );
        assert_eq!(
            verify(&store, &hasher(), "alice", "wrong").unwrap(),
            Verdict::Rejected(Rejection::IncorrectPassword)
        );
        assert_eq!(
            verify(&store, &hasher(), "bob", "x").unwrap(),
            Verdict::Rejected(Rejection::UserNotFound)
        );
    }

    #[test]
    fn test_hashed_record() {
        let digest = hasher().digest("s3cret");
        let store = MemoryStore::with_records(vec![UserRecord::new("carol", digest)]);

        assert!(matches!(
            verify(&store, &hasher(), "carol", "s3cret").unwrap(),
            Verdict::Accepted(record) if record.username == "carol"
        ));
        assert_eq!(
            verify(&store, &hasher(), "carol", "s3cre").unwrap(),
            Verdict::Rejected(Rejection::IncorrectPassword)
        );
    }

    #[test]
    fn test_username_is_case_sensitive() {
        let store = MemoryStore::with_records(vec![UserRecord::new("alice", "secret")]);
        assert_eq!(
            verify(&store, &hasher(), "Alice", "secret").unwrap(),
            Verdict::Rejected(Rejection::UserNotFound)
        );
    }

    #[test]
    fn test_first_duplicate_wins() {
        let store = MemoryStore::with_records(vec![
            UserRecord::new("dup", "one"),
            UserRecord::new("dup", "two"),
        ]);
        assert!(matches!(
            verify(&store, &hasher(), "dup", "one").unwrap(),
            Verdict::Accepted(_)
        ));
        assert_eq!(
            verify(&store, &hasher(), "dup", "two").unwrap(),
            Verdict::Rejected(Rejection::IncorrectPassword)
        );
    }

    #[test]
    fn test_rejection_messages() {
        assert_eq!(Rejection::UserNotFound.to_string(), "User not found");
        assert_eq!(Rejection::IncorrectPassword.to_string(), "Incorrect password");
    }
}
