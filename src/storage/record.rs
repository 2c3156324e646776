//! User record
//!
//! One entry of the user store as it appears in the JSON document.

use serde::{Deserialize, Serialize};

/// A registered user. `username` is the case-sensitive identity key;
/// `password` holds the stored secret (a digest, or legacy plaintext).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub username: String,
    pub password: String,
}

impl UserRecord {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}
