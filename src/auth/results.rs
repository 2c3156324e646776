//! Authentication result types
//!
//! Defines result structures returned by authentication operations.

use std::fmt;

use crate::storage::UserRecord;

/// Outcome of a credential check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Accepted(UserRecord),
    Rejected(Rejection),
}

/// Why a credential check failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    UserNotFound,
    IncorrectPassword,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::UserNotFound => write!(f, "User not found"),
            Rejection::IncorrectPassword => write!(f, "Incorrect password"),
        }
    }
}

/// Outcome of a signup attempt. Exactly one is produced per attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignupOutcome {
    /// Carries the submitted username so the form can be pre-filled.
    PasswordMismatch { username: String },
    UserExists,
    Created,
}

impl SignupOutcome {
    /// Message shown on the re-rendered signup form, if any.
    pub fn message(&self) -> Option<&'static str> {
        match self {
            SignupOutcome::PasswordMismatch { .. } => Some("Passwords do not match!"),
            SignupOutcome::UserExists => Some("User already exists!"),
            SignupOutcome::Created => None,
        }
    }
}
