//! Module `session::state`
//!
//! Defines the server-side session record and the identity it carries.

use std::fmt;
use std::time::{Duration, Instant};

/// Identity claim kept in a session. Never holds the password.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionIdentity {
    pub username: String,
}

/// Who the caller of a request is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identity {
    Authenticated(SessionIdentity),
    Anonymous,
}

impl Identity {
    pub fn username(&self) -> Option<&str> {
        match self {
            Identity::Authenticated(identity) => Some(&identity.username),
            Identity::Anonymous => None,
        }
    }
}

/// Opaque session token carried in the session cookie.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Tokens are credentials; keep them out of logs.
impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix: String = self.0.chars().take(6).collect();
        write!(f, "SessionToken({prefix}…)")
    }
}

/// State of one caller's session.
#[derive(Debug, Clone)]
pub struct Session {
    identity: Option<SessionIdentity>,
    flash: Vec<String>,
    return_to: Option<String>,
    expires_at: Instant,
}

impl Session {
    pub fn new(ttl: Duration) -> Self {
        Self {
            identity: None,
            flash: Vec::new(),
            return_to: None,
            expires_at: Instant::now() + ttl,
        }
    }

    // --------------------
    // Getter methods
    // --------------------

    pub fn identity(&self) -> Option<&SessionIdentity> {
        self.identity.as_ref()
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }

    // --------------------
    // Setter methods
    // --------------------

    pub fn set_identity(&mut self, identity: Option<SessionIdentity>) {
        self.identity = identity;
    }

    pub fn push_flash(&mut self, message: String) {
        self.flash.push(message);
    }

    /// Removes and returns every pending flash message.
    pub fn take_flash(&mut self) -> Vec<String> {
        std::mem::take(&mut self.flash)
    }

    pub fn set_return_to(&mut self, path: Option<String>) {
        self.return_to = path;
    }

    pub fn take_return_to(&mut self) -> Option<String> {
        self.return_to.take()
    }

    /// Pushes the idle deadline out to `ttl` from now.
    pub fn touch(&mut self, ttl: Duration) {
        self.expires_at = Instant::now() + ttl;
    }
}
