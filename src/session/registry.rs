//! Session registry
//!
//! In-memory store of live sessions keyed by their token. All state for a
//! caller lives under that caller's token; no operation touches another
//! caller's session.

use log::{debug, info};
use parking_lot::Mutex;
use rand::RngCore;
use std::collections::HashMap;
use std::time::{Duration, Instant};

use super::state::{Identity, Session, SessionIdentity, SessionToken};
use crate::storage::UserRecord;

/// Token byte length before hex encoding (32 bytes = 64 hex chars).
const TOKEN_BYTES: usize = 32;

pub struct SessionRegistry {
    sessions: Mutex<HashMap<SessionToken, Session>>,
    ttl: Duration,
    anonymous_ttl: Duration,
}

impl SessionRegistry {
    /// `ttl` applies to logged-in sessions, `anonymous_ttl` to sessions
    /// that carry no identity.
    pub fn new(ttl: Duration, anonymous_ttl: Duration) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            ttl,
            anonymous_ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Creates an anonymous session.
    pub fn create(&self) -> SessionToken {
        let token = generate_token();
        self.sessions
            .lock()
            .insert(token.clone(), Session::new(self.anonymous_ttl));
        token
    }

    /// True if `token` names a live session.
    pub fn contains(&self, token: &SessionToken) -> bool {
        self.with_live(token, |_| ()).is_some()
    }

    /// Returns `token` if it names a live session, otherwise a new one.
    pub fn ensure(&self, token: Option<&SessionToken>) -> SessionToken {
        match token {
            Some(token) if self.contains(token) => token.clone(),
            _ => self.create(),
        }
    }

    /// Binds `record`'s username to a fresh session.
    ///
    /// The caller's current session is replaced so a token handed out before
    /// login never carries an identity. Returns the new token and the path
    /// remembered on the old session, if any.
    pub fn establish(
        &self,
        current: Option<&SessionToken>,
        record: &UserRecord,
    ) -> (SessionToken, Option<String>) {
        let token = generate_token();
        let mut session = Session::new(self.ttl);
        session.set_identity(Some(SessionIdentity {
            username: record.username.clone(),
        }));

        let mut sessions = self.sessions.lock();
        let return_to = current
            .and_then(|old| sessions.remove(old))
            .filter(|old| !old.is_expired(Instant::now()))
            .and_then(|mut old| old.take_return_to());
        sessions.insert(token.clone(), session);
        drop(sessions);

        info!("Session established for {}", record.username);
        (token, return_to)
    }

    /// Identity carried by `token`, without consulting the user store.
    pub fn resolve(&self, token: &SessionToken) -> Identity {
        self.with_live(token, |session| {
            session
                .identity()
                .cloned()
                .map_or(Identity::Anonymous, Identity::Authenticated)
        })
        .unwrap_or(Identity::Anonymous)
    }

    /// Clears the identity on `token`'s session. The session itself stays.
    ///
    /// Returns whether an identity was present.
    pub fn terminate(&self, token: &SessionToken) -> bool {
        self.with_live(token, |session| {
            let had_identity = session.identity().is_some();
            session.set_identity(None);
            session.set_return_to(None);
            had_identity
        })
        .unwrap_or(false)
    }

    pub fn push_flash(&self, token: &SessionToken, message: impl Into<String>) -> bool {
        let message = message.into();
        self.with_live(token, |session| session.push_flash(message))
            .is_some()
    }

    pub fn take_flash(&self, token: &SessionToken) -> Vec<String> {
        self.with_live(token, Session::take_flash)
            .unwrap_or_default()
    }

    /// Records the path to send the caller to after the next login.
    pub fn remember_return_to(&self, token: &SessionToken, path: impl Into<String>) -> bool {
        let path = path.into();
        self.with_live(token, |session| session.set_return_to(Some(path)))
            .is_some()
    }

    /// Drops every expired session. Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut sessions = self.sessions.lock();
        let before = sessions.len();
        sessions.retain(|_, session| !session.is_expired(now));
        let removed = before - sessions.len();
        if removed > 0 {
            debug!("Purged {} expired sessions ({} live)", removed, sessions.len());
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.sessions.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.lock().is_empty()
    }

    /// Runs `f` on a live session, sliding its idle deadline. Expired
    /// sessions are removed and yield `None`.
    fn with_live<R>(&self, token: &SessionToken, f: impl FnOnce(&mut Session) -> R) -> Option<R> {
        let mut sessions = self.sessions.lock();
        let session = sessions.get_mut(token)?;
        if session.is_expired(Instant::now()) {
            sessions.remove(token);
            return None;
        }
        let result = f(session);
        let ttl = self.ttl_for(session);
        session.touch(ttl);
        Some(result)
    }

    fn ttl_for(&self, session: &Session) -> Duration {
        if session.identity().is_some() {
            self.ttl
        } else {
            self.anonymous_ttl
        }
    }
}

/// Generate a random session token (hex-encoded).
fn generate_token() -> SessionToken {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::rngs::OsRng.fill_bytes(&mut bytes);
    SessionToken::new(hex::encode(bytes))
}
