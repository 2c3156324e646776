//! Session management
//!
//! Server-side sessions keyed by a cookie token: identity claims set at
//! login, flash messages, and the post-login return path.

pub mod extract;
pub mod registry;
pub mod state;

pub use extract::{CurrentUser, SessionContext, with_session_cookie};
pub use registry::SessionRegistry;
pub use state::{Identity, SessionIdentity, SessionToken};
