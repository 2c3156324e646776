//! Authentication system
//!
//! Handles password digests, credential verification and signup.

pub mod credentials;
pub mod results;
pub mod signup;
pub mod validator;

pub use credentials::PasswordHasher;
pub use results::{Rejection, SignupOutcome, Verdict};
pub use signup::{SignupRequest, signup};
pub use validator::verify;
