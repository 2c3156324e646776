//! Error handling
//!
//! Defines error types and their HTTP translation.

pub mod handlers;
pub mod types;

pub use types::*;
