//! Server core functionality
//!
//! This module contains the HTTP server, its route table, request handlers
//! and page rendering.

pub mod core;
pub mod handlers;
pub mod routes;
pub mod state;
pub mod views;

pub use self::core::{Server, ServerError};
pub use routes::router;
pub use state::AppState;
