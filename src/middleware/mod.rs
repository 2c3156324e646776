//! Server middleware

pub mod logging;
