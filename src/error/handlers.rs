//! Error handlers
//!
//! Maps handler errors onto HTTP responses. Internal detail is logged for
//! operators and never rendered to the caller.

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use log::{error, warn};

use crate::error::types::AppError;
use crate::server::views;

/// Log an error escaping a request handler
pub fn handle_error(err: &AppError) {
    match err {
        AppError::NotFound(path) => warn!("No route for {}", path),
        _ => error!("Request failed: {}", err),
    }
}

/// Convert error to HTTP status code
pub fn error_to_status(err: &AppError) -> StatusCode {
    match err {
        AppError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        AppError::NotFound(_) => StatusCode::NOT_FOUND,
        AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        handle_error(&self);

        let status = error_to_status(&self);
        let message = status.canonical_reason().unwrap_or("Error");

        (status, Html(views::render_error(status.as_u16(), message))).into_response()
    }
}
