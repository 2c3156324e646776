//! Route table

use axum::Router;
use axum::middleware;
use axum::routing::{get, post};

use super::handlers;
use super::state::AppState;
use crate::middleware::logging::log_request;

pub const HOME_PATH: &str = "/";
pub const LOGIN_PATH: &str = "/user/login";
pub const LOGOUT_PATH: &str = "/user/logout";
pub const SIGNUP_PATH: &str = "/user/signup";

/// Builds the application router over `state`.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(HOME_PATH, get(handlers::home))
        .route(
            LOGIN_PATH,
            get(handlers::login_page).post(handlers::login_submit),
        )
        .route(LOGOUT_PATH, post(handlers::logout))
        .route(
            SIGNUP_PATH,
            get(handlers::signup_page).post(handlers::signup_submit),
        )
        .fallback(handlers::not_found)
        .layer(middleware::from_fn(log_request))
        .with_state(state)
}
