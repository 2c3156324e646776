//! HTTP handlers
//!
//! Each handler produces exactly one response. User-input failures render
//! or redirect locally; store failures propagate as [`AppError`].

use axum::Form;
use axum::extract::State;
use axum::http::Uri;
use axum::response::{Html, IntoResponse, Redirect, Response};
use log::info;
use serde::Deserialize;
use std::sync::Arc;

use super::routes::{HOME_PATH, LOGIN_PATH};
use super::state::AppState;
use super::views;
use crate::auth::{self, SignupOutcome, SignupRequest, Verdict};
use crate::error::AppError;
use crate::session::{CurrentUser, SessionContext, with_session_cookie};

/// Submitted login form
#[derive(Debug, Clone, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// GET /
pub async fn home(State(state): State<AppState>, user: CurrentUser) -> Html<String> {
    let messages = state.sessions.take_flash(&user.token);
    Html(views::render_home(&user.identity.username, &messages))
}

/// GET /user/login
pub async fn login_page(State(state): State<AppState>, session: SessionContext) -> Html<String> {
    let messages = take_flash(&state, &session);
    Html(views::render_login(&messages))
}

/// POST /user/login
pub async fn login_submit(
    State(state): State<AppState>,
    session: SessionContext,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    let store = Arc::clone(&state.store);
    let hasher = state.hasher;
    let verdict = tokio::task::spawn_blocking(move || {
        auth::verify(store.as_ref(), &hasher, &form.username, &form.password)
    })
    .await
    .map_err(|e| AppError::Internal(format!("credential check aborted: {e}")))??;

    match verdict {
        Verdict::Accepted(record) => {
            let (token, return_to) = state.sessions.establish(session.token(), &record);
            let target = return_to
                .filter(|path| is_local_path(path))
                .unwrap_or_else(|| HOME_PATH.to_string());
            info!("User {} logged in, redirecting to {}", record.username, target);
            Ok(with_session_cookie(Redirect::to(&target), &token, &state))
        }
        Verdict::Rejected(reason) => {
            let token = state.sessions.ensure(session.token());
            state.sessions.push_flash(&token, reason.to_string());
            Ok(with_session_cookie(Redirect::to(LOGIN_PATH), &token, &state))
        }
    }
}

/// POST /user/logout
pub async fn logout(State(state): State<AppState>, session: SessionContext) -> Redirect {
    if let Some(token) = session.token() {
        if state.sessions.terminate(token) {
            info!("Session logged out");
        }
    }
    Redirect::to(LOGIN_PATH)
}

/// GET /user/signup
pub async fn signup_page(State(state): State<AppState>, session: SessionContext) -> Html<String> {
    let messages = take_flash(&state, &session);
    Html(views::render_signup(None, &messages))
}

/// POST /user/signup
pub async fn signup_submit(
    State(state): State<AppState>,
    Form(request): Form<SignupRequest>,
) -> Result<Response, AppError> {
    let store = Arc::clone(&state.store);
    let hasher = state.hasher;
    let outcome = tokio::task::spawn_blocking(move || {
        auth::signup(store.as_ref(), &hasher, &request)
    })
    .await
    .map_err(|e| AppError::Internal(format!("signup aborted: {e}")))??;

    let messages: Vec<String> = outcome.message().map(String::from).into_iter().collect();

    let response = match outcome {
        SignupOutcome::Created => Redirect::to(LOGIN_PATH).into_response(),
        SignupOutcome::PasswordMismatch { username } => {
            Html(views::render_signup(Some(&username), &messages)).into_response()
        }
        SignupOutcome::UserExists => {
            Html(views::render_signup(None, &messages)).into_response()
        }
    };
    Ok(response)
}

/// Fallback for unmatched routes
pub async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(uri.path().to_string())
}

fn take_flash(state: &AppState, session: &SessionContext) -> Vec<String> {
    session
        .token()
        .map(|token| state.sessions.take_flash(token))
        .unwrap_or_default()
}

/// Only same-site absolute paths are valid post-login targets.
fn is_local_path(path: &str) -> bool {
    path.starts_with('/') && !path.starts_with("//") && !path.starts_with("/\\")
}
