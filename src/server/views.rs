//! HTML pages
//!
//! Every user-supplied string passes through [`escape_html`] before it is
//! placed in markup.

use super::routes::{LOGIN_PATH, LOGOUT_PATH, SIGNUP_PATH};

fn base_style() -> &'static str {
    r#"
    * { margin: 0; padding: 0; box-sizing: border-box; }
    body {
        font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
        background: #f5f5f5; color: #333;
        display: flex; justify-content: center; align-items: center;
        min-height: 100vh; padding: 20px;
    }
    .card {
        background: #fff; border-radius: 16px; padding: 32px;
        max-width: 400px; width: 100%; box-shadow: 0 4px 24px rgba(0,0,0,0.08);
    }
    h1 { font-size: 24px; margin-bottom: 20px; color: #1a1a2e; }
    .form-group { margin-bottom: 16px; }
    .form-group label { display: block; font-size: 14px; font-weight: 500; margin-bottom: 6px; }
    .form-group input {
        width: 100%; padding: 12px 14px; border: 1.5px solid #ddd;
        border-radius: 10px; font-size: 16px;
    }
    .btn {
        width: 100%; padding: 14px; border: none; border-radius: 10px;
        font-size: 16px; font-weight: 600; cursor: pointer;
        background: #4a6cf7; color: #fff;
    }
    .error { background: #fff0f0; color: #d32f2f; padding: 10px 14px; border-radius: 8px; font-size: 13px; margin-bottom: 16px; }
    .footer { text-align: center; margin-top: 16px; font-size: 14px; }
    "#
}

fn page(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en"><head>
<meta charset="utf-8"><meta name="viewport" content="width=device-width,initial-scale=1">
<title>{title}</title>
<style>{style}</style>
</head><body>
<div class="card">
{body}
</div>
</body></html>"#,
        title = escape_html(title),
        style = base_style(),
    )
}

fn render_messages(messages: &[String]) -> String {
    messages
        .iter()
        .map(|m| format!(r#"<div class="error">{}</div>"#, escape_html(m)))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Home page for an authenticated user.
pub fn render_home(username: &str, messages: &[String]) -> String {
    page(
        "Home",
        &format!(
            r#"<h1>Welcome, {username}!</h1>
{messages}
<form method="post" action="{LOGOUT_PATH}">
<button class="btn" type="submit">Log out</button>
</form>"#,
            username = escape_html(username),
            messages = render_messages(messages),
        ),
    )
}

pub fn render_login(messages: &[String]) -> String {
    page(
        "Log in",
        &format!(
            r#"<h1>Log in</h1>
{messages}
<form method="post" action="{LOGIN_PATH}">
<div class="form-group"><label for="username">Username</label>
<input id="username" name="username" type="text" autocomplete="username" required autofocus></div>
<div class="form-group"><label for="password">Password</label>
<input id="password" name="password" type="password" autocomplete="current-password" required></div>
<button class="btn" type="submit">Log in</button>
</form>
<p class="footer">No account? <a href="{SIGNUP_PATH}">Sign up</a></p>"#,
            messages = render_messages(messages),
        ),
    )
}

/// Signup form, optionally pre-filled with a username.
pub fn render_signup(username: Option<&str>, messages: &[String]) -> String {
    page(
        "Sign up",
        &format!(
            r#"<h1>Sign up</h1>
{messages}
<form method="post" action="{SIGNUP_PATH}">
<div class="form-group"><label for="username">Username</label>
<input id="username" name="username" type="text" value="{username}" autocomplete="username" required></div>
<div class="form-group"><label for="password">Password</label>
<input id="password" name="password" type="password" autocomplete="new-password" required></div>
<div class="form-group"><label for="confirm_password">Confirm password</label>
<input id="confirm_password" name="confirm_password" type="password" autocomplete="new-password" required></div>
<button class="btn" type="submit">Sign up</button>
</form>
<p class="footer">Already registered? <a href="{LOGIN_PATH}">Log in</a></p>"#,
            messages = render_messages(messages),
            username = escape_html(username.unwrap_or("")),
        ),
    )
}

pub fn render_error(status: u16, message: &str) -> String {
    page(
        &format!("{status} {message}"),
        &format!(
            "<h1>{status}</h1>\n<p>{}</p>",
            escape_html(message)
        ),
    )
}

pub fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
