//! Authentication routes.
//!
//! Registration, login and logout, backed by server-side sessions.
//!
//! Routes:
//! - GET/POST /register - Create an account and sign in
//! - GET/POST /login - Sign in
//! - GET /logout - Sign out

use axum::{
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Form, Router,
};
use axum_extra::extract::CookieJar;
use chrono::{Duration, Utc};
use serde::Deserialize;

use crate::middleware::{clear_session_cookie, session_cookie, SESSION_COOKIE_NAME};
use crate::models::FormValues;
use crate::services::{flash, password};
use crate::{config, db, AppState, Error, Result};

/// Build the authentication routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/register", get(register_form).post(register))
        .route("/login", get(login_form).post(login))
        .route("/logout", get(logout))
}

// ============================================================================
// Request Types
// ============================================================================

#[derive(Debug, Deserialize)]
struct RegisterForm {
    #[serde(default)]
    email: String,
    #[serde(default)]
    display_name: String,
    #[serde(default)]
    password: String,
}

#[derive(Debug, Deserialize)]
struct LoginForm {
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// Render the registration form.
///
/// GET /register
#[axum::debug_handler]
async fn register_form(State(state): State<AppState>) -> Html<String> {
    Html(state.renderer.register(&FormValues::new(), None))
}

/// Create an account and sign the user in.
///
/// POST /register
#[axum::debug_handler]
async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<RegisterForm>,
) -> Result<Response> {
    if let Some(problem) = validate_registration(&form) {
        return Ok(Html(state.renderer.register(&echo_register(&form), Some(problem))).into_response());
    }

    let input = db::CreateUser {
        id: crate::models::new_id(),
        email: form.email.trim().to_lowercase(),
        display_name: form.display_name.trim().to_string(),
        password_hash: password::hash_password(&form.password),
    };

    let user = match db::create_user(&state.db, input).await {
        Ok(user) => user,
        Err(Error::AlreadyExists(_)) => {
            let body = state
                .renderer
                .register(&echo_register(&form), Some("That email is already registered."));
            return Ok(Html(body).into_response());
        }
        Err(err) => return Err(err),
    };

    tracing::info!(user_id = %user.id, "new user registered");

    let jar = jar.add(session_cookie(start_session(&state, &user.id).await?));
    Ok((jar, Redirect::to("/")).into_response())
}

/// Render the login form.
///
/// GET /login
#[axum::debug_handler]
async fn login_form(State(state): State<AppState>, jar: CookieJar) -> Response {
    let (jar, notice) = flash::take(jar);
    let body = state.renderer.login(&FormValues::new(), None, notice.as_deref());
    (jar, Html(body)).into_response()
}

/// Sign the user in.
///
/// POST /login
#[axum::debug_handler]
async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Result<Response> {
    let email = form.email.trim().to_lowercase();

    let user = db::get_user_by_email(&state.db, &email).await?;
    let verified = user
        .as_ref()
        .is_some_and(|u| password::verify_password(&form.password, &u.password_hash));

    let Some(user) = user.filter(|_| verified) else {
        // Same message for unknown email and bad password
        let mut values = FormValues::new();
        values.insert("email".to_string(), form.email);
        let body = state
            .renderer
            .login(&values, Some("Invalid email or password."), None);
        return Ok(Html(body).into_response());
    };

    tracing::debug!(user_id = %user.id, "user logged in");

    let jar = jar.add(session_cookie(start_session(&state, &user.id).await?));
    Ok((jar, Redirect::to("/")).into_response())
}

/// Sign the user out.
///
/// GET /logout
#[axum::debug_handler]
async fn logout(State(state): State<AppState>, jar: CookieJar) -> Result<Response> {
    if let Some(cookie) = jar.get(SESSION_COOKIE_NAME) {
        db::delete_session(&state.db, cookie.value()).await?;
    }

    let jar = jar.remove(clear_session_cookie());
    let jar = flash::set(jar, "You have been logged out.");
    Ok((jar, Redirect::to("/login")).into_response())
}

// ============================================================================
// Helpers
// ============================================================================

fn validate_registration(form: &RegisterForm) -> Option<&'static str> {
    let email = form.email.trim();
    if email.is_empty() || !email.contains('@') {
        return Some("Enter a valid email address.");
    }
    if form.display_name.trim().is_empty() {
        return Some("Display name is required.");
    }
    if form.password.len() < 8 {
        return Some("Password must be at least 8 characters.");
    }
    None
}

fn echo_register(form: &RegisterForm) -> FormValues {
    let mut values = FormValues::new();
    values.insert("email".to_string(), form.email.clone());
    values.insert("display_name".to_string(), form.display_name.clone());
    values
}

async fn start_session(state: &AppState, user_id: &str) -> Result<String> {
    let config = config::config();
    let session = db::create_session(
        &state.db,
        db::CreateSession {
            id: nanoid::nanoid!(),
            user_id: user_id.to_string(),
            expires_at: Utc::now() + Duration::seconds(config.session.max_age_seconds as i64),
        },
    )
    .await?;
    Ok(session.id)
}
