//! Session-based authentication middleware.
//!
//! Validates the session cookie on every protected page request.
//!
//! # Session Flow
//!
//! 1. User registers or logs in
//! 2. Server creates a session row and sets the `corkboard_session` cookie
//! 3. Subsequent requests include the cookie, validated by this middleware
//! 4. Session expires after the configured duration or on logout
//!
//! # Security Model
//!
//! - Session IDs are cryptographically random (nanoid)
//! - Sessions are stored server-side in the database
//! - Cookie is HttpOnly, Secure (in production), SameSite=Lax
//! - Sessions can be invalidated server-side (logout, expiry)

use axum::{
    body::Body,
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::Utc;

use crate::{config, db, error::Error, AppState};

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "corkboard_session";

/// User context injected into request extensions after successful
/// session validation.
#[derive(Clone, Debug)]
pub struct SessionUser {
    /// Unique user identifier; the sole basis for ownership checks.
    pub user_id: String,
    /// User's email address
    pub email: String,
    /// User's display name
    pub display_name: String,
}

/// Middleware that requires a valid session.
///
/// Extracts the session ID from the cookie, validates it against the
/// database, and injects `SessionUser` into request extensions.
/// Requests without a valid session are redirected to the login page
/// before any handler logic runs.
pub async fn require_session(
    State(state): State<AppState>,
    jar: CookieJar,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let Some(session_id) = jar.get(SESSION_COOKIE_NAME).map(|c| c.value().to_string()) else {
        return Redirect::to("/login").into_response();
    };

    match validate_session(&state, &session_id).await {
        Ok(session_user) => {
            req.extensions_mut().insert(session_user);
            next.run(req).await
        }
        Err(Error::Unauthenticated) => Redirect::to("/login").into_response(),
        Err(err) => err.into_response(),
    }
}

/// Validate a session ID and return the session user.
async fn validate_session(state: &AppState, session_id: &str) -> Result<SessionUser, Error> {
    let config = config::config();

    let session = db::get_session(&state.db, session_id)
        .await?
        .ok_or(Error::Unauthenticated)?;

    if session.is_expired() {
        // Clean up expired session
        let db = state.db.clone();
        let sid = session_id.to_string();
        tokio::spawn(async move {
            let _ = db::delete_session(&db, &sid).await;
        });
        return Err(Error::Unauthenticated);
    }

    let user = match db::get_user(&state.db, &session.user_id).await {
        Ok(user) => user,
        Err(Error::NotFound(_)) => return Err(Error::Unauthenticated),
        Err(err) => return Err(err),
    };

    // Extend the session once it is more than halfway through its lifetime
    let max_age = chrono::Duration::seconds(config.session.max_age_seconds as i64);
    let halfway = Utc::now() + (max_age / 2);

    if session.expires_at < halfway {
        let new_expires = Utc::now() + max_age;
        let db = state.db.clone();
        let sid = session_id.to_string();
        tokio::spawn(async move {
            let _ = db::extend_session(&db, &sid, new_expires).await;
        });
    }

    Ok(SessionUser {
        user_id: user.id,
        email: user.email,
        display_name: user.display_name,
    })
}

/// Build the session cookie set at login.
pub fn session_cookie(session_id: String) -> Cookie<'static> {
    let config = config::config();
    Cookie::build((SESSION_COOKIE_NAME, session_id))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(config.session.cookie_secure)
        .build()
}

/// Build the removal cookie used at logout.
pub fn clear_session_cookie() -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE_NAME).path("/").build()
}
