//! Web routes for Corkboard.
//!
//! This module combines all page routes into a single router.
//!
//! Route structure:
//! - /login, /register, /logout - Authentication (public)
//! - /health - Health check (public)
//! - / - Landing page (session-protected)
//! - /business/*, /businesses - Business CRUD (session-protected)
//! - /dog/*, /dogs - Dog CRUD (session-protected)

mod auth;
mod records;
mod status;

use axum::extract::State;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::{Extension, Router};
use axum_extra::extract::CookieJar;

use crate::middleware::{require_session, SessionUser};
use crate::models::{Business, Dog};
use crate::services::flash;
use crate::state::AppState;
use crate::Result;

/// Build the complete page router.
pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        // Health endpoint (public)
        .merge(status::routes())
        // Authentication routes (public)
        .merge(auth::routes())
        // Everything else requires a session
        .merge(protected_routes(state))
}

/// Protected routes that require an authenticated session.
fn protected_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        // Record CRUD, one generic controller per kind
        .nest("/business", records::routes::<Business>())
        .route("/businesses", get(records::list_records::<Business>))
        .nest("/dog", records::routes::<Dog>())
        .route("/dogs", get(records::list_records::<Dog>))
        // Apply session authentication to all protected routes
        .layer(axum::middleware::from_fn_with_state(state, require_session))
}

/// Landing page.
///
/// GET /
async fn index(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
    jar: CookieJar,
) -> Result<Response> {
    let (jar, notice) = flash::take(jar);
    let body = state.renderer.index(Some(&user.display_name), notice.as_deref());
    Ok((jar, Html(body)).into_response())
}
