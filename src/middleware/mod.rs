//! Middleware for Corkboard.
//!
//! Session-cookie authentication for the page routes. Every route
//! under the protected router runs through `require_session` before
//! any handler logic.

mod session_auth;

pub use session_auth::{
    clear_session_cookie, require_session, session_cookie, SessionUser, SESSION_COOKIE_NAME,
};
