//! Shared helpers for the integration tests.
//!
//! Builds servers over an in-memory SQLite database. Several servers
//! can share one state: each keeps its own cookie jar, which is how the
//! tests act as different signed-in users against the same board.

use axum::body::Bytes;
use axum::http::StatusCode;
use axum_test::{TestServer, TestServerConfig};
use corkboard::{db, web, AppState};

/// Create a fresh application state over an in-memory database.
pub async fn test_state() -> AppState {
    let pool = db::create_pool_with_config(":memory:", db::PoolConfig::test())
        .await
        .expect("Failed to create test database");
    db::initialize_schema(&pool)
        .await
        .expect("Failed to initialize schema");
    AppState::with_pool(pool)
}

/// Build a test server with its own cookie jar over shared state.
pub fn server_for(state: &AppState) -> TestServer {
    let app = web::routes(state.clone()).with_state(state.clone());
    let config = TestServerConfig {
        save_cookies: true,
        default_content_type: Some("application/x-www-form-urlencoded".to_string()),
        ..TestServerConfig::default()
    };
    TestServer::new_with_config(app, config).expect("Failed to start test server")
}

/// Encode a form payload.
pub fn form_body(pairs: &[(&str, &str)]) -> Bytes {
    Bytes::from(
        pairs
            .iter()
            .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&"),
    )
}

/// Register a new user; the server's cookie jar ends up signed in.
pub async fn register(server: &TestServer, email: &str, display_name: &str, password: &str) {
    let response = server
        .post("/register")
        .bytes(form_body(&[
            ("email", email),
            ("display_name", display_name),
            ("password", password),
        ]))
        .await;
    assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
}

/// Log an existing user in.
#[allow(dead_code)]
pub async fn login(server: &TestServer, email: &str, password: &str) {
    let response = server
        .post("/login")
        .bytes(form_body(&[("email", email), ("password", password)]))
        .await;
    assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
}

/// Location header of a redirect response.
pub fn location(response: &axum_test::TestResponse) -> String {
    response
        .header(axum::http::header::LOCATION)
        .to_str()
        .expect("Location header is not valid UTF-8")
        .to_string()
}
