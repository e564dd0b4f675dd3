//! Integration tests for registration, login and logout.

mod common;

use axum::http::StatusCode;
use common::{form_body, location, login, register, server_for, test_state};

#[tokio::test]
async fn test_register_signs_in_and_lands_home() {
    let state = test_state().await;
    let server = server_for(&state);

    let response = server
        .post("/register")
        .bytes(form_body(&[
            ("email", "new@example.com"),
            ("display_name", "Newcomer"),
            ("password", "long-enough"),
        ]))
        .await;
    assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");

    // The session cookie works immediately
    let page = server.get("/").await;
    assert_eq!(page.status_code(), StatusCode::OK);
    assert!(page.text().contains("Newcomer"));
}

#[tokio::test]
async fn test_register_validates_input() {
    let state = test_state().await;
    let server = server_for(&state);

    let response = server
        .post("/register")
        .bytes(form_body(&[
            ("email", "not-an-email"),
            ("display_name", "Someone"),
            ("password", "long-enough"),
        ]))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert!(response.text().contains("Enter a valid email address."));

    let response = server
        .post("/register")
        .bytes(form_body(&[
            ("email", "short@example.com"),
            ("display_name", "Someone"),
            ("password", "short"),
        ]))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert!(response.text().contains("Password must be at least 8 characters."));
}

#[tokio::test]
async fn test_duplicate_email_is_rejected() {
    let state = test_state().await;
    let server = server_for(&state);
    register(&server, "taken@example.com", "First", "password-1").await;

    let response = server
        .post("/register")
        .bytes(form_body(&[
            ("email", "taken@example.com"),
            ("display_name", "Second"),
            ("password", "password-2"),
        ]))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert!(response.text().contains("That email is already registered."));
}

#[tokio::test]
async fn test_login_rejects_bad_credentials() {
    let state = test_state().await;
    let server = server_for(&state);
    register(&server, "user@example.com", "User", "right-password").await;

    // Fresh jar, wrong password
    let other = server_for(&state);
    let response = other
        .post("/login")
        .bytes(form_body(&[
            ("email", "user@example.com"),
            ("password", "wrong-password"),
        ]))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert!(response.text().contains("Invalid email or password."));

    // Unknown email gets the same message
    let response = other
        .post("/login")
        .bytes(form_body(&[
            ("email", "nobody@example.com"),
            ("password", "whatever-pw"),
        ]))
        .await;
    assert!(response.text().contains("Invalid email or password."));
}

#[tokio::test]
async fn test_login_then_logout_round_trip() {
    let state = test_state().await;
    let server = server_for(&state);
    register(&server, "user@example.com", "User", "right-password").await;

    // Start over with an empty jar and log in
    let session = server_for(&state);
    login(&session, "user@example.com", "right-password").await;
    assert_eq!(session.get("/").await.status_code(), StatusCode::OK);

    // Logout redirects to login with a notice
    let response = session.get("/logout").await;
    assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login");
    assert!(session.get("/login").await.text().contains("You have been logged out."));

    // The session no longer grants access
    let response = session.get("/dog/list").await;
    assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login");
}

#[tokio::test]
async fn test_health_check_is_public() {
    let state = test_state().await;
    let server = server_for(&state);

    let response = server.get("/health").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert!(response.text().contains("ok"));
}
