//! Flash notices.
//!
//! One-shot user-visible notices that survive a redirect. The notice
//! rides in a short-lived cookie; the next rendered page reads it and
//! clears it. This keeps notices explicit request/response values
//! instead of ambient session state.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

/// Flash cookie name.
pub const FLASH_COOKIE_NAME: &str = "corkboard_flash";

/// Attach a notice to the response.
pub fn set(jar: CookieJar, message: &str) -> CookieJar {
    let cookie = Cookie::build((FLASH_COOKIE_NAME, urlencoding::encode(message).into_owned()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build();
    jar.add(cookie)
}

/// Read and clear the pending notice, if any.
pub fn take(jar: CookieJar) -> (CookieJar, Option<String>) {
    match jar.get(FLASH_COOKIE_NAME) {
        Some(cookie) => {
            let message = urlencoding::decode(cookie.value())
                .map(|s| s.into_owned())
                .unwrap_or_else(|_| cookie.value().to_string());
            let removal = Cookie::build(FLASH_COOKIE_NAME).path("/").build();
            (jar.remove(removal), Some(message))
        }
        None => (jar, None),
    }
}
