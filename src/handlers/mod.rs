pub mod admin;
pub mod auth;
pub mod chapters;
pub mod homepage;
pub mod profile;
pub mod quiz;

use axum::http::{header::SET_COOKIE, HeaderMap, HeaderValue};

/// Headers telling htmx to navigate to `to`, setting `cookies` on the way.
pub(crate) fn hx_redirect(to: &'static str, cookies: Vec<HeaderValue>) -> HeaderMap {
    let mut headers = HeaderMap::new();
    for cookie in cookies {
        headers.append(SET_COOKIE, cookie);
    }
    headers.insert("HX-Redirect", HeaderValue::from_static(to));
    headers
}
