use axum::http::{header::InvalidHeaderValue, HeaderValue};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

const SESSION_MAX_AGE: u32 = 60 * 60 * 24 * 30;

/// `Set-Cookie` value for a long-lived, HTTP-only cookie.
pub fn cookie(name: &str, value: &str, secure: bool) -> Result<HeaderValue, InvalidHeaderValue> {
    cookie_with_max_age(name, value, SESSION_MAX_AGE, secure)
}

/// `Set-Cookie` value that expires the cookie immediately.
pub fn expired_cookie(name: &str, secure: bool) -> Result<HeaderValue, InvalidHeaderValue> {
    cookie_with_max_age(name, "", 0, secure)
}

pub fn cookie_with_max_age(
    name: &str,
    value: &str,
    max_age: u32,
    secure: bool,
) -> Result<HeaderValue, InvalidHeaderValue> {
    let secure = if secure { " Secure;" } else { "" };
    // Lax so the cookie survives the redirect back from Google.
    HeaderValue::from_str(&format!(
        "{name}={value}; HttpOnly; Max-Age={max_age};{secure} Path=/; SameSite=Lax"
    ))
}

/// Emails are stored and looked up trimmed and lowercased.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
