#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Method, Request, Response},
};
use gitapath::{
    content::{GitaClient, DEFAULT_HOST},
    db::Db,
    email::ResendEmailSender,
    names,
    services::{auth::AuthService, daily_quiz::DailyQuizService},
    AppState,
};

pub const ADMIN_EMAIL: &str = "admin@gitapath.test";

pub async fn create_test_db() -> Db {
    create_test_db_with_url().await.0
}

/// A fresh database plus its URL, for tests that open a second connection.
pub async fn create_test_db_with_url() -> (Db, String) {
    use std::sync::atomic::{AtomicU32, Ordering};
    static COUNTER: AtomicU32 = AtomicU32::new(0);
    let id = COUNTER.fetch_add(1, Ordering::SeqCst);
    let path =
        std::env::temp_dir().join(format!("gitapath_test_{}_{}.db", std::process::id(), id));
    // Clean up leftover file from previous runs
    let _ = std::fs::remove_file(&path);
    let url = format!("sqlite://{}", path.display());
    let db = Db::new(&url).await.expect("failed to create test database");
    (db, url)
}

/// App state with email and Google sign-in disabled and no content API key.
pub fn test_state(db: Db) -> AppState {
    test_state_with_content(db, GitaClient::new(DEFAULT_HOST.to_string(), None))
}

pub fn test_state_with_content(db: Db, content: GitaClient) -> AppState {
    AppState {
        auth: AuthService::new(
            db.clone(),
            ResendEmailSender::new(None),
            "http://localhost:1414".to_string(),
        ),
        quizzes: DailyQuizService::new(db.clone()),
        content,
        google: None,
        admin_emails: vec![ADMIN_EMAIL.to_string()],
        secure_cookies: false,
        db,
    }
}

/// Creates a user with a verified email and a session, returning the
/// `Cookie` header value.
pub async fn signed_in(db: &Db, email: &str) -> String {
    let (user_id, token) = db
        .create_user(email, "secret-password", "Test User")
        .await
        .expect("create user");
    assert!(db.verify_email_token(&token).await.expect("verify email"));
    let session = db
        .create_user_session(user_id)
        .await
        .expect("create session");
    format!("{}={}", names::USER_SESSION_COOKIE_NAME, session)
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .expect("request build should succeed")
}

pub fn get_with_cookie(uri: &str, cookie: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .header(header::COOKIE, cookie)
        .body(Body::empty())
        .expect("request build should succeed")
}

/// An htmx form submission, which is what passes the CSRF check.
pub fn hx_form(method: Method, uri: &str, cookie: Option<&str>, form: &str) -> Request<Body> {
    let mut req = Request::builder()
        .method(method)
        .uri(uri)
        .header("HX-Request", "true")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        req = req.header(header::COOKIE, cookie);
    }
    req.body(Body::from(form.to_string()))
        .expect("request build should succeed")
}

pub async fn body_string(resp: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("body should be readable");
    String::from_utf8(bytes.to_vec()).expect("body should be utf-8")
}

/// `name=value` of the first `Set-Cookie` header for `name`.
pub fn set_cookie(resp: &Response<Body>, name: &str) -> Option<String> {
    resp.headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with(&format!("{name}=")))
        .and_then(|v| v.split(';').next())
        .map(str::to_string)
}
