rust_i18n::i18n!("locales", fallback = "en");

pub mod content;
pub mod db;
pub mod email;
pub mod extractors;
pub mod handlers;
pub mod models;
pub mod names;
pub mod quiz;
pub mod rejections;
pub mod services;
pub mod statics;
pub mod utils;
pub mod views;

use axum::{middleware, Router};

use content::GitaClient;
use services::{auth::AuthService, daily_quiz::DailyQuizService, google::GoogleOAuth};

#[derive(Clone)]
pub struct AppState {
    pub db: db::Db,
    pub auth: AuthService,
    pub quizzes: DailyQuizService,
    pub content: GitaClient,
    pub google: Option<GoogleOAuth>,
    pub admin_emails: Vec<String>,
    pub secure_cookies: bool,
}

impl AppState {
    pub fn is_admin_email(&self, email: &str) -> bool {
        self.admin_emails
            .iter()
            .any(|admin| admin.eq_ignore_ascii_case(email))
    }
}

/// Splits a comma separated `ADMIN_EMAILS` value.
pub fn parse_admin_emails(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(utils::normalize_email)
        .filter(|s| !s.is_empty())
        .collect()
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(handlers::homepage::routes())
        .merge(handlers::auth::routes())
        .merge(handlers::chapters::routes())
        .merge(handlers::quiz::routes())
        .merge(handlers::profile::routes())
        .merge(handlers::admin::routes())
        .layer(middleware::from_fn(csrf_check))
        .nest("/static", statics::routes())
        .fallback(rejections::not_found)
        .with_state(state)
}

async fn csrf_check(
    req: axum::http::Request<axum::body::Body>,
    next: middleware::Next,
) -> axum::response::Response {
    use axum::http::{Method, StatusCode};
    use axum::response::IntoResponse;

    let state_changing = [Method::POST, Method::PUT, Method::PATCH, Method::DELETE];

    if state_changing.contains(req.method()) {
        let has_hx_request = req
            .headers()
            .get("HX-Request")
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v == "true");

        if !has_hx_request {
            tracing::warn!(method = %req.method(), uri = %req.uri(), "rejected request without HX-Request header");
            return (StatusCode::FORBIDDEN, "CSRF check failed").into_response();
        }
    }

    next.run(req).await
}
