pub const HOME_URL: &str = "/";
pub const LOGIN_URL: &str = "/login";
pub const REGISTER_URL: &str = "/register";
pub const LOGOUT_URL: &str = "/logout";
pub const GOOGLE_LOGIN_URL: &str = "/login/google";
pub const GOOGLE_CALLBACK_URL: &str = "/login/google/callback";
pub const RESEND_VERIFICATION_URL: &str = "/resend-verification";
pub const PROFILE_URL: &str = "/profile";
pub const ADMIN_URL: &str = "/admin";
pub const ADMIN_QUIZZES_URL: &str = "/admin/quizzes";
pub const CHAPTERS_URL: &str = "/chapters";

pub const QUIZ_URL: &str = "/quiz";
pub const QUIZ_ANSWER_URL: &str = "/quiz/answer";
pub const QUIZ_NEXT_URL: &str = "/quiz/next";
pub const QUIZ_RESTART_URL: &str = "/quiz/restart";

pub const USER_SESSION_COOKIE_NAME: &str = "user_session";
pub const QUIZ_RUN_COOKIE_NAME: &str = "quiz_run";
pub const OAUTH_STATE_COOKIE_NAME: &str = "oauth_state";

pub fn chapter_url(chapter: u32) -> String {
    format!("/chapters/{chapter}")
}

pub fn verse_url(chapter: u32, verse: u32) -> String {
    format!("/chapters/{chapter}/verses/{verse}")
}

pub fn admin_quiz_url(quiz_id: &str) -> String {
    format!("/admin/quizzes/{quiz_id}")
}

// i18n
pub const LOCALE_COOKIE_NAME: &str = "lang";
pub const DEFAULT_LOCALE: &str = "en";
pub const SUPPORTED_LOCALES: &[&str] = &["en", "hi"];
pub const SET_LOCALE_URL: &str = "/set-locale";
