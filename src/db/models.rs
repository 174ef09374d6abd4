// Database model structs

use chrono::NaiveDateTime;
use sqlx::types::Json;

use crate::quiz::{QuizQuestion, QuizRun};

/// The signed-in user, resolved from the session cookie on each request.
#[derive(Clone, Debug, sqlx::FromRow)]
pub struct AuthUser {
    pub id: i32,
    pub email: String,
    pub display_name: String,
    pub email_verified: bool,
    /// Set from configuration by the auth extractor, not stored. Only
    /// verified addresses qualify.
    #[sqlx(skip)]
    pub is_admin: bool,
}

#[derive(sqlx::FromRow)]
pub struct UserProfile {
    pub id: i32,
    pub email: String,
    pub display_name: String,
    pub photo_url: Option<String>,
    pub email_verified: bool,
    pub created_at: NaiveDateTime,
    #[sqlx(skip)]
    pub providers: Vec<String>,
}

/// Identity asserted by an external sign-in provider.
#[derive(Clone, Debug, PartialEq)]
pub struct FederatedIdentity {
    pub provider: String,
    pub subject: String,
    pub email: String,
    pub display_name: String,
    pub photo_url: Option<String>,
    pub email_verified: bool,
}

/// A quiz run as persisted under its cookie token. `version` grows on every
/// save.
pub struct StoredRun {
    pub quiz_id: String,
    pub run: QuizRun,
    pub version: i64,
}

/// How an external identity resolved against the user table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FederatedMatch {
    User(i32),
    /// The email belongs to an account that cannot be linked without the
    /// owner signing in with their password.
    PasswordSignInRequired,
}

#[derive(sqlx::FromRow)]
pub struct QuizSummary {
    pub id: String,
    pub title: String,
    pub question_count: i64,
    pub author: Option<String>,
}

#[derive(sqlx::FromRow)]
pub(crate) struct QuestionRow {
    pub external_id: Option<String>,
    pub question_text: String,
    pub options: Json<Vec<String>>,
    pub correct_answer: String,
    pub explanation: Option<String>,
}

impl From<QuestionRow> for QuizQuestion {
    fn from(row: QuestionRow) -> Self {
        QuizQuestion {
            id: row.external_id,
            question_text: row.question_text,
            options: row.options.0,
            correct_answer: row.correct_answer,
            explanation: row.explanation,
        }
    }
}
