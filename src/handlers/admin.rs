use axum::{
    extract::{Form, Path, State},
    routing::{delete, get, post},
    Router,
};
use serde::Deserialize;

use crate::{
    db::AuthUser,
    extractors::{AuthGuard, IsHtmx, Locale},
    models, names,
    rejections::{AppError, ResultExt},
    views::{self, admin as admin_views, Section},
    AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(names::ADMIN_URL, get(dashboard))
        .route(names::ADMIN_QUIZZES_URL, post(upload_quiz))
        .route("/admin/quizzes/{quiz_id}", delete(delete_quiz))
}

fn require_admin(user: &AuthUser) -> Result<(), AppError> {
    if user.is_admin {
        Ok(())
    } else {
        tracing::warn!("user {} tried to open the admin dashboard", user.id);
        Err(AppError::Forbidden)
    }
}

async fn dashboard(
    State(state): State<AppState>,
    IsHtmx(is_htmx): IsHtmx,
    Locale(locale): Locale,
    AuthGuard(user): AuthGuard,
) -> Result<maud::Markup, AppError> {
    require_admin(&user)?;
    let quizzes = state
        .db
        .quiz_summaries()
        .await
        .reject("could not list quizzes")?;

    Ok(views::render(
        is_htmx,
        "Admin",
        Section::Admin,
        admin_views::dashboard(&quizzes, admin_views::UploadState::NoUpload, &locale),
        &locale,
        Some(&user),
    ))
}

#[derive(Deserialize)]
struct UploadPost {
    document: String,
}

async fn upload_quiz(
    State(state): State<AppState>,
    Locale(locale): Locale,
    AuthGuard(user): AuthGuard,
    Form(body): Form<UploadPost>,
) -> Result<maud::Markup, AppError> {
    require_admin(&user)?;

    let upload = match models::parse_upload(&body.document) {
        Ok(quizzes) => {
            let ids = state
                .db
                .import_quizzes(&quizzes, Some(user.id))
                .await
                .reject("could not store quizzes")?;
            admin_views::UploadState::Created(ids.len())
        }
        Err(e) => {
            tracing::info!("quiz upload rejected: {e}");
            admin_views::UploadState::Rejected(e.to_string())
        }
    };

    let quizzes = state
        .db
        .quiz_summaries()
        .await
        .reject("could not list quizzes")?;
    Ok(admin_views::dashboard(&quizzes, upload, &locale))
}

async fn delete_quiz(
    State(state): State<AppState>,
    AuthGuard(user): AuthGuard,
    Path(quiz_id): Path<String>,
) -> Result<&'static str, AppError> {
    require_admin(&user)?;

    let deleted = state
        .db
        .delete_quiz(&quiz_id)
        .await
        .reject("could not delete quiz")?;
    if !deleted {
        return Err(AppError::NotFound);
    }

    tracing::info!("quiz {quiz_id} deleted by user {}", user.id);
    Ok("")
}
