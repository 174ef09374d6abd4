use axum::{extract::State, routing::get, Router};

use crate::{
    extractors::{AuthGuard, IsHtmx, Locale},
    names,
    rejections::{AppError, ResultExt},
    views::{self, profile as profile_views, Section},
    AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new().route(names::PROFILE_URL, get(profile))
}

async fn profile(
    State(state): State<AppState>,
    IsHtmx(is_htmx): IsHtmx,
    Locale(locale): Locale,
    AuthGuard(user): AuthGuard,
) -> Result<maud::Markup, AppError> {
    let profile = state
        .db
        .user_profile(user.id)
        .await
        .reject("could not load profile")?
        .ok_or(AppError::Unauthorized)?;

    Ok(views::render(
        is_htmx,
        "Profile",
        Section::Profile,
        profile_views::profile(&profile, state.auth.email_enabled(), &locale),
        &locale,
        Some(&user),
    ))
}
