use axum::{
    extract::{Form, State},
    http::{header::SET_COOKIE, HeaderMap, HeaderValue},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use serde::Deserialize;

use crate::{
    extractors::{match_supported_locale, IsHtmx, Locale, MaybeUser},
    names,
    rejections::{AppError, ResultExt},
    utils,
    views::{self, homepage as homepage_views, Section},
    AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(names::HOME_URL, get(homepage))
        .route(names::SET_LOCALE_URL, post(set_locale))
}

async fn homepage(
    IsHtmx(is_htmx): IsHtmx,
    Locale(locale): Locale,
    MaybeUser(user): MaybeUser,
) -> maud::Markup {
    views::render(
        is_htmx,
        "Bhagavad Gita",
        Section::Home,
        homepage_views::landing(user.as_ref(), &locale),
        &locale,
        user.as_ref(),
    )
}

#[derive(Deserialize)]
struct SetLocaleBody {
    locale: String,
}

async fn set_locale(
    State(state): State<AppState>,
    Form(body): Form<SetLocaleBody>,
) -> Result<impl IntoResponse, AppError> {
    let locale = match_supported_locale(&body.locale).unwrap_or(names::DEFAULT_LOCALE);
    let cookie = utils::cookie(names::LOCALE_COOKIE_NAME, locale, state.secure_cookies)
        .reject("could not build locale cookie")?;
    let mut headers = HeaderMap::new();
    headers.insert(SET_COOKIE, cookie);
    headers.insert("HX-Refresh", HeaderValue::from_static("true"));

    Ok((headers, ""))
}
