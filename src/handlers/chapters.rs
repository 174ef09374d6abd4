use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};

use crate::{
    content::ContentError,
    extractors::{IsHtmx, Locale, MaybeUser},
    names,
    rejections::AppError,
    views::{
        self,
        chapters::{self as chapter_views, ContentFailure},
        Section,
    },
    AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(names::CHAPTERS_URL, get(chapter_list))
        .route("/chapters/{chapter}", get(chapter_detail))
        .route("/chapters/{chapter}/verses/{verse}", get(verse_detail))
}

/// Maps a content failure to the status and error panel of the page.
fn content_failure(error: ContentError) -> Result<(StatusCode, ContentFailure), AppError> {
    match error {
        ContentError::MissingKey => Ok((StatusCode::SERVICE_UNAVAILABLE, ContentFailure::NotConfigured)),
        ContentError::InvalidReference => Err(AppError::NotFound),
        ContentError::Status(status) if status == StatusCode::NOT_FOUND => Err(AppError::NotFound),
        e => {
            tracing::error!("content API request failed: {e}");
            Ok((StatusCode::BAD_GATEWAY, ContentFailure::Unavailable))
        }
    }
}

struct Page<'a> {
    is_htmx: bool,
    locale: &'a str,
    user: Option<&'a crate::db::AuthUser>,
}

impl Page<'_> {
    fn render(&self, title: &str, body: maud::Markup) -> maud::Markup {
        views::render(self.is_htmx, title, Section::Chapters, body, self.locale, self.user)
    }

    fn failure(&self, error: ContentError) -> Result<Response, AppError> {
        let (status, failure) = content_failure(error)?;
        Ok((
            status,
            self.render("Chapters", chapter_views::content_error(failure, self.locale)),
        )
            .into_response())
    }
}

async fn chapter_list(
    State(state): State<AppState>,
    IsHtmx(is_htmx): IsHtmx,
    Locale(locale): Locale,
    MaybeUser(user): MaybeUser,
) -> Result<Response, AppError> {
    let page = Page { is_htmx, locale: &locale, user: user.as_ref() };

    match state.content.chapters().await {
        Ok(mut chapters) => {
            chapters.sort_by_key(|c| c.chapter_number);
            Ok(page
                .render("Chapters", chapter_views::chapter_list(&chapters, &locale))
                .into_response())
        }
        Err(e) => page.failure(e),
    }
}

async fn chapter_detail(
    State(state): State<AppState>,
    IsHtmx(is_htmx): IsHtmx,
    Locale(locale): Locale,
    MaybeUser(user): MaybeUser,
    Path(chapter): Path<u32>,
) -> Result<Response, AppError> {
    let page = Page { is_htmx, locale: &locale, user: user.as_ref() };

    let fetched = tokio::try_join!(
        state.content.chapter(chapter),
        state.content.chapter_verses(chapter)
    );
    match fetched {
        Ok((chapter, mut verses)) => {
            verses.sort_by_key(|v| v.verse_number);
            let title = format!("{} {}", chapter.chapter_number, chapter.display_name());
            Ok(page
                .render(&title, chapter_views::chapter_detail(&chapter, &verses, &locale))
                .into_response())
        }
        Err(e) => page.failure(e),
    }
}

async fn verse_detail(
    State(state): State<AppState>,
    IsHtmx(is_htmx): IsHtmx,
    Locale(locale): Locale,
    MaybeUser(user): MaybeUser,
    Path((chapter, verse)): Path<(u32, u32)>,
) -> Result<Response, AppError> {
    let page = Page { is_htmx, locale: &locale, user: user.as_ref() };

    let fetched = tokio::try_join!(
        state.content.chapter(chapter),
        state.content.verse(chapter, verse)
    );
    match fetched {
        Ok((chapter_info, verse)) => {
            if verse.verse_number > chapter_info.verses_count {
                return Err(AppError::NotFound);
            }
            let title = format!("{}.{}", chapter, verse.verse_number);
            Ok(page
                .render(
                    &title,
                    chapter_views::verse_detail(&verse, chapter_info.verses_count, &locale),
                )
                .into_response())
        }
        Err(e) => page.failure(e),
    }
}
