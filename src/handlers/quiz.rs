use axum::{
    extract::{Form, State},
    http::{header::SET_COOKIE, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use axum_extra::extract::CookieJar;
use serde::Deserialize;

use crate::{
    extractors::{IsHtmx, Locale, MaybeUser},
    handlers::hx_redirect,
    names,
    quiz::{day_of_year, QuizRun, QuizSet, Submission},
    rejections::{AppError, ResultExt},
    services::daily_quiz::DailyQuiz,
    utils,
    views::{self, quiz as quiz_views, Section},
    AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(names::QUIZ_URL, get(quiz_page))
        .route(names::QUIZ_ANSWER_URL, post(answer))
        .route(names::QUIZ_NEXT_URL, post(next))
        .route(names::QUIZ_RESTART_URL, post(restart))
}

/// Every visit starts a fresh run of today's quiz.
async fn quiz_page(
    State(state): State<AppState>,
    IsHtmx(is_htmx): IsHtmx,
    Locale(locale): Locale,
    MaybeUser(user): MaybeUser,
) -> Result<Response, AppError> {
    let today = day_of_year(chrono::Local::now().date_naive());
    let render = |body| {
        views::render(is_htmx, "Daily Quiz", Section::Quiz, body, &locale, user.as_ref())
    };

    let quiz = match state.quizzes.resolve(today).await {
        Ok(DailyQuiz::Ready(quiz)) => quiz,
        Ok(DailyQuiz::Empty) => return Ok(render(quiz_views::no_quiz(&locale)).into_response()),
        Err(e) => {
            tracing::error!("could not resolve the daily quiz: {e}");
            return Ok((
                StatusCode::INTERNAL_SERVER_ERROR,
                render(quiz_views::quiz_unavailable(&locale)),
            )
                .into_response());
        }
    };

    let run = QuizRun::new();
    let token = state
        .db
        .create_run(&quiz.id, &run)
        .await
        .reject("could not start quiz run")?;
    let cookie = utils::cookie(names::QUIZ_RUN_COOKIE_NAME, &token, state.secure_cookies)
        .reject("could not build quiz run cookie")?;

    Ok((
        [(SET_COOKIE, cookie)],
        render(quiz_views::quiz_page(&quiz, &run, &locale)),
    )
        .into_response())
}

struct ActiveRun {
    token: String,
    quiz: QuizSet,
    run: QuizRun,
    version: i64,
}

/// The run named by the cookie, `None` when it is missing or expired.
async fn active_run(state: &AppState, jar: &CookieJar) -> Result<Option<ActiveRun>, AppError> {
    let Some(token) = jar.get(names::QUIZ_RUN_COOKIE_NAME).map(|c| c.value().to_string()) else {
        return Ok(None);
    };
    load_run(state, token).await
}

async fn load_run(state: &AppState, token: String) -> Result<Option<ActiveRun>, AppError> {
    let Some(stored) = state.db.get_run(&token).await.reject("could not load quiz run")? else {
        return Ok(None);
    };
    let Some(quiz) = state.db.get_quiz(&stored.quiz_id).await.reject("could not load quiz")? else {
        return Ok(None);
    };
    Ok(Some(ActiveRun {
        token,
        quiz,
        run: stored.run,
        version: stored.version,
    }))
}

/// Loads the run, applies `transition` and stores the result before
/// re-rendering the quiz card. When a concurrent request saved first, the
/// transition is dropped and the stored state is shown instead.
async fn step(
    state: &AppState,
    jar: &CookieJar,
    locale: &str,
    transition: impl FnOnce(&mut QuizRun, &QuizSet),
) -> Result<Response, AppError> {
    let Some(ActiveRun {
        token,
        quiz,
        mut run,
        version,
    }) = active_run(state, jar).await?
    else {
        return Ok(hx_redirect(names::QUIZ_URL, Vec::new()).into_response());
    };

    transition(&mut run, &quiz);
    let saved = state
        .db
        .save_run(&token, version, &run)
        .await
        .reject("could not save quiz run")?;
    if saved {
        return Ok(quiz_views::quiz_card(&quiz, &run, locale).into_response());
    }

    tracing::debug!("quiz run changed concurrently, showing the stored state");
    match load_run(state, token).await? {
        Some(current) => {
            Ok(quiz_views::quiz_card(&current.quiz, &current.run, locale).into_response())
        }
        None => Ok(hx_redirect(names::QUIZ_URL, Vec::new()).into_response()),
    }
}

#[derive(Deserialize)]
struct AnswerPost {
    option: String,
}

async fn answer(
    State(state): State<AppState>,
    jar: CookieJar,
    Locale(locale): Locale,
    Form(body): Form<AnswerPost>,
) -> Result<Response, AppError> {
    step(&state, &jar, &locale, |run, quiz| {
        if run.submit_answer(quiz, &body.option) == Submission::Ignored {
            tracing::debug!("answer ignored outside the answering phase");
        }
    })
    .await
}

async fn next(
    State(state): State<AppState>,
    jar: CookieJar,
    Locale(locale): Locale,
) -> Result<Response, AppError> {
    step(&state, &jar, &locale, |run, quiz| {
        run.advance(quiz);
    })
    .await
}

async fn restart(
    State(state): State<AppState>,
    jar: CookieJar,
    Locale(locale): Locale,
) -> Result<Response, AppError> {
    step(&state, &jar, &locale, |run, _| run.restart()).await
}
