use axum::{
    extract::{Form, Path, Query, State},
    http::header::SET_COOKIE,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
    Router,
};
use axum_extra::extract::CookieJar;
use serde::Deserialize;
use ulid::Ulid;

use crate::{
    extractors::{AuthGuard, IsHtmx, Locale, MaybeUser},
    handlers::hx_redirect,
    names,
    rejections::{AppError, ResultExt},
    services::auth::{FederatedOutcome, LoginOutcome, RegisterOutcome},
    utils,
    views::{self, auth as auth_views, Section},
    AppState,
};

const OAUTH_STATE_MAX_AGE: u32 = 10 * 60;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(names::LOGIN_URL, get(login_page).post(login_post))
        .route(names::REGISTER_URL, get(register_page).post(register_post))
        .route(names::LOGOUT_URL, post(logout_post))
        .route(names::GOOGLE_LOGIN_URL, get(google_login))
        .route(names::GOOGLE_CALLBACK_URL, get(google_callback))
        .route("/verify-email/{token}", get(verify_email))
        .route(names::RESEND_VERIFICATION_URL, post(resend_verification))
}

async fn login_page(
    State(state): State<AppState>,
    IsHtmx(is_htmx): IsHtmx,
    Locale(locale): Locale,
    MaybeUser(user): MaybeUser,
) -> Response {
    if user.is_some() {
        return Redirect::to(names::CHAPTERS_URL).into_response();
    }
    views::render(
        is_htmx,
        "Log In",
        Section::Account,
        auth_views::login(auth_views::LoginState::NoError, state.google.is_some(), &locale),
        &locale,
        None,
    )
    .into_response()
}

async fn register_page(
    State(state): State<AppState>,
    IsHtmx(is_htmx): IsHtmx,
    Locale(locale): Locale,
    MaybeUser(user): MaybeUser,
) -> Response {
    if user.is_some() {
        return Redirect::to(names::CHAPTERS_URL).into_response();
    }
    views::render(
        is_htmx,
        "Register",
        Section::Account,
        auth_views::register(auth_views::RegisterState::NoError, state.google.is_some(), &locale),
        &locale,
        None,
    )
    .into_response()
}

#[derive(Deserialize)]
struct LoginPost {
    email: String,
    password: String,
}

async fn login_post(
    State(state): State<AppState>,
    Locale(locale): Locale,
    Form(body): Form<LoginPost>,
) -> Result<Response, AppError> {
    let outcome = state
        .auth
        .login(&body.email, &body.password)
        .await
        .reject("login failed")?;

    let login_state = match outcome {
        LoginOutcome::Success(session_token) => {
            let cookie = utils::cookie(
                names::USER_SESSION_COOKIE_NAME,
                &session_token,
                state.secure_cookies,
            )
            .reject("could not build session cookie")?;
            return Ok(hx_redirect(names::CHAPTERS_URL, vec![cookie]).into_response());
        }
        LoginOutcome::EmptyFields => auth_views::LoginState::EmptyFields,
        LoginOutcome::InvalidCredentials => auth_views::LoginState::InvalidCredentials,
    };

    Ok(views::render(
        true,
        "Log In",
        Section::Account,
        auth_views::login(login_state, state.google.is_some(), &locale),
        &locale,
        None,
    )
    .into_response())
}

#[derive(Deserialize)]
struct RegisterPost {
    email: String,
    display_name: String,
    password: String,
}

async fn register_post(
    State(state): State<AppState>,
    Locale(locale): Locale,
    Form(body): Form<RegisterPost>,
) -> Result<Response, AppError> {
    let outcome = state
        .auth
        .register(&body.email, &body.password, &body.display_name)
        .await
        .reject("registration failed")?;

    let register_state = match outcome {
        RegisterOutcome::LoggedIn(session_token) => {
            let cookie = utils::cookie(
                names::USER_SESSION_COOKIE_NAME,
                &session_token,
                state.secure_cookies,
            )
            .reject("could not build session cookie")?;
            return Ok(hx_redirect(names::CHAPTERS_URL, vec![cookie]).into_response());
        }
        RegisterOutcome::EmptyFields => auth_views::RegisterState::EmptyFields,
        RegisterOutcome::InvalidEmail => auth_views::RegisterState::InvalidEmail,
        RegisterOutcome::EmailTaken => auth_views::RegisterState::EmailTaken,
        RegisterOutcome::WeakPassword => auth_views::RegisterState::WeakPassword,
    };

    Ok(views::render(
        true,
        "Register",
        Section::Account,
        auth_views::register(register_state, state.google.is_some(), &locale),
        &locale,
        None,
    )
    .into_response())
}

async fn logout_post(
    jar: CookieJar,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    if let Some(session_id) = jar
        .get(names::USER_SESSION_COOKIE_NAME)
        .map(|c| c.value().to_string())
    {
        state
            .auth
            .logout(&session_id)
            .await
            .reject("could not delete session")?;
    }

    let clear = utils::expired_cookie(names::USER_SESSION_COOKIE_NAME, state.secure_cookies)
        .reject("could not build clear-session cookie")?;

    Ok((hx_redirect(names::HOME_URL, vec![clear]), ""))
}

async fn google_login(State(state): State<AppState>) -> Result<Response, AppError> {
    let google = state.google.as_ref().ok_or(AppError::NotFound)?;

    let oauth_state = Ulid::new().to_string();
    let cookie = utils::cookie_with_max_age(
        names::OAUTH_STATE_COOKIE_NAME,
        &oauth_state,
        OAUTH_STATE_MAX_AGE,
        state.secure_cookies,
    )
    .reject("could not build oauth state cookie")?;

    Ok((
        [(SET_COOKIE, cookie)],
        Redirect::to(&google.authorize_url(&oauth_state)),
    )
        .into_response())
}

#[derive(Deserialize)]
struct GoogleCallback {
    code: Option<String>,
    state: Option<String>,
    error: Option<String>,
}

async fn google_callback(
    State(state): State<AppState>,
    jar: CookieJar,
    Locale(locale): Locale,
    Query(params): Query<GoogleCallback>,
) -> Result<Response, AppError> {
    let google = state.google.as_ref().ok_or(AppError::NotFound)?;
    let clear_state = utils::expired_cookie(names::OAUTH_STATE_COOKIE_NAME, state.secure_cookies)
        .reject("could not build clear-state cookie")?;

    let expected = jar.get(names::OAUTH_STATE_COOKIE_NAME).map(|c| c.value());
    let login_page = |login_state: auth_views::LoginState| {
        (
            [(SET_COOKIE, clear_state.clone())],
            views::page_with_user(
                "Log In",
                Section::Account,
                auth_views::login(login_state, true, &locale),
                &locale,
                None,
            ),
        )
            .into_response()
    };
    let failed = |reason: &str| {
        tracing::warn!("Google sign-in failed: {reason}");
        login_page(auth_views::LoginState::GoogleFailed)
    };

    if let Some(error) = &params.error {
        return Ok(failed(error));
    }
    let (Some(code), Some(returned)) = (&params.code, &params.state) else {
        return Ok(failed("missing code or state"));
    };
    if expected != Some(returned.as_str()) {
        return Ok(failed("state mismatch"));
    }

    let identity = match google.exchange(code).await {
        Ok(identity) => identity,
        Err(e) => {
            tracing::error!("Google code exchange failed: {e}");
            return Ok(failed("code exchange"));
        }
    };
    let session_token = match state
        .auth
        .login_federated(&identity)
        .await
        .reject("could not sign in with Google")?
    {
        FederatedOutcome::Success(token) => token,
        FederatedOutcome::PasswordSignInRequired => {
            return Ok(login_page(auth_views::LoginState::PasswordSignInRequired));
        }
    };
    let session = utils::cookie(
        names::USER_SESSION_COOKIE_NAME,
        &session_token,
        state.secure_cookies,
    )
    .reject("could not build session cookie")?;

    let mut response = Redirect::to(names::CHAPTERS_URL).into_response();
    let headers = response.headers_mut();
    headers.append(SET_COOKIE, session);
    headers.append(SET_COOKIE, clear_state);
    Ok(response)
}

async fn verify_email(
    State(state): State<AppState>,
    IsHtmx(is_htmx): IsHtmx,
    Locale(locale): Locale,
    MaybeUser(user): MaybeUser,
    Path(token): Path<String>,
) -> Result<maud::Markup, AppError> {
    let verified = state
        .auth
        .verify_email(&token)
        .await
        .reject("could not verify email token")?;

    Ok(views::render(
        is_htmx,
        "Email Verification",
        Section::Account,
        auth_views::email_verified(verified, &locale),
        &locale,
        user.as_ref(),
    ))
}

async fn resend_verification(
    State(state): State<AppState>,
    Locale(locale): Locale,
    AuthGuard(user): AuthGuard,
) -> Result<maud::Markup, AppError> {
    let sent = state
        .auth
        .resend_verification(&user.email)
        .await
        .reject("could not resend verification")?;

    Ok(auth_views::verification_sent(sent, &locale))
}
