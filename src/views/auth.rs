use maud::{html, Markup};
use rust_i18n::t;

use crate::{names, views::components};

pub enum RegisterState {
    NoError,
    EmptyFields,
    InvalidEmail,
    EmailTaken,
    WeakPassword,
}

pub enum LoginState {
    NoError,
    EmptyFields,
    InvalidCredentials,
    GoogleFailed,
    PasswordSignInRequired,
}

fn google_button(locale: &str) -> Markup {
    html! {
        // Plain link: the OAuth dance is a full page navigation.
        a.google-login.outline.contrast role="button" href=(names::GOOGLE_LOGIN_URL) hx-boost="false" {
            (t!("auth.continue_with_google", locale = locale))
        }
    }
}

fn email_input(locale: &str) -> Markup {
    html! {
        label {
            (t!("auth.email", locale = locale))
            input name="email"
                  type="email"
                  autocomplete="email"
                  required="true"
                  placeholder=(t!("auth.email", locale = locale))
                  aria-label=(t!("auth.email", locale = locale));
        }
    }
}

pub fn login(state: LoginState, google_enabled: bool, locale: &str) -> Markup {
    let error = match state {
        LoginState::NoError => None,
        LoginState::EmptyFields => Some(t!("auth.empty_fields", locale = locale)),
        LoginState::InvalidCredentials => Some(t!("auth.invalid_credentials", locale = locale)),
        LoginState::GoogleFailed => Some(t!("auth.google_failed", locale = locale)),
        LoginState::PasswordSignInRequired => {
            Some(t!("auth.password_sign_in_required", locale = locale))
        }
    };

    html! {
        h1 { (t!("auth.welcome_back", locale = locale)) }
        p { (t!("auth.login_desc", locale = locale)) }
        article.auth-card {
            form hx-post=(names::LOGIN_URL) hx-target="main" {
                (email_input(locale))
                label {
                    (t!("auth.password", locale = locale))
                    input name="password"
                          type="password"
                          autocomplete="current-password"
                          required="true"
                          placeholder=(t!("auth.password", locale = locale))
                          aria-invalid=[error.is_some().then_some("true")]
                          aria-label=(t!("auth.password", locale = locale));
                }
                (components::form_error(error.as_deref()))
                button type="submit" { (t!("auth.login_btn", locale = locale)) }
            }
            @if google_enabled {
                (google_button(locale))
            }
            p {
                (t!("auth.no_account", locale = locale))
                " "
                a href=(names::REGISTER_URL) { (t!("auth.register_link", locale = locale)) }
            }
        }
    }
}

pub fn register(state: RegisterState, google_enabled: bool, locale: &str) -> Markup {
    let error = match state {
        RegisterState::NoError => None,
        RegisterState::EmptyFields => Some(t!("auth.empty_fields", locale = locale)),
        RegisterState::InvalidEmail => Some(t!("auth.invalid_email", locale = locale)),
        RegisterState::EmailTaken => Some(t!("auth.email_taken", locale = locale)),
        RegisterState::WeakPassword => Some(t!("auth.weak_password", locale = locale)),
    };

    html! {
        h1 { (t!("auth.register_title", locale = locale)) }
        p { (t!("auth.register_desc", locale = locale)) }
        article.auth-card {
            form hx-post=(names::REGISTER_URL) hx-target="main" {
                label {
                    (t!("auth.display_name", locale = locale))
                    input name="display_name"
                          type="text"
                          autocomplete="name"
                          required="true"
                          placeholder=(t!("auth.display_name", locale = locale))
                          aria-label=(t!("auth.display_name", locale = locale));
                }
                (email_input(locale))
                label {
                    (t!("auth.password", locale = locale))
                    input name="password"
                          type="password"
                          autocomplete="new-password"
                          required="true"
                          minlength="6"
                          placeholder=(t!("auth.password", locale = locale))
                          aria-invalid=[error.is_some().then_some("true")]
                          aria-label=(t!("auth.password", locale = locale));
                }
                (components::form_error(error.as_deref()))
                button type="submit" { (t!("auth.register_btn", locale = locale)) }
            }
            @if google_enabled {
                (google_button(locale))
            }
            p {
                (t!("auth.have_account", locale = locale))
                " "
                a href=(names::LOGIN_URL) { (t!("auth.login_link", locale = locale)) }
            }
        }
    }
}

pub fn email_verified(verified: bool, locale: &str) -> Markup {
    html! {
        @if verified {
            h1 { (t!("auth.email_verified_title", locale = locale)) }
            p { (t!("auth.email_verified_desc", locale = locale)) }
            a role="button" href=(names::CHAPTERS_URL) { (t!("nav.chapters", locale = locale)) }
        } @else {
            h1 { (t!("auth.verification_failed_title", locale = locale)) }
            p { (t!("auth.verification_failed_desc", locale = locale)) }
            a role="button" href=(names::PROFILE_URL) { (t!("nav.profile", locale = locale)) }
        }
    }
}

/// Replaces the resend button on the profile page.
pub fn verification_sent(sent: bool, locale: &str) -> Markup {
    html! {
        @if sent {
            small.verification-sent { (t!("auth.verification_sent", locale = locale)) }
        } @else {
            small.form-error { (t!("auth.verification_not_sent", locale = locale)) }
        }
    }
}
