use maud::{html, Markup};
use rust_i18n::t;

use crate::{
    db::UserProfile,
    names,
    services::google,
    views::components,
};

pub fn profile(user: &UserProfile, email_enabled: bool, locale: &str) -> Markup {
    html! {
        h1 { (t!("profile.title", locale = locale)) }
        article.profile-card {
            header.profile-header {
                (components::avatar(user.photo_url.as_deref(), &user.display_name, &user.email))
                div {
                    h2 { (user.display_name) }
                    p { (user.email) }
                }
            }
            dl {
                dt { (t!("profile.email_status", locale = locale)) }
                dd id="email-status" {
                    @if user.email_verified {
                        span.verified { (t!("profile.verified", locale = locale)) }
                    } @else {
                        span.unverified { (t!("profile.unverified", locale = locale)) }
                        @if email_enabled {
                            " "
                            button.outline
                                hx-post=(names::RESEND_VERIFICATION_URL)
                                hx-target="this"
                                hx-swap="outerHTML" {
                                (t!("profile.resend", locale = locale))
                            }
                        }
                    }
                }
                dt { (t!("profile.member_since", locale = locale)) }
                dd { (member_since(user)) }
                dt { (t!("profile.login_methods", locale = locale)) }
                dd {
                    ul.login-methods {
                        @for provider in &user.providers {
                            li { (provider_label(provider, locale)) }
                        }
                    }
                }
            }
        }
    }
}

/// `16 October 2026`.
pub fn member_since(user: &UserProfile) -> String {
    user.created_at.format("%-d %B %Y").to_string()
}

fn provider_label(provider: &str, locale: &str) -> String {
    match provider {
        google::PROVIDER => t!("profile.provider_google", locale = locale).to_string(),
        crate::db::PASSWORD_PROVIDER => t!("profile.provider_password", locale = locale).to_string(),
        other => other.to_string(),
    }
}
