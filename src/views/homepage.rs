use maud::{html, Markup};
use rust_i18n::t;

use crate::{db::AuthUser, names};

pub fn landing(user: Option<&AuthUser>, locale: &str) -> Markup {
    html! {
        section.landing-hero {
            h1 { (t!("landing.tagline", locale = locale)) }
            p.landing-hero-desc { (t!("landing.description", locale = locale)) }
            div.landing-cta {
                a role="button" href=(names::CHAPTERS_URL) {
                    (t!("landing.browse_chapters", locale = locale))
                }
                a role="button" href=(names::QUIZ_URL) class="secondary" {
                    (t!("landing.daily_quiz", locale = locale))
                }
            }
        }

        section.landing-features {
            div.landing-features-grid {
                article.landing-feature-card {
                    h3 { (t!("landing.feature_chapters_title", locale = locale)) }
                    p { (t!("landing.feature_chapters_desc", locale = locale)) }
                }
                article.landing-feature-card {
                    h3 { (t!("landing.feature_quiz_title", locale = locale)) }
                    p { (t!("landing.feature_quiz_desc", locale = locale)) }
                }
                article.landing-feature-card {
                    h3 { (t!("landing.feature_profile_title", locale = locale)) }
                    p { (t!("landing.feature_profile_desc", locale = locale)) }
                }
            }
        }

        @match user {
            Some(user) => {
                p.landing-welcome {
                    (t!("landing.welcome_back", locale = locale, name = user.display_name))
                }
            },
            None => {
                section.landing-bottom-cta {
                    p { (t!("landing.sign_up_desc", locale = locale)) }
                    a role="button" href=(names::REGISTER_URL) {
                        (t!("landing.sign_up", locale = locale))
                    }
                    " "
                    a role="button" href=(names::LOGIN_URL) class="outline" {
                        (t!("landing.log_in", locale = locale))
                    }
                }
            },
        }
    }
}
