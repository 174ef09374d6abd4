use maud::{html, Markup, DOCTYPE};
use rust_i18n::t;

use crate::{db::AuthUser, names, utils};

/// Top level navigation entries. Handlers pass the one they render so the
/// sidebar can mark it with `aria-current`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Section {
    Home,
    Chapters,
    Quiz,
    Profile,
    Admin,
    Account,
}

fn css() -> Markup {
    html! {
        link rel="stylesheet" href="https://cdn.jsdelivr.net/npm/@picocss/pico@2/css/pico.min.css";
        link rel="stylesheet" href="/static/index.css";
    }
}

fn js() -> Markup {
    html! {
        script src="https://unpkg.com/htmx.org@2.0.4" {}
    }
}

fn icon() -> Markup {
    html! {
        link rel="icon" href="/static/img/icon.svg" type="image/svg+xml" {}
    }
}

fn nav_item(href: &str, label: &str, section: Section, current: Section) -> Markup {
    html! {
        li {
            @if section == current {
                a href=(href) aria-current="page" { (label) }
            } @else {
                a href=(href) { (label) }
            }
        }
    }
}

fn locale_switcher(locale: &str) -> Markup {
    html! {
        form.locale-switcher hx-post=(names::SET_LOCALE_URL) {
            @for supported in names::SUPPORTED_LOCALES {
                @if *supported == locale {
                    button.outline type="submit" name="locale" value=(supported) disabled {
                        (t!("nav.language", locale = *supported))
                    }
                } @else {
                    button.outline type="submit" name="locale" value=(supported) {
                        (t!("nav.language", locale = *supported))
                    }
                }
            }
        }
    }
}

/// The sidebar, re-sent out of band on partial swaps so the marked entry
/// always matches the rendered section.
pub fn sidebar(current: Section, user: Option<&AuthUser>, locale: &str, oob: bool) -> Markup {
    html! {
        aside id="sidebar" hx-swap-oob=[oob.then_some("true")] {
            nav {
                a.brand href=(names::HOME_URL) {
                    strong { "Gitapath" }
                }
                @if let Some(user) = user {
                    p.sidebar-user { (user.display_name) }
                }
                ul {
                    (nav_item(names::HOME_URL, &t!("nav.home", locale = locale), Section::Home, current))
                    (nav_item(names::CHAPTERS_URL, &t!("nav.chapters", locale = locale), Section::Chapters, current))
                    (nav_item(names::QUIZ_URL, &t!("nav.quiz", locale = locale), Section::Quiz, current))
                    @if let Some(user) = user {
                        (nav_item(names::PROFILE_URL, &t!("nav.profile", locale = locale), Section::Profile, current))
                        @if user.is_admin {
                            (nav_item(names::ADMIN_URL, &t!("nav.admin", locale = locale), Section::Admin, current))
                        }
                        li {
                            button.secondary.outline hx-post=(names::LOGOUT_URL) {
                                (t!("nav.logout", locale = locale))
                            }
                        }
                    } @else {
                        (nav_item(names::LOGIN_URL, &t!("nav.login", locale = locale), Section::Account, current))
                    }
                }
                (locale_switcher(locale))
                small.version { "v" (utils::VERSION) }
            }
        }
    }
}

pub fn page(title: &str, body: Markup, locale: &str) -> Markup {
    page_with_user(title, Section::Home, body, locale, None)
}

pub fn page_with_user(
    title: &str,
    section: Section,
    body: Markup,
    locale: &str,
    user: Option<&AuthUser>,
) -> Markup {
    html! {
        (DOCTYPE)
        html lang=(locale) {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                meta name="color-scheme" content="light dark";

                (css())
                (js())
                (icon())

                title { (format!("{title} - Gitapath")) }
            }

            body hx-boost="true" {
                div.layout {
                    (sidebar(section, user, locale, false))
                    main.container { (body) }
                }
            }
        }
    }
}

pub fn titled(title: &str, body: Markup) -> Markup {
    html! {
        title { (title) " - Gitapath" }
        (body)
    }
}

/// Full page for normal navigation, the `main` fragment (plus an out of band
/// sidebar) for HTMX swaps.
pub fn render(
    is_htmx: bool,
    title: &str,
    section: Section,
    body: Markup,
    locale: &str,
    user: Option<&AuthUser>,
) -> Markup {
    if is_htmx {
        html! {
            (titled(title, body))
            (sidebar(section, user, locale, true))
        }
    } else {
        page_with_user(title, section, body, locale, user)
    }
}
