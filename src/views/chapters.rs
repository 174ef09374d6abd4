use maud::{html, Markup, PreEscaped};
use rust_i18n::t;

use crate::{
    content::{neighbours, Chapter, Verse},
    names,
};

/// Why a content page could not be rendered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContentFailure {
    NotConfigured,
    Unavailable,
}

pub fn content_error(failure: ContentFailure, locale: &str) -> Markup {
    html! {
        article.content-error role="alert" {
            @match failure {
                ContentFailure::NotConfigured => {
                    h2 { (t!("chapters.not_configured_title", locale = locale)) }
                    p { (t!("chapters.not_configured_desc", locale = locale)) }
                },
                ContentFailure::Unavailable => {
                    h2 { (t!("chapters.unavailable_title", locale = locale)) }
                    p { (t!("chapters.unavailable_desc", locale = locale)) }
                },
            }
        }
    }
}

pub fn chapter_list(chapters: &[Chapter], locale: &str) -> Markup {
    html! {
        h1 { (t!("chapters.title", locale = locale)) }
        div.chapter-grid {
            @for chapter in chapters {
                a.chapter-card href=(names::chapter_url(chapter.chapter_number)) {
                    article {
                        header {
                            span.chapter-number {
                                (t!("chapters.chapter_n", locale = locale, n = chapter.chapter_number))
                            }
                            small {
                                (t!("chapters.verse_count", locale = locale, count = chapter.verses_count))
                            }
                        }
                        h3 { (chapter.display_name()) }
                        p.transliteration { (chapter.name_transliterated) }
                        p.summary { (summary_excerpt(&chapter.chapter_summary)) }
                    }
                }
            }
        }
    }
}

/// First sentence-ish slice of a chapter summary for the list cards.
fn summary_excerpt(summary: &str) -> String {
    const MAX_CHARS: usize = 160;
    if summary.chars().count() <= MAX_CHARS {
        return summary.to_string();
    }
    let cut: String = summary.chars().take(MAX_CHARS).collect();
    match cut.rfind(' ') {
        Some(idx) => format!("{}...", &cut[..idx]),
        None => format!("{cut}..."),
    }
}

pub fn chapter_detail(chapter: &Chapter, verses: &[Verse], locale: &str) -> Markup {
    html! {
        nav aria-label="breadcrumb" {
            ul {
                li { a href=(names::CHAPTERS_URL) { (t!("nav.chapters", locale = locale)) } }
                li { (t!("chapters.chapter_n", locale = locale, n = chapter.chapter_number)) }
            }
        }
        header.chapter-header {
            h1 { (chapter.display_name()) }
            p.sanskrit lang="sa" { (chapter.name) }
            p.transliteration { (chapter.name_transliterated) }
            @if !chapter.name_meaning.is_empty() {
                p { em { (chapter.name_meaning) } }
            }
            p { (chapter.chapter_summary) }
        }
        section.verse-list {
            h2 { (t!("chapters.verses", locale = locale)) }
            @for verse in verses {
                article.verse-item {
                    a href=(names::verse_url(verse.chapter_number, verse.verse_number)) {
                        strong {
                            (t!("chapters.verse_n", locale = locale, n = verse.verse_number))
                        }
                    }
                    p.sanskrit lang="sa" { (multiline(&verse.text)) }
                    @if let Some(translation) = preferred_translation(verse, locale) {
                        p { (translation) }
                    }
                }
            }
        }
    }
}

pub fn verse_detail(verse: &Verse, verses_count: u32, locale: &str) -> Markup {
    let chapter = verse.chapter_number;
    let (prev, next) = neighbours(verse.verse_number, verses_count);

    html! {
        nav aria-label="breadcrumb" {
            ul {
                li { a href=(names::CHAPTERS_URL) { (t!("nav.chapters", locale = locale)) } }
                li {
                    a href=(names::chapter_url(chapter)) {
                        (t!("chapters.chapter_n", locale = locale, n = chapter))
                    }
                }
                li { (t!("chapters.verse_n", locale = locale, n = verse.verse_number)) }
            }
        }
        article.verse-detail data-chapter=(chapter) data-verse=(verse.verse_number) {
            h1 { (chapter) "." (verse.verse_number) }
            p.sanskrit lang="sa" { (multiline(&verse.text)) }
            @if !verse.transliteration.is_empty() {
                h3 { (t!("chapters.transliteration", locale = locale)) }
                p.transliteration { (multiline(&verse.transliteration)) }
            }
            @if !verse.word_meanings.is_empty() {
                h3 { (t!("chapters.word_meanings", locale = locale)) }
                p { (verse.word_meanings) }
            }
            @if !verse.translations.is_empty() {
                h3 { (t!("chapters.translations", locale = locale)) }
                @for translation in &verse.translations {
                    blockquote lang=(language_tag(&translation.language)) {
                        (translation.description)
                        footer { cite { (translation.author_name) } }
                    }
                }
            }
            @if !verse.commentaries.is_empty() {
                details {
                    summary { (t!("chapters.commentaries", locale = locale)) }
                    @for commentary in &verse.commentaries {
                        blockquote lang=(language_tag(&commentary.language)) {
                            (commentary.description)
                            footer { cite { (commentary.author_name) } }
                        }
                    }
                }
            }
        }
        nav.verse-nav {
            @if let Some(prev) = prev {
                a.prev-verse.outline role="button" href=(names::verse_url(chapter, prev)) {
                    "← " (t!("chapters.previous_verse", locale = locale))
                }
            }
            @if let Some(next) = next {
                a.next-verse.outline role="button" href=(names::verse_url(chapter, next)) {
                    (t!("chapters.next_verse", locale = locale)) " →"
                }
            }
        }
    }
}

/// The translation in the reader's language, falling back to English.
fn preferred_translation<'v>(verse: &'v Verse, locale: &str) -> Option<&'v str> {
    let wanted = language_name(locale);
    verse
        .translations
        .iter()
        .find(|t| t.language.eq_ignore_ascii_case(wanted))
        .or_else(|| {
            verse
                .translations
                .iter()
                .find(|t| t.language.eq_ignore_ascii_case("english"))
        })
        .or_else(|| verse.translations.first())
        .map(|t| t.description.as_str())
}

fn language_name(locale: &str) -> &'static str {
    match locale {
        "hi" => "hindi",
        _ => "english",
    }
}

fn language_tag(language: &str) -> &'static str {
    if language.eq_ignore_ascii_case("hindi") {
        "hi"
    } else {
        "en"
    }
}

/// Keeps the line breaks of a shloka. Each line is escaped before joining.
fn multiline(text: &str) -> Markup {
    let lines: Vec<String> = text
        .trim()
        .lines()
        .map(|line| html! { (line.trim()) }.into_string())
        .collect();
    PreEscaped(lines.join("<br>"))
}
