use maud::{html, Markup};
use rust_i18n::t;

use crate::{db::QuizSummary, names, views::components};

/// Outcome of the last upload, shown above the upload form.
pub enum UploadState {
    NoUpload,
    Created(usize),
    Rejected(String),
}

pub fn dashboard(quizzes: &[QuizSummary], upload: UploadState, locale: &str) -> Markup {
    html! {
        h1 { (t!("admin.title", locale = locale)) }
        div id="admin-dashboard" {
            (quiz_table(quizzes, locale))
            (upload_form(upload, locale))
        }
    }
}

fn quiz_table(quizzes: &[QuizSummary], locale: &str) -> Markup {
    html! {
        article {
            header { h2 { (t!("admin.quizzes", locale = locale)) } }
            @if quizzes.is_empty() {
                p { (t!("admin.no_quizzes", locale = locale)) }
            } @else {
                table {
                    thead { tr {
                        th { (t!("admin.quiz_title", locale = locale)) }
                        th { (t!("admin.question_count", locale = locale)) }
                        th { (t!("admin.author", locale = locale)) }
                        th {}
                    } }
                    tbody {
                        @for quiz in quizzes {
                            tr data-quiz-id=(quiz.id) {
                                td { (quiz.title) }
                                td { (quiz.question_count) }
                                td { (quiz.author.as_deref().unwrap_or("-")) }
                                td {
                                    button.secondary.outline
                                        hx-delete=(names::admin_quiz_url(&quiz.id))
                                        hx-confirm=(t!("admin.confirm_delete", locale = locale, title = quiz.title))
                                        hx-target="closest tr"
                                        hx-swap="outerHTML" {
                                        (t!("admin.delete", locale = locale))
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

fn upload_form(upload: UploadState, locale: &str) -> Markup {
    let error = match &upload {
        UploadState::Rejected(message) => Some(message.as_str()),
        _ => None,
    };

    html! {
        article {
            header { h2 { (t!("admin.upload_title", locale = locale)) } }
            p { (t!("admin.upload_desc", locale = locale)) }
            @if let UploadState::Created(count) = upload {
                p.upload-ok role="status" { (t!("admin.upload_ok", locale = locale, count = count)) }
            }
            form hx-post=(names::ADMIN_QUIZZES_URL) hx-target="#admin-dashboard" hx-select="#admin-dashboard" hx-swap="outerHTML" {
                textarea name="document"
                    rows="12"
                    required="true"
                    placeholder=r#"{"title": "...", "questions": [{"questionText": "...", "options": ["a", "b", "c", "d"], "correctAnswer": "a", "explanation": "..."}]}"#
                    aria-invalid=[error.map(|_| "true")] {}
                (components::form_error(error))
                button type="submit" { (t!("admin.upload_btn", locale = locale)) }
            }
        }
    }
}
