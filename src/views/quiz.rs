use maud::{html, Markup};
use rust_i18n::t;

use crate::{
    names,
    quiz::{Phase, QuizRun, QuizSet},
};

fn phase_name(phase: &Phase) -> &'static str {
    match phase {
        Phase::Answering => "answering",
        Phase::Explaining { .. } => "explaining",
        Phase::Result => "result",
    }
}

pub fn quiz_page(quiz: &QuizSet, run: &QuizRun, locale: &str) -> Markup {
    html! {
        h1 { (t!("quiz.title", locale = locale)) }
        p.quiz-set-title { (quiz.title) }
        (quiz_card(quiz, run, locale))
    }
}

/// No quiz documents have been loaded yet.
pub fn no_quiz(locale: &str) -> Markup {
    html! {
        h1 { (t!("quiz.title", locale = locale)) }
        article id="quiz-card" data-phase="empty" {
            p { (t!("quiz.no_quiz", locale = locale)) }
        }
    }
}

pub fn quiz_unavailable(locale: &str) -> Markup {
    html! {
        h1 { (t!("quiz.title", locale = locale)) }
        article id="quiz-card" data-phase="error" role="alert" {
            p { (t!("quiz.unavailable", locale = locale)) }
            a role="button" href=(names::QUIZ_URL) { (t!("quiz.try_again", locale = locale)) }
        }
    }
}

/// The swappable part of the quiz page. Every transition re-renders it.
pub fn quiz_card(quiz: &QuizSet, run: &QuizRun, locale: &str) -> Markup {
    let total = quiz.len();

    html! {
        article id="quiz-card" data-phase=(phase_name(run.phase())) data-score=(run.score()) {
            @match (run.phase(), run.current_question(quiz)) {
                (Phase::Result, _) => {
                    header { h2 { (t!("quiz.result_title", locale = locale)) } }
                    p.quiz-score {
                        (t!("quiz.final_score", locale = locale, score = run.score(), total = total))
                    }
                    button
                        hx-post=(names::QUIZ_RESTART_URL)
                        hx-target="#quiz-card"
                        hx-swap="outerHTML" {
                        (t!("quiz.restart", locale = locale))
                    }
                },
                (_, None) => {
                    p { (t!("quiz.no_questions", locale = locale)) }
                },
                (phase, Some(question)) => {
                    header {
                        small.quiz-progress {
                            (t!("quiz.progress", locale = locale, current = run.index() + 1, total = total))
                        }
                        small.quiz-running-score {
                            (t!("quiz.score", locale = locale, score = run.score()))
                        }
                    }
                    h2.question-text { (question.question_text) }
                    div.quiz-options {
                        @for option in &question.options {
                            @match phase {
                                Phase::Explaining { selected, .. } => {
                                    @let class = option_class(option, selected, &question.correct_answer);
                                    button.quiz-option.(class) disabled { (option) }
                                },
                                _ => {
                                    button.quiz-option.outline
                                        name="option"
                                        value=(option)
                                        hx-post=(names::QUIZ_ANSWER_URL)
                                        hx-target="#quiz-card"
                                        hx-swap="outerHTML" {
                                        (option)
                                    }
                                },
                            }
                        }
                    }
                    @if let Phase::Explaining { correct, .. } = phase {
                        div.quiz-feedback {
                            @if *correct {
                                p.feedback-correct { (t!("quiz.correct", locale = locale)) }
                            } @else {
                                p.feedback-incorrect {
                                    (t!("quiz.incorrect", locale = locale, answer = question.correct_answer))
                                }
                            }
                            @if let Some(explanation) = &question.explanation {
                                p.quiz-explanation { (explanation) }
                            }
                        }
                        button
                            hx-post=(names::QUIZ_NEXT_URL)
                            hx-target="#quiz-card"
                            hx-swap="outerHTML" {
                            @if run.index() + 1 < total {
                                (t!("quiz.next", locale = locale))
                            } @else {
                                (t!("quiz.see_result", locale = locale))
                            }
                        }
                    }
                },
            }
        }
    }
}

fn option_class(option: &str, selected: &str, correct_answer: &str) -> &'static str {
    if option == correct_answer {
        "option-correct"
    } else if option == selected {
        "option-wrong"
    } else {
        "option-idle"
    }
}
