//! Daily quiz domain: quiz documents, the quiz-of-the-day selector and the
//! runner state machine.

pub mod runner;
pub mod selector;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use runner::{Phase, QuizRun, Submission};
pub use selector::{day_of_year, quiz_index_for_day};

pub const OPTIONS_PER_QUESTION: usize = 4;

/// One day's quiz: a titled, ordered list of questions.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QuizSet {
    pub id: String,
    pub title: String,
    pub questions: Vec<QuizQuestion>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub id: Option<String>,
    pub question_text: String,
    pub options: Vec<String>,
    pub correct_answer: String,
    pub explanation: Option<String>,
}

/// A problem found while validating a quiz document before it is stored.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuizProblem {
    #[error("the quiz has no title")]
    EmptyTitle,
    #[error("the quiz has no questions")]
    NoQuestions,
    #[error("question {} has no text", .position + 1)]
    EmptyQuestion { position: usize },
    #[error("question {} has {found} options, expected {}", .position + 1, OPTIONS_PER_QUESTION)]
    WrongOptionCount { position: usize, found: usize },
    #[error("question {} repeats an option", .position + 1)]
    DuplicateOption { position: usize },
    #[error("the correct answer of question {} is not one of its options", .position + 1)]
    AnswerNotInOptions { position: usize },
}

impl QuizQuestion {
    pub fn is_correct(&self, option: &str) -> bool {
        self.correct_answer == option
    }

    fn validate(&self, position: usize) -> Result<(), QuizProblem> {
        if self.question_text.trim().is_empty() {
            return Err(QuizProblem::EmptyQuestion { position });
        }
        if self.options.len() != OPTIONS_PER_QUESTION {
            return Err(QuizProblem::WrongOptionCount {
                position,
                found: self.options.len(),
            });
        }
        let mut seen: Vec<&str> = Vec::with_capacity(self.options.len());
        for opt in &self.options {
            if seen.contains(&opt.as_str()) {
                return Err(QuizProblem::DuplicateOption { position });
            }
            seen.push(opt);
        }
        // With distinct options, a match here is exactly one match.
        if !seen.contains(&self.correct_answer.as_str()) {
            return Err(QuizProblem::AnswerNotInOptions { position });
        }
        Ok(())
    }
}

impl QuizSet {
    pub fn question(&self, idx: usize) -> Option<&QuizQuestion> {
        self.questions.get(idx)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Checks the invariants the runner relies on: four distinct options per
    /// question, one of which is the declared correct answer.
    pub fn validate(&self) -> Result<(), QuizProblem> {
        if self.title.trim().is_empty() {
            return Err(QuizProblem::EmptyTitle);
        }
        if self.questions.is_empty() {
            return Err(QuizProblem::NoQuestions);
        }
        self.questions
            .iter()
            .enumerate()
            .try_for_each(|(position, q)| q.validate(position))
    }
}

#[cfg(test)]
pub(crate) fn sample_question(text: &str, options: [&str; 4], answer: &str) -> QuizQuestion {
    QuizQuestion {
        id: None,
        question_text: text.to_string(),
        options: options.iter().map(|o| o.to_string()).collect(),
        correct_answer: answer.to_string(),
        explanation: None,
    }
}
