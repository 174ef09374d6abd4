use serde::Deserialize;
use thiserror::Error;

use crate::quiz::{QuizProblem, QuizQuestion, QuizSet};

/// A quiz document as uploaded through the admin dashboard or a seed file.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizDocument {
    pub title: String,
    pub questions: Vec<QuestionDocument>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionDocument {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(alias = "question")]
    pub question_text: String,
    pub options: Vec<String>,
    #[serde(alias = "answer")]
    pub correct_answer: String,
    #[serde(default)]
    pub explanation: Option<String>,
}

pub type QuizDocuments = Vec<QuizDocument>;

/// An upload holds either one quiz document or an array of them.
#[derive(Deserialize)]
#[serde(untagged)]
enum Upload {
    Many(QuizDocuments),
    One(QuizDocument),
}

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("not a quiz document: {0}")]
    Json(#[source] serde_json::Error),
    #[error("the upload contains no quizzes")]
    Empty,
    #[error("{}", invalid_message(.title, .problem))]
    Invalid { title: String, problem: QuizProblem },
}

fn invalid_message(title: &str, problem: &QuizProblem) -> String {
    if title.trim().is_empty() {
        problem.to_string()
    } else {
        format!("{title}: {problem}")
    }
}

/// Parses and validates quiz documents. The first invalid document rejects
/// the whole upload. Returned sets have an empty id until stored.
pub fn parse_upload(json: &str) -> Result<Vec<QuizSet>, UploadError> {
    let documents = match serde_json::from_str(json).map_err(UploadError::Json)? {
        Upload::Many(documents) => documents,
        Upload::One(document) => vec![document],
    };
    if documents.is_empty() {
        return Err(UploadError::Empty);
    }

    documents
        .into_iter()
        .map(|doc| {
            let quiz = doc.into_quiz_set(String::new());
            match quiz.validate() {
                Ok(()) => Ok(quiz),
                Err(problem) => Err(UploadError::Invalid {
                    title: quiz.title,
                    problem,
                }),
            }
        })
        .collect()
}

impl QuizDocument {
    /// Converts the upload into a quiz set; `id` is assigned by the store.
    pub fn into_quiz_set(self, id: String) -> QuizSet {
        QuizSet {
            id,
            title: self.title.trim().to_string(),
            questions: self
                .questions
                .into_iter()
                .map(|q| QuizQuestion {
                    id: q.id,
                    question_text: q.question_text,
                    options: q.options,
                    correct_answer: q.correct_answer,
                    explanation: q.explanation.filter(|e| !e.trim().is_empty()),
                })
                .collect(),
        }
    }
}
