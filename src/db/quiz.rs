use std::collections::HashMap;

use color_eyre::Result;
use sqlx::{types::Json, SqliteConnection};
use ulid::Ulid;

use super::models::{QuestionRow, QuizSummary};
use super::Db;
use crate::quiz::{QuizQuestion, QuizSet};

#[derive(sqlx::FromRow)]
struct QuizQuestionRow {
    quiz_id: String,
    #[sqlx(flatten)]
    question: QuestionRow,
}

impl Db {
    /// Insert a quiz document with its ordered questions in one transaction.
    /// Returns the id (ULID) of the new quiz.
    pub async fn create_quiz(
        &self,
        title: &str,
        questions: &[QuizQuestion],
        author_id: Option<i32>,
    ) -> Result<String> {
        let mut tx = self.pool.begin().await?;
        let quiz_id = insert_quiz(&mut *tx, title, questions, author_id).await?;
        tx.commit().await?;
        Ok(quiz_id)
    }

    /// Stores already validated quiz sets, returning their new ids. Either
    /// every set is stored or none is.
    pub async fn import_quizzes(
        &self,
        quizzes: &[QuizSet],
        author_id: Option<i32>,
    ) -> Result<Vec<String>> {
        let mut tx = self.pool.begin().await?;
        let mut ids = Vec::with_capacity(quizzes.len());
        for quiz in quizzes {
            ids.push(insert_quiz(&mut *tx, &quiz.title, &quiz.questions, author_id).await?);
        }
        tx.commit().await?;
        Ok(ids)
    }

    pub async fn count_quizzes(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM quizzes")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Every quiz document with its questions, in insertion order.
    pub async fn list_quizzes(&self) -> Result<Vec<QuizSet>> {
        let quizzes: Vec<(String, String)> =
            sqlx::query_as("SELECT id, title FROM quizzes ORDER BY rowid")
                .fetch_all(&self.pool)
                .await?;

        let rows = sqlx::query_as::<_, QuizQuestionRow>(
            r#"
            SELECT quiz_id, external_id, question_text, options, correct_answer, explanation
            FROM quiz_questions
            ORDER BY quiz_id, position
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let mut questions: HashMap<String, Vec<QuizQuestion>> = HashMap::new();
        for row in rows {
            questions
                .entry(row.quiz_id)
                .or_default()
                .push(row.question.into());
        }

        Ok(quizzes
            .into_iter()
            .map(|(id, title)| QuizSet {
                questions: questions.remove(&id).unwrap_or_default(),
                id,
                title,
            })
            .collect())
    }

    pub async fn get_quiz(&self, quiz_id: &str) -> Result<Option<QuizSet>> {
        let title: Option<String> = sqlx::query_scalar("SELECT title FROM quizzes WHERE id = ?")
            .bind(quiz_id)
            .fetch_optional(&self.pool)
            .await?;

        let Some(title) = title else {
            return Ok(None);
        };

        let questions = sqlx::query_as::<_, QuestionRow>(
            r#"
            SELECT external_id, question_text, options, correct_answer, explanation
            FROM quiz_questions
            WHERE quiz_id = ?
            ORDER BY position
            "#,
        )
        .bind(quiz_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(QuizSet {
            id: quiz_id.to_string(),
            title,
            questions: questions.into_iter().map(Into::into).collect(),
        }))
    }

    pub async fn quiz_summaries(&self) -> Result<Vec<QuizSummary>> {
        let quizzes = sqlx::query_as::<_, QuizSummary>(
            r#"
            SELECT
              quizzes.id AS id,
              quizzes.title AS title,
              COUNT(quiz_questions.id) AS question_count,
              users.display_name AS author
            FROM
              quizzes
              LEFT JOIN quiz_questions ON quiz_questions.quiz_id = quizzes.id
              LEFT JOIN users ON users.id = quizzes.author_id
            GROUP BY
              quizzes.rowid, quizzes.id, quizzes.title, users.display_name
            ORDER BY
              quizzes.rowid DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(quizzes)
    }

    /// Returns `false` when no quiz had that id.
    pub async fn delete_quiz(&self, quiz_id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM quizzes WHERE id = ?")
            .bind(quiz_id)
            .execute(&self.pool)
            .await?;

        tracing::info!("quiz deleted with id: {quiz_id}");
        Ok(result.rows_affected() > 0)
    }
}

async fn insert_quiz(
    conn: &mut SqliteConnection,
    title: &str,
    questions: &[QuizQuestion],
    author_id: Option<i32>,
) -> Result<String> {
    let quiz_id = Ulid::new().to_string();

    sqlx::query("INSERT INTO quizzes (id, title, author_id) VALUES (?, ?, ?)")
        .bind(&quiz_id)
        .bind(title)
        .bind(author_id)
        .execute(&mut *conn)
        .await?;

    for (position, q) in questions.iter().enumerate() {
        sqlx::query(
            r#"
            INSERT INTO quiz_questions
                (quiz_id, position, external_id, question_text, options, correct_answer, explanation)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&quiz_id)
        .bind(position as i64)
        .bind(&q.id)
        .bind(&q.question_text)
        .bind(Json(&q.options))
        .bind(&q.correct_answer)
        .bind(&q.explanation)
        .execute(&mut *conn)
        .await?;
    }

    tracing::info!(
        "new quiz created with id: {quiz_id} ({} questions)",
        questions.len()
    );
    Ok(quiz_id)
}
