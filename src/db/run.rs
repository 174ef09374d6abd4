use color_eyre::Result;
use sqlx::types::Json;
use ulid::Ulid;

use super::models::StoredRun;
use super::Db;
use crate::quiz::QuizRun;

impl Db {
    /// Stores a fresh run for `quiz_id` and returns its token. Runs older
    /// than a day are dropped first.
    pub async fn create_run(&self, quiz_id: &str, run: &QuizRun) -> Result<String> {
        let token = Ulid::new().to_string();

        let pruned = sqlx::query("DELETE FROM quiz_runs WHERE created_at < datetime('now', '-1 day')")
            .execute(&self.pool)
            .await?
            .rows_affected();
        if pruned > 0 {
            tracing::debug!("pruned {pruned} stale quiz runs");
        }

        sqlx::query("INSERT INTO quiz_runs (id, quiz_id, state) VALUES (?, ?, ?)")
            .bind(&token)
            .bind(quiz_id)
            .bind(Json(run))
            .execute(&self.pool)
            .await?;

        tracing::info!("quiz run started for quiz={quiz_id}");
        Ok(token)
    }

    /// Returns the stored run for a token, if the token is known.
    pub async fn get_run(&self, token: &str) -> Result<Option<StoredRun>> {
        let row: Option<(String, Json<QuizRun>, i64)> =
            sqlx::query_as("SELECT quiz_id, state, version FROM quiz_runs WHERE id = ?")
                .bind(token)
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.map(|(quiz_id, state, version)| StoredRun {
            quiz_id,
            run: state.0,
            version,
        }))
    }

    /// Replaces the run state only if it is still at `version`. Returns
    /// `false` when another request saved first.
    pub async fn save_run(&self, token: &str, version: i64, run: &QuizRun) -> Result<bool> {
        let saved = sqlx::query(
            "UPDATE quiz_runs SET state = ?, version = version + 1 WHERE id = ? AND version = ?",
        )
        .bind(Json(run))
        .bind(token)
        .bind(version)
        .execute(&self.pool)
        .await?
        .rows_affected();
        Ok(saved > 0)
    }
}
