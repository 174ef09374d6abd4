use color_eyre::Result;

use crate::db::Db;
use crate::quiz::{selector, QuizSet};

#[cfg_attr(test, mockall::automock)]
pub trait QuizRepository: Send + Sync {
    fn count_quizzes(&self) -> impl std::future::Future<Output = Result<i64>> + Send;

    fn list_quizzes(&self) -> impl std::future::Future<Output = Result<Vec<QuizSet>>> + Send;
}

impl QuizRepository for Db {
    async fn count_quizzes(&self) -> Result<i64> {
        Db::count_quizzes(self).await
    }

    async fn list_quizzes(&self) -> Result<Vec<QuizSet>> {
        Db::list_quizzes(self).await
    }
}

pub enum DailyQuiz {
    Ready(QuizSet),
    /// No quiz documents are loaded yet.
    Empty,
}

/// Resolves the quiz of the day out of the stored quiz documents.
#[derive(Clone)]
pub struct DailyQuizService<R: QuizRepository = Db> {
    repo: R,
}

impl<R: QuizRepository> DailyQuizService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub async fn resolve(&self, day_of_year: u32) -> Result<DailyQuiz> {
        let count = usize::try_from(self.repo.count_quizzes().await?)?;
        if count == 0 {
            tracing::warn!("no quizzes in the collection");
            return Ok(DailyQuiz::Empty);
        }

        let fetched = self.repo.list_quizzes().await?;
        if fetched.len() != count {
            tracing::warn!(
                "quiz count {count} disagrees with {} fetched quizzes",
                fetched.len()
            );
        }

        match selector::pick_daily(fetched, count, day_of_year) {
            Some(quiz) => {
                tracing::debug!("quiz of day {day_of_year} is {}", quiz.id);
                Ok(DailyQuiz::Ready(quiz))
            }
            None => Ok(DailyQuiz::Empty),
        }
    }
}
