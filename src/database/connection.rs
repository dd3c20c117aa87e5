use std::collections::HashMap;

use sqlx::postgres::PgPool;
use sqlx::Row;

use crate::database::record::{QuizRecord, UserRecord};
use crate::database::{QuizStore, UserStore};
use crate::error::StoreError;

pub struct Connection {
    pool: PgPool,
}

impl Connection {
    pub async fn connect(connection_string: &str) -> Result<Self, StoreError> {
        let pool = PgPool::connect(connection_string).await?;
        Ok(Self { pool })
    }

    pub async fn run_migrations(&self) -> Result<(), StoreError> {
        sqlx::migrate!().run(&self.pool).await?;
        Ok(())
    }
}

impl UserStore for Connection {
    async fn fetch_user(&self, user_id: i64) -> Result<Option<UserRecord>, StoreError> {
        let username: Option<String> =
            sqlx::query_scalar("SELECT username FROM users WHERE user_id = $1")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(username.map(|username| UserRecord { username }))
    }

    async fn upsert_user(&self, user_id: i64, username: &str) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO users (user_id, username) VALUES ($1, $2) \
             ON CONFLICT (user_id) DO UPDATE SET username = EXCLUDED.username",
        )
        .bind(user_id)
        .bind(username)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

impl QuizStore for Connection {
    async fn fetch_quiz(&self, owner: i64, title: &str) -> Result<Option<QuizRecord>, StoreError> {
        let mut tx = self.pool.begin().await?;

        let meta = sqlx::query("SELECT num_qns, score FROM quizzes WHERE user_id = $1 AND title = $2")
            .bind(owner)
            .bind(title)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(meta) = meta else {
            return Ok(None);
        };

        let rows = sqlx::query(
            "SELECT question, answer FROM questions WHERE user_id = $1 AND quiz_title = $2",
        )
        .bind(owner)
        .bind(title)
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;

        let num_qns: i32 = meta.get("num_qns");
        let score: String = meta.get("score");
        let questions: HashMap<String, String> = rows
            .into_iter()
            .map(|row| (row.get("question"), row.get("answer")))
            .collect();

        Ok(Some(QuizRecord { num_qns: num_qns as u32, score, questions }))
    }

    async fn create_quiz(&self, owner: i64, title: &str) -> Result<(), StoreError> {
        sqlx::query("INSERT INTO quizzes (user_id, title, num_qns, score) VALUES ($1, $2, 0, 'none')")
            .bind(owner)
            .bind(title)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn merge_questions(
        &self,
        owner: i64,
        title: &str,
        pairs: &HashMap<String, String>,
    ) -> Result<u32, StoreError> {
        let mut tx = self.pool.begin().await?;

        for (question, answer) in pairs {
            sqlx::query(
                "INSERT INTO questions (user_id, quiz_title, question, answer) \
                 VALUES ($1, $2, $3, $4) \
                 ON CONFLICT (user_id, quiz_title, question) DO UPDATE SET answer = EXCLUDED.answer",
            )
            .bind(owner)
            .bind(title)
            .bind(question)
            .bind(answer)
            .execute(&mut *tx)
            .await?;
        }

        // num_qns must track the real row count even when a duplicate
        // question overwrote an existing one.
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM questions WHERE user_id = $1 AND quiz_title = $2",
        )
        .bind(owner)
        .bind(title)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("UPDATE quizzes SET num_qns = $3, score = 'none' WHERE user_id = $1 AND title = $2")
            .bind(owner)
            .bind(title)
            .bind(total as i32)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(total as u32)
    }

    async fn replace_questions(
        &self,
        owner: i64,
        title: &str,
        kept: &HashMap<String, String>,
    ) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM questions WHERE user_id = $1 AND quiz_title = $2")
            .bind(owner)
            .bind(title)
            .execute(&mut *tx)
            .await?;

        for (question, answer) in kept {
            sqlx::query(
                "INSERT INTO questions (user_id, quiz_title, question, answer) VALUES ($1, $2, $3, $4)",
            )
            .bind(owner)
            .bind(title)
            .bind(question)
            .bind(answer)
            .execute(&mut *tx)
            .await?;
        }

        sqlx::query("UPDATE quizzes SET num_qns = $3, score = 'none' WHERE user_id = $1 AND title = $2")
            .bind(owner)
            .bind(title)
            .bind(kept.len() as i32)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(())
    }

    async fn record_score(&self, owner: i64, title: &str, score: &str) -> Result<(), StoreError> {
        sqlx::query("UPDATE quizzes SET score = $3 WHERE user_id = $1 AND title = $2")
            .bind(owner)
            .bind(title)
            .bind(score)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn delete_quiz(&self, owner: i64, title: &str) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM quizzes WHERE user_id = $1 AND title = $2")
            .bind(owner)
            .bind(title)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_quiz_titles(&self, owner: i64) -> Result<Vec<String>, StoreError> {
        let titles = sqlx::query_scalar("SELECT title FROM quizzes WHERE user_id = $1 ORDER BY title")
            .bind(owner)
            .fetch_all(&self.pool)
            .await?;

        Ok(titles)
    }
}
