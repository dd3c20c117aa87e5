use std::collections::HashMap;

use crate::error::StoreError;
use crate::database::record::{QuizRecord, UserRecord};

pub mod connection;
pub mod record;

#[cfg(test)]
pub(crate) mod memory;

/// Durable user records, keyed by Telegram sender id.
#[allow(async_fn_in_trait)]
pub trait UserStore {
    async fn fetch_user(&self, user_id: i64) -> Result<Option<UserRecord>, StoreError>;
    async fn upsert_user(&self, user_id: i64, username: &str) -> Result<(), StoreError>;
}

/// Durable quiz records under a user. Every operation is a single
/// document-level write; callers re-fetch before trusting existence.
#[allow(async_fn_in_trait)]
pub trait QuizStore {
    async fn fetch_quiz(&self, owner: i64, title: &str) -> Result<Option<QuizRecord>, StoreError>;

    /// Creates an empty quiz (`num_qns = 0`, `score = "none"`).
    async fn create_quiz(&self, owner: i64, title: &str) -> Result<(), StoreError>;

    /// Additively merges question/answer pairs into the quiz: existing
    /// questions not named in `pairs` are preserved, duplicates get their
    /// answer overwritten. Resets the score and sets the count from the
    /// post-merge question total, which is returned.
    async fn merge_questions(
        &self,
        owner: i64,
        title: &str,
        pairs: &HashMap<String, String>,
    ) -> Result<u32, StoreError>;

    /// Replaces the quiz's question set wholesale with `kept`, resetting
    /// the score and count to match.
    async fn replace_questions(
        &self,
        owner: i64,
        title: &str,
        kept: &HashMap<String, String>,
    ) -> Result<(), StoreError>;

    async fn record_score(&self, owner: i64, title: &str, score: &str) -> Result<(), StoreError>;

    /// Returns whether a quiz with that title existed.
    async fn delete_quiz(&self, owner: i64, title: &str) -> Result<bool, StoreError>;

    async fn list_quiz_titles(&self, owner: i64) -> Result<Vec<String>, StoreError>;
}
