use std::collections::HashMap;
use std::sync::Mutex;

use crate::database::record::{QuizRecord, UserRecord};
use crate::database::{QuizStore, UserStore};
use crate::error::StoreError;

/// In-memory store with the same semantics as the Postgres adapter, used
/// to drive conversation flows in tests.
#[derive(Default)]
pub(crate) struct MemoryStore {
    users: Mutex<HashMap<i64, UserRecord>>,
    quizzes: Mutex<HashMap<(i64, String), QuizRecord>>,
}

impl MemoryStore {
    pub(crate) fn quiz(&self, owner: i64, title: &str) -> Option<QuizRecord> {
        self.quizzes.lock().unwrap().get(&(owner, title.to_owned())).cloned()
    }

    pub(crate) fn user(&self, user_id: i64) -> Option<UserRecord> {
        self.users.lock().unwrap().get(&user_id).cloned()
    }
}

fn empty_quiz() -> QuizRecord {
    QuizRecord { num_qns: 0, score: "none".to_owned(), questions: HashMap::new() }
}

impl UserStore for MemoryStore {
    async fn fetch_user(&self, user_id: i64) -> Result<Option<UserRecord>, StoreError> {
        Ok(self.users.lock().unwrap().get(&user_id).cloned())
    }

    async fn upsert_user(&self, user_id: i64, username: &str) -> Result<(), StoreError> {
        self.users
            .lock()
            .unwrap()
            .insert(user_id, UserRecord { username: username.to_owned() });
        Ok(())
    }
}

impl QuizStore for MemoryStore {
    async fn fetch_quiz(&self, owner: i64, title: &str) -> Result<Option<QuizRecord>, StoreError> {
        Ok(self.quiz(owner, title))
    }

    async fn create_quiz(&self, owner: i64, title: &str) -> Result<(), StoreError> {
        self.quizzes
            .lock()
            .unwrap()
            .insert((owner, title.to_owned()), empty_quiz());
        Ok(())
    }

    async fn merge_questions(
        &self,
        owner: i64,
        title: &str,
        pairs: &HashMap<String, String>,
    ) -> Result<u32, StoreError> {
        let mut quizzes = self.quizzes.lock().unwrap();
        let quiz = quizzes
            .entry((owner, title.to_owned()))
            .or_insert_with(empty_quiz);
        quiz.questions
            .extend(pairs.iter().map(|(q, a)| (q.clone(), a.clone())));
        quiz.num_qns = quiz.questions.len() as u32;
        quiz.score = "none".to_owned();
        Ok(quiz.num_qns)
    }

    async fn replace_questions(
        &self,
        owner: i64,
        title: &str,
        kept: &HashMap<String, String>,
    ) -> Result<(), StoreError> {
        let mut quizzes = self.quizzes.lock().unwrap();
        let quiz = quizzes
            .entry((owner, title.to_owned()))
            .or_insert_with(empty_quiz);
        quiz.questions = kept.clone();
        quiz.num_qns = kept.len() as u32;
        quiz.score = "none".to_owned();
        Ok(())
    }

    async fn record_score(&self, owner: i64, title: &str, score: &str) -> Result<(), StoreError> {
        if let Some(quiz) = self.quizzes.lock().unwrap().get_mut(&(owner, title.to_owned())) {
            quiz.score = score.to_owned();
        }
        Ok(())
    }

    async fn delete_quiz(&self, owner: i64, title: &str) -> Result<bool, StoreError> {
        Ok(self
            .quizzes
            .lock()
            .unwrap()
            .remove(&(owner, title.to_owned()))
            .is_some())
    }

    async fn list_quiz_titles(&self, owner: i64) -> Result<Vec<String>, StoreError> {
        let mut titles: Vec<String> = self
            .quizzes
            .lock()
            .unwrap()
            .keys()
            .filter(|(id, _)| *id == owner)
            .map(|(_, title)| title.clone())
            .collect();
        titles.sort();
        Ok(titles)
    }
}
