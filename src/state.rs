use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex};
use std::time::{Duration, Instant};

use tokio::sync::Mutex;

/// One inbound message, already reduced to the fields the engine needs.
/// Built from a Telegram update at the dispatcher edge.
#[derive(Debug, Clone)]
pub struct Event {
    pub sender_id: i64,
    pub chat_id: i64,
    pub first_name: String,
    pub username: Option<String>,
    pub text: String,
}

/// Working buffers for the multi-turn add-questions entry loop. The
/// question/answer alternation is encoded by `pending_question`: `None`
/// means the next message is a question, `Some` means it answers the
/// buffered one, so a bad input-expectation value cannot exist.
#[derive(Debug, Clone)]
pub struct AddQuestionsFlow {
    pub quiz_name: String,
    pub staged: HashMap<String, String>,
    pub pending_question: Option<String>,
}

impl AddQuestionsFlow {
    pub fn new(quiz_name: String) -> Self {
        Self { quiz_name, staged: HashMap::new(), pending_question: None }
    }
}

/// Working tables for the remove-questions review walk and for quiz
/// attempts: answers keyed by question text, a 1-based index order over
/// the questions, and the per-question toss decisions.
#[derive(Debug, Clone)]
pub struct ReviewFlow {
    pub quiz_name: String,
    pub answers: HashMap<String, String>,
    pub order: Vec<String>,
    pub tossed: HashMap<String, bool>,
    /// 1-based index of the question currently under review; the walk
    /// starts at the highest index and moves down.
    pub cursor: usize,
}

impl ReviewFlow {
    pub fn load(quiz_name: String, questions: HashMap<String, String>) -> Self {
        let mut order: Vec<String> = questions.keys().cloned().collect();
        order.sort();
        let cursor = order.len();
        Self { quiz_name, answers: questions, order, tossed: HashMap::new(), cursor }
    }

    pub fn current_question(&self) -> &str {
        &self.order[self.cursor - 1]
    }
}

/// Which input an in-progress attempt expects next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptInput {
    PostQuestion,
    PostAnswer,
}

#[derive(Debug, Clone)]
pub struct AttemptFlow {
    /// Owner of the quiz being attempted; equals the session user for an
    /// own-quiz attempt, the friend's id otherwise.
    pub owner: i64,
    pub own: bool,
    pub quiz_name: String,
    pub answers: HashMap<String, String>,
    pub order: Vec<String>,
    /// 1-based index of the current question; decremented when the
    /// answer is revealed, so 0 means every question has been shown.
    pub cursor: usize,
    pub score: u32,
    pub total: u32,
    pub expecting: AttemptInput,
}

impl AttemptFlow {
    pub fn load(owner: i64, own: bool, quiz_name: String, questions: HashMap<String, String>) -> Self {
        let mut order: Vec<String> = questions.keys().cloned().collect();
        order.sort();
        let total = order.len() as u32;
        let cursor = order.len();
        Self {
            owner,
            own,
            quiz_name,
            answers: questions,
            order,
            cursor,
            score: 0,
            total,
            expecting: AttemptInput::PostQuestion,
        }
    }

    pub fn current_question(&self) -> &str {
        &self.order[self.cursor - 1]
    }
}

/// The session state machine, one value per user. Flow payloads live
/// inside the variants, so leaving a state drops its working buffers and
/// an unrecognized state cannot be represented at all.
#[derive(Debug, Clone, Default)]
pub enum BotState {
    /// The user has not run /start in this process lifetime. Everything
    /// except /start is silently dropped.
    #[default]
    Inactive,
    Idle,
    AddQuestionsEntry(AddQuestionsFlow),
    AddQuestionsCancelConfirm(AddQuestionsFlow),
    RemoveQuestionsReview(ReviewFlow),
    RemoveQuestionsCancelConfirm(ReviewFlow),
    RemoveQuestionsFinalConfirm(ReviewFlow),
    TryQuizSelectSource,
    TryQuizEnterOwnName,
    TryQuizEnterFriendId,
    TryQuizEnterFriendQuizName { friend_id: i64 },
    TryQuizInProgress(AttemptFlow),
}

/// Ephemeral conversation state for one user. Never persisted; a process
/// restart logs everyone out.
#[derive(Debug)]
pub struct Session {
    pub user_id: i64,
    pub state: BotState,
    pub(crate) last_activity: Instant,
}

impl Session {
    fn new(user_id: i64) -> Self {
        Self { user_id, state: BotState::default(), last_activity: Instant::now() }
    }

    pub(crate) fn touch(&mut self) {
        self.last_activity = Instant::now();
    }
}

/// All live sessions, keyed by sender id. The outer map lock is only held
/// for lookup; the per-session mutex is held for the whole event, which
/// serializes events within a session while different users proceed in
/// parallel.
#[derive(Default)]
pub struct Sessions {
    inner: StdMutex<HashMap<i64, Arc<Mutex<Session>>>>,
}

impl Sessions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lookup_or_create(&self, user_id: i64) -> Arc<Mutex<Session>> {
        let mut sessions = self.inner.lock().expect("session map poisoned");
        Arc::clone(
            sessions
                .entry(user_id)
                .or_insert_with(|| Arc::new(Mutex::new(Session::new(user_id)))),
        )
    }

    /// Drops sessions idle longer than `max_idle`. Sessions currently
    /// handling an event are kept regardless.
    pub fn evict_idle(&self, max_idle: Duration) -> usize {
        let mut sessions = self.inner.lock().expect("session map poisoned");
        let before = sessions.len();
        sessions.retain(|_, session| match session.try_lock() {
            Ok(session) => session.last_activity.elapsed() < max_idle,
            Err(_) => true,
        });
        before - sessions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn lookup_returns_the_same_session_for_a_user() {
        let sessions = Sessions::new();
        let first = sessions.lookup_or_create(7);
        let second = sessions.lookup_or_create(7);
        assert!(Arc::ptr_eq(&first, &second));

        let other = sessions.lookup_or_create(8);
        assert!(!Arc::ptr_eq(&first, &other));
    }

    #[tokio::test]
    async fn idle_sessions_are_evicted_and_fresh_ones_kept() {
        let sessions = Sessions::new();
        let stale = sessions.lookup_or_create(1);
        sessions.lookup_or_create(2);

        stale.lock().await.last_activity = Instant::now()
            .checked_sub(Duration::from_secs(2))
            .expect("process uptime under two seconds");

        let evicted = sessions.evict_idle(Duration::from_secs(1));
        assert_eq!(evicted, 1);

        // user 1 starts over with a default session
        let replacement = sessions.lookup_or_create(1);
        assert!(matches!(replacement.lock().await.state, BotState::Inactive));
    }

    #[test]
    fn review_flow_orders_questions_and_starts_at_the_top() {
        let questions = HashMap::from([
            ("b".to_owned(), "2".to_owned()),
            ("a".to_owned(), "1".to_owned()),
            ("c".to_owned(), "3".to_owned()),
        ]);
        let flow = ReviewFlow::load("quiz".to_owned(), questions);
        assert_eq!(flow.order, vec!["a", "b", "c"]);
        assert_eq!(flow.cursor, 3);
        assert_eq!(flow.current_question(), "c");
    }
}
