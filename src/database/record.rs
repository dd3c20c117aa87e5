use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub username: String,
}

/// A quiz as stored: count and score live beside the question map rather
/// than inside it, so question text can never collide with metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizRecord {
    pub num_qns: u32,
    /// `"none"`, or `"correct/total"` after a completed own-quiz attempt.
    pub score: String,
    pub questions: HashMap<String, String>,
}
