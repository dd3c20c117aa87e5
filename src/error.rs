use thiserror::Error;

/// Failures talking to the quiz store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// A message could not be delivered to the chat.
#[derive(Debug, Error)]
#[error("failed to send message: {0}")]
pub struct SendError(pub String);

/// Anything that can go wrong while handling one inbound event.
#[derive(Debug, Error)]
pub enum BotError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Send(#[from] SendError),
}
