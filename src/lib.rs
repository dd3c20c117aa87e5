pub mod attempt;
pub mod authoring;
pub mod commands;
pub mod database;
pub mod engine;
pub mod error;
pub mod keyboard;
pub mod outbound;
pub mod state;

#[cfg(test)]
pub(crate) mod testkit;

pub type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync + 'static>>;
