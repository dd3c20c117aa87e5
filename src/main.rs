use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use dotenvy::dotenv;
use teloxide::error_handlers::IgnoringErrorHandlerSafe;
use teloxide::prelude::*;
use teloxide::update_listeners::webhooks::{self, Options};
use tracing::level_filters;
use tracing_subscriber::fmt::format::FmtSpan;
use url::Url;

use quizkeeper::database::connection::Connection;
use quizkeeper::engine;
use quizkeeper::error::BotError;
use quizkeeper::outbound::TelegramOutbound;
use quizkeeper::state::{Event, Sessions};
use quizkeeper::HandlerResult;

const SESSION_IDLE_TIMEOUT: Duration = Duration::from_secs(60 * 60);
const EVICTION_SWEEP_PERIOD: Duration = Duration::from_secs(5 * 60);

#[tokio::main]
async fn main() {
    dotenv().ok();

    let rust_log = std::env::var("LOG_LEVEL").unwrap_or("error".into());
    tracing_subscriber::fmt()
        .with_max_level(level_filters::LevelFilter::from_level(
            rust_log.parse().expect("LOG_LEVEL should be a valid level"),
        ))
        .json()
        .with_span_events(FmtSpan::ENTER)
        .log_internal_errors(true)
        .with_ansi(true)
        .with_line_number(true)
        .with_target(false)
        .init();

    let connection_string = std::env::var("DATABASE_URL").expect("DATABASE_URL should be set.");
    let connection = Connection::connect(&connection_string)
        .await
        .expect("Failed to connect to database");
    connection
        .run_migrations()
        .await
        .expect("Failed to run migrations");
    let connection = Arc::new(connection);

    let teloxide_token = std::env::var("TELOXIDE_TOKEN").expect("TELOXIDE_TOKEN should be set.");
    let bot = Bot::new(teloxide_token);
    tracing::info!("Starting bot...");

    let sessions = Arc::new(Sessions::new());
    tokio::spawn({
        let sessions = Arc::clone(&sessions);
        async move {
            let mut sweep = tokio::time::interval(EVICTION_SWEEP_PERIOD);
            loop {
                sweep.tick().await;
                let evicted = sessions.evict_idle(SESSION_IDLE_TIMEOUT);
                if evicted > 0 {
                    tracing::debug!(evicted, "evicted idle sessions");
                }
            }
        }
    });

    let ngrok_url = std::env::var("NGROK_URL").map(|d| d.parse::<Url>().expect("NGROK_URL can't be parsed.")).ok();
    let ngrok_addr = std::env::var("NGROK_ADDR").map(|d| d.parse::<SocketAddr>().expect("NGROK_ADDR can't be parsed.")).ok();

    let mut dispatcher = Dispatcher::builder(bot.clone(), Update::filter_message().endpoint(dispatch_update))
        .dependencies(dptree::deps![connection, sessions])
        .enable_ctrlc_handler()
        .build();

    if let (Some(ngrok_url), Some(ngrok_addr)) = (ngrok_url, ngrok_addr) {
        let listener = webhooks::axum(bot, Options::new(ngrok_addr, ngrok_url))
            .await
            .expect("Failed to build a listener.");
        dispatcher
            .dispatch_with_listener(listener, Arc::new(IgnoringErrorHandlerSafe))
            .await
    } else {
        dispatcher.dispatch().await
    }
}

async fn dispatch_update(
    bot: Bot,
    msg: Message,
    connection: Arc<Connection>,
    sessions: Arc<Sessions>,
) -> HandlerResult {
    // only text-bearing messages with a sender are examined
    let Some(text) = msg.text() else {
        return Ok(());
    };
    let Some(from) = msg.from.as_ref() else {
        return Ok(());
    };

    let event = Event {
        sender_id: from.id.0 as i64,
        chat_id: msg.chat.id.0,
        first_name: from.first_name.clone(),
        username: from.username.clone(),
        text: text.to_owned(),
    };

    let outbound = TelegramOutbound::new(bot);
    match engine::handle_event(sessions.as_ref(), connection.as_ref(), &outbound, &event).await {
        Ok(()) => Ok(()),
        Err(BotError::Store(e)) => {
            // the write is not retried and the session has been reset to
            // idle; the user may be behind the store until the next fetch
            tracing::error!(user = event.sender_id, error = %e, "store failure while handling event");
            Ok(())
        }
        // a failed send mid-workflow desyncs the user from the store, so
        // surface it instead of dropping the turn silently
        Err(e @ BotError::Send(_)) => Err(Box::new(e)),
    }
}
