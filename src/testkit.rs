use crate::database::memory::MemoryStore;
use crate::engine;
use crate::outbound::recording::RecordingOutbound;
use crate::state::{Event, Sessions};

pub(crate) fn event(user: i64, text: &str) -> Event {
    Event {
        sender_id: user,
        chat_id: user,
        first_name: format!("First{user}"),
        username: Some(format!("user{user}")),
        text: text.to_owned(),
    }
}

/// Feeds a sequence of messages from one user through the engine, as if
/// they arrived over the transport in order.
pub(crate) async fn drive(
    sessions: &Sessions,
    store: &MemoryStore,
    out: &RecordingOutbound,
    user: i64,
    inputs: &[&str],
) {
    for input in inputs {
        engine::handle_event(sessions, store, out, &event(user, input))
            .await
            .expect("event handling failed");
    }
}
