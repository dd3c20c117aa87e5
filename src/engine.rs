use std::collections::HashMap;

use tracing::{info, instrument};

use crate::attempt;
use crate::authoring;
use crate::commands::Command;
use crate::database::{QuizStore, UserStore};
use crate::error::BotError;
use crate::outbound::{Outgoing, SendOutbound};
use crate::state::{BotState, Event, Sessions};

pub(crate) const DEMO_QUIZ_TITLE: &str = "demo quiz";
const DEMO_QUESTION: &str = "this is a demo quiz question";
const DEMO_ANSWER: &str = "this is a demo quiz answer";

/// Handles one inbound event to completion. The session lock is held for
/// the whole call, so events for the same user never overlap; sessions of
/// different users are independent.
#[instrument(level = "info", skip(sessions, store, out), fields(user = event.sender_id))]
pub async fn handle_event<S, O>(
    sessions: &Sessions,
    store: &S,
    out: &O,
    event: &Event,
) -> Result<(), BotError>
where
    S: UserStore + QuizStore,
    O: SendOutbound,
{
    let session = sessions.lookup_or_create(event.sender_id);
    let mut session = session.lock().await;
    session.touch();

    // /start works from every state and abandons any in-flight flow.
    if matches!(Command::parse(&event.text), Some(Command::Start)) {
        session.state = BotState::Idle;
        return start(store, out, event).await;
    }

    let state = std::mem::take(&mut session.state);
    match route(state, store, out, event).await {
        Ok(next) => {
            session.state = next;
            Ok(())
        }
        Err(e) => {
            // The store may be ahead of or behind what the flow believed;
            // dropping back to idle forces a fresh fetch on the next try.
            session.state = BotState::Idle;
            Err(e)
        }
    }
}

async fn route<S, O>(
    state: BotState,
    store: &S,
    out: &O,
    event: &Event,
) -> Result<BotState, BotError>
where
    S: UserStore + QuizStore,
    O: SendOutbound,
{
    match state {
        BotState::Inactive => Ok(BotState::Inactive),
        BotState::Idle => idle_command(store, out, event).await,
        BotState::AddQuestionsEntry(flow) => authoring::entry_input(store, out, event, flow).await,
        BotState::AddQuestionsCancelConfirm(flow) => {
            authoring::entry_cancel_confirm(out, event, flow).await
        }
        BotState::RemoveQuestionsReview(flow) => authoring::review_input(out, event, flow).await,
        BotState::RemoveQuestionsCancelConfirm(flow) => {
            authoring::review_cancel_confirm(out, event, flow).await
        }
        BotState::RemoveQuestionsFinalConfirm(flow) => {
            authoring::review_final_confirm(store, out, event, flow).await
        }
        BotState::TryQuizSelectSource => attempt::select_source(out, event).await,
        BotState::TryQuizEnterOwnName => attempt::receive_own_name(store, out, event).await,
        BotState::TryQuizEnterFriendId => attempt::receive_friend_id(store, out, event).await,
        BotState::TryQuizEnterFriendQuizName { friend_id } => {
            attempt::receive_friend_quiz_name(store, out, event, friend_id).await
        }
        BotState::TryQuizInProgress(flow) => attempt::in_progress(store, out, event, flow).await,
    }
}

/// Looks up or creates the user record; a fresh user gets the seeded demo
/// quiz. Always greets.
async fn start<S, O>(store: &S, out: &O, event: &Event) -> Result<(), BotError>
where
    S: UserStore + QuizStore,
    O: SendOutbound,
{
    let display_name = event
        .username
        .clone()
        .unwrap_or_else(|| event.first_name.clone());

    match store.fetch_user(event.sender_id).await? {
        Some(user) => {
            if user.username != display_name {
                store.upsert_user(event.sender_id, &display_name).await?;
            }
        }
        None => {
            store.upsert_user(event.sender_id, &display_name).await?;
            store.create_quiz(event.sender_id, DEMO_QUIZ_TITLE).await?;
            let demo = HashMap::from([(DEMO_QUESTION.to_owned(), DEMO_ANSWER.to_owned())]);
            store
                .merge_questions(event.sender_id, DEMO_QUIZ_TITLE, &demo)
                .await?;
            info!(user = event.sender_id, "new user registered with demo quiz");
        }
    }

    out.send(event.chat_id, Outgoing::plain(format!("Hello {display_name}!")))
        .await?;
    Ok(())
}

async fn idle_command<S, O>(store: &S, out: &O, event: &Event) -> Result<BotState, BotError>
where
    S: UserStore + QuizStore,
    O: SendOutbound,
{
    let Some(command) = Command::parse(&event.text) else {
        // Commands we don't know get a hint; plain chatter is ignored.
        if event.text.starts_with('/') {
            out.send(
                event.chat_id,
                Outgoing::html(
                    "Sorry I don't understand you! Type <strong>/help</strong> for a list of commands!",
                ),
            )
            .await?;
        }
        return Ok(BotState::Idle);
    };

    match command {
        // handled before state routing; nothing to do here
        Command::Start => Ok(BotState::Idle),
        Command::Help => {
            out.send(event.chat_id, Outgoing::html(Command::descriptions()))
                .await?;
            Ok(BotState::Idle)
        }
        Command::AddQuiz(title) => {
            authoring::add_quiz(store, out, event, &title).await?;
            Ok(BotState::Idle)
        }
        Command::AddQns(name) => authoring::begin_add_questions(store, out, event, &name).await,
        Command::RemoveQns(name) => {
            authoring::begin_remove_questions(store, out, event, &name).await
        }
        Command::DeleteQuiz(name) => {
            authoring::delete_quiz(store, out, event, &name).await?;
            Ok(BotState::Idle)
        }
        Command::ListQuizzes => {
            authoring::list_quizzes(store, out, event).await?;
            Ok(BotState::Idle)
        }
        Command::GetMyId => {
            authoring::send_my_id(out, event).await?;
            Ok(BotState::Idle)
        }
        Command::TryQuiz => attempt::begin(out, event).await,
    }
}
