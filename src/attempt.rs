use tracing::{info, instrument};

use crate::database::{QuizStore, UserStore};
use crate::error::BotError;
use crate::keyboard::Keyboard;
use crate::outbound::{Outgoing, SendOutbound};
use crate::state::{AttemptFlow, AttemptInput, BotState, Event};

pub(crate) async fn begin<O>(out: &O, event: &Event) -> Result<BotState, BotError>
where
    O: SendOutbound,
{
    out.send(
        event.chat_id,
        Outgoing::plain("Whose quiz do you want to try?").keyboard(Keyboard::QuizSource),
    )
    .await?;
    Ok(BotState::TryQuizSelectSource)
}

pub(crate) async fn select_source<O>(out: &O, event: &Event) -> Result<BotState, BotError>
where
    O: SendOutbound,
{
    match event.text.as_str() {
        "My own quiz" => {
            out.send(
                event.chat_id,
                Outgoing::plain("Please enter the quiz title:").keyboard(Keyboard::CancelOnly),
            )
            .await?;
            Ok(BotState::TryQuizEnterOwnName)
        }
        "A friend's quiz" => {
            out.send(
                event.chat_id,
                Outgoing::plain("Please enter your friend's user id:")
                    .keyboard(Keyboard::CancelOnly),
            )
            .await?;
            Ok(BotState::TryQuizEnterFriendId)
        }
        _ => Ok(BotState::TryQuizSelectSource),
    }
}

pub(crate) async fn receive_own_name<S, O>(
    store: &S,
    out: &O,
    event: &Event,
) -> Result<BotState, BotError>
where
    S: QuizStore,
    O: SendOutbound,
{
    if event.text == "Cancel" {
        return cancelled(out, event.chat_id).await;
    }

    match try_start(store, out, event, event.sender_id, true).await? {
        Some(state) => Ok(state),
        None => Ok(BotState::TryQuizEnterOwnName),
    }
}

pub(crate) async fn receive_friend_id<S, O>(
    store: &S,
    out: &O,
    event: &Event,
) -> Result<BotState, BotError>
where
    S: UserStore,
    O: SendOutbound,
{
    if event.text == "Cancel" {
        return cancelled(out, event.chat_id).await;
    }

    let Ok(friend_id) = event.text.trim().parse::<i64>() else {
        out.send(
            event.chat_id,
            Outgoing::plain("Please enter a numeric user id.").keyboard(Keyboard::CancelOnly),
        )
        .await?;
        return Ok(BotState::TryQuizEnterFriendId);
    };

    if store.fetch_user(friend_id).await?.is_none() {
        out.send(
            event.chat_id,
            Outgoing::plain(format!("No user with id {friend_id} found. Try again:"))
                .keyboard(Keyboard::CancelOnly),
        )
        .await?;
        return Ok(BotState::TryQuizEnterFriendId);
    }

    out.send(
        event.chat_id,
        Outgoing::plain("Please enter your friend's quiz title:").keyboard(Keyboard::CancelOnly),
    )
    .await?;
    Ok(BotState::TryQuizEnterFriendQuizName { friend_id })
}

pub(crate) async fn receive_friend_quiz_name<S, O>(
    store: &S,
    out: &O,
    event: &Event,
    friend_id: i64,
) -> Result<BotState, BotError>
where
    S: QuizStore,
    O: SendOutbound,
{
    if event.text == "Cancel" {
        return cancelled(out, event.chat_id).await;
    }

    match try_start(store, out, event, friend_id, false).await? {
        Some(state) => Ok(state),
        None => Ok(BotState::TryQuizEnterFriendQuizName { friend_id }),
    }
}

/// Loads the named quiz and opens the attempt. `None` means the caller
/// should stay at its prompt (quiz missing or empty).
#[instrument(level = "info", skip(store, out, event), fields(user = event.sender_id, owner = owner, quiz = %event.text))]
async fn try_start<S, O>(
    store: &S,
    out: &O,
    event: &Event,
    owner: i64,
    own: bool,
) -> Result<Option<BotState>, BotError>
where
    S: QuizStore,
    O: SendOutbound,
{
    let title = event.text.trim();

    let Some(quiz) = store.fetch_quiz(owner, title).await? else {
        out.send(
            event.chat_id,
            Outgoing::plain(format!("Quiz with name {title} not found."))
                .keyboard(Keyboard::CancelOnly),
        )
        .await?;
        return Ok(None);
    };

    if quiz.questions.is_empty() {
        out.send(
            event.chat_id,
            Outgoing::plain("This quiz has no questions to try!").keyboard(Keyboard::CancelOnly),
        )
        .await?;
        return Ok(None);
    }

    out.send(
        event.chat_id,
        Outgoing::html(
            "Let's begin!\n\
             Press <strong>Reveal Ans</strong> to show the answer, then mark yourself \
             <strong>Correct</strong> or <strong>Wrong</strong>.\n\
             Press <strong>End Quiz</strong> to stop at any time.",
        ),
    )
    .await?;

    let flow = AttemptFlow::load(owner, own, title.to_owned(), quiz.questions);
    send_question(out, event.chat_id, &flow).await?;
    Ok(Some(BotState::TryQuizInProgress(flow)))
}

/// One turn of an in-progress attempt. `End Quiz` always aborts with no
/// score written; otherwise the expectation marker decides whether a
/// reveal or a Correct/Wrong verdict is due. Unexpected input leaves the
/// flow exactly where it was, including skipping the end-of-quiz check.
pub(crate) async fn in_progress<S, O>(
    store: &S,
    out: &O,
    event: &Event,
    mut flow: AttemptFlow,
) -> Result<BotState, BotError>
where
    S: QuizStore,
    O: SendOutbound,
{
    if event.text == "End Quiz" {
        out.send(
            event.chat_id,
            Outgoing::plain("Quiz ended.").keyboard(Keyboard::Remove),
        )
        .await?;
        return Ok(BotState::Idle);
    }

    match flow.expecting {
        AttemptInput::PostQuestion => {
            if event.text == "Reveal Ans" {
                let question = flow.current_question();
                let answer = &flow.answers[question];
                out.send(
                    event.chat_id,
                    Outgoing::html(format!("<strong>A:</strong> {answer}"))
                        .keyboard(Keyboard::CorrectWrongEnd),
                )
                .await?;
                flow.cursor -= 1;
                flow.expecting = AttemptInput::PostAnswer;
            }
            Ok(BotState::TryQuizInProgress(flow))
        }
        AttemptInput::PostAnswer => match event.text.as_str() {
            verdict @ ("Correct" | "Wrong") => {
                if verdict == "Correct" {
                    flow.score += 1;
                }

                if flow.cursor > 0 {
                    flow.expecting = AttemptInput::PostQuestion;
                    send_question(out, event.chat_id, &flow).await?;
                    Ok(BotState::TryQuizInProgress(flow))
                } else {
                    conclude(store, out, event, flow).await
                }
            }
            _ => Ok(BotState::TryQuizInProgress(flow)),
        },
    }
}

async fn conclude<S, O>(
    store: &S,
    out: &O,
    event: &Event,
    flow: AttemptFlow,
) -> Result<BotState, BotError>
where
    S: QuizStore,
    O: SendOutbound,
{
    let score_text = format!("{}/{}", flow.score, flow.total);

    // only an attempt at one's own quiz records a score
    if flow.own {
        store
            .record_score(flow.owner, &flow.quiz_name, &score_text)
            .await?;
    }
    info!(
        user = event.sender_id,
        quiz = %flow.quiz_name,
        score = %score_text,
        own = flow.own,
        "quiz attempt completed"
    );

    let verdict = if flow.score == flow.total {
        "Perfect score!"
    } else if flow.score * 2 > flow.total {
        "You passed!"
    } else {
        "You failed!"
    };

    out.send(
        event.chat_id,
        Outgoing::plain(format!("Quiz complete! Your score: {score_text}\n{verdict}"))
            .keyboard(Keyboard::Remove),
    )
    .await?;
    Ok(BotState::Idle)
}

async fn send_question<O>(out: &O, chat_id: i64, flow: &AttemptFlow) -> Result<(), BotError>
where
    O: SendOutbound,
{
    out.send(
        chat_id,
        Outgoing::html(format!("<strong>Q:</strong> {}", flow.current_question()))
            .keyboard(Keyboard::RevealOrEnd),
    )
    .await?;
    Ok(())
}

async fn cancelled<O>(out: &O, chat_id: i64) -> Result<BotState, BotError>
where
    O: SendOutbound,
{
    out.send(
        chat_id,
        Outgoing::plain("Cancelled.").keyboard(Keyboard::Remove),
    )
    .await?;
    Ok(BotState::Idle)
}
