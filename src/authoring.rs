use std::collections::HashMap;

use tracing::{info, instrument};

use crate::database::QuizStore;
use crate::error::BotError;
use crate::keyboard::Keyboard;
use crate::outbound::{Outgoing, SendOutbound};
use crate::state::{AddQuestionsFlow, BotState, Event, ReviewFlow};

/// Telegram rejects messages longer than this; the toss summary is split
/// into pages that stay under it.
const MESSAGE_CHAR_LIMIT: usize = 4096;

#[instrument(level = "info", skip(store, out, event), fields(user = event.sender_id, quiz = title))]
pub(crate) async fn add_quiz<S, O>(
    store: &S,
    out: &O,
    event: &Event,
    title: &str,
) -> Result<(), BotError>
where
    S: QuizStore,
    O: SendOutbound,
{
    if title.is_empty() {
        out.send(
            event.chat_id,
            Outgoing::plain("Quiz title cannot be empty, please try again!"),
        )
        .await?;
        return Ok(());
    }

    if store.fetch_quiz(event.sender_id, title).await?.is_some() {
        out.send(event.chat_id, Outgoing::plain("Quiz title exists")).await?;
        return Ok(());
    }

    store.create_quiz(event.sender_id, title).await?;
    info!(user = event.sender_id, quiz = title, "quiz created");
    out.send(
        event.chat_id,
        Outgoing::plain(format!("New Quiz Title: {title} is added into your collection.")),
    )
    .await?;
    Ok(())
}

#[instrument(level = "info", skip(store, out, event), fields(user = event.sender_id, quiz = name))]
pub(crate) async fn begin_add_questions<S, O>(
    store: &S,
    out: &O,
    event: &Event,
    name: &str,
) -> Result<BotState, BotError>
where
    S: QuizStore,
    O: SendOutbound,
{
    if name.is_empty() {
        send_usage_hint(out, event.chat_id, "add_qns").await?;
        return Ok(BotState::Idle);
    }

    let Some(quiz) = store.fetch_quiz(event.sender_id, name).await? else {
        out.send(
            event.chat_id,
            Outgoing::plain(format!("Quiz with name {name} not found.")),
        )
        .await?;
        return Ok(BotState::Idle);
    };

    let text = format!(
        "Quiz titled {name} found! It has {} questions.\n\
         Press <strong>Exit</strong> to save changes and end\n\
         Press <strong>Cancel</strong> to quit without saving\n\
         Please input new question:",
        quiz.num_qns
    );
    out.send(event.chat_id, Outgoing::html(text).keyboard(Keyboard::ExitCancel))
        .await?;

    Ok(BotState::AddQuestionsEntry(AddQuestionsFlow::new(name.to_owned())))
}

/// The entry loop alternates between expecting a question and expecting
/// its answer; `Exit` commits the staged pairs, `Cancel` asks first.
pub(crate) async fn entry_input<S, O>(
    store: &S,
    out: &O,
    event: &Event,
    mut flow: AddQuestionsFlow,
) -> Result<BotState, BotError>
where
    S: QuizStore,
    O: SendOutbound,
{
    match event.text.as_str() {
        "Exit" => {
            // a dangling unanswered question is discarded
            flow.pending_question = None;
            let total = store
                .merge_questions(event.sender_id, &flow.quiz_name, &flow.staged)
                .await?;
            info!(
                user = event.sender_id,
                quiz = %flow.quiz_name,
                added = flow.staged.len(),
                total,
                "questions merged into quiz"
            );
            out.send(
                event.chat_id,
                Outgoing::plain("Questions added to quiz!").keyboard(Keyboard::Remove),
            )
            .await?;
            Ok(BotState::Idle)
        }
        "Cancel" => {
            out.send(
                event.chat_id,
                Outgoing::html("Are you sure you want to <strong>Cancel</strong> update?")
                    .keyboard(Keyboard::YesNo),
            )
            .await?;
            Ok(BotState::AddQuestionsCancelConfirm(flow))
        }
        text => {
            match flow.pending_question.take() {
                None => {
                    flow.pending_question = Some(text.to_owned());
                    out.send(event.chat_id, Outgoing::plain("Please input the answer:"))
                        .await?;
                }
                Some(question) => {
                    flow.staged.insert(question, text.to_owned());
                    out.send(event.chat_id, Outgoing::plain("Please input the next question:"))
                        .await?;
                }
            }
            Ok(BotState::AddQuestionsEntry(flow))
        }
    }
}

pub(crate) async fn entry_cancel_confirm<O>(
    out: &O,
    event: &Event,
    flow: AddQuestionsFlow,
) -> Result<BotState, BotError>
where
    O: SendOutbound,
{
    match event.text.as_str() {
        "Yes" => {
            out.send(
                event.chat_id,
                Outgoing::plain("Changes to quiz cancelled.").keyboard(Keyboard::Remove),
            )
            .await?;
            Ok(BotState::Idle)
        }
        "No" => {
            let prompt = if flow.pending_question.is_some() {
                "Please input the answer:"
            } else {
                "Please input the next question:"
            };
            out.send(event.chat_id, Outgoing::plain(prompt).keyboard(Keyboard::ExitCancel))
                .await?;
            Ok(BotState::AddQuestionsEntry(flow))
        }
        _ => Ok(BotState::AddQuestionsCancelConfirm(flow)),
    }
}

#[instrument(level = "info", skip(store, out, event), fields(user = event.sender_id, quiz = name))]
pub(crate) async fn begin_remove_questions<S, O>(
    store: &S,
    out: &O,
    event: &Event,
    name: &str,
) -> Result<BotState, BotError>
where
    S: QuizStore,
    O: SendOutbound,
{
    if name.is_empty() {
        send_usage_hint(out, event.chat_id, "remove_qns").await?;
        return Ok(BotState::Idle);
    }

    let Some(quiz) = store.fetch_quiz(event.sender_id, name).await? else {
        out.send(
            event.chat_id,
            Outgoing::plain(format!("Quiz with name {name} not found.")),
        )
        .await?;
        return Ok(BotState::Idle);
    };

    if quiz.questions.is_empty() {
        out.send(
            event.chat_id,
            Outgoing::plain("This quiz has no questions to remove!"),
        )
        .await?;
        return Ok(BotState::Idle);
    }

    let text = format!(
        "Quiz titled {name} found!\n\
         For each question:\n\
         Press <strong>Keep</strong> to keep the question\n\
         Press <strong>Toss</strong> to remove the question\n\
         Press <strong>Cancel</strong> to revert changes\n"
    );
    out.send(event.chat_id, Outgoing::html(text).keyboard(Keyboard::KeepTossCancel))
        .await?;

    let flow = ReviewFlow::load(name.to_owned(), quiz.questions);
    send_review_question(out, event.chat_id, &flow).await?;
    Ok(BotState::RemoveQuestionsReview(flow))
}

/// Walks the questions from the highest index down, one Keep/Toss
/// decision per turn. The decision on index 1 triggers the summary.
pub(crate) async fn review_input<O>(
    out: &O,
    event: &Event,
    mut flow: ReviewFlow,
) -> Result<BotState, BotError>
where
    O: SendOutbound,
{
    match event.text.as_str() {
        decision @ ("Keep" | "Toss") => {
            let question = flow.current_question().to_owned();
            flow.tossed.insert(question, decision == "Toss");

            if flow.cursor > 1 {
                flow.cursor -= 1;
                send_review_question(out, event.chat_id, &flow).await?;
                Ok(BotState::RemoveQuestionsReview(flow))
            } else {
                finish_review(out, event, flow).await
            }
        }
        "Cancel" => {
            out.send(
                event.chat_id,
                Outgoing::html("Are you sure you want to <strong>Cancel</strong> update?")
                    .keyboard(Keyboard::YesNo),
            )
            .await?;
            Ok(BotState::RemoveQuestionsCancelConfirm(flow))
        }
        _ => Ok(BotState::RemoveQuestionsReview(flow)),
    }
}

async fn finish_review<O>(out: &O, event: &Event, flow: ReviewFlow) -> Result<BotState, BotError>
where
    O: SendOutbound,
{
    let pages = toss_summary_pages(&flow);
    if pages.is_empty() {
        out.send(
            event.chat_id,
            Outgoing::plain("No questions selected for removal").keyboard(Keyboard::Remove),
        )
        .await?;
        return Ok(BotState::Idle);
    }

    for page in pages {
        out.send(event.chat_id, Outgoing::html(page)).await?;
    }
    out.send(
        event.chat_id,
        Outgoing::plain("Are you sure you want to remove all the above questions?")
            .keyboard(Keyboard::YesNo),
    )
    .await?;
    Ok(BotState::RemoveQuestionsFinalConfirm(flow))
}

pub(crate) async fn review_cancel_confirm<O>(
    out: &O,
    event: &Event,
    flow: ReviewFlow,
) -> Result<BotState, BotError>
where
    O: SendOutbound,
{
    match event.text.as_str() {
        "Yes" => {
            out.send(
                event.chat_id,
                Outgoing::plain("Changes to quiz cancelled.").keyboard(Keyboard::Remove),
            )
            .await?;
            Ok(BotState::Idle)
        }
        "No" => {
            out.send(
                event.chat_id,
                Outgoing::plain("Continuing quiz review. Toss or keep previous question?")
                    .keyboard(Keyboard::KeepTossCancel),
            )
            .await?;
            Ok(BotState::RemoveQuestionsReview(flow))
        }
        _ => Ok(BotState::RemoveQuestionsCancelConfirm(flow)),
    }
}

pub(crate) async fn review_final_confirm<S, O>(
    store: &S,
    out: &O,
    event: &Event,
    flow: ReviewFlow,
) -> Result<BotState, BotError>
where
    S: QuizStore,
    O: SendOutbound,
{
    match event.text.as_str() {
        "Yes" => {
            let kept: HashMap<String, String> = flow
                .answers
                .iter()
                .filter(|(question, _)| flow.tossed.get(*question) == Some(&false))
                .map(|(question, answer)| (question.clone(), answer.clone()))
                .collect();

            store
                .replace_questions(event.sender_id, &flow.quiz_name, &kept)
                .await?;
            info!(
                user = event.sender_id,
                quiz = %flow.quiz_name,
                kept = kept.len(),
                "questions removed from quiz"
            );
            out.send(
                event.chat_id,
                Outgoing::plain("Removed selected questions.").keyboard(Keyboard::Remove),
            )
            .await?;
            Ok(BotState::Idle)
        }
        "No" => {
            out.send(
                event.chat_id,
                Outgoing::plain("Changes to quiz cancelled.").keyboard(Keyboard::Remove),
            )
            .await?;
            Ok(BotState::Idle)
        }
        _ => Ok(BotState::RemoveQuestionsFinalConfirm(flow)),
    }
}

#[instrument(level = "info", skip(store, out, event), fields(user = event.sender_id, quiz = name))]
pub(crate) async fn delete_quiz<S, O>(
    store: &S,
    out: &O,
    event: &Event,
    name: &str,
) -> Result<(), BotError>
where
    S: QuizStore,
    O: SendOutbound,
{
    if name.is_empty() {
        send_usage_hint(out, event.chat_id, "delete_quiz").await?;
        return Ok(());
    }

    let message = if store.delete_quiz(event.sender_id, name).await? {
        info!(user = event.sender_id, quiz = name, "quiz deleted");
        format!("Quiz {name} deleted.")
    } else {
        format!("Quiz with name {name} not found.")
    };
    out.send(event.chat_id, Outgoing::plain(message)).await?;
    Ok(())
}

pub(crate) async fn list_quizzes<S, O>(store: &S, out: &O, event: &Event) -> Result<(), BotError>
where
    S: QuizStore,
    O: SendOutbound,
{
    let titles = store.list_quiz_titles(event.sender_id).await?;

    if titles.is_empty() {
        out.send(
            event.chat_id,
            Outgoing::html("You have no quizzes yet. Create one with <strong>/add_quiz</strong>!"),
        )
        .await?;
        return Ok(());
    }

    let mut text = String::from("Here is the list of your quizzes: \n");
    for title in &titles {
        text.push_str("- ");
        text.push_str(title);
        text.push('\n');
    }
    out.send(event.chat_id, Outgoing::html(text)).await?;
    Ok(())
}

pub(crate) async fn send_my_id<O>(out: &O, event: &Event) -> Result<(), BotError>
where
    O: SendOutbound,
{
    let username = event.username.as_deref().unwrap_or("none");
    let card = format!(
        "<strong>Your ID:</strong> {}\n\
         <strong>First name:</strong> {}\n\
         <strong>Username:</strong> {}",
        event.sender_id, event.first_name, username
    );
    out.send(event.chat_id, Outgoing::html(card)).await?;
    Ok(())
}

async fn send_usage_hint<O>(out: &O, chat_id: i64, keyword: &str) -> Result<(), BotError>
where
    O: SendOutbound,
{
    out.send(
        chat_id,
        Outgoing::plain(format!(
            "Please include a quiz name with this command.\n\
             Spaces in the quiz name are allowed.\n\
             e.g. `/{keyword} demo quiz`"
        )),
    )
    .await?;
    Ok(())
}

async fn send_review_question<O>(out: &O, chat_id: i64, flow: &ReviewFlow) -> Result<(), BotError>
where
    O: SendOutbound,
{
    let question = flow.current_question();
    let answer = &flow.answers[question];
    out.send(
        chat_id,
        Outgoing::html(format!(
            "<strong>Q:</strong> {question}\n<strong>A:</strong> {answer}\n\n"
        )),
    )
    .await?;
    Ok(())
}

/// Compiles the tossed questions into messages that each stay below the
/// transport's character limit. Empty when nothing was tossed.
fn toss_summary_pages(flow: &ReviewFlow) -> Vec<String> {
    let mut pages = Vec::new();
    let mut current = String::new();

    for question in &flow.order {
        if flow.tossed.get(question) != Some(&true) {
            continue;
        }
        let answer = &flow.answers[question];
        let entry = format!("<strong>Q:</strong> {question}\n<strong>A:</strong> {answer}\n");

        if !current.is_empty() && current.len() + entry.len() >= MESSAGE_CHAR_LIMIT {
            pages.push(std::mem::take(&mut current));
        }
        current.push_str(&entry);
    }

    if !current.is_empty() {
        pages.push(current);
    }
    pages
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::memory::MemoryStore;
    use crate::outbound::recording::RecordingOutbound;
    use crate::state::Sessions;
    use crate::testkit::drive;

    async fn started(user: i64) -> (Sessions, MemoryStore, RecordingOutbound) {
        let sessions = Sessions::new();
        let store = MemoryStore::default();
        let out = RecordingOutbound::default();
        drive(&sessions, &store, &out, user, &["/start"]).await;
        out.take();
        (sessions, store, out)
    }

    #[tokio::test]
    async fn add_quiz_rejects_an_empty_title() {
        let (sessions, store, out) = started(1).await;

        drive(&sessions, &store, &out, 1, &["/add_quiz"]).await;

        assert!(out.last_text().contains("cannot be empty"));
    }

    #[tokio::test]
    async fn creating_the_same_quiz_twice_reports_title_exists() {
        let (sessions, store, out) = started(1).await;

        drive(&sessions, &store, &out, 1, &["/add_quiz trivia", "/add_quiz trivia"]).await;

        assert_eq!(out.last_text(), "Quiz title exists");
        let quiz = store.quiz(1, "trivia").unwrap();
        assert_eq!(quiz.num_qns, 0);
        assert_eq!(quiz.score, "none");
    }

    #[tokio::test]
    async fn add_questions_round_trip_via_entry_loop() {
        let (sessions, store, out) = started(1).await;

        drive(
            &sessions,
            &store,
            &out,
            1,
            &["/add_quiz capitals", "/add_qns capitals", "Q1", "A1", "Q2", "A2", "Exit"],
        )
        .await;

        let quiz = store.quiz(1, "capitals").unwrap();
        assert_eq!(quiz.num_qns, 2);
        assert_eq!(quiz.score, "none");
        assert_eq!(quiz.questions.get("Q1").map(String::as_str), Some("A1"));
        assert_eq!(quiz.questions.get("Q2").map(String::as_str), Some("A2"));

        // the review walk must enumerate exactly those pairs
        out.take();
        drive(&sessions, &store, &out, 1, &["/remove_qns capitals"]).await;
        assert!(out.last_text().contains("Q2"));
        assert!(out.last_text().contains("A2"));
        drive(&sessions, &store, &out, 1, &["Keep"]).await;
        assert!(out.last_text().contains("Q1"));
        assert!(out.last_text().contains("A1"));
        drive(&sessions, &store, &out, 1, &["Keep"]).await;
        assert!(out.last_text().contains("No questions selected for removal"));
    }

    #[tokio::test]
    async fn dangling_question_is_discarded_on_exit() {
        let (sessions, store, out) = started(1).await;

        drive(
            &sessions,
            &store,
            &out,
            1,
            &["/add_quiz capitals", "/add_qns capitals", "Q1", "A1", "orphan", "Exit"],
        )
        .await;

        let quiz = store.quiz(1, "capitals").unwrap();
        assert_eq!(quiz.num_qns, 1);
        assert!(!quiz.questions.contains_key("orphan"));
    }

    #[tokio::test]
    async fn duplicate_question_overwrites_without_inflating_the_count() {
        let (sessions, store, out) = started(1).await;

        drive(
            &sessions,
            &store,
            &out,
            1,
            &[
                "/add_quiz capitals",
                "/add_qns capitals",
                "Q1",
                "old answer",
                "Exit",
                "/add_qns capitals",
                "Q1",
                "new answer",
                "Exit",
            ],
        )
        .await;

        let quiz = store.quiz(1, "capitals").unwrap();
        assert_eq!(quiz.num_qns, 1);
        assert_eq!(quiz.questions.get("Q1").map(String::as_str), Some("new answer"));
    }

    #[tokio::test]
    async fn cancelling_entry_discards_staged_questions() {
        let (sessions, store, out) = started(1).await;

        drive(
            &sessions,
            &store,
            &out,
            1,
            &["/add_quiz capitals", "/add_qns capitals", "Q1", "A1", "Cancel", "Yes"],
        )
        .await;

        let quiz = store.quiz(1, "capitals").unwrap();
        assert_eq!(quiz.num_qns, 0);
        assert!(quiz.questions.is_empty());
    }

    #[tokio::test]
    async fn declining_the_cancel_resumes_the_entry_loop() {
        let (sessions, store, out) = started(1).await;

        drive(
            &sessions,
            &store,
            &out,
            1,
            &["/add_quiz capitals", "/add_qns capitals", "Q1", "A1", "Cancel", "No", "Q2", "A2", "Exit"],
        )
        .await;

        let quiz = store.quiz(1, "capitals").unwrap();
        assert_eq!(quiz.num_qns, 2);
    }

    #[tokio::test]
    async fn add_questions_to_a_missing_quiz_reports_not_found() {
        let (sessions, store, out) = started(1).await;

        drive(&sessions, &store, &out, 1, &["/add_qns nothing here"]).await;

        assert!(out.last_text().contains("not found"));
    }

    #[tokio::test]
    async fn removal_commits_only_the_kept_questions() {
        let (sessions, store, out) = started(1).await;
        let pairs = HashMap::from([
            ("Q1".to_owned(), "A1".to_owned()),
            ("Q2".to_owned(), "A2".to_owned()),
            ("Q3".to_owned(), "A3".to_owned()),
        ]);
        store.create_quiz(1, "trivia").await.unwrap();
        store.merge_questions(1, "trivia", &pairs).await.unwrap();

        // descending walk shows Q3 first; toss Q2 in the middle
        drive(
            &sessions,
            &store,
            &out,
            1,
            &["/remove_qns trivia", "Keep", "Toss", "Keep", "Yes"],
        )
        .await;

        let quiz = store.quiz(1, "trivia").unwrap();
        assert_eq!(quiz.num_qns, 2);
        assert_eq!(quiz.score, "none");
        assert_eq!(quiz.questions.len(), 2);
        assert_eq!(quiz.questions.get("Q1").map(String::as_str), Some("A1"));
        assert_eq!(quiz.questions.get("Q3").map(String::as_str), Some("A3"));
        assert!(!quiz.questions.contains_key("Q2"));
    }

    #[tokio::test]
    async fn declining_the_final_confirm_leaves_the_store_untouched() {
        let (sessions, store, out) = started(1).await;
        let pairs = HashMap::from([
            ("Q1".to_owned(), "A1".to_owned()),
            ("Q2".to_owned(), "A2".to_owned()),
            ("Q3".to_owned(), "A3".to_owned()),
        ]);
        store.create_quiz(1, "trivia").await.unwrap();
        store.merge_questions(1, "trivia", &pairs).await.unwrap();
        store.record_score(1, "trivia", "2/3").await.unwrap();
        let before = store.quiz(1, "trivia").unwrap();

        drive(
            &sessions,
            &store,
            &out,
            1,
            &["/remove_qns trivia", "Toss", "Toss", "Toss", "No"],
        )
        .await;

        assert_eq!(store.quiz(1, "trivia").unwrap(), before);
    }

    #[tokio::test]
    async fn keeping_everything_reports_nothing_selected() {
        let (sessions, store, out) = started(1).await;

        drive(&sessions, &store, &out, 1, &["/remove_qns demo quiz", "Keep"]).await;

        assert!(out.last_text().contains("No questions selected for removal"));
        // back in idle: commands work again
        out.take();
        drive(&sessions, &store, &out, 1, &["/list_quizzes"]).await;
        assert!(out.last_text().contains("demo quiz"));
    }

    #[tokio::test]
    async fn cancelling_the_review_keeps_the_quiz_and_resuming_works() {
        let (sessions, store, out) = started(1).await;
        let pairs = HashMap::from([
            ("Q1".to_owned(), "A1".to_owned()),
            ("Q2".to_owned(), "A2".to_owned()),
        ]);
        store.create_quiz(1, "trivia").await.unwrap();
        store.merge_questions(1, "trivia", &pairs).await.unwrap();

        drive(&sessions, &store, &out, 1, &["/remove_qns trivia", "Toss", "Cancel", "Yes"]).await;
        assert_eq!(store.quiz(1, "trivia").unwrap().num_qns, 2);

        // declining the cancel resumes at the same pending question
        drive(
            &sessions,
            &store,
            &out,
            1,
            &["/remove_qns trivia", "Toss", "Cancel", "No", "Toss", "Yes"],
        )
        .await;
        let quiz = store.quiz(1, "trivia").unwrap();
        assert_eq!(quiz.num_qns, 0);
        assert!(quiz.questions.is_empty());
    }

    #[tokio::test]
    async fn removing_from_an_empty_quiz_reports_nothing_to_remove() {
        let (sessions, store, out) = started(1).await;

        drive(&sessions, &store, &out, 1, &["/add_quiz empty", "/remove_qns empty"]).await;

        assert!(out.last_text().contains("no questions to remove"));
    }

    #[tokio::test]
    async fn delete_quiz_removes_the_document_and_reports_missing_ones() {
        let (sessions, store, out) = started(1).await;

        drive(&sessions, &store, &out, 1, &["/delete_quiz demo quiz"]).await;
        assert!(out.last_text().contains("deleted"));
        assert!(store.quiz(1, "demo quiz").is_none());

        drive(&sessions, &store, &out, 1, &["/delete_quiz demo quiz"]).await;
        assert!(out.last_text().contains("not found"));
    }

    #[tokio::test]
    async fn list_quizzes_bullets_every_title() {
        let (sessions, store, out) = started(1).await;

        drive(&sessions, &store, &out, 1, &["/add_quiz alpha", "/add_quiz beta", "/list_quizzes"]).await;

        let listing = out.last_text();
        assert!(listing.contains("- alpha"));
        assert!(listing.contains("- beta"));
        assert!(listing.contains("- demo quiz"));
    }

    #[tokio::test]
    async fn empty_quiz_list_suggests_creating_one() {
        let (sessions, store, out) = started(1).await;

        drive(&sessions, &store, &out, 1, &["/delete_quiz demo quiz", "/list_quizzes"]).await;

        assert!(out.last_text().contains("no quizzes"));
    }

    #[tokio::test]
    async fn get_my_id_renders_the_sender_card() {
        let (sessions, store, out) = started(42).await;

        drive(&sessions, &store, &out, 42, &["/get_my_id"]).await;

        let card = out.last_text();
        assert!(card.contains("42"));
        assert!(card.contains("user42"));
    }

    #[test]
    fn toss_summary_stays_below_the_message_limit() {
        let questions: HashMap<String, String> = (0..40)
            .map(|i| (format!("question {i:02} {}", "x".repeat(200)), "y".repeat(200)))
            .collect();
        let mut flow = ReviewFlow::load("big".to_owned(), questions);
        for question in flow.order.clone() {
            flow.tossed.insert(question, true);
        }

        let pages = toss_summary_pages(&flow);
        assert!(pages.len() > 1);
        for page in &pages {
            assert!(page.len() < MESSAGE_CHAR_LIMIT);
        }
        // every tossed pair appears exactly once across the pages
        let joined = pages.concat();
        for question in &flow.order {
            assert_eq!(joined.matches(question.as_str()).count(), 1);
        }
    }

    #[test]
    fn toss_summary_is_empty_when_everything_was_kept() {
        let questions = HashMap::from([("Q1".to_owned(), "A1".to_owned())]);
        let mut flow = ReviewFlow::load("quiz".to_owned(), questions);
        flow.tossed.insert("Q1".to_owned(), false);

        assert!(toss_summary_pages(&flow).is_empty());
    }
}
