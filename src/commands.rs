/// A recognized bot command. Commands that operate on a quiz carry the
/// free-text remainder of the message as the quiz title; spaces in titles
/// are allowed, so the argument is everything after the first space.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    Help,
    AddQuiz(String),
    AddQns(String),
    RemoveQns(String),
    DeleteQuiz(String),
    ListQuizzes,
    GetMyId,
    TryQuiz,
}

impl Command {
    /// Parses a raw message into a command. Accepts the `/keyword@botname`
    /// form Telegram sends in group chats. Returns `None` for plain text
    /// and for unknown commands.
    pub fn parse(text: &str) -> Option<Command> {
        let rest = text.trim().strip_prefix('/')?;
        let (head, argument) = match rest.split_once(' ') {
            Some((head, argument)) => (head, argument.trim()),
            None => (rest, ""),
        };
        let keyword = head.split('@').next().unwrap_or(head);

        let command = match keyword {
            "start" => Command::Start,
            "help" => Command::Help,
            "add_quiz" => Command::AddQuiz(argument.to_owned()),
            "add_qns" => Command::AddQns(argument.to_owned()),
            "remove_qns" => Command::RemoveQns(argument.to_owned()),
            "delete_quiz" => Command::DeleteQuiz(argument.to_owned()),
            "list_quizzes" => Command::ListQuizzes,
            "get_my_id" => Command::GetMyId,
            "try_quiz" => Command::TryQuiz,
            _ => return None,
        };

        Some(command)
    }

    pub fn descriptions() -> &'static str {
        "I understand the following commands: \n\
         <strong>/help</strong> - get list of commands\n\
         <strong>/add_quiz <i>quiz_name</i></strong> - add a new quiz\n\
         <strong>/add_qns <i>quiz_name</i></strong> - add questions to a selected quiz\n\
         <strong>/remove_qns <i>quiz_name</i></strong> - remove questions from a selected quiz\n\
         <strong>/try_quiz</strong> - try one of your own or a friend's quizzes\n\
         <strong>/delete_quiz <i>quiz_name</i></strong> - delete a selected quiz\n\
         <strong>/list_quizzes</strong> - list all of your quizzes\n\
         <strong>/get_my_id</strong> - show your id so friends can try your quizzes"
    }
}
