use teloxide::types::{KeyboardButton, KeyboardMarkup, ReplyMarkup};

/// The fixed reply-button layouts the bot ever shows. Workflows pick a
/// variant; only the Telegram outbound adapter turns it into markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyboard {
    YesNo,
    KeepTossCancel,
    ExitCancel,
    RevealOrEnd,
    CorrectWrongEnd,
    QuizSource,
    CancelOnly,
    Remove,
}

impl Keyboard {
    pub(crate) fn markup(self) -> ReplyMarkup {
        let rows: Vec<Vec<KeyboardButton>> = match self {
            Keyboard::YesNo => vec![vec![
                KeyboardButton::new("Yes"),
                KeyboardButton::new("No"),
            ]],
            Keyboard::KeepTossCancel => vec![
                vec![KeyboardButton::new("Keep"), KeyboardButton::new("Toss")],
                vec![KeyboardButton::new("Cancel")],
            ],
            Keyboard::ExitCancel => vec![vec![
                KeyboardButton::new("Exit"),
                KeyboardButton::new("Cancel"),
            ]],
            Keyboard::RevealOrEnd => vec![vec![
                KeyboardButton::new("Reveal Ans"),
                KeyboardButton::new("End Quiz"),
            ]],
            Keyboard::CorrectWrongEnd => vec![
                vec![KeyboardButton::new("Correct"), KeyboardButton::new("Wrong")],
                vec![KeyboardButton::new("End Quiz")],
            ],
            Keyboard::QuizSource => vec![vec![
                KeyboardButton::new("My own quiz"),
                KeyboardButton::new("A friend's quiz"),
            ]],
            Keyboard::CancelOnly => vec![vec![KeyboardButton::new("Cancel")]],
            Keyboard::Remove => return ReplyMarkup::kb_remove(),
        };

        ReplyMarkup::Keyboard(KeyboardMarkup::new(rows))
    }
}
