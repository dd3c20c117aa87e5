use teloxide::payloads::SendMessageSetters;
use teloxide::prelude::Requester;
use teloxide::types::{ChatId, ParseMode};
use teloxide::Bot;

use crate::error::SendError;
use crate::keyboard::Keyboard;

/// One rendered outbound message: text, an HTML-formatting hint and an
/// optional reply-button layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outgoing {
    pub text: String,
    pub html: bool,
    pub keyboard: Option<Keyboard>,
}

impl Outgoing {
    pub fn plain(text: impl Into<String>) -> Self {
        Self { text: text.into(), html: false, keyboard: None }
    }

    pub fn html(text: impl Into<String>) -> Self {
        Self { text: text.into(), html: true, keyboard: None }
    }

    pub fn keyboard(mut self, keyboard: Keyboard) -> Self {
        self.keyboard = Some(keyboard);
        self
    }
}

/// Outbound transport seam. The engine only ever talks to this trait, so
/// tests can swap in a recording sink.
#[allow(async_fn_in_trait)]
pub trait SendOutbound {
    async fn send(&self, chat_id: i64, message: Outgoing) -> Result<(), SendError>;
}

pub struct TelegramOutbound {
    bot: Bot,
}

impl TelegramOutbound {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

impl SendOutbound for TelegramOutbound {
    async fn send(&self, chat_id: i64, message: Outgoing) -> Result<(), SendError> {
        let Outgoing { text, html, keyboard } = message;

        let mut request = self.bot.send_message(ChatId(chat_id), text);
        if html {
            request = request.parse_mode(ParseMode::Html);
        }
        if let Some(keyboard) = keyboard {
            request = request.reply_markup(keyboard.markup());
        }

        request.await.map_err(|e| SendError(e.to_string()))?;
        Ok(())
    }
}
