//! Message parser - Parses raw text into structured messages

use crate::domain::entities::{Content, Message, MessageType, User};

/// Parses incoming text into structured Message objects
pub struct MessageParser {
    command_prefix: String,
}

impl MessageParser {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            command_prefix: prefix.into(),
        }
    }

    /// Parse a line of text. Lines starting with the command prefix become
    /// command messages, everything else is plain text.
    pub fn parse(
        &self,
        chat_id: impl Into<String>,
        text: impl Into<String>,
        sender: Option<User>,
    ) -> Message {
        let text = text.into();
        let chat_id = chat_id.into();

        match text.strip_prefix(&self.command_prefix) {
            Some(rest) if !rest.trim().is_empty() => self.parse_command(chat_id, rest, sender),
            _ => Message::new(chat_id, Content::Text(text))
                .with_message_type(MessageType::Text)
                .with_sender_opt(sender),
        }
    }

    fn parse_command(&self, chat_id: String, cmd_text: &str, sender: Option<User>) -> Message {
        let mut parts = cmd_text.split_whitespace();
        let name = parts.next().unwrap_or_default().to_string();
        let args: Vec<String> = parts.map(str::to_string).collect();

        Message::new(chat_id, Content::Command { name, args })
            .with_message_type(MessageType::Command)
            .with_sender_opt(sender)
    }
}
