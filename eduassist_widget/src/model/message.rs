use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a message node, unique within one conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MessageId(u64);

impl MessageId {
    pub fn new(seq: u64) -> Self {
        Self(seq)
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "msg-{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

impl Sender {
    /// Class list applied to the message container node.
    pub fn css_class(&self) -> &'static str {
        match self {
            Sender::User => "message user-message",
            Sender::Bot => "message bot-message",
        }
    }
}

/// Display content of a message. `Text` is assigned literally, `Markup` is
/// interpreted by the renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageBody {
    Text(String),
    Markup(String),
}

impl MessageBody {
    pub fn as_str(&self) -> &str {
        match self {
            MessageBody::Text(text) | MessageBody::Markup(text) => text,
        }
    }
    pub fn is_markup(&self) -> bool {
        matches!(self, MessageBody::Markup(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: MessageId,
    pub sender: Sender,
    pub body: MessageBody,
}

impl ChatMessage {
    pub fn is_from(&self, sender: Sender) -> bool {
        self.sender == sender
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    #[test]
    fn can_format_message_id_as_dom_id() {
        assert_eq!("msg-0", MessageId::new(0).to_string());
        assert_eq!("msg-42", MessageId::new(42).to_string());
    }

    #[test]
    fn can_classify_sender() {
        assert_eq!("message user-message", Sender::User.css_class());
        assert_eq!("message bot-message", Sender::Bot.css_class());
    }
}
