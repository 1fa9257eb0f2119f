mod conversation;
mod message;

pub use conversation::ChatConversation;
pub use message::{ChatMessage, MessageBody, MessageId, Sender};
