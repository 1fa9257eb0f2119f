use serde::{Deserialize, Serialize};

use super::{ChatMessage, MessageBody, MessageId, Sender};

/// Ordered, append-only list of the messages currently on screen.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct ChatConversation {
    messages: Vec<ChatMessage>,
    next_seq: u64,
}

impl ChatConversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, sender: Sender, body: MessageBody) -> &ChatMessage {
        let id = MessageId::new(self.next_seq);
        self.next_seq += 1;

        self.messages.push(ChatMessage { id, sender, body });
        &self.messages[self.messages.len() - 1]
    }

    /// Removes the message with `id`, returning it. Removing an id that is
    /// no longer present is a no-op.
    pub fn remove(&mut self, id: MessageId) -> Option<ChatMessage> {
        let idx = self.messages.iter().position(|x| x.id == id)?;
        Some(self.messages.remove(idx))
    }

    pub fn get(&self, id: MessageId) -> Option<&ChatMessage> {
        self.messages.iter().find(|x| x.id == id)
    }

    pub fn contains(&self, id: MessageId) -> bool {
        self.get(id).is_some()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
