use tracing::{info, warn};

use crate::{
    config::WidgetConfig,
    exchange::ExchangeError,
    model::{ChatConversation, ChatMessage, MessageBody, MessageId, Sender},
    render,
    reply::{AskReply, AskRequest},
};

/// Terminal state of one submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Answer(String),
    ServerError(String),
    TransportError,
    EmptyResponse,
}

impl Resolution {
    pub fn from_exchange(result: Result<AskReply, ExchangeError>) -> Self {
        match result {
            Ok(AskReply::Answer(text)) => Resolution::Answer(text),
            Ok(AskReply::Rejected(error)) => Resolution::ServerError(error),
            Ok(AskReply::Empty) => Resolution::EmptyResponse,
            Err(e) => {
                warn!("ask exchange failed: {e}");
                Resolution::TransportError
            }
        }
    }
}

/// A change the render step has to mirror onto the display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewPatch {
    Append(ChatMessage),
    Remove(MessageId),
    ClearInput,
}

/// A submission that passed the emptiness check and awaits its reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub placeholder: MessageId,
    pub request: AskRequest,
    pub patches: Vec<ViewPatch>,
}

/// View-model of the widget: owns the conversation and computes the patches
/// for each submit and each resolution. Performs no IO.
#[derive(Debug, Default)]
pub struct ChatWidget {
    config: WidgetConfig,
    conversation: ChatConversation,
}

impl ChatWidget {
    pub fn new(config: WidgetConfig) -> Self {
        Self {
            config,
            conversation: ChatConversation::new(),
        }
    }

    pub fn config(&self) -> &WidgetConfig {
        &self.config
    }

    pub fn conversation(&self) -> &ChatConversation {
        &self.conversation
    }

    /// Returns `None` when `raw_input` is blank; nothing changes in that case.
    pub fn submit(&mut self, raw_input: &str) -> Option<Submission> {
        let text = raw_input.trim_matches(is_input_whitespace);
        if text.is_empty() {
            return None;
        }

        let user = self.append(Sender::User, MessageBody::Text(text.to_string()));
        let thinking = MessageBody::Text(self.config.thinking_text.clone());
        let placeholder = self.append(Sender::Bot, thinking);
        info!("submitted message (placeholder = {})", placeholder.id);

        Some(Submission {
            placeholder: placeholder.id,
            request: AskRequest::new(text),
            patches: vec![
                ViewPatch::Append(user),
                ViewPatch::ClearInput,
                ViewPatch::Append(placeholder),
            ],
        })
    }

    /// Swaps the placeholder for the message describing `resolution`.
    pub fn resolve(&mut self, placeholder: MessageId, resolution: &Resolution) -> Vec<ViewPatch> {
        let mut patches = Vec::with_capacity(2);
        if self.conversation.remove(placeholder).is_some() {
            patches.push(ViewPatch::Remove(placeholder));
        } else {
            warn!("placeholder {placeholder} was already removed");
        }

        let body = self.bot_body(resolution);
        patches.push(ViewPatch::Append(self.append(Sender::Bot, body)));
        patches
    }

    pub fn remove(&mut self, id: MessageId) -> Option<ViewPatch> {
        self.conversation.remove(id).map(|x| ViewPatch::Remove(x.id))
    }

    fn bot_body(&self, resolution: &Resolution) -> MessageBody {
        let config = &self.config;
        match resolution {
            Resolution::Answer(text) => {
                MessageBody::Markup(render::answer_markup(text, config.trust_server_markup))
            }
            Resolution::ServerError(error) => MessageBody::Text(config.marked(error)),
            Resolution::TransportError => MessageBody::Text(config.marked(&config.failure_notice)),
            Resolution::EmptyResponse => MessageBody::Text(config.marked(&config.empty_notice)),
        }
    }

    fn append(&mut self, sender: Sender, body: MessageBody) -> ChatMessage {
        self.conversation.append(sender, body).clone()
    }
}

/// Whitespace as a browser's `String.prototype.trim` sees it: the BOM counts,
/// NEL (U+0085) does not.
fn is_input_whitespace(c: char) -> bool {
    c == '\u{feff}' || (c != '\u{85}' && c.is_whitespace())
}
