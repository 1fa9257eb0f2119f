pub mod config;
pub mod controller;
pub mod exchange;
pub mod model;
pub mod render;
pub mod reply;
pub mod session;

pub use config::{ChatElementIds, WidgetConfig};
pub use controller::{ChatWidget, Resolution, Submission, ViewPatch};
pub use exchange::{AskClient, ExchangeError, HttpAskClient};
pub use model::{ChatConversation, ChatMessage, MessageBody, MessageId, Sender};
pub use reply::{AskReply, AskRequest};
pub use session::{ChatSession, ChatView};
