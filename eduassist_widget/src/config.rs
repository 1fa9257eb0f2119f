use serde::{Deserialize, Serialize};

/// Ids of the page elements the widget binds to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatElementIds {
    pub form: String,
    pub input: String,
    pub message_list: String,
    pub send_button: String,
}

impl Default for ChatElementIds {
    fn default() -> Self {
        Self {
            form: "chat-form".to_string(),
            input: "user-input".to_string(),
            message_list: "chat-box".to_string(),
            send_button: "send-button".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetConfig {
    pub endpoint: String,
    pub elements: ChatElementIds,
    pub thinking_text: String,
    /// Prefix shown on every failure message, trailing space included.
    pub error_marker: String,
    pub failure_notice: String,
    pub empty_notice: String,
    /// Insert `response` text as markup without escaping it first.
    pub trust_server_markup: bool,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            endpoint: "/ask".to_string(),
            elements: ChatElementIds::default(),
            thinking_text: "Thinking...".to_string(),
            error_marker: "❌ ".to_string(),
            failure_notice: "Sorry, there was an error processing your request. Please try again."
                .to_string(),
            empty_notice: "No response received from server.".to_string(),
            trust_server_markup: false,
        }
    }
}

impl WidgetConfig {
    /// Parses overrides; any field left out keeps its default.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn marked(&self, text: &str) -> String {
        format!("{}{}", self.error_marker, text)
    }
}
