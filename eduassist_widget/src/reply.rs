use serde::{de, Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AskRequest {
    pub message: String,
}

impl AskRequest {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Decoded body of a successful `/ask` exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AskReply {
    Answer(String),
    Rejected(String),
    Empty,
}

impl AskReply {
    /// Decodes a reply body. Only a JSON object can carry `response` or
    /// `error`; any other non-null value decodes as `Empty`. `error` wins
    /// over `response`, and a field only counts when its value is truthy.
    ///
    /// A `null` body, or a truthy `response` that is not a string, is
    /// malformed.
    pub fn decode(body: &[u8]) -> serde_json::Result<Self> {
        let fields = match serde_json::from_slice::<Value>(body)? {
            Value::Object(fields) => fields,
            Value::Null => return Err(de::Error::custom("reply body is null")),
            _ => return Ok(AskReply::Empty),
        };

        if let Some(error) = fields.get("error").filter(|x| is_truthy(x)) {
            return Ok(AskReply::Rejected(concat_text(error)));
        }
        match fields.get("response").filter(|x| is_truthy(x)) {
            Some(Value::String(text)) => Ok(AskReply::Answer(text.clone())),
            Some(other) => Err(de::Error::custom(format!(
                "reply response is not text: {other}"
            ))),
            None => Ok(AskReply::Empty),
        }
    }
}

/// `false` for null, `false`, zero and the empty string.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(false) => false,
        Value::String(text) => !text.is_empty(),
        Value::Number(n) => n.as_f64() != Some(0.0),
        _ => true,
    }
}

/// Text a value contributes when appended to a string: arrays join their
/// items with `,` (null items become empty), objects become `[object Object]`.
fn concat_text(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => match (n.is_f64(), n.as_f64()) {
            (true, Some(f)) => f.to_string(),
            _ => n.to_string(),
        },
        Value::String(text) => text.clone(),
        Value::Array(items) => items
            .iter()
            .map(|x| match x {
                Value::Null => String::new(),
                other => concat_text(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}
