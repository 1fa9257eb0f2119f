use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use tracing::debug;

use crate::reply::{AskReply, AskRequest};

#[derive(Debug, thiserror::Error)]
pub enum ExchangeError {
    #[error("request failed to complete: {0}")]
    Transport(String),
    #[error("server responded with status {0}")]
    Status(StatusCode),
    #[error("malformed reply payload: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("invalid endpoint '{0}'")]
    Endpoint(String),
}

/// One request/reply round trip with the answer service.
///
/// Futures are not required to be `Send`: in the browser every completion
/// runs on the page's event loop.
#[async_trait(?Send)]
pub trait AskClient {
    async fn ask(&self, request: &AskRequest) -> Result<AskReply, ExchangeError>;
}

#[derive(Debug, Clone)]
pub struct HttpAskClient {
    http: reqwest::Client,
    endpoint: Url,
}

impl HttpAskClient {
    pub fn new(endpoint: Url) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint,
        }
    }

    /// Resolves `path` against `base`, e.g. the page origin and `/ask`.
    pub fn from_base(base: &str, path: &str) -> Result<Self, ExchangeError> {
        let endpoint = Url::parse(base)
            .and_then(|base| base.join(path))
            .map_err(|e| ExchangeError::Endpoint(format!("{base} + {path}: {e}")))?;
        Ok(Self::new(endpoint))
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait(?Send)]
impl AskClient for HttpAskClient {
    async fn ask(&self, request: &AskRequest) -> Result<AskReply, ExchangeError> {
        debug!("posting message to {}", self.endpoint);
        let response = self
            .http
            .post(self.endpoint.clone())
            .json(request)
            .send()
            .await
            .map_err(|e| ExchangeError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ExchangeError::Status(status));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| ExchangeError::Transport(e.to_string()))?;

        Ok(AskReply::decode(&body)?)
    }
}
