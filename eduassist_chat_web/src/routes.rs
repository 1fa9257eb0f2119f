use std::{path::PathBuf, sync::Arc};

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::{error, info};

use widget::AskRequest;

use crate::tower_ext::{disable_caching, NoCacheServiceExt};

pub struct AppState {
    pub public_dir: PathBuf,
    /// Answer service the `/ask` route forwards to.
    pub upstream: Option<reqwest::Url>,
    pub http: reqwest::Client,
}

pub fn app(state: Arc<AppState>) -> Router<()> {
    let static_files = ServeDir::new(&state.public_dir).no_cache();

    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/ask", post(ask))
        .fallback_service(static_files)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn index(State(state): State<Arc<AppState>>) -> (StatusCode, HeaderMap, Html<String>) {
    let path = state.public_dir.join("index.html");
    match tokio::fs::read_to_string(&path).await {
        Ok(html) => {
            let mut headers = HeaderMap::new();
            disable_caching(&mut headers);
            (StatusCode::OK, headers, Html(html))
        }
        Err(err) => (StatusCode::NOT_FOUND, HeaderMap::new(), Html(err.to_string())),
    }
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "message": "EDUASSIST for 'His First Flight' is running",
    }))
}

/// Body of an `/ask` request the host can't read.
#[derive(Debug)]
struct UnreadableAsk;

/// Question text of an `/ask` body. `message` is read first and `question` only
/// when `message` is missing or blank. `Ok(None)` is a blank question; a
/// non-object body or a non-text field can't be read.
fn incoming_text(body: &Value) -> Result<Option<&str>, UnreadableAsk> {
    let fields = match body {
        Value::Object(fields) => fields,
        Value::Null | Value::Bool(false) => return Ok(None),
        Value::Array(items) if items.is_empty() => return Ok(None),
        Value::String(text) if text.is_empty() => return Ok(None),
        Value::Number(n) if n.as_f64() == Some(0.0) => return Ok(None),
        _ => return Err(UnreadableAsk),
    };

    for key in ["message", "question"] {
        match fields.get(key) {
            None => {}
            Some(Value::String(text)) if !text.trim().is_empty() => return Ok(Some(text.trim())),
            Some(Value::String(_)) => {}
            Some(_) => return Err(UnreadableAsk),
        }
    }
    Ok(None)
}

async fn ask(
    State(state): State<Arc<AppState>>,
    body: Result<Json<Value>, JsonRejection>,
) -> Response {
    let body = match body {
        Ok(Json(body)) => body,
        Err(e) => {
            error!("Error in /ask route: {e}");
            return internal_error();
        }
    };
    let text = match incoming_text(&body) {
        Ok(Some(text)) => text,
        Ok(None) => return error_reply(StatusCode::BAD_REQUEST, "Please enter a message."),
        Err(UnreadableAsk) => {
            error!("Error in /ask route: unreadable body {body}");
            return internal_error();
        }
    };
    info!("User input: '{text}'");

    let Some(upstream) = &state.upstream else {
        error!("no answer service configured, rejecting /ask");
        return error_reply(
            StatusCode::SERVICE_UNAVAILABLE,
            "The answer service is not configured.",
        );
    };

    let result = state
        .http
        .post(upstream.clone())
        .json(&AskRequest::new(text))
        .send()
        .await;

    match result {
        Ok(response) => relay(response).await,
        Err(e) => {
            error!("Error forwarding /ask to {upstream}: {e}");
            error_reply(
                StatusCode::BAD_GATEWAY,
                "The answer service is unavailable. Please try again.",
            )
        }
    }
}

async fn relay(response: reqwest::Response) -> Response {
    let status = StatusCode::from_u16(response.status().as_u16()).unwrap_or(StatusCode::BAD_GATEWAY);
    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|x| HeaderValue::from_bytes(x.as_bytes()).ok())
        .unwrap_or_else(|| HeaderValue::from_static("application/json"));

    match response.bytes().await {
        Ok(body) => {
            info!("Relayed answer service reply (status = {status})");
            (status, [(header::CONTENT_TYPE, content_type)], body).into_response()
        }
        Err(e) => {
            error!("Error reading answer service reply: {e}");
            error_reply(
                StatusCode::BAD_GATEWAY,
                "The answer service is unavailable. Please try again.",
            )
        }
    }
}

fn internal_error() -> Response {
    error_reply(
        StatusCode::INTERNAL_SERVER_ERROR,
        "An internal server error occurred. Please try again.",
    )
}

fn error_reply(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}
