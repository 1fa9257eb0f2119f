use std::rc::Rc;

use anyhow::Context;
use tracing::{error, info};
use wasm_bindgen::{prelude::Closure, JsCast};
use web_sys::{Document, Event};

use widget::{ChatSession, HttpAskClient, WidgetConfig};

mod dom;

use dom::{js_error, ChatElements, DomChatView};

const CONFIG_ELEMENT_ID: &str = "chat-config";

type Session = ChatSession<HttpAskClient, DomChatView>;

fn main() {
    tracing_wasm::set_as_global_default();

    if let Err(e) = start() {
        error!("chat widget failed to start: {e:#}");
    }
}

fn start() -> anyhow::Result<()> {
    let window = web_sys::window().context("no global window")?;
    let document = window.document().context("window has no document")?;

    let config = load_config(&document)?;
    let origin = window.location().origin().map_err(js_error)?;
    let client = HttpAskClient::from_base(&origin, &config.endpoint)?;
    let elements = ChatElements::locate(&document, &config.elements)?;
    info!("posting chat messages to {}", client.endpoint());

    let view = DomChatView::new(document, &elements);
    let session = Rc::new(ChatSession::new(config, client, view));

    let on_submit = Closure::<dyn FnMut(_)>::new({
        let session = session.clone();
        move |e: Event| {
            e.prevent_default();
            spawn_submit(&session);
        }
    });
    elements
        .form
        .add_event_listener_with_callback("submit", on_submit.into_js_value().unchecked_ref())
        .map_err(js_error)?;

    // a click on a submit button also fires the form's submit; the second
    // run sees the cleared input and does nothing
    let on_click = Closure::<dyn FnMut(_)>::new({
        let session = session.clone();
        move |_: Event| spawn_submit(&session)
    });
    elements
        .send_button
        .add_event_listener_with_callback("click", on_click.into_js_value().unchecked_ref())
        .map_err(js_error)?;

    elements.input.focus().map_err(js_error)?;
    Ok(())
}

fn spawn_submit(session: &Rc<Session>) {
    let session = session.clone();
    wasm_bindgen_futures::spawn_local(async move {
        session.submit().await;
    });
}

fn load_config(document: &Document) -> anyhow::Result<WidgetConfig> {
    let overrides = document
        .get_element_by_id(CONFIG_ELEMENT_ID)
        .and_then(|x| x.text_content());

    match overrides {
        Some(json) if !json.trim().is_empty() => {
            WidgetConfig::from_json(&json).context("invalid chat widget configuration")
        }
        _ => Ok(WidgetConfig::default()),
    }
}
