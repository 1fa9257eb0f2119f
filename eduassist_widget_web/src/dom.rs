use anyhow::{anyhow, Context};
use tracing::error;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlInputElement};

use widget::{ChatElementIds, ChatMessage, ChatView, MessageBody, MessageId};

pub fn js_error(value: JsValue) -> anyhow::Error {
    anyhow!("{:?}", value)
}

/// The page elements the widget is bound to.
#[derive(Clone)]
pub struct ChatElements {
    pub form: Element,
    pub input: HtmlInputElement,
    pub message_list: Element,
    pub send_button: Element,
}

impl ChatElements {
    pub fn locate(document: &Document, ids: &ChatElementIds) -> anyhow::Result<Self> {
        Ok(Self {
            form: element_by_id(document, &ids.form)?,
            input: element_by_id(document, &ids.input)?,
            message_list: element_by_id(document, &ids.message_list)?,
            send_button: element_by_id(document, &ids.send_button)?,
        })
    }
}

fn element_by_id<T: JsCast>(document: &Document, id: &str) -> anyhow::Result<T> {
    document
        .get_element_by_id(id)
        .with_context(|| format!("page is missing element #{id}"))?
        .dyn_into::<T>()
        .map_err(|_| anyhow!("element #{id} has an unexpected type"))
}

pub struct DomChatView {
    document: Document,
    input: HtmlInputElement,
    message_list: Element,
}

impl DomChatView {
    pub fn new(document: Document, elements: &ChatElements) -> Self {
        Self {
            document,
            input: elements.input.clone(),
            message_list: elements.message_list.clone(),
        }
    }

    fn create_message_node(&self, message: &ChatMessage) -> Result<Element, JsValue> {
        let node = self.document.create_element("div")?;
        node.set_id(&message.id.to_string());
        node.set_class_name(message.sender.css_class());

        let text = self.document.create_element("div")?;
        text.set_class_name("message-text");
        match &message.body {
            MessageBody::Text(value) => text.set_text_content(Some(value.as_str())),
            MessageBody::Markup(markup) => text.set_inner_html(markup),
        }

        node.append_child(&text)?;
        Ok(node)
    }
}

impl ChatView for DomChatView {
    fn input_text(&self) -> String {
        self.input.value()
    }

    fn clear_input(&self) {
        self.input.set_value("");
    }

    fn append_message(&self, message: &ChatMessage) {
        let appended = self
            .create_message_node(message)
            .and_then(|node| self.message_list.append_child(&node));

        match appended {
            Ok(_) => {
                let list = &self.message_list;
                list.set_scroll_top(list.scroll_height());
            }
            Err(e) => error!("failed to render message {}: {:?}", message.id, e),
        }
    }

    fn remove_message(&self, id: MessageId) {
        if let Some(node) = self.document.get_element_by_id(&id.to_string()) {
            node.remove();
        }
    }
}
