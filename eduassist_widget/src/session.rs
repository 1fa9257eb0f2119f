use std::cell::RefCell;

use tracing::debug;

use crate::{
    config::WidgetConfig,
    controller::{ChatWidget, Resolution, ViewPatch},
    exchange::AskClient,
    model::{ChatMessage, MessageId},
};

/// Display the widget renders into.
pub trait ChatView {
    fn input_text(&self) -> String;
    fn clear_input(&self);
    /// Appends a node for `message` and scrolls it into view.
    fn append_message(&self, message: &ChatMessage);
    /// Removes the node for `id`; must tolerate ids that are already gone.
    fn remove_message(&self, id: MessageId);

    fn apply(&self, patch: &ViewPatch) {
        match patch {
            ViewPatch::Append(message) => self.append_message(message),
            ViewPatch::Remove(id) => self.remove_message(*id),
            ViewPatch::ClearInput => self.clear_input(),
        }
    }
}

/// Drives a [`ChatWidget`] against a client and a view.
///
/// Any number of submissions may be in flight at once; the widget is only
/// borrowed between suspension points.
pub struct ChatSession<C, V> {
    widget: RefCell<ChatWidget>,
    client: C,
    view: V,
}

impl<C: AskClient, V: ChatView> ChatSession<C, V> {
    pub fn new(config: WidgetConfig, client: C, view: V) -> Self {
        Self {
            widget: RefCell::new(ChatWidget::new(config)),
            client,
            view,
        }
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn with_widget<T>(&self, f: impl FnOnce(&ChatWidget) -> T) -> T {
        f(&self.widget.borrow())
    }

    /// Submits whatever the view's input currently holds.
    pub async fn submit(&self) -> Option<Resolution> {
        let raw_input = self.view.input_text();
        self.send(&raw_input).await
    }

    pub async fn send(&self, raw_input: &str) -> Option<Resolution> {
        let submission = self.widget.borrow_mut().submit(raw_input)?;
        self.render(&submission.patches);

        let result = self.client.ask(&submission.request).await;
        let resolution = Resolution::from_exchange(result);
        debug!("resolved {} as {:?}", submission.placeholder, resolution);

        let patches = self
            .widget
            .borrow_mut()
            .resolve(submission.placeholder, &resolution);
        self.render(&patches);

        Some(resolution)
    }

    fn render(&self, patches: &[ViewPatch]) {
        for patch in patches {
            self.view.apply(patch);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use async_trait::async_trait;
    use test_log::test;
    use tokio::sync::oneshot;

    use super::*;
    use crate::{
        exchange::ExchangeError,
        model::{MessageBody, Sender},
        reply::{AskReply, AskRequest},
    };

    type ReplyResult = Result<AskReply, ExchangeError>;

    #[derive(Default)]
    struct RecordingView {
        input: RefCell<String>,
        nodes: RefCell<Vec<ChatMessage>>,
        removals: RefCell<Vec<MessageId>>,
    }

    impl RecordingView {
        fn with_input(text: &str) -> Self {
            let view = Self::default();
            *view.input.borrow_mut() = text.to_string();
            view
        }
        fn bodies(&self) -> Vec<String> {
            let nodes = self.nodes.borrow();
            nodes.iter().map(|x| x.body.as_str().to_string()).collect()
        }
    }

    impl ChatView for RecordingView {
        fn input_text(&self) -> String {
            self.input.borrow().clone()
        }
        fn clear_input(&self) {
            self.input.borrow_mut().clear();
        }
        fn append_message(&self, message: &ChatMessage) {
            self.nodes.borrow_mut().push(message.clone());
        }
        fn remove_message(&self, id: MessageId) {
            self.removals.borrow_mut().push(id);
            self.nodes.borrow_mut().retain(|x| x.id != id);
        }
    }

    /// Answers each request with the next queued receiver.
    #[derive(Default)]
    struct ScriptedClient {
        replies: RefCell<VecDeque<oneshot::Receiver<ReplyResult>>>,
        requests: RefCell<Vec<AskRequest>>,
    }

    impl ScriptedClient {
        fn expect_reply(&self) -> oneshot::Sender<ReplyResult> {
            let (tx, rx) = oneshot::channel();
            self.replies.borrow_mut().push_back(rx);
            tx
        }
        fn replying(reply: ReplyResult) -> Self {
            let client = Self::default();
            let _ = client.expect_reply().send(reply);
            client
        }
    }

    #[async_trait(?Send)]
    impl AskClient for ScriptedClient {
        async fn ask(&self, request: &AskRequest) -> ReplyResult {
            self.requests.borrow_mut().push(request.clone());
            let reply = self.replies.borrow_mut().pop_front();
            match reply {
                Some(rx) => rx
                    .await
                    .unwrap_or_else(|_| Err(ExchangeError::Transport("reply dropped".into()))),
                None => Err(ExchangeError::Transport("no reply scripted".into())),
            }
        }
    }

    fn session(
        client: ScriptedClient,
        view: RecordingView,
    ) -> ChatSession<ScriptedClient, RecordingView> {
        ChatSession::new(WidgetConfig::default(), client, view)
    }

    #[test(tokio::test)]
    async fn can_submit_and_render_answer() {
        let client = ScriptedClient::replying(Ok(AskReply::Answer("a\nb".into())));
        let session = session(client, RecordingView::with_input("  hello "));

        let resolution = session.submit().await;

        assert_eq!(Some(Resolution::Answer("a\nb".into())), resolution);
        assert_eq!("", session.view().input_text());
        assert_eq!(vec!["hello", "a<br>b"], session.view().bodies());
        assert_eq!(1, session.view().removals.borrow().len());
        assert_eq!(
            vec![AskRequest::new("hello")],
            *session.client().requests.borrow()
        );

        let nodes = session.view().nodes.borrow();
        assert!(nodes[0].is_from(Sender::User));
        assert!(nodes[1].body.is_markup());
    }

    #[test(tokio::test)]
    async fn can_ignore_blank_input() {
        let session = session(ScriptedClient::default(), RecordingView::with_input("   "));

        assert_eq!(None, session.submit().await);
        assert_eq!("   ", session.view().input_text());
        assert!(session.view().nodes.borrow().is_empty());
        assert!(session.client().requests.borrow().is_empty());
        session.with_widget(|widget| assert!(widget.conversation().is_empty()));
    }

    #[test(tokio::test)]
    async fn can_report_transport_failure() {
        let client = ScriptedClient::default();
        drop(client.expect_reply());
        let session = session(client, RecordingView::default());

        let resolution = session.send("hello").await;

        assert_eq!(Some(Resolution::TransportError), resolution);
        assert_eq!(
            vec![
                "hello",
                "❌ Sorry, there was an error processing your request. Please try again."
            ],
            session.view().bodies()
        );
        assert_eq!(1, session.view().removals.borrow().len());
    }

    #[test(tokio::test)]
    async fn can_report_server_error() {
        let client = ScriptedClient::replying(Ok(AskReply::Rejected("bad request".into())));
        let session = session(client, RecordingView::default());

        session.send("hello").await;

        let nodes = session.view().nodes.borrow();
        assert_eq!(
            MessageBody::Text("❌ bad request".to_string()),
            nodes[1].body
        );
    }

    #[test(tokio::test)]
    async fn can_resolve_concurrent_submissions_in_arrival_order() {
        let client = ScriptedClient::default();
        let first_reply = client.expect_reply();
        let second_reply = client.expect_reply();
        let session = session(client, RecordingView::default());

        let answer_later = async {
            let _ = second_reply.send(Ok(AskReply::Answer("second answer".into())));
            while !session.view().bodies().contains(&"second answer".to_string()) {
                tokio::task::yield_now().await;
            }
            let _ = first_reply.send(Ok(AskReply::Answer("first answer".into())));
        };

        let (first, second, _) = tokio::join!(
            session.send("first"),
            session.send("second"),
            answer_later
        );

        assert_eq!(Some(Resolution::Answer("first answer".into())), first);
        assert_eq!(Some(Resolution::Answer("second answer".into())), second);
        assert_eq!(
            vec!["first", "second", "second answer", "first answer"],
            session.view().bodies()
        );
        assert_eq!(2, session.view().removals.borrow().len());
        session.with_widget(|widget| {
            let thinking = widget
                .conversation()
                .messages()
                .iter()
                .filter(|x| x.body.as_str() == "Thinking...")
                .count();
            assert_eq!(0, thinking);
        });
    }
}
