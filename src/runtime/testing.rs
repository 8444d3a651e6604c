//! Mock implementations for testing
//!
//! These mocks enable end-to-end widget tests without real I/O.

use super::{spawn_widget, WidgetHandle};
use crate::config::WidgetConfig;
use crate::lead::LeadPayload;
use crate::protocol::{ChatBackend, ChatReply, ChatRequest, ProtocolError};
use crate::transcript::SessionId;
use crate::view::View;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{watch, Semaphore};

// ============================================================================
// Mock Chat Backend
// ============================================================================

/// Mock backend that returns queued results and records what it was sent
#[derive(Default)]
pub struct MockBackend {
    chat_results: Mutex<VecDeque<Result<ChatReply, ProtocolError>>>,
    lead_results: Mutex<VecDeque<Result<(), ProtocolError>>>,
    /// When set, each chat request waits for a permit before answering
    gate: Option<Semaphore>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    chat_requests: Mutex<Vec<ChatRequest>>,
    leads: Mutex<Vec<LeadPayload>>,
}

impl MockBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Chat requests block until `release` is called
    #[must_use]
    pub fn gated() -> Self {
        Self {
            gate: Some(Semaphore::new(0)),
            ..Self::default()
        }
    }

    /// Let `n` blocked chat requests answer
    pub fn release(&self, n: usize) {
        if let Some(gate) = &self.gate {
            gate.add_permits(n);
        }
    }

    pub fn queue_chat(&self, result: Result<ChatReply, ProtocolError>) {
        self.chat_results.lock().unwrap().push_back(result);
    }

    /// Queue a successful reply
    pub fn queue_reply(&self, message: &str, session_id: Option<&str>, show_form: Option<&str>) {
        self.queue_chat(Ok(ChatReply {
            success: true,
            message: Some(message.to_string()),
            session_id: session_id.map(SessionId::new),
            show_form: show_form.map(ToString::to_string),
        }));
    }

    pub fn queue_lead(&self, result: Result<(), ProtocolError>) {
        self.lead_results.lock().unwrap().push_back(result);
    }

    #[must_use]
    pub fn recorded_chats(&self) -> Vec<ChatRequest> {
        self.chat_requests.lock().unwrap().clone()
    }

    #[must_use]
    pub fn recorded_leads(&self) -> Vec<LeadPayload> {
        self.leads.lock().unwrap().clone()
    }

    /// Highest number of chat requests that were ever outstanding together
    #[must_use]
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChatBackend for MockBackend {
    async fn send_chat(&self, request: &ChatRequest) -> Result<ChatReply, ProtocolError> {
        self.chat_requests.lock().unwrap().push(request.clone());
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        if let Some(gate) = &self.gate {
            gate.acquire().await.unwrap().forget();
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.chat_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ProtocolError::transport("No mock reply queued")))
    }

    async fn submit_lead(&self, payload: &LeadPayload) -> Result<(), ProtocolError> {
        self.leads.lock().unwrap().push(payload.clone());
        self.lead_results.lock().unwrap().pop_front().unwrap_or(Ok(()))
    }
}

// ============================================================================
// Test Harness
// ============================================================================

/// A spawned widget plus its mock backend
pub struct TestWidget {
    pub handle: WidgetHandle,
    pub backend: Arc<MockBackend>,
    views: watch::Receiver<View>,
}

impl TestWidget {
    #[must_use]
    pub fn spawn(config: &WidgetConfig, backend: MockBackend) -> Self {
        let backend = Arc::new(backend);
        let handle = spawn_widget(config, backend.clone()).unwrap();
        let views = handle.subscribe();
        Self {
            handle,
            backend,
            views,
        }
    }

    /// Wait (bounded) until the published view satisfies `pred`
    pub async fn wait_for(&mut self, pred: impl FnMut(&View) -> bool) -> View {
        tokio::time::timeout(Duration::from_secs(5), self.views.wait_for(pred))
            .await
            .expect("timed out waiting for view")
            .expect("widget runtime stopped")
            .clone()
    }

    /// Wait until the transcript holds `count` messages
    pub async fn wait_for_messages(&mut self, count: usize) -> View {
        self.wait_for(|v| v.messages.len() >= count).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ticket99;
    use crate::lead::{LeadInput, ValidationError};
    use crate::state_machine::StateKind;
    use crate::transcript::Role;
    use crate::view::ControlSurface;

    fn config() -> WidgetConfig {
        ticket99()
    }

    #[tokio::test]
    async fn test_mock_backend() {
        let mock = MockBackend::new();
        mock.queue_reply("Hello", Some("abc"), None);

        let request = ChatRequest {
            message: "Hi".to_string(),
            session_id: None,
        };
        let reply = mock.send_chat(&request).await.unwrap();
        assert!(reply.success);
        assert_eq!(reply.message.as_deref(), Some("Hello"));

        // Second call should fail (no more replies)
        assert!(mock.send_chat(&request).await.is_err());
        assert_eq!(mock.recorded_chats().len(), 2);
    }

    #[tokio::test]
    async fn test_open_shows_welcome_once() {
        let mut widget = TestWidget::spawn(&config(), MockBackend::new());

        widget.handle.toggle().await.unwrap();
        let view = widget.wait_for(|v| v.open).await;
        assert_eq!(view.messages.len(), 1);
        assert_eq!(view.messages[0].role, Role::Bot);
        assert!(matches!(view.control, ControlSurface::QuickReplies { .. }));

        widget.handle.toggle().await.unwrap();
        widget.wait_for(|v| !v.open).await;
        widget.handle.toggle().await.unwrap();
        let view = widget.wait_for(|v| v.open).await;
        assert_eq!(view.messages.len(), 1);
    }

    #[tokio::test]
    async fn test_chat_round_trip_with_session() {
        let backend = MockBackend::new();
        backend.queue_reply("Plans start at $10", Some("abc"), None);
        backend.queue_reply("Anything else?", Some("abc"), None);
        let mut widget = TestWidget::spawn(&config(), backend);

        widget.handle.toggle().await.unwrap();
        widget.handle.send("Pricing").await.unwrap();
        let view = widget.wait_for_messages(3).await;
        assert_eq!(view.messages[1].text, "Pricing");
        assert_eq!(view.messages[2].text, "Plans start at $10");
        assert_eq!(view.session_id, Some(SessionId::new("abc")));
        assert_eq!(view.state, StateKind::OpenIdle);
        assert!(!view.typing);

        widget.handle.send("More").await.unwrap();
        widget.wait_for_messages(5).await;

        let chats = widget.backend.recorded_chats();
        assert_eq!(chats[0].session_id, None);
        assert_eq!(chats[1].session_id, Some(SessionId::new("abc")));
    }

    #[tokio::test]
    async fn test_quick_reply_sends_label() {
        let backend = MockBackend::new();
        backend.queue_reply("Sure", None, None);
        let mut widget = TestWidget::spawn(&config(), backend);

        widget.handle.toggle().await.unwrap();
        widget.handle.choose_quick_reply(0).await.unwrap();
        let view = widget.wait_for_messages(3).await;

        let label = &widget.handle.config().quick_replies[0].label;
        assert_eq!(&view.messages[1].text, label);
        assert_eq!(&widget.backend.recorded_chats()[0].message, label);
        // Quick replies are one-shot
        assert_eq!(view.control, ControlSurface::None);
    }

    #[tokio::test]
    async fn test_second_send_while_waiting_is_ignored() {
        let backend = MockBackend::gated();
        backend.queue_reply("First answer", None, None);
        let mut widget = TestWidget::spawn(&config(), backend);

        widget.handle.toggle().await.unwrap();
        widget.handle.send("one").await.unwrap();
        let view = widget.wait_for(|v| v.typing).await;
        assert_eq!(view.state, StateKind::AwaitingResponse);

        widget.handle.send("two").await.unwrap();
        widget.handle.choose_quick_reply(0).await.unwrap();
        widget.backend.release(1);

        let view = widget.wait_for(|v| !v.typing).await;
        let texts: Vec<_> = view.messages.iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts[1..], ["one", "First answer"]);
        assert_eq!(widget.backend.recorded_chats().len(), 1);
        assert_eq!(widget.backend.max_in_flight(), 1);
    }

    #[tokio::test]
    async fn test_failures_show_fallback_copy() {
        let backend = MockBackend::new();
        backend.queue_chat(Ok(ChatReply::default()));
        backend.queue_chat(Err(ProtocolError::transport("connection refused")));
        let mut widget = TestWidget::spawn(&config(), backend);
        let copy = widget.handle.config().copy.clone();

        widget.handle.toggle().await.unwrap();
        widget.handle.send("hello").await.unwrap();
        let view = widget.wait_for_messages(3).await;
        assert_eq!(view.messages[2].text, copy.generic_failure);
        assert_eq!(view.state, StateKind::OpenIdle);

        widget.handle.send("hello again").await.unwrap();
        let view = widget.wait_for_messages(5).await;
        assert_eq!(view.messages[4].text, copy.connectivity_failure);
        assert_eq!(view.session_id, None);
    }

    #[tokio::test]
    async fn test_reply_arriving_while_closed() {
        let backend = MockBackend::gated();
        backend.queue_reply("Here you go", Some("s1"), Some("lead"));
        let mut widget = TestWidget::spawn(&config(), backend);

        widget.handle.toggle().await.unwrap();
        widget.handle.send("Pricing").await.unwrap();
        widget.wait_for(|v| v.typing).await;

        widget.handle.toggle().await.unwrap();
        let view = widget.wait_for(|v| !v.open).await;
        assert!(!view.typing);

        widget.backend.release(1);
        let view = widget.wait_for_messages(3).await;
        assert!(!view.open);
        assert_eq!(view.messages[2].text, "Here you go");

        // The form requested while closed is waiting on reopen
        widget.handle.toggle().await.unwrap();
        let view = widget.wait_for(|v| v.open).await;
        assert_eq!(view.state, StateKind::AwaitingFormSubmit);
        assert_eq!(view.messages.len(), 3);
    }

    #[tokio::test]
    async fn test_lead_capture_flow() {
        let backend = MockBackend::new();
        backend.queue_reply("Tell us about you", Some("s1"), Some("partner"));
        let mut widget = TestWidget::spawn(&config(), backend);
        let copy = widget.handle.config().copy.clone();

        widget.handle.toggle().await.unwrap();
        widget.handle.send("I want to partner").await.unwrap();
        let view = widget
            .wait_for(|v| v.state == StateKind::AwaitingFormSubmit)
            .await;
        assert_eq!(
            view.control,
            ControlSurface::LeadForm {
                form_type: "partner".to_string(),
                error: None
            }
        );

        // Missing email keeps the form up with an error
        widget
            .handle
            .submit_lead(LeadInput::new("Asha", ""))
            .await
            .unwrap();
        let view = widget
            .wait_for(|v| matches!(&v.control, ControlSurface::LeadForm { error: Some(_), .. }))
            .await;
        assert_eq!(
            view.control,
            ControlSurface::LeadForm {
                form_type: "partner".to_string(),
                error: Some(ValidationError::MissingContact)
            }
        );
        assert!(widget.backend.recorded_leads().is_empty());

        widget
            .handle
            .submit_lead(
                LeadInput::new("Asha", "asha@example.com")
                    .with_phone("555-0100")
                    .with_field("partnerType", "sponsor"),
            )
            .await
            .unwrap();
        let view = widget.wait_for(|v| v.last_message().is_some_and(|m| m.text == copy.lead_thanks)).await;
        assert_eq!(view.control, ControlSurface::None);
        assert_eq!(view.state, StateKind::OpenIdle);

        let leads = widget.backend.recorded_leads();
        assert_eq!(leads.len(), 1);
        assert_eq!(leads[0].form_type, "partner");
        assert_eq!(leads[0].brand, "ticket99");
        assert_eq!(leads[0].phone, "555-0100");
    }

    #[tokio::test]
    async fn test_failed_lead_shows_fallback() {
        let backend = MockBackend::new();
        backend.queue_reply("Details please", None, Some("lead"));
        backend.queue_lead(Err(ProtocolError::status(500, "Internal Server Error")));
        let mut widget = TestWidget::spawn(&config(), backend);
        let copy = widget.handle.config().copy.clone();

        widget.handle.toggle().await.unwrap();
        widget.handle.send("Book a demo").await.unwrap();
        widget
            .wait_for(|v| v.state == StateKind::AwaitingFormSubmit)
            .await;

        widget
            .handle
            .submit_lead(LeadInput::new("Asha", "asha@example.com").with_field("eventType", "Concert"))
            .await
            .unwrap();
        let view = widget
            .wait_for(|v| v.last_message().is_some_and(|m| m.text == copy.lead_fallback))
            .await;
        assert_eq!(view.state, StateKind::OpenIdle);
    }

    #[tokio::test]
    async fn test_runtime_stops_when_handles_dropped() {
        let widget = TestWidget::spawn(&config(), MockBackend::new());
        let mut views = widget.handle.subscribe();
        drop(widget);

        // The sender side of the view channel goes away with the runtime
        let closed = tokio::time::timeout(Duration::from_secs(5), async {
            while views.changed().await.is_ok() {}
        })
        .await;
        assert!(closed.is_ok());
    }
}
