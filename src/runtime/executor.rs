//! Widget runtime executor

use crate::protocol::ChatBackend;
use crate::state_machine::{
    transition, ChatOutcome, ConvState, Effect, Event, LeadOutcome, WidgetContext,
};
use crate::transcript::Transcript;
use crate::view::View;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};

/// Event loop for one widget, generic over the backend it talks to
pub struct WidgetRuntime<B>
where
    B: ChatBackend + 'static,
{
    context: WidgetContext,
    state: ConvState,
    transcript: Transcript,
    backend: Arc<B>,
    event_rx: mpsc::Receiver<Event>,
    /// Weak so that the loop ends once every `WidgetHandle` is gone
    event_tx: mpsc::WeakSender<Event>,
    view_tx: watch::Sender<View>,
}

impl<B> WidgetRuntime<B>
where
    B: ChatBackend + 'static,
{
    #[must_use]
    pub fn new(
        context: WidgetContext,
        state: ConvState,
        transcript: Transcript,
        backend: B,
        event_rx: mpsc::Receiver<Event>,
        event_tx: mpsc::WeakSender<Event>,
        view_tx: watch::Sender<View>,
    ) -> Self {
        Self {
            context,
            state,
            transcript,
            backend: Arc::new(backend),
            event_rx,
            event_tx,
            view_tx,
        }
    }

    pub async fn run(mut self) {
        tracing::info!(
            widget_id = %self.context.widget_id,
            brand = %self.context.config.brand_key,
            "Starting widget runtime"
        );

        while let Some(event) = self.event_rx.recv().await {
            self.process_event(event);
            self.publish_view();
        }

        tracing::info!(widget_id = %self.context.widget_id, "Widget runtime stopped");
    }

    fn process_event(&mut self, event: Event) {
        let event_name = event.name();
        let result = match transition(&self.state, &self.context, &self.transcript, event) {
            Ok(r) => r,
            Err(e) if e.is_silent() => {
                tracing::debug!(event = event_name, state = %self.state.kind(), reason = %e, "Event ignored");
                return;
            }
            Err(e) => {
                tracing::warn!(event = event_name, state = %self.state.kind(), error = %e, "Event rejected");
                return;
            }
        };

        let old_kind = self.state.kind();
        self.state = result.new_state;
        if old_kind != self.state.kind() {
            tracing::debug!(
                widget_id = %self.context.widget_id,
                from = %old_kind,
                to = %self.state.kind(),
                event = event_name,
                "State changed"
            );
        }

        for effect in result.effects {
            self.execute_effect(effect);
        }
    }

    fn execute_effect(&mut self, effect: Effect) {
        match effect {
            Effect::AppendMessage { message } => {
                self.transcript.push(message);
            }

            Effect::ReplaceSession { session_id } => {
                if self.transcript.session_id() != session_id.as_ref() {
                    tracing::debug!(session_id = ?session_id, "Session replaced");
                }
                self.transcript.replace_session(session_id);
            }

            Effect::SendChat { request } => {
                let Some(event_tx) = self.event_tx.upgrade() else {
                    tracing::debug!("Widget detached, dropping chat request");
                    return;
                };
                let backend = self.backend.clone();

                // Spawn so the loop keeps accepting UI events meanwhile
                tokio::spawn(async move {
                    let outcome = ChatOutcome::from_result(backend.send_chat(&request).await);
                    let _ = event_tx.send(Event::ChatCompleted { outcome }).await;
                });
            }

            Effect::SendLead { payload } => {
                let Some(event_tx) = self.event_tx.upgrade() else {
                    tracing::debug!("Widget detached, dropping lead");
                    return;
                };
                let backend = self.backend.clone();

                tokio::spawn(async move {
                    let outcome = LeadOutcome::from_result(backend.submit_lead(&payload).await);
                    let _ = event_tx.send(Event::LeadCompleted { outcome }).await;
                });
            }
        }
    }

    fn publish_view(&self) {
        let view = View::capture(&self.state, &self.transcript, self.context.widget_id);
        self.view_tx.send_if_modified(|current| {
            if *current == view {
                false
            } else {
                *current = view;
                true
            }
        });
    }
}
