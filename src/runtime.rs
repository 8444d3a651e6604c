//! Runtime for mounted widgets
//!
//! Each widget gets one event loop task. UI calls on `WidgetHandle` become
//! events on its channel; network completions come back on the same
//! channel, so events are always applied one at a time in arrival order.

mod executor;

#[cfg(test)]
pub mod testing;

pub use executor::WidgetRuntime;

use crate::config::{resolve, ConfigError, ResolvedConfig, WidgetConfig};
use crate::lead::LeadInput;
use crate::protocol::{ChatBackend, HttpBackend, LoggingBackend, ProtocolError};
use crate::render;
use crate::state_machine::{ConvState, Event, WidgetContext, WidgetId};
use crate::transcript::Transcript;
use crate::view::View;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{mpsc, watch};

const EVENT_CHANNEL_CAPACITY: usize = 32;

/// The widget's event loop has exited
#[derive(Debug, Clone, Copy, Error)]
#[error("Widget runtime has stopped")]
pub struct RuntimeStopped;

#[derive(Debug, Error)]
pub enum MountError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Failed to build chat client: {0}")]
    Client(#[from] ProtocolError),
}

/// Handle to interact with a running widget
///
/// Dropping every handle stops the widget once in-flight requests finish.
#[derive(Clone)]
pub struct WidgetHandle {
    widget_id: WidgetId,
    config: Arc<ResolvedConfig>,
    event_tx: mpsc::Sender<Event>,
    view_rx: watch::Receiver<View>,
}

impl WidgetHandle {
    #[must_use]
    pub fn widget_id(&self) -> WidgetId {
        self.widget_id
    }

    #[must_use]
    pub fn config(&self) -> &ResolvedConfig {
        &self.config
    }

    /// Queue `event` for the widget's event loop.
    ///
    /// # Errors
    ///
    /// Returns `RuntimeStopped` if the event loop has exited.
    pub async fn dispatch(&self, event: Event) -> Result<(), RuntimeStopped> {
        self.event_tx.send(event).await.map_err(|_| RuntimeStopped)
    }

    /// # Errors
    ///
    /// Returns `RuntimeStopped` if the event loop has exited.
    pub async fn toggle(&self) -> Result<(), RuntimeStopped> {
        self.dispatch(Event::Toggle).await
    }

    /// # Errors
    ///
    /// Returns `RuntimeStopped` if the event loop has exited.
    pub async fn send(&self, text: impl Into<String>) -> Result<(), RuntimeStopped> {
        self.dispatch(Event::SubmitMessage { text: text.into() })
            .await
    }

    /// # Errors
    ///
    /// Returns `RuntimeStopped` if the event loop has exited.
    pub async fn choose_quick_reply(&self, index: usize) -> Result<(), RuntimeStopped> {
        self.dispatch(Event::SelectQuickReply { index }).await
    }

    /// # Errors
    ///
    /// Returns `RuntimeStopped` if the event loop has exited.
    pub async fn submit_lead(&self, input: LeadInput) -> Result<(), RuntimeStopped> {
        self.dispatch(Event::SubmitLead { input }).await
    }

    /// Latest published view
    #[must_use]
    pub fn view(&self) -> View {
        self.view_rx.borrow().clone()
    }

    /// Receiver that is notified whenever the view changes
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<View> {
        self.view_rx.clone()
    }

    /// Current view rendered to markup
    #[must_use]
    pub fn render_html(&self) -> String {
        render::render_widget(&self.config, &self.view()).to_html()
    }

    #[must_use]
    pub fn stylesheet(&self) -> String {
        render::stylesheet(&self.config)
    }
}

/// Resolve `config` and start a widget talking to `backend`
///
/// # Errors
///
/// Returns the `ConfigError` from [`resolve`] if the config is invalid.
///
/// # Panics
///
/// Panics if called outside a Tokio runtime.
pub fn spawn_widget<B>(config: &WidgetConfig, backend: B) -> Result<WidgetHandle, ConfigError>
where
    B: ChatBackend + 'static,
{
    let resolved = resolve(config)?;
    Ok(spawn_resolved(Arc::new(resolved), backend))
}

/// Start a widget against the HTTP endpoints under `origin`
///
/// # Errors
///
/// Returns `MountError::Config` if the config is invalid and
/// `MountError::Client` if `origin` or an endpoint path is not a usable URL
/// or the HTTP client cannot be built.
///
/// # Panics
///
/// Panics if called outside a Tokio runtime.
pub fn mount_http(config: &WidgetConfig, origin: &str) -> Result<WidgetHandle, MountError> {
    let resolved = Arc::new(resolve(config)?);
    let http = HttpBackend::new(origin, &resolved.endpoints)?;
    tracing::info!(
        brand = %resolved.brand_key,
        chat_url = %http.chat_url(),
        leads_url = %http.leads_url(),
        "Mounting widget"
    );
    let backend = LoggingBackend::new(http, resolved.brand_key.clone());
    Ok(spawn_resolved(resolved, backend))
}

fn spawn_resolved<B>(config: Arc<ResolvedConfig>, backend: B) -> WidgetHandle
where
    B: ChatBackend + 'static,
{
    let context = WidgetContext::new(config.clone());
    let widget_id = context.widget_id;
    let state = ConvState::default();
    let transcript = Transcript::new();

    let (event_tx, event_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
    let (view_tx, view_rx) = watch::channel(View::capture(&state, &transcript, widget_id));

    let runtime = WidgetRuntime::new(
        context,
        state,
        transcript,
        backend,
        event_rx,
        event_tx.downgrade(),
        view_tx,
    );

    tokio::spawn(async move {
        runtime.run().await;
        tracing::info!(widget_id = %widget_id, "Widget runtime finished");
    });

    WidgetHandle {
        widget_id,
        config,
        event_tx,
        view_rx,
    }
}
