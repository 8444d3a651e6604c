//! Chat backend protocol
//!
//! `ChatBackend` is the seam between the widget runtime and the network.
//! `HttpBackend` speaks the JSON contract over HTTP; tests substitute mocks.

mod error;
mod http;
mod types;

pub use error::{ProtocolError, ProtocolErrorKind};
pub use http::HttpBackend;
pub use types::{ChatReply, ChatRequest};

use crate::lead::LeadPayload;
use async_trait::async_trait;
use std::sync::Arc;

/// Remote chat and lead endpoints
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Send one user message. Application-level failures come back as
    /// `Ok` with `success == false`; only transport and decoding problems
    /// are errors.
    async fn send_chat(&self, request: &ChatRequest) -> Result<ChatReply, ProtocolError>;

    /// Deliver a validated lead
    async fn submit_lead(&self, payload: &LeadPayload) -> Result<(), ProtocolError>;
}

#[async_trait]
impl<T: ChatBackend + ?Sized> ChatBackend for Arc<T> {
    async fn send_chat(&self, request: &ChatRequest) -> Result<ChatReply, ProtocolError> {
        (**self).send_chat(request).await
    }

    async fn submit_lead(&self, payload: &LeadPayload) -> Result<(), ProtocolError> {
        (**self).submit_lead(payload).await
    }
}

/// Logging wrapper for chat backends
pub struct LoggingBackend<B> {
    inner: B,
    brand: String,
}

impl<B: ChatBackend> LoggingBackend<B> {
    #[must_use]
    pub fn new(inner: B, brand: impl Into<String>) -> Self {
        Self {
            inner,
            brand: brand.into(),
        }
    }
}

#[async_trait]
impl<B: ChatBackend> ChatBackend for LoggingBackend<B> {
    async fn send_chat(&self, request: &ChatRequest) -> Result<ChatReply, ProtocolError> {
        let start = std::time::Instant::now();
        let result = self.inner.send_chat(request).await;
        let duration = start.elapsed();

        match &result {
            Ok(reply) => {
                tracing::info!(
                    brand = %self.brand,
                    duration_ms = %duration.as_millis(),
                    success = reply.success,
                    show_form = ?reply.show_form,
                    new_session = request.session_id.is_none(),
                    "Chat request completed"
                );
            }
            Err(e) => {
                tracing::warn!(
                    brand = %self.brand,
                    duration_ms = %duration.as_millis(),
                    kind = ?e.kind,
                    error = %e.message,
                    "Chat request failed"
                );
            }
        }

        result
    }

    async fn submit_lead(&self, payload: &LeadPayload) -> Result<(), ProtocolError> {
        let start = std::time::Instant::now();
        let result = self.inner.submit_lead(payload).await;
        let duration = start.elapsed();

        match &result {
            Ok(()) => tracing::info!(
                brand = %self.brand,
                form_type = %payload.form_type,
                duration_ms = %duration.as_millis(),
                "Lead submitted"
            ),
            Err(e) => tracing::warn!(
                brand = %self.brand,
                form_type = %payload.form_type,
                duration_ms = %duration.as_millis(),
                kind = ?e.kind,
                error = %e.message,
                "Lead submission failed"
            ),
        }

        result
    }
}
