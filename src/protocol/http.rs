//! HTTP implementation of the chat backend

use super::{ChatBackend, ChatReply, ChatRequest, ProtocolError};
use crate::config::Endpoints;
use crate::lead::LeadPayload;
use async_trait::async_trait;
use reqwest::{Client, Url};
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Posts JSON to the configured endpoint paths under one origin
pub struct HttpBackend {
    client: Client,
    chat_url: Url,
    leads_url: Url,
}

impl HttpBackend {
    /// # Errors
    ///
    /// Fails if the HTTP client cannot be built or, as in
    /// [`HttpBackend::with_client`], if the URLs do not parse.
    pub fn new(origin: &str, endpoints: &Endpoints) -> Result<Self, ProtocolError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ProtocolError::transport(format!("Failed to create HTTP client: {e}")))?;
        Self::with_client(client, origin, endpoints)
    }

    /// # Errors
    ///
    /// Returns an `InvalidEndpoint` error if `origin` is not an absolute URL
    /// or an endpoint path cannot be joined onto it.
    pub fn with_client(
        client: Client,
        origin: &str,
        endpoints: &Endpoints,
    ) -> Result<Self, ProtocolError> {
        let base = Url::parse(origin)
            .map_err(|e| ProtocolError::invalid_endpoint(format!("Invalid origin {origin:?}: {e}")))?;
        Ok(Self {
            client,
            chat_url: join(&base, &endpoints.chat)?,
            leads_url: join(&base, &endpoints.leads)?,
        })
    }

    #[must_use]
    pub fn chat_url(&self) -> &Url {
        &self.chat_url
    }

    #[must_use]
    pub fn leads_url(&self) -> &Url {
        &self.leads_url
    }
}

fn join(base: &Url, path: &str) -> Result<Url, ProtocolError> {
    base.join(path)
        .map_err(|e| ProtocolError::invalid_endpoint(format!("Invalid endpoint path {path:?}: {e}")))
}

#[async_trait]
impl ChatBackend for HttpBackend {
    async fn send_chat(&self, request: &ChatRequest) -> Result<ChatReply, ProtocolError> {
        let response = self
            .client
            .post(self.chat_url.clone())
            .json(request)
            .send()
            .await
            .map_err(|e| ProtocolError::transport(format!("Chat request failed: {e}")))?;

        // Error statuses still carry a JSON body; it decides the outcome.
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ProtocolError::transport(format!("Failed to read chat response: {e}")))?;

        serde_json::from_str(&body).map_err(|e| {
            ProtocolError::decode(format!("Chat response ({status}) is not valid JSON: {e}"))
        })
    }

    async fn submit_lead(&self, payload: &LeadPayload) -> Result<(), ProtocolError> {
        let response = self
            .client
            .post(self.leads_url.clone())
            .json(payload)
            .send()
            .await
            .map_err(|e| ProtocolError::transport(format!("Lead request failed: {e}")))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(ProtocolError::status(
                status.as_u16(),
                format!("Lead endpoint returned {status}: {body}"),
            ))
        }
    }
}
