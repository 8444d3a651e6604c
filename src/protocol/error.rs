//! Protocol error types

use thiserror::Error;

/// Backend error with classification
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ProtocolError {
    pub kind: ProtocolErrorKind,
    pub message: String,
    /// HTTP status, when the server answered at all
    pub status: Option<u16>,
}

impl ProtocolError {
    #[must_use]
    pub fn new(kind: ProtocolErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
        }
    }

    #[must_use]
    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(ProtocolErrorKind::Transport, message)
    }

    #[must_use]
    pub fn decode(message: impl Into<String>) -> Self {
        Self::new(ProtocolErrorKind::Decode, message)
    }

    #[must_use]
    pub fn status(status: u16, message: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            ..Self::new(ProtocolErrorKind::Status, message)
        }
    }

    #[must_use]
    pub fn invalid_endpoint(message: impl Into<String>) -> Self {
        Self::new(ProtocolErrorKind::InvalidEndpoint, message)
    }
}

/// Error classification. The widget treats every kind the same way (a
/// fallback message, no retry); the kinds exist for logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolErrorKind {
    /// Connection refused, DNS, timeout, body read failure
    Transport,
    /// Response body was not the expected JSON
    Decode,
    /// Server answered with a non-success status
    Status,
    /// Origin or endpoint path could not form a URL
    InvalidEndpoint,
}
