//! Effects produced by state transitions

use crate::lead::LeadPayload;
use crate::protocol::ChatRequest;
use crate::transcript::{Message, SessionId};

/// Effects to be executed after state transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Append to the transcript
    AppendMessage { message: Message },

    /// Adopt the session id the backend returned
    ReplaceSession { session_id: Option<SessionId> },

    /// Make a chat request (runs in the background)
    SendChat { request: ChatRequest },

    /// Deliver a lead (runs in the background)
    SendLead { payload: LeadPayload },
}

impl Effect {
    #[must_use]
    pub fn bot(text: impl Into<String>) -> Self {
        Effect::AppendMessage {
            message: Message::bot(text),
        }
    }

    #[must_use]
    pub fn user(text: impl Into<String>) -> Self {
        Effect::AppendMessage {
            message: Message::user(text),
        }
    }
}
